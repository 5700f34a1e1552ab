// 🧭 Structure Verification - expected files/directories + code line counts
//
// A check whose `requires` path is absent is skipped, not failed, so a
// missing module directory does not also fail every file inside it.

use crate::workspace::files_with_extension;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureCheck {
    pub section: String,
    /// Path relative to the project root
    pub path: String,
    pub label: String,
    /// Non-critical failures count as warnings
    #[serde(default = "default_critical")]
    pub critical: bool,
    /// Only checked when this path exists
    #[serde(default)]
    pub requires: Option<String>,
}

fn default_critical() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineCountTarget {
    pub label: String,
    pub dir: String,
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub checks: Vec<StructureCheck>,
    #[serde(default)]
    pub line_counts: Vec<LineCountTarget>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    /// Layout of the Jive monorepo (Rust core + Flutter app)
    pub fn jive_default() -> Self {
        let mut builder = ManifestBuilder::default();

        builder.section("Project root");
        builder.check("jive-core", "directory jive-core", None);
        builder.check("jive-flutter", "directory jive-flutter", None);
        for doc in [
            "README.md",
            "JIVE_PROJECT_SUMMARY.md",
            "JIVE_COMPLETE_TEST_REPORT.md",
            "MAYBE_TO_JIVE_CONVERSION_COMPLETE.md",
        ] {
            builder.check(doc, doc, None);
        }

        builder.section("Rust core");
        builder.check("jive-core/Cargo.toml", "Cargo.toml", None);
        builder.check("jive-core/src", "src directory", None);
        for module in ["domain", "application", "infrastructure", "wasm"] {
            builder.check(&format!("jive-core/src/{}", module), &format!("module {}", module), Some("jive-core/src"));
        }
        for service in [
            "account_service.rs",
            "transaction_service.rs",
            "ledger_service.rs",
            "category_service.rs",
            "budget_service.rs",
            "report_service.rs",
            "user_service.rs",
            "auth_service.rs",
            "sync_service.rs",
            "import_service.rs",
            "export_service.rs",
            "rule_service.rs",
            "tag_service.rs",
            "payee_service.rs",
            "notification_service.rs",
            "scheduled_transaction_service.rs",
            "currency_service.rs",
            "statistics_service.rs",
        ] {
            builder.check(
                &format!("jive-core/src/application/{}", service),
                &format!("service {}", service),
                Some("jive-core/src/application"),
            );
        }

        builder.section("Flutter app");
        builder.check("jive-flutter/pubspec.yaml", "pubspec.yaml", None);
        builder.check("jive-flutter/lib", "lib directory", None);
        for file in ["main.dart", "app.dart"] {
            builder.check(&format!("jive-flutter/lib/{}", file), file, Some("jive-flutter/lib"));
        }
        for dir in ["models", "providers", "services", "ui", "core"] {
            builder.check(&format!("jive-flutter/lib/{}", dir), &format!("directory {}", dir), Some("jive-flutter/lib"));
        }
        for provider in [
            "auth_provider.dart",
            "transaction_provider.dart",
            "account_provider.dart",
            "budget_provider.dart",
        ] {
            builder.check(
                &format!("jive-flutter/lib/providers/{}", provider),
                &format!("provider {}", provider),
                Some("jive-flutter/lib/providers"),
            );
        }
        for component in ["buttons", "cards", "charts", "dashboard", "transactions", "accounts", "budget"] {
            builder.optional(
                &format!("jive-flutter/lib/ui/components/{}", component),
                &format!("component {}", component),
                Some("jive-flutter/lib/ui/components"),
            );
        }

        builder.section("Documentation");
        for (doc, label) in [
            ("README.md", "project readme"),
            ("JIVE_PROJECT_SUMMARY.md", "project summary"),
            ("SERVICES_TEST_SUMMARY.md", "services test summary"),
            ("JIVE_COMPLETE_TEST_REPORT.md", "complete test report"),
            ("MAYBE_TO_JIVE_CONVERSION_COMPLETE.md", "conversion report"),
        ] {
            builder.check(doc, &format!("{} ({})", label, doc), None);
        }

        Manifest {
            checks: builder.checks,
            line_counts: vec![
                LineCountTarget {
                    label: "Rust".to_string(),
                    dir: "jive-core".to_string(),
                    extension: "rs".to_string(),
                },
                LineCountTarget {
                    label: "Dart".to_string(),
                    dir: "jive-flutter".to_string(),
                    extension: "dart".to_string(),
                },
            ],
        }
    }
}

#[derive(Default)]
struct ManifestBuilder {
    section: String,
    checks: Vec<StructureCheck>,
}

impl ManifestBuilder {
    fn section(&mut self, name: &str) {
        self.section = name.to_string();
    }

    fn push(&mut self, path: &str, label: &str, requires: Option<&str>, critical: bool) {
        self.checks.push(StructureCheck {
            section: self.section.clone(),
            path: path.to_string(),
            label: label.to_string(),
            critical,
            requires: requires.map(str::to_string),
        });
    }

    fn check(&mut self, path: &str, label: &str, requires: Option<&str>) {
        self.push(path, label, requires, true);
    }

    fn optional(&mut self, path: &str, label: &str, requires: Option<&str>) {
        self.push(path, label, requires, false);
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    Warning,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub section: String,
    pub label: String,
    pub path: String,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineCount {
    pub label: String,
    pub files: usize,
    pub lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every critical check passed
    Complete,
    /// ≥ 90%
    MostlyComplete,
    /// ≥ 70%
    Partial,
    Incomplete,
}

impl Verdict {
    pub fn from_completion(completion: f64) -> Self {
        if completion >= 100.0 {
            Verdict::Complete
        } else if completion >= 90.0 {
            Verdict::MostlyComplete
        } else if completion >= 70.0 {
            Verdict::Partial
        } else {
            Verdict::Incomplete
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Verdict::Complete => "✅ Project structure complete",
            Verdict::MostlyComplete => "✅ Project structure mostly complete",
            Verdict::Partial => "⚠️  Project structure partially complete",
            Verdict::Incomplete => "❌ Project structure incomplete",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub root: String,
    pub checks: Vec<CheckResult>,
    pub line_counts: Vec<LineCount>,
}

impl VerifyReport {
    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(CheckStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(CheckStatus::Failed)
    }

    pub fn warnings(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| c.status == CheckStatus::Warning).collect()
    }

    /// passed / (passed + failed); warnings and skips do not count
    pub fn completion(&self) -> Option<f64> {
        let total = self.passed() + self.failed();
        if total == 0 {
            return None;
        }
        Some(self.passed() as f64 / total as f64 * 100.0)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.completion().map(Verdict::from_completion)
    }

    pub fn total_lines(&self) -> usize {
        self.line_counts.iter().map(|c| c.lines).sum()
    }
}

pub fn verify_structure(root: &Path, manifest: &Manifest) -> VerifyReport {
    let checks = manifest
        .checks
        .iter()
        .map(|check| {
            let status = if check.requires.as_ref().is_some_and(|r| !root.join(r).exists()) {
                CheckStatus::Skipped
            } else if root.join(&check.path).exists() {
                CheckStatus::Passed
            } else if check.critical {
                CheckStatus::Failed
            } else {
                CheckStatus::Warning
            };
            debug!("{} {:?}", check.path, status);

            CheckResult {
                section: check.section.clone(),
                label: check.label.clone(),
                path: check.path.clone(),
                status,
            }
        })
        .collect();

    let line_counts = manifest
        .line_counts
        .iter()
        .map(|target| count_lines(&root.join(&target.dir), &target.extension, &target.label))
        .collect();

    VerifyReport {
        root: root.display().to_string(),
        checks,
        line_counts,
    }
}

/// Line count over every readable file with `extension` below `dir`
pub fn count_lines(dir: &Path, extension: &str, label: &str) -> LineCount {
    let files = files_with_extension(dir, extension);
    let lines = files
        .iter()
        .filter_map(|path| fs::read_to_string(path).ok())
        .map(|text| text.lines().count())
        .sum();

    LineCount {
        label: label.to_string(),
        files: files.len(),
        lines,
    }
}

pub fn print_verify_report(report: &VerifyReport) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("🧭 Jive project structure: {}", report.root);

    let mut section = "";
    for check in &report.checks {
        if check.section != section {
            section = check.section.as_str();
            println!("\n=== {} ===", section);
        }
        let mark = match check.status {
            CheckStatus::Passed => "✓",
            CheckStatus::Failed => "✗",
            CheckStatus::Warning => "⚠",
            CheckStatus::Skipped => continue,
        };
        println!("  {} {}", mark, check.label);
    }

    println!("\n=== Code lines ===");
    for count in &report.line_counts {
        println!("  {}: {} lines in {} files", count.label, count.lines, count.files);
    }
    println!("  Total: {} lines", report.total_lines());

    println!();
    println!("Passed: {}", report.passed());
    println!("Failed: {}", report.failed());
    println!("Warnings: {}", report.warnings().len());
    for warning in report.warnings() {
        println!("  - {}", warning.label);
    }

    if let (Some(completion), Some(verdict)) = (report.completion(), report.verdict()) {
        println!("{} ({:.1}%)", verdict.describe(), completion);
    }
}
