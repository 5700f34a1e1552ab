// 🔁 Fix Runner - Source → Parser → Aggregator → Patcher → (re-check)
//
// Per-file failures are logged and collected; the run keeps going.

use crate::analyzer::{group_by_file, DiagnosticParser, DiagnosticSource, Finding, FindingFilter, ParseStats};
use crate::config::Config;
use crate::patch::{apply_to_file, FileChange, FindingFixer, ScanFixer};
use crate::workspace::dart_files;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute edits without writing files
    pub dry_run: bool,
    /// Re-run the diagnostic source after patching
    pub recheck: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

/// Everything one fixer run did
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub fixer: String,
    pub source: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<ParseStats>,
    /// Findings the fixer acted on (after filtering)
    pub findings: Vec<Finding>,
    pub files: Vec<FileChange>,
    pub failures: Vec<FileFailure>,
    /// Findings left for the same rules after the re-check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Vec<Finding>>,
}

impl FixReport {
    fn new(fixer: &str, source: Option<String>, dry_run: bool) -> Self {
        FixReport {
            fixer: fixer.to_string(),
            source,
            generated_at: Utc::now(),
            dry_run,
            parse: None,
            findings: Vec::new(),
            files: Vec::new(),
            failures: Vec::new(),
            remaining: None,
        }
    }

    pub fn files_changed(&self) -> usize {
        self.files.iter().filter(|f| f.changed()).count()
    }

    pub fn edits_applied(&self) -> usize {
        self.files.iter().map(|f| f.applied).sum()
    }

    /// Some(true) when the re-check found nothing left
    pub fn converged(&self) -> Option<bool> {
        self.remaining.as_ref().map(|r| r.is_empty())
    }

    fn record(&mut self, path: &Path, result: Result<FileChange>) {
        match result {
            Ok(change) => self.files.push(change),
            Err(e) => {
                warn!("skipping {}: {:#}", path.display(), e);
                self.failures.push(FileFailure {
                    path: path.display().to_string(),
                    error: format!("{:#}", e),
                });
            }
        }
    }
}

fn collect_findings(
    config: &Config,
    source: &dyn DiagnosticSource,
    rules: &[&str],
) -> Result<(BTreeMap<String, Vec<Finding>>, ParseStats)> {
    let text = source.read()?;
    let outcome = DiagnosticParser::new().parse(&text);
    let mut filter = FindingFilter::for_rules(rules)
        .with_strip_prefix(config.path_prefix.clone())
        .with_base_dir(&config.project_root);
    if let Ok(canonical) = config.project_root.canonicalize() {
        filter = filter.with_base_dir(canonical);
    }
    Ok((group_by_file(&outcome.findings, &filter), outcome.stats))
}

/// Run a finding-driven fixer over every file the analyzer reported
pub fn run_finding_fixer(
    config: &Config,
    source: &dyn DiagnosticSource,
    fixer: &dyn FindingFixer,
    options: RunOptions,
) -> Result<FixReport> {
    let mut report = FixReport::new(fixer.name(), Some(source.describe()), options.dry_run);

    let (grouped, stats) = collect_findings(config, source, fixer.rules())?;
    if stats.unrecognized > 0 {
        debug!(
            "{} analyzer lines looked like diagnostics but were not understood",
            stats.unrecognized
        );
    }
    report.parse = Some(stats);

    let total: usize = grouped.values().map(Vec::len).sum();
    info!("{}: {} findings in {} files", fixer.name(), total, grouped.len());

    for (file, findings) in &grouped {
        let path = config.resolve(file);
        if !path.is_file() {
            warn!("file not found: {}", path.display());
            report.failures.push(FileFailure {
                path: path.display().to_string(),
                error: "file not found".to_string(),
            });
            continue;
        }

        let result = apply_to_file(&path, options.dry_run, |text| fixer.fix(text, findings));
        report.record(&path, result);
        report.findings.extend(findings.iter().cloned());
    }

    if options.recheck && !options.dry_run {
        let (remaining, _) = collect_findings(config, source, fixer.rules())?;
        let remaining: Vec<Finding> = remaining.into_values().flatten().collect();
        info!("{}: {} findings remain after re-check", fixer.name(), remaining.len());
        report.remaining = Some(remaining);
    }

    Ok(report)
}

/// Run a scan fixer over every Dart file below `root`.
/// Only files the fixer changed (or failed on) are recorded.
pub fn run_scan_fixer(root: &Path, fixer: &dyn ScanFixer, options: RunOptions) -> Result<FixReport> {
    let mut report = FixReport::new(fixer.name(), Some(root.display().to_string()), options.dry_run);

    let files = dart_files(root);
    info!("{}: scanning {} files under {}", fixer.name(), files.len(), root.display());

    for path in files {
        let result = apply_to_file(&path, options.dry_run, |text| fixer.fix(text));
        match result {
            Ok(change) if !change.changed() => {}
            other => report.record(&path, other),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TextSource;
    use crate::patch::{ConstMisuseStripper, UnusedImportRemover};
    use std::fs;

    fn project() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        let config = Config::default().with_project_root(dir.path());
        (dir, config)
    }

    #[test]
    fn test_finding_fixer_end_to_end() {
        let (dir, config) = project();
        let file = dir.path().join("lib").join("a.dart");
        fs::write(&file, "import 'dart:async';\nimport 'dart:math';\n\nvoid main() {}\n").unwrap();

        let source = TextSource::new(
            "Analyzing...\n\
             warning • Unused import: 'dart:math' • jive-flutter/lib/a.dart:2:8 • unused_import\n\
             warning • Unused import: 'dart:io' • lib/missing.dart:1:8 • unused_import\n\
             info • Prefer const • lib/a.dart:4:1 • prefer_const_constructors\n",
        );

        let report = run_finding_fixer(&config, &source, &UnusedImportRemover::new(), RunOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "import 'dart:async';\n\nvoid main() {}\n");
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.files_changed(), 1);
        assert_eq!(report.edits_applied(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("not found"));
        assert_eq!(report.parse.as_ref().unwrap().parsed, 3);
    }

    #[test]
    fn test_recheck_reports_remaining() {
        let (dir, config) = project();
        let file = dir.path().join("lib").join("a.dart");
        fs::write(&file, "import 'dart:math';\n").unwrap();

        // A captured report does not change between reads, so the
        // re-check sees the same finding again.
        let source = TextSource::new("warning • Unused import: 'dart:math' • lib/a.dart:1:8 • unused_import\n");
        let options = RunOptions { dry_run: false, recheck: true };

        let report = run_finding_fixer(&config, &source, &UnusedImportRemover::new(), options).unwrap();

        assert_eq!(report.converged(), Some(false));
        assert_eq!(report.remaining.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_scan_fixer_dry_run() {
        let (dir, _config) = project();
        let lib = dir.path().join("lib");
        fs::write(lib.join("a.dart"), "const Text('a');\n").unwrap();
        fs::write(lib.join("b.dart"), "const TextStyle();\n").unwrap();

        let fixer = ConstMisuseStripper::with_defaults().unwrap();
        let options = RunOptions { dry_run: true, recheck: false };
        let report = run_scan_fixer(&lib, &fixer, options).unwrap();

        assert_eq!(report.files.len(), 1);
        assert!(report.files[0].path.ends_with("a.dart"));
        assert!(!report.files[0].written);
        assert_eq!(fs::read_to_string(lib.join("a.dart")).unwrap(), "const Text('a');\n");
    }
}
