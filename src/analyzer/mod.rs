// 🔎 Analyzer Findings - what the static analyzer told us
//
// Pipeline: DiagnosticSource (raw text) → parser (findings) → aggregate (per file,
// bottom-up) → patch.

pub mod aggregate;
pub mod parser;
pub mod source;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use aggregate::{group_by_file, FindingFilter};
pub use parser::{parse_report, DiagnosticParser, ParseOutcome, ParseStats};
pub use source::{save_report, CommandSource, DiagnosticSource, ReportFileSource, SavingSource, TextSource};

// ============================================================================
// RULE IDS
// ============================================================================

pub const RULE_UNUSED_IMPORT: &str = "unused_import";
pub const RULE_INVALID_CONSTANT: &str = "invalid_constant";
pub const RULE_CONST_WITH_NON_CONST: &str = "const_with_non_const";
pub const RULE_BUILD_CONTEXT_SYNC: &str = "use_build_context_synchronously";

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Parse the severity word used by the analyzer (any case)
    ///
    /// `lint` and `hint` are reported by some versions and map to Info.
    pub fn parse(word: &str) -> Option<Severity> {
        match word.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" | "lint" | "hint" => Some(Severity::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FINDING
// ============================================================================

/// One diagnostic record emitted by the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub file: String,
    /// 1-based
    pub line: usize,
    /// 1-based
    pub column: usize,
    /// Rule id, e.g. `unused_import`; empty when the format does not carry one
    pub rule: String,
}

impl Finding {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
        rule: impl Into<String>,
    ) -> Self {
        Finding {
            severity,
            message: message.into(),
            file: file.into(),
            line,
            column,
            rule: rule.into(),
        }
    }

    /// `file:line:col` as printed by the analyzer
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    /// 0-based line index
    pub fn line_index(&self) -> usize {
        self.line.saturating_sub(1)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} • {} • {} • {}",
            self.severity,
            self.message,
            self.location(),
            self.rule
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("WARNING"), Some(Severity::Warning));
        assert_eq!(Severity::parse("  info "), Some(Severity::Info));
        assert_eq!(Severity::parse("lint"), Some(Severity::Info));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn test_finding_display_matches_analyzer_layout() {
        let finding = Finding::new(
            Severity::Warning,
            "'x' is unused",
            "lib/a.dart",
            10,
            1,
            RULE_UNUSED_IMPORT,
        );
        assert_eq!(
            finding.to_string(),
            "warning • 'x' is unused • lib/a.dart:10:1 • unused_import"
        );
        assert_eq!(finding.line_index(), 9);
    }
}
