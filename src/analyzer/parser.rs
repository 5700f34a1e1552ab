// 🧩 Diagnostic Parser - analyzer text → findings
//
// Formats are tried in sequence; a line that matches none is dropped.
// Supported layouts:
//   bullet:  `warning • 'x' is unused • lib/a.dart:10:1 • unused_import`
//   dashed:  `info - Don't use 'BuildContext's across async gaps - lib/a.dart:5:7 - use_build_context_synchronously`
//   located: `info - lib/a.dart:5:7 - Don't use 'BuildContext's across async gaps. - use_build_context_synchronously`
//   machine: `ERROR|COMPILE_TIME_ERROR|INVALID_CONSTANT|/abs/lib/a.dart|12|5|3|Invalid constant value`
//   legacy:  `Unused import: 'package:foo/foo.dart' • lib/a.dart:3:8`

use super::{Finding, Severity, RULE_UNUSED_IMPORT};
use serde::Serialize;
use tracing::debug;

const BULLET_SEP: &str = " • ";
const DASH_SEP: &str = " - ";
const MACHINE_FIELDS: usize = 8;

/// Counters for one parse pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines: usize,
    pub parsed: usize,
    /// Lines that look like diagnostics but matched no known layout
    pub unrecognized: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub findings: Vec<Finding>,
    pub stats: ParseStats,
}

pub struct DiagnosticParser {
    /// Severity assumed when the layout carries none (legacy lines)
    default_severity: Severity,
}

impl DiagnosticParser {
    pub fn new() -> Self {
        DiagnosticParser {
            default_severity: Severity::Warning,
        }
    }

    pub fn with_default_severity(mut self, severity: Severity) -> Self {
        self.default_severity = severity;
        self
    }

    /// Parse a whole analyzer report
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for line in text.lines() {
            outcome.stats.lines += 1;

            if line.trim().is_empty() {
                continue;
            }

            match self.parse_line(line) {
                Some(finding) => {
                    outcome.stats.parsed += 1;
                    outcome.findings.push(finding);
                }
                None if looks_like_diagnostic(line) => {
                    outcome.stats.unrecognized += 1;
                    debug!("unrecognized analyzer line: {}", line.trim());
                }
                None => {}
            }
        }

        outcome
    }

    /// Parse one line, trying each layout in turn
    pub fn parse_line(&self, line: &str) -> Option<Finding> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        parse_machine(trimmed)
            .or_else(|| self.parse_separated(trimmed, BULLET_SEP))
            .or_else(|| self.parse_separated(trimmed, DASH_SEP))
    }

    /// Bullet / dashed layouts. The location field is found by shape, so
    /// messages containing the separator survive intact.
    fn parse_separated(&self, line: &str, sep: &str) -> Option<Finding> {
        if !line.contains(sep) {
            return None;
        }

        let segments: Vec<&str> = line.split(sep).map(str::trim).collect();
        let loc_idx = segments.iter().rposition(|s| parse_location(s).is_some())?;
        let (file, line_no, column) = parse_location(segments[loc_idx])?;

        let before = &segments[..loc_idx];
        let after = &segments[loc_idx + 1..];

        let (severity, message_parts) = match before.split_first() {
            Some((first, rest)) => match Severity::parse(first) {
                Some(severity) => (severity, rest),
                None => (self.default_severity, before),
            },
            None => (self.default_severity, before),
        };

        // `dart analyze` puts the location first: `sev - path:l:c - message - rule`
        let (rule_part, trailing) = match after.split_last() {
            Some((last, rest)) => (Some(*last), rest),
            None => (None, &[][..]),
        };

        let message = message_parts
            .iter()
            .chain(trailing.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(sep);

        let mut rule = rule_part
            .map(|r| r.trim_end_matches('.').to_string())
            .unwrap_or_default();

        if rule.is_empty() && message.starts_with("Unused import:") {
            rule = RULE_UNUSED_IMPORT.to_string();
        }

        Some(Finding::new(severity, message, file, line_no, column, rule))
    }
}

impl Default for DiagnosticParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with default settings
pub fn parse_report(text: &str) -> Vec<Finding> {
    DiagnosticParser::new().parse(text).findings
}

/// `dart analyze --format=machine`
fn parse_machine(line: &str) -> Option<Finding> {
    let fields: Vec<&str> = line.splitn(MACHINE_FIELDS, '|').collect();
    if fields.len() != MACHINE_FIELDS {
        return None;
    }

    let severity = Severity::parse(fields[0])?;
    let line_no = parse_positive(fields[4])?;
    let column = parse_positive(fields[5])?;
    let file = fields[3].trim();
    if file.is_empty() {
        return None;
    }

    Some(Finding::new(
        severity,
        fields[7].trim(),
        file,
        line_no,
        column,
        fields[2].trim().to_ascii_lowercase(),
    ))
}

/// `path:line:col` → parts. Splits from the right so drive letters survive.
fn parse_location(segment: &str) -> Option<(String, usize, usize)> {
    let mut parts = segment.trim().rsplitn(3, ':');
    let column = parse_positive(parts.next()?)?;
    let line = parse_positive(parts.next()?)?;
    let file = parts.next()?.trim();

    if file.is_empty() {
        return None;
    }

    Some((file.to_string(), line, column))
}

fn parse_positive(field: &str) -> Option<usize> {
    let value: usize = field.trim().parse().ok()?;
    if value == 0 {
        None
    } else {
        Some(value)
    }
}

fn looks_like_diagnostic(line: &str) -> bool {
    line.contains(BULLET_SEP) || line.contains(".dart:") || line.matches('|').count() >= MACHINE_FIELDS - 1
}
