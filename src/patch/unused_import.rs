// Unused import remover
//
// Message carries the URI: "Unused import: 'package:foo/foo.dart'".
// The reported line wins when it imports that URI; otherwise the first
// import of the URI anywhere in the file. Directives wrapped over several
// lines (`show`/`hide`/`as` clauses) go up to their `;`. No import left →
// nothing to do, which makes a second run a no-op.

use super::dart::{directive_end, is_import_of};
use super::text::SourceLines;
use super::{FindingFixer, FixOutcome};
use crate::analyzer::{Finding, RULE_UNUSED_IMPORT};

pub struct UnusedImportRemover;

impl UnusedImportRemover {
    pub fn new() -> Self {
        UnusedImportRemover
    }
}

impl Default for UnusedImportRemover {
    fn default() -> Self {
        Self::new()
    }
}

/// URI quoted in an unused-import message: the one after "Unused import: ",
/// else the first quoted string.
pub fn unused_import_uri(message: &str) -> Option<&str> {
    let rest = match message.find("Unused import: ") {
        Some(start) => &message[start + "Unused import: ".len()..],
        None => message,
    };
    let open = rest.find(['\'', '"'])?;
    let quote = &rest[open..open + 1];
    let body = &rest[open + 1..];
    let end = body.find(quote)?;
    Some(&body[..end])
}

impl FindingFixer for UnusedImportRemover {
    fn name(&self) -> &'static str {
        "unused-imports"
    }

    fn rules(&self) -> &'static [&'static str] {
        &[RULE_UNUSED_IMPORT]
    }

    fn fix(&self, text: &str, findings: &[Finding]) -> FixOutcome {
        let mut lines = SourceLines::parse(text);
        let mut outcome = FixOutcome::unchanged(text);

        for finding in findings {
            let Some(uri) = unused_import_uri(&finding.message) else {
                outcome
                    .notes
                    .push(format!("{}: no import URI in message", finding.location()));
                continue;
            };

            let reported = finding.line_index();
            let target = if lines.content(reported).is_some_and(|l| is_import_of(l, uri)) {
                Some(reported)
            } else {
                lines.iter().position(|l| is_import_of(l, uri))
            };

            match target {
                Some(idx) => {
                    for line in (idx..=directive_end(&lines, idx)).rev() {
                        lines.remove(line);
                    }
                    outcome.applied += 1;
                }
                None => outcome
                    .notes
                    .push(format!("{}: import '{}' already gone", finding.location(), uri)),
            }
        }

        outcome.text = lines.to_text();
        outcome
    }
}
