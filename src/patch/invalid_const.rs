// Invalid const remover
//
// For `invalid_constant` / `const_with_non_const` the analyzer points at or
// near the offending `const`. Strip the keyword closest to the reported
// column within ±WINDOW characters; failing that, the first one on the line.

use super::text::SourceLines;
use super::{FindingFixer, FixOutcome};
use crate::analyzer::{Finding, RULE_CONST_WITH_NON_CONST, RULE_INVALID_CONSTANT};

const WINDOW: usize = 20;

/// Span of a `const` keyword plus its trailing whitespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstSpan {
    /// Byte range to delete
    pub start: usize,
    pub end: usize,
    /// 0-based char column of the keyword
    pub column: usize,
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Every `const` keyword followed by whitespace on a line
pub fn const_spans(line: &str) -> Vec<ConstSpan> {
    let mut spans = Vec::new();
    let mut search_from = 0;

    while let Some(found) = line[search_from..].find("const") {
        let start = search_from + found;
        let after = start + "const".len();
        search_from = after;

        let boundary_before = line[..start].chars().next_back().map_or(true, |c| !is_word(c));
        let ws_len: usize = line[after..]
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();

        if boundary_before && ws_len > 0 {
            spans.push(ConstSpan {
                start,
                end: after + ws_len,
                column: line[..start].chars().count(),
            });
        }
    }

    spans
}

pub struct InvalidConstRemover;

impl InvalidConstRemover {
    pub fn new() -> Self {
        InvalidConstRemover
    }

    /// Pick the span to strip for a 1-based column
    fn choose(spans: &[ConstSpan], column: usize) -> Option<ConstSpan> {
        let col0 = column.saturating_sub(1);
        spans
            .iter()
            .filter(|s| s.column.abs_diff(col0) <= WINDOW)
            .min_by_key(|s| s.column.abs_diff(col0))
            .or_else(|| spans.first())
            .copied()
    }
}

impl Default for InvalidConstRemover {
    fn default() -> Self {
        Self::new()
    }
}

impl FindingFixer for InvalidConstRemover {
    fn name(&self) -> &'static str {
        "invalid-const"
    }

    fn rules(&self) -> &'static [&'static str] {
        &[RULE_INVALID_CONSTANT, RULE_CONST_WITH_NON_CONST]
    }

    fn fix(&self, text: &str, findings: &[Finding]) -> FixOutcome {
        let mut lines = SourceLines::parse(text);
        let mut outcome = FixOutcome::unchanged(text);

        for finding in findings {
            let idx = finding.line_index();
            let Some(line) = lines.content(idx).map(str::to_string) else {
                outcome.notes.push(format!(
                    "{}: line {} out of range",
                    finding.location(),
                    finding.line
                ));
                continue;
            };

            match Self::choose(&const_spans(&line), finding.column) {
                Some(span) => {
                    let updated = format!("{}{}", &line[..span.start], &line[span.end..]);
                    lines.replace(idx, &updated);
                    outcome.applied += 1;
                }
                None => outcome
                    .notes
                    .push(format!("{}: could not find const", finding.location())),
            }
        }

        outcome.text = lines.to_text();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Severity;

    fn invalid(line: usize, column: usize) -> Finding {
        Finding::new(
            Severity::Error,
            "Invalid constant value",
            "lib/a.dart",
            line,
            column,
            RULE_INVALID_CONSTANT,
        )
    }

    #[test]
    fn test_const_spans_respects_word_boundaries() {
        let spans = const_spans("final constant = const  Foo(); myconst x;");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].column, 17);
        assert_eq!(spans[0].end - spans[0].start, "const  ".len());
    }

    #[test]
    fn test_strips_const_nearest_column() {
        let text = "    child: const Padding(padding: const EdgeInsets.all(8)),\n";
        // column of the second const (1-based)
        let col = text.find("const EdgeInsets").unwrap() + 1;
        let outcome = InvalidConstRemover::new().fix(text, &[invalid(1, col)]);

        assert_eq!(outcome.applied, 1);
        assert_eq!(
            outcome.text,
            "    child: const Padding(padding: EdgeInsets.all(8)),\n"
        );
    }

    #[test]
    fn test_falls_back_to_first_const_on_line() {
        let text = "const x = Foo(bar, baz, qux, quux, corge, grault, garply, waldo);\n";
        let outcome = InvalidConstRemover::new().fix(text, &[invalid(1, 60)]);

        assert_eq!(outcome.applied, 1);
        assert!(outcome.text.starts_with("x = Foo("));
    }

    #[test]
    fn test_out_of_range_and_missing_const_are_noted() {
        let text = "Text('a');\n";
        let outcome = InvalidConstRemover::new().fix(text, &[invalid(5, 1), invalid(1, 1)]);

        assert_eq!(outcome.text, text);
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.notes.len(), 2);
        assert!(outcome.notes[0].contains("out of range"));
        assert!(outcome.notes[1].contains("could not find const"));
    }

    #[test]
    fn test_bottom_up_edits_on_separate_lines() {
        let text = "const A();\nconst B();\n";
        let outcome = InvalidConstRemover::new().fix(text, &[invalid(2, 1), invalid(1, 1)]);
        assert_eq!(outcome.text, "A();\nB();\n");
        assert_eq!(outcome.applied, 2);
    }
}
