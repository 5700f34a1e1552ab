// Context guard inserter for `use_build_context_synchronously`
//
// For a context use reported at line L:
//   1. find the nearest `await ` line at most AWAIT_LOOKBACK lines above L
//   2. walk forward to the end of that statement (first line ending in `;`)
//   3. insert a mounted check right after it, at the await line's indent
//
// `if (!mounted) return;` inside a State<...> class (within STATE_LOOKBACK
// lines above L), `if (!context.mounted) return;` elsewhere. Any line
// between the await and the use that already mentions `mounted` means the
// guard is there and nothing is inserted.

use super::text::SourceLines;
use super::{FindingFixer, FixOutcome};
use crate::analyzer::{Finding, RULE_BUILD_CONTEXT_SYNC};

const AWAIT_LOOKBACK: usize = 20;
const STATE_LOOKBACK: usize = 50;

pub const STATE_GUARD: &str = "if (!mounted) return;";
pub const CONTEXT_GUARD: &str = "if (!context.mounted) return;";

pub struct ContextGuardInserter;

impl ContextGuardInserter {
    pub fn new() -> Self {
        ContextGuardInserter
    }

    fn find_await(lines: &SourceLines, use_idx: usize) -> Option<usize> {
        let lower = use_idx.saturating_sub(AWAIT_LOOKBACK);
        (lower..use_idx)
            .rev()
            .find(|&i| lines.content(i).is_some_and(|l| l.contains("await ")))
    }

    fn statement_end(lines: &SourceLines, from: usize) -> Option<usize> {
        (from..lines.len()).find(|&i| lines.content(i).is_some_and(|l| l.trim_end().ends_with(';')))
    }

    fn in_state_class(lines: &SourceLines, use_idx: usize) -> bool {
        let lower = use_idx.saturating_sub(STATE_LOOKBACK);
        (lower..use_idx).any(|i| {
            lines
                .content(i)
                .is_some_and(|l| l.contains("class ") && l.contains("State<"))
        })
    }
}

impl Default for ContextGuardInserter {
    fn default() -> Self {
        Self::new()
    }
}

impl FindingFixer for ContextGuardInserter {
    fn name(&self) -> &'static str {
        "context-guards"
    }

    fn rules(&self) -> &'static [&'static str] {
        &[RULE_BUILD_CONTEXT_SYNC]
    }

    fn fix(&self, text: &str, findings: &[Finding]) -> FixOutcome {
        let mut lines = SourceLines::parse(text);
        let mut outcome = FixOutcome::unchanged(text);

        for finding in findings {
            let use_idx = finding.line_index();
            if use_idx >= lines.len() {
                outcome
                    .notes
                    .push(format!("{}: line out of range", finding.location()));
                continue;
            }

            let Some(await_idx) = Self::find_await(&lines, use_idx) else {
                outcome
                    .notes
                    .push(format!("{}: no await within {} lines", finding.location(), AWAIT_LOOKBACK));
                continue;
            };

            let guarded = (await_idx + 1..=use_idx)
                .any(|i| lines.content(i).is_some_and(|l| l.contains("mounted")));
            if guarded {
                outcome
                    .notes
                    .push(format!("{}: already guarded", finding.location()));
                continue;
            }

            let end_idx = match Self::statement_end(&lines, await_idx) {
                Some(end) if end < use_idx => end,
                _ => {
                    outcome.notes.push(format!(
                        "{}: context used inside the awaited statement",
                        finding.location()
                    ));
                    continue;
                }
            };

            let guard = if Self::in_state_class(&lines, use_idx) {
                STATE_GUARD
            } else {
                CONTEXT_GUARD
            };
            let indent = lines.indent(await_idx).to_string();

            lines.insert(end_idx + 1, &format!("{}{}", indent, guard));
            outcome.applied += 1;
        }

        outcome.text = lines.to_text();
        outcome
    }
}
