// 🩹 Text Patchers - localized edits driven by findings or by a scan
//
// Two seams:
// - FindingFixer: needs analyzer findings (positions) for one file
// - ScanFixer: inspects the file text on its own
//
// Both are pure text → text; file IO lives in `apply`.

pub mod apply;
pub mod const_misuse;
pub mod context_guard;
pub mod dart;
pub mod foundation_import;
pub mod invalid_const;
pub mod material_import;
pub mod text;
pub mod unused_import;

use crate::analyzer::Finding;
use serde::Serialize;

pub use apply::{apply_to_file, fingerprint, FileChange};
pub use const_misuse::ConstMisuseStripper;
pub use context_guard::ContextGuardInserter;
pub use foundation_import::FoundationImportRelocator;
pub use invalid_const::InvalidConstRemover;
pub use material_import::MaterialImportAdder;
pub use unused_import::UnusedImportRemover;

/// Result of running one fixer over one file's text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixOutcome {
    pub text: String,
    /// Number of edits applied
    pub applied: usize,
    /// Why individual findings were left alone
    pub notes: Vec<String>,
}

impl FixOutcome {
    pub fn unchanged(text: &str) -> Self {
        FixOutcome {
            text: text.to_string(),
            applied: 0,
            notes: Vec::new(),
        }
    }

    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Fixer driven by analyzer findings
pub trait FindingFixer {
    /// Short name for logs and reports
    fn name(&self) -> &'static str;

    /// Analyzer rule ids this fixer handles
    fn rules(&self) -> &'static [&'static str];

    /// Apply edits for `findings` (one file, descending line order)
    fn fix(&self, text: &str, findings: &[Finding]) -> FixOutcome;
}

/// Fixer that needs no analyzer run
pub trait ScanFixer {
    fn name(&self) -> &'static str;

    fn fix(&self, text: &str) -> FixOutcome;
}
