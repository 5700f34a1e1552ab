// Foundation import relocator (scan-based)
//
// Earlier bulk edits left `import 'package:flutter/foundation.dart';` in the
// middle of files, which Dart rejects. Drop every copy below the header and,
// unless the header already has one, re-add it after the last leading
// `package:flutter/` import.

use super::dart::{after_last_header_match, header_len, import_insertion_point, is_import_of};
use super::text::SourceLines;
use super::{FixOutcome, ScanFixer};

pub const FOUNDATION_URI: &str = "package:flutter/foundation.dart";
pub const FOUNDATION_IMPORT: &str = "import 'package:flutter/foundation.dart';";

pub struct FoundationImportRelocator;

impl FoundationImportRelocator {
    pub fn new() -> Self {
        FoundationImportRelocator
    }
}

impl Default for FoundationImportRelocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanFixer for FoundationImportRelocator {
    fn name(&self) -> &'static str {
        "foundation-imports"
    }

    fn fix(&self, text: &str) -> FixOutcome {
        let mut lines = SourceLines::parse(text);
        let header = header_len(&lines);

        let misplaced: Vec<usize> = lines
            .iter()
            .enumerate()
            .skip(header)
            .filter(|(_, l)| is_import_of(l, FOUNDATION_URI))
            .map(|(i, _)| i)
            .collect();

        if misplaced.is_empty() {
            return FixOutcome::unchanged(text);
        }

        let at_top = lines.iter().take(header).any(|l| is_import_of(l, FOUNDATION_URI));

        for idx in misplaced.iter().rev() {
            lines.remove(*idx);
        }

        if !at_top {
            let at = after_last_header_match(&lines, |l| {
                l.trim_start().starts_with("import 'package:flutter/")
            })
            .unwrap_or_else(|| import_insertion_point(&lines));
            lines.insert(at, FOUNDATION_IMPORT);
        }

        FixOutcome {
            text: lines.to_text(),
            applied: misplaced.len(),
            notes: Vec::new(),
        }
    }
}
