// Material import adder (scan-based)
//
// Files that reference Icons/Colors/Material buttons but never import
// `package:flutter/material.dart` get the import after their leading
// import block. `widgets.dart` alone does not count: it lacks Icons/Colors.

use super::dart::import_insertion_point;
use super::text::SourceLines;
use super::{FixOutcome, ScanFixer};
use anyhow::{Context, Result};
use regex::Regex;

pub const MATERIAL_URI: &str = "package:flutter/material.dart";
pub const MATERIAL_IMPORT: &str = "import 'package:flutter/material.dart';";

const NEEDLES: &str = r"\bIcons\.|\bColors\.|\bElevatedButton\b|\bOutlinedButton\b|\bTextButton\b";

pub struct MaterialImportAdder {
    needles: Regex,
}

impl MaterialImportAdder {
    pub fn new() -> Result<Self> {
        Ok(MaterialImportAdder {
            needles: Regex::new(NEEDLES).context("Failed to build material needle pattern")?,
        })
    }

    pub fn needs_material(&self, text: &str) -> bool {
        !text.contains(MATERIAL_URI) && self.needles.is_match(text)
    }
}

impl ScanFixer for MaterialImportAdder {
    fn name(&self) -> &'static str {
        "material-imports"
    }

    fn fix(&self, text: &str) -> FixOutcome {
        if !self.needs_material(text) {
            return FixOutcome::unchanged(text);
        }

        let mut lines = SourceLines::parse(text);
        let at = import_insertion_point(&lines);
        lines.insert(at, MATERIAL_IMPORT);

        FixOutcome {
            text: lines.to_text(),
            applied: 1,
            notes: Vec::new(),
        }
    }
}
