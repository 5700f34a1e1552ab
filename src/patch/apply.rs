// File-level application of a text fixer.
// Each file is read once, patched in memory and written once (only if changed).

use super::FixOutcome;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// What happened to one file
#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    pub path: String,
    pub applied: usize,
    pub written: bool,
    /// SHA-256 of the content before/after the edit
    pub before: String,
    pub after: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl FileChange {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Hex SHA-256 of file content
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Read `path`, run `fix` on its text, write back unless `dry_run`
pub fn apply_to_file<F>(path: &Path, dry_run: bool, fix: F) -> Result<FileChange>
where
    F: FnOnce(&str) -> FixOutcome,
{
    let original = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;

    let outcome = fix(&original);
    let changed = outcome.changed(&original);

    let written = changed && !dry_run;
    if written {
        fs::write(path, &outcome.text)
            .with_context(|| format!("Failed to write source file: {}", path.display()))?;
        info!("patched {} ({} edits)", path.display(), outcome.applied);
    } else if changed {
        info!("would patch {} ({} edits)", path.display(), outcome.applied);
    } else {
        debug!("no change for {}", path.display());
    }

    for note in &outcome.notes {
        debug!("{}", note);
    }

    Ok(FileChange {
        path: path.display().to_string(),
        applied: outcome.applied,
        written,
        before: fingerprint(&original),
        after: fingerprint(&outcome.text),
        notes: outcome.notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(text: &str) -> FixOutcome {
        FixOutcome {
            text: text.to_uppercase(),
            applied: 1,
            notes: vec!["upper".to_string()],
        }
    }

    #[test]
    fn test_apply_writes_when_changed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.dart");
        fs::write(&path, "abc\n").unwrap();

        let change = apply_to_file(&path, false, upper).unwrap();

        assert!(change.written);
        assert!(change.changed());
        assert_eq!(fs::read_to_string(&path).unwrap(), "ABC\n");
        assert_eq!(change.before, fingerprint("abc\n"));
        assert_eq!(change.after, fingerprint("ABC\n"));
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.dart");
        fs::write(&path, "abc\n").unwrap();

        let change = apply_to_file(&path, true, upper).unwrap();

        assert!(!change.written);
        assert!(change.changed());
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc\n");
    }

    #[test]
    fn test_unchanged_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.dart");
        fs::write(&path, "ABC\n").unwrap();

        let change = apply_to_file(&path, false, FixOutcome::unchanged).unwrap();
        assert!(!change.written);
        assert!(!change.changed());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = apply_to_file(&dir.path().join("nope.dart"), false, upper).unwrap_err();
        assert!(err.to_string().contains("Failed to read source file"));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("x"), fingerprint("x"));
        assert_ne!(fingerprint("x"), fingerprint("y"));
        assert_eq!(fingerprint("").len(), 64);
    }
}
