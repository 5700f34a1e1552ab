// Source discovery under a project directory

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never worth scanning
const SKIP_DIRS: [&str; 4] = [".dart_tool", "build", ".git", "node_modules"];

/// All files below `root` with the given extension, sorted.
/// Unreadable entries are skipped.
pub fn files_with_extension(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some(extension))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| SKIP_DIRS.contains(&name))
}

pub fn dart_files(root: &Path) -> Vec<PathBuf> {
    files_with_extension(root, "dart")
}
