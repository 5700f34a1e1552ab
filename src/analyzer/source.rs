// 📥 Diagnostic Sources - where raw analyzer text comes from
//
// Either run the analyzer as a subprocess or read a report captured earlier.

use crate::error::ToolError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Produces raw analyzer output
pub trait DiagnosticSource {
    /// Read the full analyzer output as text
    fn read(&self) -> Result<String>;

    /// Human-readable origin for logs and reports
    fn describe(&self) -> String;
}

// ============================================================================
// SUBPROCESS
// ============================================================================

/// Runs the analyzer. stdout and stderr are both kept: depending on the
/// Flutter version, diagnostics land on either stream.
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandSource {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        CommandSource {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }
}

impl DiagnosticSource for CommandSource {
    fn read(&self) -> Result<String> {
        info!("running analyzer: {} in {}", self.describe(), self.cwd.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .output()
            .map_err(|source| ToolError::AnalyzerSpawn {
                command: self.describe(),
                source,
            })?;

        // Non-zero exit just means "issues found"
        debug!("analyzer exited with {}", output.status);

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        Ok(text)
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// PRE-CAPTURED REPORT
// ============================================================================

/// Reads the first existing report out of a candidate list
pub struct ReportFileSource {
    candidates: Vec<PathBuf>,
}

impl ReportFileSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        ReportFileSource { candidates }
    }

    pub fn single(path: impl Into<PathBuf>) -> Self {
        ReportFileSource {
            candidates: vec![path.into()],
        }
    }

    /// First candidate that exists on disk
    pub fn resolve(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.is_file())
    }
}

impl DiagnosticSource for ReportFileSource {
    fn read(&self) -> Result<String> {
        let path = self
            .resolve()
            .ok_or_else(|| ToolError::no_source(&self.candidates))?;

        info!("reading analyzer report {}", path.display());
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read analyzer report: {}", path.display()))
    }

    fn describe(&self) -> String {
        match self.resolve() {
            Some(path) => path.display().to_string(),
            None => "<no report>".to_string(),
        }
    }
}

// ============================================================================
// IN-MEMORY
// ============================================================================

/// Already-captured text (re-use of one analyzer run, tests)
pub struct TextSource {
    text: String,
}

impl TextSource {
    pub fn new(text: impl Into<String>) -> Self {
        TextSource { text: text.into() }
    }
}

impl DiagnosticSource for TextSource {
    fn read(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "<captured text>".to_string()
    }
}

/// Wraps another source and writes every read to `path`
pub struct SavingSource {
    inner: Box<dyn DiagnosticSource>,
    path: PathBuf,
}

impl SavingSource {
    pub fn new(inner: Box<dyn DiagnosticSource>, path: impl Into<PathBuf>) -> Self {
        SavingSource {
            inner,
            path: path.into(),
        }
    }
}

impl DiagnosticSource for SavingSource {
    fn read(&self) -> Result<String> {
        let text = self.inner.read()?;
        save_report(&self.path, &text)?;
        Ok(text)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

/// Persist captured analyzer output for later `--from-file` runs
pub fn save_report(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(path, text).with_context(|| format!("Failed to write analyzer report: {}", path.display()))?;
    info!("saved analyzer report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_source_picks_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let present = dir.path().join("artifacts").join("analyzer_output.txt");

        save_report(&present, "warning • x • lib/a.dart:1:1 • unused_import\n").unwrap();

        let source = ReportFileSource::new(vec![missing, present.clone()]);
        assert_eq!(source.resolve(), Some(present.as_path()));
        assert!(source.read().unwrap().contains("unused_import"));
    }

    #[test]
    fn test_report_source_without_candidates_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = ReportFileSource::single(dir.path().join("nope.txt"));

        let err = source.read().unwrap_err();
        assert!(err.to_string().contains("no analyzer output found"));
        assert_eq!(source.describe(), "<no report>");
    }

    #[test]
    fn test_saving_source_writes_each_read() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("out").join("analyzer_output.txt");
        let source = SavingSource::new(Box::new(TextSource::new("info • m • lib/a.dart:1:1 • r\n")), &saved);

        let text = source.read().unwrap();

        assert_eq!(fs::read_to_string(&saved).unwrap(), text);
        assert_eq!(source.describe(), "<captured text>");
    }

    #[test]
    fn test_command_source_describe() {
        let source = CommandSource::new(
            "flutter",
            vec!["analyze".to_string(), "--no-fatal-infos".to_string()],
            ".",
        );
        assert_eq!(source.describe(), "flutter analyze --no-fatal-infos");
    }

    #[test]
    fn test_command_source_missing_program() {
        let source = CommandSource::new("definitely-not-an-analyzer-binary", vec![], ".");
        let err = source.read().unwrap_err();
        assert!(err.to_string().contains("failed to launch analyzer"));
    }

    #[test]
    fn test_text_source_roundtrip() {
        let source = TextSource::new("abc");
        assert_eq!(source.read().unwrap(), "abc");
    }
}
