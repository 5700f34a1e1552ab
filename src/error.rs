// Typed failures callers may want to match on.
// Everything else flows through anyhow::Result with context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// None of the report candidates exist and no analyzer command was given
    #[error("no analyzer output found (tried: {tried}); run `flutter analyze > /tmp/analyzer_output.txt` first")]
    NoDiagnosticSource { tried: String },

    #[error("failed to launch analyzer `{command}`: {source}")]
    AnalyzerSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("analyzer command is empty")]
    EmptyAnalyzerCommand,

    #[error("project root does not exist: {0}")]
    MissingProjectRoot(PathBuf),

    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
}

impl ToolError {
    pub fn no_source(candidates: &[PathBuf]) -> Self {
        let tried = candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ToolError::NoDiagnosticSource { tried }
    }
}
