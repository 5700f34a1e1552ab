// ⚙️ Configuration - environment first, CLI flags override
//
// Every setting has a default so the tool runs from a Flutter project root
// without any environment prepared.

use crate::error::ToolError;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_ANALYZER_CMD: &str = "flutter analyze --no-fatal-infos";
pub const DEFAULT_DB_PATH: &str = "jive_money.db";
pub const DEFAULT_REPORT_PATHS: [&str; 2] = ["/tmp/analyzer_output.txt", "artifacts/analyzer_output.txt"];
pub const DEFAULT_HIERARCHY_FILE: &str = "resources/category_hierarchy.json";
pub const DEFAULT_ICON_MAPPINGS_FILE: &str = "resources/category_icon_mappings.json";
pub const DEFAULT_ICONS_DIR: &str = "assets/icons/categories";

#[derive(Debug, Clone)]
pub struct Config {
    /// Flutter project root (the directory holding `lib/`)
    pub project_root: PathBuf,

    /// Analyzer invocation, split on whitespace before spawning
    pub analyzer_cmd: String,

    /// Pre-captured analyzer reports, first existing one wins
    pub report_candidates: Vec<PathBuf>,

    /// SQLite database holding `system_category_templates`
    pub db_path: PathBuf,

    pub hierarchy_file: PathBuf,
    pub icon_mappings_file: PathBuf,
    pub icons_dir: PathBuf,

    /// Prefix stripped from analyzer paths when run from the monorepo root
    pub path_prefix: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_root: PathBuf::from("."),
            analyzer_cmd: DEFAULT_ANALYZER_CMD.to_string(),
            report_candidates: DEFAULT_REPORT_PATHS.iter().map(PathBuf::from).collect(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            hierarchy_file: PathBuf::from(DEFAULT_HIERARCHY_FILE),
            icon_mappings_file: PathBuf::from(DEFAULT_ICON_MAPPINGS_FILE),
            icons_dir: PathBuf::from(DEFAULT_ICONS_DIR),
            path_prefix: Some("jive-flutter/".to_string()),
        }
    }
}

impl Config {
    /// Build config from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(root) = lookup("JIVE_PROJECT_ROOT") {
            config.project_root = PathBuf::from(root);
        }
        if let Some(cmd) = lookup("JIVE_ANALYZER_CMD") {
            config.analyzer_cmd = cmd;
        }
        if let Some(report) = lookup("JIVE_ANALYZER_REPORT") {
            config.report_candidates.insert(0, PathBuf::from(report));
        }
        if let Some(db) = lookup("JIVE_DB_PATH") {
            config.db_path = PathBuf::from(db);
        }
        if let Some(path) = lookup("JIVE_HIERARCHY_FILE") {
            config.hierarchy_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("JIVE_ICON_MAPPINGS_FILE") {
            config.icon_mappings_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("JIVE_ICONS_DIR") {
            config.icons_dir = PathBuf::from(path);
        }
        if let Some(prefix) = lookup("JIVE_PATH_PREFIX") {
            config.path_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        }

        config
    }

    /// Override project root (CLI `--root`)
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// `lib/` under the project root
    pub fn lib_dir(&self) -> PathBuf {
        self.project_root.join("lib")
    }

    /// Resolve a path reported by the analyzer against the project root.
    /// A relative path missing under the root is retried under the monorepo
    /// prefix (`<root>/jive-flutter/<path>`), so runs from the monorepo root work.
    pub fn resolve(&self, reported: &str) -> PathBuf {
        let path = Path::new(reported);
        if path.is_absolute() {
            return path.to_path_buf();
        }

        let direct = self.project_root.join(path);
        if direct.exists() {
            return direct;
        }

        match self.path_prefix.as_deref().map(|p| p.trim_end_matches('/')) {
            Some(prefix) if !prefix.is_empty() => {
                let prefixed = self.project_root.join(prefix).join(path);
                if prefixed.exists() {
                    prefixed
                } else {
                    direct
                }
            }
            _ => direct,
        }
    }

    /// Analyzer command split into program and arguments
    pub fn analyzer_argv(&self) -> Result<(String, Vec<String>), ToolError> {
        let mut parts = self.analyzer_cmd.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ToolError::EmptyAnalyzerCommand)?;
        Ok((program, parts.collect()))
    }

    pub fn ensure_project_root(&self) -> Result<(), ToolError> {
        if self.project_root.is_dir() {
            Ok(())
        } else {
            Err(ToolError::MissingProjectRoot(self.project_root.clone()))
        }
    }
}

/// Parse a boolean-ish environment value ("1", "true", "yes", "on")
pub fn parse_bool(key: &'static str, value: &str) -> Result<bool, ToolError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ToolError::InvalidSetting {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.analyzer_cmd, DEFAULT_ANALYZER_CMD);
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.report_candidates.len(), 2);
        assert_eq!(config.path_prefix.as_deref(), Some("jive-flutter/"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("JIVE_PROJECT_ROOT", "/work/jive-flutter"),
            ("JIVE_DB_PATH", "/data/jive.db"),
            ("JIVE_ANALYZER_REPORT", "/work/report.txt"),
            ("JIVE_PATH_PREFIX", ""),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.project_root, PathBuf::from("/work/jive-flutter"));
        assert_eq!(config.db_path, PathBuf::from("/data/jive.db"));
        assert_eq!(config.report_candidates[0], PathBuf::from("/work/report.txt"));
        assert_eq!(config.report_candidates.len(), 3);
        assert!(config.path_prefix.is_none());
    }

    #[test]
    fn test_analyzer_argv() {
        let config = Config::default();
        let (program, args) = config.analyzer_argv().unwrap();
        assert_eq!(program, "flutter");
        assert_eq!(args, vec!["analyze", "--no-fatal-infos"]);

        let mut empty = Config::default();
        empty.analyzer_cmd = "   ".to_string();
        assert!(matches!(empty.analyzer_argv(), Err(ToolError::EmptyAnalyzerCommand)));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let config = Config::default().with_project_root("/work/app");
        assert_eq!(config.resolve("lib/a.dart"), PathBuf::from("/work/app/lib/a.dart"));
        assert_eq!(config.resolve("/abs/b.dart"), PathBuf::from("/abs/b.dart"));
    }

    #[test]
    fn test_resolve_falls_back_to_prefixed_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("jive-flutter/lib")).unwrap();
        std::fs::write(dir.path().join("jive-flutter/lib/a.dart"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib/b.dart"), "").unwrap();

        let config = Config::default().with_project_root(dir.path());
        assert_eq!(config.resolve("lib/a.dart"), dir.path().join("jive-flutter/lib/a.dart"));
        assert_eq!(config.resolve("lib/b.dart"), dir.path().join("lib/b.dart"));
        // neither exists: the direct path is reported
        assert_eq!(config.resolve("lib/c.dart"), dir.path().join("lib/c.dart"));

        let mut no_prefix = config.clone();
        no_prefix.path_prefix = None;
        assert_eq!(no_prefix.resolve("lib/a.dart"), dir.path().join("lib/a.dart"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "1").unwrap());
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
