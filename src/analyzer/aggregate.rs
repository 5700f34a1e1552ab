// Finding Aggregator - filter, normalise paths, group per file, bottom-up order

use super::Finding;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which findings a fixer wants to see
#[derive(Debug, Clone)]
pub struct FindingFilter {
    /// Accepted rule ids; empty accepts every rule
    pub rules: Vec<String>,

    /// Only files under this prefix (after prefix stripping), e.g. `lib/`
    pub scope: Option<String>,

    /// Monorepo prefix removed from reported paths, e.g. `jive-flutter/`
    pub strip_prefix: Option<String>,

    /// Absolute paths under one of these become relative to it
    pub base_dirs: Vec<PathBuf>,
}

impl FindingFilter {
    pub fn for_rules(rules: &[&str]) -> Self {
        FindingFilter {
            rules: rules.iter().map(|r| r.to_string()).collect(),
            scope: Some("lib/".to_string()),
            strip_prefix: None,
            base_dirs: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_strip_prefix(mut self, prefix: Option<String>) -> Self {
        self.strip_prefix = prefix;
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dirs.push(dir.into());
        self
    }

    /// Normalise the reported path, or None when the finding is out of scope
    pub fn accept(&self, finding: &Finding) -> Option<Finding> {
        if !self.rules.is_empty() && !self.rules.iter().any(|r| r == &finding.rule) {
            return None;
        }

        let mut file = finding.file.replace('\\', "/");
        if let Some(rel) = self
            .base_dirs
            .iter()
            .find_map(|base| Path::new(&file).strip_prefix(base).ok())
        {
            file = rel.to_string_lossy().replace('\\', "/");
        }
        if let Some(prefix) = &self.strip_prefix {
            if let Some(rest) = file.strip_prefix(prefix.as_str()) {
                file = rest.to_string();
            }
        }

        if let Some(scope) = &self.scope {
            if !file.starts_with(scope.as_str()) {
                return None;
            }
        }

        let mut accepted = finding.clone();
        accepted.file = file;
        Some(accepted)
    }
}

/// Group accepted findings by file. Within a file: descending line, then
/// descending column, exact duplicates dropped. Bottom-up order keeps earlier
/// line numbers valid while edits shift the text below them.
pub fn group_by_file(findings: &[Finding], filter: &FindingFilter) -> BTreeMap<String, Vec<Finding>> {
    let mut grouped: BTreeMap<String, Vec<Finding>> = BTreeMap::new();

    for finding in findings.iter().filter_map(|f| filter.accept(f)) {
        grouped.entry(finding.file.clone()).or_default().push(finding);
    }

    for file_findings in grouped.values_mut() {
        file_findings.sort_by(|a, b| {
            b.line
                .cmp(&a.line)
                .then(b.column.cmp(&a.column))
                .then(a.rule.cmp(&b.rule))
        });
        file_findings.dedup_by(|a, b| a.line == b.line && a.column == b.column && a.rule == b.rule);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Severity, RULE_BUILD_CONTEXT_SYNC, RULE_UNUSED_IMPORT};

    fn finding(file: &str, line: usize, column: usize, rule: &str) -> Finding {
        Finding::new(Severity::Warning, "msg", file, line, column, rule)
    }

    #[test]
    fn test_group_orders_descending_per_file() {
        let findings = vec![
            finding("lib/a.dart", 3, 1, RULE_UNUSED_IMPORT),
            finding("lib/b.dart", 7, 1, RULE_UNUSED_IMPORT),
            finding("lib/a.dart", 12, 1, RULE_UNUSED_IMPORT),
            finding("lib/a.dart", 5, 1, RULE_UNUSED_IMPORT),
        ];

        let grouped = group_by_file(&findings, &FindingFilter::for_rules(&[RULE_UNUSED_IMPORT]));

        assert_eq!(grouped.len(), 2);
        let lines: Vec<usize> = grouped["lib/a.dart"].iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![12, 5, 3]);
        assert_eq!(grouped["lib/b.dart"].len(), 1);
    }

    #[test]
    fn test_group_filters_rule_and_scope() {
        let findings = vec![
            finding("lib/a.dart", 3, 1, RULE_UNUSED_IMPORT),
            finding("lib/a.dart", 9, 4, RULE_BUILD_CONTEXT_SYNC),
            finding("test/a_test.dart", 2, 1, RULE_UNUSED_IMPORT),
        ];

        let grouped = group_by_file(&findings, &FindingFilter::for_rules(&[RULE_UNUSED_IMPORT]));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["lib/a.dart"].len(), 1);
        assert_eq!(grouped["lib/a.dart"][0].line, 3);
    }

    #[test]
    fn test_group_strips_monorepo_prefix_and_dedups() {
        let findings = vec![
            finding("jive-flutter/lib/a.dart", 4, 2, RULE_UNUSED_IMPORT),
            finding("jive-flutter/lib/a.dart", 4, 2, RULE_UNUSED_IMPORT),
            finding("jive-api/lib/x.dart", 1, 1, RULE_UNUSED_IMPORT),
        ];

        let filter = FindingFilter::for_rules(&[RULE_UNUSED_IMPORT])
            .with_strip_prefix(Some("jive-flutter/".to_string()));
        let grouped = group_by_file(&findings, &filter);

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["lib/a.dart"]);
        assert_eq!(grouped["lib/a.dart"].len(), 1);
    }

    #[test]
    fn test_absolute_paths_made_relative() {
        let findings = vec![
            finding("/work/jive/jive-flutter/lib/a.dart", 2, 1, RULE_UNUSED_IMPORT),
            finding("/elsewhere/lib/b.dart", 2, 1, RULE_UNUSED_IMPORT),
        ];
        let filter = FindingFilter::for_rules(&[RULE_UNUSED_IMPORT]).with_base_dir("/work/jive/jive-flutter");
        let grouped = group_by_file(&findings, &filter);

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["lib/a.dart"]);
    }

    #[test]
    fn test_empty_rule_list_accepts_everything_in_scope() {
        let findings = vec![
            finding("lib/a.dart", 1, 1, "anything"),
            finding("tool/x.dart", 1, 1, "anything"),
        ];
        let filter = FindingFilter::for_rules(&[]).with_scope(None);
        let grouped = group_by_file(&findings, &filter);
        assert_eq!(grouped.len(), 2);
    }
}
