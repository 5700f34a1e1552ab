// Jive Devtools - Core Library
// Exposes all modules for use in the CLI and integration tests

pub mod analyzer;   // Diagnostic sources, parser, per-file grouping
pub mod config;
pub mod db;         // system_category_templates (SQLite)
pub mod entities;   // Category templates + hierarchy JSON
pub mod error;
pub mod logging;
pub mod patch;      // Dart source fixers
pub mod report;
pub mod runner;     // Source → Parser → Aggregator → Patcher
pub mod verify;     // Project structure verification
pub mod workspace;

// Re-export commonly used types
pub use analyzer::{
    group_by_file, parse_report, CommandSource, DiagnosticParser, DiagnosticSource, Finding,
    FindingFilter, ParseStats, ReportFileSource, Severity, TextSource,
};
pub use config::Config;
pub use db::{
    categories_without_icons, import_hierarchy, open_database, setup_database, type_stats,
    update_icons, ImportSummary, IconUpdateSummary,
};
pub use entities::{CategoryTemplate, CategoryTree, CategoryType, HierarchyFile};
pub use error::ToolError;
pub use patch::{
    ConstMisuseStripper, ContextGuardInserter, FileChange, FindingFixer, FixOutcome,
    FoundationImportRelocator, InvalidConstRemover, MaterialImportAdder, ScanFixer,
    UnusedImportRemover,
};
pub use runner::{run_finding_fixer, run_scan_fixer, FixReport, RunOptions};
pub use verify::{verify_structure, Manifest, VerifyReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
