use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use jive_devtools::analyzer::{CommandSource, DiagnosticSource, ReportFileSource, SavingSource};
use jive_devtools::db::{self, ImportSummary, IconUpdateSummary};
use jive_devtools::entities::{load_icon_mappings, HierarchyFile};
use jive_devtools::patch::{
    ConstMisuseStripper, ContextGuardInserter, FindingFixer, FoundationImportRelocator,
    InvalidConstRemover, MaterialImportAdder, ScanFixer, UnusedImportRemover,
};
use jive_devtools::report::{print_summary, write_findings_csv, write_json};
use jive_devtools::runner::{run_finding_fixer, run_scan_fixer, FixReport, RunOptions};
use jive_devtools::verify::{print_verify_report, verify_structure, Manifest};
use jive_devtools::{logging, Config};

#[derive(Parser, Debug)]
#[command(name = "jive-devtools", version)]
#[command(about = "Jive maintenance tools: analyzer-driven Dart fixes, category seeding, structure checks")]
struct Cli {
    /// Flutter project root (overrides JIVE_PROJECT_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove imports the analyzer reports as unused
    UnusedImports(FindingArgs),
    /// Strip `const` where the analyzer reports an invalid constant
    InvalidConst(FindingArgs),
    /// Insert mounted guards after awaits before BuildContext use
    ContextGuards(FindingArgs),
    /// Remove `const` before targeted constructors
    ConstMisuse {
        #[command(flatten)]
        scan: ScanArgs,
        /// Constructor names to target
        #[arg(long, value_delimiter = ',', default_values_t = ["Text".to_string(), "Icon".to_string()])]
        targets: Vec<String>,
    },
    /// Add the material.dart import where Material symbols are used
    MaterialImports(ScanArgs),
    /// Move stray foundation.dart imports into the import header
    FoundationImports(ScanArgs),
    /// Load the category hierarchy into system_category_templates
    ImportCategories {
        #[command(flatten)]
        db: DbArgs,
        /// Hierarchy JSON (overrides JIVE_HIERARCHY_FILE)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Append instead of clearing existing templates
        #[arg(long)]
        keep_existing: bool,
    },
    /// Point templates at icon files from the icon mapping
    UpdateIcons {
        #[command(flatten)]
        db: DbArgs,
        /// Icon mapping JSON (overrides JIVE_ICON_MAPPINGS_FILE)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Icon directory (overrides JIVE_ICONS_DIR)
        #[arg(long)]
        icons_dir: Option<PathBuf>,
    },
    /// Check expected project files and count code lines
    Verify {
        /// JSON manifest replacing the built-in Jive layout
        #[arg(long)]
        manifest: Option<PathBuf>,
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// Exit 1 when a critical check fails
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Args, Debug)]
struct FindingArgs {
    /// Read a captured analyzer report instead of running the analyzer.
    /// Without a path the configured report candidates are tried.
    #[arg(long, num_args = 0..=1)]
    from_file: Option<Option<PathBuf>>,

    /// Keep the analyzer output for later --from-file runs
    #[arg(long)]
    save_report: Option<PathBuf>,

    /// Re-run the analyzer afterwards and report what is left
    #[arg(long)]
    recheck: bool,

    /// Compute edits without writing files
    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    report_json: Option<PathBuf>,

    #[arg(long)]
    report_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Write changes (scan fixers only report by default)
    #[arg(long)]
    apply: bool,

    #[arg(long)]
    report_json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DbArgs {
    /// SQLite database (overrides JIVE_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn main() {
    logging::init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(root) = cli.root {
        config = config.with_project_root(root);
    }

    if let Err(e) = run(cli.command, &config) {
        error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::UnusedImports(args) => run_finding(config, &UnusedImportRemover::new(), args),
        Command::InvalidConst(args) => run_finding(config, &InvalidConstRemover::new(), args),
        Command::ContextGuards(args) => run_finding(config, &ContextGuardInserter::new(), args),
        Command::ConstMisuse { scan, targets } => run_scan(config, &ConstMisuseStripper::new(&targets)?, scan),
        Command::MaterialImports(scan) => run_scan(config, &MaterialImportAdder::new()?, scan),
        Command::FoundationImports(scan) => run_scan(config, &FoundationImportRelocator::new(), scan),
        Command::ImportCategories { db, file, keep_existing } => run_import_categories(config, db, file, keep_existing),
        Command::UpdateIcons { db, file, icons_dir } => run_update_icons(config, db, file, icons_dir),
        Command::Verify { manifest, report_json, strict } => run_verify(config, manifest, report_json, strict),
    }
}

// ============================================================================
// SOURCE FIXES
// ============================================================================

fn diagnostic_source(config: &Config, args: &FindingArgs) -> Result<Box<dyn DiagnosticSource>> {
    let source: Box<dyn DiagnosticSource> = match &args.from_file {
        Some(Some(path)) => Box::new(ReportFileSource::single(path)),
        Some(None) => Box::new(ReportFileSource::new(config.report_candidates.clone())),
        None => {
            let (program, argv) = config.analyzer_argv()?;
            Box::new(CommandSource::new(program, argv, &config.project_root))
        }
    };

    Ok(match &args.save_report {
        Some(path) => Box::new(SavingSource::new(source, path)),
        None => source,
    })
}

fn run_finding(config: &Config, fixer: &dyn FindingFixer, args: FindingArgs) -> Result<()> {
    config.ensure_project_root()?;

    let source = diagnostic_source(config, &args)?;
    let options = RunOptions {
        dry_run: args.dry_run,
        recheck: args.recheck,
    };

    let report = run_finding_fixer(config, source.as_ref(), fixer, options)?;
    print_summary(&report);

    if let Some(path) = &args.report_csv {
        write_findings_csv(&report.findings, path)?;
        println!("✓ Findings written to {}", path.display());
    }
    write_fix_report(&report, args.report_json.as_ref())
}

fn run_scan(config: &Config, fixer: &dyn ScanFixer, args: ScanArgs) -> Result<()> {
    config.ensure_project_root()?;

    let options = RunOptions {
        dry_run: !args.apply,
        recheck: false,
    };

    let report = run_scan_fixer(&config.lib_dir(), fixer, options)?;
    print_summary(&report);
    if options.dry_run && report.files_changed() > 0 {
        println!("   (re-run with --apply to write changes)");
    }

    write_fix_report(&report, args.report_json.as_ref())
}

fn write_fix_report(report: &FixReport, path: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = path {
        write_json(report, path)?;
        println!("✓ Report written to {}", path.display());
    }
    Ok(())
}

// ============================================================================
// CATEGORY SEEDING
// ============================================================================

fn run_import_categories(config: &Config, args: DbArgs, file: Option<PathBuf>, keep_existing: bool) -> Result<()> {
    println!("🏷️  Category hierarchy → system_category_templates");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let hierarchy_path = file.unwrap_or_else(|| config.hierarchy_file.clone());
    println!("\n📂 Loading {}...", hierarchy_path.display());
    let hierarchy = HierarchyFile::load(&hierarchy_path)?;

    let db_path = args.db.unwrap_or_else(|| config.db_path.clone());
    println!("\n🔧 Opening {}...", db_path.display());
    let mut conn = db::open_database(&db_path)?;

    println!("\n💾 Importing{}...", if keep_existing { "" } else { " (clearing existing templates)" });
    let summary = db::import_hierarchy(&mut conn, &hierarchy, !keep_existing)?;
    print_import_summary(&summary);

    if let Some(path) = &args.report_json {
        write_json(&summary, path)?;
    }
    Ok(())
}

fn print_import_summary(summary: &ImportSummary) {
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Import Summary:");
    if summary.cleared > 0 {
        println!("  - Cleared: {}", summary.cleared);
    }
    println!("  - Total categories imported: {}", summary.imported);

    for stat in &summary.stats {
        println!("\n  {}:", stat.category_type);
        println!("    - Parent categories: {}", stat.parents);
        println!("    - Child categories: {}", stat.children);
        println!("    - Total: {}", stat.total);
    }
}

fn run_update_icons(config: &Config, args: DbArgs, file: Option<PathBuf>, icons_dir: Option<PathBuf>) -> Result<()> {
    println!("🖼️  Category icon update");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mappings_path = file.unwrap_or_else(|| config.icon_mappings_file.clone());
    let icons = load_icon_mappings(&mappings_path)?;
    println!("✓ Found {} categories with icons", icons.len());

    let icons_dir = icons_dir.unwrap_or_else(|| config.icons_dir.clone());
    let db_path = args.db.unwrap_or_else(|| config.db_path.clone());
    let mut conn = db::open_database(&db_path)?;

    let summary = db::update_icons(&mut conn, &icons, &icons_dir)?;
    print_icon_summary(&summary);

    if let Some(path) = &args.report_json {
        write_json(&summary, path)?;
    }
    Ok(())
}

fn print_icon_summary(summary: &IconUpdateSummary) {
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Update Summary:");
    println!("  - Total categories with icons: {}", summary.mapped);
    println!("  - Records updated: {}", summary.updated);
    println!("  - Missing icon files: {}", summary.missing.len());

    if !summary.missing.is_empty() {
        println!("\n⚠️  Missing icon files:");
        for missing in summary.missing.iter().take(10) {
            println!("    - {}: {}", missing.category_name, missing.icon_file);
        }
        if summary.missing.len() > 10 {
            println!("    ... and {} more", summary.missing.len() - 10);
        }
    }

    if !summary.without_icon.is_empty() {
        println!("\n📋 Categories without icons: {}", summary.without_icon.len());
        for name in summary.without_icon.iter().take(10) {
            println!("    - {}", name);
        }
        if summary.without_icon.len() > 10 {
            println!("    ... and {} more", summary.without_icon.len() - 10);
        }
    }
}

// ============================================================================
// STRUCTURE
// ============================================================================

fn run_verify(config: &Config, manifest: Option<PathBuf>, report_json: Option<PathBuf>, strict: bool) -> Result<()> {
    config.ensure_project_root()?;

    let manifest = match manifest {
        Some(path) => Manifest::load(&path)?,
        None => Manifest::jive_default(),
    };

    let report = verify_structure(&config.project_root, &manifest);
    print_verify_report(&report);

    if let Some(path) = &report_json {
        write_json(&report, path)?;
    }

    if strict && report.failed() > 0 {
        anyhow::bail!("{} critical structure checks failed", report.failed());
    }
    Ok(())
}
