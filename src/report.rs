// 📊 Reports - JSON run report, CSV finding list, console summary

use crate::analyzer::Finding;
use crate::runner::FixReport;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Pretty JSON of any serializable report
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

/// One CSV row per finding: severity,message,file,line,column,rule
pub fn write_findings_csv(findings: &[Finding], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV: {}", path.display()))?;

    for finding in findings {
        writer.serialize(finding).context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Console summary in the same shape for every fixer
pub fn print_summary(report: &FixReport) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("🩹 {}{}", report.fixer, if report.dry_run { " (dry run)" } else { "" });
    if let Some(source) = &report.source {
        println!("   source: {}", source);
    }
    if let Some(stats) = &report.parse {
        println!(
            "   analyzer lines: {} ({} parsed, {} unrecognized)",
            stats.lines, stats.parsed, stats.unrecognized
        );
    }
    println!("   findings handled: {}", report.findings.len());

    for file in report.files.iter().filter(|f| f.changed()) {
        let verb = if file.written { "Fixed" } else { "Would fix" };
        println!("   {} {} ({} edits)", verb, file.path, file.applied);
    }

    println!(
        "✓ {} edits in {} files",
        report.edits_applied(),
        report.files_changed()
    );

    if !report.failures.is_empty() {
        println!("⚠️  {} files skipped:", report.failures.len());
        for failure in &report.failures {
            println!("   - {}: {}", failure.path, failure.error);
        }
    }

    match &report.remaining {
        Some(remaining) if remaining.is_empty() => println!("✅ Re-check clean: no findings left"),
        Some(remaining) => {
            println!("⚠️  {} findings remain after re-check", remaining.len());
            for finding in remaining.iter().take(10) {
                println!("   {}:{} - {}", finding.file, finding.line, finding.message);
            }
        }
        None => {}
    }
}
