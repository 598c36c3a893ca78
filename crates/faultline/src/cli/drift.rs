//! `faultline drift` command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use faultline::analysis::{DriftRecord, DriftReport};

use super::Options;
use super::display;

/// Run the drift command.
pub async fn run(options: &Options) -> Result<()> {
    let (engine, config) = options.open_engine().await?;
    let report = engine.detect_drift().await.with_context(|| {
        format!("failed to read intent file {}", config.intent_file.display())
    })?;

    if options.json {
        return super::print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &DriftReport) {
    let summary = &report.summary;
    println!("{}", "Configuration Drift".cyan().bold());
    println!();
    println!(
        "  {}: {} drifted, {} in sync, {} unmanaged ({}% of compared assets drifted)",
        "Summary".white().bold(),
        summary.drifted_assets.to_string().red(),
        summary.in_sync_assets.to_string().green(),
        summary.unmanaged_assets.to_string().dimmed(),
        summary.drift_percentage
    );
    println!(
        "  {}: {}",
        "Critical mismatches".white().bold(),
        summary.critical_drifts
    );

    for record in &report.drifts {
        println!();
        print_record(record);
    }
}

fn print_record(record: &DriftRecord) {
    let overall = record
        .severity
        .map_or_else(|| "IN SYNC".green(), display::severity);
    println!("  {} {}", overall, record.asset.white().bold());

    for field in &record.fields {
        println!(
            "    {} {}: {} {} {}  {}",
            "•".dimmed(),
            field.field,
            field.intended.as_deref().unwrap_or("-"),
            "→".dimmed(),
            field.observed.as_deref().unwrap_or("-").yellow(),
            display::severity(field.severity)
        );
    }
    for action in &record.actions {
        let mode = if action.automated { "automated" } else { "manual" };
        println!(
            "    {} {:?} ({}, {mode})",
            "→".dimmed(),
            action.kind,
            action.priority
        );
    }
}
