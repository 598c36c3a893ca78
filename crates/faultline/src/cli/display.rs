//! Common display utilities for CLI commands.

use colored::{ColoredString, Colorize};
use faultline::analysis::AssetSummary;
use faultline::domain::{AssetStatus, Severity};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Severity label colored by urgency.
pub fn severity(severity: Severity) -> ColoredString {
    let label = severity.as_str().to_uppercase();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.green(),
    }
}

/// Status label colored by health.
pub fn status(status: &AssetStatus) -> ColoredString {
    let label = status.as_str();
    if status.is_down() {
        label.red()
    } else if status.is_unhealthy() {
        label.yellow()
    } else if status.is_operational() {
        label.green()
    } else {
        label.normal()
    }
}

/// `Name (Type, status)`.
pub fn asset(summary: &AssetSummary) -> String {
    format!(
        "{} ({}, {})",
        summary.name.white().bold(),
        summary.asset_type,
        status(&summary.status)
    )
}

/// Print bulleted lines, truncated after `MAX_DISPLAY_ITEMS`.
///
/// If `lines` is empty, prints `empty_message` instead.
pub fn print_list(lines: &[String], empty_message: &str) {
    if lines.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for line in lines.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {line}", "•".dimmed());
    }

    if lines.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            lines.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// `Name (Type, status) at N hop(s)`.
pub fn reached(summary: &AssetSummary, distance: usize) -> String {
    format!("{} at {distance} hop(s)", asset(summary))
}
