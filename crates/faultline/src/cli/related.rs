//! `faultline related` command implementation.

use anyhow::Result;
use colored::Colorize;

use super::Options;
use super::display::{self, print_list};

/// Run the related command.
pub async fn run(options: &Options, name: &str) -> Result<()> {
    let (engine, _) = options.open_engine().await?;
    let incidents = engine.related_incidents(name).await?;

    if options.json {
        return super::print_json(&incidents);
    }

    println!(
        "Related incidents for {} ({}):",
        name.cyan().bold(),
        incidents.len().to_string().yellow()
    );
    println!();
    let lines: Vec<String> = incidents
        .iter()
        .map(|incident| {
            let when = incident
                .asset
                .last_failure
                .map_or_else(|| "unknown time".to_string(), |t| t.to_rfc3339());
            format!(
                "{} {}  {}",
                display::severity(incident.severity),
                display::reached(&incident.asset, incident.distance),
                when.dimmed()
            )
        })
        .collect();
    print_list(&lines, "(no unhealthy assets nearby)");
    Ok(())
}
