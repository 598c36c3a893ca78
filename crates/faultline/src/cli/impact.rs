//! `faultline impact` command implementation.

use anyhow::Result;
use colored::Colorize;
use faultline::analysis::CascadeImpact;

use super::Options;
use super::display::{self, print_list};

/// Run the impact command.
pub async fn run(options: &Options, name: &str) -> Result<()> {
    let (engine, _) = options.open_engine().await?;
    let impact = engine.analyze_cascade_impact(name).await?;

    if options.json {
        return super::print_json(&impact);
    }
    print_impact(&impact);
    Ok(())
}

fn print_impact(impact: &CascadeImpact) {
    println!(
        "Cascade impact for {}: {}",
        impact.source.name.cyan().bold(),
        display::severity(impact.severity)
    );
    println!();

    println!(
        "  {}: {} downstream, {} already failing, radius {} hop(s)",
        "Summary".white().bold(),
        impact.total_downstream.to_string().yellow(),
        impact.currently_affected.to_string().red(),
        impact.impact_radius
    );
    println!();

    let (failing, at_risk): (Vec<_>, Vec<_>) =
        impact.affected.iter().partition(|a| a.currently_affected);

    println!(
        "  {} ({}):",
        "Currently affected".white().bold(),
        failing.len().to_string().red()
    );
    let lines: Vec<String> = failing
        .iter()
        .map(|a| display::reached(&a.asset, a.distance))
        .collect();
    print_list(&lines, "(none)");
    println!();

    println!(
        "  {} ({}):",
        "Would be affected".white().bold(),
        at_risk.len().to_string().yellow()
    );
    let lines: Vec<String> = at_risk
        .iter()
        .map(|a| display::reached(&a.asset, a.distance))
        .collect();
    print_list(&lines, "(none)");
}
