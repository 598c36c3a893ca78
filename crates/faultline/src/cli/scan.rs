//! `faultline scan` command implementation.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use faultline::engine::Engine;

use super::Options;
use super::display::{self, print_list};

/// Operational scans.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Scan {
    /// Failed network devices and what they isolated
    Network,
    /// Power sources in trouble and what they feed
    Power,
    /// Failed assets with failed descendants
    Cascades,
    /// Upstream suppliers of struggling assets
    Upstream,
    /// Potential impact of key infrastructure
    BlastRadius,
    /// Assets with the most downstream dependents
    Critical,
    /// Struggling assets and correlated degradation around them
    Performance,
}

/// Run the scan command.
pub async fn run(options: &Options, scan: Scan) -> Result<()> {
    let (engine, _) = options.open_engine().await?;
    if options.json {
        return print_json(&engine, scan).await;
    }

    match scan {
        Scan::Network => {
            println!("{}", "Network Path Failures".cyan().bold());
            for failure in engine.network_path_failures().await? {
                println!();
                println!(
                    "  {} {}  isolates {}",
                    display::severity(failure.severity),
                    display::asset(&failure.device),
                    failure.isolated.len().to_string().red()
                );
                let lines: Vec<String> = failure
                    .isolated
                    .iter()
                    .map(|r| display::reached(&r.asset, r.distance))
                    .collect();
                print_list(&lines, "(no isolated devices)");
            }
        }
        Scan::Power => {
            println!("{}", "Power Disruptions".cyan().bold());
            for disruption in engine.power_disruptions().await? {
                println!();
                println!(
                    "  {} {}  risk {}, {} critical of {} powered",
                    display::severity(disruption.severity),
                    display::asset(&disruption.source),
                    disruption.risk_score.to_string().yellow(),
                    disruption.critical_equipment,
                    disruption.affected.len()
                );
                if let Some(level) = disruption.battery_level {
                    println!("    {}: {level}%", "Battery".white().bold());
                }
                let lines: Vec<String> = disruption
                    .affected
                    .iter()
                    .map(|e| {
                        format!(
                            "{} [{}]",
                            display::reached(&e.reached.asset, e.reached.distance),
                            e.criticality
                        )
                    })
                    .collect();
                print_list(&lines, "(nothing powered)");
            }
        }
        Scan::Cascades => {
            println!("{}", "Active Failure Cascades".cyan().bold());
            for cascade in engine.failure_cascades().await? {
                println!();
                println!(
                    "  {}  {} failed downstream",
                    display::asset(&cascade.source),
                    cascade.affected.len().to_string().red()
                );
                let lines: Vec<String> = cascade
                    .affected
                    .iter()
                    .map(|r| display::reached(&r.asset, r.distance))
                    .collect();
                print_list(&lines, "(none)");
            }
        }
        Scan::Upstream => {
            println!("{}", "Upstream Analysis".cyan().bold());
            for analysis in engine.upstream_analysis().await? {
                println!();
                println!(
                    "  {}  {} upstream",
                    display::asset(&analysis.asset),
                    analysis.upstream.len().to_string().yellow()
                );
                let lines: Vec<String> = analysis
                    .upstream
                    .iter()
                    .map(|r| display::reached(&r.asset, r.distance))
                    .collect();
                print_list(&lines, "(none)");
            }
        }
        Scan::BlastRadius => {
            println!("{}", "Blast Radius".cyan().bold());
            println!();
            for radius in engine.blast_radius().await? {
                println!(
                    "  {} {}  {} affected",
                    display::severity(radius.risk),
                    display::asset(&radius.asset),
                    radius.affected.len().to_string().yellow()
                );
            }
        }
        Scan::Critical => {
            println!("{}", "Critical Assets".cyan().bold());
            println!();
            for critical in engine.critical_assets().await? {
                println!(
                    "  {} {}  {} downstream",
                    display::severity(critical.criticality),
                    display::asset(&critical.asset),
                    critical.downstream_count.to_string().yellow()
                );
            }
        }
        Scan::Performance => {
            println!("{}", "Performance Degradation".cyan().bold());
            for issue in engine.performance_degradation().await? {
                println!();
                println!(
                    "  {} {}  bottleneck {}, {} upstream",
                    display::severity(issue.severity),
                    display::asset(&issue.asset),
                    issue.bottleneck_score.to_string().yellow(),
                    issue.upstream_count
                );
                if let Some(utilization) = issue.utilization_percent {
                    println!("    {}: {utilization}%", "Utilization".white().bold());
                }
                println!("    {}: {}", "Pattern".white().bold(), issue.pattern);
                println!("    {}: {}", "Next step".white().bold(), issue.recommendation);
                let lines: Vec<String> = issue.related.iter().map(display::asset).collect();
                print_list(&lines, "(no struggling neighbours)");
            }
        }
    }
    Ok(())
}

async fn print_json(engine: &Engine, scan: Scan) -> Result<()> {
    match scan {
        Scan::Network => super::print_json(&engine.network_path_failures().await?),
        Scan::Power => super::print_json(&engine.power_disruptions().await?),
        Scan::Cascades => super::print_json(&engine.failure_cascades().await?),
        Scan::Upstream => super::print_json(&engine.upstream_analysis().await?),
        Scan::BlastRadius => super::print_json(&engine.blast_radius().await?),
        Scan::Critical => super::print_json(&engine.critical_assets().await?),
        Scan::Performance => super::print_json(&engine.performance_degradation().await?),
    }
}
