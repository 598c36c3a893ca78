//! `faultline stats` command implementation.

use anyhow::Result;
use colored::Colorize;

use super::Options;

/// Run the stats command.
pub async fn run(options: &Options) -> Result<()> {
    let (engine, config) = options.open_engine().await?;
    let stats = engine.graph_stats().await;

    if options.json {
        return super::print_json(&stats);
    }

    println!("{}", "Faultline Snapshot Statistics".cyan().bold());
    println!();
    println!(
        "  {}: {} (version {})",
        "Snapshot".white().bold(),
        config.snapshot_file.display(),
        stats.version
    );
    println!();
    println!(
        "  {}: {} total, {} operational, {} failing",
        "Assets".white().bold(),
        stats.total_assets.to_string().green(),
        stats.operational_assets,
        stats.failing_assets.to_string().red()
    );
    println!("  {}: {}%", "Uptime".white().bold(), stats.uptime_percent);
    println!(
        "  {}: {}",
        "Edges".white().bold(),
        stats.total_edges.to_string().green()
    );
    println!();
    println!(
        "  {}: {}",
        "Asset types".white().bold(),
        stats.asset_types.join(", ")
    );
    let kinds: Vec<&str> = stats.edge_kinds.iter().map(|k| k.as_str()).collect();
    println!("  {}: {}", "Edge kinds".white().bold(), kinds.join(", "));
    Ok(())
}
