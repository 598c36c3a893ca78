//! `faultline root-cause` command implementation.

use anyhow::Result;
use colored::Colorize;
use faultline::analysis::RootCause;

use super::Options;
use super::display;

/// Run the root-cause command.
pub async fn run(options: &Options, name: &str) -> Result<()> {
    let (engine, _) = options.open_engine().await?;
    let rc = engine.find_root_cause(name).await?;

    if options.json {
        return super::print_json(&rc);
    }
    print_root_cause(&rc);
    Ok(())
}

fn print_root_cause(rc: &RootCause) {
    println!("Root cause analysis for {}:", rc.target.name.cyan().bold());
    println!();

    if rc.isolated {
        println!(
            "  {}: {} has no failing upstream dependency",
            "Isolated failure".yellow().bold(),
            display::asset(&rc.root)
        );
        if let Some(reason) = &rc.root.failure_reason {
            println!("  {}: {reason}", "Reason".white().bold());
        }
        return;
    }

    println!(
        "  {}: {} ({} hop(s) upstream)",
        "Root cause".white().bold(),
        display::asset(&rc.root),
        rc.depth.to_string().red()
    );
    if let Some(reason) = &rc.root.failure_reason {
        println!("  {}: {reason}", "Reason".white().bold());
    }
    println!();

    println!("  {}:", "Failure chain".white().bold());
    for (i, asset) in rc.chain.iter().enumerate() {
        match rc.edge_kinds.get(i) {
            Some(kind) => println!(
                "    {} {}  {}",
                "•".dimmed(),
                display::asset(asset),
                format!("-[{kind}]->").dimmed()
            ),
            None => println!("    {} {}", "•".dimmed(), display::asset(asset)),
        }
    }
}
