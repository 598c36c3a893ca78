//! `faultline spof` command implementation.

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use faultline::cancellation::CancellationToken;

use super::Options;
use super::display;

/// Run the spof command.
///
/// `--timeout-ms` takes precedence over `spof-timeout-ms` in the config file.
pub async fn run(options: &Options, timeout_ms: Option<u64>) -> Result<()> {
    let (engine, config) = options.open_engine().await?;
    let timeout = timeout_ms.map(Duration::from_millis).or(config.spof_timeout());

    let findings = match timeout {
        Some(timeout) => {
            engine
                .find_single_points_of_failure_with_timeout(timeout)
                .await?
        }
        None => {
            engine
                .find_single_points_of_failure(&CancellationToken::new())
                .await?
        }
    };

    if options.json {
        return super::print_json(&findings);
    }

    println!("{}", "Single Points of Failure".cyan().bold());
    println!();
    if findings.is_empty() {
        println!("  {}", "(none with more than 3 dependents)".dimmed());
        return Ok(());
    }

    for finding in &findings {
        println!(
            "  {} {}  score {}, {} dependent(s)",
            display::severity(finding.severity),
            display::asset(&finding.asset),
            finding.score.to_string().yellow(),
            finding.dependent_count
        );
        println!(
            "    {} {}",
            "→".dimmed(),
            finding.recommendation.describe()
        );
    }
    Ok(())
}
