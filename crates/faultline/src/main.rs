//! Faultline CLI - root-cause and impact analysis from the command line.
//!
//! Loads a JSONL asset snapshot (and optionally an intent file) and runs one
//! analysis against it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Faultline: dependency-graph root-cause and impact analysis.
#[derive(Parser)]
#[command(name = "faultline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Snapshot file (overrides the config file)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Intent file for drift detection (overrides the config file)
    #[arg(long, global = true)]
    intent: Option<PathBuf>,

    /// Config file (defaults to .faultline/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the furthest upstream failure behind an asset
    RootCause {
        /// Asset name
        name: String,
    },

    /// Show everything downstream of an asset
    Impact {
        /// Asset name
        name: String,
    },

    /// Rank single points of failure
    Spof {
        /// Give up after this many milliseconds (overrides the config file)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Compare observed configuration against declared intent
    Drift,

    /// Show snapshot statistics
    Stats,

    /// Run an operational scan over the whole graph
    Scan {
        /// Which scan
        #[arg(value_enum)]
        kind: cli::scan::Scan,
    },

    /// List unhealthy assets within two hops of an asset
    Related {
        /// Asset name
        name: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = cli::Options {
        snapshot: cli.snapshot,
        intent: cli.intent,
        config: cli.config,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::RootCause { name } => cli::root_cause::run(&options, &name).await,
        Commands::Impact { name } => cli::impact::run(&options, &name).await,
        Commands::Spof { timeout_ms } => cli::spof::run(&options, timeout_ms).await,
        Commands::Drift => cli::drift::run(&options).await,
        Commands::Stats => cli::stats::run(&options).await,
        Commands::Scan { kind } => cli::scan::run(&options, kind).await,
        Commands::Related { name } => cli::related::run(&options, &name).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
