//! CLI command implementations.

mod display;

pub mod drift;
pub mod impact;
pub mod related;
pub mod root_cause;
pub mod scan;
pub mod spof;
pub mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use faultline::config::FaultlineConfig;
use faultline::engine::Engine;
use faultline::provider::{JsonlConfigProvider, JsonlGraphProvider};
use serde::Serialize;

/// Options shared by every command.
pub struct Options {
    /// Snapshot file override
    pub snapshot: Option<PathBuf>,
    /// Intent file override
    pub intent: Option<PathBuf>,
    /// Config file override
    pub config: Option<PathBuf>,
    /// Emit JSON instead of human output
    pub json: bool,
}

impl Options {
    /// Resolve configuration: file values, then command-line overrides.
    async fn resolve_config(&self) -> Result<FaultlineConfig> {
        let mut config = match &self.config {
            Some(path) => FaultlineConfig::load(path)
                .await
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => {
                let cwd = std::env::current_dir().context("failed to get current directory")?;
                FaultlineConfig::load_or_default(&FaultlineConfig::default_path(&cwd)).await?
            }
        };
        if let Some(snapshot) = &self.snapshot {
            config.snapshot_file.clone_from(snapshot);
        }
        if let Some(intent) = &self.intent {
            config.intent_file.clone_from(intent);
        }
        Ok(config)
    }

    /// Build an engine over the configured files and load the snapshot.
    ///
    /// Skipped records are reported on stderr unless JSON output was asked for.
    async fn open_engine(&self) -> Result<(Engine, FaultlineConfig)> {
        let config = self.resolve_config().await?;
        let (engine, warnings) = Engine::open(
            Box::new(JsonlGraphProvider::new(&config.snapshot_file)),
            Box::new(JsonlConfigProvider::new(&config.intent_file)),
        )
        .await
        .with_context(|| {
            format!(
                "failed to load snapshot {}",
                config.snapshot_file.display()
            )
        })?;

        if !self.json && !warnings.is_empty() {
            eprintln!(
                "{}: skipped {} record(s) while loading {}",
                "warning".yellow(),
                warnings.len(),
                config.snapshot_file.display()
            );
            for warning in &warnings {
                eprintln!("  {} {warning}", "•".dimmed());
            }
        }
        Ok((engine, config))
    }
}

/// Print `value` as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
