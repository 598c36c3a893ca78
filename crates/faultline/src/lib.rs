//! # Faultline: Root-Cause and Impact Analysis for Asset Graphs
//!
//! Faultline reasons over a directed graph of industrial assets (PLCs,
//! sensors, robots, switches, UPS units, servers) joined by typed
//! dependencies (`POWERS`, `CONNECTS_TO`, `FEEDS_DATA`, `DEPENDS_ON`,
//! `CONTROLS`). It answers four questions:
//!
//! - **Root cause**: why did X fail? ([`analysis::find_root_cause`])
//! - **Cascade impact**: what fails if X fails? ([`analysis::analyze_cascade_impact`])
//! - **Single points of failure**: what is everything hanging off?
//!   ([`analysis::find_single_points_of_failure`])
//! - **Drift**: what no longer matches its declared configuration?
//!   ([`analysis::detect_drift`])
//!
//! Every analyzer is a pure function over an immutable
//! [`GraphSnapshot`](graph::GraphSnapshot), built on one bounded
//! breadth-first [`traverse`](graph::GraphSnapshot::traverse). The
//! [`Engine`](engine::Engine) holds the live snapshot, refreshes it from a
//! [`GraphProvider`](provider::GraphProvider) and runs the analyzers against
//! a consistent version.
//!
//! ## Quick Start
//!
//! ```no_run
//! use faultline::engine::Engine;
//! use faultline::provider::{JsonlConfigProvider, JsonlGraphProvider};
//!
//! # async fn example() -> faultline::Result<()> {
//! let (engine, warnings) = Engine::open(
//!     Box::new(JsonlGraphProvider::new(".faultline/graph.jsonl")),
//!     Box::new(JsonlConfigProvider::new(".faultline/intent.jsonl")),
//! )
//! .await?;
//! for warning in &warnings {
//!     eprintln!("{warning}");
//! }
//!
//! let rc = engine.find_root_cause("Robot-01").await?;
//! println!("{} failed because of {} ({} hops up)", rc.target.name, rc.root.name, rc.depth);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod analysis;
pub mod cancellation;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod graph;
pub mod provider;

pub use error::{Error, Result};
