//! Collaborators that supply graph snapshots and intended configuration.
//!
//! The engine owns no data. It asks a [`GraphProvider`] for snapshots and a
//! [`ConfigProvider`] for declared intent, and both are injected by the
//! caller:
//!
//! - **Static**: in-memory asset, edge and config lists, for embedding and tests
//! - **JSONL**: line-oriented files read with `faultline-jsonl`
//!
//! # Resilient Loading
//!
//! Snapshot sources are produced by external collectors and are rarely
//! perfect. Providers skip what they cannot use and report it as a
//! [`LoadWarning`] alongside the snapshot:
//!
//! - a repeated asset id keeps the first asset,
//! - an edge to a missing asset is dropped,
//! - an edge of a kind outside the vocabulary is dropped,
//! - a repeated (source, target, kind) edge is dropped.
//!
//! Cycles are ordinary data and are kept.
//!
//! Provider errors (for example, a missing file) propagate unchanged to the
//! caller, who decides whether to retry.

pub mod jsonl;

pub use jsonl::{JsonlConfigProvider, JsonlGraphProvider};

use crate::domain::{Asset, AssetId, ConfigMap, DependencyEdge, EdgeKind};
use crate::error::{Error, Result};
use crate::graph::{GraphSnapshot, SnapshotBuilder};
use async_trait::async_trait;
use std::fmt;

/// Source of graph snapshots.
///
/// Implementations must be `Send + Sync`; the engine calls them from async
/// contexts and may share them across tasks.
#[async_trait]
pub trait GraphProvider: Send + Sync {
    /// Load a fresh snapshot stamped with `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing source cannot be read at all.
    /// Damaged individual records are reported as warnings instead.
    async fn load_snapshot(&self, version: u64) -> Result<SnapshotLoad>;
}

/// Source of intended per-asset configuration.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// All declared configuration records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing source cannot be read.
    async fn intended_configs(&self) -> Result<Vec<ConfigMap>>;
}

/// A loaded snapshot together with whatever was skipped while loading it.
#[derive(Debug)]
pub struct SnapshotLoad {
    /// The snapshot.
    pub snapshot: GraphSnapshot,
    /// Records that were skipped.
    pub warnings: Vec<LoadWarning>,
}

/// A record skipped while loading a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line could not be parsed into a snapshot record.
    ///
    /// **Effect**: the line is skipped entirely.
    MalformedRecord {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A second asset with an id already loaded.
    ///
    /// **Effect**: the later asset is skipped; the first one is kept.
    DuplicateAsset {
        /// The repeated id
        id: AssetId,
    },

    /// An edge references an asset that is not in the snapshot.
    ///
    /// **Effect**: the edge is skipped.
    OrphanedEdge {
        /// Upstream end
        source: AssetId,
        /// Downstream end
        target: AssetId,
        /// Relationship kind
        kind: EdgeKind,
    },

    /// An edge kind outside the fixed vocabulary.
    ///
    /// **Effect**: the edge is skipped.
    UnknownEdgeKind {
        /// Upstream end
        source: AssetId,
        /// Downstream end
        target: AssetId,
        /// The kind as written
        kind: String,
    },

    /// The same (source, target, kind) edge appears more than once.
    ///
    /// **Effect**: the repeat is skipped.
    DuplicateEdge {
        /// Upstream end
        source: AssetId,
        /// Downstream end
        target: AssetId,
        /// Relationship kind
        kind: EdgeKind,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord { line_number, error } => {
                write!(f, "line {line_number}: skipped malformed record: {error}")
            }
            Self::DuplicateAsset { id } => write!(f, "skipped duplicate asset {id}"),
            Self::OrphanedEdge {
                source,
                target,
                kind,
            } => write!(
                f,
                "skipped edge {source} -[{kind}]-> {target}: endpoint not found"
            ),
            Self::UnknownEdgeKind {
                source,
                target,
                kind,
            } => write!(
                f,
                "skipped edge {source} -[{kind}]-> {target}: unknown edge kind"
            ),
            Self::DuplicateEdge {
                source,
                target,
                kind,
            } => write!(f, "skipped duplicate edge {source} -[{kind}]-> {target}"),
        }
    }
}

/// Build a snapshot, skipping records the builder rejects.
///
/// Assets are added before edges, so edge order within `edges` is preserved
/// as neighbor order.
pub(crate) fn assemble(
    assets: impl IntoIterator<Item = Asset>,
    edges: impl IntoIterator<Item = DependencyEdge>,
    version: u64,
    warnings: &mut Vec<LoadWarning>,
) -> Result<GraphSnapshot> {
    let mut builder = SnapshotBuilder::new();

    for asset in assets {
        match builder.add_asset(asset) {
            Ok(()) => {}
            Err(Error::DuplicateAsset(id)) => {
                tracing::warn!(%id, "Skipping duplicate asset");
                warnings.push(LoadWarning::DuplicateAsset { id });
            }
            Err(e) => return Err(e),
        }
    }

    for edge in edges {
        if !builder.contains(&edge.source) || !builder.contains(&edge.target) {
            tracing::warn!(source = %edge.source, target = %edge.target, "Skipping orphaned edge");
            warnings.push(LoadWarning::OrphanedEdge {
                source: edge.source,
                target: edge.target,
                kind: edge.kind,
            });
            continue;
        }
        match builder.add_edge(&edge) {
            Ok(()) => {}
            Err(Error::DuplicateEdge { .. }) => {
                tracing::warn!(source = %edge.source, target = %edge.target, kind = %edge.kind, "Skipping duplicate edge");
                warnings.push(LoadWarning::DuplicateEdge {
                    source: edge.source,
                    target: edge.target,
                    kind: edge.kind,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(builder.build(version))
}

/// Graph provider over fixed in-memory lists.
#[derive(Debug, Clone, Default)]
pub struct StaticGraphProvider {
    assets: Vec<Asset>,
    edges: Vec<DependencyEdge>,
}

impl StaticGraphProvider {
    /// Serve snapshots of these assets and edges.
    #[must_use]
    pub fn new(assets: Vec<Asset>, edges: Vec<DependencyEdge>) -> Self {
        Self { assets, edges }
    }
}

#[async_trait]
impl GraphProvider for StaticGraphProvider {
    async fn load_snapshot(&self, version: u64) -> Result<SnapshotLoad> {
        let mut warnings = Vec::new();
        let snapshot = assemble(
            self.assets.iter().cloned(),
            self.edges.iter().cloned(),
            version,
            &mut warnings,
        )?;
        Ok(SnapshotLoad { snapshot, warnings })
    }
}

/// Config provider over a fixed in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    configs: Vec<ConfigMap>,
}

impl StaticConfigProvider {
    /// Serve these records.
    #[must_use]
    pub fn new(configs: Vec<ConfigMap>) -> Self {
        Self { configs }
    }
}

#[async_trait]
impl ConfigProvider for StaticConfigProvider {
    async fn intended_configs(&self) -> Result<Vec<ConfigMap>> {
        Ok(self.configs.clone())
    }
}
