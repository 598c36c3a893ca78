//! Error types for faultline operations.
//!
//! Graph queries are total on well-formed snapshots: cycles, isolated assets
//! and empty graphs are ordinary inputs. The variants here cover the few
//! ways an operation can legitimately fail:
//!
//! - the caller named an asset the snapshot does not contain,
//! - the caller asked for a walk of depth zero,
//! - the caller cancelled a batch operation,
//! - a collaborator (graph or config provider) failed.

use crate::domain::{AssetId, EdgeKind};
use std::io;
use thiserror::Error;

/// The error type for faultline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The named or identified asset is absent from the snapshot.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// A traversal was requested with a depth bound of zero.
    #[error("Invalid traversal depth: {0} (must be at least 1)")]
    InvalidDepth(usize),

    /// A batch operation observed its cancellation signal.
    #[error("Operation cancelled")]
    Cancelled,

    /// Two assets in one snapshot share an id.
    #[error("Duplicate asset id: {0}")]
    DuplicateAsset(AssetId),

    /// The same (source, target, kind) edge was added twice.
    #[error("Duplicate edge: {upstream} -[{kind}]-> {downstream}")]
    DuplicateEdge {
        /// Upstream asset.
        upstream: AssetId,
        /// Downstream asset.
        downstream: AssetId,
        /// Relationship kind.
        kind: EdgeKind,
    },

    /// A graph or config provider failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSONL reading error.
    #[error("JSONL error: {0}")]
    Jsonl(#[from] faultline_jsonl::Error),
}

impl Error {
    /// Returns `true` when the error means "no such asset".
    ///
    /// Service layers map this to a not-found response and everything else
    /// to a generic failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AssetNotFound(_))
    }
}

/// A specialized Result type for faultline operations.
pub type Result<T> = std::result::Result<T, Error>;
