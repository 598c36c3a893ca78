//! Typed dependency relationships between assets.

use super::AssetId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of a dependency edge.
///
/// Edges point upstream to downstream: the source powers, connects,
/// feeds, supports or controls the target, and a failure of the source
/// propagates along the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Source supplies electrical power to target.
    Powers,
    /// Source provides network connectivity to target.
    ConnectsTo,
    /// Source feeds data into target.
    FeedsData,
    /// Target depends on a service provided by source.
    DependsOn,
    /// Source controls target.
    Controls,
}

impl EdgeKind {
    /// Every edge kind, in declaration order.
    pub const ALL: [EdgeKind; 5] = [
        Self::Powers,
        Self::ConnectsTo,
        Self::FeedsData,
        Self::DependsOn,
        Self::Controls,
    ];

    /// The canonical upper-snake spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Powers => "POWERS",
            Self::ConnectsTo => "CONNECTS_TO",
            Self::FeedsData => "FEEDS_DATA",
            Self::DependsOn => "DEPENDS_ON",
            Self::Controls => "CONTROLS",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An edge kind string outside the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown edge kind: {0}")]
pub struct UnknownEdgeKind(pub String);

impl FromStr for EdgeKind {
    type Err = UnknownEdgeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEdgeKind(s.to_string()))
    }
}

/// A set of edge kinds that a traversal is allowed to follow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeKinds(u8);

impl EdgeKinds {
    /// No kinds at all.
    pub const NONE: Self = Self(0);

    /// All five kinds.
    pub const ALL: Self = Self::of(&EdgeKind::ALL);

    /// Supply and service dependencies: everything except `CONTROLS`.
    pub const DEPENDENCY: Self = Self::of(&[
        EdgeKind::Powers,
        EdgeKind::ConnectsTo,
        EdgeKind::FeedsData,
        EdgeKind::DependsOn,
    ]);

    /// Kinds followed backward when searching for a root cause.
    ///
    /// A failed controller takes down what it controls, so `CONTROLS` is
    /// followed in addition to the dependency kinds.
    pub const ROOT_CAUSE: Self = Self::DEPENDENCY.with(EdgeKind::Controls);

    /// Kinds followed forward when computing cascade impact.
    pub const CASCADE: Self = Self::ALL;

    /// Kinds followed forward when scoring single points of failure.
    pub const CRITICAL_PATH: Self =
        Self::of(&[EdgeKind::Powers, EdgeKind::ConnectsTo, EdgeKind::FeedsData]);

    /// Kinds that carry operational supply: everything except `DEPENDS_ON`.
    pub const SUPPLY: Self = Self::of(&[
        EdgeKind::Powers,
        EdgeKind::ConnectsTo,
        EdgeKind::FeedsData,
        EdgeKind::Controls,
    ]);

    /// Build a set from a slice of kinds.
    #[must_use]
    pub const fn of(kinds: &[EdgeKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Single-kind set.
    #[must_use]
    pub const fn only(kind: EdgeKind) -> Self {
        Self(kind.bit())
    }

    /// Returns a copy of this set with `kind` added.
    #[must_use]
    pub const fn with(self, kind: EdgeKind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Whether `kind` is in the set.
    #[must_use]
    pub const fn contains(self, kind: EdgeKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Kinds in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = EdgeKind> {
        EdgeKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl fmt::Debug for EdgeKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<EdgeKind> for EdgeKinds {
    fn from_iter<I: IntoIterator<Item = EdgeKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// A directed dependency between two assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Upstream asset (supplier).
    pub source: AssetId,
    /// Downstream asset (dependent).
    pub target: AssetId,
    /// Relationship kind.
    pub kind: EdgeKind,
}

impl DependencyEdge {
    /// Create a new edge.
    pub fn new(source: impl Into<AssetId>, target: impl Into<AssetId>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}
