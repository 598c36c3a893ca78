//! Bounded breadth-first traversal.
//!
//! Every analyzer is built on [`GraphSnapshot::traverse`]. The walk is
//! level-synchronized: all assets at depth `d` are expanded before any asset
//! at depth `d + 1` is considered. Within a level, candidates are merged in
//! frontier order and, per frontier asset, in edge insertion order. That
//! gives two guarantees:
//!
//! - each asset is reported once, at its shortest hop count from the start;
//! - among equally short routes, the one discovered first wins.
//!
//! Wide frontiers are expanded on the rayon pool. Expansion only reads the
//! snapshot; the visited set is updated by the single merge step that
//! follows, which is the barrier between levels. Results are identical to a
//! sequential walk.

use super::GraphSnapshot;
use crate::domain::{Asset, AssetId, AssetStatus, EdgeKind, EdgeKinds};
use crate::error::{Error, Result};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Frontier size at which neighbor expansion moves to the rayon pool.
const PARALLEL_FRONTIER_MIN: usize = 512;

/// Walk direction relative to edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges source -> target (downstream, impact).
    Forward,
    /// Follow edges target -> source (upstream, cause).
    Backward,
    /// Follow edges either way (neighborhood).
    Both,
}

/// Parameters of one walk.
#[derive(Debug, Clone, Copy)]
pub struct Traversal {
    /// Which way to follow edges.
    pub direction: Direction,
    /// Edge kinds that may be followed; others are skipped.
    pub kinds: EdgeKinds,
    /// Maximum number of hops from the start. Must be at least 1.
    pub max_depth: usize,
    /// Report only assets whose status satisfies this predicate.
    ///
    /// Filtering applies to the report only: non-matching assets are still
    /// expanded.
    pub predicate: Option<fn(&AssetStatus) -> bool>,
}

impl Traversal {
    /// Downstream walk with no status filter.
    #[must_use]
    pub fn forward(kinds: EdgeKinds, max_depth: usize) -> Self {
        Self {
            direction: Direction::Forward,
            kinds,
            max_depth,
            predicate: None,
        }
    }

    /// Upstream walk with no status filter.
    #[must_use]
    pub fn backward(kinds: EdgeKinds, max_depth: usize) -> Self {
        Self {
            direction: Direction::Backward,
            kinds,
            max_depth,
            predicate: None,
        }
    }

    /// Walk ignoring edge direction, with no status filter.
    #[must_use]
    pub fn undirected(kinds: EdgeKinds, max_depth: usize) -> Self {
        Self {
            direction: Direction::Both,
            kinds,
            max_depth,
            predicate: None,
        }
    }

    /// Restrict the report to assets whose status satisfies `predicate`.
    #[must_use]
    pub fn matching(mut self, predicate: fn(&AssetStatus) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    fn reports(&self, asset: &Asset) -> bool {
        self.predicate.is_none_or(|predicate| predicate(&asset.status))
    }
}

/// One hop along a discovered route.
#[derive(Debug, Clone, Copy)]
pub struct Step<'g> {
    /// Kind of the edge crossed.
    pub kind: EdgeKind,
    /// Asset reached by crossing it.
    pub asset: &'g Asset,
}

/// An asset reached by a walk.
#[derive(Debug, Clone)]
pub struct Visit<'g> {
    /// The asset.
    pub asset: &'g Asset,
    /// Shortest hop count from the start.
    pub depth: usize,
    /// Route from the start, one step per hop; `path.len() == depth` and the
    /// last step reaches `asset`.
    pub path: Vec<Step<'g>>,
}

impl Visit<'_> {
    /// Edge kinds along the route, from the start outward.
    #[must_use]
    pub fn edge_kinds(&self) -> Vec<EdgeKind> {
        self.path.iter().map(|step| step.kind).collect()
    }
}

impl GraphSnapshot {
    /// Breadth-first walk from `start`.
    ///
    /// The start asset is never reported. Results are ordered by discovery:
    /// ascending depth, then first-found.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidDepth` if `spec.max_depth` is zero
    /// - `Error::AssetNotFound` if `start` is not in the snapshot
    pub fn traverse(&self, start: &AssetId, spec: &Traversal) -> Result<Vec<Visit<'_>>> {
        if spec.max_depth == 0 {
            return Err(Error::InvalidDepth(spec.max_depth));
        }
        let start_node = self.node(start)?;

        let mut visited = HashSet::from([start_node]);
        let mut parents: HashMap<NodeIndex, (NodeIndex, EdgeKind)> = HashMap::new();
        let mut frontier = vec![start_node];
        let mut result = Vec::new();
        let mut depth = 0;

        while !frontier.is_empty() && depth < spec.max_depth {
            depth += 1;
            let expansions = self.expand(&frontier, spec);

            let mut next_frontier = Vec::new();
            for (from, neighbors) in frontier.iter().zip(expansions) {
                for (kind, node) in neighbors {
                    if !visited.insert(node) {
                        continue;
                    }
                    parents.insert(node, (*from, kind));
                    next_frontier.push(node);

                    let asset = &self.graph[node];
                    tracing::trace!(asset = %asset.id, depth, %kind, "Reached asset");
                    if spec.reports(asset) {
                        result.push(Visit {
                            asset,
                            depth,
                            path: self.route(node, start_node, &parents),
                        });
                    }
                }
            }
            frontier = next_frontier;
        }

        tracing::debug!(
            start = %start,
            direction = ?spec.direction,
            kinds = ?spec.kinds,
            max_depth = spec.max_depth,
            visited = visited.len() - 1,
            reported = result.len(),
            "Traversal complete"
        );
        Ok(result)
    }

    /// Neighbor lists for every frontier asset, in frontier order.
    fn expand(&self, frontier: &[NodeIndex], spec: &Traversal) -> Vec<Vec<(EdgeKind, NodeIndex)>> {
        if frontier.len() >= PARALLEL_FRONTIER_MIN {
            frontier
                .par_iter()
                .map(|node| self.neighbors(*node, spec.direction, spec.kinds))
                .collect()
        } else {
            frontier
                .iter()
                .map(|node| self.neighbors(*node, spec.direction, spec.kinds))
                .collect()
        }
    }

    /// Rebuild the route from `start` to `node` out of parent pointers.
    fn route(
        &self,
        node: NodeIndex,
        start: NodeIndex,
        parents: &HashMap<NodeIndex, (NodeIndex, EdgeKind)>,
    ) -> Vec<Step<'_>> {
        let mut path = Vec::new();
        let mut current = node;
        while current != start {
            let Some(&(parent, kind)) = parents.get(&current) else {
                break;
            };
            path.push(Step {
                kind,
                asset: &self.graph[current],
            });
            current = parent;
        }
        path.reverse();
        path
    }
}
