//! In-memory graph store.
//!
//! A [`GraphSnapshot`] is an immutable view of every asset and dependency
//! edge at one point in time. Snapshots are assembled with a
//! [`SnapshotBuilder`] and never change afterwards; the engine publishes a
//! new snapshot rather than editing the current one.
//!
//! ## Graph Representation
//!
//! Assets live in a petgraph `DiGraph<Asset, EdgeKind>` with edges directed
//! **upstream -> downstream**:
//!
//! - **Edge source**: the asset that supplies (powers, connects, feeds,
//!   supports, controls)
//! - **Edge target**: the asset that depends on it
//! - **Edge weight**: the [`EdgeKind`]
//!
//! A UPS powering a PLC is the edge `UPS -> PLC` with weight `Powers`.
//! Failure propagates in the edge direction; root-cause search walks it
//! backward.
//!
//! ## Edge Order
//!
//! Neighbor lists are returned in edge insertion order. That order is the
//! tie-breaker for every breadth-first walk, so analysis results depend only
//! on snapshot content and never on hash ordering.

mod traversal;

pub use traversal::{Direction, Step, Traversal, Visit};

use crate::domain::{Asset, AssetId, DependencyEdge, EdgeKind, EdgeKinds};
use crate::error::{Error, Result};
use petgraph::Direction::{Incoming, Outgoing};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef as _;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One edge seen from one of its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'g> {
    /// Relationship kind.
    pub kind: EdgeKind,
    /// The asset at the other end of the edge.
    pub asset: &'g Asset,
}

/// Immutable view of assets and their dependency edges.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    version: u64,

    /// Dependency graph. Node weights are the assets themselves.
    graph: DiGraph<Asset, EdgeKind>,

    /// Asset id to node. Ordered, so iteration is by ascending id.
    node_map: BTreeMap<AssetId, NodeIndex>,

    /// Asset name to node, holding the lowest id when names collide.
    names: HashMap<String, NodeIndex>,
}

impl GraphSnapshot {
    /// An empty snapshot at version 0.
    #[must_use]
    pub fn empty() -> Self {
        SnapshotBuilder::new().build(0)
    }

    /// Build a snapshot from complete asset and edge lists.
    ///
    /// # Errors
    ///
    /// - `Error::DuplicateAsset` if two assets share an id
    /// - `Error::AssetNotFound` if an edge references a missing asset
    /// - `Error::DuplicateEdge` if an edge appears twice
    pub fn from_parts(
        assets: impl IntoIterator<Item = Asset>,
        edges: impl IntoIterator<Item = DependencyEdge>,
        version: u64,
    ) -> Result<Self> {
        let mut builder = SnapshotBuilder::new();
        for asset in assets {
            builder.add_asset(asset)?;
        }
        for edge in edges {
            builder.add_edge(&edge)?;
        }
        Ok(builder.build(version))
    }

    /// Version number assigned when the snapshot was published.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of assets.
    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up an asset by id.
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if the id is not in the snapshot.
    pub fn get_asset(&self, id: &AssetId) -> Result<&Asset> {
        self.node(id).map(|node| &self.graph[node])
    }

    /// Look up an asset by name.
    ///
    /// Names are not unique; when several assets share a name the one with
    /// the lowest id is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if no asset has this name.
    pub fn find_by_name(&self, name: &str) -> Result<&Asset> {
        self.names
            .get(name)
            .map(|node| &self.graph[*node])
            .ok_or_else(|| Error::AssetNotFound(name.to_string()))
    }

    /// Edges leaving `id` whose kind is in `kinds`, with their target assets.
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if the id is not in the snapshot.
    pub fn outgoing_edges(&self, id: &AssetId, kinds: EdgeKinds) -> Result<Vec<EdgeRef<'_>>> {
        let node = self.node(id)?;
        Ok(self.edge_refs(node, Direction::Forward, kinds))
    }

    /// Edges entering `id` whose kind is in `kinds`, with their source assets.
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if the id is not in the snapshot.
    pub fn incoming_edges(&self, id: &AssetId, kinds: EdgeKinds) -> Result<Vec<EdgeRef<'_>>> {
        let node = self.node(id)?;
        Ok(self.edge_refs(node, Direction::Backward, kinds))
    }

    /// All assets in ascending id order.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> + '_ {
        self.node_map.values().map(|node| &self.graph[*node])
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge> + '_ {
        self.graph.edge_references().map(|edge| DependencyEdge {
            source: self.graph[edge.source()].id.clone(),
            target: self.graph[edge.target()].id.clone(),
            kind: *edge.weight(),
        })
    }

    fn node(&self, id: &AssetId) -> Result<NodeIndex> {
        self.node_map
            .get(id)
            .copied()
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))
    }

    /// Neighbors of `node` in insertion order of the connecting edges.
    ///
    /// For `Direction::Both`, outgoing neighbors come before incoming ones.
    fn neighbors(
        &self,
        node: NodeIndex,
        direction: Direction,
        kinds: EdgeKinds,
    ) -> Vec<(EdgeKind, NodeIndex)> {
        match direction {
            Direction::Forward => self.directed_neighbors(node, Outgoing, kinds),
            Direction::Backward => self.directed_neighbors(node, Incoming, kinds),
            Direction::Both => {
                let mut neighbors = self.directed_neighbors(node, Outgoing, kinds);
                neighbors.extend(self.directed_neighbors(node, Incoming, kinds));
                neighbors
            }
        }
    }

    fn directed_neighbors(
        &self,
        node: NodeIndex,
        direction: petgraph::Direction,
        kinds: EdgeKinds,
    ) -> Vec<(EdgeKind, NodeIndex)> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, direction)
            .filter(|edge| kinds.contains(*edge.weight()))
            .collect();
        // petgraph yields the most recently added edge first
        edges.sort_by_key(petgraph::visit::EdgeRef::id);

        edges
            .into_iter()
            .map(|edge| {
                let other = match direction {
                    Outgoing => edge.target(),
                    Incoming => edge.source(),
                };
                (*edge.weight(), other)
            })
            .collect()
    }

    fn edge_refs(&self, node: NodeIndex, direction: Direction, kinds: EdgeKinds) -> Vec<EdgeRef<'_>> {
        self.neighbors(node, direction, kinds)
            .into_iter()
            .map(|(kind, other)| EdgeRef {
                kind,
                asset: &self.graph[other],
            })
            .collect()
    }
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Incremental constructor for [`GraphSnapshot`].
///
/// Assets must be added before the edges that reference them.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    graph: DiGraph<Asset, EdgeKind>,
    node_map: BTreeMap<AssetId, NodeIndex>,
    names: HashMap<String, NodeIndex>,
    edge_keys: HashSet<(NodeIndex, NodeIndex, EdgeKind)>,
}

impl SnapshotBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateAsset` if an asset with the same id exists.
    pub fn add_asset(&mut self, asset: Asset) -> Result<()> {
        if self.node_map.contains_key(&asset.id) {
            return Err(Error::DuplicateAsset(asset.id));
        }

        let id = asset.id.clone();
        let name = asset.name.clone();
        let node = self.graph.add_node(asset);
        self.node_map.insert(id.clone(), node);

        let keep_existing = self
            .names
            .get(&name)
            .is_some_and(|existing| self.graph[*existing].id <= id);
        if !keep_existing {
            self.names.insert(name, node);
        }
        Ok(())
    }

    /// Add an edge between two assets already in the builder.
    ///
    /// # Errors
    ///
    /// - `Error::AssetNotFound` if either endpoint is missing
    /// - `Error::DuplicateEdge` if this (source, target, kind) already exists
    pub fn add_edge(&mut self, edge: &DependencyEdge) -> Result<()> {
        let source = self.lookup(&edge.source)?;
        let target = self.lookup(&edge.target)?;

        if !self.edge_keys.insert((source, target, edge.kind)) {
            return Err(Error::DuplicateEdge {
                upstream: edge.source.clone(),
                downstream: edge.target.clone(),
                kind: edge.kind,
            });
        }

        self.graph.add_edge(source, target, edge.kind);
        Ok(())
    }

    /// Whether an asset with this id has been added.
    #[must_use]
    pub fn contains(&self, id: &AssetId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Finish building.
    #[must_use]
    pub fn build(self, version: u64) -> GraphSnapshot {
        GraphSnapshot {
            version,
            graph: self.graph,
            node_map: self.node_map,
            names: self.names,
        }
    }

    fn lookup(&self, id: &AssetId) -> Result<NodeIndex> {
        self.node_map
            .get(id)
            .copied()
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))
    }
}
