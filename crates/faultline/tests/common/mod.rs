//! Shared fixtures for integration tests.

#![allow(dead_code)]

use faultline::domain::{Asset, DependencyEdge, EdgeKind};
use faultline::graph::GraphSnapshot;

pub fn asset(id: &str, asset_type: &str, status: &str) -> Asset {
    Asset::new(id, id, asset_type, status)
}

pub fn edge(source: &str, target: &str, kind: EdgeKind) -> DependencyEdge {
    DependencyEdge::new(source, target, kind)
}

pub fn snapshot(assets: Vec<Asset>, edges: Vec<DependencyEdge>) -> GraphSnapshot {
    GraphSnapshot::from_parts(assets, edges, 1).unwrap()
}

/// `UPS -[POWERS]-> PLC1 -[CONTROLS]-> Robot1` with the given statuses.
pub fn ups_chain(ups: &str, plc: &str, robot: &str) -> GraphSnapshot {
    snapshot(
        vec![
            asset("UPS", "UPS", ups),
            asset("PLC1", "PLC", plc),
            asset("Robot1", "Robot", robot),
        ],
        vec![
            edge("UPS", "PLC1", EdgeKind::Powers),
            edge("PLC1", "Robot1", EdgeKind::Controls),
        ],
    )
}

/// Numbered nodes `n0..n{count}`, all online, joined by `edges`.
///
/// Self-loops and repeated (source, target, kind) triples are dropped.
pub fn numbered(count: usize, edges: &[(usize, usize, EdgeKind)]) -> GraphSnapshot {
    numbered_with_status(&vec!["online"; count], edges)
}

/// Like [`numbered`], with one status per node.
pub fn numbered_with_status(statuses: &[&str], edges: &[(usize, usize, EdgeKind)]) -> GraphSnapshot {
    let count = statuses.len();
    let assets = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| asset(&format!("n{i}"), "Sensor", status))
        .collect::<Vec<_>>();
    let mut seen = std::collections::HashSet::new();
    let edges = edges
        .iter()
        .filter(|(s, t, _)| s != t && *s < count && *t < count)
        .filter(|e| seen.insert(**e))
        .map(|&(s, t, kind)| edge(&format!("n{s}"), &format!("n{t}"), kind))
        .collect::<Vec<_>>();
    snapshot(assets, edges)
}
