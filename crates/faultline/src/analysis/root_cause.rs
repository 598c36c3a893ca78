//! Root-cause search: the furthest unhealthy ancestor of a failing asset.
//!
//! The walk follows [`EdgeKinds::ROOT_CAUSE`], which is the four dependency
//! kinds plus `CONTROLS`: a robot fails when its controller does, so the
//! controller's own upstream has to be reachable from the robot.

use super::AssetSummary;
use crate::domain::{AssetStatus, EdgeKind, EdgeKinds};
use crate::error::Result;
use crate::graph::{GraphSnapshot, Traversal, Visit};
use serde::Serialize;

/// How far upstream the search looks.
pub const MAX_DEPTH: usize = 5;

/// Outcome of a root-cause search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCause {
    /// The asset the search started from.
    pub target: AssetSummary,
    /// The furthest unhealthy ancestor, or the target itself when isolated.
    pub root: AssetSummary,
    /// Hops from root to target; 0 when isolated.
    pub depth: usize,
    /// Assets from root to target, both included.
    pub chain: Vec<AssetSummary>,
    /// Edge kinds along the chain, root to target; `chain.len() - 1` long.
    pub edge_kinds: Vec<EdgeKind>,
    /// No unhealthy ancestor was found within range.
    pub isolated: bool,
}

/// Find the furthest unhealthy ancestor of the asset named `target_name`.
///
/// Walks backward over [`EdgeKinds::ROOT_CAUSE`] up to [`MAX_DEPTH`] hops,
/// considering only unhealthy assets. The deepest match wins; among matches
/// at equal depth, the first discovered wins. With no match the target is
/// its own root cause at depth 0.
///
/// # Errors
///
/// Returns `Error::AssetNotFound` if no asset has this name.
pub fn find_root_cause(snapshot: &GraphSnapshot, target_name: &str) -> Result<RootCause> {
    let target = snapshot.find_by_name(target_name)?;
    let walk = Traversal::backward(EdgeKinds::ROOT_CAUSE, MAX_DEPTH).matching(AssetStatus::is_unhealthy);
    let visits = snapshot.traverse(&target.id, &walk)?;

    let Some(deepest) = deepest_first_found(&visits) else {
        tracing::debug!(target = %target.id, "No unhealthy ancestor, isolated failure");
        let summary = AssetSummary::from(target);
        return Ok(RootCause {
            target: summary.clone(),
            root: summary.clone(),
            depth: 0,
            chain: vec![summary],
            edge_kinds: Vec::new(),
            isolated: true,
        });
    };

    // The walk runs target -> root; the chain reads root -> target.
    let mut chain: Vec<AssetSummary> = deepest
        .path
        .iter()
        .rev()
        .map(|step| AssetSummary::from(step.asset))
        .collect();
    chain.push(AssetSummary::from(target));
    let edge_kinds = deepest.path.iter().rev().map(|step| step.kind).collect();

    tracing::debug!(
        target = %target.id,
        root = %deepest.asset.id,
        depth = deepest.depth,
        candidates = visits.len(),
        "Root cause found"
    );

    Ok(RootCause {
        target: AssetSummary::from(target),
        root: AssetSummary::from(deepest.asset),
        depth: deepest.depth,
        chain,
        edge_kinds,
        isolated: false,
    })
}

/// The visit at maximum depth, earliest in discovery order on ties.
fn deepest_first_found<'v, 'g>(visits: &'v [Visit<'g>]) -> Option<&'v Visit<'g>> {
    visits.iter().fold(None, |best, visit| match best {
        Some(best) if best.depth >= visit.depth => Some(best),
        _ => Some(visit),
    })
}
