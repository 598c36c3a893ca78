//! Single-point-of-failure scoring.
//!
//! Every asset is scored by how many assets sit within three hops downstream
//! of it on power, network and data edges, with bonuses for infrastructure
//! types and for assets that are already struggling.
//!
//! ```text
//! score = dependents
//!       + 10  if type is UPS, Router or NetworkSwitch
//!       +  5  if status is warning or degraded
//! ```
//!
//! Per-asset walks are independent, so the batch runs on the rayon pool:
//!
//! ```text
//! assets ──par_iter──► [check token, walk, score] ──collect──► sort
//! ```

use super::AssetSummary;
use crate::cancellation::CancellationToken;
use crate::domain::{Asset, EdgeKinds, Severity};
use crate::error::Result;
use crate::graph::{GraphSnapshot, Traversal};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;

/// How far downstream dependents are counted.
pub const MAX_DEPTH: usize = 3;

/// Assets with this many dependents or fewer are not reported.
pub const MIN_DEPENDENTS: usize = 3;

const INFRASTRUCTURE_TYPES: &[&str] = &["UPS", "Router", "NetworkSwitch"];
const INFRASTRUCTURE_BONUS: usize = 10;
const DEGRADED_BONUS: usize = 5;

/// Suggested mitigation for a single point of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Power equipment: add a redundant source.
    AddRedundantPower,
    /// Network equipment: add a redundant path.
    AddNetworkRedundancy,
    /// Anything else with many dependents.
    ConsiderRedundancy,
}

impl Recommendation {
    fn for_asset(asset: &Asset) -> Self {
        if asset.asset_type.is_one_of(&["UPS", "PowerSupply"]) {
            Self::AddRedundantPower
        } else if asset.asset_type.is_one_of(&["Router", "NetworkSwitch"]) {
            Self::AddNetworkRedundancy
        } else {
            Self::ConsiderRedundancy
        }
    }

    /// Short human description.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::AddRedundantPower => "add a redundant power source",
            Self::AddNetworkRedundancy => "add network path redundancy",
            Self::ConsiderRedundancy => "consider redundancy for dependent systems",
        }
    }
}

/// One reported single point of failure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpofFinding {
    /// The asset
    pub asset: AssetSummary,
    /// Distinct assets within range downstream
    pub dependent_count: usize,
    /// Criticality score
    pub score: usize,
    /// Severity banded on `score`
    pub severity: Severity,
    /// The dependents, in discovery order
    pub dependents: Vec<AssetSummary>,
    /// Suggested mitigation
    pub recommendation: Recommendation,
}

/// Severity bands for a criticality score: >20 critical, >10 high, else medium.
#[must_use]
pub fn severity_for_score(score: usize) -> Severity {
    match score {
        s if s > 20 => Severity::Critical,
        s if s > 10 => Severity::High,
        _ => Severity::Medium,
    }
}

/// Score every asset and return the single points of failure, most critical first.
///
/// Ordered by score descending, then asset id ascending. The token is checked
/// before each asset is scored.
///
/// # Errors
///
/// Returns `Error::Cancelled` if `cancel` is triggered before the batch
/// finishes. No partial result is returned.
pub fn find_single_points_of_failure(
    snapshot: &GraphSnapshot,
    cancel: &CancellationToken,
) -> Result<Vec<SpofFinding>> {
    let assets: Vec<&Asset> = snapshot.assets().collect();

    let scored: Vec<Option<SpofFinding>> = assets
        .par_iter()
        .map(|asset| {
            cancel.check()?;
            score_asset(snapshot, asset)
        })
        .collect::<Result<_>>()?;

    let mut findings: Vec<SpofFinding> = scored.into_iter().flatten().collect();
    findings.sort_by(|a, b| {
        Reverse(a.score)
            .cmp(&Reverse(b.score))
            .then_with(|| a.asset.id.cmp(&b.asset.id))
    });

    tracing::debug!(
        assets = assets.len(),
        findings = findings.len(),
        version = snapshot.version(),
        "Single points of failure scored"
    );
    Ok(findings)
}

fn score_asset(snapshot: &GraphSnapshot, asset: &Asset) -> Result<Option<SpofFinding>> {
    let visits = snapshot.traverse(
        &asset.id,
        &Traversal::forward(EdgeKinds::CRITICAL_PATH, MAX_DEPTH),
    )?;
    let dependent_count = visits.len();
    if dependent_count <= MIN_DEPENDENTS {
        return Ok(None);
    }

    let mut score = dependent_count;
    if asset.asset_type.is_one_of(INFRASTRUCTURE_TYPES) {
        score += INFRASTRUCTURE_BONUS;
    }
    if asset.status.is_degraded() {
        score += DEGRADED_BONUS;
    }

    Ok(Some(SpofFinding {
        asset: AssetSummary::from(asset),
        dependent_count,
        score,
        severity: severity_for_score(score),
        dependents: visits.iter().map(|v| AssetSummary::from(v.asset)).collect(),
        recommendation: Recommendation::for_asset(asset),
    }))
}
