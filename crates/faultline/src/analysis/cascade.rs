//! Downstream blast radius of a single asset.

use super::AssetSummary;
use crate::domain::{EdgeKinds, Severity};
use crate::error::Result;
use crate::graph::{GraphSnapshot, Traversal};
use serde::Serialize;

/// How far downstream the analysis looks.
pub const MAX_DEPTH: usize = 5;

/// One asset downstream of the source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedAsset {
    /// The downstream asset
    pub asset: AssetSummary,
    /// Shortest hop count from the source
    pub distance: usize,
    /// Whether the asset is unhealthy right now
    pub currently_affected: bool,
}

/// Outcome of a cascade analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeImpact {
    /// The asset whose failure is being modeled
    pub source: AssetSummary,
    /// Every downstream asset, in discovery order
    pub affected: Vec<AffectedAsset>,
    /// Number of downstream assets
    pub total_downstream: usize,
    /// Number of those already unhealthy
    pub currently_affected: usize,
    /// Largest distance reached; 0 when nothing is downstream
    pub impact_radius: usize,
    /// Severity banded on `total_downstream`
    pub severity: Severity,
}

/// Severity bands for a downstream count: >10 critical, >5 high, >2 medium.
#[must_use]
pub fn severity_for_downstream(total_downstream: usize) -> Severity {
    match total_downstream {
        n if n > 10 => Severity::Critical,
        n if n > 5 => Severity::High,
        n if n > 2 => Severity::Medium,
        _ => Severity::Low,
    }
}

/// Everything that would be affected if the asset named `source_name` failed.
///
/// # Errors
///
/// Returns `Error::AssetNotFound` if no asset has this name.
pub fn analyze_cascade_impact(snapshot: &GraphSnapshot, source_name: &str) -> Result<CascadeImpact> {
    let source = snapshot.find_by_name(source_name)?;
    let visits = snapshot.traverse(&source.id, &Traversal::forward(EdgeKinds::CASCADE, MAX_DEPTH))?;

    let affected: Vec<AffectedAsset> = visits
        .iter()
        .map(|visit| AffectedAsset {
            asset: AssetSummary::from(visit.asset),
            distance: visit.depth,
            currently_affected: visit.asset.status.is_unhealthy(),
        })
        .collect();

    let total_downstream = affected.len();
    let currently_affected = affected.iter().filter(|a| a.currently_affected).count();
    let impact_radius = affected.iter().map(|a| a.distance).max().unwrap_or(0);

    tracing::debug!(
        source = %source.id,
        total_downstream,
        currently_affected,
        impact_radius,
        "Cascade impact computed"
    );

    Ok(CascadeImpact {
        source: AssetSummary::from(source),
        affected,
        total_downstream,
        currently_affected,
        impact_radius,
        severity: severity_for_downstream(total_downstream),
    })
}
