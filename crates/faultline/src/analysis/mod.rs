//! Analyzers over a [`GraphSnapshot`](crate::graph::GraphSnapshot).
//!
//! Every analyzer is a pure function of a snapshot plus its explicit inputs.
//! None of them hold state between calls, and all of them are built from
//! [`traverse`](crate::graph::GraphSnapshot::traverse) walks.
//!
//! | Analyzer | Walk | Kinds | Depth |
//! |----------|------|-------|-------|
//! | [`find_root_cause`] | backward, unhealthy only | [`ROOT_CAUSE`](crate::domain::EdgeKinds::ROOT_CAUSE) | 5 |
//! | [`analyze_cascade_impact`] | forward | [`CASCADE`](crate::domain::EdgeKinds::CASCADE) | 5 |
//! | [`find_single_points_of_failure`] | forward, every asset | [`CRITICAL_PATH`](crate::domain::EdgeKinds::CRITICAL_PATH) | 3 |
//! | [`detect_drift`] | none | | |
//!
//! The operational scans in [`scans`] follow the same pattern with their own
//! kind sets and thresholds.

pub mod cascade;
pub mod drift;
pub mod root_cause;
pub mod scans;
pub mod spof;

pub use cascade::{AffectedAsset, CascadeImpact, analyze_cascade_impact};
pub use drift::{
    DriftAction, DriftActionKind, DriftField, DriftRecord, DriftReport, DriftSummary, FieldDrift,
    compute_drift, detect_drift,
};
pub use root_cause::{RootCause, find_root_cause};
pub use spof::{Recommendation, SpofFinding, find_single_points_of_failure};

use crate::domain::{Asset, AssetId, AssetStatus, AssetType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The parts of an asset that analysis results report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    /// Asset id
    pub id: AssetId,
    /// Asset name
    pub name: String,
    /// Asset type
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Status at snapshot time
    pub status: AssetStatus,
    /// Network address, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Reported failure reason, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Time of the most recent failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<DateTime<Utc>>,
}

impl From<&Asset> for AssetSummary {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            asset_type: asset.asset_type.clone(),
            status: asset.status.clone(),
            ip_address: asset.ip_address.clone(),
            failure_reason: asset.failure_reason.clone(),
            last_failure: asset.last_failure,
        }
    }
}

/// `part / whole` as a percentage rounded to one decimal; 0 when `whole` is 0.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (1000.0 * part as f64 / whole as f64).round() / 10.0
}
