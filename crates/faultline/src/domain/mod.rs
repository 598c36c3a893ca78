//! Domain types for asset dependency analysis.
//!
//! Assets are the nodes of the dependency graph, [`DependencyEdge`]s the
//! typed relationships between them. [`ConfigMap`] is the flat per-asset
//! configuration record compared by the drift detector.

mod edge;
mod status;

pub use edge::{DependencyEdge, EdgeKind, EdgeKinds, UnknownEdgeKind};
pub use status::AssetStatus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for an asset within a snapshot.
///
/// Ordering is plain string ordering; it is the deterministic tie-breaker
/// for duplicate names and for equally ranked analysis results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Create a new asset ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Asset type label such as `PLC`, `UPS` or `NetworkSwitch`.
///
/// The vocabulary is open; comparisons are exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetType(String);

impl AssetType {
    /// Create a new asset type label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label is one of `labels`.
    #[must_use]
    pub fn is_one_of(&self, labels: &[&str]) -> bool {
        labels.contains(&self.0.as_str())
    }
}

impl Default for AssetType {
    fn default() -> Self {
        Self("Unknown".to_string())
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique identifier
    pub id: AssetId,

    /// Human label; used as a lookup key but not guaranteed unique
    pub name: String,

    /// Asset type
    #[serde(rename = "type", default)]
    pub asset_type: AssetType,

    /// Current status
    #[serde(default)]
    pub status: AssetStatus,

    /// Last reported reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<serde_json::Value>,

    /// Network address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Load as a percentage of capacity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization_percent: Option<f64>,

    /// Battery charge percentage, for power equipment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,

    /// Reported reason for the most recent failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Time of the most recent failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<DateTime<Utc>>,

    /// Security zone (e.g. "Level 1 - Control")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_zone: Option<String>,

    /// Firmware or software version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Checksum of the running configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_checksum: Option<String>,

    /// Physical location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Any other attributes, kept verbatim
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Asset {
    /// Create an asset with only the required fields set.
    pub fn new(
        id: impl Into<AssetId>,
        name: impl Into<String>,
        asset_type: impl Into<AssetType>,
        status: impl Into<AssetStatus>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            asset_type: asset_type.into(),
            status: status.into(),
            current_value: None,
            ip_address: None,
            utilization_percent: None,
            battery_level: None,
            failure_reason: None,
            last_failure: None,
            security_zone: None,
            version: None,
            config_checksum: None,
            location: None,
            attributes: BTreeMap::new(),
        }
    }
}

/// Ordered severity scale shared by every analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Low,
    /// Needs attention
    Medium,
    /// Needs prompt attention
    High,
    /// Needs immediate attention
    Critical,
}

impl Severity {
    /// The lowercase spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder a discovery agent reports when it could not read a checksum.
pub const UNKNOWN_CHECKSUM: &str = "unknown";

/// Flat configuration record for one asset.
///
/// Used for both the *intended* configuration (from a declarative source)
/// and the *observed* configuration (derived from the live snapshot).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    /// Name of the asset this record describes
    pub asset: String,

    /// Expected or observed status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Network address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Firmware or software version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Checksum of the configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_checksum: Option<String>,

    /// Security zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_zone: Option<String>,

    /// Repository holding the declaration (intended records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_repo: Option<String>,

    /// Path of the declaration within its repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,

    /// Revision the declaration was read at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl ConfigMap {
    /// Derive the observed configuration of a live asset.
    ///
    /// A missing checksum is recorded as [`UNKNOWN_CHECKSUM`], matching what
    /// discovery agents report when they cannot read one.
    #[must_use]
    pub fn observed_from(asset: &Asset) -> Self {
        Self {
            asset: asset.name.clone(),
            status: Some(asset.status.to_string()),
            ip_address: asset.ip_address.clone(),
            version: asset.version.clone(),
            config_checksum: Some(
                asset
                    .config_checksum
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CHECKSUM.to_string()),
            ),
            security_zone: asset.security_zone.clone(),
            source_repo: None,
            source_path: None,
            revision: None,
        }
    }
}
