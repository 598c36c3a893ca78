//! Configuration drift between intended and observed asset state.
//!
//! [`compute_drift`] compares one intended [`ConfigMap`] with one observed
//! [`ConfigMap`]. [`detect_drift`] runs it for every asset in a snapshot that
//! has a declared intent, matching intents to assets by name.
//!
//! Fields are compared in a fixed order, each with a fixed severity:
//!
//! | Field | Severity |
//! |-------|----------|
//! | `status` | critical if observed offline/error/failed, else high |
//! | `ipAddress` | medium |
//! | `version` | high |
//! | `configChecksum` | high, only when the observed checksum is known |
//! | `securityZone` | critical |
//!
//! A field the intent leaves undeclared is not compared.

use super::percentage;
use crate::domain::{AssetStatus, ConfigMap, Severity, UNKNOWN_CHECKSUM};
use crate::graph::GraphSnapshot;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

/// A compared configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DriftField {
    /// Operational status
    Status,
    /// Network address
    IpAddress,
    /// Firmware or software version
    Version,
    /// Configuration checksum
    ConfigChecksum,
    /// Security zone
    SecurityZone,
}

impl DriftField {
    /// Fields in comparison order.
    pub const ALL: [DriftField; 5] = [
        Self::Status,
        Self::IpAddress,
        Self::Version,
        Self::ConfigChecksum,
        Self::SecurityZone,
    ];

    /// The camelCase field name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::IpAddress => "ipAddress",
            Self::Version => "version",
            Self::ConfigChecksum => "configChecksum",
            Self::SecurityZone => "securityZone",
        }
    }

    fn value(self, config: &ConfigMap) -> Option<&str> {
        match self {
            Self::Status => config.status.as_deref(),
            Self::IpAddress => config.ip_address.as_deref(),
            Self::Version => config.version.as_deref(),
            Self::ConfigChecksum => config.config_checksum.as_deref(),
            Self::SecurityZone => config.security_zone.as_deref(),
        }
    }
}

impl fmt::Display for DriftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single mismatched field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDrift {
    /// Which field
    pub field: DriftField,
    /// Declared value
    pub intended: Option<String>,
    /// Observed value
    pub observed: Option<String>,
    /// How serious the mismatch is
    pub severity: Severity,
}

/// What to do about a drifted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftActionKind {
    /// Status drifted: run a root-cause analysis.
    InvestigateFailure,
    /// Move to the declared version.
    SyncVersion,
    /// Reapply the declared network address.
    ReconcileAddress,
    /// Restore the declared configuration.
    RestoreConfiguration,
    /// Move the asset back to its declared security zone.
    ReviewSecurityZone,
}

/// Recommended remediation for one mismatched field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftAction {
    /// What to do
    pub kind: DriftActionKind,
    /// The field it addresses
    pub field: DriftField,
    /// How urgently
    pub priority: Severity,
    /// Whether tooling may apply it without a human
    pub automated: bool,
}

impl DriftAction {
    /// The action for a mismatch, as urgent as the mismatch itself.
    fn for_drift(drift: &FieldDrift) -> Self {
        let (kind, automated) = match drift.field {
            DriftField::Status => (DriftActionKind::InvestigateFailure, false),
            DriftField::IpAddress => (DriftActionKind::ReconcileAddress, true),
            DriftField::Version => (DriftActionKind::SyncVersion, true),
            DriftField::ConfigChecksum => (DriftActionKind::RestoreConfiguration, true),
            DriftField::SecurityZone => (DriftActionKind::ReviewSecurityZone, false),
        };
        Self {
            kind,
            field: drift.field,
            priority: drift.severity,
            automated,
        }
    }
}

/// Drift of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftRecord {
    /// Asset name
    pub asset: String,
    /// Mismatches in comparison order
    pub fields: Vec<FieldDrift>,
    /// Highest field severity; `None` when in sync
    pub severity: Option<Severity>,
    /// One recommended action per mismatch
    pub actions: Vec<DriftAction>,
    /// Where the intent was declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_repo: Option<String>,
    /// Path of the declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    /// Revision of the declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl DriftRecord {
    /// No field differs.
    #[must_use]
    pub fn is_in_sync(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Compare intended and observed configuration for one asset.
#[must_use]
pub fn compute_drift(intended: &ConfigMap, observed: &ConfigMap) -> DriftRecord {
    let fields: Vec<FieldDrift> = DriftField::ALL
        .into_iter()
        .filter_map(|field| field_drift(field, intended, observed))
        .collect();

    DriftRecord {
        asset: intended.asset.clone(),
        severity: fields.iter().map(|f| f.severity).max(),
        actions: fields.iter().map(DriftAction::for_drift).collect(),
        fields,
        source_repo: intended.source_repo.clone(),
        source_path: intended.source_path.clone(),
        revision: intended.revision.clone(),
    }
}

fn field_drift(field: DriftField, intended: &ConfigMap, observed: &ConfigMap) -> Option<FieldDrift> {
    let want = field.value(intended)?;
    let have = field.value(observed);

    let severity = match field {
        DriftField::Status => {
            if have.is_some_and(|have| have.eq_ignore_ascii_case(want)) {
                return None;
            }
            let observed_status = have.map(AssetStatus::from);
            if observed_status.is_some_and(|s| {
                matches!(
                    s,
                    AssetStatus::Offline | AssetStatus::Error | AssetStatus::Failed
                )
            }) {
                Severity::Critical
            } else {
                Severity::High
            }
        }
        DriftField::ConfigChecksum => {
            let known = have.filter(|have| *have != UNKNOWN_CHECKSUM)?;
            if known == want {
                return None;
            }
            Severity::High
        }
        DriftField::IpAddress | DriftField::Version | DriftField::SecurityZone => {
            if have == Some(want) {
                return None;
            }
            match field {
                DriftField::IpAddress => Severity::Medium,
                DriftField::Version => Severity::High,
                _ => Severity::Critical,
            }
        }
    };

    Some(FieldDrift {
        field,
        intended: Some(want.to_string()),
        observed: have.map(str::to_string),
        severity,
    })
}

/// Totals over one drift run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftSummary {
    /// Assets in the snapshot
    pub total_assets: usize,
    /// Compared assets with at least one mismatch
    pub drifted_assets: usize,
    /// Compared assets with no mismatch
    pub in_sync_assets: usize,
    /// Critical field mismatches across all assets
    pub critical_drifts: usize,
    /// Drifted share of compared assets, one decimal
    pub drift_percentage: f64,
    /// Assets with no declared intent
    pub unmanaged_assets: usize,
}

/// Result of a batch drift run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    /// Totals
    pub summary: DriftSummary,
    /// Drifted assets, most severe first, then by name
    pub drifts: Vec<DriftRecord>,
}

/// Compare every asset in `snapshot` against its declared intent.
///
/// Intents are matched to assets by name; the first intent for a name wins.
/// Observed configuration comes from [`ConfigMap::observed_from`].
#[must_use]
pub fn detect_drift(snapshot: &GraphSnapshot, intents: &[ConfigMap]) -> DriftReport {
    let mut by_name: HashMap<&str, &ConfigMap> = HashMap::with_capacity(intents.len());
    for intent in intents {
        by_name.entry(intent.asset.as_str()).or_insert(intent);
    }

    let mut compared = 0;
    let mut unmanaged = 0;
    let mut drifts = Vec::new();
    for asset in snapshot.assets() {
        let Some(intent) = by_name.get(asset.name.as_str()) else {
            unmanaged += 1;
            continue;
        };
        compared += 1;
        let record = compute_drift(intent, &ConfigMap::observed_from(asset));
        if !record.is_in_sync() {
            drifts.push(record);
        }
    }

    // assets() is in id order and the sort is stable, so equal names keep it
    drifts.sort_by(|a, b| {
        Reverse(a.severity)
            .cmp(&Reverse(b.severity))
            .then_with(|| a.asset.cmp(&b.asset))
    });

    let critical_drifts = drifts
        .iter()
        .flat_map(|record| &record.fields)
        .filter(|field| field.severity == Severity::Critical)
        .count();

    let summary = DriftSummary {
        total_assets: snapshot.asset_count(),
        drifted_assets: drifts.len(),
        in_sync_assets: compared - drifts.len(),
        critical_drifts,
        drift_percentage: percentage(drifts.len(), compared),
        unmanaged_assets: unmanaged,
    };

    tracing::debug!(
        version = snapshot.version(),
        intents = intents.len(),
        compared,
        drifted = summary.drifted_assets,
        unmanaged,
        "Drift detection complete"
    );

    DriftReport { summary, drifts }
}
