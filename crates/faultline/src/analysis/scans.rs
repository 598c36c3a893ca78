//! Whole-graph operational scans.
//!
//! Each scan picks a class of assets, walks from each of them with a fixed
//! kind set and depth, and ranks what it finds. Ties in every ranking are
//! broken by asset id.

use super::{AssetSummary, percentage};
use crate::domain::{Asset, AssetStatus, EdgeKind, EdgeKinds, Severity};
use crate::error::Result;
use crate::graph::{GraphSnapshot, Traversal, Visit};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;

const NETWORK_TYPES: &[&str] = &["NetworkSwitch", "Router", "Firewall", "Gateway"];
const POWER_TYPES: &[&str] = &["UPS", "PowerSupply", "PDU"];
const CONTROL_TYPES: &[&str] = &["PLC", "IndustrialRobot", "Server"];
const BLAST_RADIUS_TYPES: &[&str] = &[
    "UPS",
    "PowerDistribution",
    "NetworkSwitch",
    "EdgeGateway",
    "PLCController",
];

const SCAN_DEPTH: usize = 3;
const BLAST_RADIUS_DEPTH: usize = 4;
const RELATED_DEPTH: usize = 2;

const NETWORK_FAILURE_LIMIT: usize = 10;
const POWER_DISRUPTION_LIMIT: usize = 10;
const CRITICAL_ASSET_LIMIT: usize = 20;
const RELATED_INCIDENT_LIMIT: usize = 20;
const PERFORMANCE_LIMIT: usize = 15;

const HIGH_UTILIZATION_PERCENT: f64 = 85.0;
const SATURATED_UTILIZATION_PERCENT: f64 = 90.0;

/// An asset reached by a scan, with its distance from the scanned asset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reached {
    /// The reached asset
    pub asset: AssetSummary,
    /// Shortest hop count
    pub distance: usize,
}

impl From<&Visit<'_>> for Reached {
    fn from(visit: &Visit<'_>) -> Self {
        Self {
            asset: AssetSummary::from(visit.asset),
            distance: visit.depth,
        }
    }
}

fn reached(visits: &[Visit<'_>]) -> Vec<Reached> {
    visits.iter().map(Reached::from).collect()
}

/// Sort by `key` descending, then by asset id ascending, and keep `limit`.
fn rank<T>(items: &mut Vec<T>, limit: Option<usize>, key: impl Fn(&T) -> (usize, &AssetSummary)) {
    items.sort_by(|a, b| {
        let (ka, sa) = key(a);
        let (kb, sb) = key(b);
        Reverse(ka).cmp(&Reverse(kb)).then_with(|| sa.id.cmp(&sb.id))
    });
    if let Some(limit) = limit {
        items.truncate(limit);
    }
}

fn is_isolated(status: &AssetStatus) -> bool {
    matches!(
        status,
        AssetStatus::Offline | AssetStatus::Unreachable | AssetStatus::Error
    )
}

fn is_underperforming(status: &AssetStatus) -> bool {
    status.is_degraded() || matches!(status, AssetStatus::Slow)
}

fn is_upstream_candidate(status: &AssetStatus) -> bool {
    status.is_hard_failure() || matches!(status, AssetStatus::Degraded)
}

/// A failed network device and the devices it cut off.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPathFailure {
    /// The failed network device
    pub device: AssetSummary,
    /// Downstream devices that are down as well
    pub isolated: Vec<Reached>,
    /// Severity banded on the isolated count
    pub severity: Severity,
}

/// Failed network devices and the downstream devices now isolated behind them.
///
/// Considers network devices that are offline or in error, follows
/// `CONNECTS_TO` up to three hops and collects descendants that are offline,
/// unreachable or in error. Ranked by isolated count, top ten.
///
/// # Errors
///
/// Propagates traversal errors; none occur on a consistent snapshot.
pub fn network_path_failures(snapshot: &GraphSnapshot) -> Result<Vec<NetworkPathFailure>> {
    let walk =
        Traversal::forward(EdgeKinds::only(EdgeKind::ConnectsTo), SCAN_DEPTH).matching(is_isolated);

    let mut failures = Vec::new();
    for device in snapshot
        .assets()
        .filter(|a| a.asset_type.is_one_of(NETWORK_TYPES) && a.status.is_hard_failure())
    {
        let isolated = reached(&snapshot.traverse(&device.id, &walk)?);
        let severity = match isolated.len() {
            n if n > 10 => Severity::Critical,
            n if n > 5 => Severity::High,
            _ => Severity::Medium,
        };
        failures.push(NetworkPathFailure {
            device: AssetSummary::from(device),
            isolated,
            severity,
        });
    }

    rank(&mut failures, Some(NETWORK_FAILURE_LIMIT), |f| {
        (f.isolated.len(), &f.device)
    });
    Ok(failures)
}

/// Criticality of equipment fed by a power source.
#[must_use]
pub fn equipment_criticality(asset: &Asset) -> Severity {
    if asset.asset_type.is_one_of(CONTROL_TYPES) {
        Severity::Critical
    } else if asset.asset_type.is_one_of(&["NetworkSwitch", "Router"]) {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// A piece of equipment fed by a disrupted power source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoweredEquipment {
    /// The equipment and its distance from the source
    #[serde(flatten)]
    pub reached: Reached,
    /// How much losing it matters
    pub criticality: Severity,
}

/// A power source in trouble and the equipment it feeds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDisruption {
    /// The power source
    pub source: AssetSummary,
    /// Battery charge, for sources that report one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<f64>,
    /// Equipment powered within three hops
    pub affected: Vec<PoweredEquipment>,
    /// Affected equipment rated critical
    pub critical_equipment: usize,
    /// Affected equipment already offline or in error
    pub currently_offline: usize,
    /// `3 * critical_equipment + affected.len()`
    pub risk_score: usize,
    /// Severity banded on the critical and affected counts
    pub severity: Severity,
}

fn is_power_source(asset: &Asset) -> bool {
    asset.asset_type.is_one_of(POWER_TYPES)
        || asset.name.contains("Power")
        || asset.name.contains("UPS")
}

fn is_power_trouble(status: &AssetStatus) -> bool {
    status.is_hard_failure() || matches!(status, AssetStatus::Warning | AssetStatus::OnBattery)
}

/// Power sources that are down, warning or on battery, and what they feed.
///
/// Ranked by risk score, top ten.
///
/// # Errors
///
/// Propagates traversal errors; none occur on a consistent snapshot.
pub fn power_disruptions(snapshot: &GraphSnapshot) -> Result<Vec<PowerDisruption>> {
    let walk = Traversal::forward(EdgeKinds::only(EdgeKind::Powers), SCAN_DEPTH);

    let mut disruptions = Vec::new();
    for source in snapshot
        .assets()
        .filter(|a| is_power_source(a) && is_power_trouble(&a.status))
    {
        let visits = snapshot.traverse(&source.id, &walk)?;
        let affected: Vec<PoweredEquipment> = visits
            .iter()
            .map(|visit| PoweredEquipment {
                reached: Reached::from(visit),
                criticality: equipment_criticality(visit.asset),
            })
            .collect();
        let critical_equipment = affected
            .iter()
            .filter(|e| e.criticality == Severity::Critical)
            .count();
        let currently_offline = visits
            .iter()
            .filter(|v| v.asset.status.is_hard_failure())
            .count();
        let severity = if critical_equipment > 3 {
            Severity::Critical
        } else if critical_equipment > 0 {
            Severity::High
        } else if affected.len() > 5 {
            Severity::Medium
        } else {
            Severity::Low
        };

        disruptions.push(PowerDisruption {
            source: AssetSummary::from(source),
            battery_level: source.battery_level,
            risk_score: critical_equipment * 3 + affected.len(),
            affected,
            critical_equipment,
            currently_offline,
            severity,
        });
    }

    rank(&mut disruptions, Some(POWER_DISRUPTION_LIMIT), |d| {
        (d.risk_score, &d.source)
    });
    Ok(disruptions)
}

/// A failed asset with failed assets downstream of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureCascade {
    /// The failed asset at the head of the cascade
    pub source: AssetSummary,
    /// Failed assets downstream of it
    pub affected: Vec<Reached>,
}

/// Active failure cascades: failed assets with failed descendants.
///
/// Follows supply edges (everything but `DEPENDS_ON`) up to three hops from
/// every asset that is offline or in error. Ranked by cascade size.
///
/// # Errors
///
/// Propagates traversal errors; none occur on a consistent snapshot.
pub fn failure_cascades(snapshot: &GraphSnapshot) -> Result<Vec<FailureCascade>> {
    let walk = Traversal::forward(EdgeKinds::SUPPLY, SCAN_DEPTH).matching(AssetStatus::is_hard_failure);

    let mut cascades = Vec::new();
    for source in snapshot.assets().filter(|a| a.status.is_hard_failure()) {
        let affected = reached(&snapshot.traverse(&source.id, &walk)?);
        if !affected.is_empty() {
            cascades.push(FailureCascade {
                source: AssetSummary::from(source),
                affected,
            });
        }
    }

    rank(&mut cascades, None, |c| (c.affected.len(), &c.source));
    Ok(cascades)
}

/// A struggling asset and everything upstream of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamAnalysis {
    /// The struggling asset
    pub asset: AssetSummary,
    /// Its upstream suppliers within three hops
    pub upstream: Vec<Reached>,
}

/// Upstream suppliers of every asset that is offline, in error or degraded.
///
/// Only assets with at least one supplier are listed. Ranked by supplier
/// count.
///
/// # Errors
///
/// Propagates traversal errors; none occur on a consistent snapshot.
pub fn upstream_analysis(snapshot: &GraphSnapshot) -> Result<Vec<UpstreamAnalysis>> {
    let walk = Traversal::backward(EdgeKinds::SUPPLY, SCAN_DEPTH);

    let mut analyses = Vec::new();
    for asset in snapshot.assets().filter(|a| is_upstream_candidate(&a.status)) {
        let upstream = reached(&snapshot.traverse(&asset.id, &walk)?);
        if !upstream.is_empty() {
            analyses.push(UpstreamAnalysis {
                asset: AssetSummary::from(asset),
                upstream,
            });
        }
    }

    rank(&mut analyses, None, |a| (a.upstream.len(), &a.asset));
    Ok(analyses)
}

/// Potential impact of a key infrastructure asset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlastRadius {
    /// The infrastructure asset
    pub asset: AssetSummary,
    /// Everything within four hops downstream
    pub affected: Vec<Reached>,
    /// Severity banded on the affected count
    pub risk: Severity,
}

/// Blast radius of every key infrastructure asset.
///
/// Follows every edge kind up to four hops. Risk bands are inclusive:
/// at least 10 critical, at least 5 high, at least 2 medium. Assets with no
/// downstream are omitted. Ranked by radius.
///
/// # Errors
///
/// Propagates traversal errors; none occur on a consistent snapshot.
pub fn blast_radius(snapshot: &GraphSnapshot) -> Result<Vec<BlastRadius>> {
    let walk = Traversal::forward(EdgeKinds::ALL, BLAST_RADIUS_DEPTH);

    let mut radii = Vec::new();
    for asset in snapshot
        .assets()
        .filter(|a| a.asset_type.is_one_of(BLAST_RADIUS_TYPES))
    {
        let affected = reached(&snapshot.traverse(&asset.id, &walk)?);
        let risk = match affected.len() {
            0 => continue,
            n if n >= 10 => Severity::Critical,
            n if n >= 5 => Severity::High,
            n if n >= 2 => Severity::Medium,
            _ => Severity::Low,
        };
        radii.push(BlastRadius {
            asset: AssetSummary::from(asset),
            affected,
            risk,
        });
    }

    rank(&mut radii, None, |r| (r.affected.len(), &r.asset));
    Ok(radii)
}

/// An asset ranked by downstream count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalAsset {
    /// The asset
    pub asset: AssetSummary,
    /// Distinct assets within three hops downstream
    pub downstream_count: usize,
    /// Severity banded on `downstream_count`
    pub criticality: Severity,
}

/// The twenty assets with the most downstream dependents.
///
/// Follows supply edges up to three hops; assets with nothing downstream are
/// omitted.
///
/// # Errors
///
/// Propagates traversal errors; none occur on a consistent snapshot.
pub fn critical_assets(snapshot: &GraphSnapshot) -> Result<Vec<CriticalAsset>> {
    let walk = Traversal::forward(EdgeKinds::SUPPLY, SCAN_DEPTH);

    let mut assets = Vec::new();
    for asset in snapshot.assets() {
        let downstream_count = snapshot.traverse(&asset.id, &walk)?.len();
        if downstream_count == 0 {
            continue;
        }
        assets.push(CriticalAsset {
            asset: AssetSummary::from(asset),
            downstream_count,
            criticality: super::cascade::severity_for_downstream(downstream_count),
        });
    }

    rank(&mut assets, Some(CRITICAL_ASSET_LIMIT), |c| {
        (c.downstream_count, &c.asset)
    });
    Ok(assets)
}

/// An unhealthy asset near the one being investigated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// The unhealthy asset
    pub asset: AssetSummary,
    /// Hops from the investigated asset, ignoring edge direction
    pub distance: usize,
    /// Severity derived from status
    pub severity: Severity,
}

/// Incident severity for an unhealthy status.
fn incident_severity(status: &AssetStatus) -> Severity {
    match status {
        AssetStatus::Offline | AssetStatus::Error | AssetStatus::Failed => Severity::Critical,
        AssetStatus::Unreachable | AssetStatus::Degraded => Severity::High,
        AssetStatus::Warning => Severity::Medium,
        _ => Severity::Low,
    }
}

/// Unhealthy assets within two hops of `asset_name`, in either direction.
///
/// The named asset is included when it is unhealthy itself. Dependency edges
/// are followed (everything but `CONTROLS`). Most recent failure first;
/// assets without a failure time come last. At most twenty.
///
/// # Errors
///
/// Returns `Error::AssetNotFound` if no asset has this name.
pub fn related_incidents(snapshot: &GraphSnapshot, asset_name: &str) -> Result<Vec<Incident>> {
    let asset = snapshot.find_by_name(asset_name)?;
    let walk = Traversal::undirected(EdgeKinds::DEPENDENCY, RELATED_DEPTH)
        .matching(AssetStatus::is_unhealthy);

    let mut incidents: Vec<Incident> = Vec::new();
    if asset.status.is_unhealthy() {
        incidents.push(Incident {
            asset: AssetSummary::from(asset),
            distance: 0,
            severity: incident_severity(&asset.status),
        });
    }
    incidents.extend(
        snapshot
            .traverse(&asset.id, &walk)?
            .iter()
            .map(|visit| Incident {
                asset: AssetSummary::from(visit.asset),
                distance: visit.depth,
                severity: incident_severity(&visit.asset.status),
            }),
    );

    // None sorts below Some, so Reverse puts missing timestamps last
    incidents.sort_by(|a, b| {
        Reverse(a.asset.last_failure)
            .cmp(&Reverse(b.asset.last_failure))
            .then_with(|| a.asset.id.cmp(&b.asset.id))
    });
    incidents.truncate(RELATED_INCIDENT_LIMIT);
    Ok(incidents)
}

/// Likely shape of a performance problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformancePattern {
    /// More than three struggling neighbours.
    WidespreadDegradation,
    /// More than five suppliers feeding one struggling asset.
    Bottleneck,
    /// Nothing around it is struggling.
    Isolated,
}

impl fmt::Display for PerformancePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WidespreadDegradation => "widespread degradation, possibly infrastructure",
            Self::Bottleneck => "potential bottleneck, many dependencies affected",
            Self::Isolated => "isolated performance issue",
        })
    }
}

/// Suggested next step for a performance problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRecommendation {
    /// A saturated server: add capacity or trim its workload.
    ScaleResources,
    /// Check shared network and power around the degraded neighbourhood.
    CheckSharedInfrastructure,
    /// Look at the asset's own metrics.
    InvestigateAsset,
}

impl fmt::Display for PerformanceRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ScaleResources => "scale resources or optimize workload",
            Self::CheckSharedInfrastructure => "check shared infrastructure (network, power)",
            Self::InvestigateAsset => "investigate asset-specific performance metrics",
        })
    }
}

/// A struggling asset and the degradation around it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceIssue {
    /// The struggling asset
    pub asset: AssetSummary,
    /// Reported utilization, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_percent: Option<f64>,
    /// Struggling neighbours one hop away over connectivity and data edges
    pub related: Vec<AssetSummary>,
    /// Direct data and service suppliers
    pub upstream_count: usize,
    /// `2 * related.len() + upstream_count`
    pub bottleneck_score: usize,
    /// Severity banded on the related count
    pub severity: Severity,
    /// Likely shape of the problem
    pub pattern: PerformancePattern,
    /// Suggested next step
    pub recommendation: PerformanceRecommendation,
}

fn is_performance_candidate(asset: &Asset) -> bool {
    is_underperforming(&asset.status)
        || (asset.asset_type.is_one_of(CONTROL_TYPES)
            && asset.status == AssetStatus::Running
            && asset
                .utilization_percent
                .is_some_and(|u| u > HIGH_UTILIZATION_PERCENT))
}

/// Degraded, warning or slow assets, plus busy control equipment, and how
/// their trouble correlates with their neighbours.
///
/// Control equipment (PLCs, industrial robots, servers) counts when it is
/// running above 85% utilization. Neighbours are one hop away in either
/// direction over `CONNECTS_TO` and `FEEDS_DATA`; suppliers are one hop
/// upstream over `FEEDS_DATA` and `DEPENDS_ON`. Ranked by bottleneck score,
/// top fifteen.
///
/// # Errors
///
/// Propagates traversal errors; none occur on a consistent snapshot.
pub fn performance_degradation(snapshot: &GraphSnapshot) -> Result<Vec<PerformanceIssue>> {
    let neighbours = Traversal::undirected(
        EdgeKinds::of(&[EdgeKind::ConnectsTo, EdgeKind::FeedsData]),
        1,
    )
    .matching(is_underperforming);
    let suppliers = Traversal::backward(EdgeKinds::of(&[EdgeKind::FeedsData, EdgeKind::DependsOn]), 1);

    let mut issues = Vec::new();
    for asset in snapshot.assets().filter(|a| is_performance_candidate(a)) {
        let related: Vec<AssetSummary> = snapshot
            .traverse(&asset.id, &neighbours)?
            .iter()
            .map(|visit| AssetSummary::from(visit.asset))
            .collect();
        let upstream_count = snapshot.traverse(&asset.id, &suppliers)?.len();

        let severity = match related.len() {
            n if n > 5 => Severity::Critical,
            n if n > 2 => Severity::High,
            _ => Severity::Medium,
        };
        let pattern = if related.len() > 3 {
            PerformancePattern::WidespreadDegradation
        } else if upstream_count > 5 {
            PerformancePattern::Bottleneck
        } else {
            PerformancePattern::Isolated
        };
        let saturated_server = asset.asset_type.is_one_of(&["Server"])
            && asset
                .utilization_percent
                .is_some_and(|u| u > SATURATED_UTILIZATION_PERCENT);
        let recommendation = if saturated_server {
            PerformanceRecommendation::ScaleResources
        } else if related.len() > 3 {
            PerformanceRecommendation::CheckSharedInfrastructure
        } else {
            PerformanceRecommendation::InvestigateAsset
        };

        issues.push(PerformanceIssue {
            asset: AssetSummary::from(asset),
            utilization_percent: asset.utilization_percent,
            bottleneck_score: related.len() * 2 + upstream_count,
            related,
            upstream_count,
            severity,
            pattern,
            recommendation,
        });
    }

    rank(&mut issues, Some(PERFORMANCE_LIMIT), |i| {
        (i.bottleneck_score, &i.asset)
    });
    Ok(issues)
}

/// Headline numbers for a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Snapshot version
    pub version: u64,
    /// Number of assets
    pub total_assets: usize,
    /// Assets online or running
    pub operational_assets: usize,
    /// Assets offline, in error or unreachable
    pub failing_assets: usize,
    /// Operational share, one decimal
    pub uptime_percent: f64,
    /// Number of edges
    pub total_edges: usize,
    /// Distinct asset types, sorted
    pub asset_types: Vec<String>,
    /// Distinct edge kinds present
    pub edge_kinds: Vec<EdgeKind>,
}

/// Totals over the whole snapshot.
#[must_use]
pub fn graph_stats(snapshot: &GraphSnapshot) -> GraphStats {
    let total_assets = snapshot.asset_count();
    let operational_assets = snapshot
        .assets()
        .filter(|a| a.status.is_operational())
        .count();
    let failing_assets = snapshot
        .assets()
        .filter(|a| is_isolated(&a.status))
        .count();
    let asset_types: BTreeSet<&str> = snapshot.assets().map(|a| a.asset_type.as_str()).collect();
    let edge_kinds: BTreeSet<EdgeKind> = snapshot.edges().map(|e| e.kind).collect();

    GraphStats {
        version: snapshot.version(),
        total_assets,
        operational_assets,
        failing_assets,
        uptime_percent: percentage(operational_assets, total_assets),
        total_edges: snapshot.edge_count(),
        asset_types: asset_types.into_iter().map(str::to_string).collect(),
        edge_kinds: edge_kinds.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependencyEdge;
    use chrono::{TimeZone, Utc};

    fn asset(id: &str, asset_type: &str, status: &str) -> Asset {
        Asset::new(id, id, asset_type, status)
    }

    fn edge(source: &str, target: &str, kind: EdgeKind) -> DependencyEdge {
        DependencyEdge::new(source, target, kind)
    }

    #[test]
    fn network_failure_collects_only_down_descendants() {
        let snapshot = GraphSnapshot::from_parts(
            [
                asset("sw", "NetworkSwitch", "offline"),
                asset("gw", "EdgeGateway", "online"),
                asset("r1", "Robot", "unreachable"),
                asset("r2", "Robot", "online"),
            ],
            [
                edge("sw", "gw", EdgeKind::ConnectsTo),
                edge("gw", "r1", EdgeKind::ConnectsTo),
                edge("gw", "r2", EdgeKind::ConnectsTo),
            ],
            1,
        )
        .unwrap();

        let failures = network_path_failures(&snapshot).unwrap();
        assert_eq!(failures.len(), 1);
        let ids: Vec<_> = failures[0].isolated.iter().map(|r| r.asset.id.as_str()).collect();
        assert_eq!(ids, vec!["r1"]);
        assert_eq!(failures[0].isolated[0].distance, 2);
        assert_eq!(failures[0].severity, Severity::Medium);
    }

    #[test]
    fn power_disruption_scores_critical_equipment() {
        let snapshot = GraphSnapshot::from_parts(
            [
                asset("ups", "UPS", "battery"),
                asset("plc", "PLC", "online"),
                asset("srv", "Server", "offline"),
                asset("cam", "Camera", "online"),
                asset("main-power", "Breaker", "error"),
            ],
            [
                edge("ups", "plc", EdgeKind::Powers),
                edge("ups", "srv", EdgeKind::Powers),
                edge("ups", "cam", EdgeKind::Powers),
            ],
            1,
        )
        .unwrap();

        let disruptions = power_disruptions(&snapshot).unwrap();
        // name matching is case-sensitive, so main-power is not a power source
        assert_eq!(disruptions.len(), 1);
        let ups = &disruptions[0];
        assert_eq!(ups.critical_equipment, 2);
        assert_eq!(ups.currently_offline, 1);
        assert_eq!(ups.risk_score, 9);
        assert_eq!(ups.severity, Severity::High);
    }

    #[test]
    fn cascades_need_a_failed_descendant() {
        let snapshot = GraphSnapshot::from_parts(
            [
                asset("a", "PLC", "offline"),
                asset("b", "Robot", "error"),
                asset("c", "PLC", "offline"),
                asset("d", "Robot", "online"),
            ],
            [
                edge("a", "b", EdgeKind::Controls),
                edge("c", "d", EdgeKind::Controls),
            ],
            1,
        )
        .unwrap();

        let cascades = failure_cascades(&snapshot).unwrap();
        assert_eq!(cascades.len(), 1);
        assert_eq!(cascades[0].source.id.as_str(), "a");
    }

    #[test]
    fn upstream_analysis_skips_depends_on() {
        let snapshot = GraphSnapshot::from_parts(
            [
                asset("db", "Server", "online"),
                asset("ups", "UPS", "online"),
                asset("app", "Server", "degraded"),
            ],
            [
                edge("db", "app", EdgeKind::DependsOn),
                edge("ups", "app", EdgeKind::Powers),
            ],
            1,
        )
        .unwrap();

        let analyses = upstream_analysis(&snapshot).unwrap();
        assert_eq!(analyses.len(), 1);
        let ids: Vec<_> = analyses[0].upstream.iter().map(|r| r.asset.id.as_str()).collect();
        assert_eq!(ids, vec!["ups"]);
    }

    #[test]
    fn blast_radius_uses_inclusive_bands() {
        let mut assets = vec![asset("ups", "UPS", "online"), asset("sw", "NetworkSwitch", "online")];
        let mut edges = Vec::new();
        for i in 0..5 {
            let id = format!("plc-{i}");
            assets.push(asset(&id, "PLC", "online"));
            edges.push(edge("ups", &id, EdgeKind::Powers));
        }
        let snapshot = GraphSnapshot::from_parts(assets, edges, 1).unwrap();

        let radii = blast_radius(&snapshot).unwrap();
        assert_eq!(radii.len(), 1);
        assert_eq!(radii[0].affected.len(), 5);
        assert_eq!(radii[0].risk, Severity::High);
    }

    #[test]
    fn critical_assets_rank_by_downstream_then_id() {
        let snapshot = GraphSnapshot::from_parts(
            [
                asset("b", "PLC", "online"),
                asset("a", "PLC", "online"),
                asset("x", "Robot", "online"),
                asset("y", "Robot", "online"),
            ],
            [
                edge("b", "x", EdgeKind::Controls),
                edge("a", "y", EdgeKind::Controls),
            ],
            1,
        )
        .unwrap();

        let ranked = critical_assets(&snapshot).unwrap();
        let ids: Vec<_> = ranked.iter().map(|c| c.asset.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(ranked[0].criticality, Severity::Low);
    }

    #[test]
    fn related_incidents_look_both_ways_newest_first() {
        let mut plc = asset("plc", "PLC", "offline");
        plc.last_failure = Some(Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap());
        let mut sibling = asset("sibling", "PLC", "warning");
        sibling.last_failure = Some(Utc.with_ymd_and_hms(2026, 1, 5, 11, 0, 0).unwrap());
        let snapshot = GraphSnapshot::from_parts(
            [
                asset("ups", "UPS", "degraded"),
                plc,
                sibling,
                asset("robot", "Robot", "error"),
            ],
            [
                edge("ups", "plc", EdgeKind::Powers),
                edge("ups", "sibling", EdgeKind::Powers),
                edge("plc", "robot", EdgeKind::Controls),
            ],
            1,
        )
        .unwrap();

        let incidents = related_incidents(&snapshot, "plc").unwrap();
        let ids: Vec<_> = incidents.iter().map(|i| i.asset.id.as_str()).collect();
        // robot is only reachable over CONTROLS, which is not followed
        assert_eq!(ids, vec!["sibling", "plc", "ups"]);
        assert_eq!(incidents[1].severity, Severity::Critical);
        assert_eq!(incidents[2].severity, Severity::High);
        assert_eq!(incidents[0].severity, Severity::Medium);
    }

    fn loaded(id: &str, asset_type: &str, status: &str, utilization: f64) -> Asset {
        Asset {
            utilization_percent: Some(utilization),
            ..asset(id, asset_type, status)
        }
    }

    #[test]
    fn performance_issues_rank_by_bottleneck_score() {
        let snapshot = GraphSnapshot::from_parts(
            [
                asset("hist", "Server", "degraded"),
                asset("n1", "Sensor", "slow"),
                asset("n2", "Sensor", "warning"),
                asset("n3", "Sensor", "degraded"),
                asset("n4", "Sensor", "slow"),
                asset("db", "Server", "online"),
                asset("pwr", "UPS", "online"),
                loaded("busy", "PLC", "running", 92.0),
                loaded("idle", "PLC", "running", 40.0),
                loaded("cold", "Server", "online", 95.0),
            ],
            [
                edge("n1", "hist", EdgeKind::FeedsData),
                edge("hist", "n2", EdgeKind::ConnectsTo),
                edge("n3", "hist", EdgeKind::ConnectsTo),
                edge("hist", "n4", EdgeKind::FeedsData),
                edge("db", "hist", EdgeKind::DependsOn),
                edge("pwr", "hist", EdgeKind::Powers),
            ],
            1,
        )
        .unwrap();

        let issues = performance_degradation(&snapshot).unwrap();
        let ids: Vec<_> = issues.iter().map(|i| i.asset.id.as_str()).collect();
        assert_eq!(ids, vec!["hist", "n4", "n1", "n2", "n3", "busy"]);

        let hist = &issues[0];
        assert_eq!(hist.related.len(), 4);
        // n1 over FEEDS_DATA and db over DEPENDS_ON; POWERS is not a supplier here
        assert_eq!(hist.upstream_count, 2);
        assert_eq!(hist.bottleneck_score, 10);
        assert_eq!(hist.severity, Severity::High);
        assert_eq!(hist.pattern, PerformancePattern::WidespreadDegradation);
        assert_eq!(
            hist.recommendation,
            PerformanceRecommendation::CheckSharedInfrastructure
        );

        let busy = &issues[5];
        assert_eq!(busy.bottleneck_score, 0);
        assert!(busy.utilization_percent.is_some_and(|u| u > 85.0));
        assert_eq!(busy.pattern, PerformancePattern::Isolated);
        assert_eq!(busy.recommendation, PerformanceRecommendation::InvestigateAsset);
    }

    #[test]
    fn saturated_server_with_many_suppliers_is_a_bottleneck() {
        let suppliers: Vec<Asset> = (0..6)
            .map(|i| asset(&format!("svc{i}"), "Service", "online"))
            .collect();
        let edges: Vec<DependencyEdge> = suppliers
            .iter()
            .map(|s| edge(s.id.as_str(), "api", EdgeKind::DependsOn))
            .collect();
        let snapshot = GraphSnapshot::from_parts(
            suppliers
                .into_iter()
                .chain([loaded("api", "Server", "running", 97.0)]),
            edges,
            1,
        )
        .unwrap();

        let issues = performance_degradation(&snapshot).unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].upstream_count, 6);
        assert_eq!(issues[0].bottleneck_score, 6);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(issues[0].pattern, PerformancePattern::Bottleneck);
        assert_eq!(
            issues[0].recommendation,
            PerformanceRecommendation::ScaleResources
        );
    }

    #[test]
    fn stats_over_empty_and_small_graphs() {
        let empty = graph_stats(&GraphSnapshot::empty());
        assert_eq!(empty.total_assets, 0);
        assert!(empty.uptime_percent.abs() < f64::EPSILON);

        let snapshot = GraphSnapshot::from_parts(
            [
                asset("a", "PLC", "online"),
                asset("b", "UPS", "running"),
                asset("c", "PLC", "unreachable"),
            ],
            [edge("b", "a", EdgeKind::Powers)],
            7,
        )
        .unwrap();
        let stats = graph_stats(&snapshot);
        assert_eq!(stats.version, 7);
        assert_eq!(stats.operational_assets, 2);
        assert_eq!(stats.failing_assets, 1);
        assert!((stats.uptime_percent - 66.7).abs() < f64::EPSILON);
        assert_eq!(stats.asset_types, vec!["PLC", "UPS"]);
        assert_eq!(stats.edge_kinds, vec![EdgeKind::Powers]);
    }
}
