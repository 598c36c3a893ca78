//! Engine facade over the analyzers.
//!
//! The engine holds the current [`GraphSnapshot`] behind an
//! `RwLock<Arc<GraphSnapshot>>`. Publication is copy-on-write:
//!
//! ```text
//! refresh():   provider.load_snapshot(v) ──► write lock ──► swap Arc ──► unlock
//! operation:   read lock ──► clone Arc ──► unlock ──► analyze (no lock held)
//! ```
//!
//! An operation clones the `Arc` once and runs entirely against that
//! version, so a concurrent refresh never changes the graph under an
//! in-flight query. Any number of operations may run at once.

use crate::analysis::scans::{
    self, BlastRadius, CriticalAsset, FailureCascade, GraphStats, Incident, NetworkPathFailure,
    PerformanceIssue, PowerDisruption, UpstreamAnalysis,
};
use crate::analysis::{self, CascadeImpact, DriftReport, RootCause, SpofFinding};
use crate::cancellation::CancellationToken;
use crate::error::{Error, Result};
use crate::graph::GraphSnapshot;
use crate::provider::{ConfigProvider, GraphProvider, LoadWarning};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Holds the live snapshot and runs analyses against it.
pub struct Engine {
    graph_provider: Box<dyn GraphProvider>,
    config_provider: Box<dyn ConfigProvider>,
    current: RwLock<Arc<GraphSnapshot>>,
    last_version: AtomicU64,
}

impl Engine {
    /// Create an engine holding an empty snapshot at version 0.
    ///
    /// Call [`refresh`](Self::refresh) to load the first real snapshot.
    pub fn new(
        graph_provider: Box<dyn GraphProvider>,
        config_provider: Box<dyn ConfigProvider>,
    ) -> Self {
        Self {
            graph_provider,
            config_provider,
            current: RwLock::new(Arc::new(GraphSnapshot::empty())),
            last_version: AtomicU64::new(0),
        }
    }

    /// Create an engine and load its first snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the graph provider's error.
    pub async fn open(
        graph_provider: Box<dyn GraphProvider>,
        config_provider: Box<dyn ConfigProvider>,
    ) -> Result<(Self, Vec<LoadWarning>)> {
        let engine = Self::new(graph_provider, config_provider);
        let warnings = engine.refresh().await?;
        Ok((engine, warnings))
    }

    /// Load a new snapshot from the graph provider and publish it.
    ///
    /// Returns the records skipped while loading. Versions increase by one
    /// per refresh; if two refreshes race, the newer version stays published.
    ///
    /// # Errors
    ///
    /// Propagates the graph provider's error unchanged. The previously
    /// published snapshot stays in place.
    pub async fn refresh(&self) -> Result<Vec<LoadWarning>> {
        let version = self.last_version.fetch_add(1, Ordering::SeqCst) + 1;
        let load = self.graph_provider.load_snapshot(version).await?;
        let assets = load.snapshot.asset_count();
        let edges = load.snapshot.edge_count();

        let live = {
            let mut current = self.current.write().await;
            if current.version() < version {
                *current = Arc::new(load.snapshot);
            }
            current.version()
        };

        if live == version {
            tracing::info!(
                version,
                assets,
                edges,
                warnings = load.warnings.len(),
                "Published snapshot"
            );
        } else {
            tracing::debug!(version, live, "Newer snapshot already published, discarding");
        }
        Ok(load.warnings)
    }

    /// The currently published snapshot.
    pub async fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// See [`analysis::find_root_cause`].
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if no asset has this name.
    pub async fn find_root_cause(&self, target_name: &str) -> Result<RootCause> {
        let snapshot = self.snapshot().await;
        tracing::debug!(target = target_name, version = snapshot.version(), "Finding root cause");
        analysis::find_root_cause(&snapshot, target_name)
    }

    /// See [`analysis::analyze_cascade_impact`].
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if no asset has this name.
    pub async fn analyze_cascade_impact(&self, source_name: &str) -> Result<CascadeImpact> {
        let snapshot = self.snapshot().await;
        tracing::debug!(source = source_name, version = snapshot.version(), "Analyzing cascade impact");
        analysis::analyze_cascade_impact(&snapshot, source_name)
    }

    /// See [`analysis::find_single_points_of_failure`].
    ///
    /// The batch runs on the blocking pool so it does not stall the runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` if `cancel` fires before the batch finishes.
    pub async fn find_single_points_of_failure(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<SpofFinding>> {
        let snapshot = self.snapshot().await;
        let cancel = cancel.clone();
        tracing::debug!(version = snapshot.version(), "Scoring single points of failure");

        match tokio::task::spawn_blocking(move || {
            analysis::find_single_points_of_failure(&snapshot, &cancel)
        })
        .await
        {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
            Err(_) => Err(Error::Cancelled),
        }
    }

    /// SPOF scan that cancels itself after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` if the scan does not finish in time.
    pub async fn find_single_points_of_failure_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Vec<SpofFinding>> {
        let token = CancellationToken::new();
        let timer = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                tracing::warn!(timeout_ms = timeout.as_millis(), "SPOF scan timed out, cancelling");
                token.cancel();
            })
        };

        let result = self.find_single_points_of_failure(&token).await;
        timer.abort();
        result
    }

    /// Compare the snapshot against the config provider's declared intent.
    ///
    /// # Errors
    ///
    /// Propagates the config provider's error unchanged.
    pub async fn detect_drift(&self) -> Result<DriftReport> {
        let intents = self.config_provider.intended_configs().await?;
        let snapshot = self.snapshot().await;
        Ok(analysis::detect_drift(&snapshot, &intents))
    }

    /// See [`scans::related_incidents`].
    ///
    /// # Errors
    ///
    /// Returns `Error::AssetNotFound` if no asset has this name.
    pub async fn related_incidents(&self, asset_name: &str) -> Result<Vec<Incident>> {
        scans::related_incidents(&*self.snapshot().await, asset_name)
    }

    /// See [`scans::network_path_failures`].
    ///
    /// # Errors
    ///
    /// Propagates traversal errors.
    pub async fn network_path_failures(&self) -> Result<Vec<NetworkPathFailure>> {
        scans::network_path_failures(&*self.snapshot().await)
    }

    /// See [`scans::power_disruptions`].
    ///
    /// # Errors
    ///
    /// Propagates traversal errors.
    pub async fn power_disruptions(&self) -> Result<Vec<PowerDisruption>> {
        scans::power_disruptions(&*self.snapshot().await)
    }

    /// See [`scans::failure_cascades`].
    ///
    /// # Errors
    ///
    /// Propagates traversal errors.
    pub async fn failure_cascades(&self) -> Result<Vec<FailureCascade>> {
        scans::failure_cascades(&*self.snapshot().await)
    }

    /// See [`scans::upstream_analysis`].
    ///
    /// # Errors
    ///
    /// Propagates traversal errors.
    pub async fn upstream_analysis(&self) -> Result<Vec<UpstreamAnalysis>> {
        scans::upstream_analysis(&*self.snapshot().await)
    }

    /// See [`scans::blast_radius`].
    ///
    /// # Errors
    ///
    /// Propagates traversal errors.
    pub async fn blast_radius(&self) -> Result<Vec<BlastRadius>> {
        scans::blast_radius(&*self.snapshot().await)
    }

    /// See [`scans::critical_assets`].
    ///
    /// # Errors
    ///
    /// Propagates traversal errors.
    pub async fn critical_assets(&self) -> Result<Vec<CriticalAsset>> {
        scans::critical_assets(&*self.snapshot().await)
    }

    /// See [`scans::performance_degradation`].
    ///
    /// # Errors
    ///
    /// Propagates traversal errors.
    pub async fn performance_degradation(&self) -> Result<Vec<PerformanceIssue>> {
        scans::performance_degradation(&*self.snapshot().await)
    }

    /// See [`scans::graph_stats`].
    pub async fn graph_stats(&self) -> GraphStats {
        scans::graph_stats(&*self.snapshot().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Asset, ConfigMap, DependencyEdge, EdgeKind};
    use crate::provider::{SnapshotLoad, StaticConfigProvider, StaticGraphProvider};
    use async_trait::async_trait;

    struct UnavailableProvider;

    #[async_trait]
    impl GraphProvider for UnavailableProvider {
        async fn load_snapshot(&self, _version: u64) -> Result<SnapshotLoad> {
            Err(Error::Provider("backing store unavailable".to_string()))
        }
    }

    /// Holds back the first load so a later refresh overtakes it.
    struct SlowFirstLoad(StaticGraphProvider);

    #[async_trait]
    impl GraphProvider for SlowFirstLoad {
        async fn load_snapshot(&self, version: u64) -> Result<SnapshotLoad> {
            if version == 1 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.0.load_snapshot(version).await
        }
    }

    fn plant() -> StaticGraphProvider {
        StaticGraphProvider::new(
            vec![
                Asset::new("ups", "UPS", "UPS", "offline"),
                Asset::new("plc1", "PLC1", "PLC", "offline"),
                Asset::new("robot1", "Robot1", "Robot", "offline"),
            ],
            vec![
                DependencyEdge::new("ups", "plc1", EdgeKind::Powers),
                DependencyEdge::new("plc1", "robot1", EdgeKind::Controls),
            ],
        )
    }

    #[tokio::test]
    async fn fresh_engine_is_empty_until_refreshed() {
        let engine = Engine::new(Box::new(plant()), Box::new(StaticConfigProvider::default()));
        assert_eq!(engine.snapshot().await.version(), 0);
        assert!(engine.find_root_cause("Robot1").await.unwrap_err().is_not_found());

        engine.refresh().await.unwrap();
        let rc = engine.find_root_cause("Robot1").await.unwrap();
        assert_eq!(rc.root.name, "UPS");
        assert_eq!(engine.snapshot().await.version(), 1);
    }

    #[tokio::test]
    async fn held_snapshot_survives_refresh() {
        let (engine, _) = Engine::open(Box::new(plant()), Box::new(StaticConfigProvider::default()))
            .await
            .unwrap();
        let held = engine.snapshot().await;
        engine.refresh().await.unwrap();

        assert_eq!(held.version(), 1);
        assert_eq!(engine.snapshot().await.version(), 2);
    }

    #[tokio::test]
    async fn overtaken_refresh_does_not_replace_newer_snapshot() {
        let engine = Engine::new(
            Box::new(SlowFirstLoad(plant())),
            Box::new(StaticConfigProvider::default()),
        );

        let (first, second) = tokio::join!(engine.refresh(), engine.refresh());

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(engine.snapshot().await.version(), 2);
    }

    #[tokio::test]
    async fn provider_error_propagates_and_keeps_old_snapshot() {
        let engine = Engine::new(
            Box::new(UnavailableProvider),
            Box::new(StaticConfigProvider::default()),
        );
        let err = engine.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert_eq!(engine.snapshot().await.version(), 0);
    }

    #[tokio::test]
    async fn drift_uses_config_provider() {
        let intents = StaticConfigProvider::new(vec![ConfigMap {
            asset: "PLC1".to_string(),
            status: Some("running".to_string()),
            ..ConfigMap::default()
        }]);
        let (engine, _) = Engine::open(Box::new(plant()), Box::new(intents)).await.unwrap();

        let report = engine.detect_drift().await.unwrap();
        assert_eq!(report.summary.drifted_assets, 1);
        assert_eq!(report.summary.unmanaged_assets, 2);
    }

    #[tokio::test]
    async fn pre_cancelled_spof_scan_reports_cancelled() {
        let (engine, _) = Engine::open(Box::new(plant()), Box::new(StaticConfigProvider::default()))
            .await
            .unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let err = engine.find_single_points_of_failure(&token).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));

        let findings = engine
            .find_single_points_of_failure_with_timeout(Duration::from_secs(30))
            .await
            .unwrap();
        assert!(findings.is_empty());
    }

    /// Layers of `width` assets, every asset powering the whole next layer.
    fn layered_plant(layers: usize, width: usize) -> StaticGraphProvider {
        let id = |layer: usize, i: usize| format!("l{layer}-{i}");
        let assets = (0..layers)
            .flat_map(|layer| (0..width).map(move |i| (layer, i)))
            .map(|(layer, i)| Asset::new(id(layer, i), id(layer, i), "PowerSupply", "online"))
            .collect();
        let edges = (1..layers)
            .flat_map(|layer| {
                (0..width).flat_map(move |from| (0..width).map(move |to| (layer, from, to)))
            })
            .map(|(layer, from, to)| {
                DependencyEdge::new(id(layer - 1, from), id(layer, to), EdgeKind::Powers)
            })
            .collect();
        StaticGraphProvider::new(assets, edges)
    }

    #[tokio::test]
    async fn elapsed_timeout_cancels_spof_scan() {
        let (engine, _) = Engine::open(
            Box::new(layered_plant(5, 120)),
            Box::new(StaticConfigProvider::default()),
        )
        .await
        .unwrap();

        let err = engine
            .find_single_points_of_failure_with_timeout(Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
    }
}
