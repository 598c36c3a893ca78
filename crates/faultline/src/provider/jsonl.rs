//! JSONL-backed providers.
//!
//! A snapshot file holds one tagged record per line, assets and edges in any
//! order:
//!
//! ```text
//! {"record":"asset","id":"ups-1","name":"UPS-Main","type":"UPS","status":"online"}
//! {"record":"edge","source":"ups-1","target":"plc-1","kind":"POWERS"}
//! ```
//!
//! An intent file holds one [`ConfigMap`] per line.
//!
//! Both files are re-read on every call, so a refresh picks up whatever the
//! external collector has written since.

use super::{ConfigProvider, GraphProvider, LoadWarning, SnapshotLoad, assemble};
use crate::domain::{Asset, AssetId, ConfigMap, DependencyEdge, EdgeKind};
use crate::error::{Error, Result};
use async_trait::async_trait;
use faultline_jsonl::{Warning as JsonlWarning, read_jsonl_resilient};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One line of a snapshot file.
#[derive(Debug, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum SnapshotRecord {
    Asset(Asset),
    Edge(EdgeRecord),
}

/// Edge as written; the kind is checked after parsing so that an unknown
/// kind is reported as such rather than as a malformed line.
#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: AssetId,
    target: AssetId,
    kind: String,
}

fn from_jsonl(e: faultline_jsonl::Error) -> Error {
    match e {
        faultline_jsonl::Error::Io(io_err) => Error::Io(io_err),
        other => Error::Jsonl(other),
    }
}

/// Graph provider reading a JSONL snapshot file.
#[derive(Debug, Clone)]
pub struct JsonlGraphProvider {
    path: PathBuf,
}

impl JsonlGraphProvider {
    /// Read snapshots from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GraphProvider for JsonlGraphProvider {
    async fn load_snapshot(&self, version: u64) -> Result<SnapshotLoad> {
        let (records, jsonl_warnings) = read_jsonl_resilient::<SnapshotRecord, _>(&self.path)
            .await
            .map_err(from_jsonl)?;

        let mut warnings: Vec<LoadWarning> = jsonl_warnings
            .into_iter()
            .map(|warning| match warning {
                JsonlWarning::MalformedJson { line_number, error } => {
                    LoadWarning::MalformedRecord { line_number, error }
                }
                JsonlWarning::SkippedLine {
                    line_number,
                    reason,
                } => LoadWarning::MalformedRecord {
                    line_number,
                    error: reason,
                },
            })
            .collect();

        let mut assets = Vec::new();
        let mut edges = Vec::new();
        for record in records {
            match record {
                SnapshotRecord::Asset(asset) => assets.push(asset),
                SnapshotRecord::Edge(edge) => match edge.kind.parse::<EdgeKind>() {
                    Ok(kind) => edges.push(DependencyEdge::new(edge.source, edge.target, kind)),
                    Err(_) => {
                        tracing::warn!(
                            source = %edge.source,
                            target = %edge.target,
                            kind = %edge.kind,
                            "Skipping edge of unknown kind"
                        );
                        warnings.push(LoadWarning::UnknownEdgeKind {
                            source: edge.source,
                            target: edge.target,
                            kind: edge.kind,
                        });
                    }
                },
            }
        }

        let snapshot = assemble(assets, edges, version, &mut warnings)?;
        tracing::debug!(
            path = %self.path.display(),
            assets = snapshot.asset_count(),
            edges = snapshot.edge_count(),
            warnings = warnings.len(),
            "Loaded snapshot file"
        );
        Ok(SnapshotLoad { snapshot, warnings })
    }
}

/// Config provider reading a JSONL intent file.
#[derive(Debug, Clone)]
pub struct JsonlConfigProvider {
    path: PathBuf,
}

impl JsonlConfigProvider {
    /// Read intent from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The intent file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigProvider for JsonlConfigProvider {
    async fn intended_configs(&self) -> Result<Vec<ConfigMap>> {
        let (configs, warnings) = read_jsonl_resilient::<ConfigMap, _>(&self.path)
            .await
            .map_err(from_jsonl)?;
        tracing::debug!(
            path = %self.path.display(),
            configs = configs.len(),
            skipped = warnings.len(),
            "Loaded intent file"
        );
        Ok(configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[tokio::test]
    async fn loads_assets_and_edges_in_any_order() {
        let snapshot_file = file(&[
            r#"{"record":"edge","source":"ups","target":"plc","kind":"POWERS"}"#,
            r#"{"record":"asset","id":"ups","name":"UPS-Main","type":"UPS","status":"online","batteryLevel":87}"#,
            r#"{"record":"asset","id":"plc","name":"PLC-001","type":"PLC","status":"Running"}"#,
        ]);

        let load = JsonlGraphProvider::new(snapshot_file.path())
            .load_snapshot(1)
            .await
            .unwrap();

        assert!(load.warnings.is_empty(), "{:?}", load.warnings);
        assert_eq!(load.snapshot.edge_count(), 1);
        let ups = load.snapshot.find_by_name("UPS-Main").unwrap();
        assert_eq!(ups.battery_level, Some(87.0));
        assert!(!ups.attributes.contains_key("record"));
    }

    #[tokio::test]
    async fn damaged_lines_become_warnings() {
        let snapshot_file = file(&[
            r#"{"record":"asset","id":"a","name":"A"}"#,
            r#"{"record":"asset","id":"b","name":"B"}"#,
            r#"{"record":"edge","source":"a","target":"b","kind":"LOCATED_IN"}"#,
            r#"{"record":"edge","source":"a","target":"b""#,
            r#"{"record":"edge","source":"a","target":"zz","kind":"POWERS"}"#,
        ]);

        let load = JsonlGraphProvider::new(snapshot_file.path())
            .load_snapshot(1)
            .await
            .unwrap();

        assert_eq!(load.snapshot.asset_count(), 2);
        assert_eq!(load.snapshot.edge_count(), 0);
        assert!(matches!(
            load.warnings[0],
            LoadWarning::MalformedRecord { line_number: 4, .. }
        ));
        assert!(matches!(
            &load.warnings[1],
            LoadWarning::UnknownEdgeKind { kind, .. } if kind == "LOCATED_IN"
        ));
        assert!(matches!(load.warnings[2], LoadWarning::OrphanedEdge { .. }));
    }

    #[tokio::test]
    async fn missing_snapshot_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonlGraphProvider::new(dir.path().join("absent.jsonl"))
            .load_snapshot(1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn intent_file_reads_one_config_per_line() {
        let intent_file = file(&[
            r#"{"asset":"PLC-001","version":"2.5.0","sourceRepo":"plant-config"}"#,
            r#"not json"#,
            r#"{"asset":"Switch-01","securityZone":"Level 2"}"#,
        ]);

        let configs = JsonlConfigProvider::new(intent_file.path())
            .intended_configs()
            .await
            .unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].source_repo.as_deref(), Some("plant-config"));
        assert_eq!(configs[1].security_zone.as_deref(), Some("Level 2"));
    }
}
