//! Workspace configuration.
//!
//! Stored as YAML at `.faultline/config.yaml`:
//!
//! ```yaml
//! snapshot-file: .faultline/graph.jsonl
//! intent-file: .faultline/intent.jsonl
//! spof-timeout-ms: 30000
//! ```
//!
//! Analysis depths and thresholds are fixed and not configurable here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Name of the workspace directory.
pub const FAULTLINE_DIR_NAME: &str = ".faultline";

/// Name of the config file within the workspace directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default snapshot file name.
pub const SNAPSHOT_FILE_NAME: &str = "graph.jsonl";

/// Default intent file name.
pub const INTENT_FILE_NAME: &str = "intent.jsonl";

/// Configuration file structure for faultline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaultlineConfig {
    /// JSONL snapshot of assets and edges
    #[serde(rename = "snapshot-file")]
    pub snapshot_file: PathBuf,

    /// JSONL file of intended configuration records
    #[serde(rename = "intent-file")]
    pub intent_file: PathBuf,

    /// Time limit for single-point-of-failure scans, in milliseconds
    #[serde(
        rename = "spof-timeout-ms",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub spof_timeout_ms: Option<u64>,
}

impl FaultlineConfig {
    /// Default config path under `base_dir`.
    #[must_use]
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join(FAULTLINE_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it is not valid YAML for this structure.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for a file that exists.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails and `Error::Io` if the
    /// file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// SPOF time limit, if one is configured.
    #[must_use]
    pub fn spof_timeout(&self) -> Option<Duration> {
        self.spof_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for FaultlineConfig {
    fn default() -> Self {
        let dir = Path::new(FAULTLINE_DIR_NAME);
        Self {
            snapshot_file: dir.join(SNAPSHOT_FILE_NAME),
            intent_file: dir.join(INTENT_FILE_NAME),
            spof_timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = FaultlineConfig {
            spof_timeout_ms: Some(1500),
            ..FaultlineConfig::default()
        };

        config.save(&path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("snapshot-file:"));
        assert!(written.contains("spof-timeout-ms: 1500"));

        let loaded = FaultlineConfig::load(&path).await.unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.spof_timeout(), Some(Duration::from_millis(1500)));
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = FaultlineConfig::load_or_default(&FaultlineConfig::default_path(dir.path()))
            .await
            .unwrap();
        assert_eq!(config, FaultlineConfig::default());
        assert_eq!(config.snapshot_file, Path::new(".faultline/graph.jsonl"));
    }

    #[tokio::test]
    async fn invalid_yaml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "snapshot-file: [unclosed").unwrap();

        let err = FaultlineConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
