//! Operational status of an asset.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Operational status reported for an asset.
///
/// Parsing is case-insensitive and never fails: strings outside the known
/// vocabulary become [`AssetStatus::Unknown`], which every analyzer treats as
/// healthy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetStatus {
    /// Reachable and reporting normally.
    Online,
    /// Actively running its workload.
    Running,
    /// Reporting a warning condition.
    Warning,
    /// Working with reduced capability.
    Degraded,
    /// Responding, but slower than expected.
    Slow,
    /// Power equipment running from its battery.
    OnBattery,
    /// Not reporting at all.
    Offline,
    /// Reporting a fault.
    Error,
    /// Cannot be reached over the network.
    Unreachable,
    /// Failed outright.
    Failed,
    /// Any status string outside the known vocabulary, kept verbatim.
    Unknown(String),
}

impl AssetStatus {
    /// Status values that count as a failure for root-cause and cascade analysis.
    ///
    /// Offline, error, failed, unreachable, degraded and warning.
    #[must_use]
    pub fn is_unhealthy(&self) -> bool {
        self.is_down() || self.is_degraded()
    }

    /// Offline, error, failed or unreachable.
    #[must_use]
    pub fn is_down(&self) -> bool {
        matches!(
            self,
            Self::Offline | Self::Error | Self::Failed | Self::Unreachable
        )
    }

    /// Warning or degraded.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Warning | Self::Degraded)
    }

    /// Online or running.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Online | Self::Running)
    }

    /// Offline or error: the narrow "hard failure" class used by the
    /// network and cascade scans.
    #[must_use]
    pub fn is_hard_failure(&self) -> bool {
        matches!(self, Self::Offline | Self::Error)
    }

    /// The canonical lowercase spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Running => "running",
            Self::Warning => "warning",
            Self::Degraded => "degraded",
            Self::Slow => "slow",
            Self::OnBattery => "battery",
            Self::Offline => "offline",
            Self::Error => "error",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for AssetStatus {
    fn default() -> Self {
        Self::Unknown("unknown".to_string())
    }
}

impl FromStr for AssetStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_lowercase().as_str() {
            "online" => Self::Online,
            "running" => Self::Running,
            "warning" => Self::Warning,
            "degraded" => Self::Degraded,
            "slow" => Self::Slow,
            "battery" | "on_battery" => Self::OnBattery,
            "offline" => Self::Offline,
            "error" => Self::Error,
            "unreachable" => Self::Unreachable,
            "failed" => Self::Failed,
            _ => Self::Unknown(s.to_string()),
        };
        Ok(status)
    }
}

impl From<String> for AssetStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for AssetStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<AssetStatus> for String {
    fn from(status: AssetStatus) -> Self {
        match status {
            AssetStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("offline", true)]
    #[case("ERROR", true)]
    #[case("failed", true)]
    #[case("unreachable", true)]
    #[case("Degraded", true)]
    #[case("warning", true)]
    #[case("online", false)]
    #[case("running", false)]
    #[case("slow", false)]
    #[case("battery", false)]
    #[case("maintenance", false)]
    fn unhealthy_vocabulary(#[case] raw: &str, #[case] unhealthy: bool) {
        assert_eq!(AssetStatus::from(raw).is_unhealthy(), unhealthy);
    }

    #[test]
    fn unknown_status_keeps_original_text() {
        let status = AssetStatus::from("Maintenance");
        assert_eq!(status, AssetStatus::Unknown("Maintenance".to_string()));
        assert_eq!(status.to_string(), "Maintenance");
    }

    #[test]
    fn serde_round_trips_through_plain_strings() {
        let json = serde_json::to_string(&AssetStatus::OnBattery).unwrap();
        assert_eq!(json, "\"battery\"");
        let parsed: AssetStatus = serde_json::from_str("\"OFFLINE\"").unwrap();
        assert_eq!(parsed, AssetStatus::Offline);
    }
}
