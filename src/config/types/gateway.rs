//! Gateway playback configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// WebSocket gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// File streamed as the binary frame
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,
    /// Pause between the greeting and the warning
    #[serde(default = "default_warning_delay", with = "humantime_serde")]
    pub warning_delay: Duration,
    /// Pause between the warning and the artifact
    #[serde(default = "default_artifact_delay", with = "humantime_serde")]
    pub artifact_delay: Duration,
    /// What to do when the artifact cannot be read
    #[serde(default)]
    pub missing_artifact: MissingArtifact,
    /// Guard `/ws/gateway` with the bearer token as well
    #[serde(default)]
    pub require_auth: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            artifact: default_artifact(),
            warning_delay: default_warning_delay(),
            artifact_delay: default_artifact_delay(),
            missing_artifact: MissingArtifact::default(),
            require_auth: false,
        }
    }
}

fn default_artifact() -> PathBuf {
    PathBuf::from("test.tgz")
}

fn default_warning_delay() -> Duration {
    Duration::from_millis(1000)
}

fn default_artifact_delay() -> Duration {
    Duration::from_millis(2500)
}

/// Policy for an unreadable artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingArtifact {
    /// Send an error message and close the socket
    #[default]
    Abort,
    /// Leave the binary frame out and carry on
    Skip,
    /// Send a zero-length binary frame and carry on
    Empty,
}

impl std::str::FromStr for MissingArtifact {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(MissingArtifact::Abort),
            "skip" => Ok(MissingArtifact::Skip),
            "empty" => Ok(MissingArtifact::Empty),
            _ => Err(crate::error::Error::Config(format!(
                "Invalid missing_artifact policy: {}. Valid options: abort, skip, empty",
                s
            ))),
        }
    }
}

impl std::fmt::Display for MissingArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingArtifact::Abort => write!(f, "abort"),
            MissingArtifact::Skip => write!(f, "skip"),
            MissingArtifact::Empty => write!(f, "empty"),
        }
    }
}
