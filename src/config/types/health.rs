//! Health document configuration types

use serde::{Deserialize, Serialize};

/// Which JSON layout `/api/health` answers with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthShape {
    /// Raw scalar values
    #[default]
    Plain,
    /// Every leaf wrapped as `{data, hue}`
    Annotated,
}

impl std::str::FromStr for HealthShape {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(HealthShape::Plain),
            "annotated" | "hued" => Ok(HealthShape::Annotated),
            _ => Err(crate::error::Error::Config(format!(
                "Invalid health shape: {}. Valid options: plain, annotated",
                s
            ))),
        }
    }
}

impl std::fmt::Display for HealthShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthShape::Plain => write!(f, "plain"),
            HealthShape::Annotated => write!(f, "annotated"),
        }
    }
}

/// Values the canned health document is rendered from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Response layout
    #[serde(default)]
    pub shape: HealthShape,
    /// Reported uptime in days
    #[serde(default = "default_uptime_days")]
    pub uptime_days: f64,
    /// Reported server version
    #[serde(default = "default_version")]
    pub version: String,
    /// Container engine name
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Overall health flag
    #[serde(default = "default_healthy")]
    pub healthy: bool,
    /// Reported ping in milliseconds
    #[serde(default = "default_ping")]
    pub ping: u32,
    /// Status line
    #[serde(default = "default_message")]
    pub message: String,
    /// Status line for the annotated layout, `message` when unset
    #[serde(default)]
    pub annotated_message: Option<String>,
    /// Running containers, in display order
    #[serde(default = "default_containers")]
    pub containers: Vec<String>,
}

impl Default for HealthProfile {
    fn default() -> Self {
        HealthProfile {
            shape: HealthShape::default(),
            uptime_days: default_uptime_days(),
            version: default_version(),
            engine: default_engine(),
            healthy: default_healthy(),
            ping: default_ping(),
            message: default_message(),
            annotated_message: None,
            containers: default_containers(),
        }
    }
}

fn default_uptime_days() -> f64 {
    168.44
}

fn default_version() -> String {
    "0.2.1".to_string()
}

fn default_engine() -> String {
    "docker".to_string()
}

fn default_healthy() -> bool {
    true
}

fn default_ping() -> u32 {
    36
}

fn default_message() -> String {
    "All services running".to_string()
}

fn default_containers() -> Vec<String> {
    vec!["build".to_string(), "build/ui".to_string()]
}
