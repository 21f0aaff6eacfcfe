//! Canned health document served on `/api/health`
//!
//! One [`HealthProfile`] renders into either layout the status client
//! understands: plain scalars, or every leaf wrapped as `{data, hue}`.

use serde::{Deserialize, Serialize};

use crate::config::{HealthProfile, HealthShape};

/// Display color attached to an annotated value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hue {
    Red,
    #[serde(rename = "bright red")]
    BrightRed,
    Yellow,
    Green,
    Cyan,
    Blue,
    #[serde(rename = "bright blue")]
    BrightBlue,
    Magenta,
    White,
}

/// A value plus its display color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hued<T> {
    pub data: T,
    pub hue: Hue,
}

impl<T> Hued<T> {
    pub fn new(data: T, hue: Hue) -> Self {
        Hued { data, hue }
    }
}

/// Plain layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainHealth {
    pub uptime: String,
    pub version: String,
    pub engine: String,
    pub status: PlainStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainStatus {
    pub healthy: bool,
    pub ping: u32,
    pub message: String,
    pub containers: Vec<String>,
}

/// Annotated layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedHealth {
    pub uptime: Hued<f64>,
    pub version: Hued<String>,
    pub engine: Hued<String>,
    pub status: AnnotatedStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedStatus {
    pub ping: Hued<u32>,
    pub healthy: Hued<String>,
    pub message: Hued<String>,
    pub containers: Hued<Vec<String>>,
}

/// The document `/api/health` answers with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HealthDocument {
    Plain(PlainHealth),
    Annotated(AnnotatedHealth),
}

impl HealthDocument {
    /// Render the profile in its configured shape
    pub fn build(profile: &HealthProfile) -> Self {
        match profile.shape {
            HealthShape::Plain => HealthDocument::Plain(plain(profile)),
            HealthShape::Annotated => HealthDocument::Annotated(annotated(profile)),
        }
    }

    pub fn shape(&self) -> HealthShape {
        match self {
            HealthDocument::Plain(_) => HealthShape::Plain,
            HealthDocument::Annotated(_) => HealthShape::Annotated,
        }
    }

    pub fn containers(&self) -> &[String] {
        match self {
            HealthDocument::Plain(doc) => &doc.status.containers,
            HealthDocument::Annotated(doc) => &doc.status.containers.data,
        }
    }
}

fn plain(profile: &HealthProfile) -> PlainHealth {
    PlainHealth {
        uptime: format!("{}d", profile.uptime_days),
        version: profile.version.clone(),
        engine: profile.engine.clone(),
        status: PlainStatus {
            healthy: profile.healthy,
            ping: profile.ping,
            message: profile.message.clone(),
            containers: profile.containers.clone(),
        },
    }
}

fn annotated(profile: &HealthProfile) -> AnnotatedHealth {
    let healthy = if profile.healthy { "yes" } else { "no" };
    let message = profile
        .annotated_message
        .clone()
        .unwrap_or_else(|| profile.message.clone());

    AnnotatedHealth {
        uptime: Hued::new(profile.uptime_days, Hue::Red),
        version: Hued::new(profile.version.clone(), Hue::BrightRed),
        engine: Hued::new(profile.engine.clone(), Hue::Yellow),
        status: AnnotatedStatus {
            ping: Hued::new(profile.ping, Hue::Green),
            healthy: Hued::new(healthy.to_string(), Hue::Cyan),
            message: Hued::new(message, Hue::BrightBlue),
            containers: Hued::new(profile.containers.clone(), Hue::Magenta),
        },
    }
}
