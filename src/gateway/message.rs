//! Gateway wire types
//!
//! Text frames carry a JSON [`GatewayMessage`]; the artifact goes out as a
//! raw binary frame.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

/// Severity tag the status client colors messages by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Fatal,
    Error,
    Warning,
    Success,
    Notice,
    Info,
    Debug,
}

/// A JSON message pushed over the gateway socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub level: Level,
    /// Milliseconds since the Unix epoch at send time
    pub time: i64,
    pub data: serde_json::Value,
}

impl GatewayMessage {
    pub fn new(level: Level, time: DateTime<Utc>, data: serde_json::Value) -> Self {
        GatewayMessage {
            level,
            time: time.timestamp_millis(),
            data,
        }
    }

    /// Acknowledges a fresh connection
    pub fn connected(time: DateTime<Utc>) -> Self {
        Self::new(
            Level::Success,
            time,
            json!({ "connected": true, "message": "client connected" }),
        )
    }

    pub fn warning(time: DateTime<Utc>, message: &str) -> Self {
        Self::new(Level::Warning, time, json!({ "message": message }))
    }

    pub fn error(time: DateTime<Utc>, message: &str) -> Self {
        Self::new(Level::Error, time, json!({ "message": message }))
    }

    /// Terminal marker sent after the artifact
    pub fn done(time: DateTime<Utc>) -> Self {
        Self::new(Level::Success, time, json!({ "done": true, "message": "" }))
    }

    pub fn is_done(&self) -> bool {
        self.data.get("done").and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

/// One outbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayFrame {
    Text(String),
    Binary(Vec<u8>),
    /// Server-initiated close, with a short reason
    Close(String),
}

impl GatewayFrame {
    /// Serialize a message into a text frame
    pub fn message(message: &GatewayMessage) -> Result<Self> {
        Ok(GatewayFrame::Text(serde_json::to_string(message)?))
    }

    /// Parse a text frame back into a message
    pub fn as_message(&self) -> Option<GatewayMessage> {
        match self {
            GatewayFrame::Text(text) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, GatewayFrame::Binary(_))
    }
}
