//! Configuration types module
//!
//! One struct per config file section.

pub mod gateway;
pub mod health;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer token configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Canned health document
    #[serde(default)]
    pub health: health::HealthProfile,

    /// WebSocket gateway playback
    #[serde(default)]
    pub gateway: gateway::GatewayConfig,
}

impl Config {
    /// Address string the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port to listen on (0 picks a free port)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Attach a permissive CORS layer
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            port: default_port(),
            cors: true,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3500
}

fn default_true() -> bool {
    true
}

/// Bearer token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Static token expected after `Bearer `
    #[serde(skip_serializing, default = "default_token")]
    pub token: SecretString,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            token: default_token(),
        }
    }
}

/// Token the status client ships with in its fixtures
pub const DEFAULT_TOKEN: &str = "test_token";

fn default_token() -> SecretString {
    SecretString::from(DEFAULT_TOKEN.to_string())
}
