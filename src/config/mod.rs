//! Configuration module
//!
//! - types/mod.rs: Config, ServerConfig, AuthConfig
//! - types/health.rs: canned health document values
//! - types/gateway.rs: WebSocket playback settings
//! - io.rs: Configuration loading and env overrides
//! - validation.rs: Configuration validation
//! - paths.rs: Configuration file paths

mod io;
mod paths;
mod types;
mod validation;

pub use types::{AuthConfig, Config, ServerConfig, DEFAULT_TOKEN};
pub use types::gateway::{GatewayConfig, MissingArtifact};
pub use types::health::{HealthProfile, HealthShape};

pub use io::{
    apply_overrides_from, load_config, load_config_from_path, load_config_with_env_file, parse_config,
};
pub use paths::{config_dir, config_path};
pub use validation::{validate_config, ConfigValidationResult, ValidationIssue};
