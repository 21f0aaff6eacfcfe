//! Configuration I/O - Loading configuration
//!
//! Handles reading configuration from files and environment variables.

use std::path::Path;

use secrecy::SecretString;

use super::types::Config;
use crate::error::{Error, Result};

/// Load configuration with layered precedence:
/// 1. `.env` in the working directory, before anything reads the environment
/// 2. Config file if given or discovered, otherwise defaults
/// 3. Environment variable overrides
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    dotenvy::dotenv().ok();
    load_layered(path)
}

/// Like [`load_config`], reading variables from `env_file` instead of `./.env`
pub fn load_config_with_env_file(path: Option<&Path>, env_file: &Path) -> Result<Config> {
    dotenvy::from_path(env_file).map_err(|e| {
        Error::Config(format!("Failed to read env file {}: {}", env_file.display(), e))
    })?;
    load_layered(path)
}

fn load_layered(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_config_from_path(path)?,
        None => match super::paths::config_path() {
            Some(found) => {
                tracing::debug!("Using config file {}", found.display());
                load_config_from_path(&found)?
            }
            None => Config::default(),
        },
    };

    apply_overrides_from(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    parse_config(&content, path)
}

/// Parse config text, picking the format from the file extension
pub fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let config: Config = if path.extension().is_some_and(|ext| ext == "json" || ext == "json5") {
        json5::from_str(content).map_err(|e| Error::Config(format!("Invalid JSON config: {}", e)))?
    } else if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))?
    } else {
        // Try JSON5 first, then TOML
        json5::from_str(content)
            .or_else(|_| toml::from_str(content).map_err(|e| Error::Config(e.to_string())))
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?
    };

    Ok(config)
}

/// Apply overrides read through `lookup` instead of the process environment
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(bind) = lookup("MOCKGATE_BIND") {
        config.server.bind = bind;
    }
    if let Some(port) = lookup("MOCKGATE_PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::Config(format!("MOCKGATE_PORT is not a valid port: {}", port)))?;
    }
    if let Some(token) = lookup("MOCKGATE_TOKEN") {
        config.auth.token = SecretString::from(token);
    }
    if let Some(shape) = lookup("MOCKGATE_SHAPE") {
        config.health.shape = shape.parse()?;
    }
    if let Some(artifact) = lookup("MOCKGATE_ARTIFACT") {
        config.gateway.artifact = std::path::PathBuf::from(artifact);
    }

    Ok(())
}
