//! Configuration paths
//!
//! Utilities for resolving configuration file paths.

use std::path::PathBuf;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "mockgate.toml";

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("mockgate"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".config").join("mockgate"))
                .unwrap_or_else(|| PathBuf::from(".mockgate"))
        })
}

/// Candidate config files, in lookup order
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Check for explicit override
    if let Ok(path) = std::env::var("MOCKGATE_CONFIG") {
        candidates.push(PathBuf::from(path));
    }

    candidates.push(PathBuf::from(LOCAL_CONFIG_FILE));
    candidates.push(config_dir().join("config.toml"));
    candidates
}

/// First existing config file, if any
pub fn config_path() -> Option<PathBuf> {
    candidate_paths().into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_paths() {
        let candidates = candidate_paths();
        assert!(candidates.contains(&PathBuf::from(LOCAL_CONFIG_FILE)));
        assert!(candidates.last().unwrap().ends_with("config.toml"));
    }
}
