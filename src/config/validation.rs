//! Configuration validation
//!
//! Validates configuration and reports issues.

use secrecy::ExposeSecret;

use super::types::Config;

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ConfigValidationResult {
    /// Whether the config is valid
    pub valid: bool,
    /// Validation errors (critical)
    pub errors: Vec<ValidationIssue>,
    /// Validation warnings (non-critical)
    pub warnings: Vec<ValidationIssue>,
}

impl ConfigValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        ConfigValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error
    pub fn with_error(mut self, issue: ValidationIssue) -> Self {
        self.valid = false;
        self.errors.push(issue);
        self
    }

    /// Add a warning
    pub fn with_warning(mut self, issue: ValidationIssue) -> Self {
        self.warnings.push(issue);
        self
    }
}

/// A validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the config field
    pub path: String,
    /// Issue message
    pub message: String,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Validate the configuration
pub fn validate_config(config: &Config) -> ConfigValidationResult {
    let mut result = ConfigValidationResult::valid();

    result = validate_server_config(config, result);
    result = validate_auth_config(config, result);
    result = validate_gateway_config(config, result);

    result
}

fn validate_server_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    if config.server.port == 0 {
        result = result.with_warning(
            ValidationIssue::new("server.port", "Port 0 binds an ephemeral port")
                .with_suggestion("Clients expect a fixed port; set server.port (default 3500)"),
        );
    }

    let loopback = matches!(config.server.bind.as_str(), "127.0.0.1" | "localhost" | "::1");
    if !loopback {
        result = result.with_warning(ValidationIssue::new(
            "server.bind",
            format!("Mock server exposed on non-loopback address {}", config.server.bind),
        ));
    }

    result
}

fn validate_auth_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    if config.auth.token.expose_secret().trim().is_empty() {
        result = result.with_error(
            ValidationIssue::new("auth.token", "Bearer token is empty")
                .with_suggestion("Set auth.token or MOCKGATE_TOKEN"),
        );
    }

    result
}

fn validate_gateway_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    if !config.gateway.artifact.exists() {
        result = result.with_warning(
            ValidationIssue::new(
                "gateway.artifact",
                format!(
                    "Artifact does not exist: {} (policy: {})",
                    config.gateway.artifact.display(),
                    config.gateway.missing_artifact
                ),
            )
            .with_suggestion("Point gateway.artifact at a packaged archive"),
        );
    }

    result
}
