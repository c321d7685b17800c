//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "weft.toml";

/// Loads and validates a `weft.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    let content =
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
    load_config_from_str(&content)
}

/// Parses and validates a `weft.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks required fields and values that are wrong regardless of the hardware.
///
/// Electrical constraints on the clocking parameters are checked when the
/// clocking block is constructed.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::Missing("project.name"));
    }
    if config.project.components.is_empty() {
        return Err(ConfigError::Missing("project.components"));
    }
    for (i, component) in config.project.components.iter().enumerate() {
        if config.project.components[..i].contains(component) {
            return Err(ConfigError::Invalid {
                key: "project.components",
                reason: format!("'{component}' is listed more than once"),
            });
        }
    }
    if config.output.dir.is_empty() {
        return Err(ConfigError::Missing("output.dir"));
    }
    let period = config.clocking.clkin_period_ns;
    if period.is_nan() || period <= 0.0 {
        return Err(ConfigError::Invalid {
            key: "clocking.clkin_period_ns",
            reason: format!("must be positive, got {period}"),
        });
    }
    for rule in &config.lint.deny {
        if config.lint.allow.contains(rule) {
            return Err(ConfigError::Invalid {
                key: "lint.deny",
                reason: format!("'{rule}' is also allowed"),
            });
        }
    }
    Ok(())
}
