//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ItemSpec, TaskConfig};
use resforge_common::ResourceFormat;
use std::path::Path;

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "resforge.toml";

/// Loads and validates `resforge.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<TaskConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<TaskConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TaskConfig, ConfigError> {
    let config: TaskConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that paths are non-empty and settings are within range.
fn validate_config(config: &TaskConfig) -> Result<(), ConfigError> {
    check_items("task.sources", &config.task.sources)?;
    if let Some(outputs) = &config.task.output_resources {
        check_items("task.output_resources", outputs)?;
    }
    for (i, path) in config.task.references.iter().enumerate() {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField(format!("task.references[{i}]")));
        }
    }
    for (i, path) in config.task.additional_inputs.iter().enumerate() {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "task.additional_inputs[{i}]"
            )));
        }
    }
    if let Some(format) = &config.task.output_format {
        format
            .parse::<ResourceFormat>()
            .map_err(|e| ConfigError::ValidationError(format!("task.output_format: {e}")))?;
    }
    if config.execution.jobs == Some(0) {
        return Err(ConfigError::ValidationError(
            "execution.jobs must be at least 1".to_string(),
        ));
    }
    if config.execution.converter_timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "execution.converter_timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn check_items(field: &str, items: &[ItemSpec]) -> Result<(), ConfigError> {
    for (i, item) in items.iter().enumerate() {
        if item.path().as_os_str().is_empty() {
            return Err(ConfigError::MissingField(format!("{field}[{i}].path")));
        }
    }
    Ok(())
}
