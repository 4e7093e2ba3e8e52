//! Configuration validation
//!
//! Validates configuration values for correctness and consistency.

use crate::config::Config;
use crate::{Error, Result};

/// Validate a configuration
///
/// Header policies are enums and are checked by deserialization; only the
/// free-form logging strings need validating here.
///
/// # Errors
///
/// Returns an error if validation fails.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_log_level(&config.log.level)?;
    validate_log_format(&config.log.format)?;
    validate_log_file(config.log.file.as_deref())?;

    Ok(())
}

/// Validate log level
fn validate_log_level(level: &str) -> Result<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];

    if !valid_levels.contains(&level) {
        return Err(Error::Config(format!(
            "Invalid log level '{}'. Must be one of: {}",
            level,
            valid_levels.join(", ")
        )));
    }

    Ok(())
}

fn validate_log_format(format: &str) -> Result<()> {
    let valid = ["text", "json"];
    if !valid.contains(&format) {
        return Err(Error::Config(format!(
            "Invalid log format '{}'. Must be one of: {}",
            format,
            valid.join(", ")
        )));
    }
    Ok(())
}

fn validate_log_file(file: Option<&str>) -> Result<()> {
    match file {
        Some(path) if path.trim().is_empty() => Err(Error::invalid_config_value(
            "log.file",
            path,
            "path must not be empty",
        )),
        _ => Ok(()),
    }
}
