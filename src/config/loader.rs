//! Configuration loader
//!
//! Loads and saves configuration from/to files and strings.

use crate::config::Config;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

// Compile-once Regex for ${VAR} / ${VAR:-default}
static RE_ENV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Z0-9_]+)(?::-([^}]+))?\}").expect("env substitution regex is valid")
});

/// Load configuration from a YAML file
///
/// Supports:
/// - Environment variable substitution: ${VAR_NAME} or ${VAR_NAME:-default}
/// - Environment overrides, see [`load_defaults`]
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;
    load_from_yaml(&contents)
}

/// Build the default configuration with environment overrides applied
///
/// Recognized variables: `LOG_LEVEL`, `LOG_FORMAT`, `LOG_FILE`,
/// `HEADER_SHORT_REQUEST`, `HEADER_RCODE_OVERFLOW`. Empty values are
/// ignored.
///
/// # Errors
///
/// Returns an error if an override holds an invalid value.
pub fn load_defaults() -> Result<Config> {
    finish(Config::default(), &env_snapshot())
}

fn env_snapshot() -> HashMap<String, String> {
    env::vars().collect()
}

/// Apply environment overrides, then validate
fn finish(mut config: Config, env_snapshot: &HashMap<String, String>) -> Result<Config> {
    apply_env_overrides_from_snapshot(&mut config, env_snapshot)?;
    config.validate()?;
    Ok(config)
}

/// Substitute environment variables in configuration
///
/// Supports ${VAR_NAME} and ${VAR_NAME:-default_value}
pub(crate) fn substitute_env_vars(content: &str) -> Result<String> {
    substitute_with(content, |name| env::var(name).ok())
}

fn substitute_with(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let mut result = content.to_string();

    for cap in RE_ENV.captures_iter(content) {
        let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match (lookup(var_name.as_str()), default_value) {
            (Some(v), _) => v,
            (None, Some(default)) => default.to_string(),
            (None, None) => {
                return Err(Error::Config(format!(
                    "Environment variable {} not found and no default provided",
                    var_name.as_str()
                )));
            }
        };

        result = result.replace(full_match.as_str(), &value);
    }

    Ok(result)
}

/// Load configuration from a YAML string
///
/// Environment overrides are applied after parsing, as for files.
///
/// # Errors
///
/// Returns an error if the YAML cannot be parsed or fails validation.
pub fn load_from_yaml(yaml: &str) -> Result<Config> {
    load_from_yaml_with(yaml, &env_snapshot())
}

/// [`load_from_yaml`] against an explicit environment snapshot
pub(crate) fn load_from_yaml_with(
    yaml: &str,
    env_snapshot: &HashMap<String, String>,
) -> Result<Config> {
    finish(parse_yaml(yaml)?, env_snapshot)
}

fn parse_yaml(yaml: &str) -> Result<Config> {
    // An empty document means "all defaults"
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))
}

/// Apply environment overrides using a supplied environment snapshot
///
/// Taking a snapshot instead of reading process globals keeps tests
/// deterministic when other tests mutate the environment.
pub(crate) fn apply_env_overrides_from_snapshot(
    config: &mut Config,
    env_snapshot: &HashMap<String, String>,
) -> Result<()> {
    let get = |key: &str| env_snapshot.get(key).filter(|v| !v.is_empty());

    if let Some(val) = get("LOG_LEVEL") {
        info!("Applied env override: LOG_LEVEL = {}", val);
        config.log.level = val.clone();
    }
    if let Some(val) = get("LOG_FORMAT") {
        info!("Applied env override: LOG_FORMAT = {}", val);
        config.log.format = val.clone();
    }
    if let Some(val) = get("LOG_FILE") {
        info!("Applied env override: LOG_FILE = {}", val);
        config.log.file = Some(val.clone());
    }
    if let Some(val) = get("HEADER_SHORT_REQUEST") {
        info!("Applied env override: HEADER_SHORT_REQUEST = {}", val);
        config.header.short_request = parse_policy("header.short_request", val)?;
    }
    if let Some(val) = get("HEADER_RCODE_OVERFLOW") {
        info!("Applied env override: HEADER_RCODE_OVERFLOW = {}", val);
        config.header.rcode_overflow = parse_policy("header.rcode_overflow", val)?;
    }

    Ok(())
}

fn parse_policy<T: DeserializeOwned>(field: &str, value: &str) -> Result<T> {
    serde_yaml::from_str(value.trim())
        .map_err(|e| Error::invalid_config_value(field, value, e.to_string()))
}

/// Save configuration to a YAML file
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let yaml = to_yaml(config)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// Convert configuration to YAML string
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml(config: &Config) -> Result<String> {
    serde_yaml::to_string(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
}
