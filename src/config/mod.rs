//! Configuration module
//!
//! This module provides configuration loading and validation for dnshdr.
//! It supports YAML configuration files with validation.
//!
//! # Example
//!
//! ```rust,no_run
//! use dnshdr::config::Config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("dnshdr.yaml")?;
//! println!("Header policy: {:?}", config.header);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod validation;

use crate::dns::HeaderPolicy;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Log level: trace|debug|info|warn|error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: text|json
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional log file path; logs go to stderr when unset
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

/// Main configuration structure
///
/// Root configuration object holding logging settings and the header
/// encoder policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Header encoder policy
    #[serde(default)]
    pub header: HeaderPolicy,
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path)
    }

    /// Default configuration with environment overrides applied
    ///
    /// Used when no configuration file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds an invalid value.
    pub fn from_env() -> Result<Self> {
        loader::load_defaults()
    }

    /// Load configuration from a YAML string
    ///
    /// Environment overrides apply here too.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        loader::load_from_yaml(yaml)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        loader::save_to_file(self, path)
    }

    /// Convert configuration to YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        loader::to_yaml(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{RcodeOverflowPolicy, ShortRequestPolicy};
    use std::collections::HashMap;

    fn parse(yaml: &str) -> Config {
        loader::load_from_yaml_with(yaml, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, "text");
        assert!(config.log.file.is_none());
        assert_eq!(config.header.short_request, ShortRequestPolicy::Reject);
        assert_eq!(config.header.rcode_overflow, RcodeOverflowPolicy::Truncate);
        assert_eq!(Config::new(), config);
    }

    #[test]
    fn test_from_yaml_minimal() {
        let yaml = r#"
log:
  level: debug
"#;
        let config = parse(yaml);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, "text");
        assert_eq!(config.header, HeaderPolicy::default());
    }

    #[test]
    fn test_from_yaml_header_section() {
        let yaml = r#"
header:
  short_request: zero_fill
  rcode_overflow: reject
"#;
        let config = parse(yaml);
        assert_eq!(config.header.short_request, ShortRequestPolicy::ZeroFill);
        assert_eq!(config.header.rcode_overflow, RcodeOverflowPolicy::Reject);
    }

    #[test]
    fn test_to_yaml() {
        let yaml = Config::new().to_yaml().unwrap();
        assert!(yaml.contains("log:"));
        assert!(yaml.contains("short_request: reject"));
        assert!(yaml.contains("rcode_overflow: truncate"));
    }
}
