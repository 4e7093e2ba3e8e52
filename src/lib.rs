//! dnshdr - DNS response header encoder
//!
//! This crate builds the fixed 12-byte header of a DNS response from the
//! request it answers.
//!
//! # Architecture
//!
//! The crate is organized into a few modules:
//!
//! - `dns`: DNS header encoding, decoding and code types
//! - `config`: Configuration loading and validation
//! - `logging`: `tracing` subscriber initialization
//! - `cli`: Command line parsing for the `dnshdr` binary
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```
//! use dnshdr::dns::encode_header;
//!
//! let request = [0xAB, 0xCD, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
//! let header = encode_header(&request, 3)?;
//! assert_eq!(header, [0xAB, 0xCD, 0x80, 0x03, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
//! # Ok::<(), dnshdr::Error>(())
//! ```

/// DNS header implementation
///
/// Provides the response header encoder, a decoded header view and the
/// RCODE/Opcode types.
pub mod dns;

/// Configuration loading and validation
///
/// Supports YAML configuration files with validation.
pub mod config;

/// Logging initialization
pub mod logging;

/// Command line parsing
pub mod cli;

/// Error types and handling
///
/// Provides unified error types for the entire crate.
pub mod error {

    use thiserror::Error;

    /// Main error type for dnshdr
    #[derive(Error, Debug)]
    pub enum Error {
        // ============ DNS Header Errors ============
        /// Request is too short to copy the ID and QDCOUNT fields from
        #[error("Request too short: {len} bytes, need at least {required}")]
        ShortRequest {
            /// Length of the request buffer
            len: usize,
            /// Minimum number of bytes required
            required: usize,
        },

        /// Response code does not fit in the 4-bit RCODE field
        #[error("Response code {rcode} out of range (0-15)")]
        RcodeOutOfRange {
            /// The rejected response code
            rcode: u8,
        },

        /// Buffer is shorter than a complete DNS header
        #[error("Buffer too short for DNS header: {len} bytes, need 12")]
        ShortHeader {
            /// Length of the buffer
            len: usize,
        },

        /// Response code text could not be parsed
        #[error("Invalid response code: {0}")]
        InvalidResponseCode(String),

        // ============ Configuration Errors ============
        /// Configuration error
        #[error("Configuration error: {0}")]
        Config(String),

        /// Invalid configuration value
        #[error("Invalid config value for {field}: {value} - {reason}")]
        InvalidConfigValue {
            /// The field name
            field: String,
            /// The invalid value
            value: String,
            /// Reason why it's invalid
            reason: String,
        },

        // ============ Input Errors ============
        /// Hex input could not be decoded
        #[error("Invalid hex input '{input}': {reason}")]
        InvalidHex {
            /// The offending input
            input: String,
            /// Decode failure description
            reason: String,
        },

        /// IO error
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }

    impl Error {
        /// Create a ShortRequest error
        pub fn short_request(len: usize, required: usize) -> Self {
            Self::ShortRequest { len, required }
        }

        /// Create an InvalidConfigValue error
        pub fn invalid_config_value(
            field: impl Into<String>,
            value: impl Into<String>,
            reason: impl Into<String>,
        ) -> Self {
            Self::InvalidConfigValue {
                field: field.into(),
                value: value.into(),
                reason: reason.into(),
            }
        }

        /// Create an InvalidHex error
        pub fn invalid_hex(input: impl Into<String>, reason: impl Into<String>) -> Self {
            Self::InvalidHex {
                input: input.into(),
                reason: reason.into(),
            }
        }

        /// Check if this error is a configuration error
        pub fn is_config_error(&self) -> bool {
            matches!(self, Error::Config(_) | Error::InvalidConfigValue { .. })
        }
    }

    /// Result type for dnshdr operations
    pub type Result<T> = std::result::Result<T, Error>;
}

// Re-export commonly used types
pub use error::{Error, Result};
