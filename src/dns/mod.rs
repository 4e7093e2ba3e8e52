//! DNS header module
//!
//! This module provides:
//! - Response header encoding from a request (RFC 1035 section 4.1.1)
//! - A decoded header view and in-place section count patching
//! - Opcode and response code types
//!
//! # Example
//!
//! ```rust
//! use dnshdr::dns::{encode_response, Header, ResponseCode};
//!
//! let request = [0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
//! let header = encode_response(&request, ResponseCode::ServFail)?;
//!
//! let decoded = Header::parse(&header)?;
//! assert_eq!(decoded.id(), 0x1234);
//! assert_eq!(decoded.response_code(), ResponseCode::ServFail);
//! # Ok::<(), dnshdr::Error>(())
//! ```

pub mod encoder;
pub mod header;
pub mod types;

// Re-export commonly used types
pub use encoder::{
    encode_header, encode_noerror, encode_response, HeaderEncoder, HeaderPolicy,
    RcodeOverflowPolicy, ShortRequestPolicy, MIN_REQUEST_LEN,
};
pub use header::{patch_counts, Header, HeaderFlags, HEADER_LEN};
pub use types::{OpCode, ResponseCode};
