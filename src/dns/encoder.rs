//! Response header encoding
//!
//! Builds the 12-byte header of a DNS response from the request it answers.
//! Only two request fields are carried over: the transaction ID (bytes 0-1)
//! and QDCOUNT (bytes 4-5). Everything else is fixed:
//!
//! - QR is set, Opcode/AA/TC/RD/RA/Z are cleared (nothing is echoed from
//!   the request flags)
//! - RCODE is the low 4 bits of the given response code
//! - ANCOUNT, NSCOUNT and ARCOUNT are zero; see [`patch_counts`] for
//!   fixing them up after records are appended
//!
//! [`patch_counts`]: super::header::patch_counts

use super::header::{HeaderFlags, HEADER_LEN};
use super::types::ResponseCode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Number of request bytes the encoder reads (ID, flags, QDCOUNT)
pub const MIN_REQUEST_LEN: usize = 6;

const RCODE_MASK: u8 = 0x0F;

/// What to do with a request shorter than [`MIN_REQUEST_LEN`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortRequestPolicy {
    /// Fail with [`Error::ShortRequest`]
    #[default]
    Reject,
    /// Read missing bytes as zero
    ZeroFill,
}

/// What to do with a response code that does not fit in 4 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcodeOverflowPolicy {
    /// Keep the low 4 bits
    #[default]
    Truncate,
    /// Fail with [`Error::RcodeOutOfRange`]
    Reject,
}

/// Encoder behavior for malformed input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderPolicy {
    /// Handling of requests shorter than [`MIN_REQUEST_LEN`]
    #[serde(default)]
    pub short_request: ShortRequestPolicy,

    /// Handling of response codes above 15
    #[serde(default)]
    pub rcode_overflow: RcodeOverflowPolicy,
}

/// DNS response header encoder
///
/// Stateless apart from its [`HeaderPolicy`]; copy it freely across
/// threads.
///
/// # Example
///
/// ```
/// use dnshdr::dns::{HeaderEncoder, HeaderPolicy, ShortRequestPolicy};
///
/// let encoder = HeaderEncoder::new(HeaderPolicy {
///     short_request: ShortRequestPolicy::ZeroFill,
///     ..Default::default()
/// });
///
/// // Only the ID is present; QDCOUNT reads as zero
/// let header = encoder.encode(&[0x12, 0x34], Some(2))?;
/// assert_eq!(header, [0x12, 0x34, 0x80, 0x02, 0, 0, 0, 0, 0, 0, 0, 0]);
/// # Ok::<(), dnshdr::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderEncoder {
    policy: HeaderPolicy,
}

impl HeaderEncoder {
    /// Create an encoder with the given policy
    pub fn new(policy: HeaderPolicy) -> Self {
        Self { policy }
    }

    /// Get the encoder policy
    pub fn policy(&self) -> HeaderPolicy {
        self.policy
    }

    /// Encode a response header for `request`
    ///
    /// `rcode` defaults to 0 (NOERROR) when `None`.
    ///
    /// # Errors
    ///
    /// - [`Error::ShortRequest`] if `request` has fewer than 6 bytes and
    ///   the policy is [`ShortRequestPolicy::Reject`]
    /// - [`Error::RcodeOutOfRange`] if `rcode` exceeds 15 and the policy is
    ///   [`RcodeOverflowPolicy::Reject`]
    pub fn encode(&self, request: &[u8], rcode: Option<u8>) -> Result<[u8; HEADER_LEN]> {
        let rcode = self.rcode_bits(rcode.unwrap_or(0))?;
        let prefix = self.request_prefix(request)?;

        let flags = HeaderFlags::QR.bits() | u16::from(rcode);

        let mut header = [0u8; HEADER_LEN];
        header[0..2].copy_from_slice(&prefix[0..2]);
        header[2..4].copy_from_slice(&flags.to_be_bytes());
        header[4..6].copy_from_slice(&prefix[4..6]);

        trace!(
            id = u16::from_be_bytes([header[0], header[1]]),
            rcode,
            qdcount = u16::from_be_bytes([header[4], header[5]]),
            "Encoded response header"
        );

        Ok(header)
    }

    fn rcode_bits(&self, rcode: u8) -> Result<u8> {
        if rcode <= RCODE_MASK {
            return Ok(rcode);
        }

        match self.policy.rcode_overflow {
            RcodeOverflowPolicy::Truncate => {
                let masked = rcode & RCODE_MASK;
                debug!(rcode, masked, "Response code truncated to 4 bits");
                Ok(masked)
            }
            RcodeOverflowPolicy::Reject => Err(Error::RcodeOutOfRange { rcode }),
        }
    }

    fn request_prefix(&self, request: &[u8]) -> Result<[u8; MIN_REQUEST_LEN]> {
        let mut prefix = [0u8; MIN_REQUEST_LEN];

        if request.len() >= MIN_REQUEST_LEN {
            prefix.copy_from_slice(&request[..MIN_REQUEST_LEN]);
            return Ok(prefix);
        }

        match self.policy.short_request {
            ShortRequestPolicy::Reject => {
                Err(Error::short_request(request.len(), MIN_REQUEST_LEN))
            }
            ShortRequestPolicy::ZeroFill => {
                debug!(
                    len = request.len(),
                    "Short request, missing header bytes read as zero"
                );
                prefix[..request.len()].copy_from_slice(request);
                Ok(prefix)
            }
        }
    }
}

/// Encode a response header with the default policy
///
/// Short requests are rejected and out-of-range response codes are
/// truncated to their low 4 bits.
pub fn encode_header(request: &[u8], rcode: u8) -> Result<[u8; HEADER_LEN]> {
    HeaderEncoder::default().encode(request, Some(rcode))
}

/// Encode a NOERROR response header with the default policy
pub fn encode_noerror(request: &[u8]) -> Result<[u8; HEADER_LEN]> {
    HeaderEncoder::default().encode(request, None)
}

/// Encode a response header from a typed response code
///
/// # Example
///
/// ```
/// use dnshdr::dns::{encode_response, ResponseCode};
///
/// let request = [0x00, 0x07, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
/// let header = encode_response(&request, ResponseCode::Refused)?;
/// assert_eq!(&header[..4], &[0x00, 0x07, 0x80, 0x05]);
/// # Ok::<(), dnshdr::Error>(())
/// ```
pub fn encode_response(request: &[u8], rcode: ResponseCode) -> Result<[u8; HEADER_LEN]> {
    encode_header(request, rcode.to_u8())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: [u8; HEADER_LEN] = [0xAB, 0xCD, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];

    fn strict() -> HeaderEncoder {
        HeaderEncoder::new(HeaderPolicy {
            short_request: ShortRequestPolicy::Reject,
            rcode_overflow: RcodeOverflowPolicy::Reject,
        })
    }

    #[test]
    fn test_noerror_response() {
        let header = encode_header(&REQUEST, 0).unwrap();
        assert_eq!(header, [0xAB, 0xCD, 0x80, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode_noerror(&REQUEST).unwrap(), header);
    }

    #[test]
    fn test_nxdomain_response() {
        let header = encode_header(&REQUEST, 3).unwrap();
        assert_eq!(header, [0xAB, 0xCD, 0x80, 0x03, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode_response(&REQUEST, ResponseCode::NXDomain).unwrap(), header);
    }

    #[test]
    fn test_rcode_truncated_by_default() {
        let header = encode_header(&REQUEST, 31).unwrap();
        assert_eq!(header[3], 0x0F);
        assert_eq!(header[2], 0x80);

        for c in 0..=15u8 {
            let base = encode_header(&REQUEST, c).unwrap();
            for k in 1..16u8 {
                let Some(wide) = c.checked_add(k * 16) else {
                    break;
                };
                assert_eq!(encode_header(&REQUEST, wide).unwrap(), base);
            }
        }
    }

    #[test]
    fn test_rcode_rejected_by_policy() {
        let err = strict().encode(&REQUEST, Some(16)).unwrap_err();
        assert!(matches!(err, Error::RcodeOutOfRange { rcode: 16 }));
        assert!(strict().encode(&REQUEST, Some(15)).is_ok());
    }

    #[test]
    fn test_request_flags_not_echoed() {
        // opcode=STATUS, AA, TC, RD, RA, AD, CD and rcode bits all set
        let mut request = REQUEST;
        request[2] = 0xFF;
        request[3] = 0xFF;
        let header = encode_header(&request, 0).unwrap();
        assert_eq!(&header[2..4], &[0x80, 0x00]);
    }

    #[test]
    fn test_counts_zeroed() {
        let request = [0x01, 0x02, 0x01, 0x00, 0x12, 0x34, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        let header = encode_header(&request, 2).unwrap();
        assert_eq!(&header[4..6], &[0x12, 0x34]);
        assert_eq!(&header[6..], &[0u8; 6]);
    }

    #[test]
    fn test_six_byte_request_is_enough() {
        let header = encode_header(&REQUEST[..MIN_REQUEST_LEN], 5).unwrap();
        assert_eq!(header, [0xAB, 0xCD, 0x80, 0x05, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_short_request_rejected_by_default() {
        for len in 0..MIN_REQUEST_LEN {
            let err = encode_header(&REQUEST[..len], 0).unwrap_err();
            assert!(matches!(err, Error::ShortRequest { len: l, required: 6 } if l == len));
        }
    }

    #[test]
    fn test_short_request_zero_filled() {
        let encoder = HeaderEncoder::new(HeaderPolicy {
            short_request: ShortRequestPolicy::ZeroFill,
            ..Default::default()
        });

        let header = encoder.encode(&[], None).unwrap();
        assert_eq!(header, [0x00, 0x00, 0x80, 0x00, 0, 0, 0, 0, 0, 0, 0, 0]);

        // QDCOUNT high byte present, low byte missing
        let header = encoder.encode(&REQUEST[..5], Some(1)).unwrap();
        assert_eq!(header, [0xAB, 0xCD, 0x80, 0x01, 0x00, 0x00, 0, 0, 0, 0, 0, 0]);

        let header = encoder.encode(&[0xAB], None).unwrap();
        assert_eq!(&header[..2], &[0xAB, 0x00]);
    }

    #[test]
    fn test_request_not_mutated() {
        let request = REQUEST;
        let _ = encode_header(&request, 9).unwrap();
        assert_eq!(request, REQUEST);
    }

    #[test]
    fn test_policy_deserialize() {
        let policy: HeaderPolicy =
            serde_yaml::from_str("short_request: zero_fill\nrcode_overflow: reject\n").unwrap();
        assert_eq!(policy.short_request, ShortRequestPolicy::ZeroFill);
        assert_eq!(policy.rcode_overflow, RcodeOverflowPolicy::Reject);

        let policy: HeaderPolicy = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy, HeaderPolicy::default());
        assert_eq!(HeaderEncoder::new(policy).policy(), HeaderPolicy::default());
    }
}
