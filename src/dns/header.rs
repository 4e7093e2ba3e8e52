//! DNS message header
//!
//! The header is the fixed 12-byte prefix of every DNS message (RFC 1035
//! section 4.1.1). [`Header`] is a decoded view over those bytes, used to
//! inspect an encoded response and to fix up its section counts once the
//! caller has appended records.
//!
//! ```text
//!                                 1  1  1  1  1  1
//!   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                      ID                       |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    QDCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    ANCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    NSCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! |                    ARCOUNT                    |
//! +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//! ```

use super::types::{OpCode, ResponseCode};
use crate::{Error, Result};
use bitflags::bitflags;
use std::fmt;

/// Size of the DNS header in bytes
pub const HEADER_LEN: usize = 12;

const OPCODE_SHIFT: u16 = 11;
const OPCODE_MASK: u16 = 0x7800;
const RCODE_MASK: u16 = 0x000F;

bitflags! {
    /// Single-bit DNS header flags
    ///
    /// Opcode and RCODE are multi-bit fields and live on [`Header`] instead.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeaderFlags: u16 {
        /// Query/Response flag: 0 = query, 1 = response
        const QR = 0x8000;
        /// Authoritative Answer
        const AA = 0x0400;
        /// Truncation
        const TC = 0x0200;
        /// Recursion Desired
        const RD = 0x0100;
        /// Recursion Available
        const RA = 0x0080;
        /// Reserved, must be zero
        const Z = 0x0040;
        /// Authentic Data (DNSSEC)
        const AD = 0x0020;
        /// Checking Disabled (DNSSEC)
        const CD = 0x0010;
    }
}

/// Decoded DNS message header
///
/// # Example
///
/// ```
/// use dnshdr::dns::{Header, ResponseCode};
///
/// let bytes = [0xAB, 0xCD, 0x80, 0x03, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
/// let header = Header::parse(&bytes)?;
/// assert_eq!(header.id(), 0xABCD);
/// assert!(header.is_response());
/// assert_eq!(header.response_code(), ResponseCode::NXDomain);
/// assert_eq!(header.question_count(), 1);
/// # Ok::<(), dnshdr::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    id: u16,
    flags: HeaderFlags,
    opcode: OpCode,
    rcode: ResponseCode,
    qdcount: u16,
    ancount: u16,
    nscount: u16,
    arcount: u16,
}

impl Header {
    /// Decode the first 12 bytes of `bytes`
    ///
    /// Trailing bytes (question and record sections) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShortHeader`] if fewer than 12 bytes are given.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::ShortHeader { len: bytes.len() });
        }

        let word = |at: usize| u16::from_be_bytes([bytes[at], bytes[at + 1]]);
        let flags_word = word(2);

        Ok(Self {
            id: word(0),
            flags: HeaderFlags::from_bits_truncate(flags_word),
            opcode: OpCode::from_u8(((flags_word & OPCODE_MASK) >> OPCODE_SHIFT) as u8),
            rcode: ResponseCode::from_u8((flags_word & RCODE_MASK) as u8),
            qdcount: word(4),
            ancount: word(6),
            nscount: word(8),
            arcount: word(10),
        })
    }

    /// Encode the header back to its 12-byte wire form
    ///
    /// Opcode and RCODE values wider than their fields are truncated.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let flags_word = self.flags.bits()
            | ((u16::from(self.opcode.to_u8()) << OPCODE_SHIFT) & OPCODE_MASK)
            | (u16::from(self.rcode.to_u8()) & RCODE_MASK);

        let mut out = [0u8; HEADER_LEN];
        for (i, field) in [
            self.id,
            flags_word,
            self.qdcount,
            self.ancount,
            self.nscount,
            self.arcount,
        ]
        .into_iter()
        .enumerate()
        {
            out[i * 2..i * 2 + 2].copy_from_slice(&field.to_be_bytes());
        }
        out
    }

    /// Get the message ID
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Get the single-bit flags
    pub fn flags(&self) -> HeaderFlags {
        self.flags
    }

    /// Check if the QR bit is set
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::QR)
    }

    /// Get the operation code
    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// Get the response code
    pub fn response_code(&self) -> ResponseCode {
        self.rcode
    }

    /// Get QDCOUNT
    pub fn question_count(&self) -> u16 {
        self.qdcount
    }

    /// Get ANCOUNT
    pub fn answer_count(&self) -> u16 {
        self.ancount
    }

    /// Get NSCOUNT
    pub fn authority_count(&self) -> u16 {
        self.nscount
    }

    /// Get ARCOUNT
    pub fn additional_count(&self) -> u16 {
        self.arcount
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={:#06x} qr={} opcode={} rcode={} qd={} an={} ns={} ar={}",
            self.id,
            u8::from(self.is_response()),
            self.opcode,
            self.rcode,
            self.qdcount,
            self.ancount,
            self.nscount,
            self.arcount
        )
    }
}

/// Overwrite ANCOUNT, NSCOUNT and ARCOUNT of an encoded message in place
///
/// The encoder always emits zero counts; callers that append records use
/// this to make the header agree with the sections that follow.
///
/// # Errors
///
/// Returns [`Error::ShortHeader`] if `message` is shorter than 12 bytes.
///
/// # Example
///
/// ```
/// use dnshdr::dns::{encode_header, patch_counts, Header};
///
/// let request = [0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
/// let mut message = encode_header(&request, 0)?.to_vec();
/// patch_counts(&mut message, 2, 0, 1)?;
///
/// let header = Header::parse(&message)?;
/// assert_eq!(header.answer_count(), 2);
/// assert_eq!(header.additional_count(), 1);
/// # Ok::<(), dnshdr::Error>(())
/// ```
pub fn patch_counts(message: &mut [u8], ancount: u16, nscount: u16, arcount: u16) -> Result<()> {
    if message.len() < HEADER_LEN {
        return Err(Error::ShortHeader { len: message.len() });
    }

    message[6..8].copy_from_slice(&ancount.to_be_bytes());
    message[8..10].copy_from_slice(&nscount.to_be_bytes());
    message[10..12].copy_from_slice(&arcount.to_be_bytes());
    Ok(())
}
