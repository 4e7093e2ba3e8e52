//! DNS header code types
//!
//! Opcode and RCODE are small integer fields with a handful of registered
//! values. Both enums are generated from one table each, so the numeric
//! value, the variant and the mnemonic never drift apart.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Generates a coded header field enum from `Variant = value => "MNEMONIC"`
/// rows. Values without a row decode to `Unknown(v)` and print as
/// `<prefix><v>`.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (unknown = $prefix:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal => $mnemonic:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// Value with no registered meaning
            Unknown(u8),
        }

        impl $name {
            /// Decode a field value; unregistered values map to `Unknown`
            pub fn from_u8(value: u8) -> Self {
                match value {
                    $( $value => Self::$variant, )+
                    _ => Self::Unknown(value),
                }
            }

            /// Numeric field value
            pub fn to_u8(self) -> u8 {
                match self {
                    $( Self::$variant => $value, )+
                    Self::Unknown(v) => v,
                }
            }

            /// Registered mnemonic, `None` for `Unknown`
            pub fn mnemonic(self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($mnemonic), )+
                    Self::Unknown(_) => None,
                }
            }

            /// Case-insensitive lookup by registered mnemonic
            pub fn from_mnemonic(s: &str) -> Option<Self> {
                [$( Self::$variant, )+]
                    .into_iter()
                    .find(|code| code.mnemonic().is_some_and(|m| m.eq_ignore_ascii_case(s)))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.mnemonic() {
                    Some(m) => f.write_str(m),
                    None => write!(f, concat!($prefix, "{}"), self.to_u8()),
                }
            }
        }
    };
}

coded_enum! {
    /// DNS operation code, the 4-bit OPCODE field
    ///
    /// ```
    /// use dnshdr::dns::OpCode;
    ///
    /// assert_eq!(OpCode::from_u8(0), OpCode::Query);
    /// assert_eq!(OpCode::from_u8(5), OpCode::Update);
    /// assert_eq!(OpCode::from_u8(9), OpCode::Unknown(9));
    /// assert_eq!(OpCode::Unknown(9).to_string(), "OPCODE9");
    /// ```
    pub enum OpCode (unknown = "OPCODE") {
        /// Standard query
        Query = 0 => "QUERY",
        /// Inverse query, obsolete
        IQuery = 1 => "IQUERY",
        Status = 2 => "STATUS",
        /// RFC 1996
        Notify = 4 => "NOTIFY",
        /// RFC 2136
        Update = 5 => "UPDATE",
    }
}

coded_enum! {
    /// DNS response code, the 4-bit RCODE field
    ///
    /// Only the low 4 bits travel in the header; larger values need EDNS
    /// and are out of reach here.
    ///
    /// ```
    /// use dnshdr::dns::ResponseCode;
    ///
    /// assert_eq!(ResponseCode::from_u8(3), ResponseCode::NXDomain);
    /// assert_eq!(ResponseCode::NXDomain.to_u8(), 3);
    /// assert_eq!(ResponseCode::from_u8(12), ResponseCode::Unknown(12));
    /// assert_eq!(ResponseCode::Unknown(14).to_u8(), 14);
    /// ```
    #[derive(Default)]
    pub enum ResponseCode (unknown = "RCODE") {
        #[default]
        NoError = 0 => "NOERROR",
        /// Format error
        FormErr = 1 => "FORMERR",
        /// Server failure
        ServFail = 2 => "SERVFAIL",
        /// Non-existent domain
        NXDomain = 3 => "NXDOMAIN",
        /// Not implemented
        NotImp = 4 => "NOTIMP",
        Refused = 5 => "REFUSED",
        /// Name exists when it should not
        YXDomain = 6 => "YXDOMAIN",
        /// RR set exists when it should not
        YXRRSet = 7 => "YXRRSET",
        /// RR set that should exist does not
        NXRRSet = 8 => "NXRRSET",
        /// Not authoritative for zone, or not authorized
        NotAuth = 9 => "NOTAUTH",
        /// Name not contained in zone
        NotZone = 10 => "NOTZONE",
    }
}

/// Parse a response code from a mnemonic (`nxdomain`, `refused`, ...),
/// a short alias (`nx`, `ref`, `serv`) or a decimal number with an optional
/// `rcode` prefix.
///
/// Numbers are taken as-is; range checks belong to the encoder policy.
impl FromStr for ResponseCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        let alias = match lower.as_str() {
            "nx" => Some(ResponseCode::NXDomain),
            "ref" => Some(ResponseCode::Refused),
            "serv" => Some(ResponseCode::ServFail),
            _ => None,
        };
        if let Some(rcode) = alias.or_else(|| ResponseCode::from_mnemonic(&lower)) {
            return Ok(rcode);
        }

        lower
            .strip_prefix("rcode")
            .unwrap_or(&lower)
            .parse::<u8>()
            .map(ResponseCode::from_u8)
            .map_err(|_| Error::InvalidResponseCode(s.to_string()))
    }
}
