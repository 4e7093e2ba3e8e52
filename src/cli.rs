use crate::dns::ResponseCode;
use crate::{Error, Result};
use pico_args::Arguments;
use std::ffi::OsString;
use std::fmt::Write;

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG: &str = "dnshdr.yaml";

/// Parsed command-line options
#[derive(Debug)]
pub struct Args {
    pub request: Vec<u8>,
    pub rcode: ResponseCode,
    /// Explicit `--config` path, `None` means [`DEFAULT_CONFIG`]
    pub config: Option<String>,
    pub log_level: Option<String>,
    pub verbose: u8,
    pub decode: bool,
}

pub fn print_help() {
    println!("dnshdr {}\n", env!("CARGO_PKG_VERSION"));
    println!("Build the DNS response header for a request header.\n");
    println!("Usage: dnshdr [OPTIONS] <REQUEST_HEX>\n");
    println!("ARGS:");
    println!("  <REQUEST_HEX>             Request bytes in hex (':' '-' and spaces allowed)\n");
    println!("OPTIONS:");
    println!("  -r, --rcode <code>        Response code, number or mnemonic (default: 0)");
    println!("  -c, --config <file>       Configuration file path (default: dnshdr.yaml)");
    println!(
        "  -l, --log-level <level>   Log level (trace, debug, info, warn, error) (default: info)"
    );
    println!("  -v, --verbose             Increase log verbosity (repeatable)");
    println!("      --decode              Also print the decoded header");
    println!("  -h, --help                Print this help message");
}

/// Parse CLI arguments from the current process args.
/// Returns `Ok(None)` if help was printed and the caller should exit gracefully.
pub fn parse_args() -> Result<Option<Args>> {
    let raw_args: Vec<String> = std::env::args().collect();
    parse_args_from_vec(raw_args)
}

/// Helper variant that accepts an explicit `Vec<String>` for easier testing.
pub fn parse_args_from_vec(raw_args: Vec<String>) -> Result<Option<Args>> {
    if raw_args.len() <= 1 {
        print_help();
        return Ok(None);
    }

    // Skip the program name
    let os_args: Vec<OsString> = raw_args.into_iter().skip(1).map(OsString::from).collect();
    let mut pargs = Arguments::from_vec(os_args);
    if pargs.contains(["-h", "--help"]) {
        print_help();
        return Ok(None);
    }

    let rcode = match pargs.opt_value_from_str::<_, String>(["-r", "--rcode"]) {
        Ok(Some(s)) => s.parse::<ResponseCode>()?,
        Ok(None) => ResponseCode::NoError,
        Err(e) => return Err(Error::InvalidResponseCode(e.to_string())),
    };

    let config: Option<String> = pargs
        .opt_value_from_str(["-c", "--config"])
        .map_err(|e| Error::Config(e.to_string()))?;

    let log_level = pargs
        .opt_value_from_str(["-l", "--log-level"])
        .ok()
        .flatten();

    let mut verbose = 0u8;
    while pargs.contains(["-v", "--verbose"]) {
        verbose = verbose.saturating_add(1);
    }

    let decode = pargs.contains("--decode");

    let remaining = pargs.finish();
    if remaining.is_empty() {
        return Err(Error::invalid_hex("", "missing <REQUEST_HEX> argument"));
    }

    let hex: Vec<String> = remaining
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect();
    if let Some(flag) = hex.iter().find(|s| s.starts_with('-')) {
        return Err(Error::invalid_hex(flag.as_str(), "unknown option"));
    }

    let request = decode_hex(&hex.join(" "))?;

    Ok(Some(Args {
        request,
        rcode,
        config,
        log_level,
        verbose,
        decode,
    }))
}

/// Decode hex digits, ignoring whitespace and ':' / '-' separators.
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let nibbles = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| Error::invalid_hex(input, format!("invalid digit '{}'", c)))
        })
        .collect::<Result<Vec<u8>>>()?;

    if nibbles.len() % 2 != 0 {
        return Err(Error::invalid_hex(input, "odd number of hex digits"));
    }

    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Lowercase hex with a space between bytes.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("dnshdr")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn returns_none_and_prints_help_with_no_args() {
        let res = parse_args_from_vec(args(&[])).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn returns_none_on_help_flag() {
        let res = parse_args_from_vec(args(&["--help"])).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn parses_all_options() {
        let res = parse_args_from_vec(args(&[
            "-r",
            "nxdomain",
            "-c",
            "my.yaml",
            "-l",
            "debug",
            "-v",
            "-v",
            "--decode",
            "abcd 0100 0001 0000 0000 0000",
        ]))
        .unwrap()
        .expect("should parse args");

        assert_eq!(
            res.request,
            vec![0xAB, 0xCD, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(res.rcode, ResponseCode::NXDomain);
        assert_eq!(res.config.as_deref(), Some("my.yaml"));
        assert_eq!(res.log_level.as_deref(), Some("debug"));
        assert_eq!(res.verbose, 2);
        assert!(res.decode);
    }

    #[test]
    fn uses_defaults_when_options_missing() {
        let res = parse_args_from_vec(args(&["ab:cd:01:00:00:01"]))
            .unwrap()
            .expect("should parse");
        assert_eq!(res.request, vec![0xAB, 0xCD, 0x01, 0x00, 0x00, 0x01]);
        assert_eq!(res.rcode, ResponseCode::NoError);
        assert!(res.config.is_none());
        assert!(res.log_level.is_none());
        assert_eq!(res.verbose, 0);
        assert!(!res.decode);
    }

    #[test]
    fn joins_split_hex_arguments() {
        let res = parse_args_from_vec(args(&["abcd", "0100", "0001"]))
            .unwrap()
            .unwrap();
        assert_eq!(res.request, vec![0xAB, 0xCD, 0x01, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn numeric_rcode_kept_wide() {
        let res = parse_args_from_vec(args(&["--rcode", "31", "abcd"]))
            .unwrap()
            .unwrap();
        assert_eq!(res.rcode.to_u8(), 31);
    }

    #[test]
    fn rejects_missing_request_and_unknown_option() {
        assert!(parse_args_from_vec(args(&["-v"])).is_err());
        assert!(parse_args_from_vec(args(&["--bogus", "abcd"])).is_err());
        assert!(parse_args_from_vec(args(&["-r", "nope", "abcd"])).is_err());
        assert!(parse_args_from_vec(args(&["abcd", "-c"])).is_err());
    }

    #[test]
    fn decode_hex_variants() {
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
        assert_eq!(decode_hex("00ff").unwrap(), vec![0x00, 0xFF]);
        assert_eq!(decode_hex("AB-cd 0F").unwrap(), vec![0xAB, 0xCD, 0x0F]);

        let err = decode_hex("abc").unwrap_err();
        assert!(err.to_string().contains("odd number"));

        let err = decode_hex("zz").unwrap_err();
        assert!(err.to_string().contains("invalid digit 'z'"));
    }

    #[test]
    fn decode_hex_reports_non_ascii_digit_whole() {
        let err = decode_hex("\u{e9}0").unwrap_err();
        assert!(err.to_string().contains("invalid digit '\u{e9}'"));

        // Checked before the digit count
        let err = decode_hex("ab\u{2603}").unwrap_err();
        assert!(err.to_string().contains("invalid digit '\u{2603}'"));

        // Unicode whitespace is a separator
        assert_eq!(decode_hex("ab\u{a0}cd").unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn encode_hex_spaced_lowercase() {
        assert_eq!(encode_hex(&[]), "");
        assert_eq!(encode_hex(&[0xAB, 0x00, 0x0F]), "ab 00 0f");
    }
}
