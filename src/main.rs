//! dnshdr - DNS response header encoder
//!
//! Reads a request header as hex and prints the matching response header.
//!
//! ```text
//! $ dnshdr --rcode nxdomain abcd01000001000000000000
//! ab cd 80 03 00 01 00 00 00 00 00 00
//! ```

use anyhow::Context;
use dnshdr::cli::{encode_hex, parse_args, DEFAULT_CONFIG};
use dnshdr::config::Config;
use dnshdr::dns::{Header, HeaderEncoder};
use dnshdr::logging::init_logging;
use std::path::Path;
use tracing::{debug, info, warn};

fn main() -> anyhow::Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG);

    // A missing config file is fine, defaults and env overrides apply
    let config_present = Path::new(config_path).exists();
    let mut config = if config_present {
        Config::from_file(config_path)
            .with_context(|| format!("failed to load configuration from {}", config_path))?
    } else {
        Config::from_env().context("invalid environment override")?
    };

    if let Some(level) = &args.log_level {
        config.log.level = level.clone();
        config.validate()?;
    }

    let verbose = (args.verbose > 0).then_some(args.verbose);
    init_logging(&config.log, verbose)?;

    if config_present {
        info!("Configuration loaded from {}", config_path);
    } else if args.config.is_some() {
        warn!("Configuration file {} not found, using defaults", config_path);
    } else {
        debug!("No configuration file at {}, using defaults", config_path);
    }
    debug!(policy = ?config.header, "Header policy");

    let encoder = HeaderEncoder::new(config.header);
    let header = encoder.encode(&args.request, Some(args.rcode.to_u8()))?;

    println!("{}", encode_hex(&header));
    if args.decode {
        println!("{}", Header::parse(&header)?);
    }

    Ok(())
}
