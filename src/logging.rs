//! Logging utilities and initialization helpers.
//!
//! This module initializes the global `tracing` subscriber according to the
//! application's `LogConfig`. It supports JSON and plain text output to
//! stderr, or to a log file when `log.file` is set and the `log-file`
//! feature is enabled. Stdout is left to the command output.

use crate::config::LogConfig;
use anyhow::Result;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[cfg(feature = "log-file")]
type FileWriter = (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
);

/// Non-blocking file writer and the guard of its worker, created once per
/// process. The guard is never dropped so the worker outlives every clone of
/// the writer. The first configured log file wins for the process.
#[cfg(feature = "log-file")]
static FILE_WRITER: once_cell::sync::OnceCell<FileWriter> = once_cell::sync::OnceCell::new();

/// Compute the effective RUST_LOG-like spec string using precedence:
/// RUST_LOG (env) > CLI verbosity > config.level
///
/// - If `cli_verbose` is Some(n):
///     * 0: `warn,dnshdr=<cfg_level>`
///     * 1: `warn,dnshdr=debug`
///     * 2: `warn,dnshdr=trace`
///     * >=3: `trace` (include external crates)
/// - Without CLI override: `warn,dnshdr=<cfg_level>`.
pub(crate) fn effective_log_spec(cfg: &LogConfig, cli_verbose: Option<u8>) -> String {
    effective_log_spec_with(cfg, cli_verbose, std::env::var("RUST_LOG").ok())
}

fn effective_log_spec_with(
    cfg: &LogConfig,
    cli_verbose: Option<u8>,
    rust_log: Option<String>,
) -> String {
    // RUST_LOG always wins
    if let Some(v) = rust_log.filter(|v| !v.is_empty()) {
        return v;
    }

    match cli_verbose {
        Some(1) => "warn,dnshdr=debug".to_string(),
        Some(2) => "warn,dnshdr=trace".to_string(),
        Some(v) if v >= 3 => "trace".to_string(),
        _ => format!("warn,dnshdr={}", cfg.level),
    }
}

/// Build the writer for log output and report whether ANSI colors apply.
fn make_writer(cfg: &LogConfig) -> Result<(BoxMakeWriter, bool)> {
    match &cfg.file {
        #[cfg(feature = "log-file")]
        Some(path) => {
            let (non_blocking, _guard) =
                FILE_WRITER.get_or_try_init(|| -> std::io::Result<FileWriter> {
                    let file = std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)?;
                    Ok(tracing_appender::non_blocking(file))
                })?;

            // No color codes in files
            Ok((BoxMakeWriter::new(non_blocking.clone()), false))
        }
        #[cfg(not(feature = "log-file"))]
        Some(path) => Err(anyhow::anyhow!(
            "log file '{}' configured but the `log-file` feature is disabled",
            path
        )),
        None => Ok((BoxMakeWriter::new(std::io::stderr), true)),
    }
}

/// Initialize global logging according to the provided `LogConfig`.
///
/// This configures `tracing_subscriber` with an `EnvFilter` derived from
/// `effective_log_spec` and applies either JSON or human-readable
/// formatting. Calling it again after a subscriber is installed is a no-op.
///
/// Returns `anyhow::Result<()>` to make initialization errors easy to
/// propagate from application startup.
pub fn init_logging(cfg: &LogConfig, cli_verbose: Option<u8>) -> Result<()> {
    let filter = EnvFilter::try_new(effective_log_spec(cfg, cli_verbose))?;
    let (writer, ansi) = make_writer(cfg)?;

    let registry = tracing_subscriber::registry().with(filter);

    if cfg.format == "json" {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(ansi)
            .with_writer(writer);
        let _ = registry.with(layer).try_init();
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(ansi)
            .with_writer(writer);
        let _ = registry.with(layer).try_init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(level: &str) -> LogConfig {
        LogConfig {
            level: level.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn rust_log_overrides_config_level() {
        let spec = effective_log_spec_with(&cfg("info"), Some(2), Some("trace".to_string()));
        assert_eq!(spec, "trace");
    }

    #[test]
    fn empty_rust_log_is_ignored() {
        let spec = effective_log_spec_with(&cfg("error"), None, Some(String::new()));
        assert_eq!(spec, "warn,dnshdr=error");
    }

    #[test]
    fn cfg_level_used_when_no_rust_log() {
        let cfg = cfg("warn");

        assert_eq!(effective_log_spec_with(&cfg, None, None), "warn,dnshdr=warn");
        assert_eq!(effective_log_spec_with(&cfg, Some(0), None), "warn,dnshdr=warn");
        assert_eq!(effective_log_spec_with(&cfg, Some(1), None), "warn,dnshdr=debug");
        assert_eq!(effective_log_spec_with(&cfg, Some(2), None), "warn,dnshdr=trace");
        assert_eq!(effective_log_spec_with(&cfg, Some(3), None), "trace");
        assert_eq!(effective_log_spec_with(&cfg, Some(9), None), "trace");
    }

    #[test]
    fn effective_spec_parses_as_filter() {
        for verbose in [None, Some(1), Some(2), Some(3)] {
            let spec = effective_log_spec_with(&cfg("info"), verbose, None);
            assert!(EnvFilter::try_new(&spec).is_ok(), "bad spec: {}", spec);
        }
    }

    #[cfg(feature = "log-file")]
    #[test]
    fn file_writer_survives_repeated_setup() {
        use std::io::Write;
        use std::time::Duration;
        use tracing_subscriber::fmt::MakeWriter;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dnshdr.log");
        let cfg = LogConfig {
            file: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };

        let (first, ansi) = make_writer(&cfg).unwrap();
        assert!(!ansi);
        assert!(path.exists());
        drop(first);

        // A second setup must reuse the live worker
        let (second, _) = make_writer(&cfg).unwrap();
        second
            .make_writer()
            .write_all(b"second writer line\n")
            .unwrap();

        let mut contents = String::new();
        for _ in 0..100 {
            contents = std::fs::read_to_string(&path).unwrap();
            if contents.contains("second writer line") {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(contents.contains("second writer line"), "log file: {:?}", contents);
    }
}
