//! Structured logging setup using the `tracing` ecosystem
//!
//! Logs go to stderr so that `ls` and `cat` output on stdout stays clean.
//! `RUST_LOG`, when set, replaces the crate level chosen here.

use std::env;
use std::str::FromStr;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the default log level
pub const LOG_LEVEL_ENV: &str = "FILESTORE_LOG_LEVEL";

static INIT: Once = Once::new();

/// Parses a log level such as `debug` or `WARN`, falling back to INFO
pub fn parse_level(level_str: &str) -> Level {
    Level::from_str(level_str.trim()).unwrap_or_else(|_| {
        eprintln!(
            "Ignoring unknown log level '{}' (from --log-level or {}), using info",
            level_str, LOG_LEVEL_ENV
        );
        Level::INFO
    })
}

/// Pick the level from explicit flags first, then the environment
pub fn resolve_level(log_level: Option<&str>, verbose: bool, quiet: bool) -> Level {
    if let Some(level_str) = log_level {
        parse_level(level_str)
    } else if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        let level_str = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "warn".to_string());
        parse_level(&level_str)
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init(level: Level) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(format!("filestore={}", level))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}
