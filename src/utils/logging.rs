//! Tracing subscriber setup.
//!
//! Log levels follow these conventions:
//! - WARN: truncated captures, missing rounds, unknown opcodes, unresolved grammars
//! - INFO: run summaries (records read, checks passed, rounds built)
//! - DEBUG: per-capture, per-round and per-grammar-attempt detail
//! - TRACE: per-record and per-file detail

use crate::config::LoggingConfig;
use crate::error::{Result, WireError};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter_for(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()))
}

/// Install a global subscriber according to `config`.
///
/// `RUST_LOG` overrides the configured level. When `log_to_file` is set the
/// file takes precedence over the console.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = filter_for(config);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let outcome = match (config.log_to_file, config.log_file_path.as_deref()) {
        (true, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = Mutex::new(file);
            if config.json_format {
                builder.json().with_writer(writer).try_init()
            } else {
                builder.with_ansi(false).with_writer(writer).try_init()
            }
        }
        _ if config.json_format => builder.json().try_init(),
        _ => builder.try_init(),
    };

    outcome.map_err(|e| WireError::ConfigError(format!("Failed to install subscriber: {e}")))
}

/// Initialize the tracing subscriber for tests.
///
/// Uses `try_init` so repeated calls across tests are harmless.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
