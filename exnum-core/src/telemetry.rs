//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events; binaries and tests call
//! [`init`] once to route them to stderr.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;
use crate::error::{ExnumError, Result};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to `config.log_level`.
///
/// Returns `Ok(true)` when this call installed the subscriber and
/// `Ok(false)` if an earlier call already had.
///
/// # Errors
/// Returns `ExnumError::Config` for an unparsable log level and
/// `ExnumError::Telemetry` if another global subscriber is already set.
pub fn init(config: &GeneralConfig) -> Result<bool> {
    let filter = filter(config)?;
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(false);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map(|()| true).map_err(|e| {
        INSTALLED.store(false, Ordering::SeqCst);
        ExnumError::Telemetry(e.to_string())
    })
}

fn filter(config: &GeneralConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            ExnumError::Config(format!("invalid log level {:?}: {e}", config.log_level))
        }),
    }
}
