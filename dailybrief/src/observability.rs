//! Logging setup.
//!
//! Stage and scheduler code emits structured events through `tracing`; this
//! module wires up a subscriber for binaries and tests. Library code never
//! installs a subscriber on its own.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a human-readable subscriber filtered by `RUST_LOG`
/// (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Installs a JSON-lines subscriber for log aggregation, filtered by
/// `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_json_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().json().with_env_filter(filter).try_init();
}
