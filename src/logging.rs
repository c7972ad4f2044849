//! Tracing subscriber setup for binaries and demos.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the application.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `directives`
/// (e.g. `"query_agent=debug"`), falling back to `info` when they do not
/// parse. `RUST_LOG` wins when set.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
