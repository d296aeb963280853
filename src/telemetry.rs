//! Log output for the `regform` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the embedding application.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "regform=info";

/// Installs a stderr fmt subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already set.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
