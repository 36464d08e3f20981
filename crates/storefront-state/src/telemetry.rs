//! Tracing setup for the host application.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,storefront=debug";

/// Installs the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - every store operation
/// - `RUST_LOG=storefront_state=trace` - also subscriber fan-out
/// - Default: [`DEFAULT_FILTER`]
///
/// Returns `false` if a subscriber was already installed (tests, or a host
/// that configured its own).
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
