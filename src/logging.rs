//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the host. These helpers install a `fmt` subscriber whose filter comes from
//! `RUST_LOG` when set, otherwise from the given level.

use crate::config::SequenceConfig;
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber at `level`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install a subscriber using the configured log level.
pub fn init_from_config(config: &SequenceConfig) -> bool {
    init(&config.log_level)
}
