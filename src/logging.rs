//! Logging setup — a stderr `tracing` subscriber filtered by level.

use std::env;
use std::io;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Build the filter: `RUST_LOG` when set, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    env::var("RUST_LOG").map_or_else(
        |_| EnvFilter::new(default_level),
        |directive| EnvFilter::new(directive),
    )
}

/// Install the global subscriber. Output goes to stderr so stdout stays
/// clean for command results.
pub fn init(default_level: &str) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(layer)
        .try_init()
}
