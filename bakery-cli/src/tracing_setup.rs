//! Tracing setup for the bakery CLI
//!
//! Usage:
//!   bakery --debug serve               # Debug logging to console
//!   RUST_LOG=bakery_server=debug bakery serve
//!
//! Development output is compact and human readable; production emits one
//! JSON object per line for the log collector.

use anyhow::{anyhow, Result};
use bakery_server::Environment;
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used when RUST_LOG is not set)
    pub debug: bool,
    pub environment: Environment,
}

fn env_filter(debug: bool) -> EnvFilter {
    let fallback = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber.
pub fn init(config: &TracingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.debug))
        .with_target(config.debug);

    if config.environment.is_production() {
        builder.json().try_init().map_err(|err| anyhow!(err))
    } else {
        builder.compact().try_init().map_err(|err| anyhow!(err))
    }
}
