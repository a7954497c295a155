//! Tracing setup for the driver.
//!
//! Everything is written to stderr; stdout carries only reports.

use crate::config::LoggingConfig;
use std::io;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG`, when set, replaces the
/// configured level.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));

    let layer = fmt::layer().with_writer(io::stderr);
    let layer = match config.format.as_str() {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        _ => layer.boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .init();
}

/// Filter for the configured level; an unparsable level means `info`.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}
