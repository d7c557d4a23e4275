// src/logging.rs

use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the default log filter, checked after
/// `RUST_LOG`.
pub const LOG_ENV: &str = "LEAKHOUND_LOGLEVEL";

/// Initializes tracing. Diagnostics always go to stderr: stdout carries the
/// machine-readable finding lines and must stay clean.
pub fn initialize_logging(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV))
        .unwrap_or_else(|_| format!("{}={default_level}", env!("CARGO_CRATE_NAME")));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
