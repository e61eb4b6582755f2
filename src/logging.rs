//! Logging system initialization

use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber.
///
/// Log level defaults to INFO but can be configured via `RUST_LOG`.
/// Calling this twice keeps the first subscriber.
pub fn init_logging() {
    let result = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .try_init();

    if let Err(e) = result {
        tracing::debug!("Logging already initialized: {e}");
    }
}
