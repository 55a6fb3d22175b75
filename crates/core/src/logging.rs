//! Structured logging infrastructure.
//!
//! Centralized logging initialization with environment-based configuration.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level. Output goes to stderr so command
/// output on stdout stays machine-readable.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
