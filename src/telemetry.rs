//! Tracing setup and span constructors.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Fails if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span};

    /// Create a span for typecasting one event.
    pub fn event(command: &str, name: &str) -> Span {
        debug_span!("event", command = %command, name = %name)
    }

    /// Create a span for an outbound command call.
    pub fn remote_call(command: &str) -> Span {
        debug_span!("remote_call", command = %command)
    }
}
