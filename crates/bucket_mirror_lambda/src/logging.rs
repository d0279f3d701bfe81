//! Logging initialization for the Lambda runtime.

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a JSON formatter writing to stderr.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Colors are off
/// since the output ends up in CloudWatch.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_current_span(false)
        .with_writer(std::io::stderr)
        .try_init()
}
