/// Logging setup for Loopnest Graph.
/// Installs a global tracing subscriber filtered by `RUST_LOG` or a fallback.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
/// `RUST_LOG` wins over `fallback` when set. Output goes to stderr so the
/// diagnostic dump and the completion message on stdout stay clean.
pub fn init_logging(fallback: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|e| anyhow!("invalid log filter '{}': {}", fallback, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(())
}
