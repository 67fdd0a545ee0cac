use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install the stderr logger.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` means `debug` and the
/// configured level applies.
pub fn init(level: &str, verbose: bool) -> Result<()> {
    let directive = if verbose { "debug" } else { level };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log level '{directive}'"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
}
