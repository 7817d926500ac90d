use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr; stdout carries only results.
///
/// `RUST_LOG` wins over the client file; `--verbose` forces debug for our crates.
/// The file's level is checked even when it is overridden.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level: LevelFilter = config
        .level
        .trim()
        .parse()
        .with_context(|| format!("Invalid log level in client file: '{}'", config.level))?;
    let level = if verbose { LevelFilter::DEBUG } else { level };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("slots={level},slot_engine={level}"))
            .context("Invalid log filter")?,
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match config.format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
    }
    Ok(())
}
