//! Logging setup: stdout plus a size-rotated log file.

mod format;
mod rotate;

pub use format::LineFormat;
pub use rotate::{generation_path, RotatingFile};

use crate::config::LogConfig;
use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
/// with `verbose`.
pub fn init(config: &LogConfig, verbose: bool) -> Result<RotatingFile> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "foldermonitor=debug,foldermonitor_common=debug".to_string()
        } else {
            "foldermonitor=info,foldermonitor_common=info".to_string()
        }
    });

    let file = RotatingFile::open(
        &config.directory,
        &config.file_stem,
        config.max_bytes,
        config.generations,
    )
    .with_context(|| format!("Failed to open log file in {:?}", config.directory))?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(file.clone()),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(file)
}
