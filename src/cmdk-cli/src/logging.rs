//! File logging.
//!
//! The terminal belongs to the UI, so log output goes to a file through a
//! non-blocking writer. Without a log file, logging stays disabled.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::LogLevel;

/// Keeps the background writer alive; flushes pending lines on drop.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Builds the filter from `CMDK_LOG`, then `RUST_LOG`, then `level`.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    for var in ["CMDK_LOG", "RUST_LOG"] {
        if let Ok(directives) = std::env::var(var)
            && let Ok(filter) = EnvFilter::try_new(&directives)
        {
            return filter;
        }
    }
    EnvFilter::new(level.as_filter_str())
}

/// Installs the global subscriber writing to `path` (appending).
pub fn init_file_logging(path: &Path, level: LogLevel) -> Result<LogGuard> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(LogGuard { _guard: guard })
}
