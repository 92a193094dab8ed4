//! Subscriber construction and installation.
//!
//! # Design
//! - One entry point opens the log file and installs the global subscriber.
//! - The filter comes from configuration only; `RUST_LOG` is not consulted, so a run's log
//!   depth is decided by the plan file.
//! - `build_subscriber` accepts any writer so tests can capture output in memory.

use std::path::Path;

use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};
use crate::log_file::open_log_file;

/// Logging configuration.
#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig<'a> {
    /// Filter directive (e.g., `debug`, `info`).
    pub level: &'a str,
    /// Line format written to the log file.
    pub format: LogFormat,
    /// Log file path; truncated when logging is initialised.
    pub file: &'a Path,
}

/// Available output formats for the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects, one per line.
    Json,
    /// Emit human-readable lines.
    #[default]
    Text,
}

/// Open the log file and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be created, the level is not a valid directive,
/// or another subscriber has already been installed globally.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let writer = open_log_file(config.file)?;
    build_subscriber(config.level, config.format, writer)?
        .try_init()
        .map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Build a subscriber that writes formatted events to `writer`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if `level` is not a valid filter directive.
pub fn build_subscriber<W>(
    level: &str,
    format: LogFormat,
    writer: W,
) -> Result<impl Subscriber + Send + Sync + use<W>>
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidFilter {
        level: level.to_string(),
        source,
    })?;
    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(format_layer(format, writer)))
}

fn format_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(false)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(false)
            .boxed(),
    }
}
