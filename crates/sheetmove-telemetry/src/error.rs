//! Error types for logging setup.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised while installing the log subscriber.
#[derive(Debug)]
pub enum TelemetryError {
    /// The log file could not be created or truncated.
    LogFileOpen {
        /// Log file path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configured level is not a valid filter directive.
    InvalidFilter {
        /// Directive text as configured.
        level: String,
        /// Underlying directive parse error.
        source: tracing_subscriber::filter::ParseError,
    },
    /// Installing the tracing subscriber failed.
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: tracing_subscriber::util::TryInitError,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogFileOpen { .. } => formatter.write_str("failed to open log file"),
            Self::InvalidFilter { .. } => formatter.write_str("invalid log level directive"),
            Self::SubscriberInstall { .. } => {
                formatter.write_str("failed to install tracing subscriber")
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LogFileOpen { source, .. } => Some(source),
            Self::InvalidFilter { source, .. } => Some(source),
            Self::SubscriberInstall { source } => Some(source),
        }
    }
}
