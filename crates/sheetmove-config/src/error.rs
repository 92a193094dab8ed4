//! Error types for plan loading and validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the plan file failed.
    #[error("failed to read plan file")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Plan file path.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The plan document was not valid YAML or did not match the task schema.
    #[error("failed to parse plan document")]
    Parse {
        /// Plan file path when the document came from disk.
        path: Option<PathBuf>,
        /// Source YAML error.
        source: serde_yaml::Error,
    },
    /// A field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Section that failed validation (for example `tasks[1]` or `logging`).
        section: String,
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
