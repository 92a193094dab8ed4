//! # Design
//!
//! - Provide structured, constant-message errors for folder relocation.
//! - Capture operation context (paths, fields) so failures read clearly in the log file.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for folder operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors produced while listing, creating or moving folders.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// IO failures while interacting with the filesystem.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Walkdir traversal failures during a recursive copy.
    #[error("fsops walkdir failure")]
    Walkdir {
        /// Operation that triggered the walkdir failure.
        operation: &'static str,
        /// Path involved in the walkdir failure.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// A folder with the same name already exists at the destination.
    #[error("destination already exists")]
    DestinationExists {
        /// Destination path that is already occupied.
        path: PathBuf,
    },
    /// The source directory of a task does not exist.
    #[error("source directory missing")]
    SourceMissing {
        /// Source path that was requested.
        path: PathBuf,
    },
    /// Input validation failures.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// Failure injected by [`MemoryFolderStore`](crate::MemoryFolderStore).
    #[error("injected fsops failure")]
    Injected {
        /// Operation that was configured to fail.
        operation: &'static str,
        /// Path the failure was injected for.
        path: PathBuf,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walkdir(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: walkdir::Error,
    ) -> Self {
        Self::Walkdir {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports an occupied destination rather than a failure.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::DestinationExists { .. })
    }
}
