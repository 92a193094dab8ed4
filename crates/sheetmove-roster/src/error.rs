//! # Design
//!
//! - One error type for every way a task's spreadsheet can fail to yield identifiers.
//! - Constant messages; the path, sheet or column involved lives in the variant fields.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for spreadsheet operations.
pub type RosterResult<T> = Result<T, DataLoadError>;

/// Failures that prevent a task's identifier set from being built.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The spreadsheet file does not exist.
    #[error("spreadsheet not found")]
    Missing {
        /// Path that was requested.
        path: PathBuf,
    },
    /// The file extension is not a supported spreadsheet format.
    #[error("unsupported spreadsheet format")]
    UnsupportedFormat {
        /// Path that was requested.
        path: PathBuf,
        /// Extension found on the path, if any.
        extension: Option<String>,
    },
    /// A workbook could not be opened or a sheet could not be read.
    #[error("workbook read failed")]
    Workbook {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Workbook path.
        path: PathBuf,
        /// Underlying calamine error.
        source: calamine::Error,
    },
    /// A CSV file could not be opened or parsed.
    #[error("csv read failed")]
    Csv {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// CSV path.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// The requested sheet does not exist in the workbook.
    #[error("sheet not found")]
    SheetNotFound {
        /// Workbook path.
        path: PathBuf,
        /// Requested sheet, rendered for diagnostics.
        sheet: String,
        /// Sheets the workbook does contain.
        available: Vec<String>,
    },
    /// The header row index lies beyond the last row of the sheet.
    #[error("header row out of range")]
    HeaderOutOfRange {
        /// Requested 0-based header row.
        header: usize,
        /// Number of rows in the sheet.
        rows: usize,
    },
    /// No header cell carries the requested column name.
    #[error("column not found")]
    ColumnNotFound {
        /// Requested column name.
        column: String,
        /// Header names present in the sheet.
        available: Vec<String>,
    },
    /// The requested column index lies beyond the widest row.
    #[error("column index out of range")]
    ColumnOutOfRange {
        /// Requested 0-based column index.
        index: usize,
        /// Number of columns in the sheet.
        width: usize,
    },
}
