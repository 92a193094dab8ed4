//! Typed task records and plan document.
//!
//! # Design
//! - Pure data carriers deserialized from the plan file; IO lives in `loader.rs`.
//! - Sheet and column identifiers accept either a name or a 0-based index, mirroring
//!   how spreadsheet tools address them.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL};

/// Sheet selector: a sheet name or a 0-based sheet index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetRef {
    /// Position of the sheet within the workbook.
    Index(usize),
    /// Sheet name as shown on the workbook tab.
    Name(String),
}

impl Default for SheetRef {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl Display for SheetRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(formatter, "#{index}"),
            Self::Name(name) => write!(formatter, "'{name}'"),
        }
    }
}

/// Column selector: a header name or a 0-based column index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    /// Position of the column within the sheet.
    Index(usize),
    /// Header text of the column.
    Name(String),
}

impl Display for ColumnRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(formatter, "#{index}"),
            Self::Name(name) => write!(formatter, "'{name}'"),
        }
    }
}

/// Expected value of the filter column. The scalar kind is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Boolean cell value.
    Bool(bool),
    /// Integral numeric value.
    Int(i64),
    /// Fractional numeric value.
    Float(f64),
    /// Text value, compared exactly.
    Text(String),
}

impl Display for FilterValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value} (bool)"),
            Self::Int(value) => write!(formatter, "{value} (int)"),
            Self::Float(value) => write!(formatter, "{value} (float)"),
            Self::Text(value) => write!(formatter, "'{value}' (text)"),
        }
    }
}

/// One spreadsheet-to-folder move operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveTask {
    /// Spreadsheet that lists the identifiers.
    pub excel_path: PathBuf,
    /// Sheet to read; defaults to the first sheet.
    #[serde(default)]
    pub sheet_name: SheetRef,
    /// Column holding the identifiers matched against folder names.
    pub name_col: ColumnRef,
    /// 0-based row that holds the column headers.
    #[serde(default)]
    pub header: usize,
    /// Directory whose direct subdirectories are candidates for moving.
    pub source_path: PathBuf,
    /// Directory that receives matched subdirectories.
    pub destination_path: PathBuf,
    /// Column used to restrict which rows contribute identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_col: Option<ColumnRef>,
    /// Value the filter column must hold for a row to contribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_value: Option<FilterValue>,
}

impl MoveTask {
    /// Row filter for this task, present only when both column and value are configured.
    #[must_use]
    pub fn row_filter(&self) -> Option<RowFilter<'_>> {
        match (&self.filter_col, &self.filter_value) {
            (Some(column), Some(value)) => Some(RowFilter { column, value }),
            _ => None,
        }
    }
}

/// Borrowed column/value predicate applied to spreadsheet rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFilter<'a> {
    /// Column whose value is compared.
    pub column: &'a ColumnRef,
    /// Value the column must equal.
    pub value: &'a FilterValue,
}

/// Output format of the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFileFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Log file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Log file path, relative to the working directory unless absolute.
    pub file: PathBuf,
    /// Filter directive such as `debug` or `info`.
    pub level: String,
    /// Line format.
    pub format: LogFileFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFileFormat::Text,
        }
    }
}

/// Plan document: logging settings and the ordered task list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovePlan {
    /// Log file settings.
    #[serde(default)]
    pub logging: LogSettings,
    /// Tasks, executed in order.
    #[serde(default)]
    pub tasks: Vec<MoveTask>,
}

impl MovePlan {
    /// Indices of tasks that set `filter_value` without `filter_col`; the value is ignored.
    #[must_use]
    pub fn ignored_filter_values(&self) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.filter_col.is_none() && task.filter_value.is_some())
            .map(|(index, _)| index)
            .collect()
    }
}
