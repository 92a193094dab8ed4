//! Cell values and header-resolved tables.
//!
//! # Design
//! - Sources hand over a raw grid; header handling lives here so every source agrees on
//!   what a header row index means.
//! - Cells keep their scalar kind so filters can compare type-sensitively.

use std::fmt::{self, Display, Formatter};

use sheetmove_config::{ColumnRef, FilterValue};

use crate::error::{DataLoadError, RosterResult};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank cell (or an error cell).
    #[default]
    Empty,
    /// Boolean cell.
    Bool(bool),
    /// Integral numeric cell.
    Int(i64),
    /// Fractional numeric cell.
    Float(f64),
    /// Text cell.
    Text(String),
}

impl CellValue {
    /// Text rendering of the cell, or `None` when the cell is blank.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            other => Some(other.to_string()),
        }
    }

    /// Type-sensitive equality against a configured filter value.
    ///
    /// Text compares exactly, numbers compare numerically across integer and float cells,
    /// booleans compare with booleans. Mixed kinds and blank cells never match.
    #[must_use]
    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    pub fn matches(&self, expected: &FilterValue) -> bool {
        match (self, expected) {
            (Self::Text(actual), FilterValue::Text(wanted)) => actual == wanted,
            (Self::Bool(actual), FilterValue::Bool(wanted)) => actual == wanted,
            (Self::Int(actual), FilterValue::Int(wanted)) => actual == wanted,
            (Self::Float(actual), FilterValue::Float(wanted)) => actual == wanted,
            (Self::Int(actual), FilterValue::Float(wanted)) => (*actual as f64) == *wanted,
            (Self::Float(actual), FilterValue::Int(wanted)) => *actual == (*wanted as f64),
            _ => false,
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            // f64 Display already renders 1234.0 as "1234".
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Sheet contents below a header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Table {
    /// Build a table from a raw sheet grid, using row `header` as column names.
    ///
    /// Rows above the header are discarded; rows below it become data rows.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::HeaderOutOfRange`] when the grid has no row `header`.
    pub fn from_grid(mut grid: Vec<Vec<CellValue>>, header: usize) -> RosterResult<Self> {
        if header >= grid.len() {
            return Err(DataLoadError::HeaderOutOfRange {
                header,
                rows: grid.len(),
            });
        }

        let rows = grid.split_off(header + 1);
        let header_row = grid.pop().unwrap_or_default();
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header_row.len()))
            .max()
            .unwrap_or(0);

        let mut headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.as_text().unwrap_or_default())
            .collect();
        headers.resize(width, String::new());

        Ok(Self {
            headers,
            rows,
            width,
        })
    }

    /// Column names taken from the header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows below the header row.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of columns spanned by the header and data rows.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Resolve a column selector to a 0-based index.
    ///
    /// Names match the first header with identical text.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::ColumnNotFound`] or [`DataLoadError::ColumnOutOfRange`]
    /// when the selector does not resolve.
    pub fn resolve_column(&self, column: &ColumnRef) -> RosterResult<usize> {
        match column {
            ColumnRef::Index(index) if *index < self.width => Ok(*index),
            ColumnRef::Index(index) => Err(DataLoadError::ColumnOutOfRange {
                index: *index,
                width: self.width,
            }),
            ColumnRef::Name(name) => self
                .headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| DataLoadError::ColumnNotFound {
                    column: name.clone(),
                    available: self.headers.clone(),
                }),
        }
    }

    /// Cell at `column` of data row `row`; short rows read as blank.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}
