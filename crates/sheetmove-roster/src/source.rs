//! Spreadsheet access capability.
//!
//! # Design
//! - The identifier builder only needs "give me this sheet with this header row"; the
//!   trait keeps file formats out of the matching logic.
//! - `MemorySheetSource` stands in for real files in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sheetmove_config::SheetRef;

use crate::error::{DataLoadError, RosterResult};
use crate::table::{CellValue, Table};

/// Loads one sheet of a spreadsheet as a header-resolved [`Table`].
pub trait SheetSource {
    /// Load `sheet` from the spreadsheet at `path`, taking row `header` as column names.
    ///
    /// # Errors
    ///
    /// Returns a [`DataLoadError`] if the file, sheet or header row cannot be resolved.
    fn load_table(&self, path: &Path, sheet: &SheetRef, header: usize) -> RosterResult<Table>;
}

impl<S: SheetSource + ?Sized> SheetSource for &S {
    fn load_table(&self, path: &Path, sheet: &SheetRef, header: usize) -> RosterResult<Table> {
        (**self).load_table(path, sheet, header)
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<CellValue>>)>,
}

/// In-memory workbooks keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySheetSource {
    workbooks: HashMap<PathBuf, MemoryWorkbook>,
}

impl MemorySheetSource {
    /// Create a source with no workbooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet (appended after existing sheets of the same workbook).
    #[must_use]
    pub fn with_sheet(
        mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        grid: Vec<Vec<CellValue>>,
    ) -> Self {
        self.insert_sheet(path, name, grid);
        self
    }

    /// Add or replace a sheet of the workbook at `path`.
    pub fn insert_sheet(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        grid: Vec<Vec<CellValue>>,
    ) {
        let name = name.into();
        let workbook = self.workbooks.entry(path.into()).or_default();
        if let Some(existing) = workbook
            .sheets
            .iter_mut()
            .find(|(sheet_name, _)| *sheet_name == name)
        {
            existing.1 = grid;
        } else {
            workbook.sheets.push((name, grid));
        }
    }
}

impl SheetSource for MemorySheetSource {
    fn load_table(&self, path: &Path, sheet: &SheetRef, header: usize) -> RosterResult<Table> {
        let workbook = self
            .workbooks
            .get(path)
            .ok_or_else(|| DataLoadError::Missing {
                path: path.to_path_buf(),
            })?;

        let found = match sheet {
            SheetRef::Index(index) => workbook.sheets.get(*index),
            SheetRef::Name(name) => workbook
                .sheets
                .iter()
                .find(|(sheet_name, _)| sheet_name == name),
        };
        let (_, grid) = found.ok_or_else(|| DataLoadError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            available: workbook
                .sheets
                .iter()
                .map(|(sheet_name, _)| sheet_name.clone())
                .collect(),
        })?;

        Table::from_grid(grid.clone(), header)
    }
}
