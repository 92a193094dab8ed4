//! File-backed sheet source: calamine for workbooks, the csv crate for CSV files.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use sheetmove_config::SheetRef;
use tracing::debug;

use crate::error::{DataLoadError, RosterResult};
use crate::source::SheetSource;
use crate::table::{CellValue, Table};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xla", "ods"];
const CSV_EXTENSION: &str = "csv";

/// Reads spreadsheets from disk, dispatching on the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookSource;

impl WorkbookSource {
    /// Construct the file-backed source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SheetSource for WorkbookSource {
    fn load_table(&self, path: &Path, sheet: &SheetRef, header: usize) -> RosterResult<Table> {
        if !path.is_file() {
            return Err(DataLoadError::Missing {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let grid = match extension.as_deref() {
            Some(CSV_EXTENSION) => read_csv_grid(path, sheet)?,
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook_grid(path, sheet)?,
            _ => {
                return Err(DataLoadError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    extension,
                });
            }
        };

        debug!(
            path = %path.display(),
            sheet = %sheet,
            rows = grid.len(),
            "read sheet grid"
        );
        Table::from_grid(grid, header)
    }
}

fn read_workbook_grid(path: &Path, sheet: &SheetRef) -> RosterResult<Vec<Vec<CellValue>>> {
    let mut workbook = open_workbook_auto(path).map_err(|source| DataLoadError::Workbook {
        operation: "workbook.open",
        path: path.to_path_buf(),
        source,
    })?;

    let names = workbook.sheet_names();
    let name = match sheet {
        SheetRef::Index(index) => names.get(*index).cloned(),
        SheetRef::Name(name) => names.iter().find(|candidate| *candidate == name).cloned(),
    }
    .ok_or_else(|| DataLoadError::SheetNotFound {
        path: path.to_path_buf(),
        sheet: sheet.to_string(),
        available: names.clone(),
    })?;

    let range = workbook
        .worksheet_range(&name)
        .map_err(|source| DataLoadError::Workbook {
            operation: "workbook.worksheet_range",
            path: path.to_path_buf(),
            source,
        })?;
    Ok(grid_from_range(&range))
}

/// Expand a calamine range to a grid anchored at cell A1.
///
/// Ranges start at the first non-empty cell; leading blank rows and columns are filled in
/// so header indices count from the top of the sheet. Only used cells are placed, so each
/// row is as wide as its last value and blank rows stay empty.
fn grid_from_range(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut grid: Vec<Vec<CellValue>> = Vec::new();
    for (row, col, data) in range.used_cells() {
        let cell = cell_from_data(data);
        if cell == CellValue::Empty {
            continue;
        }
        let (row, col) = (start_row + row, start_col + col);
        if grid.len() <= row {
            grid.resize_with(row + 1, Vec::new);
        }
        let cells = &mut grid[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = cell;
    }
    grid
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Bool(value) => CellValue::Bool(*value),
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) => CellValue::Float(*value),
        Data::String(value) => CellValue::from(value.as_str()),
        other => CellValue::Text(other.to_string()),
    }
}

fn read_csv_grid(path: &Path, sheet: &SheetRef) -> RosterResult<Vec<Vec<CellValue>>> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let selected = match sheet {
        SheetRef::Index(index) => *index == 0,
        SheetRef::Name(name) => *name == stem,
    };
    if !selected {
        return Err(DataLoadError::SheetNotFound {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            available: vec![stem],
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| DataLoadError::Csv {
            operation: "csv.open",
            path: path.to_path_buf(),
            source,
        })?;

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| DataLoadError::Csv {
            operation: "csv.record",
            path: path.to_path_buf(),
            source,
        })?;
        grid.push(record.iter().map(cell_from_csv).collect());
    }
    Ok(grid)
}

/// Type a CSV field the way a spreadsheet would display it.
///
/// Integers only when they render back identically, so IDs with leading zeros stay text.
fn cell_from_csv(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(value) = field.parse::<i64>()
        && value.to_string() == field
    {
        return CellValue::Int(value);
    }
    if field.contains('.')
        && !field.starts_with("00")
        && let Ok(value) = field.parse::<f64>()
        && value.is_finite()
    {
        return CellValue::Float(value);
    }
    match field {
        "true" | "TRUE" | "True" => CellValue::Bool(true),
        "false" | "FALSE" | "False" => CellValue::Bool(false),
        _ => CellValue::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use calamine::Cell;
    use sheetmove_test_support::fixtures::{temp_dir, write_csv};
    use sheetmove_test_support::workbook::{XlsxCell, XlsxSheet, write_xlsx};
    use std::fs;
    use std::path::PathBuf;

    fn roster_workbook(dir: &Path) -> Result<PathBuf> {
        let path = dir.join("patients.xlsx");
        write_xlsx(
            &path,
            &[
                XlsxSheet {
                    name: "Summary",
                    cells: &[("A1", XlsxCell::Text("Exported 2024"))],
                },
                XlsxSheet {
                    name: "Roster",
                    cells: &[
                        ("B3", XlsxCell::Text("PatientID")),
                        ("C3", XlsxCell::Text("Diagnosis")),
                        ("B4", XlsxCell::Number(1234.0)),
                        ("C4", XlsxCell::Text("UA")),
                        ("B5", XlsxCell::Text("001-5678")),
                        ("B6", XlsxCell::Number(42.5)),
                    ],
                },
            ],
        )?;
        Ok(path)
    }

    #[test]
    fn reads_workbook_sheet_offset_from_a1() -> Result<()> {
        let temp = temp_dir()?;
        let path = roster_workbook(temp.path())?;

        let table =
            WorkbookSource::new().load_table(&path, &SheetRef::Name("Roster".into()), 2)?;
        assert_eq!(table.headers(), ["", "PatientID", "Diagnosis"]);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.cell(0, 0), &CellValue::Empty);
        assert_eq!(table.cell(0, 1), &CellValue::Float(1234.0));
        assert_eq!(table.cell(0, 1).as_text().as_deref(), Some("1234"));
        assert_eq!(table.cell(0, 2), &CellValue::Text("UA".to_string()));
        assert_eq!(table.cell(1, 1), &CellValue::Text("001-5678".to_string()));
        assert_eq!(table.cell(1, 2), &CellValue::Empty);
        assert_eq!(table.cell(2, 1), &CellValue::Float(42.5));
        Ok(())
    }

    #[test]
    fn workbook_sheets_resolve_by_index_and_name() -> Result<()> {
        let temp = temp_dir()?;
        let path = roster_workbook(temp.path())?;
        let source = WorkbookSource::new();

        let by_index = source.load_table(&path, &SheetRef::Index(1), 2)?;
        let by_name = source.load_table(&path, &SheetRef::Name("Roster".into()), 2)?;
        assert_eq!(by_index, by_name);

        let first = source.load_table(&path, &SheetRef::Index(0), 0)?;
        assert_eq!(first.headers(), ["Exported 2024"]);

        let err = source
            .load_table(&path, &SheetRef::Name("Visits".into()), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::SheetNotFound { ref available, .. }
                if available == &["Summary".to_string(), "Roster".to_string()]
        ));
        Ok(())
    }

    #[test]
    fn workbook_header_beyond_data_is_out_of_range() -> Result<()> {
        let temp = temp_dir()?;
        let path = roster_workbook(temp.path())?;
        let err = WorkbookSource::new()
            .load_table(&path, &SheetRef::Index(1), 6)
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::HeaderOutOfRange { header: 6, rows: 6 }
        ));
        Ok(())
    }

    #[test]
    fn grid_keeps_only_used_cells() {
        let range = Range::from_sparse(vec![
            Cell::new((2, 1), Data::String("PatientID".to_string())),
            Cell::new((3, 1), Data::Int(1234)),
            Cell::new((3, 2), Data::Bool(true)),
            Cell::new((2_000, 300), Data::Float(1.0)),
        ]);

        let grid = grid_from_range(&range);
        assert_eq!(grid.len(), 2_001);
        assert!(grid[0].is_empty());
        assert_eq!(grid[2], vec![CellValue::Empty, "PatientID".into()]);
        assert_eq!(
            grid[3],
            vec![CellValue::Empty, CellValue::Int(1234), CellValue::Bool(true)]
        );
        assert!(grid[4..2_000].iter().all(Vec::is_empty));
        assert_eq!(grid[2_000].len(), 301);
        assert_eq!(grid[2_000][300], CellValue::Float(1.0));
    }

    #[test]
    fn error_cells_read_as_blank() {
        let range = Range::from_sparse(vec![
            Cell::new((0, 0), Data::String("ID".to_string())),
            Cell::new((1, 0), Data::Error(calamine::CellErrorType::NA)),
        ]);
        let grid = grid_from_range(&range);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn csv_fields_are_typed() {
        assert_eq!(cell_from_csv(""), CellValue::Empty);
        assert_eq!(cell_from_csv("1234"), CellValue::Int(1234));
        assert_eq!(cell_from_csv("-7"), CellValue::Int(-7));
        assert_eq!(cell_from_csv("0012"), CellValue::Text("0012".to_string()));
        assert_eq!(cell_from_csv("+5"), CellValue::Text("+5".to_string()));
        assert_eq!(cell_from_csv("12.5"), CellValue::Float(12.5));
        assert_eq!(cell_from_csv("TRUE"), CellValue::Bool(true));
        assert_eq!(cell_from_csv("001-1234"), CellValue::Text("001-1234".to_string()));
        assert_eq!(cell_from_csv("1.2.3"), CellValue::Text("1.2.3".to_string()));
    }

    #[test]
    fn reads_csv_with_header_offset() -> Result<()> {
        let temp = temp_dir()?;
        let path = temp.path().join("patients.csv");
        write_csv(
            &path,
            &[
                &["Exported 2024"],
                &["PatientID", "Diagnosis"],
                &["1234", "UA"],
                &["001-5678", "OA"],
            ],
        )?;

        let table = WorkbookSource::new().load_table(&path, &SheetRef::Index(0), 1)?;
        assert_eq!(table.headers(), ["PatientID", "Diagnosis"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.cell(0, 0), &CellValue::Int(1234));
        assert_eq!(table.cell(1, 0), &CellValue::Text("001-5678".to_string()));
        Ok(())
    }

    #[test]
    fn csv_sheet_is_addressable_by_stem() -> Result<()> {
        let temp = temp_dir()?;
        let path = temp.path().join("patients.csv");
        write_csv(&path, &[&["ID"], &["1"]])?;

        let source = WorkbookSource::new();
        assert!(
            source
                .load_table(&path, &SheetRef::Name("patients".into()), 0)
                .is_ok()
        );
        let err = source
            .load_table(&path, &SheetRef::Index(1), 0)
            .unwrap_err();
        assert!(matches!(err, DataLoadError::SheetNotFound { .. }));
        Ok(())
    }

    #[test]
    fn missing_file_is_reported_before_parsing() -> Result<()> {
        let temp = temp_dir()?;
        let path = temp.path().join("absent.xlsx");
        let err = WorkbookSource::new()
            .load_table(&path, &SheetRef::Index(0), 0)
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Missing { path: ref p } if *p == path));
        Ok(())
    }

    #[test]
    fn unknown_extension_is_unsupported() -> Result<()> {
        let temp = temp_dir()?;
        let path = temp.path().join("notes.txt");
        fs::write(&path, "ID\n1\n")?;
        let err = WorkbookSource::new()
            .load_table(&path, &SheetRef::Index(0), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnsupportedFormat { extension: Some(ref ext), .. } if ext == "txt"
        ));
        Ok(())
    }

    #[test]
    fn corrupt_workbook_fails_to_open() -> Result<()> {
        let temp = temp_dir()?;
        let path = temp.path().join("broken.xlsx");
        fs::write(&path, b"not a zip archive")?;
        let err = WorkbookSource::new()
            .load_table(&path, &SheetRef::Index(0), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::Workbook {
                operation: "workbook.open",
                ..
            }
        ));
        Ok(())
    }
}
