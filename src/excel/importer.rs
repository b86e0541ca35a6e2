//! Workbook importer - Excel (.xlsx) → raw row grids

use super::SheetGrid;
use crate::error::{PortalError, PortalResult};
use crate::types::{Cell, CellValue, RawRow};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::io::BufReader;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Reads worksheets of an .xlsx file as positional grids.
pub struct WorkbookImporter {
    path: PathBuf,
}

impl WorkbookImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> PortalResult<Xlsx<BufReader<File>>> {
        open_workbook(&self.path).map_err(|e| {
            PortalError::Storage(format!(
                "Failed to open Excel file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Read a single worksheet.
    pub fn import_sheet(&self, sheet_name: &str) -> PortalResult<Vec<RawRow>> {
        let mut workbook = self.open()?;

        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(PortalError::NotFound(format!(
                "sheet '{}' in {}",
                sheet_name,
                self.path.display()
            )));
        }

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| PortalError::Storage(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;
        Ok(grid_from_range(&range))
    }

    /// Read every worksheet, in workbook order.
    pub fn import_all(&self) -> PortalResult<Vec<SheetGrid>> {
        let mut workbook = self.open()?;
        let sheet_names = workbook.sheet_names().to_vec();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                PortalError::Storage(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            let rows = grid_from_range(&range);
            sheets.push(SheetGrid::new(sheet_name, rows));
        }

        Ok(sheets)
    }
}

/// Convert a calamine range into rows anchored at A1.
///
/// calamine trims the range to the used area, so leading blank rows and
/// columns are restored from `range.start()` to keep positions absolute.
fn grid_from_range(range: &Range<Data>) -> Vec<RawRow> {
    if range.is_empty() {
        return Vec::new();
    }

    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
    let mut grid: Vec<RawRow> = vec![Vec::new(); row_offset as usize];

    for cells in range.rows() {
        let mut row: RawRow = vec![None; col_offset as usize];
        row.extend(cells.iter().map(convert_cell));
        while matches!(row.last(), Some(None)) {
            row.pop();
        }
        grid.push(row);
    }

    grid
}

/// Convert one calamine cell.
fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Int(*i)),
        Data::Float(f) => {
            // xlsx stores every number as a double
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(CellValue::Int(*f as i64))
            } else {
                Some(CellValue::Float(*f))
            }
        }
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::Error(_) => None,
        other => Some(CellValue::Text(other.to_string())),
    }
}
