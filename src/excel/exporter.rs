//! Workbook exporter - raw row grids → Excel (.xlsx)

use super::SheetGrid;
use crate::error::{PortalError, PortalResult};
use crate::types::{Cell, CellValue};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Writes a set of sheet grids as a fresh workbook.
pub struct WorkbookExporter {
    sheets: Vec<SheetGrid>,
}

impl WorkbookExporter {
    pub fn new(sheets: Vec<SheetGrid>) -> Self {
        Self { sheets }
    }

    /// Write all sheets, in order, to `output_path`.
    pub fn export(&self, output_path: &Path) -> PortalResult<()> {
        let mut workbook = Workbook::new();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name).map_err(|e| {
                PortalError::Storage(format!(
                    "Failed to set worksheet name '{}': {}",
                    sheet.name, e
                ))
            })?;

            for (row_idx, row) in sheet.rows.iter().enumerate() {
                for (col_idx, cell) in row.iter().enumerate() {
                    Self::write_cell(worksheet, row_idx as u32, col_idx as u16, cell)?;
                }
            }
        }

        workbook
            .save(output_path)
            .map_err(|e| PortalError::Storage(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    /// Write a single cell; absent cells are left blank.
    fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> PortalResult<()> {
        let result = match cell {
            None => return Ok(()),
            Some(CellValue::Text(s)) if s.is_empty() => return Ok(()),
            Some(CellValue::Text(s)) => worksheet.write_string(row, col, s).map(|_| ()),
            Some(CellValue::Int(i)) => worksheet.write_number(row, col, *i as f64).map(|_| ()),
            Some(CellValue::Float(f)) => worksheet.write_number(row, col, *f).map(|_| ()),
            Some(CellValue::Bool(b)) => worksheet.write_boolean(row, col, *b).map(|_| ()),
        };

        result.map_err(|e| {
            PortalError::Storage(format!(
                "Failed to write cell ({}, {}): {}",
                row, col, e
            ))
        })
    }
}
