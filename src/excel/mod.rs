//! Excel workbook access for the xlsx storage backend
//!
//! - Import: worksheet (.xlsx) → raw row grid, via calamine
//! - Export: raw row grids → workbook (.xlsx), via rust_xlsxwriter
//!
//! Both sides work on whole sheets; there are no partial-row updates.

mod exporter;
mod importer;

pub use exporter::WorkbookExporter;
pub use importer::WorkbookImporter;

use crate::types::RawRow;

/// One worksheet's name and its full cell grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<RawRow>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}
