use super::TabularStore;
use crate::collections::CollectionRegistry;
use crate::error::{PortalError, PortalResult};
use crate::excel::{SheetGrid, WorkbookExporter, WorkbookImporter};
use crate::types::RawRow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::debug;

/// A single .xlsx workbook on disk, one worksheet per collection.
///
/// Saving rewrites the whole workbook: every sheet is read back and written
/// out again with the target sheet replaced. Cell values survive; styling
/// and formulas of untouched sheets do not.
///
/// Saves through one store (and its clones) are serialised, so saves to
/// different sheets never drop each other's rows. The lock spans a single
/// `save`, not a caller's load/modify/save cycle.
#[derive(Debug, Clone)]
pub struct XlsxStore {
    path: PathBuf,
    save_lock: Arc<Mutex<()>>,
}

impl XlsxStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a workbook holding the seed header block of every collection.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub fn init<P: AsRef<Path>>(
        path: P,
        registry: &CollectionRegistry,
        force: bool,
    ) -> PortalResult<Self> {
        let store = Self::new(path);
        if store.path.exists() && !force {
            return Err(PortalError::Storage(format!(
                "{} already exists (use --force to overwrite)",
                store.path.display()
            )));
        }

        let sheets = registry
            .iter()
            .map(|spec| SheetGrid::new(spec.sheet.clone(), spec.seed_header()))
            .collect();
        store.write_atomically(sheets)?;
        Ok(store)
    }

    /// Write to a uniquely named temp file next to the workbook, then
    /// rename it over the workbook.
    fn write_atomically(&self, sheets: Vec<SheetGrid>) -> PortalResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir)?;
        WorkbookExporter::new(sheets).export(tmp.path())?;
        tmp.persist(&self.path).map_err(|e| PortalError::Io(e.error))?;
        Ok(())
    }
}

impl TabularStore for XlsxStore {
    fn load(&self, sheet: &str) -> PortalResult<Vec<RawRow>> {
        let rows = WorkbookImporter::new(&self.path).import_sheet(sheet)?;
        debug!(sheet, rows = rows.len(), "loaded worksheet");
        Ok(rows)
    }

    fn save(&self, sheet: &str, rows: &[RawRow]) -> PortalResult<()> {
        let _guard = self
            .save_lock
            .lock()
            .map_err(|_| PortalError::Storage("workbook save lock poisoned".to_string()))?;

        let mut sheets = if self.path.exists() {
            WorkbookImporter::new(&self.path).import_all()?
        } else {
            Vec::new()
        };

        match sheets.iter_mut().find(|s| s.name == sheet) {
            Some(existing) => existing.rows = rows.to_vec(),
            None => sheets.push(SheetGrid::new(sheet, rows.to_vec())),
        }

        self.write_atomically(sheets)?;
        debug!(sheet, rows = rows.len(), "saved worksheet");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("xlsx workbook {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{text_row, CellValue};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("naac.xlsx");
        let registry = CollectionRegistry::builtin();

        XlsxStore::init(&path, &registry, false).unwrap();
        assert!(XlsxStore::init(&path, &registry, false).is_err());
        assert!(XlsxStore::init(&path, &registry, true).is_ok());
    }

    #[test]
    fn test_init_seeds_all_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("naac.xlsx");
        let registry = CollectionRegistry::builtin();
        let store = XlsxStore::init(&path, &registry, false).unwrap();

        for spec in registry.iter() {
            let rows = store.load(&spec.sheet).unwrap();
            assert_eq!(rows, spec.seed_header(), "sheet {}", spec.sheet);
        }
    }

    #[test]
    fn test_save_creates_and_preserves_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let store = XlsxStore::new(temp_dir.path().join("fresh.xlsx"));

        store.save("a", &[text_row(&["alpha"])]).unwrap();
        store.save("b", &[text_row(&["beta"])]).unwrap();
        store
            .save("a", &[text_row(&["alpha"]), vec![Some(CellValue::Int(1))]])
            .unwrap();

        assert_eq!(
            store.load("a").unwrap(),
            vec![text_row(&["alpha"]), vec![Some(CellValue::Int(1))]]
        );
        assert_eq!(store.load("b").unwrap(), vec![text_row(&["beta"])]);
        let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "only the workbook should remain");
    }

    #[test]
    fn test_parallel_saves_to_different_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let store = XlsxStore::new(temp_dir.path().join("shared.xlsx"));
        store.save("a", &[text_row(&["alpha"])]).unwrap();
        store.save("b", &[text_row(&["beta"])]).unwrap();

        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|sheet| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        let rows = vec![text_row(&[sheet]), vec![Some(CellValue::Int(i))]];
                        store.save(sheet, &rows).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            store.load("a").unwrap(),
            vec![text_row(&["a"]), vec![Some(CellValue::Int(9))]]
        );
        assert_eq!(
            store.load("b").unwrap(),
            vec![text_row(&["b"]), vec![Some(CellValue::Int(9))]]
        );
    }

    #[test]
    fn test_load_unknown_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let store = XlsxStore::new(temp_dir.path().join("x.xlsx"));
        store.save("a", &[text_row(&["alpha"])]).unwrap();
        assert!(matches!(store.load("zzz"), Err(PortalError::NotFound(_))));
    }
}
