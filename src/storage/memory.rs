use super::TabularStore;
use crate::collections::CollectionRegistry;
use crate::error::{PortalError, PortalResult};
use crate::types::RawRow;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process store, used by tests and `serve --in-memory`.
///
/// The mutex guards single loads and saves only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: Mutex<HashMap<String, Vec<RawRow>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the seed header block of every collection.
    pub fn seeded(registry: &CollectionRegistry) -> Self {
        let store = Self::new();
        {
            let mut sheets = store.sheets.lock().unwrap_or_else(|e| e.into_inner());
            for spec in registry.iter() {
                sheets.insert(spec.sheet.clone(), spec.seed_header());
            }
        }
        store
    }

    pub fn with_sheet(self, name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.sheets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.into(), rows);
        self
    }

    fn lock(&self) -> PortalResult<MutexGuard<'_, HashMap<String, Vec<RawRow>>>> {
        self.sheets
            .lock()
            .map_err(|_| PortalError::Storage("memory store lock poisoned".to_string()))
    }
}

impl TabularStore for MemoryStore {
    fn load(&self, sheet: &str) -> PortalResult<Vec<RawRow>> {
        self.lock()?
            .get(sheet)
            .cloned()
            .ok_or_else(|| PortalError::NotFound(format!("sheet '{}'", sheet)))
    }

    fn save(&self, sheet: &str, rows: &[RawRow]) -> PortalResult<()> {
        self.lock()?.insert(sheet.to_string(), rows.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
