//! Record service: the read and read-modify-write cycles per collection.

use crate::collections::{CollectionRegistry, CollectionSpec};
use crate::error::{PortalError, PortalResult};
use crate::mapper::read_row;
use crate::storage::TabularStore;
use crate::types::{CellValue, RawRow, Record};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

const FLAG_YES: &str = "Yes";
const FLAG_NO: &str = "No";

/// Result of a successful insert.
#[derive(Debug, Clone, Serialize)]
pub struct InsertOutcome {
    pub collection: String,
    /// The record as stored, one entry per field
    pub record: Record,
    /// The full grid written back, header block included
    pub rows: Vec<RawRow>,
}

#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn TabularStore>,
    registry: CollectionRegistry,
}

impl RecordService {
    pub fn new(store: Arc<dyn TabularStore>, registry: CollectionRegistry) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn TabularStore {
        self.store.as_ref()
    }

    /// All records of a collection, newest first (storage order).
    pub fn list(&self, collection: &str) -> PortalResult<Vec<Record>> {
        let spec = self.registry.get(collection)?;
        let rows = self.load_sheet(spec)?;
        let records = spec.dataset(rows)?.read_records();

        debug!(collection, records = records.len(), "listed records");
        Ok(records)
    }

    /// Load a collection's sheet. A sheet the store does not hold yet reads
    /// as the seed header block; the first insert creates it.
    fn load_sheet(&self, spec: &CollectionSpec) -> PortalResult<Vec<RawRow>> {
        match self.store.load(&spec.sheet) {
            Err(PortalError::NotFound(_)) => {
                debug!(sheet = %spec.sheet, "sheet not in store, using seed header");
                Ok(spec.seed_header())
            }
            other => other,
        }
    }

    /// Insert a submitted JSON object as the first data row of a collection.
    ///
    /// Load, splice and save run with no lock between them.
    pub fn insert(&self, collection: &str, body: &serde_json::Value) -> PortalResult<InsertOutcome> {
        let spec = self.registry.get(collection)?;
        let record = prepare_record(spec, body)?;

        let rows = self.load_sheet(spec)?;
        let updated = spec.dataset(rows)?.insert_record(&record);

        let stored = updated
            .data_rows()
            .first()
            .map(|row| read_row(updated.field_order(), row))
            .unwrap_or_default();

        self.store.save(&spec.sheet, updated.rows())?;
        info!(
            collection,
            sheet = %spec.sheet,
            rows = updated.rows().len(),
            "record added at the top"
        );

        Ok(InsertOutcome {
            collection: spec.id.clone(),
            record: stored,
            rows: updated.into_rows(),
        })
    }
}

/// Turn a submitted JSON object into a record for `spec`.
///
/// Flag fields become "Yes"/"No" (absent counts as "No"). Required fields
/// must be present and non-blank. Keys outside the field list are kept here
/// and dropped when the record is flattened.
fn prepare_record(spec: &CollectionSpec, body: &serde_json::Value) -> PortalResult<Record> {
    let object = body.as_object().ok_or_else(|| {
        PortalError::Validation("record body must be a JSON object".to_string())
    })?;

    let mut record = Record::new();
    for (field, value) in object {
        let converted = if spec.is_flag(field) {
            flag_value(value).map(Some)
        } else {
            CellValue::from_json(value)
        };
        let cell = converted.map_err(|e| match e {
            PortalError::Validation(msg) => {
                PortalError::Validation(format!("field '{}': {}", field, msg))
            }
            other => other,
        })?;
        if let Some(cell) = cell {
            record.insert(field.clone(), cell);
        }
    }

    for flag in &spec.flags {
        if !record.contains(flag) {
            record.insert(flag.clone(), CellValue::from(FLAG_NO));
        }
    }

    let missing: Vec<&str> = spec
        .required
        .iter()
        .filter(|f| record.get(f).map_or(true, CellValue::is_blank))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(PortalError::Validation(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }

    Ok(record)
}

fn flag_value(value: &serde_json::Value) -> PortalResult<CellValue> {
    use serde_json::Value;

    let yes = match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s.eq_ignore_ascii_case("no") || s.eq_ignore_ascii_case("false"))
        }
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::Array(_) | Value::Object(_) => {
            return Err(PortalError::Validation(
                "flag values must be booleans, numbers or strings".to_string(),
            ))
        }
    };
    Ok(CellValue::from(if yes { FLAG_YES } else { FLAG_NO }))
}
