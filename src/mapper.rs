//! Tabular record mapper
//!
//! Converts between a header-prefixed grid of raw rows (how a worksheet stores
//! a collection) and named-field [`Record`]s (how the API exposes it).
//!
//! - Read: drop the header block, zip each data row against the field order.
//! - Insert: flatten the record through the field order and splice it in as
//!   the first data row, directly below the header block.
//!
//! Both operations are pure; loading and saving the grid is the job of a
//! [`crate::storage::TabularStore`].

use crate::error::{PortalError, PortalResult};
use crate::types::{CellValue, RawRow, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One logical record collection as stored in a worksheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularDataset {
    header_row_count: usize,
    field_order: Vec<String>,
    rows: Vec<RawRow>,
}

impl TabularDataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Decode a loosely typed grid document:
    /// `{"headerRowCount": 3, "fieldOrder": [...], "rows": [[...], ...]}`.
    ///
    /// `headerRowCount` defaults to 0; a missing `fieldOrder` or `rows` is an
    /// [`PortalError::InvalidDataset`].
    pub fn from_json(value: serde_json::Value) -> PortalResult<Self> {
        let doc: DatasetDocument = serde_json::from_value(value)?;

        let mut builder = Self::builder().header_rows(doc.header_row_count);
        if let Some(fields) = doc.field_order {
            builder = builder.fields(fields);
        }
        if let Some(rows) = doc.rows {
            builder = builder.rows(rows);
        }
        builder.build()
    }

    pub fn header_row_count(&self) -> usize {
        self.header_row_count
    }

    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<RawRow> {
        self.rows
    }

    /// The leading rows that hold titles and captions.
    ///
    /// Shorter than `header_row_count` when the grid itself is shorter.
    pub fn header(&self) -> &[RawRow] {
        &self.rows[..self.split_point()]
    }

    /// Every row after the header block.
    pub fn data_rows(&self) -> &[RawRow] {
        &self.rows[self.split_point()..]
    }

    fn split_point(&self) -> usize {
        self.header_row_count.min(self.rows.len())
    }

    /// Map each data row to a record, in row order.
    ///
    /// Cells that are absent or past the end of a short row become `""`, so
    /// every record carries every field in `field_order`.
    pub fn read_records(&self) -> Vec<Record> {
        self.data_rows()
            .iter()
            .map(|row| read_row(&self.field_order, row))
            .collect()
    }

    /// Return a new dataset with `record` inserted as the first data row.
    ///
    /// The header block is carried over untouched and existing data rows keep
    /// their relative order. No uniqueness or concurrency checks happen here.
    pub fn insert_record(&self, record: &Record) -> TabularDataset {
        let split = self.split_point();
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.extend_from_slice(&self.rows[..split]);
        rows.push(flatten_record(&self.field_order, record));
        rows.extend_from_slice(&self.rows[split..]);

        TabularDataset {
            header_row_count: self.header_row_count,
            field_order: self.field_order.clone(),
            rows,
        }
    }
}

/// Project a record onto a raw row through `field_order`.
///
/// Missing keys become `""`; keys outside `field_order` are dropped.
pub fn flatten_record(field_order: &[String], record: &Record) -> RawRow {
    field_order
        .iter()
        .map(|field| Some(record.get(field).cloned().unwrap_or_else(CellValue::empty)))
        .collect()
}

/// Zip one raw row against `field_order`, defaulting missing cells to `""`.
pub fn read_row(field_order: &[String], row: &RawRow) -> Record {
    field_order
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let value = row
                .get(idx)
                .cloned()
                .flatten()
                .unwrap_or_else(CellValue::empty);
            (field.clone(), value)
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetDocument {
    #[serde(default)]
    header_row_count: usize,
    field_order: Option<Vec<String>>,
    rows: Option<Vec<RawRow>>,
}

/// Builder for [`TabularDataset`]; both `fields` and `rows` must be supplied.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    header_rows: usize,
    fields: Option<Vec<String>>,
    rows: Option<Vec<RawRow>>,
}

impl DatasetBuilder {
    pub fn header_rows(mut self, count: usize) -> Self {
        self.header_rows = count;
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn rows(mut self, rows: Vec<RawRow>) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn build(self) -> PortalResult<TabularDataset> {
        let field_order = self
            .fields
            .ok_or_else(|| PortalError::InvalidDataset("field order is missing".to_string()))?;
        let rows = self
            .rows
            .ok_or_else(|| PortalError::InvalidDataset("rows are missing".to_string()))?;

        let mut seen = HashSet::new();
        if let Some(dup) = field_order.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(PortalError::InvalidDataset(format!(
                "field '{}' appears more than once in the field order",
                dup
            )));
        }

        Ok(TabularDataset {
            header_row_count: self.header_rows,
            field_order,
            rows,
        })
    }
}
