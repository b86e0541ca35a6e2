//! NAAC Portal - spreadsheet-backed record store
//!
//! Research output (journals, conferences, patents, grants, awards) and
//! department activity records are kept in worksheets, one per collection.
//! Every worksheet opens with a header block of titles and captions; data rows
//! follow it, newest first.
//!
//! # Features
//!
//! - One generic mapper between positional rows and named records
//! - Header-preserving inserts (new rows go directly below the header block)
//! - Per-collection configuration, built in or loaded from YAML
//! - xlsx workbook storage (calamine / rust_xlsxwriter) and an in-memory store
//! - HTTP API and CLI
//!
//! # Example
//!
//! ```
//! use naac_portal::mapper::TabularDataset;
//! use naac_portal::types::{text_row, Record};
//!
//! let dataset = TabularDataset::builder()
//!     .header_rows(1)
//!     .fields(["year", "title"])
//!     .rows(vec![text_row(&["Year", "Title"]), text_row(&["2020", "Best Paper"])])
//!     .build()?;
//!
//! let updated = dataset.insert_record(&Record::new().with("year", "2021").with("title", "New Award"));
//! let records = updated.read_records();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].get("title").unwrap().to_string(), "New Award");
//! # Ok::<(), naac_portal::error::PortalError>(())
//! ```

pub mod api;
pub mod cli;
pub mod collections;
pub mod config;
pub mod error;
pub mod excel;
pub mod mapper;
pub mod service;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use collections::{CollectionRegistry, CollectionSpec};
pub use error::{PortalError, PortalResult};
pub use mapper::TabularDataset;
pub use types::{CellValue, RawRow, Record};
