//! Tabular storage providers
//!
//! A store hands out a whole worksheet grid and takes a whole replacement
//! grid back. Nothing here coordinates writers: two read-modify-write cycles
//! on the same sheet can interleave and the later `save` wins.

mod memory;
mod xlsx;

pub use memory::MemoryStore;
pub use xlsx::XlsxStore;

use crate::error::PortalResult;
use crate::types::RawRow;

/// Whole-grid load/save for named sheets.
pub trait TabularStore: Send + Sync {
    /// Load every row of `sheet`, header block included.
    ///
    /// A sheet that does not exist is [`crate::error::PortalError::NotFound`].
    fn load(&self, sheet: &str) -> PortalResult<Vec<RawRow>>;

    /// Replace every row of `sheet`, creating it if needed.
    fn save(&self, sheet: &str, rows: &[RawRow]) -> PortalResult<()>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}
