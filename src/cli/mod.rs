//! CLI command handlers

pub mod commands;

pub use commands::{add, collections, ensure_workbook, export, init, list, serve, StoreOptions};
