//! NAAC Portal API Server module
//!
//! Provides the HTTP REST API consumed by the portal frontend.
//! Run with `naac serve` or `naac-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
