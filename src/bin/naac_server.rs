//! NAAC Portal API Server binary
//!
//! HTTP REST API for the portal frontend.
//! Provides collection listing, record listing and header-preserving inserts.

use clap::Parser;
use naac_portal::api::{run_api_server, ApiConfig};
use naac_portal::cli::ensure_workbook;
use naac_portal::config::PortalConfig;
use naac_portal::service::RecordService;
use naac_portal::storage::XlsxStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "naac-server")]
#[command(version)]
#[command(about = "NAAC Portal API Server - HTTP REST API for spreadsheet-backed records")]
#[command(long_about = r#"
NAAC Portal API Server

Endpoints:
  - GET  /api/v1/collections      - Configured collections
  - GET  /api/v1/collections/:id  - Records of a collection, newest first
  - POST /api/v1/collections/:id  - Add a record below the header block

Additional endpoints:
  - GET  /health                  - Health check
  - GET  /version                 - Server version info
  - GET  /                        - API documentation

Example usage:
  naac-server                                # localhost:8080, ./naac.xlsx
  naac-server --host 0.0.0.0 --port 3000 --workbook data/naac.xlsx

  curl -X POST http://localhost:8080/api/v1/collections/awards \
    -H "Content-Type: application/json" \
    -d '{"year": "2021", "title": "New Award", "awardeeName": "A. Smith"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "NAAC_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "NAAC_PORT")]
    port: Option<u16>,

    /// Workbook path
    #[arg(short, long, env = "NAAC_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// Portal configuration file (YAML)
    #[arg(short, long, env = "NAAC_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut portal = PortalConfig::load_or_default(args.config.as_deref())?;
    if let Some(workbook) = args.workbook {
        portal.workbook = workbook;
    }
    let registry = portal.registry()?;
    ensure_workbook(&portal.workbook, &registry)?;

    let config = ApiConfig {
        host: args.host.unwrap_or(portal.host),
        port: args.port.unwrap_or(portal.port),
    };
    let service = RecordService::new(Arc::new(XlsxStore::new(&portal.workbook)), registry);

    run_api_server(config, service).await
}
