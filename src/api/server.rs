//! NAAC Portal API server implementation
//!
//! HTTP REST API server using Axum. Serves record listing and header-preserving
//! inserts for every configured collection.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::service::RecordService;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub service: RecordService,
}

impl AppState {
    pub fn new(service: RecordService) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            service,
        }
    }
}

/// Install the global tracing subscriber; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "naac_portal=info,naac_server=info,tower_http=info".into()),
        )
        .try_init();
}

/// Build the router with all routes and layers.
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Collection endpoints
        .route("/api/v1/collections", get(handlers::list_collections))
        .route(
            "/api/v1/collections/:id",
            get(handlers::list_records).post(handlers::insert_record),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, service: RecordService) -> anyhow::Result<()> {
    init_tracing();

    let store = service.store().describe();
    let collections = service.registry().len();
    let app = router(Arc::new(AppState::new(service)));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("NAAC Portal API starting on http://{}", addr);
    info!("   Storage: {} ({} collections)", store, collections);
    info!("   Endpoints: /api/v1/collections, /api/v1/collections/:id");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("NAAC Portal API shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
