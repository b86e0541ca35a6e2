//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::server::AppState;
use crate::error::{PortalError, PortalResult};
use crate::service::RecordService;
use crate::types::{RawRow, Record};

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A [`PortalError`] rendered as an HTTP error response.
#[derive(Debug)]
pub struct ApiError(pub PortalError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::warn!("request rejected: {}", self.0);
        } else {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(ApiResponse::<()>::err(self.0.to_string()))).into_response()
    }
}

/// Run a service call on the blocking pool; stores do synchronous file I/O.
async fn run_blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&RecordService) -> PortalResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.service))
        .await
        .map_err(|e| ApiError(PortalError::Storage(format!("storage task failed: {}", e))))?
        .map_err(ApiError::from)
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "NAAC Portal API".to_string(),
        version: state.version.clone(),
        description: "Research output and department activity records".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new("/api/v1/collections", "GET", "List configured collections"),
            EndpointInfo::new("/api/v1/collections/:id", "GET", "List records of a collection"),
            EndpointInfo::new(
                "/api/v1/collections/:id",
                "POST",
                "Add a record at the top of a collection",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub collections: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        collections: state
            .service
            .registry()
            .iter()
            .map(|s| s.id.clone())
            .collect(),
    }))
}

/// One entry of the collection listing
#[derive(Serialize)]
pub struct CollectionSummary {
    pub id: String,
    pub title: String,
    pub sheet: String,
    pub header_rows: usize,
    pub fields: Vec<String>,
    pub required: Vec<String>,
}

/// GET /api/v1/collections - Configured collections
pub async fn list_collections(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summaries: Vec<CollectionSummary> = state
        .service
        .registry()
        .iter()
        .map(|spec| CollectionSummary {
            id: spec.id.clone(),
            title: spec.title.clone(),
            sheet: spec.sheet.clone(),
            header_rows: spec.header_rows,
            fields: spec.fields.clone(),
            required: spec.required.clone(),
        })
        .collect();
    Json(ApiResponse::ok(summaries))
}

/// GET /api/v1/collections/:id - Records, newest first
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let records = run_blocking(state, move |service| service.list(&id)).await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// Insert response
#[derive(Serialize)]
pub struct InsertResponse {
    pub message: String,
    pub record: Record,
    pub updated_data: Vec<RawRow>,
}

/// POST /api/v1/collections/:id - Add a record below the header block
pub async fn insert_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError(PortalError::Validation(e.body_text())))?;
    let outcome = run_blocking(state, move |service| service.insert(&id, &body)).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(InsertResponse {
            message: "Data successfully added at the top".to_string(),
            record: outcome.record,
            updated_data: outcome.rows,
        })),
    ))
}
