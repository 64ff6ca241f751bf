// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HTTP routes and handlers for the export endpoints.
//!
//! - `GET /get-schema/` - JSON schema metadata
//! - `GET /get-data/` - binary snapshot of the record
//! - `GET /health` - liveness and updater progress
//!
//! Any other method on the export endpoints gets `404 Invalid Invocation`
//! without touching the record or its lock.

use crate::export::{ExportError, ExportService};
use crate::updater::UpdaterHandle;
use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use livestruct_schema::Record;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

pub const SCHEMA_PATH: &str = "/get-schema/";
pub const DATA_PATH: &str = "/get-data/";
pub const HEALTH_PATH: &str = "/health";

/// Shared application state.
pub struct AppState<R> {
    service: ExportService<R>,
    updater: Option<UpdaterHandle>,
}

impl<R: Record> AppState<R> {
    /// State serving `service`, with no updater attached.
    pub fn new(service: ExportService<R>) -> Self {
        Self {
            service,
            updater: None,
        }
    }

    /// Report progress of a background updater on `/health`.
    pub fn with_updater(mut self, updater: UpdaterHandle) -> Self {
        self.updater = Some(updater);
        self
    }

    /// The export service behind the endpoints.
    pub fn service(&self) -> &ExportService<R> {
        &self.service
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MethodNotAllowed => StatusCode::NOT_FOUND,
            Self::SchemaSerialization(_) | Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Build the export router with CORS and request tracing.
pub fn router<R>(state: Arc<AppState<R>>) -> Router
where
    R: Record + Send + 'static,
{
    Router::new()
        .route(
            SCHEMA_PATH,
            get(get_schema::<R>).fallback(invalid_invocation),
        )
        .route(
            "/get-schema",
            get(get_schema::<R>).fallback(invalid_invocation),
        )
        .route(DATA_PATH, get(get_data::<R>).fallback(invalid_invocation))
        .route("/get-data", get(get_data::<R>).fallback(invalid_invocation))
        .route(HEALTH_PATH, get(health::<R>))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /get-schema/
async fn get_schema<R>(
    method: Method,
    uri: Uri,
    State(state): State<Arc<AppState<R>>>,
) -> Result<Response, ExportError>
where
    R: Record + Send + 'static,
{
    require_get(&method, &uri)?;
    let bytes = state.service.schema_metadata().inspect_err(|e| {
        error!("Schema request failed: {}", e);
    })?;
    debug!("Returned schema ({} bytes)", bytes.len());

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        bytes,
    )
        .into_response())
}

/// GET /get-data/
async fn get_data<R>(
    method: Method,
    uri: Uri,
    State(state): State<Arc<AppState<R>>>,
) -> Result<Response, ExportError>
where
    R: Record + Send + 'static,
{
    require_get(&method, &uri)?;
    // Lock is taken and released inside encode_current; the body is
    // written afterwards.
    let bytes = state.service.encode_current().inspect_err(|e| {
        error!("Data request failed: {}", e);
    })?;
    debug!("Returned data ({} bytes)", bytes.len());

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}

/// GET /health
async fn health<R>(State(state): State<Arc<AppState<R>>>) -> Response
where
    R: Record + Send + 'static,
{
    let updates = state.updater.as_ref().map(UpdaterHandle::generation);
    let updater_running = state.updater.as_ref().is_some_and(UpdaterHandle::is_running);

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "record": state.service.schema().descriptor().name,
        "updates": updates,
        "updater_running": updater_running,
    }))
    .into_response()
}

/// `get()` also routes HEAD; only a real GET may reach the record.
fn require_get(method: &Method, uri: &Uri) -> Result<(), ExportError> {
    if *method == Method::GET {
        Ok(())
    } else {
        warn!("Rejected {} {}", method, uri.path());
        Err(ExportError::MethodNotAllowed)
    }
}

async fn invalid_invocation(method: Method, uri: Uri) -> ExportError {
    warn!("Rejected {} {}", method, uri.path());
    ExportError::MethodNotAllowed
}
