//! Route handlers for the submission surface.

use crate::config::Config;
use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use ledgertap_ledger::{Digest, LedgerService};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn LedgerService>, config: Config) -> Self {
        Self {
            ledger,
            config: Arc::new(config),
        }
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/documents", post(submit_document))
        .route("/digest", get(get_digest))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /documents` — commit one JSON document to the configured table.
///
/// The body is read raw rather than through the `Json` extractor so the
/// content-type and parse failures produce the documented `{message}`
/// responses instead of axum's defaults.
async fn submit_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    debug!(?headers, "Document submission request");

    if !is_json_content_type(&headers) {
        return Err(ApiError::NotJsonContentType);
    }

    let document: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Submitted body was not valid JSON");
        ApiError::InvalidBody
    })?;
    if !document.is_object() {
        return Err(ApiError::InvalidBody);
    }

    debug!(%document, "Parsed submitted document");

    state
        .ledger
        .insert_document(&state.config.table, &document)
        .await
        .map_err(|e| {
            error!(error = %e, table = %state.config.table, "Ledger commit failed");
            ApiError::CommitFailed(e.to_string())
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /digest` — current digest of the configured ledger.
async fn get_digest(State(state): State<AppState>) -> Result<Json<Digest>, ApiError> {
    let digest = state
        .ledger
        .get_digest(&state.config.ledger)
        .await
        .map_err(|e| {
            error!(error = %e, ledger = %state.config.ledger, "Digest retrieval failed");
            ApiError::DigestUnavailable
        })?;

    Ok(Json(digest))
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}
