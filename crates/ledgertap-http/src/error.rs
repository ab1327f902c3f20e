//! Client-visible API errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Generic message returned when digest retrieval fails. The underlying
/// cause is logged, never exposed.
pub const DIGEST_FAILURE_MESSAGE: &str =
    "Something went wrong and no digest was produced, check the logs for more info";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("You must send a content-type header of application/json")]
    NotJsonContentType,

    #[error("Request body must be a valid JSON object")]
    InvalidBody,

    #[error("{0}")]
    CommitFailed(String),

    #[error("{DIGEST_FAILURE_MESSAGE}")]
    DigestUnavailable,
}

/// Error response body: always a single `message` field.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotJsonContentType | ApiError::InvalidBody | ApiError::CommitFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::DigestUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
