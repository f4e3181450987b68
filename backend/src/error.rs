//! API error type mapped to `{"detail": ...}` response bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors surfaced to HTTP clients. The frontend reads the `detail` field of
/// the body, so every variant renders to a human-readable sentence.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request is missing a required part (form field, file contents).
    #[error("{0}")]
    BadRequest(String),

    /// Uploaded data could not be parsed or stored.
    #[error("Error processing file: {0}")]
    Processing(String),

    /// The uploaded file exceeds the size cap.
    #[error("File exceeds the upload limit of {0} bytes")]
    TooLarge(usize),

    /// The language model could not be reached or produced no output.
    #[error("Query translation failed: {0}")]
    Translation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Translation(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
