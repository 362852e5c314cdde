//! HTTP error mapping
//!
//! Failures surface as JSON bodies carrying an `ok` flag so fetch
//! callers can branch without sniffing status text. Storage and IO
//! details stay in the log, not the response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::Error;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Error::Storage(e) => {
                tracing::error!("storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Error::Io(e) => {
                tracing::error!("io error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}
