//! # Error Responses
//!
//! Every failed request gets a status code and a JSON body:
//! `{"error": "<reason>", "message": "<detail>"}`.

use crate::secrets::SecretStoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Build an error response from parts
pub fn error_response(status: StatusCode, error: &str, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
        .into_response()
}

/// HTTP status for a store error: 400 when the caller is at fault, 500 otherwise
pub fn status_code(err: &SecretStoreError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for SecretStoreError {
    fn into_response(self) -> Response {
        error_response(status_code(&self), self.reason(), self.to_string())
    }
}
