//! # Request Dispatch
//!
//! Maps the HTTP method of a `/system/secrets` request onto exactly one store
//! operation. Methods outside the closed set are rejected with 400 before any
//! decoding or filesystem work. A query string that does not parse is reported
//! through the same JSON error body as every other failure.

use super::error::error_response;
use super::AppState;
use crate::observability::metrics;
use crate::secrets::{Secret, SecretStore, SecretStoreError};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Store operation selected by the request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretOperation {
    List,
    Create,
    Delete,
}

impl SecretOperation {
    /// `GET` lists, `POST` and `PUT` both upsert, `DELETE` removes
    pub fn from_method(method: &Method) -> Option<Self> {
        match method {
            &Method::GET => Some(Self::List),
            &Method::POST | &Method::PUT => Some(Self::Create),
            &Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

/// `?namespace=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct SecretQuery {
    pub namespace: Option<String>,
}

pub(super) async fn handle_secrets(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let Some(operation) = SecretOperation::from_method(&method) else {
        warn!(%method, "rejecting unsupported method on secrets endpoint");
        return error_response(
            StatusCode::BAD_REQUEST,
            "unsupported_method",
            format!("method {method} is not supported"),
        );
    };

    let started = Instant::now();
    metrics::increment_requests(operation.as_str());
    let result = dispatch(&state.store, operation, &uri, &body).await;
    metrics::observe_request_duration(operation.as_str(), started.elapsed().as_secs_f64());

    match result {
        Ok(response) => response,
        Err(e) => {
            if e.is_client_error() {
                warn!(operation = operation.as_str(), reason = e.reason(), error = %e, "secret request rejected");
            } else {
                error!(operation = operation.as_str(), reason = e.reason(), error = %e, "secret request failed");
            }
            metrics::increment_request_errors(operation.as_str(), e.reason());
            e.into_response()
        }
    }
}

/// `?namespace=` from the request URI; a missing query string is an empty query
fn parse_query(uri: &Uri) -> Result<SecretQuery, SecretStoreError> {
    Query::<SecretQuery>::try_from_uri(uri)
        .map(|Query(query)| query)
        .map_err(|rejection| SecretStoreError::InvalidQuery(rejection.body_text()))
}

async fn dispatch(
    store: &SecretStore,
    operation: SecretOperation,
    uri: &Uri,
    body: &[u8],
) -> Result<Response, SecretStoreError> {
    let query = parse_query(uri)?;
    match operation {
        SecretOperation::List => {
            let secrets = store.list(query.namespace.as_deref()).await?;
            debug!(count = secrets.len(), "listed secrets");
            Ok(Json(secrets).into_response())
        }
        SecretOperation::Create => {
            let secret = Secret::from_json(body)?;
            store.create(&secret).await?;
            Ok(StatusCode::OK.into_response())
        }
        SecretOperation::Delete => {
            let mut secret = Secret::from_json(body)?;
            if secret.namespace.is_none() {
                secret.namespace = query.namespace;
            }
            store.delete(&secret).await?;
            Ok(StatusCode::OK.into_response())
        }
    }
}
