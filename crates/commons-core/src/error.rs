use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::validation::FieldErrors;

/// JSON error envelope returned by every Commons service.
///
/// ```json
/// { "kind": "VALIDATION_FAILED", "message": "validation failed", "details": [...] }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a FieldErrors>,
}

/// Implemented by each service's error enum to share one rendering path.
pub trait ServiceError: std::error::Error {
    fn kind(&self) -> &'static str;
    fn status(&self) -> StatusCode;

    fn details(&self) -> Option<&FieldErrors> {
        None
    }

    /// Root cause for 5xx logging.
    fn source_chain(&self) -> Option<&anyhow::Error> {
        None
    }
}

/// Render a [`ServiceError`] into a JSON response.
///
/// Only 5xx are logged; tower-http `TraceLayer` already records method/uri/status
/// for every request.
pub fn render<E: ServiceError>(error: &E) -> Response {
    let status = error.status();
    if status.is_server_error() {
        let chain = error
            .source_chain()
            .map(|cause| format!("{cause:#}"))
            .unwrap_or_default();
        ::tracing::error!(error = %chain, kind = error.kind(), "request failed");
    }
    let body = ErrorBody {
        kind: error.kind(),
        message: error.to_string(),
        details: error.details(),
    };
    (status, axum::Json(body)).into_response()
}
