use axum::extract::State;
use axum::http::StatusCode;

/// Dependency check behind `GET /readyz`.
#[allow(async_fn_in_trait)]
pub trait Readiness: Send + Sync {
    async fn is_ready(&self) -> bool;
}

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`: 503 until the service's dependencies answer.
pub async fn readyz<S: Readiness>(State(state): State<S>) -> StatusCode {
    if state.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
