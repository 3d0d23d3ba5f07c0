use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde::Serialize;

use crate::error::MembersServiceError;
use crate::state::AppState;
use crate::usecase::webhook::{HandleIdentityEventUseCase, IdentityEvent, WebhookOutcome};

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
    /// `upserted`, `deleted` or `ignored`.
    pub action: &'static str,
}

impl From<WebhookOutcome> for WebhookAck {
    fn from(outcome: WebhookOutcome) -> Self {
        let action = match outcome {
            WebhookOutcome::Upserted(_) => "upserted",
            WebhookOutcome::Deleted(_) => "deleted",
            WebhookOutcome::Ignored => "ignored",
        };
        Self {
            received: true,
            action,
        }
    }
}

// ── POST /webhooks/identity ──────────────────────────────────────────────────

/// Takes the raw body: the signature covers the exact bytes sent.
pub async fn identity_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, MembersServiceError> {
    state.webhooks.verify(&headers, &body).map_err(|e| {
        tracing::warn!(error = %e, "identity webhook rejected");
        MembersServiceError::InvalidWebhookSignature
    })?;
    let event: IdentityEvent = serde_json::from_slice(&body)
        .map_err(|e| MembersServiceError::InvalidBody(e.to_string()))?;

    let usecase = HandleIdentityEventUseCase {
        repo: state.user_repo(),
    };
    let outcome = usecase.execute(event).await?;
    Ok(Json(outcome.into()))
}
