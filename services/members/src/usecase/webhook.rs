use serde::Deserialize;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{IdentityUser, validate_username};
use crate::error::MembersServiceError;

/// Envelope of an identity-provider webhook delivery.
#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    primary_email_address_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    id: String,
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct DeletedPayload {
    id: Option<String>,
}

impl UserPayload {
    fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref();
        self.email_addresses
            .iter()
            .find(|e| Some(e.id.as_str()) == primary)
            .or_else(|| self.email_addresses.first())
            .map(|e| e.email_address.as_str())
    }

    fn full_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Upserted(Uuid),
    /// `false` when the user was not known locally.
    Deleted(bool),
    Ignored,
}

pub struct HandleIdentityEventUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> HandleIdentityEventUseCase<R> {
    /// Storage failures surface as `Unavailable` so the provider redelivers.
    pub async fn execute(&self, event: IdentityEvent) -> Result<WebhookOutcome, MembersServiceError> {
        let outcome = match event.event_type.as_str() {
            "user.created" | "user.updated" => self.upsert(event.data).await,
            "user.deleted" => self.delete(event.data).await,
            other => {
                tracing::debug!(event_type = other, "ignoring identity event");
                Ok(WebhookOutcome::Ignored)
            }
        };
        outcome.map_err(|e| match e {
            MembersServiceError::Internal(e) => MembersServiceError::Unavailable(e),
            e => e,
        })
    }

    async fn upsert(&self, data: serde_json::Value) -> Result<WebhookOutcome, MembersServiceError> {
        let payload: UserPayload = serde_json::from_value(data)
            .map_err(|e| MembersServiceError::InvalidBody(e.to_string()))?;
        let email = payload
            .primary_email()
            .ok_or_else(|| MembersServiceError::InvalidBody("user has no email address".into()))?
            .to_owned();

        let username = match payload.username.as_deref().map(validate_username) {
            Some(Ok(candidate)) => match self.repo.find_by_username(&candidate).await? {
                Some(owner) if owner.external_id != payload.id => None,
                _ => Some(candidate),
            },
            _ => None,
        };

        let identity = IdentityUser {
            external_id: payload.id.clone(),
            email,
            name: payload.full_name(),
            username,
        };
        let user = self.repo.upsert_identity(&identity).await?;
        tracing::info!(user_id = %user.id, external_id = %identity.external_id, "identity user synced");
        Ok(WebhookOutcome::Upserted(user.id))
    }

    async fn delete(&self, data: serde_json::Value) -> Result<WebhookOutcome, MembersServiceError> {
        let payload: DeletedPayload = serde_json::from_value(data)
            .map_err(|e| MembersServiceError::InvalidBody(e.to_string()))?;
        let Some(external_id) = payload.id else {
            return Ok(WebhookOutcome::Ignored);
        };
        let deleted = self.repo.delete_by_external_id(&external_id).await?;
        tracing::info!(external_id = %external_id, deleted, "identity user deleted");
        Ok(WebhookOutcome::Deleted(deleted))
    }
}
