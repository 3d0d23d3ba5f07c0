use std::time::Duration;

use anyhow::Context as _;
use reqwest::StatusCode;

use crate::domain::repository::IdentityProvider;
use crate::error::MembersServiceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend API client of the identity provider.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(api_url: String, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build identity provider HTTP client")?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn delete_user(&self, external_id: &str) -> Result<(), MembersServiceError> {
        let url = format!("{}/v1/users/{external_id}", self.api_url);
        let resp = self
            .client
            .delete(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                MembersServiceError::Unavailable(
                    anyhow::Error::new(e).context("identity provider request failed"),
                )
            })?;

        match resp.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::debug!(external_id, "identity user already gone");
                Ok(())
            }
            status => Err(MembersServiceError::Unavailable(anyhow::anyhow!(
                "identity provider returned {status}"
            ))),
        }
    }
}
