use std::sync::Arc;

use axum::extract::FromRef;

use commons_auth::token::SessionVerifier;
use commons_core::health::Readiness;

use crate::infra::cms::HttpCmsClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub cms: HttpCmsClient,
    pub sessions: Arc<SessionVerifier>,
}

impl AppState {
    pub fn cms(&self) -> HttpCmsClient {
        self.cms.clone()
    }
}

impl FromRef<AppState> for Arc<SessionVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl Readiness for AppState {
    async fn is_ready(&self) -> bool {
        match self.cms.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "CMS ping failed");
                false
            }
        }
    }
}
