use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use commons_auth::token::SessionVerifier;
use commons_auth::webhook::WebhookVerifier;
use commons_core::health::Readiness;

use crate::infra::db::{DbCommunityRepository, DbRecentWorkRepository, DbUserRepository};
use crate::infra::identity::HttpIdentityProvider;
use crate::infra::storage::S3AvatarStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub avatars: S3AvatarStore,
    pub identity: HttpIdentityProvider,
    pub sessions: Arc<SessionVerifier>,
    pub webhooks: Arc<WebhookVerifier>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn recent_work_repo(&self) -> DbRecentWorkRepository {
        DbRecentWorkRepository {
            db: self.db.clone(),
        }
    }

    pub fn community_repo(&self) -> DbCommunityRepository {
        DbCommunityRepository {
            db: self.db.clone(),
        }
    }

    pub fn avatar_store(&self) -> S3AvatarStore {
        self.avatars.clone()
    }

    pub fn identity_provider(&self) -> HttpIdentityProvider {
        self.identity.clone()
    }
}

impl FromRef<AppState> for Arc<SessionVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl Readiness for AppState {
    async fn is_ready(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "database ping failed");
                false
            }
        }
    }
}
