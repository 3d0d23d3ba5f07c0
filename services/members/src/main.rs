use std::sync::Arc;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use commons_auth::token::SessionVerifier;
use commons_auth::webhook::WebhookVerifier;
use commons_core::config::Config;
use commons_core::tracing::init_tracing;

use commons_members::config::MembersConfig;
use commons_members::infra::identity::HttpIdentityProvider;
use commons_members::infra::storage::S3AvatarStore;
use commons_members::router::build_router;
use commons_members::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = MembersConfig::from_env().context("load members config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let sessions = SessionVerifier::from_key_material(
        config.session_jwt_public_key.as_deref(),
        config.session_jwt_secret.as_deref(),
        config.session_jwt_issuer.as_deref(),
    )
    .context("session key")?;
    let webhooks =
        WebhookVerifier::new(&config.identity_webhook_secret).context("identity webhook secret")?;

    let avatars = S3AvatarStore::connect(
        config.avatar_bucket,
        config.avatar_public_base_url,
        config.s3_endpoint_url.as_deref(),
    )
    .await;
    let identity = HttpIdentityProvider::new(config.identity_api_url, config.identity_api_key)?;

    let state = AppState {
        db,
        avatars,
        identity,
        sessions: Arc::new(sessions),
        webhooks: Arc::new(webhooks),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.members_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("members service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
