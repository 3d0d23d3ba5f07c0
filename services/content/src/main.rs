use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;

use commons_auth::token::SessionVerifier;
use commons_core::config::Config;
use commons_core::tracing::init_tracing;

use commons_content::config::ContentConfig;
use commons_content::infra::cms::HttpCmsClient;
use commons_content::router::build_router;
use commons_content::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ContentConfig::from_env().context("load content config")?;

    let sessions = SessionVerifier::from_key_material(
        config.session_jwt_public_key.as_deref(),
        config.session_jwt_secret.as_deref(),
        config.session_jwt_issuer.as_deref(),
    )
    .context("session key")?;

    if config.cms_token.is_none() {
        tracing::warn!("CMS_TOKEN not set; case study submissions will fail");
    }
    let cms = HttpCmsClient::new(
        config.cms_api_url,
        config.cms_dataset,
        config.cms_api_version,
        config.cms_token,
    )?;

    let state = AppState {
        cms,
        sessions: Arc::new(sessions),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.content_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("content service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
