use serde::Deserialize;

use commons_core::config::Config;

/// Members service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct MembersConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3121). Env var: `MEMBERS_PORT`.
    #[serde(default = "default_port")]
    pub members_port: u16,
    /// PEM public key of the identity provider (RS256 session tokens).
    pub session_jwt_public_key: Option<String>,
    /// HS256 secret, for local development when no public key is set.
    pub session_jwt_secret: Option<String>,
    pub session_jwt_issuer: Option<String>,
    /// `whsec_`-prefixed signing secret of the identity webhook endpoint.
    pub identity_webhook_secret: String,
    /// Base URL of the identity provider's backend API.
    pub identity_api_url: String,
    pub identity_api_key: String,
    pub avatar_bucket: String,
    /// Public URL prefix avatar object keys are appended to.
    pub avatar_public_base_url: String,
    /// Custom S3 endpoint (MinIO, R2, ...). Enables path-style addressing.
    pub s3_endpoint_url: Option<String>,
}

fn default_port() -> u16 {
    3121
}

impl Config for MembersConfig {}
