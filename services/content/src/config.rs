use serde::Deserialize;

use commons_core::config::Config;

use crate::infra::cms::DEFAULT_API_VERSION;

/// Content service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ContentConfig {
    /// TCP port for the HTTP server (default 3122). Env var: `CONTENT_PORT`.
    #[serde(default = "default_port")]
    pub content_port: u16,
    /// Base URL of the CMS HTTP API, e.g. `https://<project>.api.sanity.io`.
    pub cms_api_url: String,
    pub cms_dataset: String,
    #[serde(default = "default_api_version")]
    pub cms_api_version: String,
    /// Write token. Without one, submissions answer 503.
    pub cms_token: Option<String>,
    pub session_jwt_public_key: Option<String>,
    pub session_jwt_secret: Option<String>,
    pub session_jwt_issuer: Option<String>,
}

fn default_port() -> u16 {
    3122
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

impl Config for ContentConfig {}
