//! Mock session helpers for integration tests.
//!
//! Services under test are built with [`verifier`], an HS256 verifier over
//! [`TEST_SESSION_SECRET`]; `MockAuth` signs tokens with the same secret so no
//! identity provider is needed.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, header};
use commons_auth::token::{SessionClaims, SessionVerifier};
use jsonwebtoken::{EncodingKey, Header, encode};

pub const TEST_SESSION_SECRET: &str = "commons-test-session-secret";

/// Verifier matching the tokens issued by [`MockAuth`].
pub fn verifier() -> Arc<SessionVerifier> {
    Arc::new(SessionVerifier::from_secret(TEST_SESSION_SECRET, None))
}

/// Identity-provider user a test request is made as.
pub struct MockAuth {
    pub external_id: String,
}

impl MockAuth {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
        }
    }

    /// A fresh external id shaped like the provider's (`user_<random>`).
    pub fn random() -> Self {
        Self::new(format!("user_{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn token(&self) -> String {
        self.token_expiring_in(3600)
    }

    /// Sign a token whose `exp` is `secs` from now (negative for expired).
    pub fn token_expiring_in(&self, secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + secs).max(0) as u64;
        let claims = SessionClaims {
            sub: self.external_id.clone(),
            exp,
            sid: Some(format!("sess_{}", uuid::Uuid::new_v4().simple())),
            iss: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SESSION_SECRET.as_bytes()),
        )
        .expect("HS256 encoding cannot fail")
    }

    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).expect("token is ASCII")
    }

    /// `Authorization` header map for the session.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, self.bearer());
        map
    }
}
