//! Session-token (JWT) verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Errors returned by [`SessionVerifier`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
    #[error("no session verification key configured")]
    MissingKey,
}

/// Claims carried by an identity-provider session token.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | identity-provider user id |
/// | `exp` | `exp` | expiration, seconds since UNIX epoch |
/// | `sid` | `sid` | provider session id, when present |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Verifies session tokens against one key.
///
/// Production tokens are RS256-signed by the identity provider; HS256 with a
/// shared secret is accepted for local development and tests.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn from_secret(secret: &str, issuer: Option<&str>) -> Self {
        Self::with_key(
            DecodingKey::from_secret(secret.as_bytes()),
            Algorithm::HS256,
            issuer,
        )
    }

    /// Accepts a PEM public key. Escaped `\n` sequences (as commonly found in
    /// single-line env vars) are expanded first.
    pub fn from_rsa_pem(pem: &str, issuer: Option<&str>) -> Result<Self, AuthError> {
        let pem = pem.replace("\\n", "\n");
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        Ok(Self::with_key(key, Algorithm::RS256, issuer))
    }

    /// Pick the verifier from configuration. A public key wins over a secret.
    pub fn from_key_material(
        public_key: Option<&str>,
        secret: Option<&str>,
        issuer: Option<&str>,
    ) -> Result<Self, AuthError> {
        match (public_key, secret) {
            (Some(pem), _) if !pem.trim().is_empty() => Self::from_rsa_pem(pem, issuer),
            (_, Some(secret)) if !secret.is_empty() => Ok(Self::from_secret(secret, issuer)),
            _ => Err(AuthError::MissingKey),
        }
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm, issuer: Option<&str>) -> Self {
        // Default leeway = 60s, tolerates clock skew with the provider.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self { key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        use jsonwebtoken::errors::ErrorKind;

        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidEcdsaKey
                | ErrorKind::InvalidRsaKey(_)
                | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            }
        })?;
        if data.claims.sub.is_empty() {
            return Err(AuthError::Malformed);
        }
        Ok(data.claims)
    }
}
