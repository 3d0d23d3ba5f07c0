//! Session extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use commons_core::error::ErrorBody;
use http::request::Parts;
use http::{StatusCode, header};

use crate::token::{AuthError, SessionVerifier};

/// Cookie the identity provider's frontend SDK stores the session token in.
pub const SESSION_COOKIE: &str = "__session";

/// Authenticated caller, taken from `Authorization: Bearer <jwt>` or the
/// [`SESSION_COOKIE`] cookie.
///
/// Requires `Arc<SessionVerifier>: FromRef<S>`. Returns 401 when no token is
/// present or the token fails verification.
#[derive(Debug, Clone)]
pub struct Session {
    /// Identity-provider user id (`sub`).
    pub external_id: String,
    pub session_id: Option<String>,
    pub expires_at: u64,
}

#[derive(Debug)]
pub struct AuthRejection(Option<AuthError>);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            None => "authentication required".to_string(),
            Some(e) => e.to_string(),
        };
        let body = ErrorBody {
            kind: "UNAUTHORIZED",
            message,
            details: None,
        };
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Arc<SessionVerifier>: FromRef<S>,
{
    type Rejection = AuthRejection;

    // Extract synchronously and return a 'static future; `async fn` here
    // captures the `parts` lifetime and trips E0195 against axum-core 0.5.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let verifier = Arc::<SessionVerifier>::from_ref(state);
        let token = bearer_token(parts).or_else(|| cookie_token(parts));

        async move {
            let token = token.ok_or(AuthRejection(None))?;
            let claims = verifier.verify(&token).map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                AuthRejection(Some(e))
            })?;
            Ok(Self {
                external_id: claims.sub,
                session_id: claims.sid,
                expires_at: claims.exp,
            })
        }
    }
}
