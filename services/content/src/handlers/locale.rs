use axum::extract::{FromRequestParts, Query};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use serde::Deserialize;

use commons_domain::locale::Locale;

use crate::error::ContentServiceError;

#[derive(Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

/// Locale of the request: `?locale=`, then `Accept-Language`, then the default.
///
/// An explicit but unsupported `?locale=` is rejected rather than ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    fn from_parts(parts: &Parts) -> Result<Self, ContentServiceError> {
        let query = Query::<LocaleQuery>::try_from_uri(&parts.uri)?;
        if let Some(explicit) = query.0.locale.as_deref().filter(|l| !l.is_empty()) {
            return Ok(Self(explicit.parse()?));
        }

        let negotiated = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(Locale::from_accept_language);
        Ok(Self(negotiated.unwrap_or_default()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestLocale {
    type Rejection = ContentServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}
