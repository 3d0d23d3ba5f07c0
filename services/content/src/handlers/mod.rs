pub mod case_study;
pub mod locale;
pub mod news;
pub mod page;
pub mod resource;
pub mod taxonomy;

use anyhow::Context as _;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use commons_domain::locale::Locale;

use crate::error::ContentServiceError;

/// `axum::Json` whose rejection renders as `INVALID_BODY`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ContentServiceError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` whose rejection renders as `INVALID_QUERY`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ContentServiceError))]
pub struct QueryParams<T>(pub T);

/// 308 to the canonical slug of `locale` under `/{collection}/`.
pub(crate) fn redirect_to_slug(
    collection: &str,
    slug: &str,
    locale: Locale,
) -> Result<Response, ContentServiceError> {
    let location = HeaderValue::try_from(format!("/{collection}/{slug}?locale={locale}"))
        .context("canonical slug is not a valid Location")?;
    Ok((StatusCode::PERMANENT_REDIRECT, [(header::LOCATION, location)]).into_response())
}
