use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use commons_core::error::{ServiceError, render};
use commons_core::validation::FieldErrors;
use commons_domain::locale::UnsupportedLocale;

/// Content service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error("page not found")]
    PageNotFound,
    #[error("news post not found")]
    NewsPostNotFound,
    #[error("case study not found")]
    CaseStudyNotFound,
    #[error("{0}")]
    InvalidLocale(#[from] UnsupportedLocale),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("service unavailable")]
    Unavailable(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError for ContentServiceError {
    fn kind(&self) -> &'static str {
        match self {
            Self::PageNotFound => "PAGE_NOT_FOUND",
            Self::NewsPostNotFound => "NEWS_POST_NOT_FOUND",
            Self::CaseStudyNotFound => "CASE_STUDY_NOT_FOUND",
            Self::InvalidLocale(_) => "INVALID_LOCALE",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::PageNotFound | Self::NewsPostNotFound | Self::CaseStudyNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidLocale(_)
            | Self::Validation(_)
            | Self::InvalidBody(_)
            | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    fn source_chain(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Unavailable(e) | Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ContentServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}

impl From<JsonRejection> for ContentServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ContentServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ContentServiceError {
    fn into_response(self) -> Response {
        render(&self)
    }
}
