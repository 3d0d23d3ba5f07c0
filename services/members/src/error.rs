use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use commons_core::error::{ServiceError, render};
use commons_core::validation::FieldErrors;

/// Members service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum MembersServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("recent work not found")]
    RecentWorkNotFound,
    #[error("community not found")]
    CommunityNotFound,
    #[error("membership not found")]
    MembershipNotFound,
    #[error("username taken")]
    UsernameTaken,
    #[error("username is reserved")]
    ReservedUsername,
    #[error("invalid username")]
    InvalidUsername,
    #[error("already a member")]
    AlreadyMember,
    #[error("community already exists")]
    CommunityExists,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("missing data")]
    MissingData,
    #[error("recent work limit reached")]
    RecentWorkLimitReached,
    #[error("unsupported avatar type")]
    InvalidAvatarType,
    #[error("avatar too large")]
    AvatarTooLarge,
    #[error("invalid webhook signature")]
    InvalidWebhookSignature,
    #[error("forbidden")]
    Forbidden,
    #[error("service unavailable")]
    Unavailable(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError for MembersServiceError {
    fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RecentWorkNotFound => "RECENT_WORK_NOT_FOUND",
            Self::CommunityNotFound => "COMMUNITY_NOT_FOUND",
            Self::MembershipNotFound => "MEMBERSHIP_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::ReservedUsername => "RESERVED_USERNAME",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::CommunityExists => "COMMUNITY_EXISTS",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::MissingData => "MISSING_DATA",
            Self::RecentWorkLimitReached => "RECENT_WORK_LIMIT_REACHED",
            Self::InvalidAvatarType => "INVALID_AVATAR_TYPE",
            Self::AvatarTooLarge => "AVATAR_TOO_LARGE",
            Self::InvalidWebhookSignature => "INVALID_WEBHOOK_SIGNATURE",
            Self::Forbidden => "FORBIDDEN",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::RecentWorkNotFound
            | Self::CommunityNotFound
            | Self::MembershipNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken | Self::AlreadyMember | Self::CommunityExists => {
                StatusCode::CONFLICT
            }
            Self::ReservedUsername
            | Self::InvalidUsername
            | Self::Validation(_)
            | Self::InvalidBody(_)
            | Self::MissingData
            | Self::RecentWorkLimitReached
            | Self::InvalidAvatarType
            | Self::AvatarTooLarge
            | Self::InvalidWebhookSignature => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
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

impl From<validator::ValidationErrors> for MembersServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}

impl From<JsonRejection> for MembersServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for MembersServiceError {
    fn into_response(self) -> Response {
        render(&self)
    }
}
