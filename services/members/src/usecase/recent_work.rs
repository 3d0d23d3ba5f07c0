use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use commons_core::validation::{FieldError, FieldErrors};

use crate::domain::repository::{RecentWorkRepository, UserRepository};
use crate::domain::types::{MAX_RECENT_WORKS, RecentWork};
use crate::error::MembersServiceError;
use crate::usecase::require_user;

/// Full set of recent-work fields, as created or as the result of a patch.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecentWorkInput {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_ongoing: bool,
}

impl RecentWorkInput {
    fn normalized(self) -> Self {
        let blank_to_none = |v: Option<String>| {
            v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
        };
        Self {
            title: self.title.trim().to_owned(),
            description: blank_to_none(self.description),
            url: blank_to_none(self.url),
            ..self
        }
    }

    /// Field rules plus the date-range rules between fields.
    fn check(&self) -> Result<(), MembersServiceError> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => FieldErrors::from(e),
        };
        match (self.is_ongoing, self.end_date) {
            (true, Some(_)) => errors.push(
                FieldError::new("end_date", "ongoing")
                    .with_message("ongoing work cannot have an end date"),
            ),
            (false, Some(end)) if end < self.start_date => errors.push(
                FieldError::new("end_date", "range")
                    .with_message("end date must not be before start date"),
            ),
            _ => {}
        }
        errors.into_result().map_err(MembersServiceError::Validation)
    }
}

/// PATCH body; absent fields keep their stored value, `null` clears.
#[derive(Debug, Default, Deserialize)]
pub struct RecentWorkPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "commons_core::serde::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "commons_core::serde::double_option")]
    pub url: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "commons_core::serde::double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    pub is_ongoing: Option<bool>,
}

impl RecentWorkPatch {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.url.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.is_ongoing.is_none()
    }

    fn apply(self, current: &RecentWork) -> RecentWorkInput {
        let is_ongoing = self.is_ongoing.unwrap_or(current.is_ongoing);
        // Switching to ongoing drops a stored end date unless one is sent explicitly.
        let end_date = match self.end_date {
            Some(end) => end,
            None if is_ongoing => None,
            None => current.end_date,
        };
        RecentWorkInput {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            url: self.url.unwrap_or_else(|| current.url.clone()),
            start_date: self.start_date.unwrap_or(current.start_date),
            end_date,
            is_ongoing,
        }
    }
}

// ── ListRecentWorks ──────────────────────────────────────────────────────────

pub struct ListRecentWorksUseCase<U: UserRepository, W: RecentWorkRepository> {
    pub users: U,
    pub recent_works: W,
}

impl<U: UserRepository, W: RecentWorkRepository> ListRecentWorksUseCase<U, W> {
    pub async fn execute(&self, external_id: &str) -> Result<Vec<RecentWork>, MembersServiceError> {
        let user = require_user(&self.users, external_id).await?;
        let mut works = self.recent_works.list_by_user(user.id).await?;
        works.sort_by(RecentWork::display_order);
        Ok(works)
    }
}

// ── CreateRecentWork ─────────────────────────────────────────────────────────

pub struct CreateRecentWorkUseCase<U: UserRepository, W: RecentWorkRepository> {
    pub users: U,
    pub recent_works: W,
}

impl<U: UserRepository, W: RecentWorkRepository> CreateRecentWorkUseCase<U, W> {
    pub async fn execute(
        &self,
        external_id: &str,
        input: RecentWorkInput,
    ) -> Result<RecentWork, MembersServiceError> {
        let input = input.normalized();
        input.check()?;
        let user = require_user(&self.users, external_id).await?;

        let now = Utc::now();
        let work = RecentWork {
            id: Uuid::now_v7(),
            user_id: user.id,
            title: input.title,
            description: input.description,
            url: input.url,
            start_date: input.start_date,
            end_date: input.end_date,
            is_ongoing: input.is_ongoing,
            created_at: now,
            updated_at: now,
        };
        self.recent_works
            .create_capped(&work, MAX_RECENT_WORKS)
            .await?;
        Ok(work)
    }
}

// ── UpdateRecentWork ─────────────────────────────────────────────────────────

pub struct UpdateRecentWorkUseCase<U: UserRepository, W: RecentWorkRepository> {
    pub users: U,
    pub recent_works: W,
}

impl<U: UserRepository, W: RecentWorkRepository> UpdateRecentWorkUseCase<U, W> {
    pub async fn execute(
        &self,
        external_id: &str,
        id: Uuid,
        patch: RecentWorkPatch,
    ) -> Result<RecentWork, MembersServiceError> {
        if patch.is_empty() {
            return Err(MembersServiceError::MissingData);
        }
        let user = require_user(&self.users, external_id).await?;
        let current = self
            .recent_works
            .find(user.id, id)
            .await?
            .ok_or(MembersServiceError::RecentWorkNotFound)?;

        let input = patch.apply(&current).normalized();
        input.check()?;

        let updated = RecentWork {
            title: input.title,
            description: input.description,
            url: input.url,
            start_date: input.start_date,
            end_date: input.end_date,
            is_ongoing: input.is_ongoing,
            updated_at: Utc::now(),
            ..current
        };
        self.recent_works.update(&updated).await?;
        Ok(updated)
    }
}

// ── DeleteRecentWork ─────────────────────────────────────────────────────────

pub struct DeleteRecentWorkUseCase<U: UserRepository, W: RecentWorkRepository> {
    pub users: U,
    pub recent_works: W,
}

impl<U: UserRepository, W: RecentWorkRepository> DeleteRecentWorkUseCase<U, W> {
    pub async fn execute(&self, external_id: &str, id: Uuid) -> Result<(), MembersServiceError> {
        let user = require_user(&self.users, external_id).await?;
        if !self.recent_works.delete(user.id, id).await? {
            return Err(MembersServiceError::RecentWorkNotFound);
        }
        Ok(())
    }
}
