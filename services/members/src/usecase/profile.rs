use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidateUrl};

use commons_domain::user::{AgeGroup, ExpertiseArea, WorkType};

use crate::domain::avatar::AvatarKeys;
use crate::domain::repository::{
    AvatarStore, CommunityRepository, IdentityProvider, RecentWorkRepository, UserRepository,
};
use crate::domain::types::{
    Community, Membership, ProfileChanges, RecentWork, SocialLinksChanges, User,
    UsernameProblem, validate_username,
};
use crate::error::MembersServiceError;
use crate::usecase::avatar::delete_avatar_objects;
use crate::usecase::require_user;

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetMeUseCase<R> {
    pub async fn execute(&self, external_id: &str) -> Result<User, MembersServiceError> {
        require_user(&self.repo, external_id).await
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

/// PATCH body. Absent fields are left alone; an empty string clears a text field.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    pub username: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(custom(function = "validate_age_group"))]
    pub age_group: Option<String>,
    #[validate(custom(function = "validate_country"))]
    pub country: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 150))]
    pub organization: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    #[validate(length(max = 10))]
    pub work_types: Option<Vec<WorkType>>,
    #[validate(length(max = 10))]
    pub expertise_areas: Option<Vec<ExpertiseArea>>,
    #[validate(nested)]
    pub social_links: Option<SocialLinksUpdate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SocialLinksUpdate {
    #[validate(custom(function = "validate_link"))]
    pub website: Option<String>,
    #[validate(custom(function = "validate_link"))]
    pub linkedin: Option<String>,
    #[validate(custom(function = "validate_link"))]
    pub twitter: Option<String>,
    #[validate(custom(function = "validate_link"))]
    pub github: Option<String>,
    #[validate(custom(function = "validate_link"))]
    pub instagram: Option<String>,
}

fn validate_age_group(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || AgeGroup::from_label(value.trim()).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("age_group"))
    }
}

/// ISO 3166-1 alpha-2 shape: exactly two ASCII letters.
fn validate_country(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || (value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic())) {
        Ok(())
    } else {
        Err(ValidationError::new("country"))
    }
}

fn validate_link(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

/// `None` → untouched, blank → clear, otherwise the trimmed value.
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_owned())
    })
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned())
}

impl SocialLinksUpdate {
    fn normalized(self) -> Self {
        Self {
            website: trimmed(self.website),
            linkedin: trimmed(self.linkedin),
            twitter: trimmed(self.twitter),
            github: trimmed(self.github),
            instagram: trimmed(self.instagram),
        }
    }

    fn into_changes(self) -> SocialLinksChanges {
        SocialLinksChanges {
            website: clearable(self.website),
            linkedin: clearable(self.linkedin),
            twitter: clearable(self.twitter),
            github: clearable(self.github),
            instagram: clearable(self.instagram),
        }
    }
}

impl ProfileUpdate {
    /// Trims every given text field. Blank values stay present so they still clear.
    fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            username: trimmed(self.username),
            bio: trimmed(self.bio),
            age_group: trimmed(self.age_group),
            country: trimmed(self.country),
            city: trimmed(self.city),
            organization: trimmed(self.organization),
            position: trimmed(self.position),
            social_links: self.social_links.map(SocialLinksUpdate::normalized),
            ..self
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.bio.is_none()
            && self.age_group.is_none()
            && self.country.is_none()
            && self.city.is_none()
            && self.organization.is_none()
            && self.position.is_none()
            && self.work_types.is_none()
            && self.expertise_areas.is_none()
            && self.social_links.is_none()
    }

    fn into_changes(self, username: Option<String>) -> ProfileChanges {
        ProfileChanges {
            name: clearable(self.name),
            username,
            bio: clearable(self.bio),
            age_group: clearable(self.age_group)
                .map(|label| label.as_deref().and_then(AgeGroup::from_label)),
            country: clearable(self.country).map(|c| c.map(|c| c.to_ascii_uppercase())),
            city: clearable(self.city),
            organization: clearable(self.organization),
            position: clearable(self.position),
            work_types: self.work_types.map(dedup),
            expertise_areas: self.expertise_areas.map(dedup),
            social_links: self.social_links.map(SocialLinksUpdate::into_changes),
        }
    }
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

pub(crate) fn username_error(problem: UsernameProblem) -> MembersServiceError {
    match problem {
        UsernameProblem::Invalid => MembersServiceError::InvalidUsername,
        UsernameProblem::Reserved => MembersServiceError::ReservedUsername,
        UsernameProblem::Taken => MembersServiceError::UsernameTaken,
    }
}

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(
        &self,
        external_id: &str,
        input: ProfileUpdate,
    ) -> Result<User, MembersServiceError> {
        if input.is_empty() {
            return Err(MembersServiceError::MissingData);
        }
        let input = input.normalized();
        input.validate()?;

        let user = require_user(&self.repo, external_id).await?;

        let username = match input.username.as_deref() {
            None => None,
            Some(raw) => {
                let username = validate_username(raw).map_err(username_error)?;
                if let Some(owner) = self.repo.find_by_username(&username).await? {
                    if owner.id != user.id {
                        return Err(MembersServiceError::UsernameTaken);
                    }
                }
                Some(username)
            }
        };

        let changes = input.into_changes(username);
        self.repo.update_profile(user.id, &changes).await
    }
}

// ── CheckUsernameAvailability ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsernameAvailability {
    pub username: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UsernameProblem>,
}

pub struct CheckUsernameUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CheckUsernameUseCase<R> {
    pub async fn execute(&self, raw: &str) -> Result<UsernameAvailability, MembersServiceError> {
        let normalized = raw.trim().to_ascii_lowercase();
        let reason = match validate_username(raw) {
            Err(problem) => Some(problem),
            Ok(username) => self
                .repo
                .find_by_username(&username)
                .await?
                .map(|_| UsernameProblem::Taken),
        };
        Ok(UsernameAvailability {
            username: normalized,
            available: reason.is_none(),
            reason,
        })
    }
}

// ── GetPublicProfile ─────────────────────────────────────────────────────────

/// A profile as shown to other visitors.
#[derive(Debug, Clone)]
pub struct PublicProfile {
    pub user: User,
    pub recent_works: Vec<RecentWork>,
    pub communities: Vec<(Community, Membership)>,
}

pub struct GetPublicProfileUseCase<U, W, C>
where
    U: UserRepository,
    W: RecentWorkRepository,
    C: CommunityRepository,
{
    pub users: U,
    pub recent_works: W,
    pub communities: C,
}

impl<U, W, C> GetPublicProfileUseCase<U, W, C>
where
    U: UserRepository,
    W: RecentWorkRepository,
    C: CommunityRepository,
{
    pub async fn execute(&self, username: &str) -> Result<PublicProfile, MembersServiceError> {
        let username = username.trim().to_ascii_lowercase();
        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or(MembersServiceError::UserNotFound)?;
        let mut recent_works = self.recent_works.list_by_user(user.id).await?;
        recent_works.sort_by(RecentWork::display_order);
        let communities = self.communities.list_for_user(user.id).await?;
        Ok(PublicProfile {
            user,
            recent_works,
            communities,
        })
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

pub struct DeleteAccountUseCase<R, P, S>
where
    R: UserRepository,
    P: IdentityProvider,
    S: AvatarStore,
{
    pub repo: R,
    pub identity: P,
    pub store: S,
}

impl<R, P, S> DeleteAccountUseCase<R, P, S>
where
    R: UserRepository,
    P: IdentityProvider,
    S: AvatarStore,
{
    /// Provider account first, so a failure there leaves everything intact
    /// and the request can be retried.
    pub async fn execute(&self, external_id: &str) -> Result<(), MembersServiceError> {
        let user = self.repo.find_by_external_id(external_id).await?;

        self.identity.delete_user(external_id).await?;
        self.repo.delete_by_external_id(external_id).await?;

        if let Some(prefix) = user.and_then(|u| u.avatar_key) {
            delete_avatar_objects(&self.store, &AvatarKeys::from_prefix(prefix)).await;
        }
        tracing::info!(external_id, "account deleted");
        Ok(())
    }
}
