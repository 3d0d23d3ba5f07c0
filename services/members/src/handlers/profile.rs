use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use commons_auth::identity::Session;
use commons_domain::community::CommunityRole;
use commons_domain::user::{AgeGroup, ExpertiseArea, UserRole, WorkType};

use crate::domain::repository::AvatarStore;
use crate::domain::types::{Community, Membership, SocialLinks, User};
use crate::error::MembersServiceError;
use crate::handlers::recent_work::RecentWorkResponse;
use crate::handlers::{JsonBody, avatar_urls};
use crate::state::AppState;
use crate::usecase::avatar::AvatarUrls;
use crate::usecase::profile::{
    CheckUsernameUseCase, DeleteAccountUseCase, GetMeUseCase, GetPublicProfileUseCase,
    ProfileUpdate, UpdateProfileUseCase, UsernameAvailability,
};

/// The caller's own profile, including private fields.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub work_types: Vec<WorkType>,
    pub expertise_areas: Vec<ExpertiseArea>,
    pub social_links: SocialLinks,
    pub avatar: Option<AvatarUrls>,
    pub role: UserRole,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn new<S: AvatarStore>(store: &S, user: User) -> Self {
        let avatar = avatar_urls(store, &user);
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            bio: user.bio,
            age_group: user.age_group,
            country: user.country,
            city: user.city,
            organization: user.organization,
            position: user.position,
            work_types: user.work_types,
            expertise_areas: user.expertise_areas,
            social_links: user.social_links,
            avatar,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// What other visitors see of a member. Never carries the email address.
#[derive(Serialize)]
pub struct PublicUserResponse {
    pub username: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub work_types: Vec<WorkType>,
    pub expertise_areas: Vec<ExpertiseArea>,
    pub social_links: SocialLinks,
    pub avatar: Option<AvatarUrls>,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub member_since: DateTime<Utc>,
}

impl PublicUserResponse {
    pub fn new<S: AvatarStore>(store: &S, user: User) -> Self {
        let avatar = avatar_urls(store, &user);
        Self {
            username: user.username,
            name: user.name,
            bio: user.bio,
            country: user.country,
            city: user.city,
            organization: user.organization,
            position: user.position,
            work_types: user.work_types,
            expertise_areas: user.expertise_areas,
            social_links: user.social_links,
            avatar,
            member_since: user.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct UserCommunityResponse {
    pub slug: String,
    pub name: String,
    pub role: CommunityRole,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub joined_at: DateTime<Utc>,
}

impl From<(Community, Membership)> for UserCommunityResponse {
    fn from((community, membership): (Community, Membership)) -> Self {
        Self {
            slug: community.slug,
            name: community.name,
            role: membership.role,
            joined_at: membership.joined_at,
        }
    }
}

#[derive(Serialize)]
pub struct PublicProfileResponse {
    #[serde(flatten)]
    pub user: PublicUserResponse,
    pub recent_works: Vec<RecentWorkResponse>,
    pub communities: Vec<UserCommunityResponse>,
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, MembersServiceError> {
    let usecase = GetMeUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&session.external_id).await?;
    Ok(Json(ProfileResponse::new(&state.avatar_store(), user)))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

pub async fn update_me(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, MembersServiceError> {
    let usecase = UpdateProfileUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&session.external_id, body).await?;
    Ok(Json(ProfileResponse::new(&state.avatar_store(), user)))
}

// ── DELETE /users/@me ────────────────────────────────────────────────────────

pub async fn delete_me(
    session: Session,
    State(state): State<AppState>,
) -> Result<StatusCode, MembersServiceError> {
    let usecase = DeleteAccountUseCase {
        repo: state.user_repo(),
        identity: state.identity_provider(),
        store: state.avatar_store(),
    };
    usecase.execute(&session.external_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /usernames/{username}/availability ───────────────────────────────────

pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UsernameAvailability>, MembersServiceError> {
    let usecase = CheckUsernameUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(&username).await?))
}

// ── GET /users/{username} ────────────────────────────────────────────────────

pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfileResponse>, MembersServiceError> {
    let usecase = GetPublicProfileUseCase {
        users: state.user_repo(),
        recent_works: state.recent_work_repo(),
        communities: state.community_repo(),
    };
    let profile = usecase.execute(&username).await?;
    Ok(Json(PublicProfileResponse {
        user: PublicUserResponse::new(&state.avatar_store(), profile.user),
        recent_works: profile
            .recent_works
            .into_iter()
            .map(RecentWorkResponse::from)
            .collect(),
        communities: profile
            .communities
            .into_iter()
            .map(UserCommunityResponse::from)
            .collect(),
    }))
}
