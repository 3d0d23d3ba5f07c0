use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use commons_auth::identity::Session;
use commons_domain::community::CommunityRole;
use commons_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Community, CommunitySummary};
use crate::error::MembersServiceError;
use crate::handlers::JsonBody;
use crate::handlers::profile::{PublicUserResponse, UserCommunityResponse};
use crate::state::AppState;
use crate::usecase::community::{
    CommunityInput, CreateCommunityUseCase, GetCommunityUseCase, JoinCommunityUseCase,
    LeaveCommunityUseCase, ListCommunitiesUseCase, ListCommunityMembersUseCase,
    ListMyCommunitiesUseCase,
};

#[derive(Serialize)]
pub struct CommunityResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub member_count: u64,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl CommunityResponse {
    fn new(community: Community, member_count: u64) -> Self {
        Self {
            id: community.id,
            slug: community.slug,
            name: community.name,
            description: community.description,
            member_count,
            created_at: community.created_at,
        }
    }
}

impl From<CommunitySummary> for CommunityResponse {
    fn from(summary: CommunitySummary) -> Self {
        Self::new(summary.community, summary.member_count)
    }
}

#[derive(Serialize)]
pub struct MemberResponse {
    #[serde(flatten)]
    pub user: PublicUserResponse,
    pub role: CommunityRole,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub joined_at: DateTime<Utc>,
}

// ── GET /communities ─────────────────────────────────────────────────────────

pub async fn list_communities(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<CommunityResponse>>, MembersServiceError> {
    let usecase = ListCommunitiesUseCase {
        repo: state.community_repo(),
    };
    let page = usecase.execute(page).await?;
    Ok(Json(page.map(CommunityResponse::from)))
}

// ── GET /communities/{slug} ──────────────────────────────────────────────────

pub async fn get_community(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CommunityResponse>, MembersServiceError> {
    let usecase = GetCommunityUseCase {
        repo: state.community_repo(),
    };
    Ok(Json(usecase.execute(&slug).await?.into()))
}

// ── POST /communities ────────────────────────────────────────────────────────

pub async fn create_community(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CommunityInput>,
) -> Result<(StatusCode, Json<CommunityResponse>), MembersServiceError> {
    let usecase = CreateCommunityUseCase {
        users: state.user_repo(),
        communities: state.community_repo(),
    };
    let community = usecase.execute(&session.external_id, body).await?;
    Ok((StatusCode::CREATED, Json(CommunityResponse::new(community, 0))))
}

// ── POST /communities/{slug}/members ─────────────────────────────────────────

pub async fn join_community(
    session: Session,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, MembersServiceError> {
    let usecase = JoinCommunityUseCase {
        users: state.user_repo(),
        communities: state.community_repo(),
    };
    usecase.execute(&session.external_id, &slug).await?;
    Ok(StatusCode::CREATED)
}

// ── DELETE /communities/{slug}/members ───────────────────────────────────────

pub async fn leave_community(
    session: Session,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, MembersServiceError> {
    let usecase = LeaveCommunityUseCase {
        users: state.user_repo(),
        communities: state.community_repo(),
    };
    usecase.execute(&session.external_id, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /communities/{slug}/members ──────────────────────────────────────────

pub async fn list_community_members(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<MemberResponse>>, MembersServiceError> {
    let usecase = ListCommunityMembersUseCase {
        repo: state.community_repo(),
    };
    let store = state.avatar_store();
    let page = usecase.execute(&slug, page).await?;
    Ok(Json(page.map(|(user, membership)| MemberResponse {
        user: PublicUserResponse::new(&store, user),
        role: membership.role,
        joined_at: membership.joined_at,
    })))
}

// ── GET /users/@me/communities ───────────────────────────────────────────────

pub async fn list_my_communities(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserCommunityResponse>>, MembersServiceError> {
    let usecase = ListMyCommunitiesUseCase {
        users: state.user_repo(),
        communities: state.community_repo(),
    };
    let memberships = usecase.execute(&session.external_id).await?;
    Ok(Json(
        memberships
            .into_iter()
            .map(UserCommunityResponse::from)
            .collect(),
    ))
}
