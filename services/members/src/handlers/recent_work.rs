use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use commons_auth::identity::Session;

use crate::domain::types::RecentWork;
use crate::error::MembersServiceError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::recent_work::{
    CreateRecentWorkUseCase, DeleteRecentWorkUseCase, ListRecentWorksUseCase, RecentWorkInput,
    RecentWorkPatch, UpdateRecentWorkUseCase,
};

#[derive(Serialize)]
pub struct RecentWorkResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_ongoing: bool,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<RecentWork> for RecentWorkResponse {
    fn from(work: RecentWork) -> Self {
        Self {
            id: work.id,
            title: work.title,
            description: work.description,
            url: work.url,
            start_date: work.start_date,
            end_date: work.end_date,
            is_ongoing: work.is_ongoing,
            created_at: work.created_at,
            updated_at: work.updated_at,
        }
    }
}

// ── GET /users/@me/recent-works ──────────────────────────────────────────────

pub async fn list_recent_works(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<RecentWorkResponse>>, MembersServiceError> {
    let usecase = ListRecentWorksUseCase {
        users: state.user_repo(),
        recent_works: state.recent_work_repo(),
    };
    let works = usecase.execute(&session.external_id).await?;
    Ok(Json(works.into_iter().map(RecentWorkResponse::from).collect()))
}

// ── POST /users/@me/recent-works ─────────────────────────────────────────────

pub async fn create_recent_work(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RecentWorkInput>,
) -> Result<(StatusCode, Json<RecentWorkResponse>), MembersServiceError> {
    let usecase = CreateRecentWorkUseCase {
        users: state.user_repo(),
        recent_works: state.recent_work_repo(),
    };
    let work = usecase.execute(&session.external_id, body).await?;
    Ok((StatusCode::CREATED, Json(work.into())))
}

// ── PATCH /users/@me/recent-works/{id} ───────────────────────────────────────

pub async fn update_recent_work(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<RecentWorkPatch>,
) -> Result<Json<RecentWorkResponse>, MembersServiceError> {
    let usecase = UpdateRecentWorkUseCase {
        users: state.user_repo(),
        recent_works: state.recent_work_repo(),
    };
    let work = usecase.execute(&session.external_id, id, body).await?;
    Ok(Json(work.into()))
}

// ── DELETE /users/@me/recent-works/{id} ──────────────────────────────────────

pub async fn delete_recent_work(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MembersServiceError> {
    let usecase = DeleteRecentWorkUseCase {
        users: state.user_repo(),
        recent_works: state.recent_work_repo(),
    };
    usecase.execute(&session.external_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
