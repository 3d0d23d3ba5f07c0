use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use commons_auth::identity::Session;
use commons_domain::locale::Locale;
use commons_domain::pagination::Page;
use commons_domain::review::ReviewStatus;

use crate::domain::slug::{SlugLookup, alternates};
use crate::domain::types::CaseStudy;
use crate::error::ContentServiceError;
use crate::handlers::locale::RequestLocale;
use crate::handlers::taxonomy::{OrganizationResponse, TagResponse};
use crate::handlers::{JsonBody, QueryParams, redirect_to_slug};
use crate::state::AppState;
use crate::usecase::ListQuery;
use crate::usecase::case_study::{
    CaseStudyFilter, GetCaseStudyUseCase, ListCaseStudiesUseCase, ListMyCaseStudiesUseCase,
};
use crate::usecase::submission::{CaseStudySubmission, SubmitCaseStudyUseCase};

#[derive(Serialize)]
pub struct CaseStudySummaryResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub country: Option<String>,
    pub organization: Option<OrganizationResponse>,
    /// Free-text organization of submissions not linked to a CMS organization.
    pub organization_name: Option<String>,
    pub website: Option<String>,
    pub tags: Vec<TagResponse>,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms_opt")]
    pub published_at: Option<DateTime<Utc>>,
}

impl CaseStudySummaryResponse {
    fn new(study: CaseStudy, locale: Locale) -> Self {
        Self {
            title: study.title.resolve(locale).to_owned(),
            slug: study.slug.resolve(locale).to_owned(),
            summary: study.summary.resolve(locale).to_owned(),
            organization: study
                .organization
                .map(|o| OrganizationResponse::new(o, locale)),
            tags: TagResponse::list(study.tags, locale),
            id: study.id,
            country: study.country,
            organization_name: study.organization_name,
            website: study.website,
            published_at: study.published_at,
        }
    }
}

#[derive(Serialize)]
pub struct CaseStudyResponse {
    #[serde(flatten)]
    pub summary: CaseStudySummaryResponse,
    pub locale: Locale,
    pub body: String,
    pub alternates: BTreeMap<Locale, String>,
}

/// The caller's own submission, with its review status.
#[derive(Serialize)]
pub struct SubmissionResponse {
    #[serde(flatten)]
    pub summary: CaseStudySummaryResponse,
    pub status: ReviewStatus,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct SubmittedResponse {
    pub id: String,
}

// ── GET /case-studies ────────────────────────────────────────────────────────

pub async fn list_case_studies(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    QueryParams(query): QueryParams<ListQuery>,
    QueryParams(filter): QueryParams<CaseStudyFilter>,
) -> Result<Json<Page<CaseStudySummaryResponse>>, ContentServiceError> {
    let usecase = ListCaseStudiesUseCase { repo: state.cms() };
    let page = usecase.execute(&query, &filter, locale).await?;
    Ok(Json(page.map(|s| CaseStudySummaryResponse::new(s, locale))))
}

// ── GET /case-studies/{slug} ─────────────────────────────────────────────────

pub async fn get_case_study(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(slug): Path<String>,
) -> Result<Response, ContentServiceError> {
    let usecase = GetCaseStudyUseCase { repo: state.cms() };
    match usecase.execute(&slug, locale).await? {
        SlugLookup::Found(study) => {
            let body = study.body.resolve(locale).to_owned();
            let alternates = alternates(&study.slug);
            Ok(Json(CaseStudyResponse {
                summary: CaseStudySummaryResponse::new(study, locale),
                locale,
                body,
                alternates,
            })
            .into_response())
        }
        SlugLookup::Redirect(canonical) => redirect_to_slug("case-studies", &canonical, locale),
    }
}

// ── POST /case-studies ───────────────────────────────────────────────────────

pub async fn submit_case_study(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
    JsonBody(input): JsonBody<CaseStudySubmission>,
) -> Result<(StatusCode, Json<SubmittedResponse>), ContentServiceError> {
    let usecase = SubmitCaseStudyUseCase { repo: state.cms() };
    let id = usecase.execute(&session.external_id, locale, input).await?;
    Ok((StatusCode::CREATED, Json(SubmittedResponse { id })))
}

// ── GET /users/@me/case-studies ──────────────────────────────────────────────

pub async fn list_my_case_studies(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<Vec<SubmissionResponse>>, ContentServiceError> {
    let usecase = ListMyCaseStudiesUseCase { repo: state.cms() };
    let studies = usecase.execute(&session.external_id).await?;
    Ok(Json(
        studies
            .into_iter()
            .map(|s| SubmissionResponse {
                status: s.status,
                created_at: s.created_at,
                summary: CaseStudySummaryResponse::new(s, locale),
            })
            .collect(),
    ))
}
