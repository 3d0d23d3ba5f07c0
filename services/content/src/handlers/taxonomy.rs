use axum::{Json, extract::State};
use serde::Serialize;

use commons_domain::locale::Locale;

use crate::domain::types::{Organization, Project, Tag};
use crate::error::ContentServiceError;
use crate::handlers::locale::RequestLocale;
use crate::state::AppState;
use crate::usecase::taxonomy::{ListOrganizationsUseCase, ListProjectsUseCase, ListTagsUseCase};

#[derive(Serialize)]
pub struct TagResponse {
    pub id: String,
    pub slug: String,
    pub label: String,
}

impl TagResponse {
    pub fn new(tag: Tag, locale: Locale) -> Self {
        let label = match tag.label.resolve(locale) {
            "" => tag.slug.clone(),
            label => label.to_owned(),
        };
        Self {
            id: tag.id,
            slug: tag.slug,
            label,
        }
    }

    pub fn list(tags: Vec<Tag>, locale: Locale) -> Vec<Self> {
        tags.into_iter().map(|t| Self::new(t, locale)).collect()
    }
}

#[derive(Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub country: Option<String>,
}

impl OrganizationResponse {
    pub fn new(org: Organization, locale: Locale) -> Self {
        Self {
            description: org.description.resolve(locale).to_owned(),
            id: org.id,
            slug: org.slug,
            name: org.name,
            website: org.website,
            country: org.country,
        }
    }
}

#[derive(Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub summary: String,
    pub organization: Option<OrganizationResponse>,
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn list_tags(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<Vec<TagResponse>>, ContentServiceError> {
    let usecase = ListTagsUseCase { repo: state.cms() };
    let tags = usecase.execute(locale).await?;
    Ok(Json(TagResponse::list(tags, locale)))
}

// ── GET /organizations ───────────────────────────────────────────────────────

pub async fn list_organizations(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<Vec<OrganizationResponse>>, ContentServiceError> {
    let usecase = ListOrganizationsUseCase { repo: state.cms() };
    let organizations = usecase.execute().await?;
    Ok(Json(
        organizations
            .into_iter()
            .map(|o| OrganizationResponse::new(o, locale))
            .collect(),
    ))
}

// ── GET /projects ────────────────────────────────────────────────────────────

pub async fn list_projects(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<Vec<ProjectResponse>>, ContentServiceError> {
    let usecase = ListProjectsUseCase { repo: state.cms() };
    let projects = usecase.execute(locale).await?;
    Ok(Json(
        projects
            .into_iter()
            .map(|p: Project| ProjectResponse {
                name: p.name.resolve(locale).to_owned(),
                summary: p.summary.resolve(locale).to_owned(),
                organization: p.organization.map(|o| OrganizationResponse::new(o, locale)),
                id: p.id,
                slug: p.slug,
            })
            .collect(),
    ))
}
