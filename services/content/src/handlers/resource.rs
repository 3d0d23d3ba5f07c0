use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use commons_domain::locale::Locale;
use commons_domain::pagination::Page;

use crate::domain::types::{Resource, ResourceKind};
use crate::error::ContentServiceError;
use crate::handlers::QueryParams;
use crate::handlers::locale::RequestLocale;
use crate::handlers::taxonomy::TagResponse;
use crate::state::AppState;
use crate::usecase::ListQuery;
use crate::usecase::resource::{ListResourcesUseCase, ResourceFilter};

#[derive(Serialize)]
pub struct ResourceResponse {
    pub id: String,
    pub kind: ResourceKind,
    pub title: String,
    pub summary: String,
    pub url: Option<String>,
    pub publisher: Option<String>,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms_opt")]
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<TagResponse>,
}

impl ResourceResponse {
    fn new(resource: Resource, locale: Locale) -> Self {
        Self {
            title: resource.title.resolve(locale).to_owned(),
            summary: resource.summary.resolve(locale).to_owned(),
            tags: TagResponse::list(resource.tags, locale),
            id: resource.id,
            kind: resource.kind,
            url: resource.url,
            publisher: resource.publisher,
            published_at: resource.published_at,
        }
    }
}

// ── GET /resources ───────────────────────────────────────────────────────────

pub async fn list_resources(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    QueryParams(query): QueryParams<ListQuery>,
    QueryParams(filter): QueryParams<ResourceFilter>,
) -> Result<Json<Page<ResourceResponse>>, ContentServiceError> {
    let usecase = ListResourcesUseCase { repo: state.cms() };
    let page = usecase.execute(&query, &filter, locale).await?;
    Ok(Json(page.map(|r| ResourceResponse::new(r, locale))))
}
