use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use commons_domain::locale::Locale;
use commons_domain::pagination::Page;

use crate::domain::slug::{SlugLookup, alternates};
use crate::domain::types::NewsPost;
use crate::error::ContentServiceError;
use crate::handlers::locale::RequestLocale;
use crate::handlers::taxonomy::TagResponse;
use crate::handlers::{QueryParams, redirect_to_slug};
use crate::state::AppState;
use crate::usecase::ListQuery;
use crate::usecase::news::{GetNewsPostUseCase, ListNewsUseCase};

#[derive(Serialize)]
pub struct NewsSummaryResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[serde(serialize_with = "commons_core::serde::to_rfc3339_ms_opt")]
    pub published_at: Option<DateTime<Utc>>,
    pub cover_image_url: Option<String>,
    pub tags: Vec<TagResponse>,
}

impl NewsSummaryResponse {
    fn new(post: NewsPost, locale: Locale) -> Self {
        Self {
            title: post.title.resolve(locale).to_owned(),
            slug: post.slug.resolve(locale).to_owned(),
            excerpt: post.excerpt.resolve(locale).to_owned(),
            tags: TagResponse::list(post.tags, locale),
            id: post.id,
            published_at: post.published_at,
            cover_image_url: post.cover_image_url,
        }
    }
}

#[derive(Serialize)]
pub struct NewsPostResponse {
    #[serde(flatten)]
    pub summary: NewsSummaryResponse,
    pub locale: Locale,
    pub body: String,
    pub alternates: BTreeMap<Locale, String>,
}

// ── GET /news ────────────────────────────────────────────────────────────────

pub async fn list_news(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Page<NewsSummaryResponse>>, ContentServiceError> {
    let usecase = ListNewsUseCase { repo: state.cms() };
    let page = usecase.execute(&query, locale).await?;
    Ok(Json(page.map(|p| NewsSummaryResponse::new(p, locale))))
}

// ── GET /news/{slug} ─────────────────────────────────────────────────────────

pub async fn get_news_post(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(slug): Path<String>,
) -> Result<Response, ContentServiceError> {
    let usecase = GetNewsPostUseCase { repo: state.cms() };
    match usecase.execute(&slug, locale).await? {
        SlugLookup::Found(post) => {
            let body = post.body.resolve(locale).to_owned();
            let alternates = alternates(&post.slug);
            Ok(Json(NewsPostResponse {
                summary: NewsSummaryResponse::new(post, locale),
                locale,
                body,
                alternates,
            })
            .into_response())
        }
        SlugLookup::Redirect(canonical) => redirect_to_slug("news", &canonical, locale),
    }
}
