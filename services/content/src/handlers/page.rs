use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use commons_domain::locale::Locale;

use crate::domain::slug::{SlugLookup, alternates};
use crate::domain::types::{Block, FaqItem, GridItem, Page};
use crate::error::ContentServiceError;
use crate::handlers::locale::RequestLocale;
use crate::handlers::redirect_to_slug;
use crate::state::AppState;
use crate::usecase::page::GetPageUseCase;

#[derive(Serialize)]
pub struct PageResponse {
    pub id: String,
    pub locale: Locale,
    pub title: String,
    pub slug: String,
    pub blocks: Vec<BlockResponse>,
    pub alternates: BTreeMap<Locale, String>,
}

/// A page block with every string resolved for one locale.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockResponse {
    Hero {
        heading: String,
        subheading: String,
        cta_label: String,
        cta_href: Option<String>,
    },
    Grid {
        heading: String,
        items: Vec<GridItemResponse>,
    },
    Faq {
        heading: String,
        items: Vec<FaqItemResponse>,
    },
}

#[derive(Debug, PartialEq, Serialize)]
pub struct GridItemResponse {
    pub title: String,
    pub body: String,
    pub href: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct FaqItemResponse {
    pub question: String,
    pub answer: String,
}

impl BlockResponse {
    /// `None` for block types that are not rendered.
    fn new(block: Block, locale: Locale) -> Option<Self> {
        let block = match block {
            Block::Hero {
                heading,
                subheading,
                cta_label,
                cta_href,
            } => Self::Hero {
                heading: heading.resolve(locale).to_owned(),
                subheading: subheading.resolve(locale).to_owned(),
                cta_label: cta_label.resolve(locale).to_owned(),
                cta_href,
            },
            Block::Grid { heading, items } => Self::Grid {
                heading: heading.resolve(locale).to_owned(),
                items: items
                    .into_iter()
                    .map(|item: GridItem| GridItemResponse {
                        title: item.title.resolve(locale).to_owned(),
                        body: item.body.resolve(locale).to_owned(),
                        href: item.href,
                    })
                    .collect(),
            },
            Block::Faq { heading, items } => Self::Faq {
                heading: heading.resolve(locale).to_owned(),
                items: items
                    .into_iter()
                    .map(|item: FaqItem| FaqItemResponse {
                        question: item.question.resolve(locale).to_owned(),
                        answer: item.answer.resolve(locale).to_owned(),
                    })
                    .collect(),
            },
            Block::Unsupported => return None,
        };
        Some(block)
    }
}

impl PageResponse {
    pub fn new(page: Page, locale: Locale) -> Self {
        Self {
            title: page.title.resolve(locale).to_owned(),
            slug: page.slug.resolve(locale).to_owned(),
            alternates: alternates(&page.slug),
            blocks: page
                .blocks
                .into_iter()
                .filter_map(|b| BlockResponse::new(b, locale))
                .collect(),
            id: page.id,
            locale,
        }
    }
}

// ── GET /pages/{slug} ────────────────────────────────────────────────────────

pub async fn get_page(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(slug): Path<String>,
) -> Result<Response, ContentServiceError> {
    let usecase = GetPageUseCase { repo: state.cms() };
    match usecase.execute(&slug, locale).await? {
        SlugLookup::Found(page) => Ok(Json(PageResponse::new(page, locale)).into_response()),
        SlugLookup::Redirect(canonical) => redirect_to_slug("pages", &canonical, locale),
    }
}
