//! CMS documents as the content API projects them.
//!
//! Field names follow the CMS's camelCase; `_id`/`_type` are its system keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use commons_domain::locale::{Locale, LocalizedText};
use commons_domain::review::ReviewStatus;

// ── Taxonomy ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub label: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: LocalizedText,
    pub website: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub summary: LocalizedText,
    pub organization: Option<Organization>,
}

// ── Pages ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub slug: LocalizedText,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A section of a marketing page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub enum Block {
    #[serde(rename_all = "camelCase")]
    Hero {
        #[serde(default)]
        heading: LocalizedText,
        #[serde(default)]
        subheading: LocalizedText,
        #[serde(default)]
        cta_label: LocalizedText,
        cta_href: Option<String>,
    },
    Grid {
        #[serde(default)]
        heading: LocalizedText,
        #[serde(default)]
        items: Vec<GridItem>,
    },
    Faq {
        #[serde(default)]
        heading: LocalizedText,
        #[serde(default)]
        items: Vec<FaqItem>,
    },
    /// Block types this service does not render.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridItem {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub body: LocalizedText,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaqItem {
    #[serde(default)]
    pub question: LocalizedText,
    #[serde(default)]
    pub answer: LocalizedText,
}

// ── News ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPost {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub slug: LocalizedText,
    #[serde(default)]
    pub excerpt: LocalizedText,
    /// Only projected for single-post reads.
    #[serde(default)]
    pub body: LocalizedText,
    pub published_at: Option<DateTime<Utc>>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

// ── Case studies ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub slug: LocalizedText,
    #[serde(default)]
    pub summary: LocalizedText,
    #[serde(default)]
    pub body: LocalizedText,
    #[serde(default)]
    pub status: ReviewStatus,
    pub country: Option<String>,
    pub organization: Option<Organization>,
    /// Free-text organization given by a submitter not linked to a document.
    pub organization_name: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub published_at: Option<DateTime<Utc>>,
    pub submitted_by: Option<String>,
    #[serde(rename = "_createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A new case study as written to the CMS.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCaseStudy {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type")]
    pub doc_type: &'static str,
    pub title: LocalizedText,
    pub slug: LocalizedText,
    pub summary: LocalizedText,
    #[serde(skip_serializing_if = "LocalizedText::is_empty")]
    pub body: LocalizedText,
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    pub contact_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub tags: Vec<Reference>,
    pub submitted_by: String,
    pub submitted_locale: Locale,
}

pub const CASE_STUDY_TYPE: &str = "caseStudy";

/// Link to another CMS document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    #[serde(rename = "_type")]
    pub ref_type: &'static str,
    #[serde(rename = "_ref")]
    pub id: String,
    /// Array items need a stable key in the CMS.
    #[serde(rename = "_key")]
    pub key: String,
}

impl Reference {
    pub fn to(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            ref_type: "reference",
            key: id.clone(),
            id,
        }
    }
}

// ── Resources ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSource {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub summary: LocalizedText,
    pub url: String,
    pub publisher: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub summary: LocalizedText,
    pub file_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    External,
    Report,
}

impl ResourceKind {
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "external" => Some(Self::External),
            "report" => Some(Self::Report),
            _ => None,
        }
    }
}

/// External sources and reports merged into one list.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub id: String,
    pub title: LocalizedText,
    pub summary: LocalizedText,
    pub url: Option<String>,
    pub publisher: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
}

impl From<ExternalSource> for Resource {
    fn from(source: ExternalSource) -> Self {
        Self {
            kind: ResourceKind::External,
            id: source.id,
            title: source.title,
            summary: source.summary,
            url: Some(source.url),
            publisher: source.publisher,
            published_at: source.published_at,
            tags: source.tags,
        }
    }
}

impl From<Report> for Resource {
    fn from(report: Report) -> Self {
        Self {
            kind: ResourceKind::Report,
            id: report.id,
            title: report.title,
            summary: report.summary,
            url: report.file_url,
            publisher: None,
            published_at: report.published_at,
            tags: report.tags,
        }
    }
}

/// Lower-case, ASCII, hyphen-separated form of a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
