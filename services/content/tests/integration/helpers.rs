use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use commons_content::domain::repository::CmsRepository;
use commons_content::domain::types::{
    CaseStudy, ExternalSource, NewCaseStudy, NewsPost, Organization, Page, Project, Report, Tag,
};
use commons_content::error::ContentServiceError;

pub type Shared<T> = Arc<Mutex<Vec<T>>>;

/// Deserialize a fixture from the CMS's JSON shape.
pub fn doc<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

pub fn tag_json(slug: &str) -> Value {
    json!({"_id": format!("tag-{slug}"), "slug": slug, "label": {"en": slug.to_uppercase()}})
}

pub fn test_tag(slug: &str) -> Tag {
    doc(tag_json(slug))
}

pub fn test_page() -> Page {
    doc(json!({
        "_id": "page-about",
        "title": {"en": "About us", "es": "Sobre nosotros"},
        "slug": {"en": "about-us", "es": "sobre-nosotros"},
        "blocks": [
            {"_type": "hero", "heading": {"en": "Who we are", "es": "Quiénes somos"}, "ctaLabel": {"en": "Join"}, "ctaHref": "/join"},
            {"_type": "faq", "heading": {"en": "FAQ"}, "items": [{"question": {"en": "Free?"}, "answer": {"en": "Yes", "fr": "Oui"}}]},
            {"_type": "embed", "html": "<iframe>"}
        ]
    }))
}

/// `day` of May 2025, or undated.
pub fn test_news(slug: &str, day: Option<u32>, tags: &[&str]) -> NewsPost {
    doc(json!({
        "_id": format!("news-{slug}"),
        "title": {"en": slug.replace('-', " ")},
        "slug": {"en": slug, "es": format!("{slug}-es")},
        "excerpt": {"en": "Short"},
        "body": {"en": "Long body", "es": "Cuerpo"},
        "publishedAt": day.map(|d| format!("2025-05-{d:02}T09:00:00Z")),
        "tags": tags.iter().map(|t| tag_json(t)).collect::<Vec<_>>(),
    }))
}

pub fn test_case_study(slug: &str, status: &str, country: &str, day: u32) -> CaseStudy {
    doc(json!({
        "_id": format!("cs-{slug}"),
        "_createdAt": format!("2025-04-{day:02}T12:00:00Z"),
        "title": {"en": slug.replace('-', " ")},
        "slug": {"en": slug, "pt": format!("{slug}-pt")},
        "summary": {"en": "A summary of the work"},
        "body": {"en": "Full story"},
        "status": status,
        "country": country,
        "organization": {"_id": "org-rio", "slug": "rio-alliance", "name": "Rio Alliance"},
        "publishedAt": format!("2025-05-{day:02}T09:00:00Z"),
        "submittedBy": "user_author",
        "tags": [tag_json("water")],
    }))
}

pub fn test_external(id: &str, title: &str, tags: &[&str]) -> ExternalSource {
    doc(json!({
        "_id": id,
        "title": {"en": title},
        "url": format!("https://example.org/{id}"),
        "publisher": "UNEP",
        "publishedAt": "2024-11-01T00:00:00Z",
        "tags": tags.iter().map(|t| tag_json(t)).collect::<Vec<_>>(),
    }))
}

pub fn test_report(id: &str, title: &str) -> Report {
    doc(json!({
        "_id": id,
        "title": {"en": title},
        "fileUrl": format!("https://cdn.test/{id}.pdf"),
        "publishedAt": "2025-01-15T00:00:00Z",
    }))
}

// ── MockCms ──────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCms {
    pub pages: Vec<Page>,
    pub news: Vec<NewsPost>,
    pub case_studies: Vec<CaseStudy>,
    pub external_sources: Vec<ExternalSource>,
    pub reports: Vec<Report>,
    pub tags: Vec<Tag>,
    pub organizations: Vec<Organization>,
    pub projects: Vec<Project>,
    pub created: Shared<NewCaseStudy>,
    pub fail_writes: bool,
}

impl MockCms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<NewCaseStudy> {
        self.created.lock().unwrap().clone()
    }
}

fn matches_slug(slugs: &commons_domain::locale::LocalizedText, slug: &str) -> bool {
    slugs.iter().any(|(_, s)| s == slug)
}

impl CmsRepository for MockCms {
    async fn find_page(&self, slug: &str) -> Result<Option<Page>, ContentServiceError> {
        Ok(self.pages.iter().find(|p| matches_slug(&p.slug, slug)).cloned())
    }

    async fn list_news(&self) -> Result<Vec<NewsPost>, ContentServiceError> {
        Ok(self.news.clone())
    }

    async fn find_news_post(&self, slug: &str) -> Result<Option<NewsPost>, ContentServiceError> {
        Ok(self.news.iter().find(|p| matches_slug(&p.slug, slug)).cloned())
    }

    async fn list_published_case_studies(&self) -> Result<Vec<CaseStudy>, ContentServiceError> {
        // Deliberately unfiltered: status filtering is checked in the use cases.
        Ok(self.case_studies.clone())
    }

    async fn find_published_case_study(
        &self,
        slug: &str,
    ) -> Result<Option<CaseStudy>, ContentServiceError> {
        Ok(self
            .case_studies
            .iter()
            .find(|s| matches_slug(&s.slug, slug))
            .cloned())
    }

    async fn list_case_studies_by_submitter(
        &self,
        _external_id: &str,
    ) -> Result<Vec<CaseStudy>, ContentServiceError> {
        Ok(self.case_studies.clone())
    }

    async fn create_case_study(&self, doc: &NewCaseStudy) -> Result<(), ContentServiceError> {
        if self.fail_writes {
            return Err(ContentServiceError::Unavailable(anyhow::anyhow!(
                "cms write rejected"
            )));
        }
        self.created.lock().unwrap().push(doc.clone());
        Ok(())
    }

    async fn list_external_sources(&self) -> Result<Vec<ExternalSource>, ContentServiceError> {
        Ok(self.external_sources.clone())
    }

    async fn list_reports(&self) -> Result<Vec<Report>, ContentServiceError> {
        Ok(self.reports.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ContentServiceError> {
        Ok(self.tags.clone())
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, ContentServiceError> {
        Ok(self.organizations.clone())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ContentServiceError> {
        Ok(self.projects.clone())
    }
}
