#![allow(async_fn_in_trait)]

use crate::domain::types::{
    CaseStudy, ExternalSource, NewCaseStudy, NewsPost, Organization, Page, Project, Report, Tag,
};
use crate::error::ContentServiceError;

/// Read and write access to the headless CMS.
///
/// Slug lookups match the slug of any locale; deciding between serving and
/// redirecting is left to the caller.
pub trait CmsRepository: Send + Sync {
    async fn find_page(&self, slug: &str) -> Result<Option<Page>, ContentServiceError>;

    /// Posts with a publish date, without bodies.
    async fn list_news(&self) -> Result<Vec<NewsPost>, ContentServiceError>;
    async fn find_news_post(&self, slug: &str) -> Result<Option<NewsPost>, ContentServiceError>;

    /// Case studies with status `published`, without bodies.
    async fn list_published_case_studies(&self) -> Result<Vec<CaseStudy>, ContentServiceError>;
    async fn find_published_case_study(
        &self,
        slug: &str,
    ) -> Result<Option<CaseStudy>, ContentServiceError>;
    /// Every case study submitted by `external_id`, newest first, any status.
    async fn list_case_studies_by_submitter(
        &self,
        external_id: &str,
    ) -> Result<Vec<CaseStudy>, ContentServiceError>;
    /// Fails with `Unavailable` when the CMS rejects or cannot take the write.
    async fn create_case_study(&self, doc: &NewCaseStudy) -> Result<(), ContentServiceError>;

    async fn list_external_sources(&self) -> Result<Vec<ExternalSource>, ContentServiceError>;
    async fn list_reports(&self) -> Result<Vec<Report>, ContentServiceError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, ContentServiceError>;
    async fn list_organizations(&self) -> Result<Vec<Organization>, ContentServiceError>;
    async fn list_projects(&self) -> Result<Vec<Project>, ContentServiceError>;
}
