use serde::Deserialize;

use commons_domain::locale::Locale;
use commons_domain::pagination::Page;

use crate::domain::listing::matches_organization;
use crate::domain::repository::CmsRepository;
use crate::domain::slug::{SlugLookup, resolve};
use crate::domain::types::CaseStudy;
use crate::error::ContentServiceError;
use crate::usecase::ListQuery;

/// Filters accepted by `GET /case-studies` on top of [`ListQuery`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseStudyFilter {
    pub country: Option<String>,
    pub organization: Option<String>,
}

impl CaseStudyFilter {
    fn matches(&self, study: &CaseStudy) -> bool {
        let country = self.country.as_deref().is_none_or(|wanted| {
            study
                .country
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(wanted))
        });
        let organization = self
            .organization
            .as_deref()
            .is_none_or(|wanted| matches_organization(study, wanted));
        country && organization
    }
}

// ── ListCaseStudies ──────────────────────────────────────────────────────────

pub struct ListCaseStudiesUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> ListCaseStudiesUseCase<R> {
    pub async fn execute(
        &self,
        query: &ListQuery,
        filter: &CaseStudyFilter,
        locale: Locale,
    ) -> Result<Page<CaseStudy>, ContentServiceError> {
        let mut studies = self.repo.list_published_case_studies().await?;
        studies.retain(|s| s.status.is_public() && filter.matches(s));
        Ok(query.apply(studies, locale))
    }
}

// ── GetCaseStudy ─────────────────────────────────────────────────────────────

pub struct GetCaseStudyUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> GetCaseStudyUseCase<R> {
    pub async fn execute(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<SlugLookup<CaseStudy>, ContentServiceError> {
        let study = self
            .repo
            .find_published_case_study(slug)
            .await?
            .filter(|s| s.status.is_public())
            .ok_or(ContentServiceError::CaseStudyNotFound)?;
        let slugs = study.slug.clone();
        resolve(study, &slugs, slug, locale).ok_or(ContentServiceError::CaseStudyNotFound)
    }
}

// ── ListMyCaseStudies ────────────────────────────────────────────────────────

pub struct ListMyCaseStudiesUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> ListMyCaseStudiesUseCase<R> {
    /// Every submission of the caller regardless of review status.
    pub async fn execute(&self, external_id: &str) -> Result<Vec<CaseStudy>, ContentServiceError> {
        let mut studies = self.repo.list_case_studies_by_submitter(external_id).await?;
        studies.retain(|s| s.submitted_by.as_deref() == Some(external_id));
        studies.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(studies)
    }
}
