use std::collections::HashSet;

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use commons_core::validation::{FieldError, FieldErrors};
use commons_domain::locale::{Locale, LocalizedText};
use commons_domain::review::ReviewStatus;

use crate::domain::repository::CmsRepository;
use crate::domain::types::{CASE_STUDY_TYPE, NewCaseStudy, Reference, slugify};
use crate::error::ContentServiceError;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CaseStudySubmission {
    #[validate(length(min = 5, max = 120))]
    pub title: String,
    #[validate(length(min = 20, max = 500))]
    pub summary: String,
    #[validate(length(max = 20000))]
    pub body: Option<String>,
    #[validate(custom(function = "validate_country"))]
    pub country: Option<String>,
    #[validate(length(max = 150))]
    pub organization_name: Option<String>,
    #[validate(email)]
    pub contact_email: String,
    #[validate(url)]
    pub website: Option<String>,
    /// Tag document ids.
    #[serde(default)]
    #[validate(length(max = 10))]
    pub tags: Vec<String>,
}

/// ISO 3166-1 alpha-2 shape: two ASCII letters.
fn validate_country(country: &str) -> Result<(), ValidationError> {
    if country.len() == 2 && country.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("country"))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl CaseStudySubmission {
    /// Trims text fields and drops blank optional ones, so length rules see the stored values.
    fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_owned(),
            summary: self.summary.trim().to_owned(),
            body: non_blank(self.body),
            country: non_blank(self.country).map(|c| c.to_ascii_uppercase()),
            organization_name: non_blank(self.organization_name),
            contact_email: self.contact_email.trim().to_owned(),
            website: non_blank(self.website),
            ..self
        }
    }
}

/// Slug unique per submission: the title's slug plus a short id suffix.
fn submission_slug(title: &str, id: &str) -> String {
    let suffix = id.get(..8).unwrap_or(id);
    match slugify(title) {
        base if base.is_empty() => id.to_owned(),
        base => format!("{base}-{suffix}"),
    }
}

pub struct SubmitCaseStudyUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> SubmitCaseStudyUseCase<R> {
    /// Write the submission to the CMS for review and return its id.
    ///
    /// Localized fields are filled for the submitter's `locale` only.
    pub async fn execute(
        &self,
        external_id: &str,
        locale: Locale,
        input: CaseStudySubmission,
    ) -> Result<String, ContentServiceError> {
        let input = input.normalized();
        input.validate()?;
        self.check_tags(&input.tags).await?;

        let mut tags: Vec<String> = Vec::with_capacity(input.tags.len());
        for tag in input.tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let id = Uuid::new_v4().to_string();
        let doc = NewCaseStudy {
            slug: LocalizedText::single(locale, submission_slug(&input.title, &id)),
            title: LocalizedText::single(locale, input.title),
            summary: LocalizedText::single(locale, input.summary),
            body: input
                .body
                .map(|body| LocalizedText::single(locale, body))
                .unwrap_or_default(),
            id: id.clone(),
            doc_type: CASE_STUDY_TYPE,
            status: ReviewStatus::InReview,
            country: input.country,
            organization_name: input.organization_name,
            contact_email: input.contact_email,
            website: input.website,
            tags: tags.into_iter().map(Reference::to).collect(),
            submitted_by: external_id.to_owned(),
            submitted_locale: locale,
        };

        self.repo.create_case_study(&doc).await?;
        tracing::info!(case_study_id = %id, submitted_by = external_id, %locale, "case study submitted");
        Ok(id)
    }

    async fn check_tags(&self, tags: &[String]) -> Result<(), ContentServiceError> {
        if tags.is_empty() {
            return Ok(());
        }
        let known: HashSet<String> = self
            .repo
            .list_tags()
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        let mut errors = FieldErrors::default();
        for (index, tag) in tags.iter().enumerate() {
            if !known.contains(tag) {
                errors.push(
                    FieldError::new(format!("tags[{index}]"), "unknown_tag")
                        .with_message(format!("no tag with id `{tag}`")),
                );
            }
        }
        errors.into_result().map_err(ContentServiceError::Validation)
    }
}
