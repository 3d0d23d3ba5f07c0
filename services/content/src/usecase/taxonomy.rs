use commons_domain::locale::Locale;

use crate::domain::repository::CmsRepository;
use crate::domain::types::{Organization, Project, Tag};
use crate::error::ContentServiceError;

fn sort_key(value: &str) -> String {
    value.to_lowercase()
}

pub struct ListTagsUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> ListTagsUseCase<R> {
    /// Sorted by label in `locale`, falling back to the slug for unlabeled tags.
    pub async fn execute(&self, locale: Locale) -> Result<Vec<Tag>, ContentServiceError> {
        let mut tags = self.repo.list_tags().await?;
        tags.sort_by_cached_key(|t| {
            let label = t.label.resolve(locale);
            let label = if label.is_empty() { t.slug.as_str() } else { label };
            (sort_key(label), t.id.clone())
        });
        Ok(tags)
    }
}

pub struct ListOrganizationsUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> ListOrganizationsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Organization>, ContentServiceError> {
        let mut organizations = self.repo.list_organizations().await?;
        organizations.sort_by_cached_key(|o| (sort_key(&o.name), o.id.clone()));
        Ok(organizations)
    }
}

pub struct ListProjectsUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> ListProjectsUseCase<R> {
    pub async fn execute(&self, locale: Locale) -> Result<Vec<Project>, ContentServiceError> {
        let mut projects = self.repo.list_projects().await?;
        projects.sort_by_cached_key(|p| (sort_key(p.name.resolve(locale)), p.id.clone()));
        Ok(projects)
    }
}
