use serde::Deserialize;

use commons_domain::locale::Locale;
use commons_domain::pagination::Page;

use crate::domain::repository::CmsRepository;
use crate::domain::types::{Resource, ResourceKind};
use crate::error::ContentServiceError;
use crate::usecase::ListQuery;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceFilter {
    pub kind: Option<String>,
}

impl ResourceFilter {
    /// `None` means both kinds.
    pub fn kind(&self) -> Result<Option<ResourceKind>, ContentServiceError> {
        match self.kind.as_deref() {
            None | Some("") => Ok(None),
            Some(value) => ResourceKind::from_query(value).map(Some).ok_or_else(|| {
                ContentServiceError::InvalidQuery(format!(
                    "kind must be `external` or `report`, got `{value}`"
                ))
            }),
        }
    }
}

pub struct ListResourcesUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> ListResourcesUseCase<R> {
    pub async fn execute(
        &self,
        query: &ListQuery,
        filter: &ResourceFilter,
        locale: Locale,
    ) -> Result<Page<Resource>, ContentServiceError> {
        let resources: Vec<Resource> = match filter.kind()? {
            Some(ResourceKind::External) => self
                .repo
                .list_external_sources()
                .await?
                .into_iter()
                .map(Resource::from)
                .collect(),
            Some(ResourceKind::Report) => self
                .repo
                .list_reports()
                .await?
                .into_iter()
                .map(Resource::from)
                .collect(),
            None => {
                let (sources, reports) =
                    tokio::try_join!(self.repo.list_external_sources(), self.repo.list_reports())?;
                sources
                    .into_iter()
                    .map(Resource::from)
                    .chain(reports.into_iter().map(Resource::from))
                    .collect()
            }
        };
        Ok(query.apply(resources, locale))
    }
}
