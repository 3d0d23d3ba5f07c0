use commons_domain::locale::Locale;

use crate::domain::repository::CmsRepository;
use crate::domain::slug::{SlugLookup, resolve};
use crate::domain::types::Page;
use crate::error::ContentServiceError;

pub struct GetPageUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> GetPageUseCase<R> {
    pub async fn execute(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<SlugLookup<Page>, ContentServiceError> {
        let page = self
            .repo
            .find_page(slug)
            .await?
            .ok_or(ContentServiceError::PageNotFound)?;
        let slugs = page.slug.clone();
        resolve(page, &slugs, slug, locale).ok_or(ContentServiceError::PageNotFound)
    }
}
