use commons_domain::locale::Locale;
use commons_domain::pagination::Page;

use crate::domain::repository::CmsRepository;
use crate::domain::slug::{SlugLookup, resolve};
use crate::domain::types::NewsPost;
use crate::error::ContentServiceError;
use crate::usecase::ListQuery;

// ── ListNews ─────────────────────────────────────────────────────────────────

pub struct ListNewsUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> ListNewsUseCase<R> {
    pub async fn execute(
        &self,
        query: &ListQuery,
        locale: Locale,
    ) -> Result<Page<NewsPost>, ContentServiceError> {
        let posts = self.repo.list_news().await?;
        Ok(query.apply(posts, locale))
    }
}

// ── GetNewsPost ──────────────────────────────────────────────────────────────

pub struct GetNewsPostUseCase<R: CmsRepository> {
    pub repo: R,
}

impl<R: CmsRepository> GetNewsPostUseCase<R> {
    pub async fn execute(
        &self,
        slug: &str,
        locale: Locale,
    ) -> Result<SlugLookup<NewsPost>, ContentServiceError> {
        let post = self
            .repo
            .find_news_post(slug)
            .await?
            .ok_or(ContentServiceError::NewsPostNotFound)?;
        let slugs = post.slug.clone();
        resolve(post, &slugs, slug, locale).ok_or(ContentServiceError::NewsPostNotFound)
    }
}
