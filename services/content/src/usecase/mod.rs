pub mod case_study;
pub mod news;
pub mod page;
pub mod resource;
pub mod submission;
pub mod taxonomy;

use serde::Deserialize;

use commons_domain::locale::Locale;
use commons_domain::pagination::{Page, PageRequest};

use crate::domain::listing::{Listable, SortBy, sort_items};

/// Query parameters shared by every list endpoint.
///
/// Endpoint-specific filters live next to their use case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub tag: Option<String>,
    pub sort: Option<String>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.per_page, self.page)
    }

    pub fn sort_by(&self) -> SortBy {
        SortBy::from_query(self.sort.as_deref())
    }

    /// Tag filter, sort and page in one pass.
    pub(crate) fn apply<T: Listable>(&self, mut items: Vec<T>, locale: Locale) -> Page<T> {
        if let Some(tag) = self.tag.as_deref() {
            items.retain(|item| item.has_tag(tag));
        }
        sort_items(&mut items, self.sort_by(), locale);
        Page::from_vec(items, self.page_request())
    }
}
