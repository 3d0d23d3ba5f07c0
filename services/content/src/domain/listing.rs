//! Filtering and ordering of CMS lists.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use commons_domain::locale::{Locale, LocalizedText};

use crate::domain::types::{CaseStudy, NewsPost, Resource, Tag};

/// Sort keys accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    PublishedAtDesc,
    PublishedAtAsc,
    Title,
}

impl SortBy {
    pub fn from_kebab_case(value: &str) -> Option<Self> {
        match value {
            "published-at-desc" => Some(Self::PublishedAtDesc),
            "published-at-asc" => Some(Self::PublishedAtAsc),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    /// Unknown or absent keys fall back to the default order.
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(Self::from_kebab_case).unwrap_or_default()
    }
}

/// A document that can appear in a sorted, tag-filtered list.
pub trait Listable {
    fn id(&self) -> &str;
    fn title(&self) -> &LocalizedText;
    fn published_at(&self) -> Option<DateTime<Utc>>;
    fn tags(&self) -> &[Tag];

    /// Matches a tag by slug or id.
    fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t.slug == tag || t.id == tag)
    }
}

macro_rules! impl_listable {
    ($($ty:ty),+) => {
        $(impl Listable for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn title(&self) -> &LocalizedText {
                &self.title
            }

            fn published_at(&self) -> Option<DateTime<Utc>> {
                self.published_at
            }

            fn tags(&self) -> &[Tag] {
                &self.tags
            }
        })+
    };
}

impl_listable!(NewsPost, CaseStudy, Resource);

/// Undated documents sort after dated ones in both directions.
fn by_date(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_items<T: Listable>(items: &mut [T], sort: SortBy, locale: Locale) {
    items.sort_by(|a, b| {
        let primary = match sort {
            SortBy::PublishedAtDesc => by_date(a.published_at(), b.published_at(), true),
            SortBy::PublishedAtAsc => by_date(a.published_at(), b.published_at(), false),
            SortBy::Title => a
                .title()
                .resolve(locale)
                .to_lowercase()
                .cmp(&b.title().resolve(locale).to_lowercase()),
        };
        primary.then_with(|| a.id().cmp(b.id()))
    });
}

/// Case-insensitive match of the organization filter against the linked
/// organization's slug or name, or the free-text name.
pub fn matches_organization(study: &CaseStudy, wanted: &str) -> bool {
    let linked = study.organization.as_ref().is_some_and(|org| {
        org.slug.eq_ignore_ascii_case(wanted) || org.name.eq_ignore_ascii_case(wanted)
    });
    linked
        || study
            .organization_name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
}
