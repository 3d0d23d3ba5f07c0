//! Resolution of a requested slug against a document's per-locale slugs.

use std::collections::BTreeMap;

use commons_domain::locale::{Locale, LocalizedText};

/// Outcome of looking a document up by slug for a locale.
#[derive(Debug, Clone, PartialEq)]
pub enum SlugLookup<T> {
    /// The slug is the document's slug for the requested locale.
    Found(T),
    /// The slug belongs to another locale; the canonical slug for the
    /// requested locale is carried.
    Redirect(String),
}

impl<T> SlugLookup<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SlugLookup<U> {
        match self {
            Self::Found(doc) => SlugLookup::Found(f(doc)),
            Self::Redirect(slug) => SlugLookup::Redirect(slug),
        }
    }
}

/// Decide whether `requested` should be served as is or redirected.
///
/// `None` when the document has no such slug in any locale. A document with
/// no slug for `locale` is served under whatever slug matched.
pub fn resolve<T>(
    doc: T,
    slugs: &LocalizedText,
    requested: &str,
    locale: Locale,
) -> Option<SlugLookup<T>> {
    let matched = slugs.locale_of(requested, locale)?;
    if matched == locale {
        return Some(SlugLookup::Found(doc));
    }
    match slugs.get(locale) {
        Some(canonical) => Some(SlugLookup::Redirect(canonical.to_owned())),
        None => Some(SlugLookup::Found(doc)),
    }
}

/// Locale → slug map for `hreflang`-style alternates.
pub fn alternates(slugs: &LocalizedText) -> BTreeMap<Locale, String> {
    slugs
        .iter()
        .map(|(locale, slug)| (locale, slug.to_owned()))
        .collect()
}
