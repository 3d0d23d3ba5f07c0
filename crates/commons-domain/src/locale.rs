//! Site locales and per-locale text.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A locale the site is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Es,
    Fr,
    Pt,
}

impl Locale {
    pub const DEFAULT: Self = Self::En;
    pub const ALL: [Self; 4] = [Self::En, Self::Es, Self::Fr, Self::Pt];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::Pt => "pt",
        }
    }

    /// Pick the preferred supported language from an `Accept-Language` header.
    ///
    /// Quality weights are honoured; region subtags are ignored (`pt-BR` → `pt`).
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, usize, Self)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, part)| {
                let mut pieces = part.trim().split(';');
                let tag = pieces.next()?.trim();
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                let locale = tag.parse::<Self>().ok()?;
                (quality > 0.0).then_some((quality, position, locale))
            })
            .collect();
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|(_, _, locale)| *locale)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    /// Accepts a bare language (`es`) or a language-region tag (`es-MX`, `es_MX`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            "fr" => Ok(Self::Fr),
            "pt" => Ok(Self::Pt),
            _ => Err(UnsupportedLocale(s.to_owned())),
        }
    }
}

/// A string field stored once per locale.
///
/// CMS documents carry extra bookkeeping keys (`_type`, `_key`) next to the
/// locale codes; those and unknown locales are dropped on deserialization.
/// Empty strings count as missing, and so does a `null` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Option<BTreeMap<String, serde_json::Value>>",
    into = "BTreeMap<String, String>"
)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(locale: Locale, value: impl Into<String>) -> Self {
        let mut text = Self::new();
        text.set(locale, value);
        text
    }

    pub fn set(&mut self, locale: Locale, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.0.remove(&locale);
        } else {
            self.0.insert(locale, value);
        }
    }

    pub fn get(&self, locale: Locale) -> Option<&str> {
        self.0.get(&locale).map(String::as_str)
    }

    /// Value for `locale`, falling back to the default locale, then to any value.
    pub fn resolve(&self, locale: Locale) -> &str {
        self.get(locale)
            .or_else(|| self.get(Locale::DEFAULT))
            .or_else(|| self.0.values().next().map(String::as_str))
            .unwrap_or_default()
    }

    /// Locale whose value equals `value`, preferring `preferred` on ties.
    pub fn locale_of(&self, value: &str, preferred: Locale) -> Option<Locale> {
        if self.get(preferred) == Some(value) {
            return Some(preferred);
        }
        self.0
            .iter()
            .find_map(|(locale, v)| (v == value).then_some(*locale))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Locale, &str)> {
        self.0.iter().map(|(l, v)| (*l, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for LocalizedText {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let mut text = Self::new();
        for (key, value) in raw {
            if key.starts_with('_') {
                continue;
            }
            if let (Ok(locale), serde_json::Value::String(s)) = (key.parse::<Locale>(), value) {
                text.set(locale, s);
            }
        }
        text
    }
}

impl From<Option<BTreeMap<String, serde_json::Value>>> for LocalizedText {
    fn from(raw: Option<BTreeMap<String, serde_json::Value>>) -> Self {
        raw.map(Self::from).unwrap_or_default()
    }
}

impl From<LocalizedText> for BTreeMap<String, String> {
    fn from(text: LocalizedText) -> Self {
        text.0
            .into_iter()
            .map(|(locale, value)| (locale.as_str().to_owned(), value))
            .collect()
    }
}
