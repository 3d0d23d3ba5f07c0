use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use commons_domain::community::CommunityRole;
use commons_domain::user::{AgeGroup, ExpertiseArea, UserRole, WorkType};

/// Maximum number of recent-work entries per user.
pub const MAX_RECENT_WORKS: usize = 5;

/// Usernames that collide with routes or impersonate staff.
pub const RESERVED_USERNAMES: &[&str] = &[
    "about", "account", "admin", "administrator", "api", "app", "auth", "blog", "communities",
    "community", "contact", "dashboard", "help", "login", "logout", "me", "moderator", "new",
    "news", "null", "profile", "register", "resources", "root", "settings", "signin", "signout",
    "signup", "staff", "support", "system", "undefined", "users", "webhooks",
];

/// Member account with profile fields.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    /// Identity-provider user id.
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub work_types: Vec<WorkType>,
    pub expertise_areas: Vec<ExpertiseArea>,
    pub social_links: SocialLinks,
    pub avatar_key: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Partial profile update. `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<Option<String>>,
    pub username: Option<String>,
    pub bio: Option<Option<String>>,
    pub age_group: Option<Option<AgeGroup>>,
    pub country: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub organization: Option<Option<String>>,
    pub position: Option<Option<String>>,
    pub work_types: Option<Vec<WorkType>>,
    pub expertise_areas: Option<Vec<ExpertiseArea>>,
    pub social_links: Option<SocialLinksChanges>,
}

/// Per-link patch merged into the stored [`SocialLinks`]; same `None`/`Some(None)` rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinksChanges {
    pub website: Option<Option<String>>,
    pub linkedin: Option<Option<String>>,
    pub twitter: Option<Option<String>>,
    pub github: Option<Option<String>>,
    pub instagram: Option<Option<String>>,
}

impl SocialLinksChanges {
    pub fn apply_to(&self, links: &mut SocialLinks) {
        let merge = |slot: &mut Option<String>, change: &Option<Option<String>>| {
            if let Some(value) = change {
                *slot = value.clone();
            }
        };
        merge(&mut links.website, &self.website);
        merge(&mut links.linkedin, &self.linkedin);
        merge(&mut links.twitter, &self.twitter);
        merge(&mut links.github, &self.github);
        merge(&mut links.instagram, &self.instagram);
    }
}

/// User record as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    /// Adopted on first insert only, and only when valid and free.
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentWork {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_ongoing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecentWork {
    /// Display order: ongoing entries first, then newest start date.
    pub fn display_order(a: &Self, b: &Self) -> Ordering {
        b.is_ongoing
            .cmp(&a.is_ongoing)
            .then(b.start_date.cmp(&a.start_date))
            .then(b.created_at.cmp(&a.created_at))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Community with its current member count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunitySummary {
    pub community: Community,
    pub member_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub user_id: Uuid,
    pub community_id: Uuid,
    pub role: CommunityRole,
    pub joined_at: DateTime<Utc>,
}

/// Why a username cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsernameProblem {
    Invalid,
    Reserved,
    Taken,
}

/// Normalize a requested username to its stored (lower-case) form and check
/// the format and reserved-word rules.
///
/// 3–30 characters of `[a-z0-9_-]`, starting with a letter.
pub fn validate_username(raw: &str) -> Result<String, UsernameProblem> {
    let username = raw.trim().to_ascii_lowercase();
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return Err(UsernameProblem::Invalid);
    }
    if !username.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(UsernameProblem::Invalid);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(UsernameProblem::Invalid);
    }
    if RESERVED_USERNAMES.contains(&username.as_str()) {
        return Err(UsernameProblem::Reserved);
    }
    Ok(username)
}

/// Community slug: 3–50 characters of `[a-z0-9-]`.
pub fn is_valid_community_slug(slug: &str) -> bool {
    (3..=50).contains(&slug.len())
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
