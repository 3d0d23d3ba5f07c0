#![allow(async_fn_in_trait)]

use bytes::Bytes;
use uuid::Uuid;

use commons_domain::pagination::PageRequest;

use crate::domain::types::{
    Community, CommunitySummary, IdentityUser, Membership, ProfileChanges, RecentWork, User,
};
use crate::error::MembersServiceError;

/// Repository for member accounts and profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MembersServiceError>;
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, MembersServiceError>;
    /// `username` must already be lower-case.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, MembersServiceError>;

    /// Apply a partial update and return the stored result.
    /// Fails with `UsernameTaken` if the username is claimed concurrently.
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<User, MembersServiceError>;

    async fn set_avatar_key(&self, id: Uuid, key: Option<&str>) -> Result<(), MembersServiceError>;

    /// Insert or refresh a user keyed by external id.
    ///
    /// On conflict only `email`, `name` and `updated_at` change. The username is
    /// written on insert only; if it collides it is dropped rather than failing.
    async fn upsert_identity(&self, identity: &IdentityUser) -> Result<User, MembersServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete_by_external_id(&self, external_id: &str) -> Result<bool, MembersServiceError>;
}

/// Repository for recent-work entries. All lookups are scoped to the owner.
pub trait RecentWorkRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RecentWork>, MembersServiceError>;
    async fn find(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<RecentWork>, MembersServiceError>;

    /// Insert unless the owner already has `cap` entries, atomically.
    /// Returns `RecentWorkLimitReached` when full.
    async fn create_capped(
        &self,
        work: &RecentWork,
        cap: usize,
    ) -> Result<(), MembersServiceError>;

    async fn update(&self, work: &RecentWork) -> Result<(), MembersServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, MembersServiceError>;
}

/// Repository for communities and memberships.
pub trait CommunityRepository: Send + Sync {
    /// One page ordered by name, plus the total count.
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<CommunitySummary>, u64), MembersServiceError>;
    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CommunitySummary>, MembersServiceError>;
    /// Fails with `CommunityExists` on a duplicate slug.
    async fn create(&self, community: &Community) -> Result<(), MembersServiceError>;

    /// Returns `false` if the user was already a member.
    async fn add_member(&self, membership: &Membership) -> Result<bool, MembersServiceError>;
    /// Returns `false` if the user was not a member.
    async fn remove_member(
        &self,
        user_id: Uuid,
        community_id: Uuid,
    ) -> Result<bool, MembersServiceError>;

    /// One page of members ordered by join time, plus the total count.
    async fn list_members(
        &self,
        community_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<(User, Membership)>, u64), MembersServiceError>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Community, Membership)>, MembersServiceError>;
}

/// Object store holding avatar images.
pub trait AvatarStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), MembersServiceError>;
    async fn delete(&self, key: &str) -> Result<(), MembersServiceError>;
    fn public_url(&self, key: &str) -> String;
}

/// Backend API of the identity provider.
pub trait IdentityProvider: Send + Sync {
    /// Delete the provider-side account. An already-missing user is success;
    /// any other failure is `Unavailable`.
    async fn delete_user(&self, external_id: &str) -> Result<(), MembersServiceError>;
}
