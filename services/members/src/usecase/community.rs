use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use commons_domain::community::CommunityRole;
use commons_domain::pagination::{Page, PageRequest};
use commons_domain::user::UserRole;

use crate::domain::repository::{CommunityRepository, UserRepository};
use crate::domain::types::{
    Community, CommunitySummary, Membership, User, is_valid_community_slug,
};
use crate::error::MembersServiceError;
use crate::usecase::require_user;

async fn require_community<C: CommunityRepository>(
    repo: &C,
    slug: &str,
) -> Result<CommunitySummary, MembersServiceError> {
    repo.find_by_slug(slug)
        .await?
        .ok_or(MembersServiceError::CommunityNotFound)
}

// ── ListCommunities ──────────────────────────────────────────────────────────

pub struct ListCommunitiesUseCase<C: CommunityRepository> {
    pub repo: C,
}

impl<C: CommunityRepository> ListCommunitiesUseCase<C> {
    pub async fn execute(
        &self,
        page: PageRequest,
    ) -> Result<Page<CommunitySummary>, MembersServiceError> {
        let page = page.clamped();
        let (items, total) = self.repo.list(page).await?;
        Ok(Page::new(items, page, total))
    }
}

// ── GetCommunity ─────────────────────────────────────────────────────────────

pub struct GetCommunityUseCase<C: CommunityRepository> {
    pub repo: C,
}

impl<C: CommunityRepository> GetCommunityUseCase<C> {
    pub async fn execute(&self, slug: &str) -> Result<CommunitySummary, MembersServiceError> {
        require_community(&self.repo, slug).await
    }
}

// ── CreateCommunity ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CommunityInput {
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_community_slug(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug"))
    }
}

pub struct CreateCommunityUseCase<U: UserRepository, C: CommunityRepository> {
    pub users: U,
    pub communities: C,
}

impl<U: UserRepository, C: CommunityRepository> CreateCommunityUseCase<U, C> {
    pub async fn execute(
        &self,
        external_id: &str,
        input: CommunityInput,
    ) -> Result<Community, MembersServiceError> {
        let caller = require_user(&self.users, external_id).await?;
        if caller.role < UserRole::Admin {
            return Err(MembersServiceError::Forbidden);
        }

        let input = CommunityInput {
            slug: input.slug.trim().to_owned(),
            name: input.name.trim().to_owned(),
            description: input
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
        };
        input.validate()?;

        let community = Community {
            id: Uuid::now_v7(),
            slug: input.slug,
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        };
        self.communities.create(&community).await?;
        tracing::info!(slug = %community.slug, created_by = %caller.id, "community created");
        Ok(community)
    }
}

// ── JoinCommunity / LeaveCommunity ───────────────────────────────────────────

pub struct JoinCommunityUseCase<U: UserRepository, C: CommunityRepository> {
    pub users: U,
    pub communities: C,
}

impl<U: UserRepository, C: CommunityRepository> JoinCommunityUseCase<U, C> {
    pub async fn execute(
        &self,
        external_id: &str,
        slug: &str,
    ) -> Result<Membership, MembersServiceError> {
        let user = require_user(&self.users, external_id).await?;
        let summary = require_community(&self.communities, slug).await?;
        let membership = Membership {
            user_id: user.id,
            community_id: summary.community.id,
            role: CommunityRole::Member,
            joined_at: Utc::now(),
        };
        if !self.communities.add_member(&membership).await? {
            return Err(MembersServiceError::AlreadyMember);
        }
        Ok(membership)
    }
}

pub struct LeaveCommunityUseCase<U: UserRepository, C: CommunityRepository> {
    pub users: U,
    pub communities: C,
}

impl<U: UserRepository, C: CommunityRepository> LeaveCommunityUseCase<U, C> {
    pub async fn execute(&self, external_id: &str, slug: &str) -> Result<(), MembersServiceError> {
        let user = require_user(&self.users, external_id).await?;
        let summary = require_community(&self.communities, slug).await?;
        if !self
            .communities
            .remove_member(user.id, summary.community.id)
            .await?
        {
            return Err(MembersServiceError::MembershipNotFound);
        }
        Ok(())
    }
}

// ── ListCommunityMembers ─────────────────────────────────────────────────────

pub struct ListCommunityMembersUseCase<C: CommunityRepository> {
    pub repo: C,
}

impl<C: CommunityRepository> ListCommunityMembersUseCase<C> {
    pub async fn execute(
        &self,
        slug: &str,
        page: PageRequest,
    ) -> Result<Page<(User, Membership)>, MembersServiceError> {
        let page = page.clamped();
        let summary = require_community(&self.repo, slug).await?;
        let (items, total) = self.repo.list_members(summary.community.id, page).await?;
        Ok(Page::new(items, page, total))
    }
}

// ── ListMyCommunities ────────────────────────────────────────────────────────

pub struct ListMyCommunitiesUseCase<U: UserRepository, C: CommunityRepository> {
    pub users: U,
    pub communities: C,
}

impl<U: UserRepository, C: CommunityRepository> ListMyCommunitiesUseCase<U, C> {
    pub async fn execute(
        &self,
        external_id: &str,
    ) -> Result<Vec<(Community, Membership)>, MembersServiceError> {
        let user = require_user(&self.users, external_id).await?;
        self.communities.list_for_user(user.id).await
    }
}
