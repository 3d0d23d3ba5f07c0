use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use commons_domain::community::CommunityRole;
use commons_domain::pagination::PageRequest;
use commons_domain::user::{AgeGroup, UserRole};
use commons_members_schema::{communities, recent_works, user_communities, users};

use crate::domain::repository::{CommunityRepository, RecentWorkRepository, UserRepository};
use crate::domain::types::{
    Community, CommunitySummary, IdentityUser, Membership, ProfileChanges, RecentWork,
    SocialLinks, User,
};
use crate::error::MembersServiceError;

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// `conflict` on a unique-constraint violation, `Internal` otherwise.
fn conflict_or_internal(
    e: DbErr,
    conflict: MembersServiceError,
    context: &'static str,
) -> MembersServiceError {
    if is_unique_violation(&e) {
        conflict
    } else {
        MembersServiceError::Internal(anyhow::Error::new(e).context(context))
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MembersServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, MembersServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .context("find user by external id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, MembersServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<User, MembersServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = &changes.name {
            am.name = Set(name.clone());
        }
        if let Some(username) = &changes.username {
            am.username = Set(Some(username.clone()));
        }
        if let Some(bio) = &changes.bio {
            am.bio = Set(bio.clone());
        }
        if let Some(age_group) = changes.age_group {
            am.age_group = Set(age_group.map(|g| g.as_str().to_owned()));
        }
        if let Some(country) = &changes.country {
            am.country = Set(country.clone());
        }
        if let Some(city) = &changes.city {
            am.city = Set(city.clone());
        }
        if let Some(organization) = &changes.organization {
            am.organization = Set(organization.clone());
        }
        if let Some(position) = &changes.position {
            am.position = Set(position.clone());
        }
        if let Some(work_types) = &changes.work_types {
            am.work_types = Set(serde_json::to_value(work_types).context("encode work types")?);
        }
        if let Some(areas) = &changes.expertise_areas {
            am.expertise_areas = Set(serde_json::to_value(areas).context("encode expertise areas")?);
        }
        if let Some(link_changes) = &changes.social_links {
            let current = users::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .context("load social links")?
                .ok_or(MembersServiceError::UserNotFound)?;
            let mut links: SocialLinks = json_column(current.social_links, "social_links");
            link_changes.apply_to(&mut links);
            am.social_links = Set(serde_json::to_value(&links).context("encode social links")?);
        }
        am.updated_at = Set(Utc::now());

        let model = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => MembersServiceError::UserNotFound,
            e => conflict_or_internal(e, MembersServiceError::UsernameTaken, "update profile"),
        })?;
        Ok(user_from_model(model))
    }

    async fn set_avatar_key(&self, id: Uuid, key: Option<&str>) -> Result<(), MembersServiceError> {
        users::ActiveModel {
            id: Set(id),
            avatar_key: Set(key.map(str::to_owned)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set avatar key")?;
        Ok(())
    }

    async fn upsert_identity(&self, identity: &IdentityUser) -> Result<User, MembersServiceError> {
        match self.insert_identity(identity, identity.username.clone()).await {
            Ok(model) => Ok(user_from_model(model)),
            // Username claimed between the availability check and the insert.
            Err(e) if identity.username.is_some() && is_unique_violation(&e) => {
                tracing::warn!(
                    external_id = %identity.external_id,
                    "provider username already taken, inserting without it"
                );
                let model = self
                    .insert_identity(identity, None)
                    .await
                    .context("upsert identity user")?;
                Ok(user_from_model(model))
            }
            Err(e) => Err(anyhow::Error::new(e).context("upsert identity user").into()),
        }
    }

    async fn delete_by_external_id(&self, external_id: &str) -> Result<bool, MembersServiceError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::ExternalId.eq(external_id))
            .exec(&self.db)
            .await
            .context("delete user by external id")?;
        Ok(result.rows_affected > 0)
    }
}

impl DbUserRepository {
    async fn insert_identity(
        &self,
        identity: &IdentityUser,
        username: Option<String>,
    ) -> Result<users::Model, DbErr> {
        let now = Utc::now();
        let model = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            external_id: Set(identity.external_id.clone()),
            email: Set(identity.email.clone()),
            name: Set(identity.name.clone()),
            username: Set(username),
            bio: Set(None),
            age_group: Set(None),
            country: Set(None),
            city: Set(None),
            organization: Set(None),
            position: Set(None),
            work_types: Set(serde_json::json!([])),
            expertise_areas: Set(serde_json::json!([])),
            social_links: Set(serde_json::json!({})),
            avatar_key: Set(None),
            role: Set(UserRole::Member.as_i16()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::ExternalId)
                    .update_columns([
                        users::Column::Email,
                        users::Column::Name,
                        users::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
    }
}

/// Decode a JSON column, logging and falling back to the default on bad data.
fn json_column<T: DeserializeOwned + Default>(value: serde_json::Value, column: &str) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(column, error = %e, "unreadable JSON column");
        T::default()
    })
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        external_id: model.external_id,
        email: model.email,
        name: model.name,
        username: model.username,
        bio: model.bio,
        age_group: model.age_group.as_deref().and_then(AgeGroup::from_label),
        country: model.country,
        city: model.city,
        organization: model.organization,
        position: model.position,
        work_types: json_column(model.work_types, "work_types"),
        expertise_areas: json_column(model.expertise_areas, "expertise_areas"),
        social_links: json_column(model.social_links, "social_links"),
        avatar_key: model.avatar_key,
        role: UserRole::from_i16(model.role).unwrap_or_default(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Recent work repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecentWorkRepository {
    pub db: DatabaseConnection,
}

impl RecentWorkRepository for DbRecentWorkRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RecentWork>, MembersServiceError> {
        let models = recent_works::Entity::find()
            .filter(recent_works::Column::UserId.eq(user_id))
            .order_by_desc(recent_works::Column::IsOngoing)
            .order_by_desc(recent_works::Column::StartDate)
            .order_by_desc(recent_works::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list recent works")?;
        Ok(models.into_iter().map(recent_work_from_model).collect())
    }

    async fn find(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<RecentWork>, MembersServiceError> {
        let model = recent_works::Entity::find_by_id(id)
            .filter(recent_works::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find recent work")?;
        Ok(model.map(recent_work_from_model))
    }

    async fn create_capped(
        &self,
        work: &RecentWork,
        cap: usize,
    ) -> Result<(), MembersServiceError> {
        let inserted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                let work = work.clone();
                Box::pin(async move {
                    // Row lock on the owner serializes concurrent creates.
                    users::Entity::find_by_id(work.user_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    let count = recent_works::Entity::find()
                        .filter(recent_works::Column::UserId.eq(work.user_id))
                        .count(txn)
                        .await?;
                    if count >= cap as u64 {
                        return Ok(false);
                    }
                    recent_work_active_model(&work).insert(txn).await?;
                    Ok(true)
                })
            })
            .await
            .context("create recent work")?;
        if !inserted {
            return Err(MembersServiceError::RecentWorkLimitReached);
        }
        Ok(())
    }

    async fn update(&self, work: &RecentWork) -> Result<(), MembersServiceError> {
        recent_work_active_model(work)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => MembersServiceError::RecentWorkNotFound,
                e => MembersServiceError::Internal(anyhow::Error::new(e).context("update recent work")),
            })?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, MembersServiceError> {
        let result = recent_works::Entity::delete_many()
            .filter(recent_works::Column::Id.eq(id))
            .filter(recent_works::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete recent work")?;
        Ok(result.rows_affected > 0)
    }
}

fn recent_work_active_model(work: &RecentWork) -> recent_works::ActiveModel {
    recent_works::ActiveModel {
        id: Set(work.id),
        user_id: Set(work.user_id),
        title: Set(work.title.clone()),
        description: Set(work.description.clone()),
        url: Set(work.url.clone()),
        start_date: Set(work.start_date),
        end_date: Set(work.end_date),
        is_ongoing: Set(work.is_ongoing),
        created_at: Set(work.created_at),
        updated_at: Set(work.updated_at),
    }
}

fn recent_work_from_model(model: recent_works::Model) -> RecentWork {
    RecentWork {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        url: model.url,
        start_date: model.start_date,
        end_date: model.end_date,
        is_ongoing: model.is_ongoing,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Community repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommunityRepository {
    pub db: DatabaseConnection,
}

impl DbCommunityRepository {
    async fn member_counts(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>, MembersServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = user_communities::Entity::find()
            .select_only()
            .column(user_communities::Column::CommunityId)
            .column_as(
                Expr::col(user_communities::Column::UserId).count(),
                "member_count",
            )
            .filter(user_communities::Column::CommunityId.is_in(ids.iter().copied()))
            .group_by(user_communities::Column::CommunityId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .context("count community members")?;
        Ok(rows)
    }

    async fn summarize(
        &self,
        models: Vec<communities::Model>,
    ) -> Result<Vec<CommunitySummary>, MembersServiceError> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let counts = self.member_counts(&ids).await?;
        Ok(models
            .into_iter()
            .map(|model| {
                let member_count = counts
                    .iter()
                    .find(|(id, _)| *id == model.id)
                    .map(|(_, n)| *n as u64)
                    .unwrap_or(0);
                CommunitySummary {
                    community: community_from_model(model),
                    member_count,
                }
            })
            .collect())
    }
}

impl CommunityRepository for DbCommunityRepository {
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<CommunitySummary>, u64), MembersServiceError> {
        let total = communities::Entity::find()
            .count(&self.db)
            .await
            .context("count communities")?;
        let models = communities::Entity::find()
            .order_by_asc(communities::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list communities")?;
        Ok((self.summarize(models).await?, total))
    }

    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CommunitySummary>, MembersServiceError> {
        let model = communities::Entity::find()
            .filter(communities::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find community by slug")?;
        let Some(model) = model else {
            return Ok(None);
        };
        Ok(self.summarize(vec![model]).await?.pop())
    }

    async fn create(&self, community: &Community) -> Result<(), MembersServiceError> {
        communities::ActiveModel {
            id: Set(community.id),
            slug: Set(community.slug.clone()),
            name: Set(community.name.clone()),
            description: Set(community.description.clone()),
            created_at: Set(community.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            conflict_or_internal(e, MembersServiceError::CommunityExists, "create community")
        })?;
        Ok(())
    }

    async fn add_member(&self, membership: &Membership) -> Result<bool, MembersServiceError> {
        let inserted = user_communities::Entity::insert(user_communities::ActiveModel {
            user_id: Set(membership.user_id),
            community_id: Set(membership.community_id),
            role: Set(membership.role.as_i16()),
            joined_at: Set(membership.joined_at),
        })
        .on_conflict(
            OnConflict::columns([
                user_communities::Column::UserId,
                user_communities::Column::CommunityId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("add community member")?;
        Ok(inserted > 0)
    }

    async fn remove_member(
        &self,
        user_id: Uuid,
        community_id: Uuid,
    ) -> Result<bool, MembersServiceError> {
        let result = user_communities::Entity::delete_many()
            .filter(user_communities::Column::UserId.eq(user_id))
            .filter(user_communities::Column::CommunityId.eq(community_id))
            .exec(&self.db)
            .await
            .context("remove community member")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_members(
        &self,
        community_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<(User, Membership)>, u64), MembersServiceError> {
        let query =
            user_communities::Entity::find().filter(user_communities::Column::CommunityId.eq(community_id));
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count community members")?;
        let rows = query
            .find_also_related(users::Entity)
            .order_by_asc(user_communities::Column::JoinedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list community members")?;
        let members = rows
            .into_iter()
            .filter_map(|(membership, user)| {
                Some((user_from_model(user?), membership_from_model(membership)))
            })
            .collect();
        Ok((members, total))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Community, Membership)>, MembersServiceError> {
        let rows = user_communities::Entity::find()
            .filter(user_communities::Column::UserId.eq(user_id))
            .find_also_related(communities::Entity)
            .order_by_asc(communities::Column::Name)
            .all(&self.db)
            .await
            .context("list user communities")?;
        Ok(rows
            .into_iter()
            .filter_map(|(membership, community)| {
                Some((
                    community_from_model(community?),
                    membership_from_model(membership),
                ))
            })
            .collect())
    }
}

fn community_from_model(model: communities::Model) -> Community {
    Community {
        id: model.id,
        slug: model.slug,
        name: model.name,
        description: model.description,
        created_at: model.created_at,
    }
}

fn membership_from_model(model: user_communities::Model) -> Membership {
    Membership {
        user_id: model.user_id,
        community_id: model.community_id,
        role: CommunityRole::from_i16(model.role).unwrap_or_default(),
        joined_at: model.joined_at,
    }
}
