use sea_orm::entity::prelude::*;

/// Member account mirrored from the identity provider plus profile fields.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    /// Stored lower-case.
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub bio: Option<String>,
    pub age_group: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub position: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub work_types: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub expertise_areas: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub social_links: Json,
    /// Object-store key prefix of the current avatar set.
    pub avatar_key: Option<String>,
    pub role: i16,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recent_works::Entity")]
    RecentWorks,
    #[sea_orm(has_many = "super::user_communities::Entity")]
    UserCommunities,
}

impl Related<super::recent_works::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecentWorks.def()
    }
}

impl Related<super::user_communities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCommunities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
