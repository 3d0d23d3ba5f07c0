use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCommunities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserCommunities::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserCommunities::CommunityId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCommunities::Role)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserCommunities::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserCommunities::UserId)
                            .col(UserCommunities::CommunityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserCommunities::Table, UserCommunities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserCommunities::Table, UserCommunities::CommunityId)
                            .to(Communities::Table, Communities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(UserCommunities::Table)
                    .col(UserCommunities::CommunityId)
                    .name("idx_user_communities_community_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCommunities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserCommunities {
    Table,
    UserId,
    CommunityId,
    Role,
    JoinedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Communities {
    Table,
    Id,
}
