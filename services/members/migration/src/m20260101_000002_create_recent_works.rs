use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecentWorks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecentWorks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecentWorks::UserId).uuid().not_null())
                    .col(ColumnDef::new(RecentWorks::Title).string_len(120).not_null())
                    .col(ColumnDef::new(RecentWorks::Description).text().null())
                    .col(ColumnDef::new(RecentWorks::Url).string().null())
                    .col(ColumnDef::new(RecentWorks::StartDate).date().not_null())
                    .col(ColumnDef::new(RecentWorks::EndDate).date().null())
                    .col(
                        ColumnDef::new(RecentWorks::IsOngoing)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RecentWorks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RecentWorks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RecentWorks::Table, RecentWorks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(RecentWorks::Table)
                    .col(RecentWorks::UserId)
                    .name("idx_recent_works_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecentWorks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RecentWorks {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Url,
    StartDate,
    EndDate,
    IsOngoing,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
