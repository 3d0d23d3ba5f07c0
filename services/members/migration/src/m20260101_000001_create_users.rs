use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::ExternalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Name).string_len(100).null())
                    .col(ColumnDef::new(Users::Username).string_len(30).null().unique_key())
                    .col(ColumnDef::new(Users::Bio).string_len(500).null())
                    .col(ColumnDef::new(Users::AgeGroup).string().null())
                    .col(ColumnDef::new(Users::Country).char_len(2).null())
                    .col(ColumnDef::new(Users::City).string_len(100).null())
                    .col(ColumnDef::new(Users::Organization).string_len(150).null())
                    .col(ColumnDef::new(Users::Position).string_len(100).null())
                    .col(ColumnDef::new(Users::WorkTypes).json_binary().not_null())
                    .col(ColumnDef::new(Users::ExpertiseAreas).json_binary().not_null())
                    .col(ColumnDef::new(Users::SocialLinks).json_binary().not_null())
                    .col(ColumnDef::new(Users::AvatarKey).string().null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    ExternalId,
    Email,
    Name,
    Username,
    Bio,
    AgeGroup,
    Country,
    City,
    Organization,
    Position,
    WorkTypes,
    ExpertiseAreas,
    SocialLinks,
    AvatarKey,
    Role,
    CreatedAt,
    UpdatedAt,
}
