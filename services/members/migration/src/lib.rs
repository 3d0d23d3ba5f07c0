use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users;
mod m20260101_000002_create_recent_works;
mod m20260101_000003_create_communities;
mod m20260101_000004_create_user_communities;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_recent_works::Migration),
            Box::new(m20260101_000003_create_communities::Migration),
            Box::new(m20260101_000004_create_user_communities::Migration),
        ]
    }
}
