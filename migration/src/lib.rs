pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_table;
mod m20241201_000002_create_refresh_tokens_table;
mod m20241202_000003_create_contests_table;
mod m20241202_000004_create_photos_table;
mod m20241204_000005_create_photo_files_table;
mod m20241204_000006_create_contest_entries_table;
mod m20241205_000007_create_contest_photo_votes_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_table::Migration),
            Box::new(m20241201_000002_create_refresh_tokens_table::Migration),
            Box::new(m20241202_000003_create_contests_table::Migration),
            Box::new(m20241202_000004_create_photos_table::Migration),
            Box::new(m20241204_000005_create_photo_files_table::Migration),
            Box::new(m20241204_000006_create_contest_entries_table::Migration),
            Box::new(m20241205_000007_create_contest_photo_votes_table::Migration),
        ]
    }
}
