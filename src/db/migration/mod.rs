pub use sea_orm_migration::prelude::*;

mod m20240101_000001_users_table;
mod m20240101_000002_games_table;
mod m20240101_000003_teams_table;
mod m20240101_000004_participants_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_users_table::Migration),
            Box::new(m20240101_000002_games_table::Migration),
            Box::new(m20240101_000003_teams_table::Migration),
            Box::new(m20240101_000004_participants_table::Migration),
        ]
    }
}
