//! Shared scaffolding for the integration tests: a fresh in-memory SQLite
//! database per test plus a `FakeClock` for deterministic time control.

use chrono::{DateTime, Utc};
use pickup_games::{
    clock::FakeClock,
    db::{entities::User, migration::Migrator, Store},
};
use sea_orm_migration::MigratorTrait;

pub async fn setup(now: DateTime<Utc>) -> (Store, FakeClock) {
    let connection = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory sqlite");
    Migrator::up(&connection, None)
        .await
        .expect("failed to run migrations");

    (Store::new(connection), FakeClock::new(now))
}

pub async fn make_user(store: &Store, clock: &FakeClock, email: &str) -> User {
    store
        .create_user(
            email.to_string(),
            "Given".to_string(),
            "Family".to_string(),
            "not-a-real-hash".to_string(),
            clock.now(),
        )
        .await
        .expect("failed to create user")
}
