//! Store: transactional persistence with row locking and geospatial +
//! temporal query support.

pub mod entities;
pub mod geo;
pub mod locks;
pub mod migration;

use std::{path::Path, time::Duration};

use chrono::{DateTime, Utc};
use log::info;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tokio::fs::{create_dir_all, File};

use crate::errors::EngineError;
use entities::{
    games, participants, teams, users, Game, GameCategory, GameStatus, Participant,
    ParticipantStatus, User,
};
use geo::{bounding_box, haversine_distance_meters, GeoPoint};
use migration::Migrator;

/// Opens (creating if needed) the SQLite database file and runs migrations.
pub async fn connect(database_file: &str) -> std::io::Result<DatabaseConnection> {
    info!("Connecting to database..");

    let file_path = Path::new(database_file);
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent).await?;
        }
    }

    if !file_path.exists() {
        File::create(file_path).await?;
    }

    let con_str = format!("sqlite:{database_file}");
    let connection = sea_orm::Database::connect(&con_str)
        .await
        .map_err(|err| std::io::Error::other(format!("failed to connect to database: {err}")))?;

    info!("Connected to database: {con_str}");
    info!("Running migrations...");

    Migrator::up(&connection, None)
        .await
        .map_err(|err| std::io::Error::other(format!("failed to run migrations: {err}")))?;

    info!("Migrations complete.");

    Ok(connection)
}

/// A single row of a radius-filtered game listing.
#[derive(Debug, Clone)]
pub struct GameListingRow {
    pub game: Game,
    pub confirmed_count: u64,
    pub caller_participation_status: Option<ParticipantStatus>,
}

/// A participant row joined with the user it belongs to — spec.md §4.1
/// requires `ListAllParticipants`/`ListActiveParticipants` to carry the
/// user's email/name for display rather than just a bare `user_id`.
#[derive(Debug, Clone)]
pub struct ParticipantRow {
    pub participant: Participant,
    pub user: User,
}

/// Parameters for `Store::list_games_in_radius`.
pub struct RadiusQuery {
    pub center: GeoPoint,
    pub radius_meters: f64,
    pub categories: Vec<GameCategory>,
    pub earliest_start: DateTime<Utc>,
    pub latest_start: Option<DateTime<Utc>>,
    pub status: Option<GameStatus>,
    pub caller_user_id: Option<i32>,
    pub limit: u64,
    pub offset: u64,
}

/// RAII guard for the game row lock: holds the in-process mutex permit and
/// the write transaction opened for its lifetime. Callers issue writes
/// against `guard.txn` and call `guard.commit()` to finish.
pub struct GameLockGuard {
    _permit: tokio::sync::OwnedMutexGuard<()>,
    pub txn: DatabaseTransaction,
}

impl GameLockGuard {
    pub async fn commit(self) -> Result<(), EngineError> {
        self.txn.commit().await?;
        Ok(())
    }
}

pub struct Store {
    db: DatabaseConnection,
    locks: locks::GameLocks,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            locks: locks::GameLocks::new(),
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Acquires the exclusive row lock for `game_id` for the remainder of
    /// the returned guard's lifetime, opening a transaction to write
    /// through. Blocks until acquired or `deadline` elapses.
    pub async fn lock_game(
        &self,
        game_id: i32,
        deadline: Duration,
    ) -> Result<GameLockGuard, EngineError> {
        let permit = self.locks.acquire(game_id, deadline).await?;
        let txn = self.db.begin().await?;
        Ok(GameLockGuard { _permit: permit, txn })
    }

    // ---- Users ---------------------------------------------------------

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, EngineError> {
        Ok(users::Model::by_email(&self.db, email).await?)
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>, EngineError> {
        Ok(users::Model::by_id(&self.db, id).await?)
    }

    pub async fn create_user(
        &self,
        email: String,
        given_name: String,
        family_name: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<User, EngineError> {
        Ok(users::Model::create(&self.db, email, given_name, family_name, password_hash, now)
            .await?)
    }

    // ---- Games -----------------------------------------------------------

    pub async fn get_game(&self, id: i32) -> Result<Option<Game>, EngineError> {
        Ok(games::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Same as [`Store::get_game`] but read against an in-progress locked
    /// transaction, so the read-modify-write in Join's T1 sees a
    /// consistent view with what it is about to write.
    pub async fn get_game_txn(
        &self,
        txn: &DatabaseTransaction,
        id: i32,
    ) -> Result<Option<Game>, EngineError> {
        Ok(games::Entity::find_by_id(id).one(txn).await?)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_game(&self, active: games::ActiveModel) -> Result<Game, EngineError> {
        use sea_orm::ActiveModelTrait;
        Ok(active.insert(&self.db).await?)
    }

    /// Sets status=cancelled, cancelled_at=now, updated_at=now inside the
    /// caller's locked transaction.
    pub async fn cancel_game_txn(
        &self,
        txn: &DatabaseTransaction,
        game: Game,
        now: DateTime<Utc>,
    ) -> Result<Game, EngineError> {
        use sea_orm::ActiveModelTrait;
        let mut active = game.into_active_model();
        active.status = Set(GameStatus::Cancelled);
        active.cancelled_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(txn).await?)
    }

    pub async fn list_games_in_radius(
        &self,
        query: &RadiusQuery,
    ) -> Result<Vec<GameListingRow>, EngineError> {
        let bbox = bounding_box(query.center, query.radius_meters);

        let mut condition = Condition::all()
            .add(games::Column::LocationLat.gte(bbox.min_lat))
            .add(games::Column::LocationLat.lte(bbox.max_lat))
            .add(games::Column::LocationLng.gte(bbox.min_lng))
            .add(games::Column::LocationLng.lte(bbox.max_lng))
            .add(games::Column::StartAt.gte(query.earliest_start));

        if let Some(latest) = query.latest_start {
            condition = condition.add(games::Column::StartAt.lt(latest));
        }

        if !query.categories.is_empty() {
            condition = condition.add(games::Column::Category.is_in(query.categories.clone()));
        }

        if let Some(status) = query.status {
            condition = condition.add(games::Column::Status.eq(status));
        }

        let candidates = games::Entity::find()
            .filter(condition)
            .order_by_asc(games::Column::StartAt)
            .all(&self.db)
            .await?;

        let mut rows = Vec::new();
        for game in candidates {
            let point = GeoPoint {
                lat: game.location_lat,
                lng: game.location_lng,
            };
            // radius=0 is inclusive: points at distance exactly 0 match.
            if haversine_distance_meters(query.center, point) > query.radius_meters {
                continue;
            }

            let confirmed_count = participants::Entity::find()
                .filter(participants::Column::GameId.eq(game.id))
                .filter(participants::Column::Status.eq(ParticipantStatus::Confirmed))
                .count(&self.db)
                .await?;

            let caller_participation_status = match query.caller_user_id {
                Some(user_id) => self
                    .get_participant_by_game_and_user(game.id, user_id)
                    .await?
                    .map(|p| p.status),
                None => None,
            };

            rows.push(GameListingRow {
                game,
                confirmed_count,
                caller_participation_status,
            });
        }

        // Re-sort: the haversine filter doesn't change start_at order, but
        // keep this explicit since it is the contractually-ordered field.
        rows.sort_by_key(|r| r.game.start_at);

        let start = (query.offset as usize).min(rows.len());
        let end = (start + query.limit as usize).min(rows.len());
        Ok(rows[start..end].to_vec())
    }

    // ---- Participants ----------------------------------------------------

    /// Joins each participant row with its user so the caller can render
    /// a roster (email/name) without N follow-up lookups.
    fn zip_participants_with_users(
        rows: Vec<(participants::Model, Option<users::Model>)>,
    ) -> Result<Vec<ParticipantRow>, EngineError> {
        rows.into_iter()
            .map(|(participant, user)| {
                let user = user.ok_or_else(|| {
                    EngineError::Internal(format!(
                        "participant {} references a missing user",
                        participant.id
                    ))
                })?;
                Ok(ParticipantRow { participant, user })
            })
            .collect()
    }

    pub async fn list_all_participants(
        &self,
        game_id: i32,
    ) -> Result<Vec<ParticipantRow>, EngineError> {
        let rows = participants::Entity::find()
            .filter(participants::Column::GameId.eq(game_id))
            .order_by_asc(participants::Column::JoinedAt)
            .order_by_asc(participants::Column::Id)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;
        Self::zip_participants_with_users(rows)
    }

    /// Same as [`Store::list_all_participants`] but read against an
    /// in-progress locked transaction.
    pub async fn list_all_participants_txn(
        &self,
        txn: &DatabaseTransaction,
        game_id: i32,
    ) -> Result<Vec<ParticipantRow>, EngineError> {
        let rows = participants::Entity::find()
            .filter(participants::Column::GameId.eq(game_id))
            .order_by_asc(participants::Column::JoinedAt)
            .order_by_asc(participants::Column::Id)
            .find_also_related(users::Entity)
            .all(txn)
            .await?;
        Self::zip_participants_with_users(rows)
    }

    pub async fn list_active_participants(
        &self,
        game_id: i32,
    ) -> Result<Vec<ParticipantRow>, EngineError> {
        let all = self.list_all_participants(game_id).await?;
        Ok(all
            .into_iter()
            .filter(|row| row.participant.status.is_active())
            .collect())
    }

    pub async fn get_participant_by_game_and_user(
        &self,
        game_id: i32,
        user_id: i32,
    ) -> Result<Option<Participant>, EngineError> {
        Ok(participants::Entity::find()
            .filter(participants::Column::GameId.eq(game_id))
            .filter(participants::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn get_participant_by_game_and_user_txn(
        &self,
        txn: &DatabaseTransaction,
        game_id: i32,
        user_id: i32,
    ) -> Result<Option<Participant>, EngineError> {
        Ok(participants::Entity::find()
            .filter(participants::Column::GameId.eq(game_id))
            .filter(participants::Column::UserId.eq(user_id))
            .one(txn)
            .await?)
    }

    pub async fn create_participant_txn(
        &self,
        txn: &DatabaseTransaction,
        game_id: i32,
        user_id: i32,
        status: ParticipantStatus,
        now: DateTime<Utc>,
    ) -> Result<Participant, EngineError> {
        use sea_orm::ActiveModelTrait;
        let active = participants::ActiveModel {
            game_id: Set(game_id),
            user_id: Set(user_id),
            status: Set(status),
            paid: Set(false),
            joined_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(active.insert(txn).await?)
    }

    pub async fn update_participant_status_txn(
        &self,
        txn: &DatabaseTransaction,
        participant: Participant,
        status: ParticipantStatus,
        now: DateTime<Utc>,
    ) -> Result<Participant, EngineError> {
        use sea_orm::ActiveModelTrait;
        let mut active = participant.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(now);
        Ok(active.update(txn).await?)
    }

    pub async fn update_participant_status_and_bump_joined_at_txn(
        &self,
        txn: &DatabaseTransaction,
        participant: Participant,
        status: ParticipantStatus,
        now: DateTime<Utc>,
    ) -> Result<Participant, EngineError> {
        use sea_orm::ActiveModelTrait;
        let mut active = participant.into_active_model();
        active.status = Set(status);
        active.joined_at = Set(now);
        active.updated_at = Set(now);
        Ok(active.update(txn).await?)
    }

    pub async fn batch_update_participant_status_txn(
        &self,
        txn: &DatabaseTransaction,
        ids: &[i32],
        status: ParticipantStatus,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        if ids.is_empty() {
            return Ok(());
        }
        participants::Entity::update_many()
            .set(participants::ActiveModel {
                status: Set(status),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(participants::Column::Id.is_in(ids.iter().copied()))
            .exec(txn)
            .await?;
        Ok(())
    }
}
