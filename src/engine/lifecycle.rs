//! Game Lifecycle: Create, Get, Cancel.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    db::{
        entities::{
            games, Game, GameCategory, GameStatus, PricingType, SkillLevel, User,
        },
        Store,
    },
    errors::EngineError,
};

use super::participation::ActiveParticipantView;
use super::DEFAULT_LOCK_DEADLINE;

/// Inputs for `Create`. Mirrors the `CreateGameRequest` wire type,
/// validated in `create` below.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub category: GameCategory,
    pub title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,

    pub location_name: String,
    pub location_address: Option<String>,
    pub location_lat: f64,
    pub location_lng: f64,
    pub location_notes: Option<String>,

    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub max_participants: i32,

    pub pricing_type: PricingType,
    pub pricing_amount_cents: i64,
    pub pricing_currency: String,

    pub signup_deadline: Option<DateTime<Utc>>,
    pub drop_deadline: Option<DateTime<Utc>>,
    pub skill_level: Option<SkillLevel>,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidArgument {
        field,
        reason: reason.into(),
    }
}

/// Create(caller, request) → Game.
pub async fn create(
    store: &Store,
    clock: &dyn Clock,
    owner_id: i32,
    req: CreateGameRequest,
) -> Result<Game, EngineError> {
    if !(-90.0..=90.0).contains(&req.location_lat) {
        return Err(invalid("location.lat", "must be within [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&req.location_lng) {
        return Err(invalid("location.lng", "must be within [-180, 180]"));
    }
    if req.duration_minutes < 15 {
        return Err(invalid("duration_minutes", "must be at least 15"));
    }
    if req.max_participants < 2 {
        return Err(invalid("max_participants", "must be at least 2"));
    }
    if req.pricing_amount_cents < 0 {
        return Err(invalid("pricing.amount", "must be non-negative"));
    }
    if req.pricing_currency.trim().is_empty() {
        return Err(invalid("pricing.currency", "must not be empty"));
    }

    let now = clock.now();
    if req.start_at <= now {
        return Err(invalid("start_at", "must be in the future"));
    }

    let signup_deadline = req.signup_deadline.unwrap_or(req.start_at);
    let skill_level = req.skill_level.unwrap_or_default();

    let active = games::ActiveModel {
        owner_id: Set(owner_id),
        category: Set(req.category),
        title: Set(req.title),
        description: Set(req.description),
        notes: Set(req.notes),
        location_name: Set(req.location_name),
        location_address: Set(req.location_address),
        location_lat: Set(req.location_lat),
        location_lng: Set(req.location_lng),
        location_notes: Set(req.location_notes),
        start_at: Set(req.start_at),
        duration_minutes: Set(req.duration_minutes),
        max_participants: Set(req.max_participants),
        pricing_type: Set(req.pricing_type),
        pricing_amount_cents: Set(req.pricing_amount_cents),
        pricing_currency: Set(req.pricing_currency),
        signup_deadline: Set(signup_deadline),
        drop_deadline: Set(req.drop_deadline),
        skill_level: Set(skill_level),
        status: Set(GameStatus::Open),
        cancelled_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    store.create_game(active).await
}

/// The participants view returned alongside a Game by `Get`.
#[derive(Debug, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub owner: User,
    pub confirmed_participants: Vec<ActiveParticipantView>,
    pub waitlist: Vec<ActiveParticipantView>,
}

/// Get(game_id) → Game with owner + participants view.
pub async fn get(store: &Store, clock: &dyn Clock, game_id: i32) -> Result<GameDetail, EngineError> {
    let mut game = store.get_game(game_id).await?.ok_or(EngineError::NotFound)?;
    let owner = store
        .get_user_by_id(game.owner_id)
        .await?
        .ok_or(EngineError::NotFound)?;

    let active = store.list_active_participants(game_id).await?;
    let max = game.max_participants as usize;
    let (confirmed_slice, waitlist_slice) = if active.len() > max {
        active.split_at(max)
    } else {
        (active.as_slice(), &active[active.len()..])
    };

    game.status = game.derived_status(clock.now(), confirmed_slice.len() as i64);

    let confirmed_participants = confirmed_slice
        .iter()
        .cloned()
        .map(|row| ActiveParticipantView {
            participant: row.participant,
            user_email: row.user.email,
            user_given_name: row.user.given_name,
            user_family_name: row.user.family_name,
            waitlist_position: None,
        })
        .collect();

    let mut waitlist = Vec::with_capacity(waitlist_slice.len());
    for (idx, row) in waitlist_slice.iter().cloned().enumerate() {
        waitlist.push(ActiveParticipantView {
            participant: row.participant,
            user_email: row.user.email,
            user_given_name: row.user.given_name,
            user_family_name: row.user.family_name,
            waitlist_position: Some(idx as u32 + 1),
        });
    }

    Ok(GameDetail {
        game,
        owner,
        confirmed_participants,
        waitlist,
    })
}

/// Cancel(caller, game_id).
///
/// Returns the list of users to notify — empty if the game was already
/// cancelled (idempotent).
pub async fn cancel(
    store: &Store,
    clock: &dyn Clock,
    caller_id: i32,
    game_id: i32,
) -> Result<Vec<User>, EngineError> {
    let now = clock.now();
    let game = store.get_game(game_id).await?.ok_or(EngineError::NotFound)?;

    if game.owner_id != caller_id {
        return Err(EngineError::NotOwner);
    }
    if game.status == GameStatus::Cancelled {
        return Ok(Vec::new());
    }
    // A game already marked completed and one whose end time has simply
    // passed both surface as the same GAME_FINISHED error.
    if game.status == GameStatus::Completed || now > game.end_at() {
        return Err(EngineError::GameFinished);
    }
    if now > game.start_at {
        return Err(EngineError::GameAlreadyStarted);
    }

    // Snapshot active participants before the state transition so the
    // notification list reflects who was active at the moment of
    // cancellation even if a concurrent drop races the commit.
    let active = store.list_active_participants(game_id).await?;
    let notify = active.into_iter().map(|row| row.user).collect();

    let guard = store.lock_game(game_id, DEFAULT_LOCK_DEADLINE).await?;
    let game = store
        .get_game_txn(&guard.txn, game_id)
        .await?
        .ok_or(EngineError::NotFound)?;
    if game.status == GameStatus::Cancelled {
        // Raced with another cancel between the snapshot and the lock.
        return Ok(Vec::new());
    }
    store.cancel_game_txn(&guard.txn, game, now).await?;
    guard.commit().await?;

    Ok(notify)
}
