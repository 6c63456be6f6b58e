//! Listing Engine: spatial/temporal game query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    db::{
        entities::{Game, GameCategory, GameStatus, ParticipantStatus},
        geo::GeoPoint,
        RadiusQuery, Store,
    },
    errors::EngineError,
};

const DEFAULT_RADIUS_METERS: f64 = 16_093.4; // ~10 miles
const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    #[default]
    Upcoming,
    Past,
    All,
}

/// List(query) inputs.
pub struct ListQuery {
    pub categories: Vec<GameCategory>,
    pub center: GeoPoint,
    pub radius_meters: Option<f64>,
    pub time_filter: TimeFilter,
    pub status: Option<GameStatus>,
    pub caller_user_id: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GameSummary {
    pub id: i32,
    pub category: GameCategory,
    pub title: Option<String>,
    pub location_name: String,
    pub location_lat: f64,
    pub location_lng: f64,
    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub max_participants: i32,
    pub signup_count: u64,
    pub pricing_amount_cents: i64,
    pub pricing_currency: String,
    pub skill_level: crate::db::entities::SkillLevel,
    pub status: GameStatus,
    pub user_participation_status: Option<ParticipantStatus>,
}

impl GameSummary {
    /// Builds a summary from a listing row, replacing the persisted
    /// `status` with the presentation-layer derived status (spec.md
    /// §4.3) computed against `now`.
    fn from_row(row: crate::db::GameListingRow, now: DateTime<Utc>) -> Self {
        let status = row.game.derived_status(now, row.confirmed_count as i64);
        let game: Game = row.game;
        GameSummary {
            id: game.id,
            category: game.category,
            title: game.title,
            location_name: game.location_name,
            location_lat: game.location_lat,
            location_lng: game.location_lng,
            start_at: game.start_at,
            duration_minutes: game.duration_minutes,
            max_participants: game.max_participants,
            signup_count: row.confirmed_count,
            pricing_amount_cents: game.pricing_amount_cents,
            pricing_currency: game.pricing_currency,
            skill_level: game.skill_level,
            status,
            user_participation_status: row.caller_participation_status,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidArgument {
        field,
        reason: reason.into(),
    }
}

/// List(query) → ordered list of game summaries.
///
/// Never returns a null/absent result on an empty match — an empty `Vec`
/// is itself the "no results" representation.
pub async fn list(
    store: &Store,
    clock: &dyn Clock,
    query: ListQuery,
) -> Result<Vec<GameSummary>, EngineError> {
    if query.categories.is_empty() {
        return Err(invalid("categories", "must contain at least one category"));
    }
    if !query.center.in_bounds() {
        return Err(invalid("center", "latitude/longitude out of range"));
    }

    let radius_meters = query.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS);
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(invalid("radius", "must be a non-negative finite number"));
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(invalid("limit", "must be between 1 and 100"));
    }
    let offset = query.offset.unwrap_or(0);

    let now = clock.now();
    let (earliest_start, latest_start) = match query.time_filter {
        TimeFilter::Upcoming => (now, None),
        TimeFilter::Past => (DateTime::<Utc>::MIN_UTC, Some(now)),
        TimeFilter::All => (DateTime::<Utc>::MIN_UTC, None),
    };

    let rows = store
        .list_games_in_radius(&RadiusQuery {
            center: query.center,
            radius_meters,
            categories: query.categories,
            earliest_start,
            latest_start,
            status: query.status,
            caller_user_id: query.caller_user_id,
            limit,
            offset,
        })
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| GameSummary::from_row(row, now))
        .collect())
}
