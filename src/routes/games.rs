//! `GET /games`, `POST /games`, `GET /games/:gameId`.

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    db::{entities::GameCategory, geo::GeoPoint},
    engine::{
        lifecycle::{self, CreateGameRequest, GameDetail},
        listing::{self, GameSummary, ListQuery, TimeFilter},
    },
    errors::EngineError,
    middleware::auth::{Caller, MaybeCaller},
    state::AppState,
};

fn invalid(field: &'static str, reason: &str) -> EngineError {
    EngineError::InvalidArgument {
        field,
        reason: reason.to_string(),
    }
}

/// Parses a single closed-enumeration value from its wire string form,
/// rejecting unknown values with `INVALID_ARGUMENT` rather than silently
/// falling back to some default.
fn parse_enum<T: DeserializeOwned>(field: &'static str, value: &str) -> Result<T, EngineError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| invalid(field, "unrecognized value"))
}

/// Query parameters for `GET /games`. `categories` is a comma-separated
/// list of `GameCategory` values — `axum::extract::Query` has no
/// `serde_qs`-style repeated-key support, so a comma-joined string stands
/// in for a repeatable query parameter.
#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    pub categories: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<f64>,
    #[serde(rename = "timeFilter", default)]
    pub time_filter: TimeFilter,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ListGamesResponse {
    pub games: Vec<GameSummary>,
}

pub async fn list_games(
    MaybeCaller(caller_id): MaybeCaller,
    Extension(state): Extension<AppState>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<ListGamesResponse>, EngineError> {
    let categories = query
        .categories
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_enum::<GameCategory>("categories", s))
        .collect::<Result<Vec<_>, _>>()?;

    let status = query
        .status
        .as_deref()
        .map(|s| parse_enum::<crate::db::entities::GameStatus>("status", s))
        .transpose()?;

    let games = listing::list(
        &state.store,
        state.clock.as_ref(),
        ListQuery {
            categories,
            center: GeoPoint {
                lat: query.latitude,
                lng: query.longitude,
            },
            radius_meters: query.radius,
            time_filter: query.time_filter,
            status,
            caller_user_id: caller_id,
            limit: query.limit,
            offset: query.offset,
        },
    )
    .await?;

    Ok(Json(ListGamesResponse { games }))
}

pub async fn create_game(
    Caller(owner_id): Caller,
    Extension(state): Extension<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> Result<(axum::http::StatusCode, Json<crate::db::entities::Game>), EngineError> {
    let game = lifecycle::create(&state.store, state.clock.as_ref(), owner_id, req).await?;
    Ok((axum::http::StatusCode::CREATED, Json(game)))
}

pub async fn get_game(
    Extension(state): Extension<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<GameDetail>, EngineError> {
    let detail = lifecycle::get(&state.store, state.clock.as_ref(), game_id).await?;
    Ok(Json(detail))
}
