//! `POST|DELETE /games/:gameId/participation`, `POST /games/:gameId/cancel`.

use axum::{extract::Path, Extension, Json};
use serde::Serialize;

use crate::{
    engine::participation::{self, ActiveParticipantView},
    errors::EngineError,
    middleware::auth::Caller,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /games/:gameId/participation` — Join. Returns the full active
/// participant list with waitlist positions.
pub async fn join(
    Caller(caller_id): Caller,
    Extension(state): Extension<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<Vec<ActiveParticipantView>>, EngineError> {
    let active = participation::join(&state.store, state.clock.as_ref(), game_id, caller_id).await?;
    Ok(Json(active))
}

/// `DELETE /games/:gameId/participation` — Drop.
pub async fn drop_participation(
    Caller(caller_id): Caller,
    Extension(state): Extension<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<MessageResponse>, EngineError> {
    let result = participation::drop(&state.store, state.clock.as_ref(), game_id, caller_id).await?;
    let message = match result.promoted {
        Some(user) => format!("dropped; {} promoted off the waitlist", user.email),
        None => "dropped".to_string(),
    };
    Ok(Json(MessageResponse { message }))
}

/// `POST /games/:gameId/cancel` — owner-only cancel.
pub async fn cancel(
    Caller(caller_id): Caller,
    Extension(state): Extension<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<MessageResponse>, EngineError> {
    let notify = crate::engine::lifecycle::cancel(&state.store, state.clock.as_ref(), caller_id, game_id)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("game cancelled; {} participant(s) notified", notify.len()),
    }))
}
