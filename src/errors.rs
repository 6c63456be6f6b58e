//! Shared error taxonomy for the participation/listing/lifecycle engines.
//!
//! One `thiserror` enum with an axum `IntoResponse` impl, centralized
//! rather than split per route module since the same error kinds (lock
//! timeouts, ownership checks, not-found) recur across all three engines.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid argument: {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("authentication required")]
    Unauthenticated,

    #[error("only the owner may perform this action")]
    NotOwner,

    #[error("the game has already started")]
    GameAlreadyStarted,

    #[error("the game has finished")]
    GameFinished,

    #[error("the drop deadline has passed")]
    TooLate,

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("caller is not a participant of this game")]
    NotParticipant,

    #[error("timed out waiting for game lock — please try again")]
    LockTimeout,

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Machine-readable error code, stable across releases, for the
    /// `code` field of the wire error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::NotOwner => "NOT_OWNER",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::GameFinished => "GAME_FINISHED",
            Self::TooLate => "TOO_LATE",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::LockTimeout => "LOCK_TIMEOUT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotOwner | Self::GameAlreadyStarted | Self::GameFinished | Self::TooLate => {
                StatusCode::FORBIDDEN
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            // Source convention: NOT_PARTICIPANT is a 400, not a 409.
            Self::NotParticipant => StatusCode::BAD_REQUEST,
            Self::LockTimeout | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for EngineError {
    fn from(err: DbErr) -> Self {
        EngineError::Internal(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: String,
    code: &'static str,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorEnvelope {
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
