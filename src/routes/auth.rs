//! `/auth/register`, `/auth/login`.
//!
//! Full token issuance (signing, refresh-token storage) is an external
//! collaborator; the `token` returned here is a minimal
//! opaque stand-in (the caller's user id) that a client echoes back as
//! the `X-User-Id` header recognized by [`crate::middleware::auth`] — not
//! a production bearer token.

use axum::{Extension, Json};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{db::entities::User, errors::EngineError, state::AppState, utils::hashing};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

fn invalid(field: &'static str, reason: &str) -> EngineError {
    EngineError::InvalidArgument {
        field,
        reason: reason.to_string(),
    }
}

fn validate_register(req: &RegisterRequest) -> Result<(), EngineError> {
    if !(1..=100).contains(&req.first_name.len()) {
        return Err(invalid("firstName", "must be 1-100 characters"));
    }
    if !(1..=100).contains(&req.last_name.len()) {
        return Err(invalid("lastName", "must be 1-100 characters"));
    }
    if !EmailAddress::is_valid(&req.email) {
        return Err(invalid("email", "must be a valid email address"));
    }
    if !(8..=128).contains(&req.password.len()) {
        return Err(invalid("password", "must be 8-128 characters"));
    }
    Ok(())
}

pub async fn register(
    Extension(state): Extension<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<AuthResponse>), EngineError> {
    validate_register(&req)?;

    if state.store.get_user_by_email(&req.email).await?.is_some() {
        return Err(EngineError::AlreadyExists);
    }

    let password_hash = hashing::hash_password(&req.password)
        .map_err(|err| EngineError::Internal(err.to_string()))?;

    let now = state.clock.now();
    let user = state
        .store
        .create_user(req.email, req.first_name, req.last_name, password_hash, now)
        .await?;

    let token = user.id.to_string();
    Ok((axum::http::StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn login(
    Extension(state): Extension<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, EngineError> {
    let user = state
        .store
        .get_user_by_email(&req.email)
        .await?
        .ok_or(EngineError::Unauthenticated)?;

    if !hashing::verify_password(&req.password, &user.password_hash) {
        return Err(EngineError::Unauthenticated);
    }

    let token = user.id.to_string();
    Ok(Json(AuthResponse { user, token }))
}
