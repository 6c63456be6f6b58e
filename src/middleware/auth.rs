//! `Caller` extractor — the caller's identity is supplied via a trusted
//! token claim, and the core only ever sees an already-validated user id.
//! Real bearer-token verification (JWT issuance, refresh tokens) is an
//! external collaborator; this extractor stands in for it by trusting a
//! header that an upstream gateway is assumed to have set after doing
//! that verification.

use std::future::Future;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::{errors::EngineError, state::AppState};

/// Header an upstream auth gateway is trusted to set after verifying the
/// caller's bearer token.
const CALLER_HEADER: &str = "x-user-id";

/// A request whose caller has been authenticated; wraps the caller's
/// user id after confirming the user still exists.
pub struct Caller(pub i32);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = EngineError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let header = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let app_state = parts
            .extensions
            .get::<AppState>()
            .expect("AppState extension missing")
            .clone();

        Box::pin(async move {
            let user_id: i32 = header
                .ok_or(EngineError::Unauthenticated)?
                .parse()
                .map_err(|_| EngineError::Unauthenticated)?;

            app_state
                .store
                .get_user_by_id(user_id)
                .await?
                .ok_or(EngineError::Unauthenticated)?;

            Ok(Caller(user_id))
        })
    }
}

/// Same as [`Caller`] but permits an absent/invalid header, used by
/// `GET /games` whose `caller-user-id` is optional.
pub struct MaybeCaller(pub Option<i32>);

impl<S> FromRequestParts<S> for MaybeCaller
where
    S: Send + Sync,
{
    type Rejection = EngineError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth = Caller::from_request_parts(parts, state);
        Box::pin(async move {
            match auth.await {
                Ok(Caller(id)) => Ok(MaybeCaller(Some(id))),
                Err(EngineError::Unauthenticated) => Ok(MaybeCaller(None)),
                Err(err) => Err(err),
            }
        })
    }
}
