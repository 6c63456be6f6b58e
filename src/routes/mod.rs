//! The HTTP boundary wiring the `/v1` wire surface to the engines:
//! authentication, game listing/creation, and participation.

mod auth;
mod games;
mod participation;

use axum::{
    routing::{get, post},
    Router,
};

/// Builds the full `/v1`-prefixed router.
pub fn router() -> Router {
    Router::new().nest(
        "/v1",
        Router::new()
            .nest(
                "/auth",
                Router::new()
                    .route("/register", post(auth::register))
                    .route("/login", post(auth::login)),
            )
            .nest(
                "/games",
                Router::new()
                    .route("/", get(games::list_games).post(games::create_game))
                    .route("/:game_id", get(games::get_game))
                    .route(
                        "/:game_id/participation",
                        post(participation::join).delete(participation::drop_participation),
                    )
                    .route("/:game_id/cancel", post(participation::cancel)),
            ),
    )
}
