//! Entry point: wires the Store, Clock, and HTTP router together and
//! serves them with axum — load config, init logging, connect to the
//! database, then serve until interrupted.

use std::{net::SocketAddr, sync::Arc};

use axum::Extension;
use log::{error, info};
use tokio::{net::TcpListener, signal};

use pickup_games::{
    clock::SystemClock,
    config::{self, Config},
    db::{self, Store},
    logging, routes,
    state::AppState,
};

#[tokio::main]
async fn main() {
    let config: Config = config::load_config();

    logging::setup(config.logging);

    let connection = match db::connect(&config.database_url).await {
        Ok(connection) => connection,
        Err(err) => {
            error!("failed to connect to database: {err}");
            return;
        }
    };

    let store = Arc::new(Store::new(connection));
    let clock: Arc<dyn pickup_games::clock::Clock> = Arc::new(SystemClock);
    let state = AppState::new(store, clock);

    let addr = SocketAddr::new(config.host, config.port);
    let router = routes::router().layer(Extension(state));

    info!("starting pickup games backend on {addr}");

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind HTTP server on {addr}: {err}");
            return;
        }
    };

    if let Err(err) = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = signal::ctrl_c().await;
        })
        .await
    {
        error!("HTTP server error: {err}");
    }
}
