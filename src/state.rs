//! Shared application state injected into the axum router as an
//! `Extension<AppState>` layer so every handler gets one clone of the
//! store and clock without a process-wide global.

use std::sync::Arc;

use crate::{clock::Clock, db::Store};

/// Handed to every request as two `Extension` layers (see `main.rs`).
/// Bundled here so route modules only need one import.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}
