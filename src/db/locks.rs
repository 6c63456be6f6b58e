//! The per-game exclusive lock primitive backing `Store::lock_game`.
//!
//! An in-process keyed mutex stands in for a database row lock on a
//! single-node deployment: `parking_lot` guards the registry itself, and
//! a `tokio::sync::Mutex` per game serializes the actual critical section.

use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex as SyncMutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::errors::EngineError;

#[derive(Default)]
pub struct GameLocks {
    locks: SyncMutex<HashMap<i32, Arc<AsyncMutex<()>>>>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, game_id: i32) -> Arc<AsyncMutex<()>> {
        self.locks
            .lock()
            .entry(game_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Acquires the exclusive lock for `game_id`, failing with
    /// [`EngineError::LockTimeout`] if it is not free within `deadline`.
    pub async fn acquire(
        &self,
        game_id: i32,
        deadline: Duration,
    ) -> Result<OwnedMutexGuard<()>, EngineError> {
        let mutex = self.entry(game_id);
        tokio::time::timeout(deadline, mutex.lock_owned())
            .await
            .map_err(|_| EngineError::LockTimeout)
    }
}
