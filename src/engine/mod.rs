//! The participation state machine, game lifecycle, and listing query —
//! the core domain logic of the pickup games backend.

pub mod lifecycle;
pub mod listing;
pub mod participation;

use std::time::Duration;

/// Default deadline for acquiring a game's exclusive lock before surfacing
/// `LOCK_TIMEOUT` to the caller.
pub const DEFAULT_LOCK_DEADLINE: Duration = Duration::from_secs(5);
