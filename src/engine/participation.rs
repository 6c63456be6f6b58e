//! Join, Drop, and the Reconciler.

use serde::Serialize;

use crate::{
    clock::Clock,
    db::{
        entities::{Game, GameStatus, Participant, ParticipantStatus, User},
        ParticipantRow, Store,
    },
    errors::EngineError,
};

use super::DEFAULT_LOCK_DEADLINE;

/// An active participant annotated with its waitlist position (1-based,
/// `None` for confirmed rows) and the user's display name/email — spec.md
/// §4.1 requires participant listings to carry these for rendering a
/// roster. Returned by Join and used by Get.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveParticipantView {
    #[serde(flatten)]
    pub participant: Participant,
    pub user_email: String,
    pub user_given_name: String,
    pub user_family_name: String,
    pub waitlist_position: Option<u32>,
}

/// Outcome of a Drop: who, if anyone, was promoted off the waitlist.
#[derive(Debug, Clone, Serialize)]
pub struct DropResult {
    pub promoted: Option<User>,
}

/// Rejects participation changes on a game that can no longer accept
/// them: cancelled (I5 forbids further transitions) or past its end-time.
fn ensure_open_for_participation(
    game: &Game,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<(), EngineError> {
    if game.status == GameStatus::Cancelled {
        return Err(EngineError::GameFinished);
    }
    if now > game.end_at() {
        return Err(EngineError::GameFinished);
    }
    Ok(())
}

/// Annotates active participants (confirmed + waitlist, already in
/// (joined_at, id) order) with 1-based waitlist positions.
fn with_waitlist_positions(active: Vec<ParticipantRow>) -> Vec<ActiveParticipantView> {
    let mut waitlist_rank = 0u32;
    active
        .into_iter()
        .map(|row| {
            let waitlist_position = if row.participant.status == ParticipantStatus::Waitlist {
                waitlist_rank += 1;
                Some(waitlist_rank)
            } else {
                None
            };
            ActiveParticipantView {
                participant: row.participant,
                user_email: row.user.email,
                user_given_name: row.user.given_name,
                user_family_name: row.user.family_name,
                waitlist_position,
            }
        })
        .collect()
}

/// Join(caller, game).
pub async fn join(
    store: &Store,
    clock: &dyn Clock,
    game_id: i32,
    caller_id: i32,
) -> Result<Vec<ActiveParticipantView>, EngineError> {
    // Step 1-4: locked read-modify-write of the caller's own row.
    {
        let guard = store.lock_game(game_id, DEFAULT_LOCK_DEADLINE).await?;
        let now = clock.now();

        let game = store
            .get_game_txn(&guard.txn, game_id)
            .await?
            .ok_or(EngineError::NotFound)?;
        ensure_open_for_participation(&game, now)?;

        let all = store.list_all_participants_txn(&guard.txn, game_id).await?;
        let active_count = all
            .iter()
            .filter(|row| row.participant.status.is_active())
            .count() as i32;

        let existing = store
            .get_participant_by_game_and_user_txn(&guard.txn, game_id, caller_id)
            .await?;

        match existing {
            Some(row) if row.status.is_active() => {
                // Idempotent: caller already active, no write.
            }
            Some(row) => {
                let status = if active_count < game.max_participants {
                    ParticipantStatus::Confirmed
                } else {
                    ParticipantStatus::Waitlist
                };
                store
                    .update_participant_status_and_bump_joined_at_txn(&guard.txn, row, status, now)
                    .await?;
            }
            None => {
                let status = if active_count < game.max_participants {
                    ParticipantStatus::Confirmed
                } else {
                    ParticipantStatus::Waitlist
                };
                store
                    .create_participant_txn(&guard.txn, game_id, caller_id, status, now)
                    .await?;
            }
        }

        guard.commit().await?;
    }

    // Step 5: Reconciler.
    reconcile(store, clock, game_id).await?;

    // Step 6: re-read active list with waitlist positions.
    let active = store.list_active_participants(game_id).await?;
    Ok(with_waitlist_positions(active))
}

/// Drop(caller, game).
///
/// Always reconciles after a
/// confirmed-participant drop (rather than only promoting when the
/// pre-drop active count exceeded capacity), which also self-heals any
/// pre-existing capacity-invariant drift.
pub async fn drop(
    store: &Store,
    clock: &dyn Clock,
    game_id: i32,
    caller_id: i32,
) -> Result<DropResult, EngineError> {
    let now = clock.now();
    let game = store.get_game(game_id).await?.ok_or(EngineError::NotFound)?;

    ensure_open_for_participation(&game, now)?;
    if let Some(drop_deadline) = game.drop_deadline {
        if now > drop_deadline {
            return Err(EngineError::TooLate);
        }
    }

    let row = store
        .get_participant_by_game_and_user(game_id, caller_id)
        .await?
        .ok_or(EngineError::NotParticipant)?;

    if row.status == ParticipantStatus::Dropped {
        return Ok(DropResult { promoted: None });
    }

    let was_confirmed = row.status == ParticipantStatus::Confirmed;
    let dropped_participant_id = row.id;

    {
        let guard = store.lock_game(game_id, DEFAULT_LOCK_DEADLINE).await?;
        let row = store
            .get_participant_by_game_and_user_txn(&guard.txn, game_id, caller_id)
            .await?
            .ok_or(EngineError::NotParticipant)?;
        store
            .update_participant_status_txn(&guard.txn, row, ParticipantStatus::Dropped, now)
            .await?;
        guard.commit().await?;
    }

    if !was_confirmed {
        return Ok(DropResult { promoted: None });
    }

    reconcile(store, clock, game_id).await?;

    // Detect the promotee: the active row occupying position
    // `max_participants` (1-based) in (joined_at, id) order, if it isn't
    // the dropped caller's own (now-inactive) row.
    let active = store.list_active_participants(game_id).await?;
    let promoted = active
        .into_iter()
        .enumerate()
        .find(|(idx, row)| {
            *idx + 1 == game.max_participants as usize
                && row.participant.status == ParticipantStatus::Confirmed
                && row.participant.id != dropped_participant_id
        })
        .map(|(_, row)| row.user);

    Ok(DropResult { promoted })
}

/// The Reconciler: restores the capacity invariant after any state mutation.
///
/// Phase A (lock-free scan) walks active participants in (joined_at, id)
/// order and determines the prescribed status for each. If nothing would
/// change, returns without taking the lock. Otherwise Phase B reacquires
/// the lock and issues the two batch updates.
pub async fn reconcile(store: &Store, clock: &dyn Clock, game_id: i32) -> Result<(), EngineError> {
    let game = store.get_game(game_id).await?.ok_or(EngineError::NotFound)?;
    if game.status == GameStatus::Cancelled {
        return Ok(());
    }

    let all = store.list_all_participants(game_id).await?;
    let mut active: Vec<&Participant> = all
        .iter()
        .map(|row| &row.participant)
        .filter(|p| p.status.is_active())
        .collect();
    active.sort_by_key(|p| p.order_key());

    let mut to_confirm = Vec::new();
    let mut to_waitlist = Vec::new();

    for (idx, participant) in active.iter().enumerate() {
        let rank = idx as i32 + 1;
        let prescribed = if rank <= game.max_participants {
            ParticipantStatus::Confirmed
        } else {
            ParticipantStatus::Waitlist
        };

        match (participant.status, prescribed) {
            (ParticipantStatus::Waitlist, ParticipantStatus::Confirmed) => {
                to_confirm.push(participant.id)
            }
            (ParticipantStatus::Confirmed, ParticipantStatus::Waitlist) => {
                to_waitlist.push(participant.id)
            }
            _ => {}
        }
    }

    if to_confirm.is_empty() && to_waitlist.is_empty() {
        return Ok(());
    }

    let now = clock.now();
    let guard = store.lock_game(game_id, DEFAULT_LOCK_DEADLINE).await?;
    store
        .batch_update_participant_status_txn(&guard.txn, &to_confirm, ParticipantStatus::Confirmed, now)
        .await?;
    store
        .batch_update_participant_status_txn(&guard.txn, &to_waitlist, ParticipantStatus::Waitlist, now)
        .await?;
    guard.commit().await?;

    Ok(())
}
