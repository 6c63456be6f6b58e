//! Participation Engine integration tests covering Join, Drop, and the
//! Reconciler's capacity/FIFO behavior.

mod common;

use chrono::{Duration, Utc};
use pickup_games::{
    db::entities::{GameCategory, ParticipantStatus, PricingType, SkillLevel},
    engine::{
        lifecycle::{self, CreateGameRequest},
        participation,
    },
};

async fn make_game(
    store: &pickup_games::db::Store,
    clock: &pickup_games::clock::FakeClock,
    owner_id: i32,
    max_participants: i32,
    drop_deadline: Option<chrono::DateTime<Utc>>,
) -> pickup_games::db::entities::Game {
    let start_at = clock.now() + Duration::hours(24);
    let req = CreateGameRequest {
        category: GameCategory::Soccer,
        title: None,
        description: None,
        notes: None,
        location_name: "Pier 40".to_string(),
        location_address: None,
        location_lat: 40.7829,
        location_lng: -73.9654,
        location_notes: None,
        start_at,
        duration_minutes: 90,
        max_participants,
        pricing_type: PricingType::Free,
        pricing_amount_cents: 0,
        pricing_currency: "USD".to_string(),
        signup_deadline: None,
        drop_deadline,
        skill_level: Some(SkillLevel::All),
    };
    lifecycle::create(store, clock, owner_id, req)
        .await
        .expect("game creation should succeed")
}

/// Waitlist promotion: A, B confirmed, C waitlisted at max=2; A drops
/// and C is promoted.
#[tokio::test]
async fn waitlist_promotion_on_drop() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let b = common::make_user(&store, &clock, "b@example.com").await;
    let c = common::make_user(&store, &clock, "c@example.com").await;

    let game = make_game(&store, &clock, owner.id, 2, None).await;

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    participation::join(&store, &clock, game.id, b.id).await.unwrap();
    let after_c = participation::join(&store, &clock, game.id, c.id).await.unwrap();

    let c_row = after_c.iter().find(|v| v.participant.user_id == c.id).unwrap();
    assert_eq!(c_row.participant.status, ParticipantStatus::Waitlist);
    assert_eq!(c_row.waitlist_position, Some(1));

    let result = participation::drop(&store, &clock, game.id, a.id).await.unwrap();
    assert_eq!(result.promoted.as_ref().map(|u| u.id), Some(c.id));

    let active = store.list_active_participants(game.id).await.unwrap();
    let b_status = active
        .iter()
        .find(|row| row.participant.user_id == b.id)
        .unwrap()
        .participant
        .status;
    let c_status = active
        .iter()
        .find(|row| row.participant.user_id == c.id)
        .unwrap()
        .participant
        .status;
    assert_eq!(b_status, ParticipantStatus::Confirmed);
    assert_eq!(c_status, ParticipantStatus::Confirmed);
}

/// Rejoin goes to the back: C drops, D joins taking waitlist position
/// 1, C rejoins landing at position 2 (joined_at reset).
#[tokio::test]
async fn rejoin_goes_to_the_back_of_the_waitlist() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let b = common::make_user(&store, &clock, "b@example.com").await;
    let c = common::make_user(&store, &clock, "c@example.com").await;
    let d = common::make_user(&store, &clock, "d@example.com").await;

    let game = make_game(&store, &clock, owner.id, 2, None).await;

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    participation::join(&store, &clock, game.id, b.id).await.unwrap();
    participation::join(&store, &clock, game.id, c.id).await.unwrap();

    participation::drop(&store, &clock, game.id, c.id).await.unwrap();

    clock.advance(Duration::minutes(1));
    let after_d = participation::join(&store, &clock, game.id, d.id).await.unwrap();
    let d_row = after_d.iter().find(|v| v.participant.user_id == d.id).unwrap();
    assert_eq!(d_row.waitlist_position, Some(1));

    clock.advance(Duration::minutes(1));
    let after_c = participation::join(&store, &clock, game.id, c.id).await.unwrap();
    let c_row = after_c.iter().find(|v| v.participant.user_id == c.id).unwrap();
    assert_eq!(c_row.waitlist_position, Some(2));
}

/// Idempotent double join: no duplicate row, exactly one
/// confirmed entry for the caller.
#[tokio::test]
async fn idempotent_double_join() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let game = make_game(&store, &clock, owner.id, 4, None).await;

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    let second = participation::join(&store, &clock, game.id, a.id).await.unwrap();

    let rows: Vec<_> = second.iter().filter(|v| v.participant.user_id == a.id).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant.status, ParticipantStatus::Confirmed);
}

/// Drop-drop idempotence: the second drop is a no-op returning
/// promoted=none.
#[tokio::test]
async fn drop_is_idempotent() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let game = make_game(&store, &clock, owner.id, 4, None).await;

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    participation::drop(&store, &clock, game.id, a.id).await.unwrap();
    let second = participation::drop(&store, &clock, game.id, a.id).await.unwrap();
    assert!(second.promoted.is_none());
}

/// max=2 with three joiners yields two confirmed, one waitlisted at
/// position 1.
#[tokio::test]
async fn three_joiners_at_capacity_two_splits_confirmed_and_waitlist() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let b = common::make_user(&store, &clock, "b@example.com").await;
    let c = common::make_user(&store, &clock, "c@example.com").await;
    let game = make_game(&store, &clock, owner.id, 2, None).await;

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    participation::join(&store, &clock, game.id, b.id).await.unwrap();
    let after_c = participation::join(&store, &clock, game.id, c.id).await.unwrap();

    let confirmed = after_c
        .iter()
        .filter(|v| v.participant.status == ParticipantStatus::Confirmed)
        .count();
    let waitlisted = after_c
        .iter()
        .filter(|v| v.participant.status == ParticipantStatus::Waitlist)
        .count();
    assert_eq!(confirmed, 2);
    assert_eq!(waitlisted, 1);
    let c_row = after_c.iter().find(|v| v.participant.user_id == c.id).unwrap();
    assert_eq!(c_row.waitlist_position, Some(1));
}

/// A join at now == start_at is permitted; a join after end-time
/// fails GAME_FINISHED.
#[tokio::test]
async fn join_boundary_at_start_and_after_finish() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let game = make_game(&store, &clock, owner.id, 4, None).await;

    clock.set(game.start_at);
    participation::join(&store, &clock, game.id, a.id)
        .await
        .expect("join at start_at must be permitted");

    clock.set(game.end_at() + Duration::minutes(1));
    let b = common::make_user(&store, &clock, "b@example.com").await;
    let err = participation::join(&store, &clock, game.id, b.id)
        .await
        .expect_err("join after end-time must fail");
    assert_eq!(err.code(), "GAME_FINISHED");
}

/// A drop after the drop-deadline fails TOO_LATE and leaves the
/// participant row unchanged.
#[tokio::test]
async fn drop_after_deadline_fails_too_late() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let p = common::make_user(&store, &clock, "p@example.com").await;
    let drop_deadline = clock.now() - Duration::hours(24);
    let game = make_game(&store, &clock, owner.id, 4, Some(drop_deadline)).await;

    participation::join(&store, &clock, game.id, p.id).await.unwrap();

    let err = participation::drop(&store, &clock, game.id, p.id)
        .await
        .expect_err("drop past the deadline must fail");
    assert_eq!(err.code(), "TOO_LATE");

    let row = store
        .get_participant_by_game_and_user(game.id, p.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ParticipantStatus::Confirmed);
}

/// Drop by a not-yet-participant fails NOT_PARTICIPANT.
#[tokio::test]
async fn drop_by_non_participant_fails() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let bystander = common::make_user(&store, &clock, "bystander@example.com").await;
    let game = make_game(&store, &clock, owner.id, 4, None).await;

    let err = participation::drop(&store, &clock, game.id, bystander.id)
        .await
        .expect_err("non-participant drop must fail");
    assert_eq!(err.code(), "NOT_PARTICIPANT");
}

/// Drop by a waitlisted participant preserves all confirmed rows.
#[tokio::test]
async fn waitlist_drop_preserves_confirmed() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let b = common::make_user(&store, &clock, "b@example.com").await;
    let c = common::make_user(&store, &clock, "c@example.com").await;
    let game = make_game(&store, &clock, owner.id, 2, None).await;

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    participation::join(&store, &clock, game.id, b.id).await.unwrap();
    participation::join(&store, &clock, game.id, c.id).await.unwrap();

    let result = participation::drop(&store, &clock, game.id, c.id).await.unwrap();
    assert!(result.promoted.is_none());

    let active = store.list_active_participants(game.id).await.unwrap();
    let confirmed: Vec<_> = active
        .iter()
        .filter(|row| row.participant.status == ParticipantStatus::Confirmed)
        .map(|row| row.participant.user_id)
        .collect();
    assert_eq!(confirmed.len(), 2);
    assert!(confirmed.contains(&a.id));
    assert!(confirmed.contains(&b.id));
}
