//! Game Lifecycle integration tests — Create/Get/Cancel.

mod common;

use chrono::{Duration, Utc};
use pickup_games::{
    db::entities::{GameCategory, GameStatus, PricingType, SkillLevel},
    engine::{lifecycle, participation},
};

fn base_request(start_at: chrono::DateTime<Utc>) -> lifecycle::CreateGameRequest {
    lifecycle::CreateGameRequest {
        category: GameCategory::Basketball,
        title: Some("Pickup run".to_string()),
        description: None,
        notes: None,
        location_name: "Riverside Courts".to_string(),
        location_address: None,
        location_lat: 40.7829,
        location_lng: -73.9654,
        location_notes: None,
        start_at,
        duration_minutes: 90,
        max_participants: 10,
        pricing_type: PricingType::Free,
        pricing_amount_cents: 0,
        pricing_currency: "USD".to_string(),
        signup_deadline: None,
        drop_deadline: None,
        skill_level: Some(SkillLevel::All),
    }
}

/// Create rejects a past start_at with INVALID_ARGUMENT.
#[tokio::test]
async fn create_rejects_past_start_at() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;

    let req = base_request(clock.now() - Duration::hours(1));
    let err = lifecycle::create(&store, &clock, owner.id, req)
        .await
        .expect_err("past start_at must be rejected");
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

/// Create rejects duration < 15 and max_participants < 2.
#[tokio::test]
async fn create_rejects_invalid_duration_and_capacity() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;

    let mut req = base_request(clock.now() + Duration::hours(24));
    req.duration_minutes = 5;
    let err = lifecycle::create(&store, &clock, owner.id, req)
        .await
        .expect_err("short duration must be rejected");
    assert_eq!(err.code(), "INVALID_ARGUMENT");

    let mut req = base_request(clock.now() + Duration::hours(24));
    req.max_participants = 1;
    let err = lifecycle::create(&store, &clock, owner.id, req)
        .await
        .expect_err("max_participants < 2 must be rejected");
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

/// Create defaults signup_deadline to start_at and skill_level to `all`.
#[tokio::test]
async fn create_defaults_signup_deadline_and_skill_level() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;

    let mut req = base_request(clock.now() + Duration::hours(24));
    req.skill_level = None;
    let game = lifecycle::create(&store, &clock, owner.id, req)
        .await
        .expect("valid game creation should succeed");

    assert_eq!(game.signup_deadline, game.start_at);
    assert_eq!(game.skill_level, SkillLevel::All);
    assert_eq!(game.status, GameStatus::Open);
}

/// Cancel snapshots active participants as the notify list; a second
/// cancel is idempotent.
#[tokio::test]
async fn cancel_notifies_active_participants_and_is_idempotent() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let b = common::make_user(&store, &clock, "b@example.com").await;

    let req = base_request(clock.now() + Duration::hours(24));
    let mut req = req;
    req.max_participants = 10;
    let game = lifecycle::create(&store, &clock, owner.id, req).await.unwrap();

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    participation::join(&store, &clock, game.id, b.id).await.unwrap();

    let notify = lifecycle::cancel(&store, &clock, owner.id, game.id).await.unwrap();
    let mut notified_ids: Vec<_> = notify.iter().map(|u| u.id).collect();
    notified_ids.sort();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(notified_ids, expected);

    let second = lifecycle::cancel(&store, &clock, owner.id, game.id).await.unwrap();
    assert!(second.is_empty());
}

/// Only the owner may cancel a game.
#[tokio::test]
async fn cancel_rejects_non_owner() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let stranger = common::make_user(&store, &clock, "stranger@example.com").await;

    let req = base_request(clock.now() + Duration::hours(24));
    let game = lifecycle::create(&store, &clock, owner.id, req).await.unwrap();

    let err = lifecycle::cancel(&store, &clock, stranger.id, game.id)
        .await
        .expect_err("non-owner cancel must be rejected");
    assert_eq!(err.code(), "NOT_OWNER");
}

/// Cancel after the game has started but before it ends fails
/// GAME_ALREADY_STARTED.
#[tokio::test]
async fn cancel_rejects_after_game_started() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;

    let req = base_request(clock.now() + Duration::hours(1));
    let game = lifecycle::create(&store, &clock, owner.id, req).await.unwrap();

    clock.set(game.start_at + Duration::minutes(5));
    let err = lifecycle::cancel(&store, &clock, owner.id, game.id)
        .await
        .expect_err("cancel after start must be rejected");
    assert_eq!(err.code(), "GAME_ALREADY_STARTED");
}

/// Get returns the confirmed/waitlist split with 1-based waitlist
/// positions.
#[tokio::test]
async fn get_splits_confirmed_and_waitlist() {
    let (store, clock) = common::setup(Utc::now()).await;
    let owner = common::make_user(&store, &clock, "owner@example.com").await;
    let a = common::make_user(&store, &clock, "a@example.com").await;
    let b = common::make_user(&store, &clock, "b@example.com").await;
    let c = common::make_user(&store, &clock, "c@example.com").await;

    let mut req = base_request(clock.now() + Duration::hours(24));
    req.max_participants = 2;
    let game = lifecycle::create(&store, &clock, owner.id, req).await.unwrap();

    participation::join(&store, &clock, game.id, a.id).await.unwrap();
    participation::join(&store, &clock, game.id, b.id).await.unwrap();
    participation::join(&store, &clock, game.id, c.id).await.unwrap();

    let detail = lifecycle::get(&store, &clock, game.id).await.unwrap();
    assert_eq!(detail.confirmed_participants.len(), 2);
    assert_eq!(detail.waitlist.len(), 1);
    assert_eq!(detail.waitlist[0].waitlist_position, Some(1));
    assert_eq!(detail.owner.id, owner.id);
}
