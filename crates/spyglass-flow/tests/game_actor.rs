//! Integration tests for the game actor on the Tokio clock.
//!
//! `start_paused = true` lets the runtime jump the clock forward whenever
//! the actor is idle, so reveal gates and discussion timers finish at once.

use spyglass_catalog::{Category, StaticCatalog};
use spyglass_flow::{
    DiscussionStage, FlowConfig, FlowError, FlowSnapshot, GameHandle, Page, Phase, spawn_game,
};
use spyglass_session::{CategorySelection, GameSettings};
use tokio::sync::watch;

// =========================================================================
// Helpers
// =========================================================================

fn start() -> GameHandle {
    let catalog = StaticCatalog::new(vec![
        Category::new("Animals", ["Cat", "Dog", "Otter"]),
        Category::new("Food", ["Soup", "Bread"]),
    ])
    .unwrap();
    spawn_game(
        catalog,
        FlowConfig {
            rng_seed: Some(99),
            ..FlowConfig::default()
        },
    )
}

fn settings(players: usize, timer_seconds: u32) -> GameSettings {
    GameSettings {
        player_count: players,
        spy_count: 1,
        categories: CategorySelection::from_keys(["Animals"]),
        timer_seconds,
        ..GameSettings::default()
    }
}

async fn wait_for(
    rx: &mut watch::Receiver<FlowSnapshot>,
    pred: impl FnMut(&FlowSnapshot) -> bool,
) -> FlowSnapshot {
    rx.wait_for(pred).await.unwrap().clone()
}

// =========================================================================
// Rounds
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_actor_plays_full_round() {
    let game = start();
    let mut rx = game.subscribe();

    assert_eq!(
        game.start_game(settings(3, 30)).await.unwrap(),
        Phase::PlayerTransition
    );

    for _ in 0..3 {
        assert_eq!(game.ready().await.unwrap(), Phase::Reveal);
        wait_for(&mut rx, |s| s.reveal_gate.is_finished).await;
        game.hide_and_pass().await.unwrap();
    }

    let snap = game.latest();
    assert_eq!(snap.phase, Phase::DiscussionTimer);
    assert_eq!(snap.discussion.remaining_seconds, 30);

    let done = wait_for(&mut rx, |s| {
        s.discussion_stage == Some(DiscussionStage::TimesUp)
    })
    .await;
    assert_eq!(done.discussion.remaining_seconds, 0);
    assert!(done.discussion.is_finished);

    assert_eq!(game.acknowledge_times_up().await.unwrap(), Phase::Setup);
    assert!(game.latest().session.is_none());
    game.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_actor_rejects_early_hide_and_pass() {
    let game = start();
    game.start_game(settings(2, 10)).await.unwrap();
    game.ready().await.unwrap();

    let err = game.hide_and_pass().await.unwrap_err();
    assert!(matches!(
        err,
        FlowError::RevealGateClosed {
            remaining_seconds: 5
        }
    ));
    assert_eq!(game.snapshot().await.unwrap().phase, Phase::Reveal);
}

#[tokio::test(start_paused = true)]
async fn test_actor_reports_invalid_settings() {
    let game = start();
    let err = game.start_game(settings(1, 10)).await.unwrap_err();
    assert!(matches!(err, FlowError::Session(_)));
    assert_eq!(game.latest().phase, Phase::Setup);
}

// =========================================================================
// Navigation and lifecycle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_actor_overlay_and_abandon() {
    let game = start();
    game.start_game(settings(4, 10)).await.unwrap();

    assert_eq!(game.navigate(Page::Rules).await.unwrap(), Phase::PlayerTransition);
    assert_eq!(game.latest().overlay, Some(Page::Rules));
    assert!(matches!(
        game.navigate(Page::Setup).await,
        Err(FlowError::SessionInProgress)
    ));

    assert_eq!(game.abandon_session().await.unwrap(), Phase::Setup);
    let snap = game.latest();
    assert_eq!(snap.overlay, None);
    assert!(snap.session.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_actor_overlay_holds_discussion_clock() {
    let game = start();
    let mut rx = game.subscribe();

    game.start_game(settings(2, 10)).await.unwrap();
    for _ in 0..2 {
        game.ready().await.unwrap();
        wait_for(&mut rx, |s| s.reveal_gate.is_finished).await;
        game.hide_and_pass().await.unwrap();
    }

    game.navigate(Page::Faq).await.unwrap();
    let held = game.latest().discussion;
    assert!(!held.is_running);

    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    let snap = game.snapshot().await.unwrap();
    assert_eq!(snap.discussion, held);
    assert_eq!(snap.discussion_stage, Some(DiscussionStage::Running));

    assert_eq!(game.return_to_game().await.unwrap(), Phase::DiscussionTimer);
    let done = wait_for(&mut rx, |s| s.discussion_stage == Some(DiscussionStage::TimesUp)).await;
    assert!(done.discussion.is_finished);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_timer_never_reaches_next_round() {
    let game = start();
    let mut rx = game.subscribe();

    game.start_game(settings(2, 1)).await.unwrap();
    for _ in 0..2 {
        game.ready().await.unwrap();
        wait_for(&mut rx, |s| s.reveal_gate.is_finished).await;
        game.hide_and_pass().await.unwrap();
    }
    game.abandon_session().await.unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    let snap = game.snapshot().await.unwrap();
    assert_eq!(snap.phase, Phase::Setup);
    assert!(!snap.discussion.is_running);
    assert!(!snap.discussion.is_finished);
}

#[tokio::test(start_paused = true)]
async fn test_handle_unavailable_after_shutdown() {
    let game = start();
    assert!(format!("{game:?}").contains("GameHandle"));
    game.shutdown().await.unwrap();
    tokio::task::yield_now().await;

    assert!(matches!(game.ready().await, Err(FlowError::Unavailable)));
}
