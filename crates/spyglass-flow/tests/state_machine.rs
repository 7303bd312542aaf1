//! Full rounds driven synchronously with a manual clock and a seeded RNG.

use rand::SeedableRng;
use rand::rngs::StdRng;
use spyglass_catalog::{Category, StaticCatalog};
use spyglass_flow::{
    DiscussionStage, FlowConfig, FlowError, FlowNotice, GameMachine, Page, Phase, TickReceiver,
};
use spyglass_session::{CategorySelection, GameSettings, SessionError};
use spyglass_tick::ManualScheduler;

// =========================================================================
// Helpers
// =========================================================================

type Machine = GameMachine<StaticCatalog, ManualScheduler, StdRng>;

struct Table {
    machine: Machine,
    clock: ManualScheduler,
    ticks: TickReceiver,
}

impl Table {
    fn new() -> Self {
        let catalog = StaticCatalog::new(vec![
            Category::new("Animals", ["Cat", "Dog", "Otter"]),
            Category::new("Places", ["Airport", "Library"]),
        ])
        .unwrap();
        let clock = ManualScheduler::new();
        let (machine, ticks) = GameMachine::new(
            catalog,
            clock.clone(),
            StdRng::seed_from_u64(2024),
            FlowConfig::default(),
        );
        Self {
            machine,
            clock,
            ticks,
        }
    }

    /// Advances the manual clock and applies every tick it produced.
    fn wait(&mut self, secs: u64) -> Vec<FlowNotice> {
        self.clock.advance_secs(secs);
        self.machine.pump(&mut self.ticks)
    }

    /// One seat: ready, wait out the gate, hide and pass.
    fn take_turn(&mut self) -> Phase {
        assert_eq!(self.machine.ready().unwrap(), Phase::Reveal);
        self.wait(5);
        self.machine.hide_and_pass().unwrap()
    }
}

fn animals_round() -> GameSettings {
    GameSettings {
        player_count: 4,
        spy_count: 1,
        categories: CategorySelection::from_keys(["Animals"]),
        timer_seconds: 60,
        ..GameSettings::default()
    }
}

// =========================================================================
// Whole rounds
// =========================================================================

#[test]
fn test_four_player_round_reaches_discussion_with_full_timer() {
    let mut t = Table::new();
    assert_eq!(
        t.machine.start_game(animals_round()).unwrap(),
        Phase::PlayerTransition
    );
    assert_eq!(t.machine.session().unwrap().category().label(), "Animals");

    let mut phases = Vec::new();
    for seat in 0..4 {
        assert_eq!(t.machine.phase(), Phase::PlayerTransition);
        assert_eq!(t.machine.session().unwrap().current_player_index(), seat);
        phases.push(t.take_turn());
    }

    assert_eq!(
        phases,
        vec![
            Phase::PlayerTransition,
            Phase::PlayerTransition,
            Phase::PlayerTransition,
            Phase::DiscussionTimer,
        ]
    );
    let timer = t.machine.discussion_timer();
    assert_eq!(timer.remaining_seconds, 60);
    assert!(timer.is_running);
    assert_eq!(t.machine.discussion_stage(), Some(DiscussionStage::Running));
}

#[test]
fn test_discussion_ends_exactly_once_then_returns_to_setup() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    for _ in 0..4 {
        t.take_turn();
    }

    assert!(t.wait(59).is_empty());
    assert_eq!(t.machine.discussion_timer().remaining_seconds, 1);

    assert_eq!(t.wait(1), vec![FlowNotice::DiscussionEnded]);
    assert_eq!(t.machine.discussion_stage(), Some(DiscussionStage::TimesUp));

    // Observing again, or letting more time pass, fires nothing new.
    assert!(t.wait(30).is_empty());
    assert!(t.machine.snapshot().discussion.is_finished);

    assert_eq!(t.machine.acknowledge_times_up().unwrap(), Phase::Setup);
    assert!(t.machine.session().is_none());
    assert_eq!(t.clock.live(), 0);
}

#[test]
fn test_spy_count_equal_to_players_leaves_machine_in_setup() {
    let mut t = Table::new();
    let settings = GameSettings {
        spy_count: 4,
        ..animals_round()
    };

    let err = t.machine.start_game(settings).unwrap_err();
    assert!(matches!(
        err,
        FlowError::Session(SessionError::InvalidConfiguration(_))
    ));
    assert_eq!(t.machine.phase(), Phase::Setup);
    assert!(t.machine.session().is_none());
}

#[test]
fn test_rounds_can_be_played_back_to_back() {
    let mut t = Table::new();
    for _ in 0..2 {
        t.machine.start_game(animals_round()).unwrap();
        for _ in 0..4 {
            t.take_turn();
        }
        t.wait(60);
        t.machine.acknowledge_times_up().unwrap();
    }
    assert_eq!(t.machine.phase(), Phase::Setup);
}

// =========================================================================
// Reveal gate
// =========================================================================

#[test]
fn test_reveal_gate_opens_once_after_five_seconds() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.machine.ready().unwrap();

    assert!(!t.machine.can_hide_and_pass());
    assert!(t.wait(4).is_empty());
    assert!(matches!(
        t.machine.hide_and_pass(),
        Err(FlowError::RevealGateClosed {
            remaining_seconds: 1
        })
    ));

    assert_eq!(t.wait(1), vec![FlowNotice::RevealGateOpened]);
    assert!(t.machine.can_hide_and_pass());
    assert!(t.wait(10).is_empty());
}

#[test]
fn test_reveal_gate_rearms_for_every_seat() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.take_turn();

    t.machine.ready().unwrap();
    let gate = t.machine.reveal_gate();
    assert_eq!(gate.remaining_seconds, 5);
    assert!(gate.is_running);
    assert!(!gate.is_finished);
}

// =========================================================================
// Guard and cancellation
// =========================================================================

#[test]
fn test_session_events_in_setup_force_clean_setup() {
    let mut t = Table::new();
    t.machine.navigate(Page::Faq).unwrap();

    assert!(matches!(t.machine.ready(), Err(FlowError::NoActiveSession)));
    assert_eq!(t.machine.phase(), Phase::Setup);
    assert_eq!(t.machine.overlay(), None);

    assert!(matches!(
        t.machine.hide_and_pass(),
        Err(FlowError::NoActiveSession)
    ));
    assert!(matches!(
        t.machine.acknowledge_times_up(),
        Err(FlowError::NoActiveSession)
    ));
    assert!(t.machine.session().is_none());
}

#[test]
fn test_abandon_mid_reveal_cancels_gate() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.machine.ready().unwrap();
    t.wait(2);
    assert_eq!(t.clock.live(), 1);

    assert_eq!(t.machine.abandon_session(), Phase::Setup);
    assert_eq!(t.clock.live(), 0);
    assert!(t.wait(10).is_empty());
    assert_eq!(t.machine.phase(), Phase::Setup);
    assert!(!t.machine.reveal_gate().is_running);
}

#[test]
fn test_tick_queued_before_abandon_is_ignored_next_round() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    for _ in 0..4 {
        t.take_turn();
    }

    // Fire ticks into the queue but abandon before they are applied.
    t.clock.advance_secs(3);
    t.machine.abandon_session();

    t.machine.start_game(animals_round()).unwrap();
    for _ in 0..4 {
        t.take_turn();
    }
    assert_eq!(t.machine.discussion_timer().remaining_seconds, 60);
}

#[test]
fn test_leaving_reveal_stops_gate_ticks() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.take_turn();
    assert_eq!(t.machine.phase(), Phase::PlayerTransition);
    assert_eq!(t.clock.live(), 0);
}

// =========================================================================
// Navigation
// =========================================================================

#[test]
fn test_overlay_suspends_round_and_return_resumes() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.machine.ready().unwrap();
    let word = t.machine.session().unwrap().secret_word().to_string();

    assert_eq!(t.machine.navigate(Page::Rules).unwrap(), Phase::Reveal);
    assert_eq!(t.machine.overlay(), Some(Page::Rules));
    assert_eq!(t.machine.session().unwrap().secret_word(), word);

    assert_eq!(t.machine.return_to_game(), Phase::Reveal);
    assert_eq!(t.machine.overlay(), None);
    assert_eq!(t.machine.session().unwrap().current_player_index(), 0);
}

#[test]
fn test_overlay_pauses_discussion_timer() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    for _ in 0..4 {
        t.take_turn();
    }
    t.wait(20);

    t.machine.navigate(Page::Rules).unwrap();
    assert_eq!(t.clock.live(), 0);
    assert!(t.wait(60).is_empty());
    assert_eq!(t.machine.discussion_stage(), Some(DiscussionStage::Running));
    assert_eq!(t.machine.discussion_timer().remaining_seconds, 40);

    assert_eq!(t.machine.return_to_game(), Phase::DiscussionTimer);
    assert_eq!(t.clock.live(), 1);
    assert!(t.wait(39).is_empty());
    assert_eq!(t.wait(1), vec![FlowNotice::DiscussionEnded]);
}

#[test]
fn test_overlay_pauses_reveal_gate() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.machine.ready().unwrap();
    t.wait(2);

    t.machine.navigate(Page::Faq).unwrap();
    t.machine.navigate(Page::WordList).unwrap();
    assert_eq!(t.clock.live(), 0);
    assert!(t.wait(10).is_empty());
    assert!(!t.machine.can_hide_and_pass());

    t.machine.return_to_game();
    assert_eq!(t.wait(3), vec![FlowNotice::RevealGateOpened]);
    assert!(t.machine.can_hide_and_pass());
}

#[test]
fn test_ticks_queued_before_overlay_are_dropped() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.machine.ready().unwrap();

    // Fired but not yet applied when the overlay opens.
    t.clock.advance_secs(5);
    t.machine.navigate(Page::Rules).unwrap();
    assert!(t.machine.pump(&mut t.ticks).is_empty());
    assert_eq!(t.machine.reveal_gate().remaining_seconds, 5);
}

#[test]
fn test_navigate_to_setup_refused_while_session_held() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();

    assert!(matches!(
        t.machine.navigate(Page::Setup),
        Err(FlowError::SessionInProgress)
    ));
    assert_eq!(t.machine.phase(), Phase::PlayerTransition);
    assert!(t.machine.session().is_some());
}

#[test]
fn test_navigate_to_setup_from_overlay_without_session() {
    let mut t = Table::new();
    t.machine.navigate(Page::WordList).unwrap();
    assert_eq!(t.machine.navigate(Page::Setup).unwrap(), Phase::Setup);
    assert_eq!(t.machine.overlay(), None);
}

#[test]
fn test_start_game_clears_overlay() {
    let mut t = Table::new();
    t.machine.navigate(Page::Rules).unwrap();
    t.machine.start_game(animals_round()).unwrap();
    assert_eq!(t.machine.overlay(), None);
}

// =========================================================================
// Snapshots
// =========================================================================

#[test]
fn test_snapshot_serializes_for_the_screen_layer() {
    let mut t = Table::new();
    t.machine.start_game(animals_round()).unwrap();
    t.machine.ready().unwrap();

    let json = serde_json::to_value(t.machine.snapshot()).unwrap();
    assert_eq!(json["phase"], "REVEAL");
    assert_eq!(json["current_player"]["display_name"], "Player 1");
    assert_eq!(json["reveal_gate"]["remaining_seconds"], 5);
    assert!(json["role_card"]["role"].is_string());
    assert!(json["discussion_stage"].is_null());
}
