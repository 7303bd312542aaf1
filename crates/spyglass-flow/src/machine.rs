//! The round state machine.
//!
//! [`GameMachine`] owns the current phase, the active session and both
//! countdowns. Every change happens inside one of its event methods, which
//! run to completion; there is no other way in. Timer ticks are events
//! too: schedulers post [`TimerTick`]s into a channel and the driver feeds
//! them back through [`GameMachine::on_tick`].
//!
//! The session lives *inside* the phase ([`GameState`]), so "phase says
//! reveal but there is no session" cannot be represented. What remains is
//! the guard for events that need a session arriving while in setup:
//! those force a clean re-entry into setup and report
//! [`FlowError::NoActiveSession`].

use std::fmt;
use std::mem;

use rand::Rng;
use serde::Serialize;
use spyglass_catalog::WordCatalog;
use spyglass_session::{
    GameSettings, Player, RoleCard, Session, TurnAdvance, build_session,
};
use spyglass_tick::{CountdownTimer, Scheduler, TickOutcome, TimerSnapshot};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{DiscussionStage, FlowConfig, FlowError, Page, Phase};

// ---------------------------------------------------------------------------
// Events, ticks and notices
// ---------------------------------------------------------------------------

/// Events that drive phase transitions. Used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    StartGame,
    Ready,
    HideAndPass,
    AcknowledgeTimesUp,
    AbandonSession,
}

impl fmt::Display for FlowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartGame => write!(f, "start_game"),
            Self::Ready => write!(f, "ready"),
            Self::HideAndPass => write!(f, "hide_and_pass"),
            Self::AcknowledgeTimesUp => write!(f, "acknowledge_times_up"),
            Self::AbandonSession => write!(f, "abandon_session"),
        }
    }
}

/// Which countdown a tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSlot {
    RevealGate,
    Discussion,
}

/// One elapsed interval for one arming of one countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub timer: TimerSlot,
    pub generation: u64,
}

/// Receiving end for the ticks a machine's timers produce.
pub type TickReceiver = mpsc::UnboundedReceiver<TimerTick>;

/// Edges a driver may want to react to. Each fires once per arming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowNotice {
    /// The current player may now hide their role and pass the device.
    RevealGateOpened,
    /// The discussion timer reached zero.
    DiscussionEnded,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Phase plus the data that phase needs.
#[derive(Debug, Clone, Default)]
enum GameState {
    #[default]
    Setup,
    PlayerTransition(Session),
    Reveal(Session),
    Discussion {
        session: Session,
        stage: DiscussionStage,
    },
}

impl GameState {
    fn phase(&self) -> Phase {
        match self {
            Self::Setup => Phase::Setup,
            Self::PlayerTransition(_) => Phase::PlayerTransition,
            Self::Reveal(_) => Phase::Reveal,
            Self::Discussion { .. } => Phase::DiscussionTimer,
        }
    }

    fn session(&self) -> Option<&Session> {
        match self {
            Self::Setup => None,
            Self::PlayerTransition(s) | Self::Reveal(s) => Some(s),
            Self::Discussion { session, .. } => Some(session),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything a renderer needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSnapshot {
    pub phase: Phase,
    /// Informational page shown over the round, if any.
    pub overlay: Option<Page>,
    pub session: Option<Session>,
    /// Whose turn it is. Present in `PlayerTransition` and `Reveal`.
    pub current_player: Option<Player>,
    /// The current player's role. Present in `Reveal` only.
    pub role_card: Option<RoleCard>,
    pub reveal_gate: TimerSnapshot,
    pub discussion: TimerSnapshot,
    /// Present in `DiscussionTimer` only.
    pub discussion_stage: Option<DiscussionStage>,
}

impl Default for FlowSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Setup,
            overlay: None,
            session: None,
            current_player: None,
            role_card: None,
            reveal_gate: TimerSnapshot::default(),
            discussion: TimerSnapshot::default(),
            discussion_stage: None,
        }
    }
}

// ---------------------------------------------------------------------------
// GameMachine
// ---------------------------------------------------------------------------

/// The session state machine for one shared device.
///
/// Generic over the word catalog, the tick scheduler and the random
/// source, so tests can run whole rounds synchronously with a
/// `ManualScheduler` and a seeded `StdRng`.
pub struct GameMachine<C, S, R> {
    catalog: C,
    scheduler: S,
    rng: R,
    config: FlowConfig,
    state: GameState,
    overlay: Option<Page>,
    reveal_gate: CountdownTimer,
    discussion: CountdownTimer,
    ticks: mpsc::UnboundedSender<TimerTick>,
}

impl<C, S, R> GameMachine<C, S, R>
where
    C: WordCatalog,
    S: Scheduler,
    R: Rng,
{
    /// Creates a machine in setup and the receiver its timer ticks arrive on.
    ///
    /// The driver must forward every tick from the receiver to
    /// [`on_tick`](Self::on_tick).
    pub fn new(catalog: C, scheduler: S, rng: R, config: FlowConfig) -> (Self, TickReceiver) {
        let (ticks, rx) = mpsc::unbounded_channel();
        let machine = Self {
            catalog,
            scheduler,
            rng,
            config: config.validated(),
            state: GameState::Setup,
            overlay: None,
            reveal_gate: CountdownTimer::new(),
            discussion: CountdownTimer::new(),
            ticks,
        };
        (machine, rx)
    }

    // -- Queries -----------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    pub fn overlay(&self) -> Option<Page> {
        self.overlay
    }

    pub fn discussion_stage(&self) -> Option<DiscussionStage> {
        match &self.state {
            GameState::Discussion { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn reveal_gate(&self) -> TimerSnapshot {
        self.reveal_gate.snapshot()
    }

    pub fn discussion_timer(&self) -> TimerSnapshot {
        self.discussion.snapshot()
    }

    /// Whether "hide & pass" would be accepted right now.
    pub fn can_hide_and_pass(&self) -> bool {
        matches!(self.state, GameState::Reveal(_)) && self.reveal_gate.is_finished()
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let session = self.state.session();
        let current_player = match &self.state {
            GameState::PlayerTransition(s) | GameState::Reveal(s) => {
                Some(s.current_player().clone())
            }
            _ => None,
        };
        let role_card = match &self.state {
            GameState::Reveal(s) => Some(s.role_card(s.current_player())),
            _ => None,
        };

        FlowSnapshot {
            phase: self.phase(),
            overlay: self.overlay,
            session: session.cloned(),
            current_player,
            role_card,
            reveal_gate: self.reveal_gate.snapshot(),
            discussion: self.discussion.snapshot(),
            discussion_stage: self.discussion_stage(),
        }
    }

    // -- Events ------------------------------------------------------------

    /// Builds a session from `settings` and hands the device to seat 0.
    ///
    /// # Errors
    /// - [`FlowError::InvalidEvent`] outside setup.
    /// - [`FlowError::Session`] if the settings are rejected. The machine
    ///   stays in setup and no session is created.
    pub fn start_game(&mut self, settings: GameSettings) -> Result<Phase, FlowError> {
        if !matches!(self.state, GameState::Setup) {
            return Err(self.invalid(FlowEvent::StartGame));
        }

        settings.validate_with(&self.config.limits)?;
        let session = build_session(&settings, &self.catalog, &mut self.rng)?;

        self.overlay = None;
        Ok(self.transition(Phase::Setup, GameState::PlayerTransition(session)))
    }

    /// The current player has the device and wants to see their role.
    ///
    /// Opens the reveal page and arms the reveal gate.
    pub fn ready(&mut self) -> Result<Phase, FlowError> {
        match mem::take(&mut self.state) {
            GameState::PlayerTransition(session) => {
                let sink = tick_sink(self.ticks.clone(), TimerSlot::RevealGate);
                self.reveal_gate.start(
                    self.config.reveal_gate_secs,
                    &self.scheduler,
                    self.config.tick_interval,
                    sink,
                );
                Ok(self.transition(Phase::PlayerTransition, GameState::Reveal(session)))
            }
            GameState::Setup => Err(self.recover_to_setup(FlowEvent::Ready)),
            other => {
                self.state = other;
                Err(self.invalid(FlowEvent::Ready))
            }
        }
    }

    /// Hides the role and passes the device on.
    ///
    /// Moves to the next player's transition page, or after the last seat
    /// starts the discussion timer.
    ///
    /// # Errors
    /// [`FlowError::RevealGateClosed`] while the reveal gate is counting.
    pub fn hide_and_pass(&mut self) -> Result<Phase, FlowError> {
        match mem::take(&mut self.state) {
            GameState::Reveal(session) if !self.reveal_gate.is_finished() => {
                self.state = GameState::Reveal(session);
                Err(FlowError::RevealGateClosed {
                    remaining_seconds: self.reveal_gate.remaining_seconds(),
                })
            }
            GameState::Reveal(mut session) => {
                self.reveal_gate.reset();
                match session.advance_turn() {
                    TurnAdvance::Next { index } => {
                        debug!(seat = index, "device passed");
                        Ok(self.transition(Phase::Reveal, GameState::PlayerTransition(session)))
                    }
                    TurnAdvance::Complete => {
                        let seconds = session.settings().timer_seconds;
                        let sink = tick_sink(self.ticks.clone(), TimerSlot::Discussion);
                        self.discussion.start(
                            seconds,
                            &self.scheduler,
                            self.config.tick_interval,
                            sink,
                        );
                        let stage = if self.discussion.is_finished() {
                            DiscussionStage::TimesUp
                        } else {
                            DiscussionStage::Running
                        };
                        Ok(self.transition(
                            Phase::Reveal,
                            GameState::Discussion { session, stage },
                        ))
                    }
                }
            }
            GameState::Setup => Err(self.recover_to_setup(FlowEvent::HideAndPass)),
            other => {
                self.state = other;
                Err(self.invalid(FlowEvent::HideAndPass))
            }
        }
    }

    /// Leaves the "time's up" screen and discards the session.
    pub fn acknowledge_times_up(&mut self) -> Result<Phase, FlowError> {
        match mem::take(&mut self.state) {
            GameState::Discussion {
                stage: DiscussionStage::TimesUp,
                ..
            } => {
                self.discussion.reset();
                self.overlay = None;
                Ok(self.transition(Phase::DiscussionTimer, GameState::Setup))
            }
            GameState::Setup => Err(self.recover_to_setup(FlowEvent::AcknowledgeTimesUp)),
            other => {
                self.state = other;
                Err(self.invalid(FlowEvent::AcknowledgeTimesUp))
            }
        }
    }

    /// Drops the running session from any phase and returns to setup.
    ///
    /// Both countdowns are stopped first, so no tick from this round can
    /// reach the next one. Abandoning while already in setup is a no-op.
    pub fn abandon_session(&mut self) -> Phase {
        if let Some(session) = self.state.session() {
            info!(
                phase = %self.phase(),
                seat = session.current_player_index(),
                "session abandoned"
            );
        }
        self.enter_setup();
        Phase::Setup
    }

    /// Opens a navigation page.
    ///
    /// Informational pages suspend the round as an overlay: the phase and
    /// session are kept and whichever countdown is running is paused.
    /// Setup is refused while a session is held, since it would drop the
    /// session without the player asking for that; use
    /// [`abandon_session`](Self::abandon_session).
    pub fn navigate(&mut self, page: Page) -> Result<Phase, FlowError> {
        if page.is_overlay() {
            debug!(page = %page, phase = %self.phase(), "overlay opened");
            self.reveal_gate.pause();
            self.discussion.pause();
            self.overlay = Some(page);
            return Ok(self.phase());
        }
        if self.state.session().is_some() {
            return Err(FlowError::SessionInProgress);
        }
        self.overlay = None;
        Ok(self.phase())
    }

    /// Closes the overlay and shows the round (or setup) again.
    ///
    /// A countdown paused by the overlay continues from where it stopped.
    pub fn return_to_game(&mut self) -> Phase {
        if self.overlay.take().is_some() {
            self.resume_timers();
        }
        self.phase()
    }

    /// Applies one timer tick. Returns a notice on the tick that finishes
    /// a countdown, and only then.
    ///
    /// Ticks from an earlier arming, or for a countdown whose phase has
    /// been left, change nothing.
    pub fn on_tick(&mut self, tick: TimerTick) -> Option<FlowNotice> {
        let phase = self.phase();
        match (tick.timer, &mut self.state) {
            (TimerSlot::RevealGate, GameState::Reveal(_)) => {
                match self.reveal_gate.tick(tick.generation) {
                    TickOutcome::Finished => {
                        debug!("reveal gate opened");
                        Some(FlowNotice::RevealGateOpened)
                    }
                    TickOutcome::Running { .. } | TickOutcome::Ignored => None,
                }
            }
            (
                TimerSlot::Discussion,
                GameState::Discussion {
                    stage: stage @ DiscussionStage::Running,
                    ..
                },
            ) => match self.discussion.tick(tick.generation) {
                TickOutcome::Finished => {
                    *stage = DiscussionStage::TimesUp;
                    info!("discussion timer finished");
                    Some(FlowNotice::DiscussionEnded)
                }
                TickOutcome::Running { .. } | TickOutcome::Ignored => None,
            },
            (timer, _) => {
                debug!(?timer, generation = tick.generation, %phase, "stale tick ignored");
                None
            }
        }
    }

    /// Drains every queued tick from `rx` into [`on_tick`](Self::on_tick).
    ///
    /// Convenience for synchronous drivers that step a `ManualScheduler`.
    pub fn pump(&mut self, rx: &mut TickReceiver) -> Vec<FlowNotice> {
        let mut notices = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            notices.extend(self.on_tick(tick));
        }
        notices
    }

    // -- Internals ---------------------------------------------------------

    /// Installs `next` and logs the step. Returns the new phase.
    ///
    /// `from` is passed in because event handlers take the state out of
    /// `self` before deciding where to go.
    fn transition(&mut self, from: Phase, next: GameState) -> Phase {
        let to = next.phase();
        debug_assert!(
            from.can_transition_to(to),
            "illegal transition {from} -> {to}"
        );
        debug_assert_eq!(to.requires_session(), next.session().is_some());
        self.state = next;
        if self.overlay.take().is_some() {
            self.resume_timers();
        }
        info!(%from, %to, "phase transition");
        to
    }

    /// Resumes the countdown owned by the current phase, if it was paused.
    fn resume_timers(&mut self) {
        match &self.state {
            GameState::Reveal(_) => {
                let sink = tick_sink(self.ticks.clone(), TimerSlot::RevealGate);
                self.reveal_gate
                    .resume(&self.scheduler, self.config.tick_interval, sink);
            }
            GameState::Discussion {
                stage: DiscussionStage::Running,
                ..
            } => {
                let sink = tick_sink(self.ticks.clone(), TimerSlot::Discussion);
                self.discussion
                    .resume(&self.scheduler, self.config.tick_interval, sink);
            }
            _ => {}
        }
    }

    /// Stops both countdowns, drops any session and clears the overlay.
    fn enter_setup(&mut self) {
        self.reveal_gate.reset();
        self.discussion.reset();
        self.overlay = None;
        self.state = GameState::Setup;
    }

    /// Guard for session-requiring events arriving with no session.
    fn recover_to_setup(&mut self, event: FlowEvent) -> FlowError {
        warn!(%event, "event requires an active session, forcing setup");
        self.enter_setup();
        FlowError::NoActiveSession
    }

    fn invalid(&self, event: FlowEvent) -> FlowError {
        debug!(%event, phase = %self.phase(), "event rejected");
        FlowError::InvalidEvent {
            event,
            phase: self.phase(),
        }
    }
}

/// Countdown sink that posts each tick for `timer` into the machine's queue.
fn tick_sink(
    ticks: mpsc::UnboundedSender<TimerTick>,
    timer: TimerSlot,
) -> impl FnMut(u64) + Send + 'static {
    move |generation| {
        // A closed receiver means the driver is gone; nothing to deliver to.
        let _ = ticks.send(TimerTick { timer, generation });
    }
}
