//! Round flow for Spyglass.
//!
//! A round on one shared device goes setup, then for each seat a hand-off
//! page and a reveal page, then a discussion countdown, then back to
//! setup. [`GameMachine`] is that state machine; [`spawn_game`] runs one
//! inside a Tokio task behind a [`GameHandle`].
//!
//! # Key types
//!
//! - [`GameMachine`]: phases, the active session, both countdowns
//! - [`Phase`] / [`DiscussionStage`]: where the round is
//! - [`Page`]: navigation targets; informational pages overlay the round
//! - [`FlowSnapshot`]: everything a screen needs to render
//! - [`FlowConfig`]: reveal gate length, tick interval, seed, limits
//! - [`GameHandle`]: async access to a running game actor
//!
//! # Driving a machine synchronously
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use spyglass_catalog::{Category, StaticCatalog};
//! use spyglass_flow::{FlowConfig, GameMachine, Phase};
//! use spyglass_session::GameSettings;
//! use spyglass_tick::ManualScheduler;
//!
//! let catalog = StaticCatalog::new(vec![Category::new("Animals", ["Cat", "Dog"])]).unwrap();
//! let scheduler = ManualScheduler::new();
//! let (mut machine, mut ticks) = GameMachine::new(
//!     catalog,
//!     scheduler.clone(),
//!     StdRng::seed_from_u64(7),
//!     FlowConfig::default(),
//! );
//!
//! machine.start_game(GameSettings::default()).unwrap();
//! machine.ready().unwrap();
//! scheduler.advance_secs(5);
//! machine.pump(&mut ticks);
//! assert!(machine.can_hide_and_pass());
//! assert_eq!(machine.hide_and_pass().unwrap(), Phase::PlayerTransition);
//! ```

mod config;
mod error;
mod game;
mod machine;
mod phase;

pub use config::{DEFAULT_REVEAL_GATE_SECS, FlowConfig};
pub use error::FlowError;
pub use game::{GameHandle, spawn_game};
pub use machine::{
    FlowEvent, FlowNotice, FlowSnapshot, GameMachine, TickReceiver, TimerSlot, TimerTick,
};
pub use phase::{DiscussionStage, Page, Phase};
