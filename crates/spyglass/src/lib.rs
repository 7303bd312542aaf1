//! # Spyglass
//!
//! Game core for a pass-the-device party game. One phone goes round the
//! table; each player looks at a card that shows either the secret word
//! or "you are the spy", hides it and passes on. When everyone has looked,
//! a discussion timer runs and the group tries to unmask the spies.
//!
//! This crate re-exports the layers underneath and adds a
//! [`SpyglassBuilder`] that wires a catalog and configuration into a
//! running game actor.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spyglass::prelude::*;
//!
//! # async fn run() -> Result<(), SpyglassError> {
//! let game = SpyglassBuilder::new()
//!     .catalog_json(r#"[{"key": "Animals", "words": ["Cat", "Otter"]}]"#)?
//!     .seed(7)
//!     .spawn()?;
//!
//! game.start_game(GameSettings::default()).await?;
//! game.ready().await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;

pub use builder::SpyglassBuilder;
pub use error::SpyglassError;

pub use spyglass_catalog as catalog;
pub use spyglass_flow as flow;
pub use spyglass_session as session;
pub use spyglass_tick as tick;

/// The types needed to run a game, in one import.
pub mod prelude {
    pub use crate::{SpyglassBuilder, SpyglassError};
    pub use spyglass_catalog::{
        ALL_CATEGORIES_KEY, CatalogError, Category, StaticCatalog, WordCatalog,
    };
    pub use spyglass_flow::{
        DiscussionStage, FlowConfig, FlowError, FlowNotice, FlowSnapshot, GameHandle,
        GameMachine, Page, Phase, spawn_game,
    };
    pub use spyglass_session::{
        CategorySelection, DISCUSSION_TIMER_PRESETS_MINUTES, GameSettings, Player, RoleCard,
        Session, SessionError, SetupLimits, WordCategory,
    };
    pub use spyglass_tick::{
        CountdownTimer, ManualScheduler, Scheduler, TimerSnapshot, TokioScheduler,
    };
}
