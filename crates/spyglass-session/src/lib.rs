//! Game sessions for Spyglass.
//!
//! A session is one play-through: who the spies are, what the secret word
//! is, and whose turn it is to look at the device. This crate builds them:
//!
//! 1. **Settings**: what the group chose on the setup page
//!    ([`GameSettings`], validated against [`SetupLimits`])
//! 2. **Role assignment**: which seats are spies ([`assign_roles`])
//! 3. **Session building**: roles plus a word drawn from a
//!    [`WordCatalog`](spyglass_catalog::WordCatalog) ([`build_session`])
//! 4. **Turn cursor**: passing the device seat by seat
//!    ([`Session::advance_turn`])
//!
//! Randomness is always a parameter (`&mut impl Rng`). Production code
//! passes an OS-seeded generator; tests pass a seeded `StdRng`.
//!
//! # How it fits in the stack
//!
//! ```text
//! Flow Layer (above)     ← owns the active session, drives phases
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Catalog Layer (below)  ← provides categories and words
//! ```

mod builder;
mod error;
mod roles;
mod session;
mod settings;

pub use builder::{WordPick, build_session, draw_word, word_pool};
pub use error::SessionError;
pub use roles::assign_roles;
pub use session::{Player, RoleCard, Session, TurnAdvance, WordCategory};
pub use settings::{
    CategorySelection, DEFAULT_DISCUSSION_MINUTES, DISCUSSION_TIMER_PRESETS_MINUTES,
    GameSettings, PLAYER_NAME_PREFIX, SetupLimits,
};
