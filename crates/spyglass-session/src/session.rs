//! Session types: the players, the secret, and whose turn it is.
//!
//! A session is built once per round by [`build_session`](crate::build_session)
//! and is read-mostly afterwards. The only thing that moves is the turn
//! cursor, and it only moves forward.

use std::fmt;

use serde::Serialize;
use spyglass_catalog::CUSTOM_CATEGORY_LABEL;

use crate::{GameSettings, PLAYER_NAME_PREFIX};

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Seat index, 0-based, stable for the session.
    pub id: usize,
    /// Generated name: seat 0 is "Player 1".
    pub display_name: String,
    pub is_spy: bool,
}

impl Player {
    pub(crate) fn new(id: usize, is_spy: bool) -> Self {
        Self {
            id,
            display_name: format!("{PLAYER_NAME_PREFIX} {}", id + 1),
            is_spy,
        }
    }
}

// ---------------------------------------------------------------------------
// WordCategory
// ---------------------------------------------------------------------------

/// Where the secret word came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCategory {
    /// Drawn from this catalog category.
    Catalog(String),
    /// Typed in by the group.
    Custom,
}

impl WordCategory {
    /// The label shown to players. Custom words show
    /// [`CUSTOM_CATEGORY_LABEL`].
    pub fn label(&self) -> &str {
        match self {
            Self::Catalog(key) => key,
            Self::Custom => CUSTOM_CATEGORY_LABEL,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl fmt::Display for WordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RoleCard
// ---------------------------------------------------------------------------

/// What a player sees when their role is revealed.
///
/// A spy's card never carries the word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleCard {
    Civilian {
        word: String,
        category: String,
    },
    Spy {
        /// Present only when the settings reveal the category to spies.
        category: Option<String>,
    },
}

impl RoleCard {
    pub fn is_spy(&self) -> bool {
        matches!(self, Self::Spy { .. })
    }
}

// ---------------------------------------------------------------------------
// Turn cursor
// ---------------------------------------------------------------------------

/// Result of passing the device on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// The device goes to this seat next.
    Next { index: usize },
    /// Every seat has seen its role.
    Complete,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One play-through's state, from role assignment to the discussion timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    players: Vec<Player>,
    secret_word: String,
    category: WordCategory,
    current_player_index: usize,
    settings: GameSettings,
}

impl Session {
    /// Assembles a session. `roles` has one spy flag per seat.
    pub(crate) fn new(
        roles: Vec<bool>,
        secret_word: String,
        category: WordCategory,
        settings: GameSettings,
    ) -> Self {
        let players = roles
            .into_iter()
            .enumerate()
            .map(|(id, is_spy)| Player::new(id, is_spy))
            .collect();
        Self {
            players,
            secret_word,
            category,
            current_player_index: 0,
            settings,
        }
    }

    /// Players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn category(&self) -> &WordCategory {
        &self.category
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// The player currently holding the device.
    pub fn current_player(&self) -> &Player {
        // Index is kept in range by `advance_turn`, and a session always
        // has at least two players.
        &self.players[self.current_player_index]
    }

    /// Seats that hold the spy role.
    pub fn spies(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_spy)
    }

    pub fn spy_count(&self) -> usize {
        self.spies().count()
    }

    /// The card shown to `player` on the reveal page.
    pub fn role_card(&self, player: &Player) -> RoleCard {
        if player.is_spy {
            RoleCard::Spy {
                category: self
                    .settings
                    .reveal_category_to_spy
                    .then(|| self.category.label().to_string()),
            }
        } else {
            RoleCard::Civilian {
                word: self.secret_word.clone(),
                category: self.category.label().to_string(),
            }
        }
    }

    /// Passes the device to the next seat.
    ///
    /// Strictly sequential: seat 0, 1, …, N-1. After the last seat this
    /// reports [`TurnAdvance::Complete`] and leaves the index on the last
    /// seat, so it always stays within `0..N`.
    pub fn advance_turn(&mut self) -> TurnAdvance {
        let next = self.current_player_index + 1;
        if next < self.players.len() {
            self.current_player_index = next;
            TurnAdvance::Next { index: next }
        } else {
            TurnAdvance::Complete
        }
    }
}
