//! Setup-page settings and the limits they are checked against.

use serde::{Deserialize, Serialize};
use spyglass_catalog::{ALL_CATEGORIES_KEY, Category, WordCatalog};
use tracing::warn;

use crate::SessionError;

/// Prefix of generated player names: seat 0 is "Player 1".
pub const PLAYER_NAME_PREFIX: &str = "Player";

/// Discussion timer choices offered by the setup page, in minutes.
pub const DISCUSSION_TIMER_PRESETS_MINUTES: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Preselected discussion timer, in minutes.
pub const DEFAULT_DISCUSSION_MINUTES: u32 = 5;

// ---------------------------------------------------------------------------
// SetupLimits
// ---------------------------------------------------------------------------

/// Player-count bounds enforced when a game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupLimits {
    /// Fewest players allowed. Never below 2: one spy needs at least one
    /// civilian to hide among.
    pub min_players: usize,
    /// Most players allowed.
    pub max_players: usize,
}

impl Default for SetupLimits {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 20,
        }
    }
}

impl SetupLimits {
    /// Hard floor for `min_players`.
    pub const ABSOLUTE_MIN_PLAYERS: usize = 2;

    /// Clamps out-of-range values so the limits are safe to use.
    ///
    /// - `min_players` raised to [`Self::ABSOLUTE_MIN_PLAYERS`].
    /// - `max_players` raised to `min_players`.
    pub fn validated(mut self) -> Self {
        if self.min_players < Self::ABSOLUTE_MIN_PLAYERS {
            warn!(
                min_players = self.min_players,
                floor = Self::ABSOLUTE_MIN_PLAYERS,
                "min_players below floor, clamping"
            );
            self.min_players = Self::ABSOLUTE_MIN_PLAYERS;
        }
        if self.max_players < self.min_players {
            warn!(
                max_players = self.max_players,
                min_players = self.min_players,
                "max_players below min_players, clamping"
            );
            self.max_players = self.min_players;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// CategorySelection
// ---------------------------------------------------------------------------

/// Which categories the secret word may come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySelection {
    /// Every category the catalog knows.
    All,
    /// Only these category keys, deduplicated, in selection order.
    Only(Vec<String>),
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::All
    }
}

impl CategorySelection {
    /// Builds a selection from raw keys as the setup page reports them.
    ///
    /// The [`ALL_CATEGORIES_KEY`] sentinel anywhere in the list wins over
    /// individual keys. Duplicate keys are dropped.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut picked: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if key == ALL_CATEGORIES_KEY {
                return Self::All;
            }
            if !picked.contains(&key) {
                picked.push(key);
            }
        }
        Self::Only(picked)
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Only(keys) if keys.is_empty())
    }

    /// The categories this selection covers in `catalog`.
    ///
    /// `All` expands to every catalog category in catalog order. Keys the
    /// catalog does not know are skipped.
    pub fn resolve<'c, C>(&self, catalog: &'c C) -> Vec<&'c Category>
    where
        C: WordCatalog + ?Sized,
    {
        match self {
            Self::All => catalog.categories().iter().collect(),
            Self::Only(keys) => keys
                .iter()
                .filter_map(|key| {
                    let found = catalog.category(key);
                    if found.is_none() {
                        tracing::debug!(%key, "selected category not in catalog");
                    }
                    found
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// GameSettings
// ---------------------------------------------------------------------------

/// Everything the group chose before starting a round.
///
/// Immutable once a session has been built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub player_count: usize,
    pub spy_count: usize,
    pub categories: CategorySelection,
    /// Discussion timer length, in seconds.
    pub timer_seconds: u32,
    /// Whether spies learn the category (never the word).
    pub reveal_category_to_spy: bool,
    /// A word typed in by the group. Used instead of a catalog draw when
    /// it is non-empty after trimming.
    pub custom_word: Option<String>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player_count: 4,
            spy_count: 1,
            categories: CategorySelection::All,
            timer_seconds: DEFAULT_DISCUSSION_MINUTES * 60,
            reveal_category_to_spy: true,
            custom_word: None,
        }
    }
}

impl GameSettings {
    /// The trimmed custom word, if one was given.
    pub fn custom_word(&self) -> Option<&str> {
        self.custom_word
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }

    /// Checks the invariants every session relies on.
    ///
    /// # Errors
    /// [`SessionError::InvalidConfiguration`] when:
    /// - fewer than 2 players,
    /// - `spy_count` is 0 or not below `player_count`,
    /// - `timer_seconds` is 0,
    /// - no category is selected and there is no custom word.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.player_count < SetupLimits::ABSOLUTE_MIN_PLAYERS {
            return Err(SessionError::invalid(format!(
                "at least {} players are required, got {}",
                SetupLimits::ABSOLUTE_MIN_PLAYERS,
                self.player_count
            )));
        }
        if self.spy_count < 1 {
            return Err(SessionError::invalid("at least one spy is required"));
        }
        if self.spy_count >= self.player_count {
            return Err(SessionError::invalid(format!(
                "spy count {} must be less than player count {}",
                self.spy_count, self.player_count
            )));
        }
        if self.timer_seconds == 0 {
            return Err(SessionError::invalid("discussion timer must be longer than zero"));
        }
        if self.custom_word().is_none() && self.categories.is_empty() {
            return Err(SessionError::invalid(
                "select at least one category or enter a custom word",
            ));
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus the player-count limits.
    pub fn validate_with(&self, limits: &SetupLimits) -> Result<(), SessionError> {
        self.validate()?;
        if self.player_count < limits.min_players || self.player_count > limits.max_players {
            return Err(SessionError::invalid(format!(
                "player count must be between {} and {}, got {}",
                limits.min_players, limits.max_players, self.player_count
            )));
        }
        Ok(())
    }
}
