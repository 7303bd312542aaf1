//! Phases, sub-stages and navigation pages.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The top-level stage of a round.
///
/// ```text
///            start_game            ready
///   Setup ─────────────→ PlayerTransition ──────→ Reveal
///     ↑                        ↑                    │
///     │                        └── hide_and_pass ───┤ (more seats)
///     │                                             │
///     │     acknowledge_times_up                    ↓ (last seat)
///     └────────────────────────────────── DiscussionTimer
/// ```
///
/// A session exists exactly when the phase is not `Setup`. Abandoning a
/// session returns to `Setup` from any session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// No session. The group is choosing settings.
    Setup,
    /// The device is being handed to the next player. Role not shown.
    PlayerTransition,
    /// The current player is looking at their role.
    Reveal,
    /// Everyone has seen their role; the group is talking.
    DiscussionTimer,
}

impl Phase {
    /// Returns `true` if this phase needs an active session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Setup)
    }

    /// Returns `true` if moving from `self` to `target` is a legal step.
    ///
    /// `Setup → Setup` is legal: it is how the guard recovers a machine
    /// that was asked to act on a session it does not have.
    pub fn can_transition_to(self, target: Self) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Setup, Setup | PlayerTransition)
                | (PlayerTransition, Reveal | Setup)
                | (Reveal, PlayerTransition | DiscussionTimer | Setup)
                | (DiscussionTimer, Setup)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "Setup"),
            Self::PlayerTransition => write!(f, "PlayerTransition"),
            Self::Reveal => write!(f, "Reveal"),
            Self::DiscussionTimer => write!(f, "DiscussionTimer"),
        }
    }
}

// ---------------------------------------------------------------------------
// DiscussionStage
// ---------------------------------------------------------------------------

/// Sub-state of [`Phase::DiscussionTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionStage {
    /// The discussion timer is counting down.
    Running,
    /// The timer reached zero. Only a return to setup is offered.
    TimesUp,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Pages reachable from the navigation bar.
///
/// `Rules`, `Faq` and `WordList` are informational overlays: opening one
/// mid-round suspends the round without touching it. `Setup` is different:
/// reaching it means the round is over, so it is refused while a session
/// is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Setup,
    Rules,
    Faq,
    WordList,
}

impl Page {
    /// Returns `true` for pages that can sit on top of a round.
    pub fn is_overlay(&self) -> bool {
        !matches!(self, Self::Setup)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "Setup"),
            Self::Rules => write!(f, "Rules"),
            Self::Faq => write!(f, "Faq"),
            Self::WordList => write!(f, "WordList"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_requires_session() {
        assert!(!Phase::Setup.requires_session());
        assert!(Phase::PlayerTransition.requires_session());
        assert!(Phase::Reveal.requires_session());
        assert!(Phase::DiscussionTimer.requires_session());
    }

    #[test]
    fn test_phase_can_transition_to_follows_table() {
        assert!(Phase::Setup.can_transition_to(Phase::PlayerTransition));
        assert!(Phase::PlayerTransition.can_transition_to(Phase::Reveal));
        assert!(Phase::Reveal.can_transition_to(Phase::PlayerTransition));
        assert!(Phase::Reveal.can_transition_to(Phase::DiscussionTimer));
        assert!(Phase::DiscussionTimer.can_transition_to(Phase::Setup));

        assert!(!Phase::Setup.can_transition_to(Phase::Reveal));
        assert!(!Phase::PlayerTransition.can_transition_to(Phase::DiscussionTimer));
        assert!(!Phase::DiscussionTimer.can_transition_to(Phase::Reveal));
    }

    #[test]
    fn test_phase_every_session_phase_can_abandon() {
        for phase in [Phase::PlayerTransition, Phase::Reveal, Phase::DiscussionTimer] {
            assert!(phase.can_transition_to(Phase::Setup), "{phase}");
        }
    }

    #[test]
    fn test_phase_serializes_screaming_snake() {
        let json = serde_json::to_string(&Phase::DiscussionTimer).unwrap();
        assert_eq!(json, r#""DISCUSSION_TIMER""#);
    }

    #[test]
    fn test_page_overlay() {
        assert!(!Page::Setup.is_overlay());
        assert!(Page::Rules.is_overlay());
        assert!(Page::Faq.is_overlay());
        assert!(Page::WordList.is_overlay());
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::PlayerTransition.to_string(), "PlayerTransition");
        assert_eq!(Page::WordList.to_string(), "WordList");
    }
}
