//! Error types for the flow layer.

use spyglass_session::SessionError;

use crate::{FlowEvent, Phase};

/// Errors returned by game machine events.
///
/// None of these are fatal. Each leaves the machine in a well-defined
/// phase, so the caller can re-render and carry on.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// `start_game` was refused; the machine stays in setup.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The event needs a session but none is active. The machine has been
    /// forced back to a clean setup state.
    #[error("no active session")]
    NoActiveSession,

    /// The event is not meaningful in the current phase. Nothing changed.
    #[error("{event} is not valid during {phase}")]
    InvalidEvent { event: FlowEvent, phase: Phase },

    /// "Hide & pass" was pressed before the reveal gate opened.
    #[error("reveal gate is still closed, {remaining_seconds}s left")]
    RevealGateClosed { remaining_seconds: u32 },

    /// Navigating to setup would silently drop the running session.
    /// Abandon it explicitly first.
    #[error("a session is in progress; abandon it before returning to setup")]
    SessionInProgress,

    /// The game actor's channel is full or closed.
    #[error("game actor is unavailable")]
    Unavailable,
}
