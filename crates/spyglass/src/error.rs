//! Unified error type for Spyglass.

use spyglass_catalog::CatalogError;
use spyglass_flow::FlowError;
use spyglass_session::SessionError;

/// Top-level error wrapping every layer's error.
///
/// `#[from]` on each variant lets `?` convert layer errors directly.
#[derive(Debug, thiserror::Error)]
pub enum SpyglassError {
    /// The word catalog could not be built or parsed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Settings were rejected while building a session.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A game event was refused, or the game actor is gone.
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// [`SpyglassBuilder::spawn`](crate::SpyglassBuilder::spawn) was called
    /// without a catalog.
    #[error("no word catalog configured")]
    MissingCatalog,
}

impl SpyglassError {
    /// Returns `true` for errors caused by the group's settings, which the
    /// setup page should show next to the form.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Session(SessionError::InvalidConfiguration(_))
                | Self::Flow(FlowError::Session(SessionError::InvalidConfiguration(_)))
        )
    }
}
