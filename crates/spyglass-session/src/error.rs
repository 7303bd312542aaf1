//! Error types for the session layer.

/// Errors that can occur while validating settings or building a session.
///
/// Both are recoverable: the caller fixes its input and tries again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The settings break an invariant: spy count out of range, player
    /// count outside the configured limits, a zero-second timer, or no
    /// category selected and no custom word given.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No word could be drawn, not even a fallback. Only happens with a
    /// catalog that holds no words at all.
    #[error("no words available in the catalog")]
    NoWordsAvailable,
}

impl SessionError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}
