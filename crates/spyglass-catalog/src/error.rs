//! Error types for the catalog layer.

/// Errors that can occur while building or loading a word catalog.
///
/// Catalog content is static data, so these only show up at startup
/// (or in tests). Once a [`StaticCatalog`](crate::StaticCatalog) exists
/// it is known to be well-formed.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A category was given an empty (or whitespace-only) key.
    #[error("category key must not be empty")]
    EmptyCategoryKey,

    /// A category key collides with one of the sentinel keys.
    #[error("category key {0:?} is reserved")]
    ReservedKey(String),

    /// The same category key appears twice.
    #[error("duplicate category {0:?}")]
    DuplicateCategory(String),

    /// A category contains an empty (or whitespace-only) word.
    #[error("category {category:?} contains an empty word")]
    EmptyWord {
        /// The offending category's key.
        category: String,
    },

    /// The JSON document could not be parsed.
    #[cfg(feature = "json")]
    #[error("catalog json is malformed: {0}")]
    Json(#[from] serde_json::Error),
}
