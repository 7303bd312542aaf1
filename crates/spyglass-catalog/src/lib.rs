//! Word catalogs for Spyglass.
//!
//! The game core never owns word content. It reads it through the
//! [`WordCatalog`] trait: an ordered list of named categories, each an
//! ordered list of candidate words, immutable for the life of a session.
//!
//! - **Types** ([`Category`], [`CatalogSummary`]): what a catalog exposes.
//! - **Catalogs** ([`StaticCatalog`]): a validated in-memory catalog,
//!   optionally loaded from JSON (feature `json`, on by default).
//! - **Errors** ([`CatalogError`]): what can go wrong building one.
//!
//! # Sentinel keys
//!
//! Two category keys are reserved and can never name a real category:
//! [`ALL_CATEGORIES_KEY`] (the "everything" selection on the setup page)
//! and [`CUSTOM_CATEGORY_LABEL`] (the label shown when the group typed in
//! its own secret word).

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod catalog;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use catalog::{StaticCatalog, WordCatalog};
pub use error::CatalogError;
pub use types::{
    ALL_CATEGORIES_KEY, CUSTOM_CATEGORY_LABEL, CatalogSummary, Category,
    CategoryCount,
};
