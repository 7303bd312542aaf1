//! The [`WordCatalog`] trait and the in-memory [`StaticCatalog`].
//!
//! The session builder only needs read access to ordered categories, so
//! that is all the trait asks for. Content can come from a compiled-in
//! table, a JSON file shipped with the app, or a test fixture; the core
//! does not care which.

use std::collections::HashSet;

use crate::{
    ALL_CATEGORIES_KEY, CUSTOM_CATEGORY_LABEL, CatalogError, CatalogSummary,
    Category, CategoryCount,
};

/// Read-only source of categorized words.
///
/// ## Contract
///
/// - Category order is stable. "The first category" means
///   `categories()[0]` and is what the session builder falls back to when
///   a selection yields no words.
/// - Content does not change for the life of the process.
///
/// `Send + Sync + 'static` so a catalog can be moved into the game actor
/// task and shared behind an `Arc`.
pub trait WordCatalog: Send + Sync + 'static {
    /// All categories, in catalog order.
    fn categories(&self) -> &[Category];

    /// Looks up one category by key.
    fn category(&self, key: &str) -> Option<&Category> {
        self.categories().iter().find(|c| c.key == key)
    }

    /// Category keys, in catalog order.
    fn keys(&self) -> Vec<&str> {
        self.categories().iter().map(|c| c.key.as_str()).collect()
    }

    /// Counts for the word-list page.
    fn summary(&self) -> CatalogSummary {
        let mut unique: HashSet<&str> = HashSet::new();
        let categories = self
            .categories()
            .iter()
            .map(|c| {
                unique.extend(c.words.iter().map(String::as_str));
                CategoryCount {
                    key: c.key.clone(),
                    words: c.len(),
                }
            })
            .collect();
        CatalogSummary {
            categories,
            unique_words: unique.len(),
        }
    }
}

impl<C: WordCatalog + ?Sized> WordCatalog for std::sync::Arc<C> {
    fn categories(&self) -> &[Category] {
        (**self).categories()
    }
}

// ---------------------------------------------------------------------------
// StaticCatalog
// ---------------------------------------------------------------------------

/// A validated, immutable, in-memory catalog.
///
/// Words are trimmed on construction. Construction fails if a key is
/// empty, reserved or duplicated, or if a word is empty. A category with
/// no words at all is allowed: it simply contributes nothing to the pool.
///
/// ## Example
///
/// ```rust
/// use spyglass_catalog::{Category, StaticCatalog, WordCatalog};
///
/// let catalog = StaticCatalog::new(vec![
///     Category::new("Animals", ["Cat", "Dog"]),
///     Category::new("Food", ["Soup", "Bread"]),
/// ])
/// .unwrap();
///
/// assert_eq!(catalog.keys(), vec!["Animals", "Food"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    categories: Vec<Category>,
}

impl StaticCatalog {
    /// Builds a catalog from categories, validating every key and word.
    ///
    /// # Errors
    /// See [`CatalogError`] for the rejected shapes.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::with_capacity(categories.len());

        for category in categories {
            let key = category.key.trim().to_string();
            if key.is_empty() {
                return Err(CatalogError::EmptyCategoryKey);
            }
            if key == ALL_CATEGORIES_KEY || key == CUSTOM_CATEGORY_LABEL {
                return Err(CatalogError::ReservedKey(key));
            }
            if !seen.insert(key.clone()) {
                return Err(CatalogError::DuplicateCategory(key));
            }

            let mut words = Vec::with_capacity(category.words.len());
            for word in category.words {
                let word = word.trim();
                if word.is_empty() {
                    return Err(CatalogError::EmptyWord { category: key });
                }
                words.push(word.to_string());
            }

            cleaned.push(Category { key, words });
        }

        tracing::debug!(categories = cleaned.len(), "word catalog built");
        Ok(Self {
            categories: cleaned,
        })
    }

    /// Parses a catalog from a JSON array of `{ "key", "words" }` objects.
    ///
    /// # Errors
    /// [`CatalogError::Json`] for malformed input, otherwise the same
    /// validation errors as [`StaticCatalog::new`].
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let categories: Vec<Category> = serde_json::from_str(json)?;
        Self::new(categories)
    }
}

impl WordCatalog for StaticCatalog {
    fn categories(&self) -> &[Category] {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StaticCatalog {
        StaticCatalog::new(vec![
            Category::new("Animals", ["Cat", "Dog", "Otter"]),
            Category::new("Pets", ["Cat", "Hamster"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_trims_keys_and_words() {
        let catalog =
            StaticCatalog::new(vec![Category::new("  Food ", [" Soup  "])])
                .unwrap();
        assert_eq!(catalog.categories()[0].key, "Food");
        assert_eq!(catalog.categories()[0].words, vec!["Soup".to_string()]);
    }

    #[test]
    fn test_new_rejects_reserved_keys() {
        let err = StaticCatalog::new(vec![Category::new("ALL", ["x"])])
            .unwrap_err();
        assert!(matches!(err, CatalogError::ReservedKey(k) if k == "ALL"));

        let err = StaticCatalog::new(vec![Category::new("CUSTOM", ["x"])])
            .unwrap_err();
        assert!(matches!(err, CatalogError::ReservedKey(_)));
    }

    #[test]
    fn test_new_rejects_duplicate_category() {
        let err = StaticCatalog::new(vec![
            Category::new("Food", ["Soup"]),
            Category::new("Food", ["Bread"]),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategory(k) if k == "Food"));
    }

    #[test]
    fn test_new_rejects_empty_word() {
        let err = StaticCatalog::new(vec![Category::new("Food", ["Soup", "  "])])
            .unwrap_err();
        assert!(
            matches!(err, CatalogError::EmptyWord { category } if category == "Food")
        );
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let err =
            StaticCatalog::new(vec![Category::new(" ", ["x"])]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCategoryKey));
    }

    #[test]
    fn test_new_allows_empty_category() {
        let catalog =
            StaticCatalog::new(vec![Category::new("Empty", Vec::<String>::new())])
                .unwrap();
        assert!(catalog.categories()[0].is_empty());
    }

    #[test]
    fn test_category_lookup_by_key() {
        let catalog = sample();
        assert_eq!(catalog.category("Pets").unwrap().len(), 2);
        assert!(catalog.category("Cars").is_none());
    }

    #[test]
    fn test_summary_counts_unique_words_once() {
        let summary = sample().summary();
        assert_eq!(summary.category_count(), 2);
        assert_eq!(summary.categories[0].words, 3);
        assert_eq!(summary.categories[1].words, 2);
        // "Cat" appears in both categories.
        assert_eq!(summary.unique_words, 4);
    }

    #[test]
    fn test_arc_catalog_delegates() {
        let catalog = std::sync::Arc::new(sample());
        assert_eq!(catalog.keys(), vec!["Animals", "Pets"]);
    }
}
