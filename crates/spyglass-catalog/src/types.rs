//! Plain data types exposed by word catalogs.

use serde::{Deserialize, Serialize};

/// Category key that stands for "every category the catalog knows".
///
/// The setup collaborator puts this in the selection instead of listing
/// every key; the session builder expands it.
pub const ALL_CATEGORIES_KEY: &str = "ALL";

/// Category label used when the secret word was typed in by the group
/// rather than drawn from the catalog.
pub const CUSTOM_CATEGORY_LABEL: &str = "CUSTOM";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One named category and its candidate words, in catalog order.
///
/// In JSON a category looks like:
///
/// ```json
/// { "key": "Animals", "words": ["Cat", "Dog", "Otter"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The category key, also used as its display label.
    pub key: String,
    /// Candidate words. Never empty strings once inside a catalog.
    pub words: Vec<String>,
}

impl Category {
    /// Creates a category from a key and any iterable of words.
    pub fn new<K, I, W>(key: K, words: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            key: key.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of words in this category (duplicates included).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if this category has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Word count of a single category, as listed on the word-list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub key: String,
    pub words: usize,
}

/// Catalog statistics for the word-list page.
///
/// `unique_words` counts distinct words across every category, so a word
/// listed under two categories is counted once. That is also the size of
/// the "everything" pseudo-category as players see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Per-category counts, in catalog order.
    pub categories: Vec<CategoryCount>,
    /// Distinct words across all categories.
    pub unique_words: usize,
}

impl CatalogSummary {
    /// Number of real categories (the "everything" sentinel not included).
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_new_collects_words_in_order() {
        let cat = Category::new("Animals", ["Cat", "Dog"]);
        assert_eq!(cat.key, "Animals");
        assert_eq!(cat.words, vec!["Cat".to_string(), "Dog".to_string()]);
        assert_eq!(cat.len(), 2);
        assert!(!cat.is_empty());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_category_json_shape() {
        let cat = Category::new("Food", ["Soup"]);
        let json = serde_json::to_string(&cat).unwrap();
        assert_eq!(json, r#"{"key":"Food","words":["Soup"]}"#);
    }
}
