//! Session building: roles plus a secret word.
//!
//! Word resolution, in priority order:
//!
//! 1. A non-empty custom word is used verbatim (trimmed); the category
//!    selection is ignored and the category shows as custom.
//! 2. Otherwise the selection is resolved against the catalog (`All`
//!    expands to every category) and every `(word, category)` pair goes
//!    into a pool. A word listed under two categories is two entries.
//! 3. An empty pool falls back to the first word of the catalog's first
//!    non-empty category, with a warning: the setup collaborator should have
//!    rejected the selection.
//! 4. Otherwise one entry is drawn uniformly from the pool.

use rand::Rng;
use spyglass_catalog::WordCatalog;
use tracing::{info, warn};

use crate::{
    CategorySelection, GameSettings, Session, SessionError, WordCategory,
    assign_roles,
};

/// One candidate secret: a word and the category it was listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPick<'c> {
    pub word: &'c str,
    pub category: &'c str,
}

/// All `(word, category)` pairs reachable from `selection`, in catalog
/// order for `All` and selection order otherwise.
pub fn word_pool<'c, C>(selection: &CategorySelection, catalog: &'c C) -> Vec<WordPick<'c>>
where
    C: WordCatalog + ?Sized,
{
    selection
        .resolve(catalog)
        .into_iter()
        .flat_map(|category| {
            category.words.iter().map(move |word| WordPick {
                word: word.as_str(),
                category: category.key.as_str(),
            })
        })
        .collect()
}

/// Chooses the secret word for a round.
///
/// # Errors
/// [`SessionError::NoWordsAvailable`] only when the pool is empty and the
/// catalog's first category has no word to fall back to.
pub fn draw_word<C, R>(
    settings: &GameSettings,
    catalog: &C,
    rng: &mut R,
) -> Result<(String, WordCategory), SessionError>
where
    C: WordCatalog + ?Sized,
    R: Rng + ?Sized,
{
    if let Some(word) = settings.custom_word() {
        return Ok((word.to_string(), WordCategory::Custom));
    }

    let pool = word_pool(&settings.categories, catalog);
    if pool.is_empty() {
        warn!(
            selection = ?settings.categories,
            "selected categories yield no words, falling back to first catalog word"
        );
        let fallback = catalog
            .categories()
            .iter()
            .find_map(|c| c.words.first().map(|w| (w, &c.key)))
            .ok_or(SessionError::NoWordsAvailable)?;
        return Ok((fallback.0.clone(), WordCategory::Catalog(fallback.1.clone())));
    }

    let pick = pool[rng.random_range(0..pool.len())];
    Ok((
        pick.word.to_string(),
        WordCategory::Catalog(pick.category.to_string()),
    ))
}

/// Builds a fresh session from validated settings.
///
/// Players get seats `0..player_count` with generated names; spies are
/// assigned by [`assign_roles`]; the secret comes from [`draw_word`]; the
/// turn cursor starts at seat 0.
///
/// # Errors
/// [`SessionError::InvalidConfiguration`] if the settings fail
/// [`GameSettings::validate`], or [`SessionError::NoWordsAvailable`] from
/// [`draw_word`].
pub fn build_session<C, R>(
    settings: &GameSettings,
    catalog: &C,
    rng: &mut R,
) -> Result<Session, SessionError>
where
    C: WordCatalog + ?Sized,
    R: Rng + ?Sized,
{
    settings.validate()?;

    let roles = assign_roles(settings.player_count, settings.spy_count, rng)?;
    let (word, category) = draw_word(settings, catalog, rng)?;

    // The word itself is never logged: the log may be on the shared screen.
    info!(
        players = settings.player_count,
        spies = settings.spy_count,
        category = %category,
        custom = category.is_custom(),
        timer_secs = settings.timer_seconds,
        "session built"
    );

    Ok(Session::new(roles, word, category, settings.clone()))
}
