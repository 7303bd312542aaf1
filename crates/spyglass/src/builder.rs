//! `SpyglassBuilder`: catalog plus configuration in, running game out.

use std::fmt;

use spyglass_catalog::{StaticCatalog, WordCatalog};
use spyglass_flow::{FlowConfig, GameHandle, spawn_game};
use spyglass_session::SetupLimits;
use tracing::info;

use crate::SpyglassError;

/// Builder for configuring and starting a game actor.
///
/// # Example
///
/// ```rust,ignore
/// use spyglass::prelude::*;
///
/// let game = SpyglassBuilder::new()
///     .catalog(my_catalog)
///     .reveal_gate_secs(3)
///     .spawn()?;
/// ```
pub struct SpyglassBuilder<C = StaticCatalog> {
    catalog: Option<C>,
    config: FlowConfig,
}

impl SpyglassBuilder {
    /// Creates a builder with default configuration and no catalog.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SpyglassBuilder {
    fn default() -> Self {
        Self {
            catalog: None,
            config: FlowConfig::default(),
        }
    }
}

impl<C> fmt::Debug for SpyglassBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyglassBuilder")
            .field("has_catalog", &self.catalog.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl<C: WordCatalog> SpyglassBuilder<C> {
    /// Sets the word catalog. Any [`WordCatalog`] works, not only
    /// [`StaticCatalog`].
    pub fn catalog<D: WordCatalog>(self, catalog: D) -> SpyglassBuilder<D> {
        SpyglassBuilder {
            catalog: Some(catalog),
            config: self.config,
        }
    }

    /// Parses and sets the word catalog from JSON.
    ///
    /// The expected shape is an array of `{"key": ..., "words": [...]}`.
    pub fn catalog_json(self, json: &str) -> Result<SpyglassBuilder<StaticCatalog>, SpyglassError> {
        Ok(self.catalog(StaticCatalog::from_json(json)?))
    }

    /// Replaces the whole flow configuration.
    pub fn config(mut self, config: FlowConfig) -> Self {
        self.config = config;
        self
    }

    /// Fixes the random seed, making role and word draws reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    pub fn reveal_gate_secs(mut self, secs: u32) -> Self {
        self.config.reveal_gate_secs = secs;
        self
    }

    pub fn limits(mut self, limits: SetupLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Spawns the game actor. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// [`SpyglassError::MissingCatalog`] if no catalog was set.
    pub fn spawn(self) -> Result<GameHandle, SpyglassError> {
        let catalog = self.catalog.ok_or(SpyglassError::MissingCatalog)?;
        let summary = catalog.summary();
        info!(
            categories = summary.categories.len(),
            unique_words = summary.unique_words,
            "spawning game"
        );
        Ok(spawn_game(catalog, self.config))
    }
}
