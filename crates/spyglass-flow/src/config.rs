//! Flow configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use spyglass_session::SetupLimits;
use tracing::warn;

/// How long a player must look at their role before "hide & pass" unlocks.
pub const DEFAULT_REVEAL_GATE_SECS: u32 = 5;

/// Configuration for a game machine and its actor.
///
/// Every field has a sensible default; override only what you need:
///
/// ```rust
/// use spyglass_flow::FlowConfig;
///
/// let config = FlowConfig {
///     rng_seed: Some(42),
///     ..FlowConfig::default()
/// };
/// assert_eq!(config.reveal_gate_secs, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Reveal gate length in whole seconds. At least 1.
    pub reveal_gate_secs: u32,

    /// Length of one countdown step. One second in production; tests may
    /// shorten it to run a round quickly on the real clock.
    pub tick_interval: Duration,

    /// Seed for role and word draws. `None` seeds from the OS.
    pub rng_seed: Option<u64>,

    /// Player-count bounds checked by `start_game`.
    pub limits: SetupLimits,

    /// Capacity of the actor's command channel.
    pub command_buffer: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            reveal_gate_secs: DEFAULT_REVEAL_GATE_SECS,
            tick_interval: Duration::from_secs(1),
            rng_seed: None,
            limits: SetupLimits::default(),
            command_buffer: 64,
        }
    }
}

impl FlowConfig {
    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called automatically by `GameMachine::new`. Rules:
    /// - `reveal_gate_secs` raised to 1 (a zero gate would open before the
    ///   role is on screen).
    /// - `tick_interval` raised to 1 ms.
    /// - `command_buffer` raised to 1.
    /// - `limits` validated.
    pub fn validated(mut self) -> Self {
        if self.reveal_gate_secs == 0 {
            warn!("reveal_gate_secs is zero, clamping to 1");
            self.reveal_gate_secs = 1;
        }
        if self.tick_interval < Duration::from_millis(1) {
            warn!(
                interval_us = self.tick_interval.as_micros() as u64,
                "tick_interval too short, clamping to 1 ms"
            );
            self.tick_interval = Duration::from_millis(1);
        }
        if self.command_buffer == 0 {
            self.command_buffer = 1;
        }
        self.limits = self.limits.validated();
        self
    }
}
