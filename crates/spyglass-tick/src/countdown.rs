//! Restartable, cancelable whole-second countdown.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Scheduler, TickHandle};

/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale generation, or the timer is not running. Nothing changed.
    Ignored,
    /// Decremented; still running.
    Running { remaining: u32 },
    /// Reached zero on this tick. Reported once per `start`.
    Finished,
}

/// Observable state of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub is_finished: bool,
}

impl TimerSnapshot {
    /// Remaining time as `MM:SS`, the way the discussion screen shows it.
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }
}

impl fmt::Display for TimerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clock())
    }
}

// ---------------------------------------------------------------------------
// CountdownTimer
// ---------------------------------------------------------------------------

/// A countdown that loses exactly one second per tick while running.
///
/// ```text
///   idle ──start(n)──→ running ──tick × n──→ finished
///                        │  ↑
///                  pause │  │ resume
///                        ↓  │
///                       paused
/// ```
///
/// - `start` always re-arms: new duration, new generation, finished latch
///   cleared.
/// - The transition into `finished` is reported by [`tick`](Self::tick)
///   returning [`TickOutcome::Finished`], and only on that one tick.
///   Reading [`snapshot`](Self::snapshot) afterwards never re-reports it.
/// - `pause` keeps `remaining_seconds` and the finished latch. `reset`
///   clears running and finished but leaves `remaining_seconds` alone.
/// - Every `start`, `pause`, `resume` and `reset` bumps the generation
///   and drops the previous [`TickHandle`], so ticks from an earlier arming
///   are ignored even if one was already queued.
#[derive(Debug, Default)]
pub struct CountdownTimer {
    remaining: u32,
    running: bool,
    finished: bool,
    generation: u64,
    handle: Option<TickHandle>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the countdown for `seconds` and starts ticking.
    ///
    /// `sink` is called from the scheduler with this arming's generation;
    /// the owner should route it back into [`tick`](Self::tick).
    /// Starting with zero seconds latches finished immediately without
    /// scheduling anything; callers should check [`is_finished`](Self::is_finished).
    ///
    /// Returns the new generation.
    pub fn start<S, F>(
        &mut self,
        seconds: u32,
        scheduler: &S,
        interval: Duration,
        sink: F,
    ) -> u64
    where
        S: Scheduler + ?Sized,
        F: FnMut(u64) + Send + 'static,
    {
        self.disarm();
        self.remaining = seconds;
        self.finished = false;

        if seconds == 0 {
            self.running = false;
            self.finished = true;
            debug!(generation = self.generation, "countdown started at zero");
            return self.generation;
        }

        self.arm(scheduler, interval, sink);
        debug!(seconds, generation = self.generation, "countdown started");
        self.generation
    }

    /// Applies one elapsed interval.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || !self.running {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return TickOutcome::Running {
                remaining: self.remaining,
            };
        }

        self.running = false;
        self.finished = true;
        self.handle = None;
        debug!(generation, "countdown finished");
        TickOutcome::Finished
    }

    /// Stops decrementing. Remaining time and the finished latch are kept.
    pub fn pause(&mut self) {
        if self.running {
            self.disarm();
            debug!(remaining = self.remaining, "countdown paused");
        }
    }

    /// Continues a paused countdown from where it stopped.
    ///
    /// Does nothing if the timer is running, finished, or has nothing left.
    pub fn resume<S, F>(&mut self, scheduler: &S, interval: Duration, sink: F)
    where
        S: Scheduler + ?Sized,
        F: FnMut(u64) + Send + 'static,
    {
        if self.running || self.finished || self.remaining == 0 {
            return;
        }
        self.disarm();
        self.arm(scheduler, interval, sink);
        debug!(remaining = self.remaining, "countdown resumed");
    }

    /// Stops the countdown and clears the finished latch.
    pub fn reset(&mut self) {
        self.disarm();
        self.finished = false;
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining_seconds: self.remaining,
            is_running: self.running,
            is_finished: self.finished,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Generation of the current arming. Ticks must carry this value.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancels any scheduled ticks and invalidates queued ones.
    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.running = false;
        self.generation += 1;
    }

    fn arm<S, F>(&mut self, scheduler: &S, interval: Duration, mut sink: F)
    where
        S: Scheduler + ?Sized,
        F: FnMut(u64) + Send + 'static,
    {
        let generation = self.generation;
        self.handle = Some(scheduler.schedule_tick(
            interval,
            Box::new(move || sink(generation)),
        ));
        self.running = true;
    }
}
