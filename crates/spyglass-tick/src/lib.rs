//! Tick scheduling and countdown timers for Spyglass.
//!
//! Two timers drive a round: the short reveal gate (how long a player must
//! look at their role before "hide & pass" unlocks) and the long discussion
//! timer. Both are a [`CountdownTimer`] that decrements once per tick.
//!
//! Where the ticks come from is a separate concern, behind the
//! [`Scheduler`] trait:
//!
//! - [`TokioScheduler`]: a real once-per-interval task on the Tokio runtime.
//! - [`ManualScheduler`]: ticks fire only when the caller advances time.
//!   Tests and simulations use it to step a round synchronously.
//!
//! Every scheduled tick returns a [`TickHandle`]. Dropping or cancelling the
//! handle guarantees the callback is never invoked again.
//!
//! # Integration
//!
//! The countdown never mutates anything itself. Its tick callback posts the
//! timer's generation into the owner's event queue, and the owner feeds it
//! back through [`CountdownTimer::tick`] on its own dispatch loop:
//!
//! ```ignore
//! let tx = ticks_tx.clone();
//! timer.start(60, &scheduler, Duration::from_secs(1), move |generation| {
//!     let _ = tx.send(generation);
//! });
//!
//! // later, on the dispatch loop
//! match timer.tick(generation) {
//!     TickOutcome::Finished => { /* time's up, exactly once */ }
//!     TickOutcome::Running { .. } | TickOutcome::Ignored => {}
//! }
//! ```

mod countdown;
mod scheduler;

pub use countdown::{CountdownTimer, TickOutcome, TimerSnapshot};
pub use scheduler::{
    ManualScheduler, Scheduler, TickCallback, TickHandle, TokioScheduler,
};
