//! Recurring tick scheduling behind a small trait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Callback invoked once per elapsed interval.
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

// ---------------------------------------------------------------------------
// TickHandle
// ---------------------------------------------------------------------------

/// Cancellation handle for a scheduled recurring tick.
///
/// Cancelling is idempotent. Dropping the handle cancels too, so a timer
/// that forgets its handle also forgets its ticks.
#[derive(Debug)]
pub struct TickHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    /// Creates a live handle and the shared flag the scheduler polls.
    fn new() -> (Self, Arc<AtomicBool>) {
        let cancelled = Arc::new(AtomicBool::new(false));
        (
            Self {
                cancelled: Arc::clone(&cancelled),
            },
            cancelled,
        )
    }

    /// Stops the recurring callback.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Something that can invoke a callback once per `interval` until told to
/// stop.
///
/// Implementations must never invoke a callback after its handle has been
/// cancelled (or dropped) and observed by the scheduler. Owners still guard
/// against a tick already in flight by tagging ticks with a generation.
pub trait Scheduler: Send + 'static {
    /// Starts invoking `callback` every `interval`. The first invocation
    /// happens one full interval after this call.
    fn schedule_tick(&self, interval: Duration, callback: TickCallback) -> TickHandle;
}

// ---------------------------------------------------------------------------
// TokioScheduler
// ---------------------------------------------------------------------------

/// Scheduler backed by a Tokio task per registration.
///
/// Missed ticks are skipped rather than bursted: a stalled runtime must not
/// make a countdown jump several seconds at once.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Smallest interval accepted. Tokio rejects a zero period.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);
}

impl Scheduler for TokioScheduler {
    fn schedule_tick(&self, interval: Duration, mut callback: TickCallback) -> TickHandle {
        let interval = interval.max(Self::MIN_INTERVAL);
        let (handle, cancelled) = TickHandle::new();

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                trace!("tick fired");
                callback();
            }
            trace!("tick task stopped");
        });

        debug!(interval_ms = interval.as_millis() as u64, "tick scheduled");
        handle
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

struct Registration {
    interval: Duration,
    elapsed: Duration,
    cancelled: Arc<AtomicBool>,
    callback: Arc<Mutex<TickCallback>>,
}

/// Scheduler whose clock only moves when told to.
///
/// Cheap to clone; clones share the same registrations, so a test can keep
/// one clone and hand another to the code under test.
///
/// ```rust
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use spyglass_tick::{ManualScheduler, Scheduler};
///
/// let scheduler = ManualScheduler::new();
/// let hits = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&hits);
/// let _handle = scheduler.schedule_tick(
///     Duration::from_secs(1),
///     Box::new(move || { counter.fetch_add(1, Ordering::Relaxed); }),
/// );
///
/// scheduler.advance(Duration::from_secs(3));
/// assert_eq!(hits.load(Ordering::Relaxed), 3);
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    registrations: Arc<Mutex<Vec<Registration>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves simulated time forward and fires every due callback.
    ///
    /// Returns the number of callback invocations. Callbacks run after the
    /// internal lock is released, so they may schedule further ticks.
    pub fn advance(&self, by: Duration) -> usize {
        let due: Vec<(Arc<Mutex<TickCallback>>, Arc<AtomicBool>, u32)> = {
            let mut regs = self
                .registrations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            regs.retain(|r| !r.cancelled.load(Ordering::Acquire));
            regs.iter_mut()
                .filter_map(|r| {
                    r.elapsed += by;
                    let fires = (r.elapsed.as_nanos() / r.interval.as_nanos()) as u32;
                    r.elapsed -= r.interval * fires;
                    (fires > 0).then(|| (Arc::clone(&r.callback), Arc::clone(&r.cancelled), fires))
                })
                .collect()
        };

        let mut fired = 0;
        for (callback, cancelled, fires) in due {
            for _ in 0..fires {
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                let mut cb = callback.lock().unwrap_or_else(PoisonError::into_inner);
                cb();
                fired += 1;
            }
        }
        fired
    }

    /// Shorthand for [`advance`](Self::advance) by whole seconds.
    pub fn advance_secs(&self, secs: u64) -> usize {
        self.advance(Duration::from_secs(secs))
    }

    /// Number of registrations that have not been cancelled.
    pub fn live(&self) -> usize {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| !r.cancelled.load(Ordering::Acquire))
            .count()
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("live", &self.live())
            .finish()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_tick(&self, interval: Duration, callback: TickCallback) -> TickHandle {
        let (handle, cancelled) = TickHandle::new();
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                interval: interval.max(TokioScheduler::MIN_INTERVAL),
                elapsed: Duration::ZERO,
                cancelled,
                callback: Arc::new(Mutex::new(callback)),
            });
        handle
    }
}
