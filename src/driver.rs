//! Frame-callback loop driver
//!
//! The simulation is paced by the host's per-display-frame signal, not a
//! fixed-rate timer. The host owns the scheduling primitive (on the web this
//! is `requestAnimationFrame`/`cancelAnimationFrame`); the driver only
//! decides, per callback, whether enough wall-clock time has elapsed for a
//! simulation tick. Keeping the primitive behind a trait lets tests pump the
//! loop with synthetic timestamps.

use crate::sim::ConfigError;

/// Identifies a pending frame request for cancellation.
pub type FrameHandle = u64;

/// The host's animation-frame scheduling primitive.
pub trait Scheduler {
    /// Ask the host to invoke the loop callback on the next display frame.
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancel a previously requested callback.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Gates simulation ticks to a target rate on top of the host's frame signal.
#[derive(Debug)]
pub struct GameLoop {
    /// Minimum milliseconds between accepted ticks
    frame_interval: f64,
    last_time: f64,
    pending: Option<FrameHandle>,
    stopped: bool,
}

impl GameLoop {
    /// A loop targeting `tick_rate` simulation ticks per second.
    pub fn new(tick_rate: f64) -> Result<Self, ConfigError> {
        if !(tick_rate > 0.0) {
            return Err(ConfigError::NonPositiveTickRate);
        }
        Ok(Self {
            frame_interval: 1000.0 / tick_rate,
            last_time: 0.0,
            pending: None,
            stopped: true,
        })
    }

    /// Begin scheduling frame callbacks. Restarts cleanly if already running.
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop(scheduler);
        self.stopped = false;
        self.pending = Some(scheduler.request_frame());
    }

    /// Cancel any pending callback and reset the tick clock so a subsequent
    /// start begins cleanly. Stopping an already-stopped loop is a no-op.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.last_time = 0.0;
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The host calls this from the scheduled callback with a monotonically
    /// increasing timestamp. Reschedules itself unless stopped, and returns
    /// `Some(now_ms)` only when a simulation tick is due.
    pub fn on_frame(&mut self, now_ms: f64, scheduler: &mut dyn Scheduler) -> Option<f64> {
        if self.stopped {
            return None;
        }
        self.pending = Some(scheduler.request_frame());

        let elapsed = now_ms - self.last_time;
        if elapsed < self.frame_interval {
            return None;
        }
        self.last_time = now_ms;
        Some(now_ms)
    }
}

/// A scheduler pumped by hand: each `request_frame` records one pending
/// callback the caller services with a synthetic timestamp. Used by the
/// headless demo and the tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: FrameHandle,
    pending: Option<FrameHandle>,
    pub requested: u64,
    pub cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.pending = Some(self.next_handle);
        self.requested += 1;
        self.next_handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled += 1;
    }
}
