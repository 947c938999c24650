use crate::foundation::core::Timestamp;
use std::cell::{Cell, RefCell};
use std::fmt;

/// Callback run once at the next display refresh.
pub type FrameCallback = Box<dyn FnOnce(Timestamp)>;

/// Display-refresh capability.
pub trait FrameScheduler {
    /// Run `callback` once at the next refresh, with that refresh's timestamp.
    fn request_frame(&self, callback: FrameCallback);
    /// Monotonic clock reading, used to start animations outside a frame.
    fn now(&self) -> Timestamp;
}

/// Scheduler driven by explicit clock advances, for tests and offline playback.
pub struct ManualFrameScheduler {
    clock: Cell<Timestamp>,
    queue: RefCell<Vec<FrameCallback>>,
}

impl fmt::Debug for ManualFrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualFrameScheduler")
            .field("clock", &self.clock.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Default for ManualFrameScheduler {
    fn default() -> Self {
        Self::new(Timestamp::default())
    }
}

impl ManualFrameScheduler {
    /// Scheduler whose clock starts at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            clock: Cell::new(start),
            queue: RefCell::new(Vec::new()),
        }
    }

    /// Callbacks waiting for the next refresh.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock to `ts` and run the callbacks queued so far.
    ///
    /// Frames requested by those callbacks wait for the next advance. Returns how many ran.
    pub fn advance_to(&self, ts: Timestamp) -> usize {
        self.clock.set(ts);
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let n = due.len();
        for cb in due {
            cb(ts);
        }
        n
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance_by(&self, ms: f64) -> usize {
        self.advance_to(self.clock.get().after_ms(ms))
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push(callback);
    }

    fn now(&self) -> Timestamp {
        self.clock.get()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/updater/scheduler.rs"]
mod tests;
