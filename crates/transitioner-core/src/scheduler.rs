use std::cell::RefCell;

use slotmap::{SlotMap, new_key_type};
use web_time::Duration;

new_key_type! {
    /// Handle to a scheduled timeout.
    pub struct TimerId;
}

/// Schedules work for the next paint.
///
/// Frame callbacks are not cancelable; anything they touch must check its own
/// torn-down state before acting.
pub trait FrameScheduler {
    fn request_frame(&self, f: Box<dyn FnOnce()>);
}

/// Schedules and cancels work after a delay.
pub trait TimerScheduler {
    fn set_timeout(&self, after: Duration, f: Box<dyn FnOnce()>) -> TimerId;
    /// No-op for timers that already fired or were cleared.
    fn clear_timeout(&self, id: TimerId);
}

struct Timer {
    due: Duration,
    seq: u64,
    f: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    seq: u64,
    timers: SlotMap<TimerId, Timer>,
    frames: Vec<Box<dyn FnOnce()>>,
}

/// Deterministic frame + timer driver.
///
/// Nothing runs until the owner calls [`ManualScheduler::run_frame`] or
/// [`ManualScheduler::advance`]; time only moves when told to.
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<ManualInner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Runs every frame callback queued before this call. Callbacks queued
    /// while running land in the next frame.
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut self.inner.borrow_mut().frames);
        let n = frames.len();
        for f in frames {
            f();
        }
        n
    }

    /// Moves virtual time forward, firing due timers in deadline order.
    /// Returns how many timers fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.inner.borrow().now + by;
        let mut fired = 0;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .timers
                    .iter()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(id, _)| id);
                due.and_then(|id| inner.timers.remove(id)).map(|t| {
                    inner.now = inner.now.max(t.due);
                    t.f
                })
            };
            match next {
                Some(f) => {
                    f();
                    fired += 1;
                }
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
        fired
    }

    /// Alternates frames and timer deadlines until nothing is pending.
    pub fn run_until_idle(&self) {
        const MAX_STEPS: usize = 10_000;
        for _ in 0..MAX_STEPS {
            self.run_frame();
            let next_due = {
                let inner = self.inner.borrow();
                if inner.frames.is_empty() && inner.timers.is_empty() {
                    return;
                }
                inner.timers.values().map(|t| t.due).min()
            };
            if let Some(due) = next_due {
                let now = self.now();
                self.advance(due.saturating_sub(now));
            }
        }
        log::warn!("ManualScheduler: still busy after {MAX_STEPS} steps; giving up");
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, f: Box<dyn FnOnce()>) {
        self.inner.borrow_mut().frames.push(f);
    }
}

impl TimerScheduler for ManualScheduler {
    fn set_timeout(&self, after: Duration, f: Box<dyn FnOnce()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let due = inner.now + after;
        let seq = inner.seq;
        inner.seq += 1;
        inner.timers.insert(Timer { due, seq, f })
    }

    fn clear_timeout(&self, id: TimerId) {
        self.inner.borrow_mut().timers.remove(id);
    }
}
