// File: crates/timechart-core/src/host.rs
// Summary: Contracts the embedding host supplies: clock, frame scheduling, label formatting, text measurement.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic milliseconds used to drive every animation.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time since creation, backed by [`Instant`].
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

/// Clock moved by hand; clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }
    pub fn set(&self, now: i64) {
        self.now.set(now);
    }
    pub fn advance(&self, millis: i64) -> i64 {
        self.now.set(self.now.get() + millis);
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

/// Redraw request: the host should call `step` + `draw` again after `delay`.
/// Requests are advisory and may be coalesced or skipped.
pub trait FrameScheduler {
    fn schedule_frame(&self, delay: Duration);
}

/// Scheduler for hosts polling `step` on their own.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopScheduler;

impl FrameScheduler for NoopScheduler {
    fn schedule_frame(&self, _delay: Duration) {}
}

/// Formats an x timestamp (epoch millis) as a label.
pub type DateFormatter = Box<dyn Fn(i64) -> String>;
/// Formats a Y guide value as a label, given the top value of the Y axis.
pub type ValueFormatter = Box<dyn Fn(i64, i64) -> String>;
/// Measures the rendered width of a label, in pixels.
pub type TextMeasure = Box<dyn Fn(&str) -> f32>;

/// Host callbacks used by the label layer.
pub struct LabelCallbacks {
    pub format_date: DateFormatter,
    pub format_value: ValueFormatter,
    /// `None` measures with the label font.
    pub measure: Option<TextMeasure>,
}

impl Default for LabelCallbacks {
    fn default() -> Self {
        Self {
            format_date: Box::new(crate::format::format_date_short),
            format_value: Box::new(|value, _max| crate::format::format_number(value)),
            measure: None,
        }
    }
}
