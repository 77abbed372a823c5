// File: crates/timechart-core/src/animation.rs
// Summary: Time-driven 0..1 animation state with mid-flight retargeting, plus easing curves.

use std::f32::consts::PI;
use std::time::Duration;

/// Length of every state transition.
pub const ANIMATION_DURATION_MS: i64 = 300;

/// Delay between two animation frames requested by the engine.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(10);

/// Slow start, fast middle, slow end.
#[inline]
pub fn accelerate_decelerate(t: f32) -> f32 {
    0.5 - 0.5 * (PI * t).cos()
}

/// Inverse of [`accelerate_decelerate`] on `[0, 1]`.
#[inline]
fn accelerate_decelerate_inverse(value: f32) -> f32 {
    (1.0 - 2.0 * value).clamp(-1.0, 1.0).acos() / PI
}

/// `t^(2·factor)`; factor 1 is a plain quadratic ease-in.
#[inline]
pub fn accelerate(t: f32, factor: f32) -> f32 {
    t.powf(2.0 * factor)
}

/// A scalar animating between 0 and 1.
///
/// Lifecycle: created unset (NaN/NaN) → [`set_to`](Self::set_to) jumps or
/// [`animate_to`](Self::animate_to) starts from the current value →
/// [`update`](Self::update) each frame → [`is_finished`](Self::is_finished)
/// once the value reached its target. Retargeting mid-flight continues from the
/// current eased value, without a jump.
#[derive(Clone, Debug)]
pub struct AnimatedState {
    target: f32,
    state: f32,
    started_at: Option<i64>,
}

impl Default for AnimatedState {
    fn default() -> Self {
        Self { target: f32::NAN, state: f32::NAN, started_at: None }
    }
}

impl AnimatedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Already settled at `value`.
    pub fn settled(value: f32) -> Self {
        let mut state = Self::default();
        state.set_to(value);
        state
    }

    pub fn update(&mut self, now: i64) {
        if !self.is_set() {
            return;
        }
        let Some(started_at) = self.started_at else { return };

        let t = ((now - started_at) as f32 / ANIMATION_DURATION_MS as f32).clamp(0.0, 1.0);
        if t >= 1.0 {
            self.state = self.target;
            self.started_at = None;
            return;
        }

        let eased = accelerate_decelerate(t);
        self.state = if self.target == 1.0 { eased } else { 1.0 - eased };
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.state
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_set(&self) -> bool {
        !self.target.is_nan() && !self.state.is_nan()
    }

    /// Jumps to `target` without animation.
    pub fn set_to(&mut self, target: f32) {
        self.target = target;
        self.state = target;
        self.started_at = None;
    }

    /// Animates from the current value to `target` (0 or 1). No-op when unset or
    /// when `target` is already the target.
    pub fn animate_to(&mut self, target: f32, now: i64) {
        debug_assert!(target == 0.0 || target == 1.0, "animation targets are 0 or 1");

        if !self.is_set() || self.target == target {
            return;
        }
        self.target = target;

        if self.state == target {
            self.started_at = None;
            return;
        }

        // Time offset at which the eased curve passes through the current value
        let progress = if target == 1.0 { self.state } else { 1.0 - self.state };
        let t = accelerate_decelerate_inverse(progress);
        self.started_at = Some(now - (ANIMATION_DURATION_MS as f32 * t).round() as i64);
    }

    /// Marks the state unset; it is excluded from stepping until set again.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_finished(&self) -> bool {
        !self.is_set() || self.target == self.state
    }
}
