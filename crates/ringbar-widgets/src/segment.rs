//! A single value slice of the ring and its interpolation state.

use ringbar_core::{Color, Easing};
use serde::Serialize;

/// Targets closer than this are considered equal.
pub const TARGET_EPSILON: f64 = 1e-9;

/// One bar of the gauge.
///
/// Holds the live value, the value it is heading to and the timing of the
/// transition in between. Time is in milliseconds on the surface clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    index: usize,
    color: Color,
    start_value: f64,
    current: f64,
    target: f64,
    animation_start: Option<f64>,
    duration: f64,
    easing: Easing,
    disposed: bool,
}

impl Segment {
    /// Create an idle segment showing `initial_value`.
    #[must_use]
    pub fn new(index: usize, initial_value: f64, color: Color) -> Self {
        Self {
            index,
            color,
            start_value: initial_value,
            current: initial_value,
            target: initial_value,
            animation_start: None,
            duration: 0.0,
            easing: Easing::Linear,
            disposed: false,
        }
    }

    /// Set the timing function used by later transitions.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Position in the value sequence.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Fill color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Value as of the last [`sample`](Self::sample) or retarget.
    #[must_use]
    pub const fn current_value(&self) -> f64 {
        self.current
    }

    /// Most recently assigned value.
    #[must_use]
    pub const fn target_value(&self) -> f64 {
        self.target
    }

    /// When the running transition started, if any.
    #[must_use]
    pub const fn animation_start(&self) -> Option<f64> {
        self.animation_start
    }

    /// Whether a transition is still running as of the last sample.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animation_start.is_some()
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Head for `target`, starting from wherever the segment is at `start_time`.
    ///
    /// Returns `false` (and leaves any running transition alone) when `target`
    /// equals the current target within [`TARGET_EPSILON`]. A zero or negative
    /// duration snaps to the target.
    pub fn retarget(&mut self, target: f64, duration_ms: f64, start_time: f64) -> bool {
        if (target - self.target).abs() < TARGET_EPSILON {
            return false;
        }
        let from = self.value_at(start_time);
        self.start_value = from;
        self.current = from;
        self.target = target;
        if duration_ms > 0.0 && duration_ms.is_finite() {
            self.duration = duration_ms;
            self.animation_start = Some(start_time);
        } else {
            self.snap(target);
        }
        true
    }

    /// Jump to `value` with no transition.
    pub fn snap(&mut self, value: f64) {
        self.start_value = value;
        self.current = value;
        self.target = value;
        self.animation_start = None;
    }

    /// Interpolated value at `now`, without touching state.
    #[must_use]
    pub fn value_at(&self, now: f64) -> f64 {
        let Some(start) = self.animation_start else {
            return self.current;
        };
        let elapsed = now - start;
        if elapsed >= self.duration {
            return self.target;
        }
        let t = self.easing.apply((elapsed / self.duration).max(0.0));
        (self.target - self.start_value).mul_add(t, self.start_value)
    }

    /// Advance to `now` and return the new current value.
    ///
    /// Once the full duration has elapsed the segment lands exactly on its
    /// target and stops animating.
    pub fn sample(&mut self, now: f64) -> f64 {
        if let Some(start) = self.animation_start {
            if now - start >= self.duration {
                self.current = self.target;
                self.start_value = self.target;
                self.animation_start = None;
            } else {
                self.current = self.value_at(now);
            }
        }
        self.current
    }

    /// Release the segment. Calling it again has no effect.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.animation_start = None;
    }
}
