use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Configuration for a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionConfig {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Transitions that complete as soon as they start.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Easing::Linear)
    }
}

/// Easing function for transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Cubic ease in-out, symmetric around the midpoint.
    CubicInOut,
}

impl Easing {
    /// Apply easing to progress (0.0 to 1.0).
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Values a [`Tween`] can interpolate.
pub trait Interpolate: Clone {
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(*to, t)
    }
}

/// A time-based interpolation between two values.
#[derive(Debug, Clone)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Instant,
    config: TransitionConfig,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, start: Instant, config: TransitionConfig) -> Self {
        Self {
            from,
            to,
            start,
            config,
        }
    }

    /// Linear progress in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.config.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.config.duration.as_secs_f32()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> T {
        let eased = self.config.easing.apply(self.progress(now));
        self.from.interpolate(&self.to, eased)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Value the tween ends on.
    pub fn target(&self) -> &T {
        &self.to
    }

    /// Head for `to`, starting from wherever the tween currently is.
    pub fn retarget(&mut self, to: T, now: Instant, config: TransitionConfig) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
        self.config = config;
    }
}
