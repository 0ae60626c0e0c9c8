//! Time-based property interpolation.
//!
//! A [`Tween`] moves a value from `from` to `to` over a duration with an
//! [`Easing`] curve, optionally after a delay and optionally playing back and
//! forth (`yoyo`). Tweens are advanced explicitly with the frame delta so they
//! stay deterministic and testable.

use std::ops::{Add, Mul, Sub};

/// Easing curves. Names follow the common `power`/`back` families:
/// `power1` is quadratic, `power2` is cubic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    Power1Out,
    Power2Out,
    Power2InOut,
    BackOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
        }
    }
}

/// Anything that can be linearly blended.
pub trait Interpolate: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl<T> Interpolate for T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    fn lerp(self, to: Self, t: f32) -> Self {
        // land exactly on the target instead of `self + (to - self)`
        if t == 1.0 {
            return to;
        }
        self + (to - self) * t
    }
}

#[derive(Clone, Debug)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f32,
    delay: f32,
    ease: Easing,
    /// Number of extra legs played in reverse after the first one.
    yoyo: u32,
    elapsed: f32,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, ease: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            ease,
            yoyo: 0,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Play `legs` additional legs, alternating direction. `yoyo(1)` goes up and back once.
    pub fn yoyo(mut self, legs: u32) -> Self {
        self.yoyo = legs;
        self
    }

    pub fn from(&self) -> T {
        self.from
    }

    pub fn to(&self) -> T {
        self.to
    }

    pub fn total(&self) -> f32 {
        self.delay + self.duration * (self.yoyo + 1) as f32
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total()
    }

    /// Value the tween settles on once finished.
    pub fn end_value(&self) -> T {
        if self.yoyo % 2 == 1 { self.from } else { self.to }
    }

    pub fn sample(&self) -> T {
        if self.is_finished() {
            return self.end_value();
        }
        let t = self.elapsed - self.delay;
        if t <= 0.0 || self.duration <= 0.0 {
            return self.from;
        }
        let leg = (t / self.duration).floor();
        let progress = t / self.duration - leg;
        let progress = if leg as u32 % 2 == 1 {
            1.0 - progress
        } else {
            progress
        };
        self.from.lerp(self.to, self.ease.apply(progress))
    }

    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.total());
        self.sample()
    }
}
