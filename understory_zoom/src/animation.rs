// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eased zoom/pan transitions advanced one frame at a time.

use core::f64::consts::PI;
use core::time::Duration;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `cos`
use kurbo::Vec2;

/// Accelerate-decelerate curve: slow start, fast middle, slow end.
///
/// Maps `0.0 -> 0.0` and `1.0 -> 1.0`; inputs are clamped to `[0, 1]`.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 {
        return 1.0;
    }
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Target of an animation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
    /// Interpolated logical zoom.
    pub zoom: f64,
    /// Interpolated real pan.
    pub pan: Vec2,
    /// `true` on the frame that reaches the end values.
    pub finished: bool,
}

/// A single eased transition between two zoom/pan states.
///
/// Start and end values are captured when the animation is created; the
/// start time is latched on the first sampled frame. Each frame yields the
/// absolute target, so the caller applies the difference from wherever the
/// transform actually is, which absorbs any clamping done in between.
#[derive(Clone, Debug)]
pub struct Animation {
    start_zoom: f64,
    end_zoom: f64,
    start_pan: Vec2,
    end_pan: Vec2,
    allow_over_scroll: bool,
    allow_over_pinch: bool,
    duration: Duration,
    started_at: Option<Duration>,
}

impl Animation {
    /// Creates an animation from (`start_zoom`, `start_pan`) to
    /// (`end_zoom`, `start_pan + delta`).
    #[must_use]
    pub fn new(
        start_zoom: f64,
        end_zoom: f64,
        start_pan: Vec2,
        delta: Vec2,
        duration: Duration,
    ) -> Self {
        Self {
            start_zoom,
            end_zoom,
            start_pan,
            end_pan: start_pan + delta,
            allow_over_scroll: false,
            allow_over_pinch: false,
            duration,
            started_at: None,
        }
    }

    /// Sets which elastic margins the frames of this animation may use.
    #[must_use]
    pub fn with_elastic(mut self, allow_over_scroll: bool, allow_over_pinch: bool) -> Self {
        self.allow_over_scroll = allow_over_scroll;
        self.allow_over_pinch = allow_over_pinch;
        self
    }

    /// Whether frames may use the over-scroll margin.
    #[must_use]
    pub fn allow_over_scroll(&self) -> bool {
        self.allow_over_scroll
    }

    /// Whether frames may use the over-pinch margin.
    #[must_use]
    pub fn allow_over_pinch(&self) -> bool {
        self.allow_over_pinch
    }

    /// Zoom reached at the end of the animation.
    #[must_use]
    pub fn end_zoom(&self) -> f64 {
        self.end_zoom
    }

    /// Real pan reached at the end of the animation.
    #[must_use]
    pub fn end_pan(&self) -> Vec2 {
        self.end_pan
    }

    /// Eased progress at `now`, in `[0, 1]`.
    pub fn progress(&mut self, now: Duration) -> f64 {
        let start = *self.started_at.get_or_insert(now);
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(start);
        ease_in_out(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    /// Samples the animation at `now`.
    pub fn sample(&mut self, now: Duration) -> AnimationFrame {
        let t = self.progress(now);
        if t >= 1.0 {
            return AnimationFrame {
                zoom: self.end_zoom,
                pan: self.end_pan,
                finished: true,
            };
        }
        AnimationFrame {
            zoom: self.start_zoom + t * (self.end_zoom - self.start_zoom),
            pan: self.start_pan.lerp(self.end_pan, t),
            finished: t >= 1.0,
        }
    }
}
