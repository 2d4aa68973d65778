// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fling decay simulation.
//!
//! The engine only needs positions over time; how they decay is up to a
//! [`FlingSimulator`]. [`DecayFling`] is the default: constant deceleration
//! that stops at the elastic edge, followed by an eased spring back to the
//! hard bound if the fling ended outside it.

use core::time::Duration;

use kurbo::Vec2;

use crate::animation::ease_in_out;

/// Standard gravity, in m/s².
const GRAVITY_EARTH: f64 = 9.806_65;
/// Inches per meter.
const INCHES_PER_METER: f64 = 39.37;
/// Baseline pixel density (pixels per inch at density `1.0`).
const BASELINE_PPI: f64 = 160.0;
/// Scroll friction coefficient.
const SCROLL_FRICTION: f64 = 0.015;

/// Duration of the spring back from the elastic edge to the hard bound.
pub const SPRING_BACK_DURATION: Duration = Duration::from_millis(250);

/// Pan bounds and start position of a fling along one axis, in real units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingAxis {
    /// Smallest pan the fling should come to rest at.
    pub min: f64,
    /// Pan at the start of the fling.
    pub start: f64,
    /// Largest pan the fling should come to rest at.
    pub max: f64,
}

/// A numeric decay model driving a fling.
///
/// The engine owns its simulator exclusively while flinging. It calls
/// [`FlingSimulator::fling`] once, then [`FlingSimulator::compute`] on each
/// frame followed by [`FlingSimulator::position`], until the simulator
/// reports it is finished or the fling is aborted.
pub trait FlingSimulator {
    /// Starts a new fling, replacing any previous one.
    ///
    /// `over_scroll` is how far past `[min, max]` the position may travel
    /// before it has to come back.
    fn fling(&mut self, x: FlingAxis, y: FlingAxis, velocity: Vec2, over_scroll: f64);

    /// Advances the simulation to `now`.
    ///
    /// Returns `false` if the fling had already finished, `true` if a new
    /// position is available (including the final one).
    fn compute(&mut self, now: Duration) -> bool;

    /// Returns `true` once the fling has come to rest or was aborted.
    fn is_finished(&self) -> bool;

    /// Current position on both axes.
    fn position(&self) -> Vec2;

    /// Stops the fling where it is.
    fn abort(&mut self);
}

/// Motion along one axis of a [`DecayFling`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct AxisDecay {
    start: f64,
    velocity: f64,
    /// Seconds spent decelerating from `start` to `edge`.
    travel: f64,
    edge: f64,
    rest: f64,
    /// Seconds spent springing back from `edge` to `rest`.
    settle: f64,
}

impl AxisDecay {
    fn new(axis: FlingAxis, velocity: f64, deceleration: f64, over_scroll: f64) -> Self {
        let FlingAxis { min, start, max } = axis;
        let (edge, travel) = if start < min || start > max || velocity == 0.0 {
            // Already outside the bounds: only spring back.
            (start, 0.0)
        } else {
            let natural = velocity * velocity.abs() / (2.0 * deceleration);
            let edge = (start + natural).clamp(min - over_scroll, max + over_scroll);
            // Decelerate uniformly so velocity reaches zero exactly at `edge`.
            (edge, 2.0 * (edge - start).abs() / velocity.abs())
        };
        let rest = edge.clamp(min, max);
        let settle = if rest == edge {
            0.0
        } else {
            SPRING_BACK_DURATION.as_secs_f64()
        };
        Self {
            start,
            velocity,
            travel,
            edge,
            rest,
            settle,
        }
    }

    fn duration(&self) -> f64 {
        self.travel + self.settle
    }

    fn position_at(&self, t: f64) -> f64 {
        if t < self.travel {
            let accel = self.velocity / self.travel;
            return self.start + self.velocity * t - 0.5 * accel * t * t;
        }
        let s = t - self.travel;
        if self.settle <= 0.0 || s >= self.settle {
            self.rest
        } else {
            self.edge + (self.rest - self.edge) * ease_in_out(s / self.settle)
        }
    }
}

/// Default [`FlingSimulator`] with constant deceleration and a spring back.
#[derive(Clone, Debug)]
pub struct DecayFling {
    deceleration: f64,
    x: AxisDecay,
    y: AxisDecay,
    position: Vec2,
    started_at: Option<Duration>,
    finished: bool,
}

impl DecayFling {
    /// Creates a simulator decelerating at `deceleration` real units per second².
    #[must_use]
    pub fn new(deceleration: f64) -> Self {
        Self {
            deceleration: deceleration.abs().max(f64::MIN_POSITIVE),
            x: AxisDecay::default(),
            y: AxisDecay::default(),
            position: Vec2::ZERO,
            started_at: None,
            finished: true,
        }
    }

    /// Creates a simulator with physical friction for a display of the given
    /// density (`1.0` is 160 pixels per inch).
    #[must_use]
    pub fn with_density(density: f64) -> Self {
        Self::new(GRAVITY_EARTH * INCHES_PER_METER * BASELINE_PPI * SCROLL_FRICTION * density)
    }

    /// Deceleration in real units per second².
    #[must_use]
    pub fn deceleration(&self) -> f64 {
        self.deceleration
    }
}

impl Default for DecayFling {
    fn default() -> Self {
        Self::with_density(1.0)
    }
}

impl FlingSimulator for DecayFling {
    fn fling(&mut self, x: FlingAxis, y: FlingAxis, velocity: Vec2, over_scroll: f64) {
        let over_scroll = over_scroll.max(0.0);
        self.x = AxisDecay::new(x, velocity.x, self.deceleration, over_scroll);
        self.y = AxisDecay::new(y, velocity.y, self.deceleration, over_scroll);
        self.position = Vec2::new(x.start, y.start);
        self.started_at = None;
        self.finished = false;
    }

    fn compute(&mut self, now: Duration) -> bool {
        if self.finished {
            return false;
        }
        let start = *self.started_at.get_or_insert(now);
        let t = now.saturating_sub(start).as_secs_f64();
        self.position = Vec2::new(self.x.position_at(t), self.y.position_at(t));
        if t >= self.x.duration() && t >= self.y.duration() {
            self.finished = true;
        }
        true
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn abort(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::Vec2;

    use super::{DecayFling, FlingAxis, FlingSimulator};

    fn axis(min: f64, start: f64, max: f64) -> FlingAxis {
        FlingAxis { min, start, max }
    }

    fn run_to_rest(sim: &mut DecayFling) -> Vec2 {
        let mut ms = 0;
        while sim.compute(Duration::from_millis(ms)) {
            ms += 16;
            assert!(ms < 60_000, "fling never finished");
        }
        sim.position()
    }

    #[test]
    fn starts_finished() {
        let sim = DecayFling::default();
        assert!(sim.is_finished());
        assert!(sim.deceleration() > 900.0 && sim.deceleration() < 950.0);
    }

    #[test]
    fn uniform_deceleration_inside_bounds() {
        let mut sim = DecayFling::new(1000.0);
        sim.fling(
            axis(-10_000.0, 0.0, 10_000.0),
            axis(-10_000.0, 0.0, 10_000.0),
            Vec2::new(1000.0, -1000.0),
            0.0,
        );
        assert!(!sim.is_finished());

        assert!(sim.compute(Duration::from_secs(3)));
        assert_eq!(sim.position(), Vec2::ZERO);

        assert!(sim.compute(Duration::from_secs(3) + Duration::from_millis(500)));
        assert!((sim.position().x - 375.0).abs() < 1e-9);
        assert!((sim.position().y + 375.0).abs() < 1e-9);

        assert!(sim.compute(Duration::from_secs(5)));
        assert!(sim.is_finished());
        assert!((sim.position().x - 500.0).abs() < 1e-9);
        assert!(!sim.compute(Duration::from_secs(6)));
    }

    #[test]
    fn stops_at_elastic_edge_then_springs_back() {
        let mut sim = DecayFling::new(1000.0);
        sim.fling(axis(0.0, 50.0, 100.0), axis(0.0, 0.0, 0.0), Vec2::new(1000.0, 0.0), 10.0);

        // Travel is cut at max + over_scroll.
        sim.compute(Duration::ZERO);
        sim.compute(Duration::from_millis(120));
        assert!(sim.position().x <= 110.0 + 1e-9);

        let rest = run_to_rest(&mut sim);
        assert_eq!(rest.x, 100.0);
        assert_eq!(rest.y, 0.0);
    }

    #[test]
    fn zero_velocity_finishes_on_first_frame() {
        let mut sim = DecayFling::new(1000.0);
        sim.fling(axis(-100.0, -40.0, 0.0), axis(20.0, 20.0, 20.0), Vec2::ZERO, 25.0);
        assert!(sim.compute(Duration::from_millis(7)));
        assert!(sim.is_finished());
        assert_eq!(sim.position(), Vec2::new(-40.0, 20.0));
    }

    #[test]
    fn starting_out_of_bounds_springs_back() {
        let mut sim = DecayFling::new(1000.0);
        sim.fling(axis(0.0, 30.0, 0.0), axis(0.0, 0.0, 0.0), Vec2::new(500.0, 0.0), 50.0);
        let rest = run_to_rest(&mut sim);
        assert_eq!(rest.x, 0.0);
    }

    #[test]
    fn abort_finishes_in_place() {
        let mut sim = DecayFling::new(1000.0);
        sim.fling(
            axis(-5000.0, 0.0, 0.0),
            axis(0.0, 0.0, 0.0),
            Vec2::new(-2000.0, 0.0),
            0.0,
        );
        sim.compute(Duration::ZERO);
        sim.compute(Duration::from_millis(100));
        let here = sim.position();
        sim.abort();
        assert!(sim.is_finished());
        assert!(!sim.compute(Duration::from_millis(200)));
        assert_eq!(sim.position(), here);
    }
}
