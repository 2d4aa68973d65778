// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture inputs.
//!
//! The engine does not look at raw pointer data. Hosts run their own
//! recognizers and forward the three gesture kinds through independent
//! ports: pinch (focus + scale factor), drag (distance since last event) and
//! fling (release velocity). Each port returns `true` if the gesture was
//! taken, or `false` if the current [`Mode`] forbids it; a refused gesture
//! is simply dropped for this event.

use kurbo::{Point, Vec2};

use crate::bounds::PanRange;
use crate::engine::ZoomEngine;
use crate::fling::{FlingAxis, FlingSimulator};
use crate::mode::Mode;
use crate::transform::TransformListener;

/// Divisor damping the pan nudge toward a pinch focus.
const PINCH_FOCUS_DAMPING: f64 = 4.0;

impl<S: FlingSimulator, L: TransformListener> ZoomEngine<S, L> {
    /// Handles one pinch step.
    ///
    /// `focus` is the pinch center in viewport coordinates and `scale_factor`
    /// the scale change since the previous step. Non-finite input is refused. Besides zooming, the
    /// content is nudged a quarter of the way from the viewport center toward
    /// the focus; the nudge is dropped when the zoom hits its (elastic)
    /// limit so that pinching against a limit does not pan.
    pub fn on_pinch(&mut self, focus: Point, scale_factor: f64) -> bool {
        if !focus.is_finite() || !scale_factor.is_finite() || !self.set_mode(Mode::Pinching) {
            return false;
        }
        let mut nudge = (self.state.view_center() - focus) / PINCH_FOCUS_DAMPING;
        let new_zoom = self.state.zoom() * scale_factor;
        if new_zoom != self.state.clamp_zoom(new_zoom, true) {
            nudge = Vec2::ZERO;
        }
        // Over-pinch only; combining it with over-scroll makes the bounds fight.
        self.state
            .apply_delta(new_zoom, nudge, false, true, &mut self.listener);
        true
    }

    /// Handles the end of a pinch.
    ///
    /// An over-pinched zoom animates back to the nearest limit; otherwise the
    /// engine returns to [`Mode::Idle`]. Ignored unless pinching.
    pub fn on_pinch_end(&mut self) {
        if self.mode != Mode::Pinching {
            return;
        }
        let limits = self.state.limits();
        let zoom = self.state.zoom();
        let target = if zoom < limits.min() {
            Some(limits.min())
        } else if zoom > limits.max() {
            Some(limits.max())
        } else {
            None
        };
        match target {
            Some(target) => {
                self.animate_to(target, Vec2::ZERO, false, true);
            }
            None => {
                self.set_mode(Mode::Idle);
            }
        }
    }

    /// Handles one drag step.
    ///
    /// `distance` is how far the pointer travelled since the previous step,
    /// measured as previous position minus current position, so the content
    /// moves by `-distance`. Drags may use the over-scroll margin. Non-finite
    /// distances are refused.
    pub fn on_drag(&mut self, distance: Vec2) -> bool {
        if !distance.is_finite() || !self.set_mode(Mode::Scrolling) {
            return false;
        }
        self.state
            .apply_delta(self.state.zoom(), -distance, true, false, &mut self.listener);
        true
    }

    /// Handles the pointer going up (or being cancelled) at the end of a drag.
    ///
    /// An over-scrolled pan animates back inside the bounds; otherwise the
    /// engine returns to [`Mode::Idle`]. Ignored unless scrolling, so a drag
    /// that turned into a fling keeps flinging.
    pub fn on_drag_end(&mut self) {
        if self.mode != Mode::Scrolling {
            return;
        }
        let fix = self.state.pan_correction(false);
        if fix != Vec2::ZERO {
            self.animate_to(self.state.zoom(), fix, true, false);
        } else {
            self.set_mode(Mode::Idle);
        }
    }

    /// Starts a fling with the given release velocity, in viewport units per second.
    ///
    /// Rejected, without any mode change, when the velocity is not finite,
    /// when the current mode forbids it, or when neither axis has room to
    /// move and over-scrolling is disabled.
    pub fn on_fling(&mut self, velocity: Vec2) -> bool {
        if !velocity.is_finite()
            || !self.state.is_initialized()
            || !self.mode.can_transition_to(Mode::Flinging)
        {
            return false;
        }
        let (x, y) = self.fling_axes();
        let has_range = x.min < x.max || y.min < y.max;
        if !has_range && !self.state.over_scrollable() {
            tracing::debug!("fling rejected: nothing to scroll");
            return false;
        }
        if !self.set_mode(Mode::Flinging) {
            return false;
        }
        let over_scroll = self.state.over_scroll();
        tracing::trace!(
            vx = velocity.x,
            vy = velocity.y,
            over_scroll,
            "fling started"
        );
        self.fling.fling(x, y, velocity, over_scroll);
        true
    }

    /// Fling bounds per axis, in real pan units.
    ///
    /// Content that fits along an axis has no range there: it may only
    /// travel within the elastic margin around its resting position.
    fn fling_axes(&self) -> (FlingAxis, FlingAxis) {
        let (range_x, range_y) = self.state.pan_ranges();
        let pan = self.state.real_pan();
        let fix = self.state.pan_correction(false);
        let axis = |range: PanRange, start: f64, fix: f64| {
            if range.has_scroll_range() {
                FlingAxis {
                    min: range.min,
                    start,
                    max: range.max,
                }
            } else {
                FlingAxis {
                    min: start + fix,
                    start,
                    max: start + fix,
                }
            }
        };
        (axis(range_x, pan.x, fix.x), axis(range_y, pan.y, fix.y))
    }
}
