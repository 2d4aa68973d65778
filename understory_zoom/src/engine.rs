// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::time::Duration;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::animation::Animation;
use crate::config::{ZoomConfig, ZoomLimitError};
use crate::fling::{DecayFling, FlingSimulator};
use crate::mode::Mode;
use crate::transform::{TransformListener, TransformState};

/// Pan/zoom engine for a content rect shown in a fixed-size viewport.
///
/// The engine owns the transform, the current [`Mode`], the running
/// animation (if any) and the fling simulator. It is driven entirely by its
/// caller:
/// - layout changes via [`ZoomEngine::set_view_size`] and
///   [`ZoomEngine::set_content_rect`],
/// - recognized gestures via the `on_pinch`/`on_drag`/`on_fling` family,
/// - frame callbacks via [`ZoomEngine::on_frame`],
/// - programmatic requests via [`ZoomEngine::zoom_to`],
///   [`ZoomEngine::pan_to`] and friends.
///
/// Every committed change of the transform is reported to the listener `L`.
pub struct ZoomEngine<S = DecayFling, L = fn(Affine)> {
    pub(crate) state: TransformState,
    pub(crate) mode: Mode,
    pub(crate) animation: Option<Animation>,
    pub(crate) animation_duration: Duration,
    pub(crate) fling: S,
    pub(crate) listener: L,
}

impl ZoomEngine {
    /// Creates an engine with default configuration, the default fling
    /// simulator and no listener.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ZoomConfig::default())
    }

    /// Creates an engine with the given configuration, the default fling
    /// simulator and no listener.
    #[must_use]
    pub fn with_config(config: ZoomConfig) -> Self {
        Self::with_parts(config, DecayFling::default(), |_| {})
    }
}

impl Default for ZoomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FlingSimulator, L: TransformListener> ZoomEngine<S, L> {
    /// Creates an engine from a configuration, a fling simulator and a listener.
    pub fn with_parts(config: ZoomConfig, fling: S, listener: L) -> Self {
        Self {
            state: TransformState::new(&config),
            mode: Mode::Idle,
            animation: None,
            animation_duration: config.animation_duration,
            fling,
            listener,
        }
    }

    /// Replaces the listener, keeping all state.
    pub fn with_listener<L2: TransformListener>(self, listener: L2) -> ZoomEngine<S, L2> {
        ZoomEngine {
            state: self.state,
            mode: self.mode,
            animation: self.animation,
            animation_duration: self.animation_duration,
            fling: self.fling,
            listener,
        }
    }

    /// Notifies the engine of the viewport size.
    ///
    /// A real size change re-initializes the transform: content is fitted
    /// and centered again, zoom resets to `1.0`, and any running gesture,
    /// animation or fling is dropped. Non-positive sizes are ignored.
    pub fn set_view_size(&mut self, size: Size) {
        if self.state.set_view_size(size, &mut self.listener) {
            self.reset_mode();
        }
    }

    /// Notifies the engine of the content rect, in content units.
    ///
    /// Re-initializes like [`ZoomEngine::set_view_size`] when the rect differs
    /// from the stored one. Empty rects are ignored.
    pub fn set_content_rect(&mut self, rect: Rect) {
        if self.state.set_content_rect(rect, &mut self.listener) {
            self.reset_mode();
        }
    }

    /// Requests a mode transition.
    ///
    /// Returns `false`, leaving the mode unchanged, before initialization or
    /// when [`Mode::can_transition_to`] forbids it. Leaving
    /// [`Mode::Flinging`] aborts the fling; leaving [`Mode::Animating`]
    /// drops the animation.
    pub(crate) fn set_mode(&mut self, target: Mode) -> bool {
        if !self.state.is_initialized() {
            return false;
        }
        if target == self.mode {
            return true;
        }
        if !self.mode.can_transition_to(target) {
            tracing::debug!(from = ?self.mode, to = ?target, "mode transition rejected");
            return false;
        }
        self.leave_mode();
        tracing::trace!(from = ?self.mode, to = ?target, "mode transition");
        self.mode = target;
        true
    }

    fn leave_mode(&mut self) {
        match self.mode {
            Mode::Flinging => self.fling.abort(),
            Mode::Animating => self.animation = None,
            _ => {}
        }
    }

    fn reset_mode(&mut self) {
        self.leave_mode();
        self.mode = Mode::Idle;
    }

    /// Ends any gesture, animation or fling and returns to [`Mode::Idle`].
    ///
    /// Any elastic excursion is snapped back to the hard pan and zoom bounds
    /// without animating.
    pub fn stop(&mut self) {
        if !self.set_mode(Mode::Idle) {
            return;
        }
        let zoom = self.state.zoom();
        if self.state.pan_correction(false) != Vec2::ZERO || !self.state.limits().contains(zoom) {
            self.state
                .apply_delta(zoom, Vec2::ZERO, false, false, &mut self.listener);
        }
    }

    /// Advances the active animation or fling by one frame.
    ///
    /// `now` is a monotonic timestamp from any fixed epoch. Returns `true` if
    /// the caller should schedule another frame.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        match self.mode {
            Mode::Animating => self.step_animation(now),
            Mode::Flinging => self.step_fling(now),
            _ => false,
        }
    }

    fn step_animation(&mut self, now: Duration) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            self.set_mode(Mode::Idle);
            return false;
        };
        let frame = animation.sample(now);
        let allow_over_scroll = animation.allow_over_scroll();
        let allow_over_pinch = animation.allow_over_pinch();

        // Relative to where the transform is now, not where it started.
        let delta = frame.pan - self.state.real_pan();
        self.state.apply_delta(
            frame.zoom,
            delta,
            allow_over_scroll,
            allow_over_pinch,
            &mut self.listener,
        );
        if frame.finished {
            self.set_mode(Mode::Idle);
            return false;
        }
        true
    }

    fn step_fling(&mut self, now: Duration) -> bool {
        if self.fling.is_finished() || !self.fling.compute(now) {
            self.set_mode(Mode::Idle);
            return false;
        }
        // The simulator may report positions inside the elastic margin while
        // it settles; allow them.
        let delta = self.fling.position() - self.state.real_pan();
        self.state
            .apply_delta(self.state.zoom(), delta, true, false, &mut self.listener);
        true
    }

    /// Starts an animation to `zoom` and a real pan offset of `delta` from
    /// the current pan.
    pub(crate) fn animate_to(
        &mut self,
        zoom: f64,
        delta: Vec2,
        allow_over_scroll: bool,
        allow_over_pinch: bool,
    ) -> bool {
        let zoom = self.state.clamp_zoom(zoom, allow_over_pinch);
        if !self.set_mode(Mode::Animating) {
            return false;
        }
        tracing::trace!(
            from_zoom = self.state.zoom(),
            to_zoom = zoom,
            dx = delta.x,
            dy = delta.y,
            "animation started"
        );
        // Replaces any animation already in flight.
        self.animation = Some(
            Animation::new(
                self.state.zoom(),
                zoom,
                self.state.real_pan(),
                delta,
                self.animation_duration,
            )
            .with_elastic(allow_over_scroll, allow_over_pinch),
        );
        true
    }

    fn move_to(&mut self, zoom: f64, delta: Vec2, animate: bool) {
        if !self.state.is_initialized() || !zoom.is_finite() || !delta.is_finite() {
            return;
        }
        if animate {
            self.animate_to(zoom, delta, false, false);
        } else {
            self.state
                .apply_delta(zoom, delta, false, false, &mut self.listener);
        }
    }

    /// Pans so that the content's top-left corner sits at `pan`, in content units.
    pub fn pan_to(&mut self, pan: Vec2, animate: bool) {
        self.pan_by(pan - self.state.pan(), animate);
    }

    /// Pans by `delta` in content units.
    ///
    /// The real movement is `delta` times the real zoom, so the same delta
    /// moves further when zoomed in.
    pub fn pan_by(&mut self, delta: Vec2, animate: bool) {
        let real = delta * self.state.real_zoom();
        self.move_to(self.state.zoom(), real, animate);
    }

    /// Zooms to a logical zoom, clamped to the zoom limits.
    pub fn zoom_to(&mut self, zoom: f64, animate: bool) {
        self.move_to(zoom, Vec2::ZERO, animate);
    }

    /// Multiplies the logical zoom by `factor`.
    pub fn zoom_by(&mut self, factor: f64, animate: bool) {
        self.zoom_to(self.state.zoom() * factor, animate);
    }

    /// Sets the minimum logical zoom.
    ///
    /// Fails, leaving everything untouched, if `min` is not positive or
    /// exceeds the maximum. If the current zoom falls below the new minimum,
    /// an animation to it is started.
    pub fn set_min_zoom(&mut self, min: f64) -> Result<(), ZoomLimitError> {
        let limits = self.state.limits().with_min(min).inspect_err(|err| {
            tracing::debug!(%err, "min zoom rejected");
        })?;
        self.state.set_limits(limits);
        if self.state.zoom() < min {
            self.zoom_to(min, true);
        }
        Ok(())
    }

    /// Sets the maximum logical zoom.
    ///
    /// Fails, leaving everything untouched, if `max` is below `1.0` or below
    /// the minimum. If the current zoom exceeds the new maximum, an animation
    /// to it is started.
    pub fn set_max_zoom(&mut self, max: f64) -> Result<(), ZoomLimitError> {
        let limits = self.state.limits().with_max(max).inspect_err(|err| {
            tracing::debug!(%err, "max zoom rejected");
        })?;
        self.state.set_limits(limits);
        if self.state.zoom() > max {
            self.zoom_to(max, true);
        }
        Ok(())
    }

    /// Enables or disables transient pan excursions during drags and flings.
    pub fn set_over_scrollable(&mut self, over_scrollable: bool) {
        self.state.set_over_scrollable(over_scrollable);
    }

    /// Enables or disables transient zoom excursions during pinches.
    pub fn set_over_pinchable(&mut self, over_pinchable: bool) {
        self.state.set_over_pinchable(over_pinchable);
    }

    /// Sets the duration of subsequently started animations.
    pub fn set_animation_duration(&mut self, duration: Duration) {
        self.animation_duration = duration;
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` once both viewport size and content rect are known.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Copy of the composed content-to-viewport transform.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        self.state.matrix()
    }

    /// Logical zoom; `1.0` means "content fitted inside the viewport".
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.state.zoom()
    }

    /// Matrix scale, including the base fit-to-view zoom.
    #[must_use]
    pub fn real_zoom(&self) -> f64 {
        self.state.real_zoom()
    }

    /// Base fit-to-view zoom chosen at initialization.
    #[must_use]
    pub fn base_zoom(&self) -> f64 {
        self.state.base_zoom()
    }

    /// Pan in content units.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.state.pan()
    }

    /// Horizontal pan in content units.
    #[must_use]
    pub fn pan_x(&self) -> f64 {
        self.state.pan().x
    }

    /// Vertical pan in content units.
    #[must_use]
    pub fn pan_y(&self) -> f64 {
        self.state.pan().y
    }

    /// Pan in viewport units.
    #[must_use]
    pub fn real_pan(&self) -> Vec2 {
        self.state.real_pan()
    }

    /// Minimum logical zoom.
    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        self.state.limits().min()
    }

    /// Maximum logical zoom.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.state.limits().max()
    }

    /// Whether transient pan excursions are enabled.
    #[must_use]
    pub fn over_scrollable(&self) -> bool {
        self.state.over_scrollable()
    }

    /// Whether transient zoom excursions are enabled.
    #[must_use]
    pub fn over_pinchable(&self) -> bool {
        self.state.over_pinchable()
    }

    /// Current content rect in viewport coordinates.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        self.state.content_rect()
    }

    /// Content rect as last supplied.
    #[must_use]
    pub fn content_base_rect(&self) -> Rect {
        self.state.content_base_rect()
    }

    /// Viewport size as last supplied.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.state.view_size()
    }

    /// Number of committed transform updates so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.state.revision()
    }

    /// Maps a content-space point into the viewport.
    #[must_use]
    pub fn content_to_view_point(&self, pt: Point) -> Point {
        self.state.content_to_view_point(pt)
    }

    /// Maps a viewport point into content space.
    #[must_use]
    pub fn view_to_content_point(&self, pt: Point) -> Point {
        self.state.view_to_content_point(pt)
    }

    /// Content-space rectangle currently covered by the viewport.
    #[must_use]
    pub fn visible_content_rect(&self) -> Rect {
        self.state.visible_content_rect()
    }

    /// The fling simulator.
    #[must_use]
    pub fn fling_simulator(&self) -> &S {
        &self.fling
    }

    /// The transform listener.
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the transform listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Snapshot of the current engine state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ZoomDebugInfo {
        ZoomDebugInfo {
            view_size: self.state.view_size(),
            content_base_rect: self.state.content_base_rect(),
            content_rect: self.state.content_rect(),
            mode: self.mode,
            initialized: self.state.is_initialized(),
            zoom: self.state.zoom(),
            base_zoom: self.state.base_zoom(),
            real_pan: self.state.real_pan(),
            min_zoom: self.state.limits().min(),
            max_zoom: self.state.limits().max(),
            over_scrollable: self.state.over_scrollable(),
            over_pinchable: self.state.over_pinchable(),
            revision: self.state.revision(),
        }
    }
}

impl<S: fmt::Debug, L> fmt::Debug for ZoomEngine<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomEngine")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("animation", &self.animation)
            .field("animation_duration", &self.animation_duration)
            .field("fling", &self.fling)
            .finish_non_exhaustive()
    }
}

/// Debug snapshot of a [`ZoomEngine`] state.
#[derive(Clone, Copy, Debug)]
pub struct ZoomDebugInfo {
    /// Viewport size.
    pub view_size: Size,
    /// Content rect as supplied, in content units.
    pub content_base_rect: Rect,
    /// Content rect mapped into the viewport.
    pub content_rect: Rect,
    /// Current mode.
    pub mode: Mode,
    /// Whether the transform has been initialized.
    pub initialized: bool,
    /// Logical zoom.
    pub zoom: f64,
    /// Base fit-to-view zoom.
    pub base_zoom: f64,
    /// Pan in viewport units.
    pub real_pan: Vec2,
    /// Minimum logical zoom.
    pub min_zoom: f64,
    /// Maximum logical zoom.
    pub max_zoom: f64,
    /// Whether transient pan excursions are enabled.
    pub over_scrollable: bool,
    /// Whether transient zoom excursions are enabled.
    pub over_pinchable: bool,
    /// Number of committed transform updates.
    pub revision: u64,
}
