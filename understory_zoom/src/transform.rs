// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::bounds::{PanRange, clamp_zoom, over_scroll_tolerance};
use crate::config::{ZoomConfig, ZoomLimits};

/// A sink for committed transform updates.
///
/// Implemented for every `FnMut(Affine)`, so a closure can be used directly.
pub trait TransformListener {
    /// Called after every committed change of the content transform.
    ///
    /// `matrix` is a copy; the receiver may keep or modify it freely.
    fn on_transform_updated(&mut self, matrix: Affine);
}

impl<F: FnMut(Affine)> TransformListener for F {
    fn on_transform_updated(&mut self, matrix: Affine) {
        self(matrix);
    }
}

/// Pan/zoom transform mapping a content rect into a viewport.
///
/// The state stays uninitialized until both a positive viewport size and a
/// positive content rect are known. Initialization fits the content inside
/// the viewport ("center inside"); that fitting scale becomes the base zoom,
/// and all logical zoom values are relative to it.
///
/// The current content rect is always the base content rect mapped through
/// the matrix.
#[derive(Clone, Debug)]
pub struct TransformState {
    view: Size,
    content_base: Rect,
    content: Rect,
    matrix: Affine,
    zoom: f64,
    base_zoom: f64,
    limits: ZoomLimits,
    over_scrollable: bool,
    over_pinchable: bool,
    initialized: bool,
    revision: u64,
}

impl TransformState {
    /// Creates an uninitialized state using the limits and elastic flags of `config`.
    #[must_use]
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            view: Size::ZERO,
            content_base: Rect::ZERO,
            content: Rect::ZERO,
            matrix: Affine::IDENTITY,
            zoom: 1.0,
            base_zoom: 1.0,
            limits: config.limits,
            over_scrollable: config.over_scrollable,
            over_pinchable: config.over_pinchable,
            initialized: false,
            revision: 0,
        }
    }

    /// Records a new viewport size, re-initializing if it actually changed.
    ///
    /// Non-positive sizes are ignored. Returns `true` if the transform was
    /// (re-)initialized.
    pub fn set_view_size(&mut self, size: Size, listener: &mut impl TransformListener) -> bool {
        if size.width <= 0.0 || size.height <= 0.0 || size == self.view {
            return false;
        }
        self.view = size;
        self.init(listener)
    }

    /// Records a new content rect, re-initializing if it differs from the stored one.
    ///
    /// Rects with a non-positive width or height are ignored. Returns `true`
    /// if the transform was (re-)initialized.
    pub fn set_content_rect(&mut self, rect: Rect, listener: &mut impl TransformListener) -> bool {
        if rect.width() <= 0.0 || rect.height() <= 0.0 || rect == self.content_base {
            return false;
        }
        self.content_base = rect;
        self.content = rect;
        self.init(listener)
    }

    fn init(&mut self, listener: &mut impl TransformListener) -> bool {
        if self.content_base.width() <= 0.0
            || self.content_base.height() <= 0.0
            || self.view.width <= 0.0
            || self.view.height <= 0.0
        {
            return false;
        }

        // Prior pan and zoom are discarded; content starts fitted and centered.
        let scale_x = self.view.width / self.content_base.width();
        let scale_y = self.view.height / self.content_base.height();
        let scale = scale_x.min(scale_y);
        self.matrix = Affine::scale(scale);
        self.content = self.matrix.transform_rect_bbox(self.content_base);
        self.zoom = 1.0;
        self.base_zoom = scale;
        self.initialized = true;

        self.ensure_pan_bounds(false);
        tracing::debug!(
            view_width = self.view.width,
            view_height = self.view.height,
            base_zoom = scale,
            "transform initialized"
        );
        self.commit(listener);
        true
    }

    /// Applies a new logical zoom and a real-unit pan delta, then re-clamps.
    ///
    /// `new_zoom` is clamped to the zoom limits, widened by the over-pinch
    /// margin when `allow_over_pinch` is set and over-pinching is enabled.
    /// The zoom change is applied as a scale about the viewport center, then
    /// `delta` is applied as a translation. The resulting pan is always
    /// corrected on both axes; `allow_over_scroll` only decides whether the
    /// elastic margin is honored.
    ///
    /// Notifies `listener` once with the new matrix. Does nothing before
    /// initialization or when `new_zoom` or `delta` is not finite.
    pub fn apply_delta(
        &mut self,
        new_zoom: f64,
        delta: Vec2,
        allow_over_scroll: bool,
        allow_over_pinch: bool,
        listener: &mut impl TransformListener,
    ) {
        if !self.initialized || !new_zoom.is_finite() || !delta.is_finite() {
            return;
        }
        let new_zoom = self.clamp_zoom(new_zoom, allow_over_pinch);
        let factor = new_zoom / self.zoom;
        self.matrix = self
            .matrix
            .then_scale_about(factor, self.view_center())
            .then_translate(delta);
        self.zoom = new_zoom;
        self.content = self.matrix.transform_rect_bbox(self.content_base);

        self.ensure_pan_bounds(allow_over_scroll);
        self.commit(listener);
    }

    fn commit(&mut self, listener: &mut impl TransformListener) {
        self.revision = self.revision.wrapping_add(1);
        listener.on_transform_updated(self.matrix);
    }

    fn ensure_pan_bounds(&mut self, allow_over_scroll: bool) {
        let fix = self.pan_correction(allow_over_scroll);
        if fix != Vec2::ZERO {
            self.matrix = self.matrix.then_translate(fix);
            self.content = self.matrix.transform_rect_bbox(self.content_base);
        }
    }

    /// Clamps a logical zoom to the limits, optionally widened by the over-pinch margin.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64, allow_over_pinch: bool) -> f64 {
        let tolerance = if allow_over_pinch && self.over_pinchable {
            self.limits.over_pinch()
        } else {
            0.0
        };
        clamp_zoom(zoom, self.limits.min(), self.limits.max(), tolerance)
    }

    /// Delta that would bring the current real pan back inside its bounds.
    ///
    /// With `allow_over_scroll` (and over-scrolling enabled) the bounds are
    /// widened by [`TransformState::over_scroll`].
    #[must_use]
    pub fn pan_correction(&self, allow_over_scroll: bool) -> Vec2 {
        let tolerance = if allow_over_scroll {
            self.over_scroll()
        } else {
            0.0
        };
        let (range_x, range_y) = self.pan_ranges();
        let pan = self.real_pan();
        Vec2::new(
            range_x.correction(pan.x, tolerance),
            range_y.correction(pan.y, tolerance),
        )
    }

    /// Hard pan ranges for the current content size, per axis.
    #[must_use]
    pub fn pan_ranges(&self) -> (PanRange, PanRange) {
        (
            PanRange::new(self.view.width, self.content.width()),
            PanRange::new(self.view.height, self.content.height()),
        )
    }

    /// Current elastic pan margin in real units, or `0.0` when over-scrolling is off.
    #[must_use]
    pub fn over_scroll(&self) -> f64 {
        if self.over_scrollable {
            over_scroll_tolerance(self.view, self.zoom)
        } else {
            0.0
        }
    }

    /// Returns `true` once both viewport size and content rect are known.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Copy of the composed content-to-viewport transform.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    /// Logical zoom, `1.0` right after initialization.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Scale applied at initialization to fit the content inside the viewport.
    #[must_use]
    pub fn base_zoom(&self) -> f64 {
        self.base_zoom
    }

    /// Actual matrix scale: logical zoom times base zoom.
    #[must_use]
    pub fn real_zoom(&self) -> f64 {
        self.zoom * self.base_zoom
    }

    /// Offset of the content's top-left corner from the viewport origin, in viewport units.
    #[must_use]
    pub fn real_pan(&self) -> Vec2 {
        Vec2::new(self.content.x0, self.content.y0)
    }

    /// [`TransformState::real_pan`] expressed in content units.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.real_pan() / self.real_zoom()
    }

    /// Current content rect in viewport coordinates.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        self.content
    }

    /// Content rect as supplied by the caller.
    #[must_use]
    pub fn content_base_rect(&self) -> Rect {
        self.content_base
    }

    /// Viewport size, [`Size::ZERO`] until laid out.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view
    }

    /// Center of the viewport in viewport coordinates.
    #[must_use]
    pub fn view_center(&self) -> Point {
        Point::new(self.view.width / 2.0, self.view.height / 2.0)
    }

    /// Current zoom limits.
    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Replaces the zoom limits. The current zoom is left untouched.
    pub fn set_limits(&mut self, limits: ZoomLimits) {
        self.limits = limits;
    }

    /// Whether drags and flings may exceed the pan bounds transiently.
    #[must_use]
    pub fn over_scrollable(&self) -> bool {
        self.over_scrollable
    }

    /// Enables or disables the elastic pan margin.
    pub fn set_over_scrollable(&mut self, over_scrollable: bool) {
        self.over_scrollable = over_scrollable;
    }

    /// Whether pinches may exceed the zoom limits transiently.
    #[must_use]
    pub fn over_pinchable(&self) -> bool {
        self.over_pinchable
    }

    /// Enables or disables the elastic zoom margin.
    pub fn set_over_pinchable(&mut self, over_pinchable: bool) {
        self.over_pinchable = over_pinchable;
    }

    /// Number of committed transform updates so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Maps a point in content coordinates into viewport coordinates.
    #[must_use]
    pub fn content_to_view_point(&self, pt: Point) -> Point {
        self.matrix * pt
    }

    /// Maps a point in viewport coordinates back into content coordinates.
    #[must_use]
    pub fn view_to_content_point(&self, pt: Point) -> Point {
        self.matrix.inverse() * pt
    }

    /// Portion of the content space currently covered by the viewport.
    ///
    /// This may extend beyond the content rect when the content is smaller
    /// than the viewport or over-scrolled.
    #[must_use]
    pub fn visible_content_rect(&self) -> Rect {
        let view_rect = Rect::from_origin_size(Point::ORIGIN, self.view);
        self.matrix.inverse().transform_rect_bbox(view_rect)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, Point, Rect, Size, Vec2};

    use super::TransformState;
    use crate::config::ZoomConfig;

    fn state(view: Size, content: Rect) -> TransformState {
        let mut state = TransformState::new(&ZoomConfig::default());
        state.set_view_size(view, &mut |_: Affine| {});
        state.set_content_rect(content, &mut |_: Affine| {});
        state
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn uninitialized_until_both_sizes_known() {
        let mut s = TransformState::new(&ZoomConfig::default());
        assert!(!s.set_view_size(Size::new(100.0, 100.0), &mut |_: Affine| {}));
        assert!(!s.is_initialized());
        assert!(!s.set_content_rect(Rect::new(0.0, 0.0, 0.0, 10.0), &mut |_: Affine| {}));
        assert!(!s.is_initialized());
        assert!(s.set_content_rect(Rect::new(0.0, 0.0, 50.0, 50.0), &mut |_: Affine| {}));
        assert!(s.is_initialized());
    }

    #[test]
    fn init_fits_and_centers_content() {
        let s = state(Size::new(1000.0, 1000.0), Rect::new(0.0, 0.0, 2000.0, 1000.0));
        assert_eq!(s.zoom(), 1.0);
        assert_eq!(s.base_zoom(), 0.5);
        assert_eq!(s.real_zoom(), 0.5);
        assert_eq!(s.content_rect().size(), Size::new(1000.0, 500.0));
        assert_eq!(s.real_pan(), Vec2::new(0.0, 250.0));
        assert_eq!(s.pan(), Vec2::new(0.0, 500.0));
    }

    #[test]
    fn init_notifies_once_and_bumps_revision() {
        let mut s = TransformState::new(&ZoomConfig::default());
        let mut seen = 0;
        s.set_view_size(Size::new(400.0, 300.0), &mut |_: Affine| seen += 1);
        assert_eq!(seen, 0);
        s.set_content_rect(Rect::new(0.0, 0.0, 40.0, 30.0), &mut |_: Affine| seen += 1);
        assert_eq!(seen, 1);
        assert_eq!(s.revision(), 1);
        // Same rect again is not a change.
        s.set_content_rect(Rect::new(0.0, 0.0, 40.0, 30.0), &mut |_: Affine| seen += 1);
        assert_eq!(seen, 1);
    }

    #[test]
    fn apply_delta_clamps_zoom_without_over_pinch() {
        let mut s = state(Size::new(1000.0, 1000.0), Rect::new(0.0, 0.0, 2000.0, 1000.0));
        s.apply_delta(5.0, Vec2::ZERO, false, false, &mut |_: Affine| {});
        assert_eq!(s.zoom(), 2.5);
        assert_close(s.real_zoom(), 1.25);
        // Scaled about the viewport center, then still within bounds.
        assert_close(s.real_pan().x, -750.0);
        assert_close(s.real_pan().y, -125.0);
    }

    #[test]
    fn apply_delta_honors_over_pinch_margin() {
        let mut s = state(Size::new(1000.0, 1000.0), Rect::new(0.0, 0.0, 1000.0, 1000.0));
        s.apply_delta(5.0, Vec2::ZERO, false, true, &mut |_: Affine| {});
        assert_close(s.zoom(), 2.67);

        s.set_over_pinchable(false);
        s.apply_delta(5.0, Vec2::ZERO, false, true, &mut |_: Affine| {});
        assert_eq!(s.zoom(), 2.5);
    }

    #[test]
    fn pan_is_always_reclamped() {
        let mut s = state(Size::new(1000.0, 1000.0), Rect::new(0.0, 0.0, 1000.0, 500.0));
        // Tolerance at zoom 1 is 1000 / 20 = 50.
        s.apply_delta(1.0, Vec2::new(30.0, 0.0), true, false, &mut |_: Affine| {});
        assert_close(s.real_pan().x, 30.0);
        s.apply_delta(1.0, Vec2::new(500.0, 0.0), true, false, &mut |_: Affine| {});
        assert_close(s.real_pan().x, 50.0);
        s.apply_delta(1.0, Vec2::new(500.0, -900.0), false, false, &mut |_: Affine| {});
        assert_close(s.real_pan().x, 0.0);
        assert_close(s.real_pan().y, 250.0);
    }

    #[test]
    fn zero_delta_is_idempotent_once_settled() {
        let mut s = state(Size::new(800.0, 600.0), Rect::new(0.0, 0.0, 1600.0, 900.0));
        s.apply_delta(2.0, Vec2::new(-120.0, 40.0), false, false, &mut |_: Affine| {});
        let before = (s.zoom(), s.real_pan());
        s.apply_delta(s.zoom(), Vec2::ZERO, false, false, &mut |_: Affine| {});
        assert_close(s.zoom(), before.0);
        assert_close(s.real_pan().x, before.1.x);
        assert_close(s.real_pan().y, before.1.y);
    }

    #[test]
    fn matrix_is_a_copy() {
        let s = state(Size::new(100.0, 100.0), Rect::new(0.0, 0.0, 200.0, 200.0));
        let m = s.matrix() * Affine::translate((10.0, 10.0));
        assert_ne!(m, s.matrix());
        assert_eq!(s.matrix(), Affine::scale(0.5));
    }

    #[test]
    fn coordinate_conversion_roundtrip() {
        let mut s = state(Size::new(400.0, 400.0), Rect::new(0.0, 0.0, 400.0, 400.0));
        s.apply_delta(2.0, Vec2::new(-50.0, 0.0), false, false, &mut |_: Affine| {});
        let content_pt = Point::new(120.0, 80.0);
        let view_pt = s.content_to_view_point(content_pt);
        let back = s.view_to_content_point(view_pt);
        assert_close(back.x, content_pt.x);
        assert_close(back.y, content_pt.y);

        let visible = s.visible_content_rect();
        assert_close(visible.width(), 200.0);
        assert_close(visible.height(), 200.0);
    }

    #[test]
    fn apply_delta_ignores_non_finite_input() {
        let mut s = state(Size::new(1000.0, 1000.0), Rect::new(0.0, 0.0, 2000.0, 1000.0));
        let mut seen = 0;
        s.apply_delta(f64::NAN, Vec2::ZERO, true, true, &mut |_: Affine| seen += 1);
        s.apply_delta(1.0, Vec2::new(f64::INFINITY, 0.0), true, true, &mut |_: Affine| seen += 1);
        s.apply_delta(1.0, Vec2::new(0.0, f64::NAN), true, true, &mut |_: Affine| seen += 1);
        assert_eq!(seen, 0);
        assert_eq!(s.zoom(), 1.0);
        assert_eq!(s.real_pan(), Vec2::new(0.0, 250.0));
    }

    #[test]
    fn apply_delta_before_init_is_ignored() {
        let mut s = TransformState::new(&ZoomConfig::default());
        let mut seen = 0;
        s.apply_delta(2.0, Vec2::new(1.0, 1.0), false, false, &mut |_: Affine| seen += 1);
        assert_eq!(seen, 0);
        assert_eq!(s.zoom(), 1.0);
    }
}
