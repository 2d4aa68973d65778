// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds correction for pan and zoom values.
//!
//! Everything here is a pure function of its inputs. Sizes are expected to be
//! positive; callers filter degenerate layouts before reaching this module.

use kurbo::Size;

/// Divisor applied to the smaller viewport side to derive the over-scroll margin.
const OVER_SCROLL_DIVISOR: f64 = 20.0;

/// Fraction of the zoom range allowed as over-pinch margin.
const OVER_PINCH_FRACTION: f64 = 0.1;

/// Hard range allowed for a real pan value along one axis.
///
/// Pans are the offset of the content's leading edge from the viewport
/// origin, so when the content is larger than the viewport both bounds are
/// non-positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanRange {
    /// Smallest allowed pan (content's trailing edge at the viewport's trailing edge).
    pub min: f64,
    /// Largest allowed pan (content's leading edge at the viewport origin).
    pub max: f64,
}

impl PanRange {
    /// Computes the allowed pan range for content of `content_size` shown in
    /// a viewport of `view_size`.
    ///
    /// Content that fits is pinned to the centered position; larger content
    /// may move but never reveal space beyond its edges.
    #[must_use]
    pub fn new(view_size: f64, content_size: f64) -> Self {
        if content_size <= view_size {
            let centered = (view_size - content_size) / 2.0;
            Self {
                min: centered,
                max: centered,
            }
        } else {
            Self {
                min: view_size - content_size,
                max: 0.0,
            }
        }
    }

    /// Returns `true` if the content can move along this axis.
    #[must_use]
    pub fn has_scroll_range(&self) -> bool {
        self.min < self.max
    }

    /// Minimal delta that moves `value` into the range widened by `tolerance`.
    #[must_use]
    pub fn correction(&self, value: f64, tolerance: f64) -> f64 {
        let desired = value.clamp(self.min - tolerance, self.max + tolerance);
        desired - value
    }
}

/// Minimal delta that brings a pan `value` back inside its allowed range.
///
/// `tolerance` widens both ends of the range; pass `0.0` for hard bounds.
#[must_use]
pub fn pan_correction(value: f64, view_size: f64, content_size: f64, tolerance: f64) -> f64 {
    PanRange::new(view_size, content_size).correction(value, tolerance)
}

/// Smallest fraction of `min` the widened lower zoom bound may reach.
const MIN_ZOOM_FLOOR: f64 = 0.5;

/// Clamps a logical zoom into `[min, max]` widened by `tolerance`.
///
/// The widened lower bound never drops below half of `min`, so the result
/// stays positive for any positive `min`.
#[must_use]
pub fn clamp_zoom(value: f64, min: f64, max: f64, tolerance: f64) -> f64 {
    let lower = (min - tolerance).max(min * MIN_ZOOM_FLOOR);
    value.clamp(lower, max + tolerance)
}

/// Elastic pan margin for the given viewport at the given logical zoom.
///
/// The margin scales with zoom, so it stays visually proportional to the content.
#[must_use]
pub fn over_scroll_tolerance(view: Size, zoom: f64) -> f64 {
    view.width.min(view.height) / OVER_SCROLL_DIVISOR * zoom
}

/// Elastic zoom margin for the given zoom limits.
#[must_use]
pub fn over_pinch_tolerance(min_zoom: f64, max_zoom: f64) -> f64 {
    OVER_PINCH_FRACTION * (max_zoom - min_zoom)
}
