// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_zoom --heading-base-level=0

//! Understory Zoom: a headless pan/zoom engine.
//!
//! This crate computes and constrains a uniform pan + zoom transform that maps
//! a rectangular content area onto a fixed-size viewport. It focuses on:
//! - Fit-to-view ("center inside") initialization and a logical zoom relative to it.
//! - Pan and zoom clamping, with optional elastic over-scroll / over-pinch
//!   margins during live gestures.
//! - Arbitration between drag, pinch, programmatic animation and fling.
//! - Frame-driven settling back into bounds.
//!
//! It does **not** render, own input devices or schedule frames. Callers are
//! expected to:
//! - Report viewport and content sizes as their layout changes.
//! - Run their own gesture recognizers and forward pinch, drag and fling
//!   primitives to the engine.
//! - Call [`ZoomEngine::on_frame`] from their frame scheduler while it
//!   returns `true`.
//! - Consume the resulting [`kurbo::Affine`] through a [`TransformListener`]
//!   or by polling [`ZoomEngine::matrix`].
//!
//! ## Minimal example
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::{Rect, Size, Vec2};
//! use understory_zoom::{Mode, ZoomEngine};
//!
//! let mut engine = ZoomEngine::new();
//! engine.set_view_size(Size::new(1000.0, 1000.0));
//! engine.set_content_rect(Rect::new(0.0, 0.0, 2000.0, 1000.0));
//!
//! // Content is fitted inside the viewport and centered vertically.
//! assert_eq!(engine.zoom(), 1.0);
//! assert_eq!(engine.real_zoom(), 0.5);
//! assert_eq!(engine.real_pan(), Vec2::new(0.0, 250.0));
//!
//! // Animated zoom, driven by the host's frame clock.
//! engine.zoom_to(2.0, true);
//! assert_eq!(engine.mode(), Mode::Animating);
//! let mut now = Duration::ZERO;
//! while engine.on_frame(now) {
//!     now += Duration::from_millis(16);
//! }
//! assert!((engine.zoom() - 2.0).abs() < 1e-9);
//! ```
//!
//! ## Listening for updates
//!
//! Any `FnMut(Affine)` can receive committed transforms:
//!
//! ```rust
//! use kurbo::{Affine, Rect, Size};
//! use understory_zoom::{DecayFling, ZoomConfig, ZoomEngine};
//!
//! let mut updates = 0;
//! let mut engine =
//!     ZoomEngine::with_parts(ZoomConfig::default(), DecayFling::default(), |_m: Affine| {
//!         updates += 1;
//!     });
//! engine.set_view_size(Size::new(400.0, 300.0));
//! engine.set_content_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
//! engine.zoom_by(1.5, false);
//! drop(engine);
//! assert_eq!(updates, 2);
//! ```
//!
//! ## Design notes
//!
//! - Zoom is uniform; there is no rotation.
//! - All zoom APIs, including the limits, use the logical zoom, which is
//!   `1.0` right after initialization. The matrix scale is the
//!   [real zoom](ZoomEngine::real_zoom).
//! - Changing the viewport size or content rect re-initializes the transform
//!   and discards the previous pan and zoom.
//! - The fling decay model is pluggable through [`FlingSimulator`];
//!   [`DecayFling`] is the default.
//!
//! This crate is `no_std`.

#![no_std]

mod animation;
mod bounds;
mod config;
mod engine;
mod fling;
mod gesture;
mod mode;
mod transform;

pub use animation::{Animation, AnimationFrame, ease_in_out};
pub use bounds::{PanRange, clamp_zoom, over_pinch_tolerance, over_scroll_tolerance, pan_correction};
pub use config::{
    DEFAULT_ANIMATION_DURATION, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, ZoomConfig, ZoomLimitError,
    ZoomLimits,
};
pub use engine::{ZoomDebugInfo, ZoomEngine};
pub use fling::{DecayFling, FlingAxis, FlingSimulator, SPRING_BACK_DURATION};
pub use mode::Mode;
pub use transform::{TransformListener, TransformState};
