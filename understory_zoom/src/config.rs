// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::time::Duration;

use crate::bounds::over_pinch_tolerance;

/// Default minimum logical zoom.
pub const DEFAULT_MIN_ZOOM: f64 = 0.8;

/// Default maximum logical zoom.
pub const DEFAULT_MAX_ZOOM: f64 = 2.5;

/// Default duration of programmatic and settle-back animations.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(200);

/// Error returned when a zoom limit would break `0 < min <= max` or `max >= 1`.
#[derive(Clone, Copy, PartialEq)]
pub enum ZoomLimitError {
    /// The minimum zoom was not strictly positive.
    NonPositiveMin {
        /// The rejected minimum.
        min: f64,
    },
    /// The maximum zoom was below `1.0`.
    MaxBelowOne {
        /// The rejected maximum.
        max: f64,
    },
    /// The minimum zoom exceeded the maximum zoom.
    MinAboveMax {
        /// The requested (or current) minimum.
        min: f64,
        /// The requested (or current) maximum.
        max: f64,
    },
}

impl fmt::Debug for ZoomLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveMin { min } => write!(f, "NonPositiveMin {{ min: {min:?} }}"),
            Self::MaxBelowOne { max } => write!(f, "MaxBelowOne {{ max: {max:?} }}"),
            Self::MinAboveMax { min, max } => {
                write!(f, "MinAboveMax {{ min: {min:?}, max: {max:?} }}")
            }
        }
    }
}

impl fmt::Display for ZoomLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveMin { min } => write!(f, "min zoom {min} must be greater than 0"),
            Self::MaxBelowOne { max } => write!(f, "max zoom {max} must be at least 1"),
            Self::MinAboveMax { min, max } => {
                write!(f, "min zoom {min} must not exceed max zoom {max}")
            }
        }
    }
}

impl core::error::Error for ZoomLimitError {}

/// Validated logical zoom limits.
///
/// Always satisfies `0 < min <= max` and `max >= 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    min: f64,
    max: f64,
}

impl ZoomLimits {
    /// Creates limits, rejecting any pair that breaks the invariants.
    pub fn new(min: f64, max: f64) -> Result<Self, ZoomLimitError> {
        if min.is_nan() || min <= 0.0 {
            return Err(ZoomLimitError::NonPositiveMin { min });
        }
        if max.is_nan() || max < 1.0 {
            return Err(ZoomLimitError::MaxBelowOne { max });
        }
        if min > max {
            return Err(ZoomLimitError::MinAboveMax { min, max });
        }
        Ok(Self { min, max })
    }

    /// Returns these limits with a new minimum.
    pub fn with_min(self, min: f64) -> Result<Self, ZoomLimitError> {
        Self::new(min, self.max)
    }

    /// Returns these limits with a new maximum.
    pub fn with_max(self, max: f64) -> Result<Self, ZoomLimitError> {
        Self::new(self.min, max)
    }

    /// Minimum logical zoom.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum logical zoom.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Elastic margin allowed past either limit while pinching.
    #[must_use]
    pub fn over_pinch(&self) -> f64 {
        over_pinch_tolerance(self.min, self.max)
    }

    /// Returns `true` if `zoom` lies inside the hard limits.
    #[must_use]
    pub fn contains(&self, zoom: f64) -> bool {
        zoom >= self.min && zoom <= self.max
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Construction-time configuration for a [`crate::ZoomEngine`].
///
/// Every field can also be changed later through the engine's setters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomConfig {
    /// Logical zoom limits.
    pub limits: ZoomLimits,
    /// Whether drags and flings may move past the pan bounds for a while.
    pub over_scrollable: bool,
    /// Whether pinches may move past the zoom limits for a while.
    pub over_pinchable: bool,
    /// Duration of programmatic and settle-back animations.
    pub animation_duration: Duration,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            limits: ZoomLimits::default(),
            over_scrollable: true,
            over_pinchable: true,
            animation_duration: DEFAULT_ANIMATION_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::{ZoomConfig, ZoomLimitError, ZoomLimits};

    #[test]
    fn defaults_match_documented_values() {
        let config = ZoomConfig::default();
        assert_eq!(config.limits.min(), 0.8);
        assert_eq!(config.limits.max(), 2.5);
        assert!(config.over_scrollable);
        assert!(config.over_pinchable);
        assert_eq!(config.animation_duration.as_millis(), 200);
    }

    #[test]
    fn invalid_limits_are_rejected() {
        assert_eq!(
            ZoomLimits::new(0.0, 2.0),
            Err(ZoomLimitError::NonPositiveMin { min: 0.0 })
        );
        assert_eq!(
            ZoomLimits::new(0.5, 0.9),
            Err(ZoomLimitError::MaxBelowOne { max: 0.9 })
        );
        assert_eq!(
            ZoomLimits::new(3.0, 2.0),
            Err(ZoomLimitError::MinAboveMax { min: 3.0, max: 2.0 })
        );
        assert!(ZoomLimits::new(f64::NAN, 2.0).is_err());
        assert!(ZoomLimits::new(0.5, f64::NAN).is_err());
    }

    #[test]
    fn with_min_and_max_keep_the_other_side() {
        let limits = ZoomLimits::default();
        let wider = limits.with_max(4.0).unwrap();
        assert_eq!(wider.min(), 0.8);
        assert_eq!(wider.max(), 4.0);

        assert!(limits.with_min(3.0).is_err());
        assert!(limits.with_max(0.5).is_err());
        // Equal limits are allowed.
        assert_eq!(limits.with_min(2.5).unwrap().min(), 2.5);
    }

    #[test]
    fn contains_is_inclusive() {
        let limits = ZoomLimits::default();
        assert!(limits.contains(0.8));
        assert!(limits.contains(2.5));
        assert!(!limits.contains(2.6));
    }

    #[test]
    fn error_messages_are_readable() {
        let err = ZoomLimitError::MinAboveMax { min: 3.0, max: 2.0 };
        assert_eq!(err.to_string(), "min zoom 3 must not exceed max zoom 2");
        let err = ZoomLimitError::MaxBelowOne { max: 0.5 };
        assert_eq!(err.to_string(), "max zoom 0.5 must be at least 1");
    }
}
