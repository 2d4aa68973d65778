// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mode arbitration between gestures and frame-driven motion.

/// What currently owns the transform.
///
/// Exactly one mode is active at a time. Transitions are arbitrated by
/// [`Mode::can_transition_to`]; the engine adds the remaining rules (nothing
/// starts before initialization, and leaving [`Mode::Flinging`] aborts the
/// fling).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Nothing is moving the content.
    #[default]
    Idle,
    /// A drag gesture is panning the content.
    Scrolling,
    /// A pinch gesture is zooming the content.
    Pinching,
    /// An eased transition is running.
    Animating,
    /// A fling decay is running.
    Flinging,
}

impl Mode {
    /// Returns `true` if the machine may move from `self` to `target`.
    ///
    /// Staying in the same mode is always allowed. A drag cannot take over a
    /// pinch or an animation, and nothing but `Idle` (or a new animation)
    /// can take over an animation.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (from, to) if from == to => true,
            (Self::Pinching | Self::Animating, Self::Scrolling) => false,
            (Self::Animating, Self::Flinging | Self::Pinching) => false,
            _ => true,
        }
    }

    /// Returns `true` for modes driven by frame ticks rather than gestures.
    #[must_use]
    pub fn is_driven(self) -> bool {
        matches!(self, Self::Animating | Self::Flinging)
    }
}

#[cfg(test)]
mod tests {
    use super::Mode;

    const ALL: [Mode; 5] = [
        Mode::Idle,
        Mode::Scrolling,
        Mode::Pinching,
        Mode::Animating,
        Mode::Flinging,
    ];

    #[test]
    fn same_mode_is_always_allowed() {
        for mode in ALL {
            assert!(mode.can_transition_to(mode));
        }
    }

    #[test]
    fn idle_is_reachable_from_everywhere() {
        for mode in ALL {
            assert!(mode.can_transition_to(Mode::Idle));
        }
    }

    #[test]
    fn scrolling_cannot_interrupt_pinch_or_animation() {
        assert!(!Mode::Pinching.can_transition_to(Mode::Scrolling));
        assert!(!Mode::Animating.can_transition_to(Mode::Scrolling));
        assert!(Mode::Idle.can_transition_to(Mode::Scrolling));
        assert!(Mode::Flinging.can_transition_to(Mode::Scrolling));
    }

    #[test]
    fn animation_blocks_fling_and_pinch() {
        assert!(!Mode::Animating.can_transition_to(Mode::Flinging));
        assert!(!Mode::Animating.can_transition_to(Mode::Pinching));
        assert!(Mode::Scrolling.can_transition_to(Mode::Flinging));
        assert!(Mode::Scrolling.can_transition_to(Mode::Pinching));
    }

    #[test]
    fn anything_can_start_an_animation() {
        for mode in ALL {
            assert!(mode.can_transition_to(Mode::Animating));
        }
    }

    #[test]
    fn driven_modes() {
        let driven: usize = ALL.iter().filter(|m| m.is_driven()).count();
        assert_eq!(driven, 2);
        assert_eq!(Mode::default(), Mode::Idle);
    }
}
