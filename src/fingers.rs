// src/fingers.rs - digital finger state extraction
use std::fmt;

use crate::landmarks::{index, LandmarkSet, FINGER_PIPS, FINGER_TIPS};

/// Extended/flexed state of the five digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    pub fn extended_count(&self) -> usize {
        self.as_array().iter().filter(|f| **f).count()
    }

    /// [thumb, index, middle, ring, pinky]
    pub fn as_array(&self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
    }
}

impl fmt::Display for FingerState {
    // Renders as a 5-bit pattern, thumb first: open palm = "11111".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for extended in self.as_array() {
            write!(f, "{}", if extended { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Axis convention for deciding whether a digit is extended.
///
/// The comparisons depend on how the camera frames the hand, so they live
/// behind this trait rather than hard-coded in the extractor; a rotated or
/// unmirrored setup supplies its own policy.
pub trait OrientationPolicy: Send {
    fn thumb_extended(&self, hand: &LandmarkSet) -> bool;
    fn finger_extended(&self, hand: &LandmarkSet, tip: usize, pip: usize) -> bool;
}

/// Policy for a horizontally mirrored feed and an upright hand.
///
/// Thumb: tip strictly left of the IP joint. Fingers: tip strictly above the
/// PIP joint (smaller y = higher in the image). Known limitation: this is a
/// camera-orientation heuristic, not an anatomically general test.
pub struct MirroredUpright;

impl OrientationPolicy for MirroredUpright {
    fn thumb_extended(&self, hand: &LandmarkSet) -> bool {
        hand.point(index::THUMB_TIP).x < hand.point(index::THUMB_IP).x
    }

    fn finger_extended(&self, hand: &LandmarkSet, tip: usize, pip: usize) -> bool {
        hand.point(tip).y < hand.point(pip).y
    }
}

/// Converts a landmark set into a [`FingerState`].
///
/// Total over valid 21-point sets; the caller never invokes it on an absent
/// hand (a no-hand frame degenerates to LISTENING upstream).
pub struct FingerStateExtractor {
    policy: Box<dyn OrientationPolicy>,
}

impl FingerStateExtractor {
    pub fn new() -> Self {
        Self::with_policy(Box::new(MirroredUpright))
    }

    pub fn with_policy(policy: Box<dyn OrientationPolicy>) -> Self {
        Self { policy }
    }

    pub fn extract(&self, hand: &LandmarkSet) -> FingerState {
        let mut fingers = [false; 4];
        for (i, (tip, pip)) in FINGER_TIPS.iter().zip(FINGER_PIPS.iter()).enumerate() {
            fingers[i] = self.policy.finger_extended(hand, *tip, *pip);
        }
        FingerState {
            thumb: self.policy.thumb_extended(hand),
            index: fingers[0],
            middle: fingers[1],
            ring: fingers[2],
            pinky: fingers[3],
        }
    }
}

impl Default for FingerStateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::poses;
    use crate::landmarks::FrameSize;

    #[test]
    fn open_palm_extends_all_five() {
        let hand = poses::open_palm(FrameSize::VGA);
        let state = FingerStateExtractor::new().extract(&hand);
        assert_eq!(state.as_array(), [true; 5]);
        assert_eq!(state.extended_count(), 5);
    }

    #[test]
    fn fist_extends_none() {
        let hand = poses::fist(FrameSize::VGA);
        let state = FingerStateExtractor::new().extract(&hand);
        assert_eq!(state.extended_count(), 0);
    }

    #[test]
    fn peace_extends_index_and_middle_only() {
        let hand = poses::peace(FrameSize::VGA);
        let state = FingerStateExtractor::new().extract(&hand);
        assert!(state.index && state.middle);
        assert!(!state.thumb && !state.ring && !state.pinky);
    }

    #[test]
    fn extraction_is_deterministic() {
        let hand = poses::horns(FrameSize::VGA);
        let extractor = FingerStateExtractor::new();
        assert_eq!(extractor.extract(&hand), extractor.extract(&hand));
    }

    #[test]
    fn display_renders_bit_pattern() {
        let state = FingerState {
            thumb: true,
            index: false,
            middle: true,
            ring: true,
            pinky: false,
        };
        assert_eq!(state.to_string(), "10110");
    }

    /// A policy with flipped axes must flip the verdicts; the extractor
    /// itself carries no orientation assumptions.
    struct Inverted;

    impl OrientationPolicy for Inverted {
        fn thumb_extended(&self, hand: &LandmarkSet) -> bool {
            hand.point(index::THUMB_TIP).x > hand.point(index::THUMB_IP).x
        }
        fn finger_extended(&self, hand: &LandmarkSet, tip: usize, pip: usize) -> bool {
            hand.point(tip).y > hand.point(pip).y
        }
    }

    #[test]
    fn alternate_policy_changes_the_reading() {
        let hand = poses::open_palm(FrameSize::VGA);
        let state = FingerStateExtractor::with_policy(Box::new(Inverted)).extract(&hand);
        assert_eq!(state.extended_count(), 0);
    }
}
