// src/classifier.rs - per-frame candidate intent rules
use std::fmt;

use crate::fingers::FingerState;
use crate::landmarks::{index, FrameSize, LandmarkSet};

/// The discrete command label derived from a hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    /// Initial state, and the value reported whenever no hand is in view.
    #[default]
    Listening,
    Wait,
    Stop,
    Help,
    Peace,
    RockOn,
    VolumeCtrl,
}

impl Intent {
    /// Display label, as shown on the status surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listening => "Listening...",
            Self::Wait => "WAIT",
            Self::Stop => "STOP",
            Self::Help => "HELP",
            Self::Peace => "PEACE",
            Self::RockOn => "ROCK ON",
            Self::VolumeCtrl => "VOLUME CTRL",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a finger state (plus raw geometry where a rule needs it) to this
/// frame's candidate intent.
///
/// Pure function of the current frame: no memory, same inputs always yield
/// the same label. Rules are evaluated in fixed priority order and the pinch
/// rule is checked last, overriding any earlier match. `help_wrist_ratio` is
/// the fraction of frame height the wrist must sit above for an open palm to
/// read as HELP (a raised hand) rather than STOP.
pub fn classify(
    fingers: &FingerState,
    hand: &LandmarkSet,
    frame: FrameSize,
    help_wrist_ratio: f64,
) -> Intent {
    let total = fingers.extended_count();

    let mut intent = if total == 0 {
        Intent::Wait
    } else if total == 5 {
        let wrist_y = hand.point(index::WRIST).y;
        if wrist_y < frame.height as f64 * help_wrist_ratio {
            Intent::Help
        } else {
            Intent::Stop
        }
    } else if total == 2 && fingers.index && fingers.middle {
        Intent::Peace
    } else if fingers.index && fingers.pinky && !fingers.middle && !fingers.ring {
        Intent::RockOn
    } else {
        Intent::Listening
    };

    // Pinch rule wins on overlap: thumb + index up, middle down.
    if fingers.thumb && fingers.index && !fingers.middle {
        intent = Intent::VolumeCtrl;
    }

    intent
}
