// src/engine.rs - per-frame classification + stabilization pipeline
use nalgebra::Point2;
use serde::Serialize;
use tracing::debug;

use crate::audio::AudioEndpoint;
use crate::classifier::{classify, Intent};
use crate::control::{VolumeControl, VolumeDisplay, PINCH_DOMAIN};
use crate::fingers::{FingerState, FingerStateExtractor};
use crate::landmarks::{FrameSize, LandmarkSet};
use crate::stabilizer::{IntentStabilizer, IntentTransition, DEFAULT_WINDOW};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Consecutive identical candidates required to commit an intent change.
    pub stabilizer_window: usize,
    /// Fraction of frame height the wrist must be above for HELP.
    pub help_wrist_ratio: f64,
    /// Pinch pixel span mapped onto the endpoint's volume range.
    pub pinch_domain: [f64; 2],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stabilizer_window: DEFAULT_WINDOW,
            help_wrist_ratio: 0.25,
            pinch_domain: PINCH_DOMAIN,
        }
    }
}

/// Thumb-tip/index-tip segment, used by the overlay's pinch guides.
#[derive(Debug, Clone, Copy)]
pub struct PinchGeometry {
    pub thumb: Point2<f64>,
    pub index: Point2<f64>,
    pub distance: f64,
}

impl PinchGeometry {
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.thumb, &self.index)
    }
}

/// Everything the engine derives from one frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Intent reported for this frame: the stable value while a hand is
    /// tracked, LISTENING when none is.
    pub intent: Intent,
    /// Raw pre-stabilization candidate; `None` on no-hand frames.
    pub candidate: Option<Intent>,
    pub fingers: Option<FingerState>,
    pub volume: VolumeDisplay,
    pub pinch: Option<PinchGeometry>,
    /// Present only on the frame where the stable intent actually changed.
    pub transition: Option<IntentTransition>,
}

/// Side-effect-free read surface, serializable for a status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub intent: String,
    pub volume_percent: Option<i32>,
}

/// One engine instance per camera session.
///
/// Owns all cross-frame mutable state: the intent history buffer, the
/// stable intent, and the last volume reading. Processing is synchronous
/// and pull-based — one call per frame, no internal locking, single
/// consumer. Collaborator failures are degraded into valid outputs here;
/// nothing this type does can take down the host.
pub struct GestureEngine {
    config: EngineConfig,
    extractor: FingerStateExtractor,
    stabilizer: IntentStabilizer,
    volume: VolumeControl,
    current_intent: Intent,
    last_volume: VolumeDisplay,
}

impl GestureEngine {
    pub fn new(audio: Option<Box<dyn AudioEndpoint>>) -> Self {
        Self::with_config(EngineConfig::default(), audio)
    }

    pub fn with_config(config: EngineConfig, audio: Option<Box<dyn AudioEndpoint>>) -> Self {
        let volume = VolumeControl::with_pinch_domain(audio, config.pinch_domain);
        Self {
            extractor: FingerStateExtractor::new(),
            stabilizer: IntentStabilizer::with_window(config.stabilizer_window),
            volume,
            current_intent: Intent::Listening,
            last_volume: VolumeDisplay::Unavailable,
            config,
        }
    }

    /// Process one frame's detection result.
    pub fn process(&mut self, hand: Option<&LandmarkSet>, frame: FrameSize) -> FrameOutput {
        let Some(hand) = hand else {
            // No hand is a valid input state, not an error: report LISTENING
            // immediately and leave the history buffer untouched, so a brief
            // dropout does not cost a committed gesture its run-up.
            self.current_intent = Intent::Listening;
            self.last_volume = self.volume.read_display();
            return FrameOutput {
                intent: Intent::Listening,
                candidate: None,
                fingers: None,
                volume: self.last_volume,
                pinch: None,
                transition: None,
            };
        };

        let fingers = self.extractor.extract(hand);
        let candidate = classify(&fingers, hand, frame, self.config.help_wrist_ratio);

        // Control is driven by the raw candidate, not the stable value, so
        // the volume tracks the pinch without the stabilizer's latency.
        let (volume, pinch) = if candidate == Intent::VolumeCtrl {
            let (thumb, index) = hand.pinch_endpoints();
            let distance = hand.pinch_distance();
            let display = self.volume.apply_pinch(distance);
            (
                display,
                Some(PinchGeometry {
                    thumb,
                    index,
                    distance,
                }),
            )
        } else {
            (self.volume.read_display(), None)
        };

        let transition = self.stabilizer.observe(candidate);
        self.current_intent = self.stabilizer.stable();
        self.last_volume = volume;

        debug!(
            "frame: fingers={} candidate={} stable={}",
            fingers, candidate, self.current_intent
        );

        FrameOutput {
            intent: self.current_intent,
            candidate: Some(candidate),
            fingers: Some(fingers),
            volume,
            pinch,
            transition,
        }
    }

    /// Intent reported for the most recent frame (LISTENING when no hand).
    pub fn current_intent(&self) -> Intent {
        self.current_intent
    }

    /// The stabilizer-owned value, which survives no-hand frames untouched.
    pub fn stable_intent(&self) -> Intent {
        self.stabilizer.stable()
    }

    /// Raw candidates currently buffered by the stabilizer.
    pub fn history_len(&self) -> usize {
        self.stabilizer.buffer_len()
    }

    /// Snapshot for the status surface; a plain read with no side effects.
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            intent: self.current_intent.as_str().to_string(),
            volume_percent: self.last_volume.percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SimAudioEndpoint;
    use crate::detector::poses;

    const VGA: FrameSize = FrameSize::VGA;

    fn engine() -> GestureEngine {
        GestureEngine::new(Some(Box::new(SimAudioEndpoint::new())))
    }

    #[test]
    fn starts_listening() {
        let engine = engine();
        assert_eq!(engine.current_intent(), Intent::Listening);
        assert_eq!(engine.stable_intent(), Intent::Listening);
    }

    #[test]
    fn no_hand_frames_leave_history_and_stable_untouched() {
        let mut engine = engine();
        let palm = poses::open_palm(VGA);
        for _ in 0..3 {
            engine.process(Some(&palm), VGA);
        }
        assert_eq!(engine.stable_intent(), Intent::Stop);
        let history_before = engine.history_len();

        for _ in 0..5 {
            let out = engine.process(None, VGA);
            assert_eq!(out.intent, Intent::Listening);
            assert!(out.candidate.is_none());
            assert!(out.transition.is_none());
        }
        assert_eq!(engine.history_len(), history_before);
        assert_eq!(engine.stable_intent(), Intent::Stop);
        assert_eq!(engine.current_intent(), Intent::Listening);
    }

    #[test]
    fn raised_palm_commits_help_on_the_third_frame() {
        let mut engine = engine();
        let raised = poses::raised_palm(VGA);
        assert_eq!(engine.process(Some(&raised), VGA).intent, Intent::Listening);
        assert_eq!(engine.process(Some(&raised), VGA).intent, Intent::Listening);
        let third = engine.process(Some(&raised), VGA);
        assert_eq!(third.intent, Intent::Help);
        let transition = third.transition.expect("third frame commits");
        assert_eq!(transition.from, Intent::Listening);
        assert_eq!(transition.to, Intent::Help);
    }

    #[test]
    fn two_of_three_agreement_does_not_commit() {
        let mut engine = engine();
        let palm = poses::open_palm(VGA);
        let peace = poses::peace(VGA);
        engine.process(Some(&palm), VGA);
        engine.process(Some(&palm), VGA);
        let out = engine.process(Some(&peace), VGA);
        assert!(out.transition.is_none());
        assert_eq!(out.intent, Intent::Listening);
    }

    #[test]
    fn pinch_drives_the_volume_from_the_raw_candidate() {
        let mut engine = engine();
        // First pinch frame: not yet stable, but the control already moves.
        let out = engine.process(Some(&poses::pinch(VGA, 250.0)), VGA);
        assert_eq!(out.candidate, Some(Intent::VolumeCtrl));
        assert_eq!(out.volume, VolumeDisplay::Level { percent: 100, bar_y: 150 });
        assert!(out.pinch.is_some());

        let out = engine.process(Some(&poses::pinch(VGA, 50.0)), VGA);
        assert_eq!(out.volume, VolumeDisplay::Level { percent: 0, bar_y: 400 });
    }

    #[test]
    fn volume_stays_unavailable_without_an_endpoint() {
        let mut engine = GestureEngine::new(None);
        for _ in 0..4 {
            let out = engine.process(Some(&poses::pinch(VGA, 150.0)), VGA);
            assert_eq!(out.volume, VolumeDisplay::Unavailable);
        }
        assert_eq!(engine.status().volume_percent, None);
    }

    #[test]
    fn non_pinch_frames_still_read_the_current_level() {
        let mut engine = engine();
        engine.process(Some(&poses::pinch(VGA, 250.0)), VGA);
        // The bar persists at the level the pinch left behind.
        let out = engine.process(Some(&poses::fist(VGA)), VGA);
        assert_eq!(out.volume, VolumeDisplay::Level { percent: 100, bar_y: 150 });
    }

    #[test]
    fn status_reports_the_per_frame_value() {
        let mut engine = engine();
        let palm = poses::open_palm(VGA);
        for _ in 0..3 {
            engine.process(Some(&palm), VGA);
        }
        assert_eq!(engine.status().intent, "STOP");

        engine.process(None, VGA);
        assert_eq!(engine.status().intent, "Listening...");
        // The sticky reading is still exposed separately.
        assert_eq!(engine.stable_intent(), Intent::Stop);
    }

    #[test]
    fn status_snapshot_serializes_to_json() {
        let mut engine = engine();
        engine.process(Some(&poses::pinch(VGA, 150.0)), VGA);
        let json = serde_json::to_value(engine.status()).unwrap();
        assert_eq!(json["volume_percent"], 50);
    }

    #[test]
    fn brief_dropout_does_not_reset_a_committed_gesture_run() {
        let mut engine = engine();
        let peace = poses::peace(VGA);
        engine.process(Some(&peace), VGA);
        engine.process(Some(&peace), VGA);
        // Hand vanishes for one frame mid-gesture.
        engine.process(None, VGA);
        // The third agreeing frame completes the original run.
        let out = engine.process(Some(&peace), VGA);
        assert_eq!(out.intent, Intent::Peace);
        assert!(out.transition.is_some());
    }
}
