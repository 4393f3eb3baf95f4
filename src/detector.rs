// src/detector.rs - landmark source collaborator and scripted simulation
use anyhow::Result;
use image::DynamicImage;

use crate::landmarks::{FrameSize, LandmarkSet};

/// Per-frame hand landmark supplier.
///
/// Returns zero or one hand; `None` means no hand in view, which is a valid
/// state rather than an error. Which backend produced the landmarks (a
/// solutions-style pipeline, a task-file model, a simulation) is a
/// capability-selection concern hidden behind this trait; the engine depends
/// only on this contract.
pub trait LandmarkSource: Send {
    fn detect(&mut self, frame: &DynamicImage) -> Result<Option<LandmarkSet>>;
}

/// Synthetic hand poses in pixel space for a mirrored feed with an upright
/// hand. Drives the scripted source and the test suite; no camera or model
/// required.
pub mod poses {
    use nalgebra::{Point2, Vector2};

    use crate::landmarks::{index, FrameSize, LandmarkSet, LANDMARK_COUNT};

    /// Horizontal offsets of the four finger columns relative to the wrist,
    /// index first. The thumb fans out to the +x side.
    const FINGER_COLUMNS: [f64; 4] = [-15.0, -45.0, -75.0, -105.0];

    /// Build a hand from a wrist position and per-digit extension flags
    /// ([thumb, index, middle, ring, pinky]).
    ///
    /// Joint placement keeps the default orientation policy's invariants:
    /// an extended fingertip sits above its PIP, a flexed one below; an
    /// extended thumb tip sits left of its IP joint.
    pub fn hand_at(wrist: Point2<f64>, extended: [bool; 5]) -> LandmarkSet {
        let mut points = vec![Point2::new(0.0, 0.0); LANDMARK_COUNT];
        points[index::WRIST] = wrist;

        points[index::THUMB_CMC] = wrist + Vector2::new(30.0, -20.0);
        points[index::THUMB_MCP] = wrist + Vector2::new(55.0, -40.0);
        points[index::THUMB_IP] = wrist + Vector2::new(75.0, -60.0);
        points[index::THUMB_TIP] = if extended[0] {
            wrist + Vector2::new(55.0, -75.0)
        } else {
            wrist + Vector2::new(95.0, -70.0)
        };

        for (finger, dx) in FINGER_COLUMNS.iter().enumerate() {
            let mcp = index::INDEX_MCP + finger * 4;
            points[mcp] = wrist + Vector2::new(*dx, -70.0);
            points[mcp + 1] = wrist + Vector2::new(*dx, -100.0);
            points[mcp + 2] = wrist + Vector2::new(*dx, -120.0);
            points[mcp + 3] = if extended[finger + 1] {
                wrist + Vector2::new(*dx, -140.0)
            } else {
                wrist + Vector2::new(*dx, -85.0)
            };
        }

        LandmarkSet::from_pixels(points).expect("synthetic hand is always 21 points")
    }

    fn resting_wrist(frame: FrameSize) -> Point2<f64> {
        Point2::new(frame.width as f64 / 2.0, frame.height as f64 * 0.85)
    }

    /// All five digits extended, hand low in the frame: STOP.
    pub fn open_palm(frame: FrameSize) -> LandmarkSet {
        hand_at(resting_wrist(frame), [true; 5])
    }

    /// All five digits extended with the wrist high in the frame: HELP.
    pub fn raised_palm(frame: FrameSize) -> LandmarkSet {
        let wrist = Point2::new(frame.width as f64 / 2.0, frame.height as f64 * 0.2);
        hand_at(wrist, [true; 5])
    }

    /// All five digits flexed: WAIT.
    pub fn fist(frame: FrameSize) -> LandmarkSet {
        hand_at(resting_wrist(frame), [false; 5])
    }

    /// Index + middle extended: PEACE.
    pub fn peace(frame: FrameSize) -> LandmarkSet {
        hand_at(resting_wrist(frame), [false, true, true, false, false])
    }

    /// Index + pinky extended, middle + ring flexed: ROCK ON.
    pub fn horns(frame: FrameSize) -> LandmarkSet {
        hand_at(resting_wrist(frame), [false, true, false, false, true])
    }

    /// Thumb + index extended, middle flexed, with the thumb tip placed at
    /// exactly `distance` pixels from the index tip: VOLUME CTRL.
    pub fn pinch(frame: FrameSize, distance: f64) -> LandmarkSet {
        let mut hand = hand_at(resting_wrist(frame), [true, true, false, false, false]);
        let index_tip = hand.point(index::INDEX_TIP);
        let mut points: Vec<Point2<f64>> = hand.iter().map(|l| l.position).collect();
        points[index::THUMB_TIP] = index_tip + Vector2::new(0.0, distance);
        hand = LandmarkSet::from_pixels(points).expect("synthetic hand is always 21 points");
        hand
    }
}

/// Deterministic demo source cycling the gesture vocabulary.
///
/// Each phase holds a pose for ~1 s at 30 fps — long enough for the
/// stabilizer to commit — with a no-hand gap at the start of every cycle.
/// The pinch phase sweeps closed-to-open and back so the volume bar moves
/// across its full span.
pub struct ScriptedSource {
    size: FrameSize,
    frame_index: u64,
}

/// Frames per scripted phase.
const PHASE_LEN: u64 = 30;

impl ScriptedSource {
    pub fn new(size: FrameSize) -> Self {
        Self {
            size,
            frame_index: 0,
        }
    }
}

impl LandmarkSource for ScriptedSource {
    fn detect(&mut self, _frame: &DynamicImage) -> Result<Option<LandmarkSet>> {
        let t = self.frame_index;
        self.frame_index += 1;

        let hand = match (t / PHASE_LEN) % 8 {
            0 => None,
            1 => Some(poses::open_palm(self.size)),
            2 => Some(poses::fist(self.size)),
            3 => Some(poses::peace(self.size)),
            4 => Some(poses::raised_palm(self.size)),
            5 => Some(poses::horns(self.size)),
            _ => {
                // Two phases of pinch sweep: 50 px up to 250 px and back.
                let s = (t % (2 * PHASE_LEN)) as f64;
                let tri = if s < PHASE_LEN as f64 {
                    s / PHASE_LEN as f64
                } else {
                    (2.0 * PHASE_LEN as f64 - s) / PHASE_LEN as f64
                };
                Some(poses::pinch(self.size, 50.0 + 200.0 * tri))
            }
        };
        Ok(hand)
    }
}

/// Degraded-mode source: never sees a hand. Used when no real detector can
/// be brought up, so a session still runs and reports LISTENING every frame
/// instead of crashing.
pub struct IdleSource;

impl LandmarkSource for IdleSource {
    fn detect(&mut self, _frame: &DynamicImage) -> Result<Option<LandmarkSet>> {
        Ok(None)
    }
}
