// src/landmarks.rs - hand landmark geometry and validation
use nalgebra::Point2;
use thiserror::Error;

/// Landmark ids for the 21-point hand topology.
///
/// Ids are anatomically fixed: the same finger joint always carries the same
/// id across frames, whichever detection backend produced the set.
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A valid hand is always exactly 21 landmarks.
pub const LANDMARK_COUNT: usize = 21;

/// Tip/PIP pairs for index, middle, ring, pinky, in that order.
pub const FINGER_TIPS: [usize; 4] = [
    index::INDEX_TIP,
    index::MIDDLE_TIP,
    index::RING_TIP,
    index::PINKY_TIP,
];
pub const FINGER_PIPS: [usize; 4] = [
    index::INDEX_PIP,
    index::MIDDLE_PIP,
    index::RING_PIP,
    index::PINKY_PIP,
];

/// Bone segments of the hand skeleton, for overlay drawing.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    (0, 17),
];

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid landmark count: expected {expected}, got {actual}")]
    MalformedHand { expected: usize, actual: usize },
}

/// Pixel dimensions of the frame a landmark set was measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const VGA: FrameSize = FrameSize {
        width: 640,
        height: 480,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A single tracked point on the hand.
#[derive(Debug, Clone, Copy)]
pub struct Landmark {
    pub id: usize,
    pub position: Point2<f64>,
}

/// An ordered set of exactly 21 hand landmarks in pixel space.
///
/// Construction is the only place the landmark count is checked; everything
/// downstream indexes with the constants in [`index`] and cannot go out of
/// bounds on a value of this type.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<Point2<f64>>,
}

impl LandmarkSet {
    /// Build from pixel-space positions ordered by landmark id.
    pub fn from_pixels(points: Vec<Point2<f64>>) -> Result<Self, EngineError> {
        if points.len() != LANDMARK_COUNT {
            return Err(EngineError::MalformedHand {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Build from normalized (0..1) detector output, scaling into the
    /// frame's pixel space the way the landmark models report coordinates.
    pub fn from_normalized(normalized: &[(f64, f64)], frame: FrameSize) -> Result<Self, EngineError> {
        let points = normalized
            .iter()
            .map(|(x, y)| Point2::new(x * frame.width as f64, y * frame.height as f64))
            .collect();
        Self::from_pixels(points)
    }

    /// Position of a landmark by id. Callers index with [`index`] constants.
    pub fn point(&self, id: usize) -> Point2<f64> {
        self.points[id]
    }

    pub fn wrist(&self) -> Point2<f64> {
        self.points[index::WRIST]
    }

    /// Thumb-tip and index-tip positions, the pinch segment.
    pub fn pinch_endpoints(&self) -> (Point2<f64>, Point2<f64>) {
        (self.points[index::THUMB_TIP], self.points[index::INDEX_TIP])
    }

    /// Euclidean pixel distance between thumb tip and index tip.
    pub fn pinch_distance(&self) -> f64 {
        let (thumb, idx) = self.pinch_endpoints();
        (idx - thumb).norm()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(id, p)| Landmark { id, position: *p })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_landmark_count() {
        let short = vec![Point2::new(0.0, 0.0); 20];
        match LandmarkSet::from_pixels(short) {
            Err(EngineError::MalformedHand { expected, actual }) => {
                assert_eq!(expected, 21);
                assert_eq!(actual, 20);
            }
            Ok(_) => panic!("20-point set must be rejected"),
        }
        assert!(LandmarkSet::from_pixels(vec![Point2::new(0.0, 0.0); 22]).is_err());
    }

    #[test]
    fn accepts_exactly_21_points() {
        let set = LandmarkSet::from_pixels(vec![Point2::new(1.0, 2.0); 21]).unwrap();
        assert_eq!(set.wrist(), Point2::new(1.0, 2.0));
        assert_eq!(set.iter().count(), 21);
    }

    #[test]
    fn normalized_coordinates_scale_into_pixel_space() {
        let mut norm = vec![(0.0, 0.0); 21];
        norm[index::INDEX_TIP] = (0.5, 0.25);
        let set = LandmarkSet::from_normalized(&norm, FrameSize::VGA).unwrap();
        assert_eq!(set.point(index::INDEX_TIP), Point2::new(320.0, 120.0));
    }

    #[test]
    fn pinch_distance_is_euclidean() {
        let mut points = vec![Point2::new(0.0, 0.0); 21];
        points[index::THUMB_TIP] = Point2::new(100.0, 100.0);
        points[index::INDEX_TIP] = Point2::new(103.0, 104.0);
        let set = LandmarkSet::from_pixels(points).unwrap();
        assert!((set.pinch_distance() - 5.0).abs() < 1e-9);
    }
}
