//! Hand landmark types.
//!
//! Coordinates are normalized to the frame (0.0-1.0) the way the provider
//! emits them. A hand always has [`LANDMARK_COUNT`] points.

use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// Wrist and fingertips, in drawing order.
pub const RELEVANT_LANDMARKS: [usize; 6] =
    [WRIST, THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// A normalized landmark position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl LandmarkPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar Euclidean distance; `z` is ignored.
    pub fn distance_2d(&self, other: &LandmarkPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The four non-thumb fingers that can be mapped to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Finger {
    #[serde(rename = "IndexFinger")]
    Index,
    #[serde(rename = "MiddleFinger")]
    Middle,
    #[serde(rename = "RingFinger")]
    Ring,
    #[serde(rename = "PinkyFinger")]
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Landmark index of this finger's tip.
    pub fn tip_index(&self) -> usize {
        match self {
            Finger::Index => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring => RING_TIP,
            Finger::Pinky => PINKY_TIP,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Finger::Index => "IndexFinger",
            Finger::Middle => "MiddleFinger",
            Finger::Ring => "RingFinger",
            Finger::Pinky => "PinkyFinger",
        }
    }

    pub(crate) fn slot(&self) -> usize {
        *self as usize
    }
}

/// One tracked hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl HandObservation {
    /// Build an observation from a provider's landmark list.
    pub fn new(points: &[LandmarkPoint]) -> Result<Self, LandmarkError> {
        let points: [LandmarkPoint; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::PointCount {
                expected: LANDMARK_COUNT,
                found: points.len(),
            })?;
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> Option<&LandmarkPoint> {
        self.points.get(index)
    }

    pub fn wrist(&self) -> &LandmarkPoint {
        &self.points[WRIST]
    }

    pub fn thumb_tip(&self) -> &LandmarkPoint {
        &self.points[THUMB_TIP]
    }

    pub fn fingertip(&self, finger: Finger) -> &LandmarkPoint {
        &self.points[finger.tip_index()]
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }
}

/// Errors for landmark data that does not describe a hand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks per hand, found {found}")]
    PointCount { expected: usize, found: usize },
}
