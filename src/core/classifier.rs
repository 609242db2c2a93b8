//! Thumb-to-fingertip touch classification.
//!
//! A finger is touching when its tip lies closer than the threshold to the
//! thumb tip in the normalized image plane. Each frame is judged on its own:
//! there is no hysteresis, so a tip hovering at the threshold flickers.

use crate::landmarks::{Finger, HandObservation};

/// Default pinch threshold in normalized frame units.
pub const DEFAULT_TOUCH_THRESHOLD: f32 = 0.05;

/// Per-finger touch booleans for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchReading {
    touching: [bool; 4],
}

impl TouchReading {
    pub fn is_touching(&self, finger: Finger) -> bool {
        self.touching[finger.slot()]
    }

    /// Fingers and their state, index through pinky.
    pub fn iter(&self) -> impl Iterator<Item = (Finger, bool)> + '_ {
        Finger::ALL.iter().map(|&finger| (finger, self.is_touching(finger)))
    }

    pub fn any(&self) -> bool {
        self.touching.iter().any(|&t| t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchClassifier {
    threshold: f32,
}

impl TouchClassifier {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn classify(&self, hand: &HandObservation) -> TouchReading {
        let thumb = hand.thumb_tip();
        let mut reading = TouchReading::default();
        for finger in Finger::ALL {
            let distance = thumb.distance_2d(hand.fingertip(finger));
            reading.touching[finger.slot()] = distance < self.threshold;
        }
        reading
    }
}

impl Default for TouchClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{LandmarkPoint, LANDMARK_COUNT};

    /// Hand with every fingertip far from the thumb, then `tips` applied.
    fn hand(thumb: (f32, f32), tips: &[(Finger, (f32, f32))]) -> HandObservation {
        let mut points = vec![LandmarkPoint::new(0.5, 0.9); LANDMARK_COUNT];
        points[4] = LandmarkPoint::new(thumb.0, thumb.1);
        for finger in Finger::ALL {
            points[finger.tip_index()] = LandmarkPoint::new(0.1, 0.1);
        }
        for &(finger, (x, y)) in tips {
            points[finger.tip_index()] = LandmarkPoint::new(x, y);
        }
        HandObservation::new(&points).unwrap()
    }

    #[test]
    fn test_close_index_is_touching() {
        let reading = TouchClassifier::default()
            .classify(&hand((0.50, 0.50), &[(Finger::Index, (0.51, 0.50))]));
        assert!(reading.is_touching(Finger::Index));
        assert!(!reading.is_touching(Finger::Middle));
        assert!(!reading.is_touching(Finger::Ring));
        assert!(!reading.is_touching(Finger::Pinky));
    }

    #[test]
    fn test_far_index_is_not_touching() {
        let reading = TouchClassifier::default()
            .classify(&hand((0.50, 0.50), &[(Finger::Index, (0.60, 0.50))]));
        assert!(!reading.any());
    }

    #[test]
    fn test_zero_distance_always_touches() {
        let reading = TouchClassifier::new(f32::MIN_POSITIVE)
            .classify(&hand((0.3, 0.3), &[(Finger::Pinky, (0.3, 0.3))]));
        assert!(reading.is_touching(Finger::Pinky));
    }

    #[test]
    fn test_threshold_is_strict() {
        // 0.25 is exact in f32, so this lands on the threshold.
        let reading = TouchClassifier::new(0.25)
            .classify(&hand((0.5, 0.5), &[(Finger::Ring, (0.75, 0.5))]));
        assert!(!reading.is_touching(Finger::Ring));
    }

    #[test]
    fn test_z_is_ignored() {
        let mut points = vec![LandmarkPoint::new(0.1, 0.1); LANDMARK_COUNT];
        points[4] = LandmarkPoint { x: 0.5, y: 0.5, z: 0.0 };
        points[12] = LandmarkPoint { x: 0.5, y: 0.5, z: 0.9 };
        let hand = HandObservation::new(&points).unwrap();
        assert!(TouchClassifier::default()
            .classify(&hand)
            .is_touching(Finger::Middle));
    }

    #[test]
    fn test_iter_order() {
        let reading = TouchClassifier::default()
            .classify(&hand((0.5, 0.5), &[(Finger::Middle, (0.5, 0.5))]));
        let states: Vec<_> = reading.iter().collect();
        assert_eq!(
            states,
            vec![
                (Finger::Index, false),
                (Finger::Middle, true),
                (Finger::Ring, false),
                (Finger::Pinky, false),
            ]
        );
    }
}
