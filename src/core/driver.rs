//! Per-frame glue between the provider, the classifier and the key states.
//!
//! Detection runs only when the video clock has moved. Drawing and key-state
//! driving run on every tick from the cached result, so an unchanged result
//! re-asserts the same (idempotent) transitions.

use crate::core::classifier::TouchClassifier;
use crate::core::keymap::FingerKeyMap;
use crate::core::keystate::{KeyStateMachine, Transition};
use crate::core::repeat::RepeatScheduler;
use crate::input::KeySymbol;
use crate::landmarks::{Detection, HandObservation, LandmarkProvider};
use crate::overlay::{draw_hand_overlay, Surface};
use crate::stats::SharedSessionStats;
use crate::video::VideoFrame;

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The provider was called this tick
    pub detected: bool,
    /// Valid hands in the cached result
    pub hands: usize,
    /// Hands dropped for malformed landmarks
    pub skipped_hands: usize,
    pub pressed: Vec<KeySymbol>,
    pub released: Vec<KeySymbol>,
    /// Keys held after the tick
    pub held: Vec<KeySymbol>,
}

pub struct FrameDriver<P, S, R: RepeatScheduler> {
    provider: P,
    surface: S,
    classifier: TouchClassifier,
    key_map: FingerKeyMap,
    machine: KeyStateMachine<R>,
    stats: SharedSessionStats,
    last_video_time: Option<f64>,
    cached: Option<Detection>,
}

impl<P, S, R> FrameDriver<P, S, R>
where
    P: LandmarkProvider,
    S: Surface,
    R: RepeatScheduler,
{
    pub fn new(
        provider: P,
        surface: S,
        classifier: TouchClassifier,
        key_map: FingerKeyMap,
        machine: KeyStateMachine<R>,
        stats: SharedSessionStats,
    ) -> Self {
        Self {
            provider,
            surface,
            classifier,
            key_map,
            machine,
            stats,
            last_video_time: None,
            cached: None,
        }
    }

    /// Process one animation frame.
    pub fn tick(&mut self, frame: &VideoFrame, now_ms: f64) -> TickOutcome {
        self.stats.record_frame();
        let mut outcome = TickOutcome::default();

        if self.last_video_time != Some(frame.current_time) {
            // Recorded before detecting so a failed frame is not retried.
            self.last_video_time = Some(frame.current_time);
            outcome.detected = true;
            match self.provider.detect(frame, now_ms) {
                Ok(detection) => {
                    self.stats.record_detection();
                    self.cached = Some(detection);
                }
                Err(e) => {
                    self.stats.record_detection_failure();
                    tracing::warn!(error = %e, video_time = frame.current_time, "detection failed, frame skipped");
                }
            }
        }

        let (hands, skipped) = self.observed_hands();
        outcome.hands = hands.len();
        outcome.skipped_hands = skipped;
        self.stats.record_hands_classified(hands.len() as u64);
        self.stats.record_hands_skipped(skipped as u64);

        self.surface.clear();
        self.surface.draw_frame(frame);
        for hand in &hands {
            draw_hand_overlay(&mut self.surface, hand);
        }

        let held_before = self.machine.held_keys();
        if hands.is_empty() {
            outcome.released = self.machine.force_release_all();
        } else {
            for hand in &hands {
                let reading = self.classifier.classify(hand);
                for (finger, touching) in reading.iter() {
                    let Some(key) = self.key_map.key_for(finger) else {
                        continue;
                    };
                    match self.machine.transition(key, touching) {
                        Transition::Pressed => outcome.pressed.push(key),
                        Transition::Released => outcome.released.push(key),
                        Transition::Unchanged => {}
                    }
                }
            }
        }
        outcome.held = self.machine.held_keys();

        if outcome.held != held_before {
            tracing::debug!("{}", status_line(&outcome.held));
        }
        outcome
    }

    /// Validated hands from the cached detection, plus the malformed count.
    fn observed_hands(&self) -> (Vec<HandObservation>, usize) {
        let Some(detection) = &self.cached else {
            return (Vec::new(), 0);
        };
        let mut skipped = 0;
        let hands = detection
            .hands
            .iter()
            .filter_map(|hand| match HandObservation::new(&hand.landmarks) {
                Ok(observation) => Some(observation),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(error = %e, "skipping malformed hand");
                    None
                }
            })
            .collect();
        (hands, skipped)
    }

    /// Status text for the currently held keys.
    pub fn status_line(&self) -> String {
        status_line(&self.machine.held_keys())
    }

    pub fn machine(&self) -> &KeyStateMachine<R> {
        &self.machine
    }

    /// Stop driving: release every held key.
    pub fn release_all(&mut self) -> Vec<KeySymbol> {
        self.machine.force_release_all()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn key_map(&self) -> &FingerKeyMap {
        &self.key_map
    }
}

/// `Pressed keys: a, w`
///
/// Keys are listed in key order, not in the order they were pressed.
pub fn status_line(held: &[KeySymbol]) -> String {
    let keys: Vec<String> = held.iter().map(KeySymbol::to_string).collect();
    format!("Pressed keys: {}", keys.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        let keys = [KeySymbol::new('a').unwrap(), KeySymbol::new('w').unwrap()];
        assert_eq!(status_line(&keys), "Pressed keys: a, w");
        assert_eq!(status_line(&[]), "Pressed keys: ");
    }
}
