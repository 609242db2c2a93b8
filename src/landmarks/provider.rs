//! The landmark provider seam.
//!
//! The hand-landmark model is an external collaborator. Everything this crate
//! needs from it is one synchronous `detect` call per fresh video frame.

use crate::landmarks::types::LandmarkPoint;
use crate::video::VideoFrame;
use serde::{Deserialize, Serialize};

/// One hand as reported by the provider, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    /// Detection confidence for this hand
    #[serde(default = "default_score")]
    pub score: f32,
    pub landmarks: Vec<LandmarkPoint>,
}

fn default_score() -> f32 {
    1.0
}

/// Result of one `detect` call. An empty `hands` list means no hand was seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub hands: Vec<DetectedHand>,
}

impl Detection {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Anything that can turn a video frame into hand landmarks.
pub trait LandmarkProvider {
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: f64) -> Result<Detection, ProviderError>;
}

impl<P: LandmarkProvider + ?Sized> LandmarkProvider for Box<P> {
    fn detect(&mut self, frame: &VideoFrame, timestamp_ms: f64) -> Result<Detection, ProviderError> {
        (**self).detect(frame, timestamp_ms)
    }
}

/// Inference backend preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Delegate {
    #[default]
    Gpu,
    Cpu,
}

/// Options a provider is initialised with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    pub min_hand_detection_confidence: f32,
    pub min_hand_presence_confidence: f32,
    pub min_tracking_confidence: f32,
    /// Maximum number of hands to report per frame
    pub num_hands: usize,
    pub delegate: Delegate,
    pub model_asset_path: String,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            min_hand_detection_confidence: 0.7,
            min_hand_presence_confidence: 0.5,
            min_tracking_confidence: 0.5,
            num_hands: 2,
            delegate: Delegate::Gpu,
            model_asset_path: "hand_landmarker.task".to_string(),
        }
    }
}

impl ProviderOptions {
    /// Check that confidences are within 0.0-1.0 and at least one hand is tracked.
    pub fn validate(&self) -> Result<(), ProviderError> {
        let confidences = [
            ("min_hand_detection_confidence", self.min_hand_detection_confidence),
            ("min_hand_presence_confidence", self.min_hand_presence_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ];
        for (name, value) in confidences {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProviderError::InvalidOptions(format!(
                    "{name} must be within 0.0-1.0, got {value}"
                )));
            }
        }
        if self.num_hands == 0 {
            return Err(ProviderError::InvalidOptions(
                "num_hands must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors raised by a landmark provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to load landmark model: {0}")]
    ModelLoad(String),
    #[error("invalid provider options: {0}")]
    InvalidOptions(String),
    #[error("detection failed: {0}")]
    Detection(String),
    #[error("malformed landmark record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
