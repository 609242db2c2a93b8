//! Provider that plays back recorded detections.
//!
//! Recordings are JSON Lines, one [`Detection`] per line:
//!
//! ```text
//! {"hands": [{"score": 0.93, "landmarks": [{"x": 0.5, "y": 0.5}, ...]}]}
//! ```
//!
//! Each `detect` call consumes one line, so the recording advances only when
//! the frame loop sees a fresh video frame.

use crate::landmarks::provider::{Detection, LandmarkProvider, ProviderError, ProviderOptions};
use crate::video::VideoFrame;
use std::path::Path;

pub struct ReplayProvider {
    options: ProviderOptions,
    records: Vec<Detection>,
    cursor: usize,
    looping: bool,
}

impl ReplayProvider {
    /// Load a recording from disk.
    pub fn from_path(path: &Path, options: ProviderOptions) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::ModelLoad(format!("cannot read recording {}: {e}", path.display()))
        })?;
        Self::from_jsonl(&content, options)
    }

    /// Parse a recording from JSON Lines text. Blank lines are ignored.
    pub fn from_jsonl(content: &str, options: ProviderOptions) -> Result<Self, ProviderError> {
        options.validate()?;

        let records = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<Detection>(line).map_err(|source| ProviderError::Parse {
                    line: index + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            records = records.len(),
            num_hands = options.num_hands,
            min_detection = options.min_hand_detection_confidence,
            min_presence = options.min_hand_presence_confidence,
            min_tracking = options.min_tracking_confidence,
            delegate = ?options.delegate,
            "replay provider ready"
        );

        Ok(Self {
            options,
            records,
            cursor: 0,
            looping: false,
        })
    }

    /// Restart from the first record once the recording is exhausted.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a non-looping recording has been fully played.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.cursor >= self.records.len()
    }

    fn next_record(&mut self) -> Option<&Detection> {
        if self.cursor >= self.records.len() {
            if !self.looping || self.records.is_empty() {
                return None;
            }
            self.cursor = 0;
        }
        let record = self.records.get(self.cursor);
        self.cursor += 1;
        record
    }
}

impl LandmarkProvider for ReplayProvider {
    fn detect(&mut self, _frame: &VideoFrame, _timestamp_ms: f64) -> Result<Detection, ProviderError> {
        let min_score = self.options.min_hand_detection_confidence;
        let num_hands = self.options.num_hands;

        let Some(record) = self.next_record() else {
            return Ok(Detection::empty());
        };

        let hands = record
            .hands
            .iter()
            .filter(|hand| hand.score >= min_score)
            .take(num_hands)
            .cloned()
            .collect();
        Ok(Detection { hands })
    }
}
