//! A provider that never sees a hand.
//!
//! Useful when no model is available: the frame loop still runs and every
//! frame drives the "no hand" path.

use crate::landmarks::provider::{Detection, LandmarkProvider, ProviderError, ProviderOptions};
use crate::video::VideoFrame;

pub struct NoopProvider {
    _options: ProviderOptions,
    calls: u64,
}

impl NoopProvider {
    pub fn new(options: ProviderOptions) -> Result<Self, ProviderError> {
        options.validate()?;
        Ok(Self {
            _options: options,
            calls: 0,
        })
    }

    /// Number of detect calls received.
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl LandmarkProvider for NoopProvider {
    fn detect(&mut self, _frame: &VideoFrame, _timestamp_ms: f64) -> Result<Detection, ProviderError> {
        self.calls += 1;
        Ok(Detection::empty())
    }
}
