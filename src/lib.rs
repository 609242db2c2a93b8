//! gesture-keys - pinch gestures to synthetic key input.
//!
//! A hand-landmark provider reports 21 normalized points per hand for each
//! video frame. Each of the four non-thumb fingers counts as touching when its
//! tip is within a fixed distance of the thumb tip, and a touching finger
//! holds down the key it is mapped to (index→a, middle→w, ring→s, pinky→d by
//! default). Held keys re-send their key-down every 100 ms until released.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          gesture-keys                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌────────────┐   ┌───────────┐  │
//! │  │  Video    │──▶│ Landmark  │──▶│   Touch    │──▶│ Key-State │  │
//! │  │  Source   │   │ Provider  │   │ Classifier │   │  Machine  │  │
//! │  └───────────┘   └───────────┘   └────────────┘   └───────────┘  │
//! │                        │                               │         │
//! │                        ▼                               ▼         │
//! │                  ┌───────────┐                  ┌────────────┐   │
//! │                  │  Overlay  │                  │ Input Sink │   │
//! │                  │  Surface  │                  │ + repeats  │   │
//! │                  └───────────┘                  └────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gesture_keys::{
//!     core::{FingerKeyMap, FrameDriver, KeyStateMachine, ThreadRepeater, TouchClassifier},
//!     input::TextTarget,
//!     landmarks::{ProviderOptions, ReplayProvider},
//!     overlay::RasterSurface,
//!     stats::create_shared_stats,
//!     video::VideoFrame,
//! };
//!
//! let provider = ReplayProvider::from_path("pinches.jsonl".as_ref(), ProviderOptions::default())
//!     .expect("recording");
//! let target = Arc::new(TextTarget::new());
//! let machine = KeyStateMachine::new(target.clone(), ThreadRepeater::new());
//! let mut driver = FrameDriver::new(
//!     provider,
//!     RasterSurface::new(256, 256),
//!     TouchClassifier::default(),
//!     FingerKeyMap::default(),
//!     machine,
//!     create_shared_stats(),
//! );
//!
//! let outcome = driver.tick(&VideoFrame::blank(256, 256, 0.0), 0.0);
//! println!("{} -> {:?}", driver.status_line(), outcome.pressed);
//! ```

pub mod config;
pub mod core;
pub mod input;
pub mod landmarks;
pub mod overlay;
pub mod stats;
pub mod video;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{
    FingerKeyMap, FrameDriver, KeyStateMachine, TickOutcome, TouchClassifier, Transition,
};
pub use input::{InputSink, KeyEvent, KeySymbol};
pub use landmarks::{Finger, HandObservation, LandmarkPoint, LandmarkProvider};
pub use stats::{SessionStats, SharedSessionStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Camera failure notice shown to the user.
pub const CAMERA_ALERT: &str = "Error accessing the camera. Please make sure you have a working \
camera connected and have granted permission.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_alert_contents() {
        assert!(CAMERA_ALERT.contains("camera"));
        assert!(CAMERA_ALERT.contains("permission"));
    }
}
