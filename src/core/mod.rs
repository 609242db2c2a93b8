//! Gesture-to-key core.
//!
//! This module contains:
//! - Touch classification of thumb-to-fingertip pinches
//! - The finger-to-key mapping
//! - Per-key press/release state with repeat timers
//! - The per-frame driver tying them to a landmark provider

pub mod classifier;
pub mod driver;
pub mod keymap;
pub mod keystate;
pub mod repeat;

// Re-export commonly used types
pub use classifier::{TouchClassifier, TouchReading, DEFAULT_TOUCH_THRESHOLD};
pub use driver::{status_line, FrameDriver, TickOutcome};
pub use keymap::{FingerKeyMap, KeyMapError};
pub use keystate::{KeyStateMachine, Transition};
pub use repeat::{
    CooperativeRepeater, RepeatScheduler, RepeatTimer, ThreadRepeater, DEFAULT_REPEAT_INTERVAL,
};
