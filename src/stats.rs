//! Session counters for the frame loop and synthetic input.
//!
//! Repeat timers dispatch from their own threads, so every counter is an
//! atomic and the log is shared behind an `Arc`.

use crate::input::KeyEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for the current session.
#[derive(Debug)]
pub struct SessionStats {
    /// Frame loop ticks
    frames: AtomicU64,
    /// Provider calls that returned a detection
    detections: AtomicU64,
    /// Provider calls that failed and were skipped
    detection_failures: AtomicU64,
    /// Valid hands classified across all ticks
    hands_classified: AtomicU64,
    /// Hands dropped for a malformed landmark list
    hands_skipped: AtomicU64,
    /// Initial key-downs
    key_downs: AtomicU64,
    /// Key-downs re-emitted by repeat timers
    key_repeats: AtomicU64,
    key_ups: AtomicU64,
    session_start: DateTime<Utc>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            frames: AtomicU64::new(0),
            detections: AtomicU64::new(0),
            detection_failures: AtomicU64::new(0),
            hands_classified: AtomicU64::new(0),
            hands_skipped: AtomicU64::new(0),
            key_downs: AtomicU64::new(0),
            key_repeats: AtomicU64::new(0),
            key_ups: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    pub fn record_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection_failure(&self) {
        self.detection_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hands_classified(&self, count: u64) {
        self.hands_classified.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_hands_skipped(&self, count: u64) {
        self.hands_skipped.fetch_add(count, Ordering::Relaxed);
    }

    /// Count a synthetic key event by kind.
    pub fn record_key_event(&self, event: &KeyEvent) {
        let counter = match (event.is_down(), event.repeat) {
            (true, false) => &self.key_downs,
            (true, true) => &self.key_repeats,
            (false, _) => &self.key_ups,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames: self.frames.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
            detection_failures: self.detection_failures.load(Ordering::Relaxed),
            hands_classified: self.hands_classified.load(Ordering::Relaxed),
            hands_skipped: self.hands_skipped.load(Ordering::Relaxed),
            key_downs: self.key_downs.load(Ordering::Relaxed),
            key_repeats: self.key_repeats.load(Ordering::Relaxed),
            key_ups: self.key_ups.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Frames processed: {}\n\
             - Detections run: {} ({} failed)\n\
             - Hands classified: {} ({} skipped)\n\
             - Key presses: {}\n\
             - Key repeats: {}\n\
             - Key releases: {}\n\
             - Session duration: {} seconds",
            stats.frames,
            stats.detections,
            stats.detection_failures,
            stats.hands_classified,
            stats.hands_skipped,
            stats.key_downs,
            stats.key_repeats,
            stats.key_ups,
            stats.session_duration_secs
        )
    }

    pub fn reset(&self) {
        for counter in [
            &self.frames,
            &self.detections,
            &self.detection_failures,
            &self.hands_classified,
            &self.hands_skipped,
            &self.key_downs,
            &self.key_repeats,
            &self.key_ups,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the session counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub frames: u64,
    pub detections: u64,
    pub detection_failures: u64,
    pub hands_classified: u64,
    pub hands_skipped: u64,
    pub key_downs: u64,
    pub key_repeats: u64,
    pub key_ups: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared session stats.
pub type SharedSessionStats = Arc<SessionStats>;

pub fn create_shared_stats() -> SharedSessionStats {
    Arc::new(SessionStats::new())
}
