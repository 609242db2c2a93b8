//! Synthetic input delivery.
//!
//! Key events produced by the key-state machine (and by its repeat timers,
//! which may run on other threads) are handed to an [`InputSink`].

pub mod types;

pub use types::{KeyEvent, KeyEventKind, KeySymbol, KeySymbolError};

use crate::stats::SharedSessionStats;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// A target that receives synthetic key events.
pub trait InputSink: Send + Sync {
    fn dispatch(&self, event: &KeyEvent);
}

/// Sink shared between the state machine and its repeat timers.
pub type SharedSink = Arc<dyn InputSink>;

/// Forwards events over a bounded channel.
///
/// A full channel drops the event instead of blocking the frame loop.
pub struct ChannelSink {
    sender: Sender<KeyEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel.
    pub fn new(capacity: usize) -> (Self, Receiver<KeyEvent>) {
        let (sender, receiver) = bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl InputSink for ChannelSink {
    fn dispatch(&self, event: &KeyEvent) {
        let _ = self.sender.try_send(event.clone());
    }
}

/// A text field that types the key of every key-down it receives.
#[derive(Default)]
pub struct TextTarget {
    value: Mutex<String>,
}

impl TextTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the field.
    pub fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl InputSink for TextTarget {
    fn dispatch(&self, event: &KeyEvent) {
        if event.is_down() {
            self.value
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.key.as_char());
        }
    }
}

/// Logs every event through `tracing`.
pub struct LogSink;

impl InputSink for LogSink {
    fn dispatch(&self, event: &KeyEvent) {
        tracing::debug!(
            kind = ?event.kind,
            key = %event.key,
            code = %event.code,
            repeat = event.repeat,
            "key event"
        );
    }
}

/// Records every event in the session stats before passing it on.
pub struct CountingSink<S> {
    inner: S,
    stats: SharedSessionStats,
}

impl<S: InputSink> CountingSink<S> {
    pub fn new(inner: S, stats: SharedSessionStats) -> Self {
        Self { inner, stats }
    }
}

impl<S: InputSink> InputSink for CountingSink<S> {
    fn dispatch(&self, event: &KeyEvent) {
        self.stats.record_key_event(event);
        self.inner.dispatch(event);
    }
}

/// Dispatches each event to several sinks in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<SharedSink>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: SharedSink) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl InputSink for FanoutSink {
    fn dispatch(&self, event: &KeyEvent) {
        for sink in &self.sinks {
            sink.dispatch(event);
        }
    }
}

impl<T: InputSink + ?Sized> InputSink for Arc<T> {
    fn dispatch(&self, event: &KeyEvent) {
        (**self).dispatch(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SessionStats;

    fn key(c: char) -> KeySymbol {
        KeySymbol::new(c).unwrap()
    }

    #[test]
    fn test_text_target_types_key_downs_only() {
        let target = TextTarget::new();
        target.dispatch(&KeyEvent::down(key('a')));
        target.dispatch(&KeyEvent::down(key('a')).repeated());
        target.dispatch(&KeyEvent::up(key('a')));
        target.dispatch(&KeyEvent::down(key('w')));
        assert_eq!(target.value(), "aaw");
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (sink, receiver) = ChannelSink::new(1);
        sink.dispatch(&KeyEvent::down(key('a')));
        sink.dispatch(&KeyEvent::up(key('a')));
        let events: Vec<_> = receiver.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_down());
    }

    #[test]
    fn test_fanout_and_counting() {
        let stats = Arc::new(SessionStats::new());
        let text = Arc::new(TextTarget::new());
        let (channel, receiver) = ChannelSink::new(16);
        let fanout = FanoutSink::new()
            .with(text.clone())
            .with(Arc::new(channel));
        let sink = CountingSink::new(fanout, stats.clone());

        sink.dispatch(&KeyEvent::down(key('d')));
        sink.dispatch(&KeyEvent::up(key('d')));

        assert_eq!(text.value(), "d");
        assert_eq!(receiver.try_iter().count(), 2);
        let snapshot = stats.stats();
        assert_eq!(snapshot.key_downs, 1);
        assert_eq!(snapshot.key_ups, 1);
    }
}
