//! Per-key press/release state with auto-repeat.
//!
//! A key is either Released (no entry) or Held (an entry owning exactly one
//! repeat timer). Transitions are only possible through `&mut self`, so a
//! press while Held can never start a second timer and a release always
//! cancels the timer before the entry disappears.

use crate::core::repeat::{RepeatScheduler, DEFAULT_REPEAT_INTERVAL};
use crate::input::{KeyEvent, KeySymbol, SharedSink};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// What a call to [`KeyStateMachine::transition`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Released → Held: one key-down sent, repeat timer started
    Pressed,
    /// Held → Released: timer cancelled, one key-up sent
    Released,
    /// Desired state already in effect
    Unchanged,
}

struct HeldKey<H> {
    pressed_at: DateTime<Utc>,
    repeat: H,
}

pub struct KeyStateMachine<R: RepeatScheduler> {
    sink: SharedSink,
    repeater: R,
    repeat_interval: Duration,
    held: BTreeMap<KeySymbol, HeldKey<R::Handle>>,
}

impl<R: RepeatScheduler> KeyStateMachine<R> {
    pub fn new(sink: SharedSink, repeater: R) -> Self {
        Self::with_interval(sink, repeater, DEFAULT_REPEAT_INTERVAL)
    }

    pub fn with_interval(sink: SharedSink, repeater: R, repeat_interval: Duration) -> Self {
        Self {
            sink,
            repeater,
            repeat_interval,
            held: BTreeMap::new(),
        }
    }

    /// Drive `key` toward the desired state.
    pub fn transition(&mut self, key: KeySymbol, touching: bool) -> Transition {
        match (touching, self.held.contains_key(&key)) {
            (true, false) => {
                self.press(key);
                Transition::Pressed
            }
            (false, true) => {
                self.release(key);
                Transition::Released
            }
            _ => Transition::Unchanged,
        }
    }

    /// Release every held key. Returns the keys released, in key order.
    pub fn force_release_all(&mut self) -> Vec<KeySymbol> {
        let keys: Vec<KeySymbol> = self.held.keys().copied().collect();
        for &key in &keys {
            self.release(key);
        }
        keys
    }

    pub fn is_held(&self, key: KeySymbol) -> bool {
        self.held.contains_key(&key)
    }

    /// Held keys in key order.
    pub fn held_keys(&self) -> Vec<KeySymbol> {
        self.held.keys().copied().collect()
    }

    /// When `key` was pressed, if held.
    pub fn pressed_at(&self, key: KeySymbol) -> Option<DateTime<Utc>> {
        self.held.get(&key).map(|held| held.pressed_at)
    }

    /// Live repeat timers. Always equal to the number of held keys.
    pub fn active_timers(&self) -> usize {
        self.held.len()
    }

    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    fn press(&mut self, key: KeySymbol) {
        let event = KeyEvent::down(key);
        self.sink.dispatch(&event);
        let repeat = self
            .repeater
            .start(event, self.repeat_interval, self.sink.clone());
        self.held.insert(
            key,
            HeldKey {
                pressed_at: Utc::now(),
                repeat,
            },
        );
        tracing::debug!(key = %key, "key pressed");
    }

    fn release(&mut self, key: KeySymbol) {
        if let Some(held) = self.held.remove(&key) {
            self.repeater.cancel(held.repeat);
            self.sink.dispatch(&KeyEvent::up(key));
            tracing::debug!(key = %key, "key released");
        }
    }
}

impl<R: RepeatScheduler> Drop for KeyStateMachine<R> {
    fn drop(&mut self) {
        self.force_release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repeat::CooperativeRepeater;
    use crate::input::{ChannelSink, KeyEventKind};
    use crossbeam_channel::Receiver;
    use std::sync::Arc;

    fn key(c: char) -> KeySymbol {
        KeySymbol::new(c).unwrap()
    }

    fn machine() -> (
        KeyStateMachine<CooperativeRepeater>,
        CooperativeRepeater,
        Receiver<KeyEvent>,
    ) {
        let (sink, receiver) = ChannelSink::new(256);
        let repeater = CooperativeRepeater::new();
        let machine = KeyStateMachine::new(Arc::new(sink), repeater.clone());
        (machine, repeater, receiver)
    }

    fn kinds(receiver: &Receiver<KeyEvent>) -> Vec<(KeyEventKind, char, bool)> {
        receiver
            .try_iter()
            .map(|e| (e.kind, e.key.as_char(), e.repeat))
            .collect()
    }

    #[test]
    fn test_press_emits_one_down_and_starts_timer() {
        let (mut machine, repeater, receiver) = machine();

        assert_eq!(machine.transition(key('a'), true), Transition::Pressed);
        assert!(machine.is_held(key('a')));
        assert_eq!(repeater.active(), 1);
        assert_eq!(kinds(&receiver), vec![(KeyEventKind::Down, 'a', false)]);
    }

    #[test]
    fn test_repeated_touch_is_idempotent() {
        let (mut machine, repeater, receiver) = machine();
        machine.transition(key('a'), true);
        let _ = kinds(&receiver);

        assert_eq!(machine.transition(key('a'), true), Transition::Unchanged);
        assert_eq!(machine.transition(key('a'), true), Transition::Unchanged);
        assert!(kinds(&receiver).is_empty());
        assert_eq!(repeater.active(), 1);
    }

    #[test]
    fn test_release_on_idle_key_is_noop() {
        let (mut machine, _repeater, receiver) = machine();
        assert_eq!(machine.transition(key('w'), false), Transition::Unchanged);
        assert!(kinds(&receiver).is_empty());
    }

    #[test]
    fn test_repeats_while_held_and_stop_on_release() {
        let (mut machine, repeater, receiver) = machine();
        machine.transition(key('a'), true);

        repeater.advance(Duration::from_millis(100));
        repeater.advance(Duration::from_millis(100));
        repeater.advance(Duration::from_millis(100));

        assert_eq!(machine.transition(key('a'), false), Transition::Released);
        assert_eq!(repeater.active(), 0);
        repeater.advance(Duration::from_millis(500));

        assert_eq!(
            kinds(&receiver),
            vec![
                (KeyEventKind::Down, 'a', false),
                (KeyEventKind::Down, 'a', true),
                (KeyEventKind::Down, 'a', true),
                (KeyEventKind::Down, 'a', true),
                (KeyEventKind::Up, 'a', false),
            ]
        );
    }

    #[test]
    fn test_force_release_all() {
        let (mut machine, repeater, receiver) = machine();
        machine.transition(key('a'), true);
        machine.transition(key('w'), true);
        let _ = kinds(&receiver);

        let released = machine.force_release_all();
        assert_eq!(released, vec![key('a'), key('w')]);
        assert_eq!(repeater.active(), 0);
        assert_eq!(
            kinds(&receiver),
            vec![(KeyEventKind::Up, 'a', false), (KeyEventKind::Up, 'w', false)]
        );

        assert!(machine.force_release_all().is_empty());
        assert!(kinds(&receiver).is_empty());
    }

    #[test]
    fn test_repress_after_release_starts_fresh_timer() {
        let (mut machine, repeater, _receiver) = machine();
        machine.transition(key('s'), true);
        machine.transition(key('s'), false);
        machine.transition(key('s'), true);
        assert_eq!(repeater.active(), 1);
        assert_eq!(machine.active_timers(), 1);
    }

    #[test]
    fn test_drop_releases_held_keys() {
        let (mut machine, repeater, receiver) = machine();
        machine.transition(key('d'), true);
        drop(machine);

        assert_eq!(repeater.active(), 0);
        let events = kinds(&receiver);
        assert_eq!(events.last(), Some(&(KeyEventKind::Up, 'd', false)));
    }
}
