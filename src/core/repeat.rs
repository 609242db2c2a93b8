//! Repeat timers for held keys.
//!
//! While a key is held its key-down is re-emitted every period so receivers
//! that expect a stream of downs keep treating the key as pressed. A timer is
//! started exactly once per press and cancelled exactly once per release; the
//! key-state machine enforces that, the schedulers only run the timers.

use crate::input::{KeyEvent, SharedSink};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default repeat period.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Starts and cancels periodic key-down re-emission.
pub trait RepeatScheduler {
    type Handle;

    /// Begin re-emitting `event` to `sink` every `period`.
    fn start(&mut self, event: KeyEvent, period: Duration, sink: SharedSink) -> Self::Handle;

    /// Stop a timer. No repeat from it may be dispatched after this returns.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Runs each timer on its own thread.
///
/// The thread sleeps on a cancel channel, so dropping the sender wakes it
/// immediately; `cancel` then joins it.
#[derive(Debug, Default)]
pub struct ThreadRepeater;

impl ThreadRepeater {
    pub fn new() -> Self {
        Self
    }
}

/// A running thread timer.
pub struct RepeatTimer {
    cancel: Sender<()>,
    thread: JoinHandle<()>,
}

impl RepeatScheduler for ThreadRepeater {
    type Handle = RepeatTimer;

    fn start(&mut self, event: KeyEvent, period: Duration, sink: SharedSink) -> RepeatTimer {
        let (cancel, cancelled) = bounded::<()>(1);
        let thread = thread::spawn(move || loop {
            match cancelled.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => sink.dispatch(&event.repeated()),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        RepeatTimer { cancel, thread }
    }

    fn cancel(&mut self, handle: RepeatTimer) {
        let RepeatTimer { cancel, thread } = handle;
        drop(cancel);
        if thread.join().is_err() {
            tracing::warn!("repeat timer thread panicked");
        }
    }
}

struct CooperativeTimer {
    event: KeyEvent,
    period: Duration,
    elapsed: Duration,
    sink: SharedSink,
}

#[derive(Default)]
struct CooperativeTimers {
    next_id: u64,
    timers: BTreeMap<u64, CooperativeTimer>,
}

/// Timers that fire only when the host calls [`advance`](Self::advance).
///
/// The frame loop and the timers then share one thread, the way a browser
/// interleaves animation frames and interval callbacks. Clones share the same
/// timer set, so the host can keep a clone while the state machine owns one.
#[derive(Clone, Default)]
pub struct CooperativeRepeater {
    inner: Arc<Mutex<CooperativeTimers>>,
}

impl CooperativeRepeater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move every timer's clock forward and dispatch the repeats that fell due.
    ///
    /// Returns the number of repeats dispatched.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let mut due = Vec::new();
        {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            for timer in inner.timers.values_mut() {
                let before = timer.elapsed.as_nanos() / timer.period.as_nanos().max(1);
                timer.elapsed += elapsed;
                let after = timer.elapsed.as_nanos() / timer.period.as_nanos().max(1);
                for _ in before..after {
                    due.push((timer.sink.clone(), timer.event.repeated()));
                }
            }
        }
        // Dispatch outside the lock so a sink may inspect the repeater.
        for (sink, event) in &due {
            sink.dispatch(event);
        }
        due.len()
    }

    /// Number of live timers.
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .timers
            .len()
    }
}

impl RepeatScheduler for CooperativeRepeater {
    type Handle = u64;

    fn start(&mut self, event: KeyEvent, period: Duration, sink: SharedSink) -> u64 {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.timers.insert(
            id,
            CooperativeTimer {
                event,
                period,
                elapsed: Duration::ZERO,
                sink,
            },
        );
        id
    }

    fn cancel(&mut self, handle: u64) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .timers
            .remove(&handle);
    }
}
