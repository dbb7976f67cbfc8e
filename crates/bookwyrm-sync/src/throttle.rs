//! Trailing-edge update throttling.
//!
//! A [`Throttle`] admits at most one delivery per window. The first value
//! after an idle stretch passes through immediately; values arriving
//! inside the window replace each other and the survivor is delivered at
//! the window boundary. The last value of a burst is therefore never
//! dropped, and deliveries never reorder.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct ThrottleState<T> {
    last_fire: Option<Instant>,
    pending: Option<T>,
    flush: Option<JoinHandle<()>>,
}

/// Rate limiter delivering at most one value per window to a sink,
/// trailing-edge, last value wins.
pub struct Throttle<T> {
    window: Duration,
    sink: Arc<dyn Fn(T) + Send + Sync>,
    state: Arc<Mutex<ThrottleState<T>>>,
}

impl<T: Send + 'static> Throttle<T> {
    /// Create a throttle that forwards admitted values to `sink`.
    ///
    /// Must be called within a tokio runtime; the trailing flush rides on
    /// a spawned timer task.
    pub fn new(window: Duration, sink: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            window,
            sink: Arc::new(sink),
            state: Arc::new(Mutex::new(ThrottleState {
                last_fire: None,
                pending: None,
                flush: None,
            })),
        }
    }

    /// Offer a value. Delivered immediately when the window is open,
    /// otherwise parked as the pending trailing value.
    pub fn send(&self, value: T) {
        let mut state = self.state.lock().expect("throttle lock");
        let now = Instant::now();

        let within_window = state
            .last_fire
            .is_some_and(|last| now.duration_since(last) < self.window);

        if !within_window {
            state.last_fire = Some(now);
            drop(state);
            (self.sink)(value);
            return;
        }

        state.pending = Some(value);
        if state.flush.is_none() {
            let deadline = state.last_fire.expect("within window implies last fire") + self.window;
            let shared = Arc::clone(&self.state);
            let sink = Arc::clone(&self.sink);
            state.flush = Some(tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                let mut state = shared.lock().expect("throttle lock");
                state.flush = None;
                if let Some(value) = state.pending.take() {
                    state.last_fire = Some(Instant::now());
                    drop(state);
                    (sink)(value);
                }
            }));
        }
    }

    /// Discard any pending trailing value and stop its timer.
    pub fn cancel(&self) {
        let mut state = self.state.lock().expect("throttle lock");
        state.pending = None;
        if let Some(flush) = state.flush.take() {
            flush.abort();
        }
    }
}

impl<T> Drop for Throttle<T> {
    fn drop(&mut self) {
        let mut state = self.state.lock().expect("throttle lock");
        state.pending = None;
        if let Some(flush) = state.flush.take() {
            flush.abort();
        }
    }
}
