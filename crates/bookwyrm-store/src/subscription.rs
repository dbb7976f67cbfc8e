//! Snapshot subscriptions: single-consumer queues with cancel-on-drop.

use crate::document::Document;
use crate::error::StoreError;
use tokio::sync::mpsc;

/// Event delivered to a collection subscription.
#[derive(Debug, Clone)]
pub enum CollectionEvent {
    /// Full replacement view of the collection's current contents.
    Snapshot(Vec<Document>),

    /// The subscription failed; no further snapshots will arrive.
    Error(StoreError),
}

/// Event delivered to a single-document subscription.
#[derive(Debug, Clone)]
pub enum DocumentEvent {
    /// Current state of the document; `None` when absent.
    Snapshot(Option<Document>),

    /// The subscription failed; no further snapshots will arrive.
    Error(StoreError),
}

/// A live subscription: a single-consumer snapshot queue plus the
/// unsubscribe handle. Dropping the subscription unsubscribes.
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
    _guard: CancelGuard,
}

impl<T> Subscription<T> {
    /// Build a subscription from a queue receiver and a cancel hook,
    /// invoked once when the subscription is dropped.
    pub fn new(rx: mpsc::UnboundedReceiver<T>, on_cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            rx,
            _guard: CancelGuard {
                hook: Some(Box::new(on_cancel)),
            },
        }
    }

    /// Receive the next event; `None` once the store side hangs up.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Explicitly unsubscribe.
    pub fn cancel(self) {}
}

struct CancelGuard {
    hook: Option<Box<dyn FnOnce() + Send>>,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(hook) = self.hook.take() {
            hook();
        }
    }
}
