//! Owned board session: one `open()`/`close()` lifecycle.

use crate::coordinator::{SyncCoordinator, SyncConfig};
use crate::gateway::MutationGateway;
use crate::state::{BoardState, SharedState};
use bookwyrm_store::DocumentStore;
use std::sync::Arc;
use tokio::sync::watch;

/// A live board session.
///
/// Owns the sync coordinator (read side) and the mutation gateway (write
/// side) over one shared state. The session is the only holder of the
/// subscription handles; dropping it without [`close`] leaks the
/// background tasks until the runtime shuts down, so tear it down
/// explicitly.
///
/// [`close`]: Session::close
pub struct Session {
    shared: SharedState,
    coordinator: SyncCoordinator,
    gateway: MutationGateway,
}

impl Session {
    /// Open a session against a store. Returns immediately; the
    /// coordinator connects and attaches listeners in the background.
    pub fn open(store: Arc<dyn DocumentStore>, config: SyncConfig) -> Self {
        let shared = SharedState::new();
        let coordinator = SyncCoordinator::open(Arc::clone(&store), config.clone(), shared.clone());
        let gateway = MutationGateway::new(store, shared.clone(), config);
        Self {
            shared,
            coordinator,
            gateway,
        }
    }

    /// Observe board state changes.
    pub fn state(&self) -> watch::Receiver<BoardState> {
        self.shared.subscribe()
    }

    /// Clone of the current board state.
    pub fn snapshot(&self) -> BoardState {
        self.shared.snapshot()
    }

    /// The privileged mutation surface.
    pub fn gateway(&self) -> &MutationGateway {
        &self.gateway
    }

    /// Tear the session down: cancel both subscriptions and any pending
    /// throttled apply. State freezes in the `Closed` phase.
    pub fn close(self) {
        self.coordinator.close();
    }
}
