//! Shared board state and the session phase machine.

use crate::settings::Settings;
use bookwyrm_rank::{compute, Leaderboard, Participant};
use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle phase of a board session.
///
/// `Init → Connecting → Connected | ConnectedDemo → Closed`. Demo is a
/// one-way door: once the participant subscription reports a permission
/// denial, the session stays in demo until it is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No store contact yet.
    #[default]
    Init,
    /// Connection acquisition deferred onto the runtime.
    Connecting,
    /// Live subscriptions are feeding the board.
    Connected,
    /// Permission-denied degradation: fixed demo roster, no remote writes.
    ConnectedDemo,
    /// Torn down; no further updates will apply.
    Closed,
}

impl SessionPhase {
    /// The mutation-dispatch mode this phase implies.
    pub fn mode(self) -> SessionMode {
        match self {
            SessionPhase::ConnectedDemo => SessionMode::Demo,
            _ => SessionMode::Live,
        }
    }
}

/// How the mutation gateway dispatches operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Mutations write through the store.
    Live,
    /// Mutations are rejected or applied to local state only.
    Demo,
}

/// The engine's full in-memory view of the board.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    /// Session lifecycle phase.
    pub phase: SessionPhase,

    /// The store connection handle has been acquired.
    pub connection_ready: bool,

    /// No participant snapshot has been applied yet.
    pub data_loading: bool,

    /// The presentation layer may animate the list in. Driven by its own
    /// timer, independent of data arrival.
    pub list_ready: bool,

    /// Latest applied participant snapshot.
    pub participants: Vec<Participant>,

    /// Latest applied settings.
    pub settings: Settings,
}

impl BoardState {
    /// Whether the session has degraded into the demo dataset.
    pub fn demo_mode(&self) -> bool {
        self.phase == SessionPhase::ConnectedDemo
    }

    /// Current mutation-dispatch mode.
    pub fn mode(&self) -> SessionMode {
        self.phase.mode()
    }

    /// Compute the ranked view of this state.
    pub fn leaderboard(&self, search: &str) -> Leaderboard {
        compute(&self.participants, self.settings.show_podium, search)
    }
}

/// Handle to the single shared [`BoardState`] behind a watch channel.
///
/// The coordinator applies snapshots through it, the gateway applies
/// demo-mode local edits, and consumers observe it via [`subscribe`].
///
/// [`subscribe`]: SharedState::subscribe
#[derive(Clone)]
pub struct SharedState {
    tx: Arc<watch::Sender<BoardState>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Fresh state in the `Init` phase.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BoardState {
            data_loading: true,
            ..BoardState::default()
        });
        Self {
            tx: Arc::new(tx),
        }
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.tx.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> BoardState {
        self.tx.borrow().clone()
    }

    /// Current mutation-dispatch mode.
    pub fn mode(&self) -> SessionMode {
        self.tx.borrow().phase.mode()
    }

    /// Mutate the state in place, notifying watchers.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut BoardState)) {
        self.tx.send_modify(mutate);
    }

    /// Replace the participant snapshot. Ignored once the session has
    /// degraded to demo data or been closed.
    pub(crate) fn apply_participants(&self, participants: Vec<Participant>) {
        self.update(|state| {
            if matches!(state.phase, SessionPhase::ConnectedDemo | SessionPhase::Closed) {
                return;
            }
            state.participants = participants;
            state.data_loading = false;
        });
    }

    /// Enter demo mode with the given fixed roster. One-way.
    pub(crate) fn enter_demo(&self, roster: Vec<Participant>) {
        self.update(|state| {
            if matches!(state.phase, SessionPhase::ConnectedDemo | SessionPhase::Closed) {
                return;
            }
            state.phase = SessionPhase::ConnectedDemo;
            state.participants = roster;
            state.data_loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookwyrm_rank::sample_roster;

    #[test]
    fn phases_map_to_modes() {
        assert_eq!(SessionPhase::Connected.mode(), SessionMode::Live);
        assert_eq!(SessionPhase::Connecting.mode(), SessionMode::Live);
        assert_eq!(SessionPhase::ConnectedDemo.mode(), SessionMode::Demo);
    }

    #[test]
    fn demo_entry_is_one_way() {
        let shared = SharedState::new();
        shared.update(|s| s.phase = SessionPhase::Connected);
        shared.enter_demo(sample_roster());
        assert!(shared.snapshot().demo_mode());

        // Later snapshots no longer replace the demo roster.
        shared.apply_participants(Vec::new());
        assert_eq!(shared.snapshot().participants.len(), sample_roster().len());
    }

    #[test]
    fn applying_a_snapshot_clears_the_loading_flag() {
        let shared = SharedState::new();
        assert!(shared.snapshot().data_loading);
        shared.apply_participants(sample_roster());
        let state = shared.snapshot();
        assert!(!state.data_loading);
        assert_eq!(state.participants.len(), 10);
    }

    #[test]
    fn leaderboard_follows_the_podium_toggle() {
        let shared = SharedState::new();
        shared.apply_participants(sample_roster());

        let state = shared.snapshot();
        let with_podium = state.leaderboard("");
        assert_eq!(with_podium.top3.len(), 3);
        assert_eq!(with_podium.roster.len(), 7);

        let mut flat_state = state.clone();
        flat_state.settings.show_podium = false;
        let flat = flat_state.leaderboard("");
        assert_eq!(flat.roster.len(), 10);
    }
}
