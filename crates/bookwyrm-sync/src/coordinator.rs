//! Sync coordinator: listener lifecycle, throttling, degradation.
//!
//! The coordinator owns the tasks that subscribe to the participant
//! collection and the settings document. Startup is staggered so the
//! caller's first interactive moments stay free of synchronous work:
//! connection acquisition rides on a spawned task, listeners attach after
//! a short configurable delay, and a separate timer gates when the
//! rendered list may animate in.
//!
//! Participant snapshots pass through a trailing-edge throttle; settings
//! snapshots apply immediately. A permission denial on the participant
//! subscription swaps in the built-in demo roster for the rest of the
//! session; every other subscription error is logged and leaves the last
//! applied snapshot in place.

use crate::settings::Settings;
use crate::state::{SessionPhase, SharedState};
use crate::throttle::Throttle;
use bookwyrm_rank::{sample_roster, Participant};
use bookwyrm_store::{CollectionEvent, Document, DocumentEvent, DocumentStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Tunables for one sync session.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Collection holding participant documents.
    pub participants_collection: String,

    /// Collection holding the settings singleton.
    pub settings_collection: String,

    /// Id of the settings singleton document.
    pub settings_document: String,

    /// Minimum spacing between applied participant snapshots.
    pub throttle_window: Duration,

    /// Delay between connection readiness and listener startup.
    pub listener_delay: Duration,

    /// Delay before the rendered list is allowed to animate in.
    pub list_ready_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            participants_collection: "participants".to_string(),
            settings_collection: "settings".to_string(),
            settings_document: "global".to_string(),
            throttle_window: Duration::from_millis(1000),
            listener_delay: Duration::from_millis(300),
            list_ready_delay: Duration::from_millis(200),
        }
    }
}

impl SyncConfig {
    /// A config without startup staggering, for tests and local tools.
    pub fn immediate() -> Self {
        Self {
            listener_delay: Duration::ZERO,
            list_ready_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Owns the subscription tasks feeding a [`SharedState`].
pub struct SyncCoordinator {
    shared: SharedState,
    tasks: Vec<JoinHandle<()>>,
}

impl SyncCoordinator {
    /// Start synchronizing into `shared`. Never blocks the caller; all
    /// store contact happens on spawned tasks.
    pub fn open(store: Arc<dyn DocumentStore>, config: SyncConfig, shared: SharedState) -> Self {
        shared.update(|state| state.phase = SessionPhase::Connecting);

        let mut tasks = Vec::new();

        let list_shared = shared.clone();
        let list_ready_delay = config.list_ready_delay;
        tasks.push(tokio::spawn(async move {
            tokio::time::sleep(list_ready_delay).await;
            list_shared.update(|state| state.list_ready = true);
        }));

        tasks.push(tokio::spawn(run_participants(
            Arc::clone(&store),
            config.clone(),
            shared.clone(),
        )));
        tasks.push(tokio::spawn(run_settings(store, config, shared.clone())));

        Self { shared, tasks }
    }

    /// Tear down: cancel the subscription tasks (dropping their
    /// subscriptions and any pending throttled apply) and mark the
    /// session closed.
    pub fn close(self) {
        for task in &self.tasks {
            task.abort();
        }
        self.shared.update(|state| state.phase = SessionPhase::Closed);
        debug!("sync coordinator closed");
    }
}

async fn run_participants(store: Arc<dyn DocumentStore>, config: SyncConfig, shared: SharedState) {
    shared.update(|state| state.connection_ready = true);
    tokio::time::sleep(config.listener_delay).await;

    let mut subscription = store.subscribe_collection(&config.participants_collection);
    mark_connected(&shared);
    info!(collection = %config.participants_collection, "participant listener started");

    let throttle = Throttle::new(config.throttle_window, {
        let shared = shared.clone();
        move |participants| shared.apply_participants(participants)
    });

    while let Some(event) = subscription.recv().await {
        match event {
            CollectionEvent::Snapshot(docs) => {
                if shared.snapshot().demo_mode() {
                    debug!("ignoring participant snapshot in demo mode");
                    continue;
                }
                throttle.send(decode_participants(&docs));
            }
            CollectionEvent::Error(err) if err.is_permission_denied() => {
                warn!(%err, "participant reads denied; switching to the demo roster");
                throttle.cancel();
                shared.enter_demo(sample_roster());
            }
            CollectionEvent::Error(err) => {
                error!(%err, "participant subscription error; keeping last snapshot");
            }
        }
    }
}

async fn run_settings(store: Arc<dyn DocumentStore>, config: SyncConfig, shared: SharedState) {
    tokio::time::sleep(config.listener_delay).await;

    let mut subscription =
        store.subscribe_document(&config.settings_collection, &config.settings_document);
    mark_connected(&shared);

    while let Some(event) = subscription.recv().await {
        match event {
            DocumentEvent::Snapshot(Some(doc)) => {
                shared.update(|state| state.settings.apply_value(&doc.data));
            }
            DocumentEvent::Snapshot(None) => {
                // First run: seed the defaults. A concurrent initializer
                // may win the write race; losing it is fine.
                let defaults = Settings::default();
                if let Err(err) = store
                    .set_document(
                        &config.settings_collection,
                        &config.settings_document,
                        defaults.to_value(),
                    )
                    .await
                {
                    debug!(%err, "settings seed write failed; continuing on defaults");
                }
                shared.update(|state| state.settings = defaults);
            }
            DocumentEvent::Error(err) => {
                error!(%err, "settings subscription error; keeping last settings");
            }
        }
    }
}

fn mark_connected(shared: &SharedState) {
    shared.update(|state| {
        if state.phase == SessionPhase::Connecting {
            state.phase = SessionPhase::Connected;
        }
    });
}

fn decode_participants(docs: &[Document]) -> Vec<Participant> {
    docs.iter()
        .filter_map(|doc| match Participant::from_value(doc.id.as_str(), &doc.data) {
            Ok(participant) => Some(participant),
            Err(err) => {
                warn!(id = %doc.id, %err, "skipping malformed participant document");
                None
            }
        })
        .collect()
}
