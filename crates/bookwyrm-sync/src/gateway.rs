//! Mutation gateway: the privileged command layer.

use crate::coordinator::SyncConfig;
use crate::error::{Error, Result};
use crate::state::{SessionMode, SharedState};
use bookwyrm_levels::Level;
use bookwyrm_rank::{sample_roster, Participant};
use bookwyrm_store::DocumentStore;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Command layer for privileged board mutations.
///
/// Every operation dispatches once on the session mode:
///
/// - `Live` participant mutations write through the store and rely on the
///   snapshot stream to update local state; a failed write surfaces and
///   the command did not apply.
/// - `Demo` participant mutations are rejected, except
///   [`update_participant`], which edits the in-memory snapshot only so a
///   privileged actor can still experiment locally.
/// - Settings mutations apply to local state immediately in every mode;
///   in `Live` mode a persisted write is additionally attempted and its
///   failure swallowed, since local state wins for the session anyway.
///
/// [`update_participant`]: MutationGateway::update_participant
pub struct MutationGateway {
    store: Arc<dyn DocumentStore>,
    shared: SharedState,
    config: SyncConfig,
}

impl MutationGateway {
    /// Build a gateway writing through `store` into the collections named
    /// by `config`, dispatching on the mode carried by `shared`.
    pub fn new(store: Arc<dyn DocumentStore>, shared: SharedState, config: SyncConfig) -> Self {
        Self {
            store,
            shared,
            config,
        }
    }

    /// Current dispatch mode.
    pub fn mode(&self) -> SessionMode {
        self.shared.mode()
    }

    /// Create a participant with zeroed counters; returns the new id.
    pub async fn add_participant(&self, name: &str) -> Result<String> {
        match self.mode() {
            SessionMode::Demo => Err(Error::DemoMode),
            SessionMode::Live => {
                let participant = Participant::new(name);
                let id = self
                    .store
                    .add_document(&self.config.participants_collection, participant.to_value())
                    .await?;
                info!(name, %id, "participant added");
                Ok(id)
            }
        }
    }

    /// Delete a participant record.
    pub async fn remove_participant(&self, id: &str) -> Result<()> {
        match self.mode() {
            SessionMode::Demo => Err(Error::DemoMode),
            SessionMode::Live => {
                self.store
                    .delete_document(&self.config.participants_collection, id)
                    .await?;
                info!(id, "participant removed");
                Ok(())
            }
        }
    }

    /// Merge fields into a participant record.
    ///
    /// In demo mode the patch lands on the in-memory snapshot only and is
    /// never persisted; an unknown id is a silent no-op, mirroring the
    /// snapshot-replacement semantics of the live path.
    pub async fn update_participant(&self, id: &str, patch: Map<String, Value>) -> Result<()> {
        match self.mode() {
            SessionMode::Demo => {
                let Some(current) = self
                    .shared
                    .snapshot()
                    .participants
                    .into_iter()
                    .find(|p| p.id == id)
                else {
                    return Ok(());
                };

                let mut value = current.to_value();
                if let Some(fields) = value.as_object_mut() {
                    for (key, field) in patch {
                        fields.insert(key, field);
                    }
                }
                let updated = Participant::from_value(id, &value)?;
                self.shared.update(|state| {
                    if let Some(slot) = state.participants.iter_mut().find(|p| p.id == id) {
                        *slot = updated;
                    }
                });
                Ok(())
            }
            SessionMode::Live => {
                self.store
                    .update_document(&self.config.participants_collection, id, patch)
                    .await?;
                Ok(())
            }
        }
    }

    /// Delete every known participant, then re-seed the built-in roster
    /// as fresh records.
    ///
    /// Two unordered best-effort batches, not a transaction: individual
    /// failures are logged and skipped, and partial completion is not
    /// rolled back.
    pub async fn reset_all(&self) -> Result<()> {
        match self.mode() {
            SessionMode::Demo => Err(Error::DemoMode),
            SessionMode::Live => {
                let ids: Vec<String> = self
                    .shared
                    .snapshot()
                    .participants
                    .iter()
                    .map(|p| p.id.clone())
                    .collect();
                info!(count = ids.len(), "resetting the board to the built-in roster");

                for id in &ids {
                    if let Err(err) = self
                        .store
                        .delete_document(&self.config.participants_collection, id)
                        .await
                    {
                        warn!(%id, %err, "reset delete failed");
                    }
                }
                for participant in sample_roster() {
                    if let Err(err) = self
                        .store
                        .add_document(&self.config.participants_collection, participant.to_value())
                        .await
                    {
                        warn!(name = %participant.name, %err, "reset seed failed");
                    }
                }
                Ok(())
            }
        }
    }

    /// Replace the level table. The table must keep at least one tier.
    pub async fn update_levels(&self, levels: Vec<Level>) -> Result<()> {
        if levels.is_empty() {
            return Err(Error::EmptyLevelTable);
        }
        let value = serde_json::to_value(&levels)?;
        self.shared.update(|state| state.settings.levels = levels);
        self.write_settings_field("levels", value).await;
        Ok(())
    }

    /// Replace the per-level image map.
    pub async fn update_stage_images(&self, images: BTreeMap<u32, String>) -> Result<()> {
        let value = serde_json::to_value(&images)?;
        self.shared.update(|state| state.settings.stage_images = images);
        self.write_settings_field("stageImages", value).await;
        Ok(())
    }

    /// Toggle the podium carve-out.
    pub async fn set_podium_visible(&self, show: bool) -> Result<()> {
        self.shared.update(|state| state.settings.show_podium = show);
        self.write_settings_field("showPodium", Value::Bool(show)).await;
        Ok(())
    }

    /// Persist one settings field when live. Local state already holds
    /// the new value, so a failed write only costs durability.
    async fn write_settings_field(&self, field: &str, value: Value) {
        if self.mode() != SessionMode::Live {
            return;
        }
        let mut fields = Map::new();
        fields.insert(field.to_string(), value);
        if let Err(err) = self
            .store
            .update_document(
                &self.config.settings_collection,
                &self.config.settings_document,
                fields,
            )
            .await
        {
            warn!(field, %err, "settings write failed; keeping the local value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionPhase;
    use bookwyrm_store::MemoryStore;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object patch")
    }

    fn gateway(store: &MemoryStore, phase: SessionPhase) -> (MutationGateway, SharedState) {
        let shared = SharedState::new();
        shared.update(|state| state.phase = phase);
        let gateway = MutationGateway::new(
            Arc::new(store.clone()),
            shared.clone(),
            SyncConfig::default(),
        );
        (gateway, shared)
    }

    #[tokio::test]
    async fn live_add_creates_a_zeroed_visible_record() {
        let store = MemoryStore::new();
        let (gateway, _shared) = gateway(&store, SessionPhase::Connected);

        let id = gateway.add_participant("Ada").await.unwrap();
        let doc = store.get_document("participants", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["name"], "Ada");
        assert_eq!(doc.data["avatarSeed"], "Ada");
        assert_eq!(doc.data["bookCount"], 0);
        assert_eq!(doc.data["visible"], true);
    }

    #[tokio::test]
    async fn live_remove_and_update_write_through() {
        let store = MemoryStore::new();
        let (gateway, _shared) = gateway(&store, SessionPhase::Connected);

        let id = gateway.add_participant("Ada").await.unwrap();
        gateway
            .update_participant(&id, patch(json!({ "bookCount": 12 })))
            .await
            .unwrap();
        let doc = store.get_document("participants", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["bookCount"], 12);

        gateway.remove_participant(&id).await.unwrap();
        assert!(store.get_document("participants", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn live_write_failures_surface() {
        let store = MemoryStore::new();
        let (gateway, _shared) = gateway(&store, SessionPhase::Connected);
        store.fail_writes(true);

        assert!(gateway.add_participant("Ada").await.is_err());
        assert_eq!(store.document_count("participants"), 0);
    }

    #[tokio::test]
    async fn demo_rejects_remote_participant_mutations() {
        let store = MemoryStore::new();
        let (gateway, _shared) = gateway(&store, SessionPhase::ConnectedDemo);

        assert!(matches!(gateway.add_participant("Ada").await, Err(Error::DemoMode)));
        assert!(matches!(gateway.remove_participant("1").await, Err(Error::DemoMode)));
        assert!(matches!(gateway.reset_all().await, Err(Error::DemoMode)));
        assert_eq!(store.document_count("participants"), 0);
    }

    #[tokio::test]
    async fn demo_participant_edits_stay_local() {
        let store = MemoryStore::new();
        let (gateway, shared) = gateway(&store, SessionPhase::ConnectedDemo);
        shared.update(|state| state.participants = sample_roster());

        gateway
            .update_participant("1", patch(json!({ "bookCount": 500, "bonusScore": 7 })))
            .await
            .unwrap();

        let state = shared.snapshot();
        let edited = state.participants.iter().find(|p| p.id == "1").unwrap();
        assert_eq!(edited.book_count, 500);
        assert_eq!(edited.bonus_score, 7);
        // Nothing was persisted.
        assert_eq!(store.document_count("participants"), 0);
    }

    #[tokio::test]
    async fn demo_edit_of_unknown_id_is_a_no_op() {
        let store = MemoryStore::new();
        let (gateway, shared) = gateway(&store, SessionPhase::ConnectedDemo);
        shared.update(|state| state.participants = sample_roster());

        gateway
            .update_participant("ghost", patch(json!({ "bookCount": 5 })))
            .await
            .unwrap();
        assert_eq!(shared.snapshot().participants, sample_roster());
    }

    #[tokio::test]
    async fn settings_apply_locally_in_demo_without_writes() {
        let store = MemoryStore::new();
        let (gateway, shared) = gateway(&store, SessionPhase::ConnectedDemo);

        gateway.set_podium_visible(false).await.unwrap();
        assert!(!shared.snapshot().settings.show_podium);
        assert_eq!(store.document_count("settings"), 0);
    }

    #[tokio::test]
    async fn settings_write_failures_are_swallowed() {
        let store = MemoryStore::new();
        let (gateway, shared) = gateway(&store, SessionPhase::Connected);
        store.fail_writes(true);

        gateway.set_podium_visible(false).await.unwrap();
        assert!(!shared.snapshot().settings.show_podium);
    }

    #[tokio::test]
    async fn settings_writes_merge_into_the_singleton() {
        let store = MemoryStore::new();
        store
            .set_document("settings", "global", json!({ "showPodium": true }))
            .await
            .unwrap();
        let (gateway, shared) = gateway(&store, SessionPhase::Connected);

        let mut images = BTreeMap::new();
        images.insert(3, "hatchling.png".to_string());
        gateway.update_stage_images(images.clone()).await.unwrap();

        let doc = store.get_document("settings", "global").await.unwrap().unwrap();
        assert_eq!(doc.data["stageImages"]["3"], "hatchling.png");
        assert_eq!(doc.data["showPodium"], true);
        assert_eq!(shared.snapshot().settings.stage_images, images);
    }

    #[tokio::test]
    async fn empty_level_table_is_rejected() {
        let store = MemoryStore::new();
        let (gateway, shared) = gateway(&store, SessionPhase::Connected);

        assert!(matches!(
            gateway.update_levels(Vec::new()).await,
            Err(Error::EmptyLevelTable)
        ));
        assert!(!shared.snapshot().settings.levels.is_empty());
    }

    #[tokio::test]
    async fn reset_reseeds_the_builtin_roster_under_fresh_ids() {
        let store = MemoryStore::new();
        let (gateway, shared) = gateway(&store, SessionPhase::Connected);

        let a = gateway.add_participant("Ada").await.unwrap();
        let b = gateway.add_participant("Grace").await.unwrap();
        // The coordinator would normally feed these back; stage them directly.
        shared.update(|state| {
            state.participants = vec![
                Participant {
                    id: a.clone(),
                    ..Participant::new("Ada")
                },
                Participant {
                    id: b.clone(),
                    ..Participant::new("Grace")
                },
            ];
        });

        gateway.reset_all().await.unwrap();

        assert_eq!(store.document_count("participants"), sample_roster().len());
        assert!(store.get_document("participants", &a).await.unwrap().is_none());
        assert!(store.get_document("participants", &b).await.unwrap().is_none());
    }
}
