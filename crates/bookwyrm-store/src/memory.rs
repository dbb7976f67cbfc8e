//! In-process document store with failure injection.

use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::subscription::{CollectionEvent, DocumentEvent, Subscription};
use crate::DocumentStore;
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::trace;

/// Length of store-assigned document ids.
const ID_LEN: usize = 20;

struct CollectionWatcher {
    token: u64,
    tx: mpsc::UnboundedSender<CollectionEvent>,
}

struct DocumentWatcher {
    token: u64,
    id: String,
    tx: mpsc::UnboundedSender<DocumentEvent>,
}

#[derive(Default)]
struct CollectionState {
    /// Documents keyed by id; key order doubles as snapshot order.
    docs: BTreeMap<String, Value>,
    watchers: Vec<CollectionWatcher>,
    doc_watchers: Vec<DocumentWatcher>,
}

impl CollectionState {
    fn snapshot(&self) -> Vec<Document> {
        self.docs
            .iter()
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect()
    }

    /// Push the current snapshot to every live watcher, pruning closed ones.
    fn notify_collection(&mut self) {
        let snapshot = self.snapshot();
        self.watchers
            .retain(|w| w.tx.send(CollectionEvent::Snapshot(snapshot.clone())).is_ok());
    }

    /// Push the current state of one document to its watchers.
    fn notify_document(&mut self, id: &str) {
        let current = self.docs.get(id).map(|data| Document::new(id, data.clone()));
        self.doc_watchers.retain(|w| {
            if w.id != id {
                return true;
            }
            w.tx.send(DocumentEvent::Snapshot(current.clone())).is_ok()
        });
    }
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, CollectionState>,
    deny_reads: HashSet<String>,
    fail_writes: bool,
    next_token: u64,
}

impl Inner {
    fn collection_mut(&mut self, name: &str) -> &mut CollectionState {
        self.collections.entry(name.to_string()).or_default()
    }
}

/// In-process [`DocumentStore`].
///
/// Snapshot order is deterministic (documents sorted by id), every
/// subscription receives the current contents immediately, and every
/// mutation broadcasts a fresh snapshot. Reads of a collection can be
/// denied and writes forced to fail, which is how the engine's
/// degradation paths are exercised in tests and demos.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny all reads of a collection. Existing and future subscriptions
    /// on it observe a permission-denied error instead of snapshots.
    pub fn deny_reads(&self, collection: &str) {
        let mut inner = self.inner.lock().expect("store lock");
        inner.deny_reads.insert(collection.to_string());
    }

    /// Force every subsequent write to fail with [`StoreError::Unavailable`].
    pub fn fail_writes(&self, fail: bool) {
        let mut inner = self.inner.lock().expect("store lock");
        inner.fail_writes = fail;
    }

    /// Number of documents currently stored in a collection.
    pub fn document_count(&self, collection: &str) -> usize {
        let inner = self.inner.lock().expect("store lock");
        inner
            .collections
            .get(collection)
            .map(|c| c.docs.len())
            .unwrap_or(0)
    }

    /// Deliver an error event to the current watchers of a collection
    /// without touching its contents (fault injection).
    pub fn inject_collection_error(&self, collection: &str, err: StoreError) {
        let mut inner = self.inner.lock().expect("store lock");
        if let Some(state) = inner.collections.get_mut(collection) {
            state
                .watchers
                .retain(|w| w.tx.send(CollectionEvent::Error(err.clone())).is_ok());
        }
    }

    fn generate_id(docs: &BTreeMap<String, Value>) -> String {
        loop {
            let id: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(ID_LEN)
                .map(char::from)
                .collect();
            if !docs.contains_key(&id) {
                return id;
            }
        }
    }

    fn check_writable(inner: &Inner) -> Result<()> {
        if inner.fail_writes {
            return Err(StoreError::Unavailable("writes are failing".to_string()));
        }
        Ok(())
    }

    #[cfg(test)]
    fn watcher_count(&self, collection: &str) -> usize {
        let inner = self.inner.lock().expect("store lock");
        inner
            .collections
            .get(collection)
            .map(|c| c.watchers.len() + c.doc_watchers.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn subscribe_collection(&self, collection: &str) -> Subscription<CollectionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().expect("store lock");

        if inner.deny_reads.contains(collection) {
            let _ = tx.send(CollectionEvent::Error(StoreError::PermissionDenied(
                format!("collection {collection} is not readable"),
            )));
            return Subscription::new(rx, || {});
        }

        let token = inner.next_token;
        inner.next_token += 1;

        let state = inner.collection_mut(collection);
        let _ = tx.send(CollectionEvent::Snapshot(state.snapshot()));
        state.watchers.push(CollectionWatcher { token, tx });
        trace!(collection, token, "collection subscription opened");

        let store = Arc::clone(&self.inner);
        let name = collection.to_string();
        Subscription::new(rx, move || {
            let mut inner = store.lock().expect("store lock");
            if let Some(state) = inner.collections.get_mut(&name) {
                state.watchers.retain(|w| w.token != token);
            }
        })
    }

    fn subscribe_document(&self, collection: &str, id: &str) -> Subscription<DocumentEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().expect("store lock");

        if inner.deny_reads.contains(collection) {
            let _ = tx.send(DocumentEvent::Error(StoreError::PermissionDenied(format!(
                "collection {collection} is not readable"
            ))));
            return Subscription::new(rx, || {});
        }

        let token = inner.next_token;
        inner.next_token += 1;

        let state = inner.collection_mut(collection);
        let current = state.docs.get(id).map(|data| Document::new(id, data.clone()));
        let _ = tx.send(DocumentEvent::Snapshot(current));
        state.doc_watchers.push(DocumentWatcher {
            token,
            id: id.to_string(),
            tx,
        });

        let store = Arc::clone(&self.inner);
        let name = collection.to_string();
        Subscription::new(rx, move || {
            let mut inner = store.lock().expect("store lock");
            if let Some(state) = inner.collections.get_mut(&name) {
                state.doc_watchers.retain(|w| w.token != token);
            }
        })
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let inner = self.inner.lock().expect("store lock");
        if inner.deny_reads.contains(collection) {
            return Err(StoreError::PermissionDenied(format!(
                "collection {collection} is not readable"
            )));
        }
        Ok(inner
            .collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn add_document(&self, collection: &str, data: Value) -> Result<String> {
        let mut inner = self.inner.lock().expect("store lock");
        Self::check_writable(&inner)?;

        let state = inner.collection_mut(collection);
        let id = Self::generate_id(&state.docs);
        state.docs.insert(id.clone(), data);
        state.notify_collection();
        state.notify_document(&id);
        trace!(collection, %id, "document added");
        Ok(id)
    }

    async fn set_document(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock");
        Self::check_writable(&inner)?;

        let state = inner.collection_mut(collection);
        state.docs.insert(id.to_string(), data);
        state.notify_collection();
        state.notify_document(id);
        trace!(collection, id, "document set");
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock");
        Self::check_writable(&inner)?;

        let state = inner.collection_mut(collection);
        let doc = state.docs.get_mut(id).ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        let target = doc.as_object_mut().ok_or_else(|| {
            StoreError::InvalidPayload(format!("document {collection}/{id} is not an object"))
        })?;
        for (key, value) in fields {
            target.insert(key, value);
        }
        state.notify_collection();
        state.notify_document(id);
        trace!(collection, id, "document updated");
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock");
        Self::check_writable(&inner)?;

        let state = inner.collection_mut(collection);
        if state.docs.remove(id).is_some() {
            state.notify_collection();
            state.notify_document(id);
            trace!(collection, id, "document deleted");
        }
        Ok(())
    }
}
