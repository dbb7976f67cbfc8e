//! Bookwyrm Store
//!
//! The opaque document-store collaborator contract the board engine is
//! written against, plus an in-process implementation.
//!
//! # Contract
//!
//! - Collections of schemaless JSON documents addressed by string id.
//! - Subscriptions deliver **full snapshots** in emission order on a
//!   single-consumer queue; every subscription starts with the current
//!   contents and carries a cancel-on-drop handle.
//! - Mutations are create / set / field-merge / delete by id; creation
//!   assigns the id.
//! - Errors distinguish permission denial from every other failure, since
//!   the engine degrades differently on it.
//!
//! The [`MemoryStore`] keeps everything in process. It doubles as the
//! engine's test harness: collections can be switched to deny reads and
//! writes can be forced to fail, so degradation paths are exercisable
//! without a remote backend.

mod document;
mod error;
mod memory;
mod subscription;

pub use document::Document;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use subscription::{CollectionEvent, DocumentEvent, Subscription};

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Subscribe/mutate primitives over an opaque document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Watch a whole collection. The current contents arrive as the first
    /// snapshot; every subsequent mutation of the collection delivers a
    /// fresh full snapshot.
    fn subscribe_collection(&self, collection: &str) -> Subscription<CollectionEvent>;

    /// Watch a single document. `None` snapshots mean the document does
    /// not (or no longer does) exist.
    fn subscribe_document(&self, collection: &str, id: &str) -> Subscription<DocumentEvent>;

    /// One-shot read of a document.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create a document with a store-assigned id; returns the id.
    async fn add_document(&self, collection: &str, data: Value) -> Result<String>;

    /// Create or fully replace a document at a known id.
    async fn set_document(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    /// Merge fields into an existing document. Fails with
    /// [`StoreError::NotFound`] when the document does not exist.
    async fn update_document(&self, collection: &str, id: &str, fields: Map<String, Value>)
        -> Result<()>;

    /// Delete a document. Deleting an absent document is a no-op.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;
}
