//! Caller identity and the privileged-allowlist check.

use async_trait::async_trait;
use bookwyrm_store::DocumentStore;
use std::sync::Arc;
use tracing::warn;

/// Source of the current caller's identity.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Email of the current caller, or `None` when signed out.
    async fn current_email(&self) -> Option<String>;
}

/// Fixed identity for local tools and tests.
pub struct StaticIdentity {
    email: Option<String>,
}

impl StaticIdentity {
    /// An identity signed in under the given email.
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    /// A signed-out identity.
    pub fn anonymous() -> Self {
        Self { email: None }
    }
}

#[async_trait]
impl Identity for StaticIdentity {
    async fn current_email(&self) -> Option<String> {
        self.email.clone()
    }
}

/// Privileged-allowlist predicate.
///
/// An email is privileged iff an allowlist document keyed by that email
/// exists in the admin collection. Lookup failures demote the caller to
/// unprivileged rather than failing the request.
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl Authorizer {
    /// Check membership against `collection` in `store`.
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Whether the given caller may mutate the board.
    pub async fn is_privileged(&self, email: Option<&str>) -> bool {
        let Some(email) = email else {
            return false;
        };
        match self.store.get_document(&self.collection, email).await {
            Ok(doc) => doc.is_some(),
            Err(err) => {
                warn!(%err, email, "allowlist lookup failed; treating caller as unprivileged");
                false
            }
        }
    }
}
