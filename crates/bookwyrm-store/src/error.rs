//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors a store collaborator can signal.
///
/// Permission denial is the one variant the engine reacts to structurally
/// (demo-mode fallback); everything else is transient from its point of
/// view.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The caller is not allowed to read or write the target.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A mutation addressed a document that does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// The store could not service the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A payload could not be encoded or decoded.
    #[error("invalid document payload: {0}")]
    InvalidPayload(String),
}

impl StoreError {
    /// Whether this is the permission-denial code the engine degrades on.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied(_))
    }
}
