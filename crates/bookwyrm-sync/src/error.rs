//! Error types for bookwyrm-sync.

use bookwyrm_store::StoreError;
use thiserror::Error;

/// Result type for sync and gateway operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the coordinator and the mutation gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// The session is in demo mode; remote mutations are disabled.
    #[error("the board is in demo mode; changes cannot be saved")]
    DemoMode,

    /// A level table must always contain at least one tier.
    #[error("the level table cannot be empty")]
    EmptyLevelTable,

    /// The store rejected or failed an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A document payload could not be encoded or decoded.
    #[error("invalid document payload: {0}")]
    Payload(#[from] serde_json::Error),
}
