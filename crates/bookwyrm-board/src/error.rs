//! Error types for the board node.

use thiserror::Error;

/// Result type for board node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur wiring or serving the board node.
#[derive(Debug, Error)]
pub enum Error {
    /// Session or gateway failure
    #[error(transparent)]
    Sync(#[from] bookwyrm_sync::Error),

    /// Store failure
    #[error(transparent)]
    Store(#[from] bookwyrm_store::StoreError),

    /// Malformed listen address
    #[error("invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
