//! Bookwyrm Board - reading-progress leaderboard node
//!
//! Wires a board session to an identity check and an HTTP surface.
//!
//! # Architecture
//!
//! - **Config**: environment-driven node configuration
//! - **Identity**: caller identity plus the privileged-allowlist check
//! - **API**: HTTP endpoints over the session's state and gateway
//!
//! # Example
//!
//! ```no_run
//! use bookwyrm_board::{api, Authorizer, BoardConfig, StaticIdentity};
//! use bookwyrm_store::{DocumentStore, MemoryStore};
//! use bookwyrm_sync::Session;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BoardConfig::from_env();
//!     let store = Arc::new(MemoryStore::new());
//!     let session = Session::open(store.clone() as Arc<dyn DocumentStore>, config.sync.clone());
//!     let authorizer = Authorizer::new(store, config.admins_collection.clone());
//!     let identity = Arc::new(StaticIdentity::anonymous());
//!     let app = api::build_router(Arc::new(session), authorizer, identity);
//!     let listener = tokio::net::TcpListener::bind(config.api_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod identity;

pub use config::BoardConfig;
pub use error::{Error, Result};
pub use identity::{Authorizer, Identity, StaticIdentity};
