//! Bookwyrm Sync - real-time board synchronization
//!
//! Keeps an in-memory board view synchronized with a live, possibly
//! unreliable document store, and routes privileged mutations back
//! through the same store.
//!
//! # Architecture
//!
//! - **Throttle**: reusable trailing-edge rate limiter; bursts of
//!   participant snapshots collapse to the latest value per window.
//! - **State**: the shared board view behind a watch channel, with the
//!   session phase machine (`Init → Connecting → Connected /
//!   ConnectedDemo → Closed`).
//! - **Coordinator**: owns the subscription tasks: staggered listener
//!   startup, throttled participant applies, immediate settings applies,
//!   first-run settings seeding, and the permission-denied degradation
//!   into the built-in demo roster.
//! - **Gateway**: the mutation command layer, dispatching each operation
//!   per session mode (`Live` writes through the store, `Demo` rejects or
//!   edits local state only).
//! - **Session**: the owned handle tying coordinator and gateway to one
//!   `open()`/`close()` lifecycle.
//!
//! A session never retries remote work: every store operation is
//! fire-and-forget at-most-once, and durability is the store's problem.

mod coordinator;
mod error;
mod gateway;
mod session;
mod settings;
mod state;
mod throttle;

pub use coordinator::{SyncConfig, SyncCoordinator};
pub use error::{Error, Result};
pub use gateway::MutationGateway;
pub use session::Session;
pub use settings::Settings;
pub use state::{BoardState, SessionMode, SessionPhase, SharedState};
pub use throttle::Throttle;
