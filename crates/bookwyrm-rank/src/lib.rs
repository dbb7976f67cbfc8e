//! Bookwyrm Rank
//!
//! Participant scoring and leaderboard ordering.
//!
//! # Ordering model
//!
//! Two orderings coexist on the board:
//!
//! - **Podium order**: raw `bookCount` descending, ties broken by derived
//!   score descending. Rewards volume first, bonus second; only the top
//!   three of this order are carved out onto the podium.
//! - **Roster order**: derived score descending, nothing else. The roster
//!   excludes podium members while the podium is shown.
//!
//! All sorts are stable, so exact ties keep snapshot order and repeated
//! computation over an unchanged snapshot is idempotent.

mod leaderboard;
mod participant;

pub use leaderboard::{compute, podium_order, Leaderboard};
pub use participant::{sample_roster, Participant};
