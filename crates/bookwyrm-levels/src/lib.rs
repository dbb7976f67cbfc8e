//! Bookwyrm Levels
//!
//! Tiered "evolution levels" derived from a cumulative book count.
//!
//! # Resolution model
//!
//! A level table is an administrator-defined list of tiers, each with an
//! inclusive `min_books` threshold. Resolution is a threshold search, not a
//! range-containment check: a reader's current level is the tier with the
//! **highest applicable floor** (`min_books <= book_count`), regardless of
//! `max_books`, which exists only for display hints. This keeps resolution
//! well-defined even when stored tiers overlap or leave gaps.
//!
//! Progress toward the next tier is the fractional position between the
//! current tier's floor and the next tier's floor, clamped to `[0, 100]`.

mod level;
mod resolve;

pub use level::{default_levels, Level};
pub use resolve::{progress_to_next, remaining_books, resolve_level};
