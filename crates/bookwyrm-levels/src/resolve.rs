//! Threshold resolution: book count -> current tier, progress, remaining.

use crate::level::Level;

/// Resolve the current level for a book count.
///
/// Among tiers whose `min_books` floor is at or below `book_count`, picks
/// the one with the highest floor (the first such tier in table order when
/// floors tie). If the count sits below every floor, falls back to the
/// tier with the lowest floor so a level is always produced.
///
/// # Panics
///
/// Panics if `levels` is empty. An empty table is a fatal configuration
/// error; callers must guarantee at least one tier.
pub fn resolve_level<'a>(book_count: u32, levels: &'a [Level]) -> &'a Level {
    assert!(!levels.is_empty(), "level table must not be empty");

    let reached = levels
        .iter()
        .filter(|l| l.min_books <= book_count)
        .fold(None::<&Level>, |best, l| match best {
            Some(b) if l.min_books > b.min_books => Some(l),
            Some(b) => Some(b),
            None => Some(l),
        });

    reached.unwrap_or_else(|| {
        // Below every floor: hand back the lowest tier in the table.
        levels
            .iter()
            .fold(&levels[0], |low, l| if l.min_books < low.min_books { l } else { low })
    })
}

/// Fractional progress toward the next tier, as a percentage in `[0, 100]`.
///
/// Returns 100 once the highest tier is reached, and treats a
/// misconfigured non-positive span between neighboring floors as maxed
/// out rather than dividing by it. An empty table yields 0.
pub fn progress_to_next(book_count: u32, levels: &[Level]) -> f64 {
    if levels.is_empty() {
        return 0.0;
    }

    let current = resolve_level(book_count, levels);
    let Some(next) = next_level(current, levels) else {
        return 100.0;
    };

    let span = next.min_books as f64 - current.min_books as f64;
    if span <= 0.0 {
        return 100.0;
    }

    let pct = ((book_count as f64 - current.min_books as f64) / span) * 100.0;
    if !pct.is_finite() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

/// Books left until the next tier's floor; 0 at the highest tier.
pub fn remaining_books(book_count: u32, levels: &[Level]) -> u32 {
    if levels.is_empty() {
        return 0;
    }
    let current = resolve_level(book_count, levels);
    match next_level(current, levels) {
        Some(next) => next.min_books.saturating_sub(book_count),
        None => 0,
    }
}

/// The tier following `current` in ascending floor order, if any.
fn next_level<'a>(current: &Level, levels: &'a [Level]) -> Option<&'a Level> {
    let mut ascending: Vec<&Level> = levels.iter().collect();
    ascending.sort_by_key(|l| l.min_books);
    let idx = ascending.iter().position(|l| l.id == current.id)?;
    ascending.get(idx + 1).copied()
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        /// A non-empty table with strictly increasing, unique floors.
        fn sorted_table()(floors in proptest::collection::btree_set(0u32..5000, 1..12)) -> Vec<Level> {
            floors
                .into_iter()
                .enumerate()
                .map(|(i, min)| Level::new(i as u32 + 1, format!("tier-{i}"), min, min + 50))
                .collect()
        }
    }

    proptest! {
        #[test]
        fn resolves_greatest_floor_at_or_below_count(levels in sorted_table(), n in 0u32..6000) {
            let resolved = resolve_level(n, &levels);
            let expected = levels
                .iter()
                .filter(|l| l.min_books <= n)
                .map(|l| l.min_books)
                .max()
                .unwrap_or_else(|| levels.iter().map(|l| l.min_books).min().unwrap());
            prop_assert_eq!(resolved.min_books, expected);
        }

        #[test]
        fn progress_is_monotone_within_a_tier(levels in sorted_table(), n in 0u32..6000, step in 0u32..10) {
            let m = n + step;
            if resolve_level(n, &levels).id == resolve_level(m, &levels).id {
                prop_assert!(progress_to_next(n, &levels) <= progress_to_next(m, &levels));
            }
        }

        #[test]
        fn progress_stays_in_bounds(levels in sorted_table(), n in 0u32..6000) {
            let pct = progress_to_next(n, &levels);
            prop_assert!((0.0..=100.0).contains(&pct));
        }

        #[test]
        fn progress_is_full_from_last_floor_onward(levels in sorted_table(), extra in 0u32..1000) {
            let last = levels.iter().map(|l| l.min_books).max().unwrap();
            prop_assert_eq!(progress_to_next(last + extra, &levels), 100.0);
        }
    }
}
