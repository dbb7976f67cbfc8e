//! Podium selection and roster ordering.

use crate::participant::Participant;
use serde::Serialize;

/// The computed board view: the podium carve-out plus the ranked roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    /// Up to three podium members, best first. Never padded.
    pub top3: Vec<Participant>,

    /// Remaining visible participants by score, filtered by search.
    pub roster: Vec<Participant>,
}

/// Visible participants in podium order: `bookCount` descending, ties
/// broken by derived score descending.
///
/// This is the one ordering where the raw book count outranks the score;
/// the sort is stable, so exact ties keep snapshot order.
pub fn podium_order(participants: &[Participant]) -> Vec<Participant> {
    let mut list: Vec<Participant> = participants.iter().filter(|p| p.visible).cloned().collect();
    list.sort_by(|a, b| {
        b.book_count
            .cmp(&a.book_count)
            .then_with(|| b.score().cmp(&a.score()))
    });
    list
}

/// Compute the full board view from a participant snapshot.
///
/// `top3` is always populated from the podium order; `show_podium` only
/// controls whether those members are excluded from the roster. The
/// roster is ordered purely by derived score descending and then filtered
/// by a case-insensitive substring match on the name.
pub fn compute(participants: &[Participant], show_podium: bool, search: &str) -> Leaderboard {
    let podium = podium_order(participants);
    let top3: Vec<Participant> = podium.into_iter().take(3).collect();

    let mut roster: Vec<Participant> = participants
        .iter()
        .filter(|p| p.visible)
        .filter(|p| !show_podium || !top3.iter().any(|t| t.id == p.id))
        .cloned()
        .collect();
    roster.sort_by(|a, b| b.score().cmp(&a.score()));

    let needle = search.to_lowercase();
    if !needle.is_empty() {
        roster.retain(|p| p.name.to_lowercase().contains(&needle));
    }

    Leaderboard { top3, roster }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(id: &str, name: &str, books: u32, bonus: i64) -> Participant {
        Participant {
            id: id.to_string(),
            book_count: books,
            bonus_score: bonus,
            ..Participant::new(name)
        }
    }

    #[test]
    fn podium_ranks_book_count_before_score() {
        // Second reader has the higher score but fewer books.
        let list = vec![reader("a", "A", 10, 500), reader("b", "B", 30, 0)];
        let podium = podium_order(&list);
        assert_eq!(podium[0].id, "b");
        assert_eq!(podium[1].id, "a");
    }

    #[test]
    fn equal_book_counts_break_on_score() {
        let list = vec![reader("low", "Low", 20, -50), reader("high", "High", 20, 0)];
        let podium = podium_order(&list);
        assert_eq!(podium[0].score(), 200);
        assert_eq!(podium[0].id, "high");
        assert_eq!(podium[1].id, "low");
    }

    #[test]
    fn exact_ties_keep_snapshot_order() {
        let list = vec![reader("first", "F", 20, 0), reader("second", "S", 20, 0)];
        let podium = podium_order(&list);
        assert_eq!(podium[0].id, "first");
        assert_eq!(podium[1].id, "second");
    }

    #[test]
    fn invisible_readers_never_rank() {
        let mut hidden = reader("x", "Hidden", 99, 0);
        hidden.visible = false;
        let list = vec![hidden, reader("a", "A", 5, 0)];
        let board = compute(&list, true, "");
        assert!(board.top3.iter().all(|p| p.id != "x"));
        assert!(board.roster.iter().all(|p| p.id != "x"));
    }

    #[test]
    fn top3_never_exceeds_three() {
        let list: Vec<Participant> =
            (0..7).map(|i| reader(&i.to_string(), "R", i, 0)).collect();
        let board = compute(&list, true, "");
        assert_eq!(board.top3.len(), 3);
        assert_eq!(board.roster.len(), 4);
    }

    #[test]
    fn short_boards_are_not_padded() {
        let list = vec![reader("a", "A", 3, 0), reader("b", "B", 1, 0)];
        let board = compute(&list, true, "");
        assert_eq!(board.top3.len(), 2);
        assert!(board.roster.is_empty());
    }

    #[test]
    fn podium_and_roster_are_disjoint() {
        let list: Vec<Participant> =
            (0..6).map(|i| reader(&i.to_string(), "R", i * 3, 0)).collect();
        let board = compute(&list, true, "");
        for t in &board.top3 {
            assert!(board.roster.iter().all(|p| p.id != t.id));
        }
    }

    #[test]
    fn hidden_podium_yields_one_flat_score_ordered_list() {
        let list: Vec<Participant> =
            (0..6).map(|i| reader(&i.to_string(), "R", i * 3, 0)).collect();
        let board = compute(&list, false, "");
        assert_eq!(board.roster.len(), 6);
        assert!(board
            .roster
            .windows(2)
            .all(|w| w[0].score() >= w[1].score()));
    }

    #[test]
    fn roster_orders_by_score_not_books() {
        // Fewer books but a large bonus outranks on the roster.
        let list = vec![
            reader("p1", "P1", 90, 0),
            reader("p2", "P2", 80, 0),
            reader("p3", "P3", 70, 0),
            reader("books", "Books", 30, 0),
            reader("bonus", "Bonus", 10, 400),
        ];
        let board = compute(&list, true, "");
        assert_eq!(board.roster[0].id, "bonus");
        assert_eq!(board.roster[1].id, "books");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let list = vec![
            reader("a", "Elif Yilmaz", 50, 0),
            reader("b", "Can Demir", 40, 0),
            reader("c", "Selin Yildiz", 30, 0),
        ];
        let board = compute(&list, false, "yIL");
        let names: Vec<&str> = board.roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Elif Yilmaz", "Selin Yildiz"]);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let list: Vec<Participant> = (0..8)
            .map(|i| reader(&i.to_string(), &format!("R{}", i % 3), (i % 4) * 5, i as i64))
            .collect();
        let first = compute(&list, true, "r");
        let second = compute(&list, true, "r");
        assert_eq!(first, second);
    }
}
