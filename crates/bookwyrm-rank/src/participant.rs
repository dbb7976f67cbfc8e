//! Participant model and the built-in sample roster.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A reader tracked on the board.
///
/// The remote store is the source of truth; instances held by the engine
/// are a read-through cache of the latest snapshot. The `id` is the store
/// document id and is never written back into document data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    /// Store document id (not part of the document payload)
    #[serde(skip)]
    pub id: String,

    /// Display name; target of roster search
    pub name: String,

    /// Seed the presentation layer derives an avatar from
    pub avatar_seed: String,

    /// Cumulative books read
    pub book_count: u32,

    /// Privileged-adjustable bonus, independent of the book count
    pub bonus_score: i64,

    /// Rolling score kept for display; no ranking effect
    pub weekly_score: u32,

    /// Rolling score kept for display; no ranking effect
    pub monthly_score: u32,

    /// Rolling score kept for display; no ranking effect
    pub all_time_score: u32,

    /// Cosmetic accessory tags
    pub accessories: Vec<String>,

    /// Cosmetic badge tags
    pub badges: Vec<String>,

    /// Hidden participants are kept in storage but never ranked
    pub visible: bool,
}

impl Default for Participant {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            avatar_seed: String::new(),
            book_count: 0,
            bonus_score: 0,
            weekly_score: 0,
            monthly_score: 0,
            all_time_score: 0,
            accessories: Vec::new(),
            badges: Vec::new(),
            visible: true,
        }
    }
}

impl Participant {
    /// A fresh participant with zeroed counters, visible, with the avatar
    /// seeded from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            avatar_seed: name.clone(),
            name,
            ..Self::default()
        }
    }

    /// Derived ranking score. Never stored.
    pub fn score(&self) -> i64 {
        self.book_count as i64 * 10 + self.bonus_score
    }

    /// Decode a participant from a store document's id and payload.
    ///
    /// Missing fields take their defaults, matching documents written by
    /// older revisions of the board.
    pub fn from_value(id: impl Into<String>, data: &Value) -> Result<Self, serde_json::Error> {
        let mut participant: Participant = serde_json::from_value(data.clone())?;
        participant.id = id.into();
        Ok(participant)
    }

    /// Encode the document payload. The id is deliberately omitted.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("participant serialization is infallible")
    }
}

/// The built-in sample roster.
///
/// Used verbatim as the read-only dataset when the session degrades into
/// demo mode, and re-seeded (as fresh records) by a full board reset.
pub fn sample_roster() -> Vec<Participant> {
    let raw: [(&str, u32, u32, u32, u32, &[&str], &[&str]); 10] = [
        ("Elif Yilmaz", 112, 450, 1800, 12500, &["Glasses", "Wand", "Crown"], &["Night Owl", "Speed Reader", "Sage"]),
        ("Can Demir", 25, 520, 1650, 9800, &["Cape", "Glasses"], &["Speed Reader"]),
        ("Zeynep Ak", 75, 310, 2150, 7200, &["Wand"], &["Night Owl", "Sage"]),
        ("Mert Soylu", 15, 120, 500, 2100, &[], &["Bookworm"]),
        ("Selin Yildiz", 64, 480, 1400, 8400, &["Glasses", "Cape"], &["Speed Reader", "Sage"]),
        ("Arda Kaya", 42, 200, 850, 4500, &["Wand"], &[]),
        ("Duru Sen", 8, 90, 320, 1100, &[], &[]),
        ("Baran Oz", 55, 350, 1200, 6100, &["Crown"], &["Night Owl"]),
        ("Melis Efe", 92, 280, 1100, 9200, &["Cape", "Wand"], &["Sage"]),
        ("Kerem Bulut", 12, 150, 600, 1800, &[], &["Speed Reader"]),
    ];

    raw.iter()
        .enumerate()
        .map(|(i, (name, books, weekly, monthly, all_time, accessories, badges))| Participant {
            id: (i + 1).to_string(),
            name: name.to_string(),
            avatar_seed: name.split(' ').next().unwrap_or(name).to_string(),
            book_count: *books,
            bonus_score: 0,
            weekly_score: *weekly,
            monthly_score: *monthly,
            all_time_score: *all_time,
            accessories: accessories.iter().map(|s| s.to_string()).collect(),
            badges: badges.iter().map(|s| s.to_string()).collect(),
            visible: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn score_combines_books_and_bonus() {
        let mut p = Participant::new("Reader");
        p.book_count = 20;
        assert_eq!(p.score(), 200);
        p.bonus_score = -50;
        assert_eq!(p.score(), 150);
    }

    #[test]
    fn new_participant_is_zeroed_and_visible() {
        let p = Participant::new("Ada");
        assert_eq!(p.book_count, 0);
        assert_eq!(p.bonus_score, 0);
        assert_eq!(p.avatar_seed, "Ada");
        assert!(p.visible);
    }

    #[test]
    fn decodes_sparse_documents_with_defaults() {
        let data = json!({ "name": "Ada", "bookCount": 7 });
        let p = Participant::from_value("abc", &data).unwrap();
        assert_eq!(p.id, "abc");
        assert_eq!(p.book_count, 7);
        assert_eq!(p.bonus_score, 0);
        assert!(p.visible);
    }

    #[test]
    fn id_never_enters_the_payload() {
        let mut p = Participant::new("Ada");
        p.id = "abc".to_string();
        let value = p.to_value();
        assert!(value.get("id").is_none());
        assert_eq!(value["avatarSeed"], "Ada");
    }

    #[test]
    fn sample_roster_has_ten_visible_readers() {
        let roster = sample_roster();
        assert_eq!(roster.len(), 10);
        assert!(roster.iter().all(|p| p.visible));
        assert!(roster.iter().any(|p| p.book_count > 100));
    }
}
