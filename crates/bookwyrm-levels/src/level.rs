//! Level tier model and the built-in default table.

use serde::{Deserialize, Serialize};

/// A named band of cumulative reading progress with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Unique, stable identifier
    pub id: u32,

    /// Human-readable tier title
    pub title: String,

    /// Inclusive floor: the book count at which this tier begins
    pub min_books: u32,

    /// Informational ceiling; never consulted during resolution
    pub max_books: u32,

    /// Encouragement message shown for readers at this tier
    pub message: String,

    /// Icon identifier (emoji or asset key)
    pub icon: String,

    /// Display color (hex)
    pub color: String,
}

impl Level {
    /// Create a tier with the given thresholds and empty display metadata.
    pub fn new(id: u32, title: impl Into<String>, min_books: u32, max_books: u32) -> Self {
        Self {
            id,
            title: title.into(),
            min_books,
            max_books,
            message: String::new(),
            icon: String::new(),
            color: String::new(),
        }
    }
}

/// The built-in five-tier table.
///
/// Seeds the settings document on first run and serves as the fallback
/// table whenever stored configuration is missing or empty.
pub fn default_levels() -> Vec<Level> {
    vec![
        Level {
            id: 1,
            title: "Mysterious Egg".to_string(),
            min_books: 0,
            max_books: 5,
            message: "Your adventure is about to begin! Read your first books and wake the power inside.".to_string(),
            icon: "🥚".to_string(),
            color: "#94a3b8".to_string(),
        },
        Level {
            id: 2,
            title: "Hatching Egg".to_string(),
            min_books: 6,
            max_books: 15,
            message: "You have started exploring the world! Your curiosity is cracking the shell.".to_string(),
            icon: "🐣".to_string(),
            color: "#f59e0b".to_string(),
        },
        Level {
            id: 3,
            title: "Curious Hatchling".to_string(),
            min_books: 16,
            max_books: 30,
            message: "You are a dragon now! But there is still so much to learn.".to_string(),
            icon: "🐲".to_string(),
            color: "#10b981".to_string(),
        },
        Level {
            id: 4,
            title: "Winged Sage".to_string(),
            min_books: 31,
            max_books: 50,
            message: "Your wings are growing strong! Knowledge carries you skyward.".to_string(),
            icon: "🦅".to_string(),
            color: "#6366f1".to_string(),
        },
        Level {
            id: 5,
            title: "Legendary Book Dragon".to_string(),
            min_books: 51,
            max_books: 9999,
            message: "You are a legend! Master of knowledge, keeper of libraries.".to_string(),
            icon: "👑".to_string(),
            color: "#f43f5e".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_sorted_and_starts_at_zero() {
        let levels = default_levels();
        assert!(!levels.is_empty());
        assert_eq!(levels[0].min_books, 0);
        assert!(levels.windows(2).all(|w| w[0].min_books < w[1].min_books));
    }

    #[test]
    fn default_ids_are_unique() {
        let levels = default_levels();
        for (i, a) in levels.iter().enumerate() {
            for b in &levels[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let level = Level::new(7, "Test", 3, 9);
        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json["minBooks"], 3);
        assert_eq!(json["maxBooks"], 9);
    }
}
