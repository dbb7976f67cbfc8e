//! Global board settings: the level table, stage imagery, podium toggle.

use bookwyrm_levels::{default_levels, Level};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// The settings singleton synchronized with the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// The administrator-defined level table. Never empty.
    pub levels: Vec<Level>,

    /// Optional image reference per level id.
    pub stage_images: BTreeMap<u32, String>,

    /// When false the podium carve-out is skipped and the board is one
    /// flat ranked list.
    pub show_podium: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            stage_images: BTreeMap::new(),
            show_podium: true,
        }
    }
}

impl Settings {
    /// Encode the settings document payload.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("settings serialization is infallible")
    }

    /// Apply a stored settings document field by field.
    ///
    /// Fields absent from the document leave the current value untouched,
    /// so documents written by older revisions stay usable. A malformed
    /// field is skipped with a warning, and an empty stored level table is
    /// ignored outright - the resolver requires at least one tier.
    pub fn apply_value(&mut self, data: &Value) {
        if let Some(raw) = data.get("levels") {
            match serde_json::from_value::<Vec<Level>>(raw.clone()) {
                Ok(levels) if levels.is_empty() => {
                    warn!("stored level table is empty; keeping current table");
                }
                Ok(levels) => self.levels = levels,
                Err(err) => warn!(%err, "stored level table is malformed; keeping current table"),
            }
        }

        if let Some(raw) = data.get("stageImages") {
            match serde_json::from_value::<BTreeMap<u32, String>>(raw.clone()) {
                Ok(images) => self.stage_images = images,
                Err(err) => warn!(%err, "stored stage images are malformed; keeping current map"),
            }
        }

        if let Some(raw) = data.get("showPodium") {
            match raw.as_bool() {
                Some(show) => self.show_podium = show,
                None => warn!("stored podium toggle is not a boolean; keeping current value"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_use_the_builtin_table() {
        let settings = Settings::default();
        assert!(!settings.levels.is_empty());
        assert!(settings.stage_images.is_empty());
        assert!(settings.show_podium);
    }

    #[test]
    fn apply_is_per_field() {
        let mut settings = Settings::default();
        let tiers = settings.levels.len();

        settings.apply_value(&json!({ "showPodium": false }));
        assert!(!settings.show_podium);
        assert_eq!(settings.levels.len(), tiers);

        settings.apply_value(&json!({ "stageImages": { "1": "egg.png" } }));
        assert_eq!(settings.stage_images.get(&1).map(String::as_str), Some("egg.png"));
        assert!(!settings.show_podium);
    }

    #[test]
    fn empty_stored_table_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_value(&json!({ "levels": [] }));
        assert!(!settings.levels.is_empty());
    }

    #[test]
    fn malformed_fields_are_skipped() {
        let mut settings = Settings::default();
        settings.apply_value(&json!({ "levels": "nope", "showPodium": 3 }));
        assert!(!settings.levels.is_empty());
        assert!(settings.show_podium);
    }

    #[test]
    fn round_trips_through_document_payload() {
        let mut settings = Settings::default();
        settings.show_podium = false;
        settings.stage_images.insert(2, "hatchling.png".to_string());

        let mut decoded = Settings::default();
        decoded.apply_value(&settings.to_value());
        assert_eq!(decoded, settings);
    }
}
