//! Editor settings.
//!
//! The CLI reads these fields from the top level of `cardkit.config.json`;
//! every field is optional.

use crate::drag::DEFAULT_DRAG_THRESHOLD;
use crate::history::DEFAULT_MAX_LEVELS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo levels kept (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Pointer travel before a press turns into a drag, in pixels
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f32,

    /// Seed for generated node ids
    #[serde(default = "default_id_seed")]
    pub id_seed: String,
}

fn default_history_limit() -> usize {
    DEFAULT_MAX_LEVELS
}

fn default_drag_threshold() -> f32 {
    DEFAULT_DRAG_THRESHOLD
}

fn default_id_seed() -> String {
    "cardkit".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            drag_threshold: default_drag_threshold(),
            id_seed: default_id_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{ "historyLimit": 5, "dragThreshold": 0, "idSeed": "survey" }"#;
        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.drag_threshold, 0.0);
        assert_eq!(config.id_seed, "survey");
    }
}
