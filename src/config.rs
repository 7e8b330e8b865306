//! Board configuration.
//!
//! Loaded from TOML; every field has a default, so an empty file is valid:
//!
//! ```toml
//! initial_batch = 6
//! step = 1
//! cancel_keys = ["Escape", "Esc"]
//! editor_policy = "concurrent"
//! filters = ["everything", "future", "present", "past"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

pub const INITIAL_BATCH: usize = 6;
pub const STEP: usize = 1;

/// How many edit forms may be open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorPolicy {
    /// Every waypoint edits independently; one cancel key closes all open forms.
    #[default]
    Concurrent,
    /// Opening a form first closes any other open form.
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Waypoints rendered when the board is built.
    pub initial_batch: usize,
    /// Waypoints revealed per "reveal more" interaction.
    pub step: usize,
    /// Key names that close an open edit form.
    pub cancel_keys: Vec<String>,
    pub editor_policy: EditorPolicy,
    /// Filter names shown in the filters bar; the first one starts checked.
    pub filters: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            initial_batch: INITIAL_BATCH,
            step: STEP,
            cancel_keys: vec!["Escape".to_string(), "Esc".to_string()],
            editor_policy: EditorPolicy::default(),
            filters: ["everything", "future", "present", "past"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl BoardConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(BoardError::Config("step must be at least 1".to_string()));
        }
        if self.cancel_keys.iter().all(|key| key.trim().is_empty()) {
            return Err(BoardError::Config("cancel_keys must name at least one key".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.initial_batch, 6);
        assert_eq!(config.step, 1);
        assert_eq!(config.cancel_keys, vec!["Escape", "Esc"]);
        assert_eq!(config.editor_policy, EditorPolicy::Concurrent);
        assert_eq!(config.filters.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = BoardConfig::from_toml_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = BoardConfig::from_toml_str("step = 3\neditor_policy = \"single\"\n").unwrap();
        assert_eq!(config.step, 3);
        assert_eq!(config.initial_batch, 6);
        assert_eq!(config.editor_policy, EditorPolicy::Single);
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(matches!(
            BoardConfig::from_toml_str("step = 0"),
            Err(BoardError::Config(_))
        ));
    }

    #[test]
    fn test_empty_cancel_keys_rejected() {
        assert!(matches!(
            BoardConfig::from_toml_str("cancel_keys = []"),
            Err(BoardError::Config(_))
        ));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            BoardConfig::from_toml_str("step = \"many\""),
            Err(BoardError::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_batch = 2").unwrap();
        writeln!(file, "cancel_keys = [\"q\"]").unwrap();

        let config = BoardConfig::load(file.path()).unwrap();
        assert_eq!(config.initial_batch, 2);
        assert_eq!(config.cancel_keys, vec!["q"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            BoardConfig::load("/definitely/not/here.toml"),
            Err(BoardError::Io(_))
        ));
    }
}
