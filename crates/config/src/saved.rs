use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use stow_core::{ControlItemRecord, Result, StowError};

/// Control item records written by the coordinator between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    /// When the state was last written.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub control_items: Vec<ControlItemRecord>,
}

impl SavedState {
    pub fn new(control_items: Vec<ControlItemRecord>) -> Self {
        Self {
            saved_at: Some(Utc::now()),
            control_items,
        }
    }

    /// Record for the item with `autosave_name`, if saved.
    pub fn record(&self, autosave_name: &str) -> Option<&ControlItemRecord> {
        self.control_items
            .iter()
            .find(|record| record.autosave_name == autosave_name)
    }

    /// Load saved state. Returns `SavedState::default()` when the file does
    /// not exist. A malformed file is a decode error; nothing is partially
    /// loaded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No saved state at '{}'; starting fresh.", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| StowError::Decode(format!("'{}': {e}", path.display())))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| StowError::Store(format!("cannot encode saved state: {e}")))?;
        std::fs::write(path, raw)?;
        tracing::debug!(
            "Saved {} control item(s) to '{}'",
            self.control_items.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_core::ControlItemState;

    fn record(name: &str, position: Option<f64>) -> ControlItemRecord {
        ControlItemRecord {
            autosave_name: name.into(),
            position,
            is_visible: true,
            state: ControlItemState::ShowItems,
        }
    }

    #[test]
    fn missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = SavedState::load(dir.path().join("state.json")).unwrap();
        assert!(state.control_items.is_empty());
        assert!(state.saved_at.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = SavedState::new(vec![record("SItem", Some(0.0)), record("HItem", None)]);
        state.save(&path).unwrap();

        let loaded = SavedState::load(&path).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.record("HItem").unwrap().position, None);
        assert!(loaded.record("AHItem").is_none());
    }

    #[test]
    fn bad_record_fails_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"controlItems":[
                {"autosaveName":"A","position":1.0,"isVisible":true,"state":2},
                {"autosaveName":"B","position":1.0,"isVisible":true,"state":5}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(SavedState::load(&path), Err(StowError::Decode(_))));
    }
}
