pub mod defaults;
pub mod saved;
pub mod schema;

pub use defaults::{Defaults, PreferredPosition};
pub use saved::SavedState;
pub use schema::{GeneralConfig, HeadlessConfig, HotkeysConfig, StowConfig};

use std::path::{Path, PathBuf};
use stow_core::{Result, StowError};

/// Read `stow.toml` at `path`. A missing file yields the built-in settings.
pub fn load(path: impl AsRef<Path>) -> Result<StowConfig> {
    let path = path.as_ref();
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("No settings at '{}'; using built-in settings.", path.display());
            return Ok(StowConfig::default());
        }
        Err(e) => {
            return Err(StowError::Config(format!(
                "cannot read settings '{}': {e}",
                path.display()
            )))
        }
    };

    toml::from_str(&raw)
        .map_err(|e| StowError::Config(format!("invalid settings in '{}': {e}", path.display())))
}

/// Directory holding the config file, saved state and defaults table,
/// honouring `$XDG_CONFIG_HOME`.
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("stowbar")
}

/// Return the default config path.
pub fn default_path() -> PathBuf {
    config_dir().join("stow.toml")
}

/// Return the saved control item state path.
pub fn state_path() -> PathBuf {
    config_dir().join("state.json")
}

/// Return the defaults table path.
pub fn defaults_path() -> PathBuf {
    config_dir().join("defaults.json")
}
