use serde::{Deserialize, Serialize};
use stow_core::{Hotkey, SectionName};

/// Root configuration structure parsed from `stow.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StowConfig {
    /// General behaviour.
    pub general: GeneralConfig,
    /// Section toggle hotkeys.
    pub hotkeys: HotkeysConfig,
    /// Geometry of the simulated display used by the headless backend.
    pub headless: HeadlessConfig,
}

/// General settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Whether the "Always Hidden" section (and its control item) is enabled.
    pub always_hidden_section_enabled: bool,
}

/// Hotkeys bound to section toggles. Unset = no key equivalent in the menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeysConfig {
    pub hidden: Option<Hotkey>,
    pub always_hidden: Option<Hotkey>,
}

impl HotkeysConfig {
    /// Hotkey configured for the section called `name`, if any.
    pub fn for_section(&self, name: &SectionName) -> Option<&Hotkey> {
        match name {
            SectionName::Hidden => self.hidden.as_ref(),
            SectionName::AlwaysHidden => self.always_hidden.as_ref(),
            _ => None,
        }
    }
}

/// Simulated display for the headless backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Screen width in points.
    pub screen_width: f64,
    /// Screen height in points.
    pub screen_height: f64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            screen_width:  1440.0,
            screen_height: 900.0,
        }
    }
}
