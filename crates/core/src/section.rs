use crate::event::Modifiers;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a menu bar section.
///
/// The three built-in sections have fixed names; anything else is kept as a
/// custom name so configurations written by newer versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionName {
    /// Items that are never hidden. Its control item never expands.
    AlwaysVisible,
    /// Items hidden until the user shows them.
    Hidden,
    /// Items shown only on explicit request.
    AlwaysHidden,
    Custom(String),
}

impl SectionName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AlwaysVisible => "Always Visible",
            Self::Hidden => "Hidden",
            Self::AlwaysHidden => "Always Hidden",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SectionName {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Always Visible" => Self::AlwaysVisible,
            "Hidden" => Self::Hidden,
            "Always Hidden" => Self::AlwaysHidden,
            _ => Self::Custom(raw),
        }
    }
}

impl From<SectionName> for String {
    fn from(name: SectionName) -> Self {
        name.as_str().to_string()
    }
}

/// A key combination bound to a section toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkey {
    /// Key character, e.g. `"h"`.
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl Hotkey {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// Menu key equivalent for this hotkey (always lowercase; shift is
    /// carried by the modifier mask).
    pub fn key_equivalent(&self) -> String {
        self.key.to_lowercase()
    }
}

/// A section as seen by a control item: its name and optional hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: SectionName,
    pub hotkey: Option<Hotkey>,
}

impl Section {
    pub fn new(name: SectionName) -> Self {
        Self { name, hotkey: None }
    }

    #[must_use]
    pub fn with_hotkey(mut self, hotkey: Option<Hotkey>) -> Self {
        self.hotkey = hotkey;
        self
    }
}
