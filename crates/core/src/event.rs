use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Keyboard modifier flags, using the platform's device-independent
    /// modifier mask bit positions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u64 {
        const CAPS_LOCK = 1 << 16;
        const SHIFT     = 1 << 17;
        const CONTROL   = 1 << 18;
        const OPTION    = 1 << 19;
        const COMMAND   = 1 << 20;
    }
}

impl Modifiers {
    /// Parse a single modifier name, e.g. `"command"` or `"shift"`.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "shift" => Some(Self::SHIFT),
            "control" | "ctrl" => Some(Self::CONTROL),
            "option" | "alt" => Some(Self::OPTION),
            "command" | "cmd" => Some(Self::COMMAND),
            "capslock" | "caps_lock" => Some(Self::CAPS_LOCK),
            _ => None,
        }
    }

    /// Names of the set flags, in a stable order.
    pub fn names(self) -> Vec<&'static str> {
        [
            (Self::CONTROL, "control"),
            (Self::OPTION, "option"),
            (Self::SHIFT, "shift"),
            (Self::COMMAND, "command"),
            (Self::CAPS_LOCK, "capslock"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}

impl Serialize for Modifiers {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(Self::empty(), |acc, name| {
            Self::parse_name(name)
                .map(|flag| acc | flag)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown modifier '{name}'")))
        })
    }
}

/// Kind of a mouse event delivered to a control item's button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    LeftMouseDown,
    LeftMouseUp,
    RightMouseDown,
    RightMouseUp,
    /// Any event kind the control item does not act on.
    Other,
}

/// A user interaction with a control item's button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: EventKind,
    /// Modifier keys held while the event was generated.
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn new(kind: EventKind, modifiers: Modifiers) -> Self {
        Self { kind, modifiers }
    }

    /// Plain left click (mouse up) with no modifiers.
    pub fn left_click() -> Self {
        Self::new(EventKind::LeftMouseUp, Modifiers::empty())
    }

    /// Plain right click (mouse up) with no modifiers.
    pub fn right_click() -> Self {
        Self::new(EventKind::RightMouseUp, Modifiers::empty())
    }
}
