use crate::error::StowError;
use serde::{Deserialize, Serialize};

/// Display state of a control item.
///
/// Persisted as an integer code; the codes are append-only so older saved
/// configurations keep decoding.
///
/// | State | Code |
/// |---|---|
/// | `HideItems { is_expanded: false }` | 0 |
/// | `HideItems { is_expanded: true }`  | 1 |
/// | `ShowItems`                        | 2 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ControlItemState {
    /// The section's items are hidden. When expanded, the control item grows
    /// to push the items it guards off the screen.
    HideItems { is_expanded: bool },
    #[default]
    ShowItems,
}

impl ControlItemState {
    /// Stable integer code used for serialization.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::HideItems { is_expanded: false } => 0,
            Self::HideItems { is_expanded: true } => 1,
            Self::ShowItems => 2,
        }
    }

    #[must_use]
    pub fn is_hide_items(self) -> bool {
        matches!(self, Self::HideItems { .. })
    }

    #[must_use]
    pub fn is_expanded(self) -> bool {
        matches!(self, Self::HideItems { is_expanded: true })
    }
}

impl TryFrom<i64> for ControlItemState {
    type Error = StowError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::HideItems { is_expanded: false }),
            1 => Ok(Self::HideItems { is_expanded: true }),
            2 => Ok(Self::ShowItems),
            other => Err(StowError::UnknownState(other)),
        }
    }
}

impl From<ControlItemState> for i64 {
    fn from(state: ControlItemState) -> Self {
        state.code()
    }
}
