use crate::state::ControlItemState;
use serde::{Deserialize, Deserializer, Serialize};

/// Serialized form of a control item, as stored in the saved state.
///
/// Every field is required when decoding. `position` must be present even
/// when it is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlItemRecord {
    pub autosave_name: String,
    #[serde(deserialize_with = "required_option")]
    pub position: Option<f64>,
    pub is_visible: bool,
    pub state: ControlItemState,
}

// A plain `Option` field would silently decode a missing key as `None`.
fn required_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)
}
