pub mod error;
pub mod event;
pub mod geometry;
pub mod observe;
pub mod record;
pub mod section;
pub mod state;

pub use error::{Result, StowError};
pub use event::{EventKind, InputEvent, Modifiers};
pub use geometry::{Rect, Screen};
pub use observe::{combine_latest, remove_duplicates, Observable, Subscription};
pub use record::ControlItemRecord;
pub use section::{Hotkey, Section, SectionName};
pub use state::ControlItemState;
