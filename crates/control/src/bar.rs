use crate::control_item::ControlItem;
use stow_core::{Section, SectionName};

/// The coordinator that owns control items and their sections.
///
/// Control items hold only a weak reference to their owner, so every call
/// here must tolerate re-entrant calls back into the item (e.g. `toggle`
/// changing the item's state, which resyncs it and asks for its section).
/// Implementations must not hold interior borrows across such calls.
pub trait StatusBar {
    /// Section `item` controls, if it has been assigned one.
    fn section_for(&self, item: &ControlItem) -> Option<Section>;

    fn section_named(&self, name: &SectionName) -> Option<Section>;

    /// Show `section` if it is hidden, hide it otherwise.
    fn toggle(&self, section: &Section);

    fn show_section(&self, name: &SectionName);

    fn is_section_enabled(&self, section: &Section) -> bool;

    fn is_section_hidden(&self, section: &Section) -> bool;

    /// Flag that control item state changed and should be persisted.
    fn set_needs_save(&self, needs_save: bool);

    /// Open the settings window.
    fn open_settings(&self);

    /// Terminate the app.
    fn quit(&self);
}
