//! Seam between control items and the platform menu bar.
//!
//! A status item is a single-icon slot in the system menu bar. The platform
//! keeps each item's preferred position (its distance from the trailing
//! screen edge) in the [`Defaults`] table under the item's autosave name.
//!
//! Quirk: changing an item's visibility, or removing the item, deletes its
//! preferred position from the table. Callers that want to keep the
//! position must cache it before the mutation and restore it afterwards.

pub mod headless;

use crate::menu::Menu;
use std::rc::Rc;
use stow_config::Defaults;
use stow_core::{Observable, Rect, Screen};
use stow_icons::Glyph;

/// Length that sizes the item to fit its button.
pub const STANDARD_LENGTH: f64 = -1.0;

/// Length large enough to push every item to its left off the screen.
pub const EXPANDED_LENGTH: f64 = 10_000.0;

/// The platform menu bar.
pub trait Platform {
    /// Table holding preferred positions.
    fn defaults(&self) -> &Defaults;

    /// Insert a new, visible status item of `length` into the menu bar.
    fn create_status_item(&self, length: f64) -> Rc<dyn StatusItem>;

    /// Remove `item` from the menu bar. Deletes its preferred position.
    fn remove_status_item(&self, item: &Rc<dyn StatusItem>);
}

/// A status item owned by the platform menu bar.
pub trait StatusItem {
    fn autosave_name(&self) -> String;

    /// Bind the item to `name`. The platform places the item at the
    /// preferred position stored for `name`, if any.
    fn set_autosave_name(&self, name: &str);

    fn length(&self) -> f64;
    fn set_length(&self, length: f64);

    /// Visibility flag. Changes when the item is shown or hidden, whether by
    /// the app or by the system.
    fn visibility(&self) -> &Observable<bool>;

    fn is_visible(&self) -> bool {
        self.visibility().get()
    }

    /// Show or hide the item. A change deletes the preferred position.
    fn set_visible(&self, visible: bool);

    fn button(&self) -> Option<&dyn StatusButton>;

    /// Window hosting the button, if the item currently has one.
    fn window(&self) -> Option<&dyn StatusWindow>;

    /// Pop up `menu` below the item.
    fn show_menu(&self, menu: Menu);
}

/// The clickable button of a status item.
pub trait StatusButton {
    fn image(&self) -> Option<Glyph>;
    fn set_image(&self, image: Option<Glyph>);

    fn is_highlighted(&self) -> bool;
    fn set_highlighted(&self, highlighted: bool);

    /// Whether the button's cell accepts interaction.
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

/// Window hosting a status item's button.
pub trait StatusWindow {
    fn frame(&self) -> &Observable<Rect>;

    /// Screen the window is on. `None` while the window is off screen.
    fn screen(&self) -> &Observable<Option<Screen>>;
}
