//! The menu bar control item: a single proxy icon that divides the menu bar
//! into sections and lets the user show, hide, and expand them.

pub mod bar;
pub mod control_item;
pub mod menu;
pub mod platform;

#[cfg(test)]
mod testing;

pub use bar::StatusBar;
pub use control_item::{ControlItem, ControlItemOptions};
pub use menu::{build_menu, ActionItem, Menu, MenuItem};
pub use platform::{
    headless::{HeadlessPlatform, HeadlessStatusItem},
    Platform, StatusButton, StatusItem, StatusWindow, EXPANDED_LENGTH, STANDARD_LENGTH,
};
