//! Test doubles shared by the unit tests in this crate.

use crate::bar::StatusBar;
use crate::control_item::ControlItem;
use crate::platform::headless::HeadlessPlatform;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use stow_config::Defaults;
use stow_core::{Rect, Screen, Section, SectionName};

struct Entry {
    section: Section,
    enabled: bool,
    hidden: bool,
    item: Option<String>,
}

/// Owner that records what control items ask of it.
#[derive(Default)]
pub(crate) struct TestBar {
    entries: RefCell<Vec<Entry>>,
    pub needs_save: Cell<bool>,
    pub toggled: RefCell<Vec<SectionName>>,
    pub shown: RefCell<Vec<SectionName>>,
    pub settings_opened: Cell<u32>,
    pub quit_requested: Cell<bool>,
}

impl TestBar {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add_section(&self, section: Section, enabled: bool) {
        self.entries.borrow_mut().push(Entry {
            section,
            enabled,
            hidden: false,
            item: None,
        });
    }

    pub fn set_hidden(&self, name: &SectionName, hidden: bool) {
        if let Some(entry) = self.entries.borrow_mut().iter_mut().find(|e| &e.section.name == name) {
            entry.hidden = hidden;
        }
    }

    /// Add a section controlled by `item` and make this bar its owner.
    pub fn attach(self: &Rc<Self>, section: Section, item: &ControlItem) {
        self.entries.borrow_mut().push(Entry {
            section,
            enabled: true,
            hidden: false,
            item: Some(item.autosave_name().to_string()),
        });
        let owner: Rc<dyn StatusBar> = self.clone();
        item.set_status_bar(Some(Rc::downgrade(&owner)));
    }

    fn find(&self, name: &SectionName) -> Option<Section> {
        self.entries
            .borrow()
            .iter()
            .find(|e| &e.section.name == name)
            .map(|e| e.section.clone())
    }
}

impl StatusBar for TestBar {
    fn section_for(&self, item: &ControlItem) -> Option<Section> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.item.as_deref() == Some(item.autosave_name()))
            .map(|e| e.section.clone())
    }

    fn section_named(&self, name: &SectionName) -> Option<Section> {
        self.find(name)
    }

    fn toggle(&self, section: &Section) {
        self.toggled.borrow_mut().push(section.name.clone());
        if let Some(entry) = self.entries.borrow_mut().iter_mut().find(|e| e.section == *section) {
            entry.hidden = !entry.hidden;
        }
    }

    fn show_section(&self, name: &SectionName) {
        self.shown.borrow_mut().push(name.clone());
    }

    fn is_section_enabled(&self, section: &Section) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| e.section == *section && e.enabled)
    }

    fn is_section_hidden(&self, section: &Section) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| e.section == *section && e.hidden)
    }

    fn set_needs_save(&self, needs_save: bool) {
        self.needs_save.set(needs_save);
    }

    fn open_settings(&self) {
        self.settings_opened.set(self.settings_opened.get() + 1);
    }

    fn quit(&self) {
        self.quit_requested.set(true);
    }
}

/// Headless platform on a 1440x900 screen with an isolated defaults table.
pub(crate) fn headless() -> Rc<HeadlessPlatform> {
    Rc::new(HeadlessPlatform::new(
        Defaults::new(),
        Screen::new(Rect::new(0.0, 0.0, 1440.0, 900.0)),
    ))
}
