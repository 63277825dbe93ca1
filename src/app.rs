//! Coordinator for the headless build.
//!
//! Owns one control item per built-in section and decides what showing or
//! hiding a section means for each of them:
//! - hiding "Hidden" expands its item and collapses "Always Hidden" too
//! - showing "Always Hidden" also shows "Hidden"
//! - the "Always Visible" item mirrors the "Hidden" section and toggles it

use crate::command::{parse_command, Command};
use anyhow::{Context, Result};
use std::cell::{Cell, RefCell};
use std::io::BufRead;
use std::path::PathBuf;
use std::rc::{Rc, Weak};
use stow_config::{SavedState, StowConfig};
use stow_control::{
    ControlItem, ControlItemOptions, HeadlessPlatform, Menu, Platform, StatusBar,
};
use stow_core::{ControlItemState, EventKind, InputEvent, Modifiers, Section, SectionName};
use tracing::{debug, info, warn};

/// Autosave names of the built-in control items.
pub const ALWAYS_VISIBLE_ITEM: &str = "SItem";
pub const HIDDEN_ITEM: &str = "HItem";
pub const ALWAYS_HIDDEN_ITEM: &str = "AHItem";

const SECTIONS: [(SectionName, &str); 3] = [
    (SectionName::AlwaysVisible, ALWAYS_VISIBLE_ITEM),
    (SectionName::Hidden, HIDDEN_ITEM),
    (SectionName::AlwaysHidden, ALWAYS_HIDDEN_ITEM),
];

const HIDDEN: ControlItemState = ControlItemState::HideItems { is_expanded: true };
const COLLAPSED: ControlItemState = ControlItemState::HideItems { is_expanded: false };

struct Slot {
    section: Section,
    item: Rc<ControlItem>,
}

pub struct App {
    platform: Rc<HeadlessPlatform>,
    slots: RefCell<Vec<Slot>>,
    /// Where control item records are written. `None` keeps them in memory.
    state_path: Option<PathBuf>,
    needs_save: Cell<bool>,
    quit_requested: Cell<bool>,
    settings_requests: Cell<u32>,
    last_menu: RefCell<Option<Menu>>,
}

// ── Construction ──────────────────────────────────────────────────────────────

impl App {
    pub fn new(
        platform: Rc<HeadlessPlatform>,
        config: &StowConfig,
        saved: &SavedState,
        state_path: Option<PathBuf>,
    ) -> Rc<Self> {
        let app = Rc::new(Self {
            platform,
            slots: RefCell::new(Vec::new()),
            state_path,
            needs_save: Cell::new(false),
            quit_requested: Cell::new(false),
            settings_requests: Cell::new(0),
            last_menu: RefCell::new(None),
        });
        let owner: Rc<dyn StatusBar> = app.clone();
        let owner: Weak<dyn StatusBar> = Rc::downgrade(&owner);

        for (name, autosave_name) in SECTIONS {
            let hotkey = config.hotkeys.for_section(&name).cloned();
            let section = Section::new(name).with_hotkey(hotkey);

            let options = match saved.record(autosave_name) {
                Some(record) => ControlItemOptions::from(record.clone()),
                None => initial_options(&section.name, autosave_name),
            };
            let item = ControlItem::new(app.platform.clone(), options);

            app.slots.borrow_mut().push(Slot {
                section,
                item: Rc::clone(&item),
            });
            item.set_status_bar(Some(owner.clone()));
        }

        if let Some(item) = app.item(&SectionName::AlwaysHidden) {
            item.set_visible(config.general.always_hidden_section_enabled);
        }

        info!("Coordinator ready with {} control items", SECTIONS.len());
        app
    }

    pub fn item(&self, name: &SectionName) -> Option<Rc<ControlItem>> {
        self.slots
            .borrow()
            .iter()
            .find(|slot| &slot.section.name == name)
            .map(|slot| Rc::clone(&slot.item))
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save.get()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested.get()
    }

    pub fn settings_requests(&self) -> u32 {
        self.settings_requests.get()
    }

    fn set_state(&self, name: &SectionName, state: ControlItemState) {
        if let Some(item) = self.item(name) {
            item.set_state(state);
        }
    }

    fn hide_section(&self, name: &SectionName) {
        match name {
            SectionName::Hidden | SectionName::AlwaysVisible => {
                self.set_state(&SectionName::Hidden, HIDDEN);
                self.set_state(&SectionName::AlwaysVisible, COLLAPSED);
                self.set_state(&SectionName::AlwaysHidden, HIDDEN);
            }
            SectionName::AlwaysHidden => self.set_state(&SectionName::AlwaysHidden, HIDDEN),
            SectionName::Custom(_) => debug!("No control item for section '{name}'"),
        }
        info!("Hid section '{name}'");
    }
}

/// Options for an item with no saved record: everything but the
/// "Always Visible" section starts hidden.
fn initial_options(name: &SectionName, autosave_name: &str) -> ControlItemOptions {
    let state = match name {
        SectionName::AlwaysVisible => COLLAPSED,
        _ => HIDDEN,
    };
    ControlItemOptions {
        autosave_name: Some(autosave_name.to_string()),
        state,
        ..Default::default()
    }
}

// ── StatusBar ─────────────────────────────────────────────────────────────────

impl StatusBar for App {
    fn section_for(&self, item: &ControlItem) -> Option<Section> {
        self.slots
            .borrow()
            .iter()
            .find(|slot| slot.item.autosave_name() == item.autosave_name())
            .map(|slot| slot.section.clone())
    }

    fn section_named(&self, name: &SectionName) -> Option<Section> {
        self.slots
            .borrow()
            .iter()
            .find(|slot| &slot.section.name == name)
            .map(|slot| slot.section.clone())
    }

    fn toggle(&self, section: &Section) {
        if self.is_section_hidden(section) {
            self.show_section(&section.name);
        } else {
            self.hide_section(&section.name);
        }
    }

    fn show_section(&self, name: &SectionName) {
        match name {
            SectionName::Hidden | SectionName::AlwaysVisible => {
                self.set_state(&SectionName::Hidden, ControlItemState::ShowItems);
                self.set_state(&SectionName::AlwaysVisible, ControlItemState::ShowItems);
            }
            SectionName::AlwaysHidden => {
                let enabled = self
                    .section_named(name)
                    .is_some_and(|section| self.is_section_enabled(&section));
                if !enabled {
                    debug!("Section '{name}' is disabled; not showing it");
                    return;
                }
                self.show_section(&SectionName::Hidden);
                self.set_state(name, ControlItemState::ShowItems);
            }
            SectionName::Custom(_) => {
                debug!("No control item for section '{name}'");
                return;
            }
        }
        info!("Showed section '{name}'");
    }

    fn is_section_enabled(&self, section: &Section) -> bool {
        match section.name {
            SectionName::AlwaysVisible => true,
            _ => self
                .item(&section.name)
                .is_some_and(|item| item.is_visible()),
        }
    }

    fn is_section_hidden(&self, section: &Section) -> bool {
        self.item(&section.name)
            .is_some_and(|item| item.state().is_hide_items())
    }

    fn set_needs_save(&self, needs_save: bool) {
        self.needs_save.set(needs_save);
    }

    fn open_settings(&self) {
        self.settings_requests.set(self.settings_requests.get() + 1);
        info!("Settings requested; the headless build has no settings window");
    }

    fn quit(&self) {
        info!("Quit requested");
        self.quit_requested.set(true);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

impl App {
    /// Read commands from `input` until it ends or a quit is requested,
    /// then save.
    pub fn run(&self, input: impl BufRead) -> Result<()> {
        for line in input.lines() {
            let line = line.context("reading command")?;
            if line.trim().is_empty() {
                continue;
            }
            self.handle(parse_command(&line));
            if self.quit_requested() {
                break;
            }
        }
        self.save()?;
        Ok(())
    }

    pub fn handle(&self, command: Command) {
        debug!("Command: {command:?}");
        match command {
            Command::Click(name) => self.send(&name, InputEvent::left_click()),
            Command::OptionClick => self.send(
                &SectionName::Hidden,
                InputEvent::new(EventKind::LeftMouseUp, Modifiers::OPTION),
            ),
            Command::RightClick(name) => {
                self.send(&name, InputEvent::right_click());
                let menu = self
                    .item(&name)
                    .and_then(|item| self.platform.item(item.autosave_name()))
                    .and_then(|status_item| status_item.last_menu());
                if let Some(menu) = &menu {
                    for (index, title) in menu.titles().into_iter().enumerate() {
                        info!("  [{index}] {title}");
                    }
                }
                *self.last_menu.borrow_mut() = menu;
            }
            Command::Menu(index) => {
                let menu = self.last_menu.borrow().clone();
                match menu {
                    Some(menu) if menu.perform(index) => {}
                    Some(_) => warn!("Menu entry {index} is not selectable"),
                    None => warn!("No menu shown; right-click an item first"),
                }
            }
            Command::Drag(name, offset) => {
                let status_item = self
                    .item(&name)
                    .and_then(|item| self.platform.item(item.autosave_name()));
                match status_item {
                    Some(status_item) => status_item.drag_to(offset),
                    None => warn!("Section '{name}' has no item in the menu bar"),
                }
            }
            Command::AlwaysHidden(enabled) => {
                if let Some(item) = self.item(&SectionName::AlwaysHidden) {
                    item.set_visible(enabled);
                    info!(
                        "Section 'Always Hidden' {}",
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
            }
            Command::Status => self.log_status(),
            Command::Save => {
                if let Err(e) = self.save() {
                    warn!("Save failed: {e:#}");
                }
            }
            Command::Quit => self.quit(),
            Command::Unknown(line) => warn!("Unknown command: '{line}'"),
        }
    }

    fn send(&self, name: &SectionName, event: InputEvent) {
        match self.item(name) {
            Some(item) => item.handle_event(&event),
            None => warn!("No control item for section '{name}'"),
        }
    }

    fn log_status(&self) {
        let slots: Vec<(SectionName, Rc<ControlItem>)> = self
            .slots
            .borrow()
            .iter()
            .map(|slot| (slot.section.name.clone(), Rc::clone(&slot.item)))
            .collect();

        for (name, item) in slots {
            info!(
                "{:<15} {:<7} state={:?} visible={} position={:?}",
                name.to_string(),
                item.autosave_name(),
                item.state(),
                item.is_visible(),
                item.position()
            );
        }
        debug!("Settings requested {} time(s)", self.settings_requests());
    }

    /// Persist control item records and the defaults table when something
    /// changed since the last save. Returns whether anything was written.
    pub fn save(&self) -> Result<bool> {
        if !self.needs_save() {
            debug!("Nothing to save");
            return Ok(false);
        }

        let records = self
            .slots
            .borrow()
            .iter()
            .map(|slot| slot.item.record())
            .collect();
        if let Some(path) = &self.state_path {
            SavedState::new(records)
                .save(path)
                .with_context(|| format!("saving control items to '{}'", path.display()))?;
        }
        self.platform
            .defaults()
            .save()
            .context("saving preferred positions")?;

        self.needs_save.set(false);
        info!("Saved control item state");
        Ok(true)
    }
}
