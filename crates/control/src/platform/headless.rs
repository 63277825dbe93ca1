//! In-process menu bar used by the CLI and tests.
//!
//! Models a single screen with a menu bar along its top edge. Items are laid
//! out from their distance to the trailing screen edge, and the platform's
//! preferred-position quirk is reproduced: changing visibility or removing an
//! item deletes its preferred position.

use super::{Platform, StatusButton, StatusItem, StatusWindow, STANDARD_LENGTH};
use crate::menu::Menu;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use stow_config::{Defaults, PreferredPosition};
use stow_core::{Observable, Rect, Screen};
use stow_icons::Glyph;
use tracing::{debug, trace, warn};

/// Width of a standard-length item's button, in points.
pub const BUTTON_WIDTH: f64 = 24.0;

/// Height of the menu bar, in points.
pub const MENU_BAR_HEIGHT: f64 = 24.0;

/// Default spacing between newly inserted items.
const SLOT_SPACING: f64 = 30.0;

pub struct HeadlessPlatform {
    defaults: Defaults,
    screen: Screen,
    items: RefCell<Vec<Rc<HeadlessStatusItem>>>,
}

impl HeadlessPlatform {
    pub fn new(defaults: Defaults, screen: Screen) -> Self {
        Self {
            defaults,
            screen,
            items: RefCell::new(Vec::new()),
        }
    }

    /// Item currently in the menu bar with `autosave_name`.
    pub fn item(&self, autosave_name: &str) -> Option<Rc<HeadlessStatusItem>> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.autosave_name() == autosave_name)
            .cloned()
    }

    /// Number of items in the menu bar.
    pub fn item_count(&self) -> usize {
        self.items.borrow().len()
    }
}

impl Platform for HeadlessPlatform {
    fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    fn create_status_item(&self, length: f64) -> Rc<dyn StatusItem> {
        let offset = self.items.borrow().len() as f64 * SLOT_SPACING;
        let item = Rc::new(HeadlessStatusItem::new(
            self.defaults.clone(),
            self.screen,
            length,
            offset,
        ));
        self.items.borrow_mut().push(Rc::clone(&item));
        debug!("Inserted headless status item (length {length})");
        item
    }

    fn remove_status_item(&self, item: &Rc<dyn StatusItem>) {
        let target = Rc::as_ptr(item) as *const ();
        let removed = {
            let mut items = self.items.borrow_mut();
            let index = items
                .iter()
                .position(|candidate| Rc::as_ptr(candidate) as *const () == target);
            index.map(|index| items.remove(index))
        };

        match removed {
            Some(removed) => removed.detach(),
            None => warn!("Tried to remove a status item that is not in the menu bar"),
        }
    }
}

/// A status item in the headless menu bar.
pub struct HeadlessStatusItem {
    defaults: Defaults,
    screen: Screen,
    autosave_name: RefCell<String>,
    length: Cell<f64>,
    /// Distance of the item's trailing edge from the screen's trailing edge.
    offset: Cell<f64>,
    visible: Observable<bool>,
    button: HeadlessButton,
    window: HeadlessWindow,
    last_menu: RefCell<Option<Menu>>,
    mutations: Rc<Cell<usize>>,
}

impl HeadlessStatusItem {
    fn new(defaults: Defaults, screen: Screen, length: f64, offset: f64) -> Self {
        let mutations = Rc::new(Cell::new(0));
        let item = Self {
            defaults,
            screen,
            autosave_name: RefCell::new(String::new()),
            length: Cell::new(length),
            offset: Cell::new(offset),
            visible: Observable::new(true),
            button: HeadlessButton::new(Rc::clone(&mutations)),
            window: HeadlessWindow {
                frame: Observable::new(Rect::default()),
                screen: Observable::new(Some(screen)),
            },
            last_menu: RefCell::new(None),
            mutations,
        };
        item.window.frame.set(item.layout());
        item
    }

    /// Simulate the user dragging the item to `offset` points from the
    /// trailing screen edge. The platform records the new preferred position.
    pub fn drag_to(&self, offset: f64) {
        self.offset.set(offset);
        let name = self.autosave_name();
        if !name.is_empty() {
            PreferredPosition::set(&self.defaults, &name, Some(offset));
        }
        self.relayout();
    }

    /// Current distance from the trailing screen edge.
    pub fn offset(&self) -> f64 {
        self.offset.get()
    }

    /// Menu most recently popped up from this item.
    pub fn last_menu(&self) -> Option<Menu> {
        self.last_menu.borrow().clone()
    }

    /// Number of property writes performed on the item and its button.
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    fn width(&self) -> f64 {
        let length = self.length.get();
        if length == STANDARD_LENGTH {
            BUTTON_WIDTH
        } else {
            length.max(0.0)
        }
    }

    fn layout(&self) -> Rect {
        let frame = self.screen.frame;
        let max_x = frame.max_x() - self.offset.get();
        let width = self.width();
        Rect::new(
            max_x - width,
            frame.max_y() - MENU_BAR_HEIGHT,
            width,
            MENU_BAR_HEIGHT,
        )
    }

    fn relayout(&self) {
        let frame = self.layout();
        trace!("Headless item '{}' frame {frame:?}", self.autosave_name());
        self.window.frame.set(frame);
    }

    fn detach(&self) {
        let name = self.autosave_name();
        if !name.is_empty() {
            PreferredPosition::set(&self.defaults, &name, None);
        }
        self.window.screen.set(None);
        debug!("Removed headless status item '{name}'");
    }

    fn bump(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

impl StatusItem for HeadlessStatusItem {
    fn autosave_name(&self) -> String {
        self.autosave_name.borrow().clone()
    }

    fn set_autosave_name(&self, name: &str) {
        self.bump();
        *self.autosave_name.borrow_mut() = name.to_string();
        if let Some(offset) = PreferredPosition::get(&self.defaults, name) {
            self.offset.set(offset);
        }
        self.relayout();
    }

    fn length(&self) -> f64 {
        self.length.get()
    }

    fn set_length(&self, length: f64) {
        self.bump();
        self.length.set(length);
        self.relayout();
    }

    fn visibility(&self) -> &Observable<bool> {
        &self.visible
    }

    fn set_visible(&self, visible: bool) {
        self.bump();
        if self.visible.get() == visible {
            return;
        }

        let name = self.autosave_name();
        if visible {
            if let Some(offset) = PreferredPosition::get(&self.defaults, &name) {
                self.offset.set(offset);
            }
        }
        PreferredPosition::set(&self.defaults, &name, None);

        self.visible.set(visible);
        if visible {
            self.window.screen.set(Some(self.screen));
            self.relayout();
        } else {
            self.window.screen.set(None);
        }
    }

    fn button(&self) -> Option<&dyn StatusButton> {
        Some(&self.button)
    }

    fn window(&self) -> Option<&dyn StatusWindow> {
        Some(&self.window)
    }

    fn show_menu(&self, menu: Menu) {
        debug!(
            "Menu for '{}': {:?}",
            self.autosave_name(),
            menu.titles()
        );
        *self.last_menu.borrow_mut() = Some(menu);
    }
}

struct HeadlessButton {
    image: Cell<Option<Glyph>>,
    highlighted: Cell<bool>,
    enabled: Cell<bool>,
    mutations: Rc<Cell<usize>>,
}

impl HeadlessButton {
    fn new(mutations: Rc<Cell<usize>>) -> Self {
        Self {
            image: Cell::new(None),
            highlighted: Cell::new(false),
            enabled: Cell::new(true),
            mutations,
        }
    }

    fn bump(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

impl StatusButton for HeadlessButton {
    fn image(&self) -> Option<Glyph> {
        self.image.get()
    }

    fn set_image(&self, image: Option<Glyph>) {
        self.bump();
        if let Some(glyph) = image {
            match stow_icons::image(glyph) {
                Some(rendered) => trace!(
                    "Button image {glyph:?} ({}x{} px)",
                    rendered.pixel_width(),
                    rendered.pixel_height()
                ),
                None => warn!("No image available for {glyph:?}"),
            }
        }
        self.image.set(image);
    }

    fn is_highlighted(&self) -> bool {
        self.highlighted.get()
    }

    fn set_highlighted(&self, highlighted: bool) {
        self.bump();
        self.highlighted.set(highlighted);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.bump();
        self.enabled.set(enabled);
    }
}

struct HeadlessWindow {
    frame: Observable<Rect>,
    screen: Observable<Option<Screen>>,
}

impl StatusWindow for HeadlessWindow {
    fn frame(&self) -> &Observable<Rect> {
        &self.frame
    }

    fn screen(&self) -> &Observable<Option<Screen>> {
        &self.screen
    }
}
