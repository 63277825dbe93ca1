use crate::bar::StatusBar;
use std::fmt;
use std::rc::Rc;
use stow_core::{Modifiers, SectionName};

/// Title of the settings entry.
pub const SETTINGS_TITLE: &str = "Settings…";

/// Title of the quit entry.
pub const QUIT_TITLE: &str = "Quit";

/// Context menu shown when the control item is right-clicked.
#[derive(Clone, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

#[derive(Clone)]
pub enum MenuItem {
    Action(ActionItem),
    Separator,
}

/// A selectable menu entry.
#[derive(Clone)]
pub struct ActionItem {
    pub title: String,
    /// Key equivalent, empty for none.
    pub key_equivalent: String,
    pub modifiers: Modifiers,
    action: Rc<dyn Fn()>,
}

impl ActionItem {
    pub fn perform(&self) {
        (self.action)();
    }
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_action(
        &mut self,
        title: impl Into<String>,
        key_equivalent: impl Into<String>,
        modifiers: Modifiers,
        action: impl Fn() + 'static,
    ) {
        self.items.push(MenuItem::Action(ActionItem {
            title: title.into(),
            key_equivalent: key_equivalent.into(),
            modifiers,
            action: Rc::new(action),
        }));
    }

    pub fn push_separator(&mut self) {
        self.items.push(MenuItem::Separator);
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Titles of the entries, with `"-"` for separators.
    pub fn titles(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|item| match item {
                MenuItem::Action(action) => action.title.as_str(),
                MenuItem::Separator => "-",
            })
            .collect()
    }

    pub fn action(&self, title: &str) -> Option<&ActionItem> {
        self.items.iter().find_map(|item| match item {
            MenuItem::Action(action) if action.title == title => Some(action),
            _ => None,
        })
    }

    /// Perform the entry at `index`. Returns `false` for separators and
    /// out-of-range indices.
    pub fn perform(&self, index: usize) -> bool {
        match self.items.get(index) {
            Some(MenuItem::Action(action)) => {
                action.perform();
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.titles()).finish()
    }
}

/// Title of the toggle entry for a section called `name`.
pub fn toggle_title(name: &SectionName, is_hidden: bool) -> String {
    let verb = if is_hidden { "Show" } else { "Hide" };
    format!("{verb} \"{name}\" Section")
}

/// Build the control item context menu from `bar`'s current section state.
///
/// Entries hold weak references to `bar`; performing one after the bar is
/// gone does nothing.
pub fn build_menu(bar: &Rc<dyn StatusBar>) -> Menu {
    let mut menu = Menu::new();

    for name in [SectionName::Hidden, SectionName::AlwaysHidden] {
        let Some(section) = bar.section_named(&name) else {
            continue;
        };
        if !bar.is_section_enabled(&section) {
            continue;
        }

        let title = toggle_title(&section.name, bar.is_section_hidden(&section));
        let (key, modifiers) = section
            .hotkey
            .as_ref()
            .map(|hotkey| (hotkey.key_equivalent(), hotkey.modifiers))
            .unwrap_or_default();

        let owner = Rc::downgrade(bar);
        menu.push_action(title, key, modifiers, move || {
            if let Some(bar) = owner.upgrade() {
                bar.toggle(&section);
            }
        });
    }

    menu.push_separator();

    let owner = Rc::downgrade(bar);
    menu.push_action(SETTINGS_TITLE, ",", Modifiers::COMMAND, move || {
        if let Some(bar) = owner.upgrade() {
            bar.open_settings();
        }
    });

    menu.push_separator();

    let owner = Rc::downgrade(bar);
    menu.push_action(QUIT_TITLE, "q", Modifiers::COMMAND, move || {
        if let Some(bar) = owner.upgrade() {
            bar.quit();
        }
    });

    menu
}
