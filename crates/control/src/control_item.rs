use crate::bar::StatusBar;
use crate::menu::{build_menu, Menu};
use crate::platform::{Platform, StatusItem, StatusWindow, EXPANDED_LENGTH, STANDARD_LENGTH};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use stow_config::PreferredPosition;
use stow_core::{
    combine_latest, remove_duplicates, ControlItemRecord, ControlItemState, EventKind, InputEvent,
    Modifiers, Observable, Section, SectionName, Subscription,
};
use stow_icons::Glyph;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Construction parameters for a [`ControlItem`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControlItemOptions {
    /// Stable identifier. A fresh UUID when `None`.
    pub autosave_name: Option<String>,
    /// Distance from the trailing screen edge to restore the item at.
    pub position: Option<f64>,
    pub is_visible: bool,
    pub state: ControlItemState,
}

impl Default for ControlItemOptions {
    fn default() -> Self {
        Self {
            autosave_name: None,
            position: None,
            is_visible: true,
            state: ControlItemState::ShowItems,
        }
    }
}

impl From<ControlItemRecord> for ControlItemOptions {
    fn from(record: ControlItemRecord) -> Self {
        Self {
            autosave_name: Some(record.autosave_name),
            position: record.position,
            is_visible: record.is_visible,
            state: record.state,
        }
    }
}

/// A status item that divides the menu bar into sections.
///
/// The item tracks its own position in the menu bar, mirrors the platform
/// item's visibility, and redraws itself whenever its state changes.
/// It never owns its section: it asks its [`StatusBar`] owner which section
/// it controls.
pub struct ControlItem {
    this: Weak<ControlItem>,
    platform: Rc<dyn Platform>,
    autosave_name: String,
    /// `None` while removed from the menu bar.
    status_item: RefCell<Option<Rc<dyn StatusItem>>>,
    status_bar: RefCell<Option<Weak<dyn StatusBar>>>,
    position: Observable<Option<f64>>,
    is_visible: Observable<bool>,
    state: Observable<ControlItemState>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl ControlItem {
    pub fn new(platform: Rc<dyn Platform>, options: ControlItemOptions) -> Rc<Self> {
        let autosave_name = options
            .autosave_name
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let status_item =
            insert_status_item(&*platform, &autosave_name, options.position, options.is_visible);

        let item = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            platform,
            autosave_name,
            status_item: RefCell::new(Some(status_item)),
            status_bar: RefCell::new(None),
            position: Observable::new(options.position),
            is_visible: Observable::new(options.is_visible),
            state: Observable::new(options.state),
            subscriptions: RefCell::new(Vec::new()),
        });

        item.configure_status_item();
        info!(
            "Created control item '{}' (visible: {}, state: {:?})",
            item.autosave_name, options.is_visible, options.state
        );
        item
    }

    /// Recreate an item from its saved record.
    pub fn from_record(platform: Rc<dyn Platform>, record: ControlItemRecord) -> Rc<Self> {
        Self::new(platform, record.into())
    }

    /// Snapshot for the saved state.
    pub fn record(&self) -> ControlItemRecord {
        ControlItemRecord {
            autosave_name: self.autosave_name.clone(),
            position: self.position(),
            is_visible: self.is_visible(),
            state: self.state(),
        }
    }

    pub fn autosave_name(&self) -> &str {
        &self.autosave_name
    }

    /// Distance from the trailing screen edge, `None` until known.
    pub fn position(&self) -> Option<f64> {
        self.position.get()
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible.get()
    }

    /// Show or hide the item. The stored preferred position survives.
    pub fn set_visible(&self, visible: bool) {
        self.is_visible.set(visible);
    }

    pub fn state(&self) -> ControlItemState {
        self.state.get()
    }

    pub fn set_state(&self, state: ControlItemState) {
        self.state.set(state);
    }

    pub fn observe_position(&self, listener: impl Fn(&Option<f64>) + 'static) -> Subscription {
        self.position.subscribe(listener)
    }

    pub fn observe_visibility(&self, listener: impl Fn(&bool) + 'static) -> Subscription {
        self.is_visible.subscribe(listener)
    }

    pub fn observe_state(&self, listener: impl Fn(&ControlItemState) + 'static) -> Subscription {
        self.state.subscribe(listener)
    }

    pub fn status_bar(&self) -> Option<Rc<dyn StatusBar>> {
        self.status_bar.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Set the owner and resync the item's appearance.
    pub fn set_status_bar(&self, status_bar: Option<Weak<dyn StatusBar>>) {
        *self.status_bar.borrow_mut() = status_bar;
        self.update_status_item();
    }

    /// Section this item controls, according to its owner.
    pub fn section(&self) -> Option<Section> {
        self.status_bar()?.section_for(self)
    }

    pub fn is_added_to_menu_bar(&self) -> bool {
        self.status_item.borrow().is_some()
    }

    /// Bring the platform item in line with the current state and section.
    ///
    /// Properties are only written when they differ, so calling this again
    /// without a state change has no further effect.
    pub fn update_status_item(&self) {
        let Some(section) = self.section() else {
            trace!("'{}' has no section; skipping sync", self.autosave_name);
            return;
        };
        let Some(item) = self.current_status_item() else {
            return;
        };
        let state = self.state();

        let length = if section.name == SectionName::AlwaysVisible {
            STANDARD_LENGTH
        } else if state.is_expanded() {
            EXPANDED_LENGTH
        } else {
            STANDARD_LENGTH
        };
        if item.length() != length {
            item.set_length(length);
        }

        if let Some(button) = item.button() {
            if state.is_expanded() {
                // The button draws a stray highlight while the item expands.
                if button.is_enabled() {
                    button.set_enabled(false);
                }
                if button.is_highlighted() {
                    button.set_highlighted(false);
                }
                if button.image().is_some() {
                    button.set_image(None);
                }
            } else {
                if !button.is_enabled() {
                    button.set_enabled(true);
                }
                if let Some(glyph) = glyph_for(&section.name, state) {
                    if button.image() != Some(glyph) {
                        button.set_image(Some(glyph));
                    }
                }
            }
        }

        debug!(
            "Synced '{}' ({}, {state:?}, length {length})",
            self.autosave_name, section.name
        );
        self.mark_needs_save();
    }

    /// React to a click on the item's button.
    pub fn handle_event(&self, event: &InputEvent) {
        match event.kind {
            EventKind::LeftMouseUp => {
                let Some(bar) = self.status_bar() else {
                    return;
                };
                if event.modifiers == Modifiers::OPTION {
                    bar.show_section(&SectionName::AlwaysHidden);
                } else if let Some(section) = bar.section_for(self) {
                    bar.toggle(&section);
                }
            }
            EventKind::RightMouseUp => {
                let (Some(item), Some(menu)) = (self.current_status_item(), self.create_menu())
                else {
                    return;
                };
                item.show_menu(menu);
            }
            _ => {}
        }
    }

    /// Context menu for the current section state. `None` without an owner.
    pub fn create_menu(&self) -> Option<Menu> {
        self.status_bar().map(|bar| build_menu(&bar))
    }

    /// Remove the platform item from the menu bar, keeping the preferred
    /// position the platform would otherwise delete.
    pub fn remove_from_menu_bar(&self) {
        let Some(item) = self.status_item.borrow_mut().take() else {
            return;
        };
        self.cancel_subscriptions();

        let defaults = self.platform.defaults();
        let cached = PreferredPosition::get(defaults, &self.autosave_name);
        self.platform.remove_status_item(&item);
        PreferredPosition::set(defaults, &self.autosave_name, cached);

        info!("Removed control item '{}' from the menu bar", self.autosave_name);
    }

    /// Insert a fresh platform item at the stored preferred position and
    /// rewire observation. No-op when already in the menu bar.
    pub fn add_to_menu_bar(&self) {
        if self.is_added_to_menu_bar() {
            return;
        }

        let position =
            PreferredPosition::get(self.platform.defaults(), &self.autosave_name).or(self.position());
        let item = insert_status_item(
            &*self.platform,
            &self.autosave_name,
            position,
            self.is_visible(),
        );
        *self.status_item.borrow_mut() = Some(item);
        self.configure_status_item();

        info!("Added control item '{}' to the menu bar", self.autosave_name);
    }

    fn current_status_item(&self) -> Option<Rc<dyn StatusItem>> {
        self.status_item.borrow().clone()
    }

    fn mark_needs_save(&self) {
        if let Some(bar) = self.status_bar() {
            bar.set_needs_save(true);
        }
    }

    fn cancel_subscriptions(&self) {
        let stale = std::mem::take(&mut *self.subscriptions.borrow_mut());
        for mut subscription in stale {
            subscription.cancel();
        }
    }

    /// Wire observation of the current platform item. Any previous
    /// subscriptions are cancelled first.
    fn configure_status_item(&self) {
        self.cancel_subscriptions();
        let Some(item) = self.current_status_item() else {
            return;
        };

        let mut subscriptions = Vec::new();

        if let Some(window) = item.window() {
            subscriptions.push(self.observe_window(&item, window));
        }

        let this = self.this.clone();
        subscriptions.push(item.visibility().subscribe(remove_duplicates(
            move |visible: &bool| {
                // Skip the echo of a change this item is applying itself.
                if let Some(this) = this.upgrade().filter(|this| this.is_visible() != *visible) {
                    this.is_visible.set(*visible);
                }
            },
        )));

        let this = self.this.clone();
        subscriptions.push(self.is_visible.subscribe(remove_duplicates(
            move |visible: &bool| {
                if let Some(this) = this.upgrade() {
                    this.apply_visibility(*visible);
                }
            },
        )));

        // The initial emission performs the first visual sync.
        let this = self.this.clone();
        subscriptions.push(self.state.subscribe(move |_| {
            if let Some(this) = this.upgrade() {
                this.update_status_item();
            }
        }));

        *self.subscriptions.borrow_mut() = subscriptions;
    }

    /// Publish the item's distance from the trailing screen edge whenever
    /// its window moves, while it has standard length and is on screen.
    fn observe_window(&self, item: &Rc<dyn StatusItem>, window: &dyn StatusWindow) -> Subscription {
        let this = self.this.clone();
        let publish = remove_duplicates(move |position: &f64| {
            if let Some(this) = this.upgrade() {
                trace!("'{}' position {position}", this.autosave_name);
                this.position.set(Some(*position));
            }
        });

        let item = Rc::downgrade(item);
        combine_latest(window.frame(), window.screen(), move |frame, screen| {
            let Some(item) = item.upgrade() else {
                return;
            };
            if item.length() != STANDARD_LENGTH {
                return;
            }
            let Some(screen) = screen else {
                return;
            };
            if !frame.intersects(&screen.frame) {
                return;
            }
            publish(&(screen.frame.max_x() - frame.max_x()));
        })
    }

    fn apply_visibility(&self, visible: bool) {
        let Some(item) = self.current_status_item() else {
            return;
        };

        let defaults = self.platform.defaults();
        let cached = PreferredPosition::get(defaults, &self.autosave_name);
        item.set_visible(visible);
        PreferredPosition::set(defaults, &self.autosave_name, cached);

        debug!("'{}' visible: {visible}", self.autosave_name);
        self.mark_needs_save();
    }
}

impl Drop for ControlItem {
    fn drop(&mut self) {
        self.remove_from_menu_bar();
    }
}

impl fmt::Debug for ControlItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlItem")
            .field("autosave_name", &self.autosave_name)
            .field("position", &self.position())
            .field("is_visible", &self.is_visible())
            .field("state", &self.state())
            .field("is_added_to_menu_bar", &self.is_added_to_menu_bar())
            .finish()
    }
}

/// Create a platform item for `autosave_name` with `position` as its
/// preferred position.
fn insert_status_item(
    platform: &dyn Platform,
    autosave_name: &str,
    position: Option<f64>,
    is_visible: bool,
) -> Rc<dyn StatusItem> {
    let defaults = platform.defaults();
    if is_visible {
        // The platform only honours a preferred position that exists before
        // the item becomes visible.
        PreferredPosition::set(defaults, autosave_name, position);
        let item = platform.create_status_item(0.0);
        item.set_autosave_name(autosave_name);
        item.set_visible(true);
        item
    } else {
        // Hiding the item erases its preferred position, so write it after.
        let item = platform.create_status_item(0.0);
        item.set_autosave_name(autosave_name);
        item.set_visible(false);
        PreferredPosition::set(defaults, autosave_name, position);
        item
    }
}

/// Button image for an item of section `name` in `state`. `None` means leave
/// the current image alone.
fn glyph_for(name: &SectionName, state: ControlItemState) -> Option<Glyph> {
    match name {
        SectionName::Hidden => Some(Glyph::LargeChevron),
        SectionName::AlwaysHidden => Some(Glyph::SmallChevron),
        SectionName::AlwaysVisible => Some(if state.is_hide_items() {
            Glyph::CircleFilled
        } else {
            Glyph::CircleStroked
        }),
        SectionName::Custom(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessPlatform;
    use crate::platform::StatusButton;
    use crate::testing::{headless, TestBar};
    use std::cell::RefCell;

    fn item_named(platform: &Rc<HeadlessPlatform>, name: &str, options: ControlItemOptions) -> Rc<ControlItem> {
        ControlItem::new(
            platform.clone(),
            ControlItemOptions {
                autosave_name: Some(name.into()),
                ..options
            },
        )
    }

    fn stored(platform: &HeadlessPlatform, name: &str) -> Option<f64> {
        PreferredPosition::get(platform.defaults(), name)
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn generates_autosave_name() {
        let platform = headless();
        let item = ControlItem::new(platform.clone(), ControlItemOptions::default());
        assert!(Uuid::parse_str(item.autosave_name()).is_ok());
        assert!(item.is_visible());
        assert_eq!(item.state(), ControlItemState::ShowItems);
        assert!(platform.item(item.autosave_name()).is_some());
    }

    #[test]
    fn visible_item_keeps_position_in_store() {
        let platform = headless();
        let item = item_named(
            &platform,
            "Visible",
            ControlItemOptions {
                position: Some(180.0),
                ..Default::default()
            },
        );

        assert_eq!(stored(&platform, "Visible"), Some(180.0));
        assert_eq!(platform.item("Visible").unwrap().offset(), 180.0);
        assert_eq!(item.position(), Some(180.0));
    }

    #[test]
    fn invisible_item_keeps_position_when_shown() {
        let platform = headless();
        let item = item_named(
            &platform,
            "Invisible",
            ControlItemOptions {
                position: Some(64.0),
                is_visible: false,
                ..Default::default()
            },
        );
        assert!(!item.is_visible());
        assert!(!platform.item("Invisible").unwrap().is_visible());
        assert_eq!(stored(&platform, "Invisible"), Some(64.0));

        item.set_visible(true);
        assert!(platform.item("Invisible").unwrap().is_visible());
        assert_eq!(stored(&platform, "Invisible"), Some(64.0));
        assert_eq!(platform.item("Invisible").unwrap().offset(), 64.0);
    }

    #[test]
    fn hiding_preserves_position() {
        let platform = headless();
        let item = item_named(
            &platform,
            "Item",
            ControlItemOptions {
                position: Some(12.0),
                ..Default::default()
            },
        );
        item.set_visible(false);
        assert_eq!(stored(&platform, "Item"), Some(12.0));
        item.set_visible(true);
        assert_eq!(stored(&platform, "Item"), Some(12.0));
    }

    #[test]
    fn zero_position_is_not_absent() {
        let platform = headless();
        let _item = item_named(
            &platform,
            "Edge",
            ControlItemOptions {
                position: Some(0.0),
                is_visible: false,
                ..Default::default()
            },
        );
        assert_eq!(stored(&platform, "Edge"), Some(0.0));
    }

    // ── Observation ───────────────────────────────────────────────────────────

    #[test]
    fn position_follows_window_and_suppresses_duplicates() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(
            &platform,
            "Hidden",
            ControlItemOptions {
                position: Some(10.0),
                ..Default::default()
            },
        );
        bar.attach(Section::new(SectionName::Hidden), &item);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = item.observe_position(move |p| sink.borrow_mut().push(*p));

        let headless = platform.item("Hidden").unwrap();
        headless.drag_to(50.0);
        headless.drag_to(50.0);

        assert_eq!(*seen.borrow(), vec![Some(10.0), Some(50.0)]);
        assert_eq!(item.position(), Some(50.0));
    }

    #[test]
    fn position_not_published_without_standard_length() {
        let platform = headless();
        let item = item_named(
            &platform,
            "Unassigned",
            ControlItemOptions {
                position: Some(20.0),
                ..Default::default()
            },
        );
        // No section yet, so the item still has its initial zero length.
        platform.item("Unassigned").unwrap().drag_to(300.0);
        assert_eq!(item.position(), Some(20.0));
    }

    #[test]
    fn position_not_published_while_expanded() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(
            &platform,
            "Hidden",
            ControlItemOptions {
                position: Some(40.0),
                state: ControlItemState::HideItems { is_expanded: true },
                ..Default::default()
            },
        );
        bar.attach(Section::new(SectionName::Hidden), &item);

        platform.item("Hidden").unwrap().drag_to(90.0);
        assert_eq!(item.position(), Some(40.0));
    }

    #[test]
    fn platform_visibility_is_mirrored() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);
        bar.needs_save.set(false);

        platform.item("Item").unwrap().set_visible(false);
        assert!(!item.is_visible());
        assert!(bar.needs_save.get());
    }

    #[test]
    fn repeated_visibility_is_not_reapplied() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);
        bar.needs_save.set(false);

        let headless = platform.item("Item").unwrap();
        let before = headless.mutation_count();
        item.set_visible(true);
        item.set_visible(true);
        assert_eq!(headless.mutation_count(), before);
        assert!(!bar.needs_save.get());
    }

    #[test]
    fn observers_see_visibility_and_state_changes() {
        let platform = headless();
        let item = item_named(&platform, "Item", ControlItemOptions::default());

        let visibility = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&visibility);
        let visibility_sub = item.observe_visibility(move |v| sink.borrow_mut().push(*v));

        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&states);
        let _state_sub = item.observe_state(move |s| sink.borrow_mut().push(*s));

        item.set_visible(false);
        item.set_state(ControlItemState::HideItems { is_expanded: false });
        drop(visibility_sub);
        item.set_visible(true);

        assert_eq!(*visibility.borrow(), vec![true, false]);
        assert_eq!(
            *states.borrow(),
            vec![
                ControlItemState::ShowItems,
                ControlItemState::HideItems { is_expanded: false }
            ]
        );
    }

    #[test]
    fn reconfiguring_replaces_observers() {
        let platform = headless();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        let first = platform.item("Item").unwrap();
        assert_eq!(first.visibility().listener_count(), 1);

        item.remove_from_menu_bar();
        assert!(!item.is_added_to_menu_bar());
        assert_eq!(first.visibility().listener_count(), 0);

        item.add_to_menu_bar();
        item.add_to_menu_bar();
        let second = platform.item("Item").unwrap();
        assert_eq!(second.visibility().listener_count(), 1);
        assert_eq!(platform.item_count(), 1);
    }

    #[test]
    fn removal_preserves_position() {
        let platform = headless();
        let item = item_named(
            &platform,
            "Item",
            ControlItemOptions {
                position: Some(99.0),
                ..Default::default()
            },
        );
        item.remove_from_menu_bar();
        assert_eq!(stored(&platform, "Item"), Some(99.0));

        item.add_to_menu_bar();
        assert_eq!(platform.item("Item").unwrap().offset(), 99.0);
    }

    #[test]
    fn drop_removes_item_and_preserves_position() {
        let platform = headless();
        let item = item_named(
            &platform,
            "Item",
            ControlItemOptions {
                position: Some(33.0),
                ..Default::default()
            },
        );
        drop(item);
        assert_eq!(platform.item_count(), 0);
        assert_eq!(stored(&platform, "Item"), Some(33.0));
    }

    // ── Visual sync ───────────────────────────────────────────────────────────

    #[test]
    fn sync_without_section_is_noop() {
        let platform = headless();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        let headless = platform.item("Item").unwrap();
        let before = headless.mutation_count();
        item.update_status_item();
        assert_eq!(headless.mutation_count(), before);
        assert_eq!(headless.length(), 0.0);
    }

    #[test]
    fn sync_is_idempotent() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);

        let headless = platform.item("Item").unwrap();
        item.update_status_item();
        let after_first = headless.mutation_count();
        item.update_status_item();
        assert_eq!(headless.mutation_count(), after_first);
        assert!(bar.needs_save.get());
    }

    #[test]
    fn always_visible_never_expands() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::AlwaysVisible), &item);

        item.set_state(ControlItemState::HideItems { is_expanded: true });
        let headless = platform.item("Item").unwrap();
        assert_eq!(headless.length(), STANDARD_LENGTH);
        assert!(!headless.button().unwrap().is_enabled());
        assert_eq!(headless.button().unwrap().image(), None);
    }

    #[test]
    fn expanded_hidden_item_blanks_button() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);

        let headless = platform.item("Item").unwrap();
        let button = headless.button().unwrap();
        button.set_highlighted(true);
        assert_eq!(button.image(), Some(Glyph::LargeChevron));

        item.set_state(ControlItemState::HideItems { is_expanded: true });
        assert_eq!(headless.length(), EXPANDED_LENGTH);
        assert!(!button.is_enabled());
        assert!(!button.is_highlighted());
        assert_eq!(button.image(), None);

        item.set_state(ControlItemState::HideItems { is_expanded: false });
        assert_eq!(headless.length(), STANDARD_LENGTH);
        assert!(button.is_enabled());
        assert_eq!(button.image(), Some(Glyph::LargeChevron));
    }

    #[test]
    fn image_follows_section_kind() {
        let platform = headless();
        let bar = TestBar::new();
        let hidden = item_named(&platform, "H", ControlItemOptions::default());
        let always_hidden = item_named(&platform, "AH", ControlItemOptions::default());
        let always_visible = item_named(&platform, "AV", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &hidden);
        bar.attach(Section::new(SectionName::AlwaysHidden), &always_hidden);
        bar.attach(Section::new(SectionName::AlwaysVisible), &always_visible);

        let image = |name: &str| platform.item(name).unwrap().button().unwrap().image();
        assert_eq!(image("H"), Some(Glyph::LargeChevron));
        assert_eq!(image("AH"), Some(Glyph::SmallChevron));
        assert_eq!(image("AV"), Some(Glyph::CircleStroked));

        always_visible.set_state(ControlItemState::HideItems { is_expanded: false });
        assert_eq!(image("AV"), Some(Glyph::CircleFilled));
    }

    #[test]
    fn custom_section_leaves_image_unchanged() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        platform
            .item("Item")
            .unwrap()
            .button()
            .unwrap()
            .set_image(Some(Glyph::SmallChevron));

        bar.attach(Section::new(SectionName::Custom("Overflow".into())), &item);
        let headless = platform.item("Item").unwrap();
        assert_eq!(headless.button().unwrap().image(), Some(Glyph::SmallChevron));
        assert_eq!(headless.length(), STANDARD_LENGTH);
    }

    // ── Interaction ───────────────────────────────────────────────────────────

    #[test]
    fn left_click_toggles_section() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);

        item.handle_event(&InputEvent::left_click());
        assert_eq!(*bar.toggled.borrow(), vec![SectionName::Hidden]);
        assert!(bar.shown.borrow().is_empty());
    }

    #[test]
    fn option_click_shows_always_hidden() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);

        item.handle_event(&InputEvent::new(EventKind::LeftMouseUp, Modifiers::OPTION));
        assert_eq!(*bar.shown.borrow(), vec![SectionName::AlwaysHidden]);
        assert!(bar.toggled.borrow().is_empty());
    }

    #[test]
    fn click_without_section_or_owner_is_noop() {
        let platform = headless();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        item.handle_event(&InputEvent::left_click());
        item.handle_event(&InputEvent::right_click());
        assert!(platform.item("Item").unwrap().last_menu().is_none());

        let bar = TestBar::new();
        let owner: Rc<dyn StatusBar> = bar.clone();
        item.set_status_bar(Some(Rc::downgrade(&owner)));
        item.handle_event(&InputEvent::left_click());
        assert!(bar.toggled.borrow().is_empty());
    }

    #[test]
    fn unhandled_events_are_ignored() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);

        for kind in [EventKind::LeftMouseDown, EventKind::RightMouseDown, EventKind::Other] {
            item.handle_event(&InputEvent::new(kind, Modifiers::empty()));
        }
        assert!(bar.toggled.borrow().is_empty());
        assert!(platform.item("Item").unwrap().last_menu().is_none());
    }

    #[test]
    fn right_click_shows_menu_reflecting_visibility() {
        let platform = headless();
        let bar = TestBar::new();
        let item = item_named(&platform, "Item", ControlItemOptions::default());
        bar.attach(Section::new(SectionName::Hidden), &item);
        assert_eq!(item.state(), ControlItemState::ShowItems);

        item.handle_event(&InputEvent::right_click());
        let menu = platform.item("Item").unwrap().last_menu().unwrap();
        assert!(menu.action("Hide \"Hidden\" Section").is_some());

        menu.perform(0);
        assert_eq!(*bar.toggled.borrow(), vec![SectionName::Hidden]);
    }

    // ── Serialization ─────────────────────────────────────────────────────────

    #[test]
    fn record_round_trips_through_item() {
        let platform = headless();
        let record = ControlItemRecord {
            autosave_name: "AHItem".into(),
            position: Some(210.0),
            is_visible: false,
            state: ControlItemState::HideItems { is_expanded: true },
        };
        let json = serde_json::to_string(&record).unwrap();
        let decoded: ControlItemRecord = serde_json::from_str(&json).unwrap();
        let item = ControlItem::from_record(platform.clone(), decoded);

        assert_eq!(item.record(), record);
    }
}
