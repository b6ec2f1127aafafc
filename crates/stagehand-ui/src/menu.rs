//! Touch-tracked menus.
//!
//! A [`Menu`] owns an ordered list of [`MenuItem`]s whose nodes are children
//! of the menu node. Item order is z-order and touch priority: the first
//! enabled, visible item under the touch wins.
//!
//! ```text
//!            began (hit, or swallow + inside menu)
//!   Waiting ───────────────────────────────────────▶ TrackingTouch
//!      ▲                                                 │ moved: reselect
//!      └──────────────── ended / cancelled ──────────────┘
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use stagehand_core::*;

use crate::layout;

/// Touch priority menus register with; runs ahead of default handlers.
pub const MENU_HANDLER_PRIORITY: i32 = -128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Waiting,
    TrackingTouch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuConfig {
    /// Claim touches that miss every item but land inside the menu.
    pub swallow_touches: bool,
    pub touch_priority: i32,
    pub padding: f32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            swallow_touches: false,
            touch_priority: MENU_HANDLER_PRIORITY,
            padding: layout::DEFAULT_PADDING,
        }
    }
}

impl MenuConfig {
    pub fn swallowing() -> Self {
        Self {
            swallow_touches: true,
            ..Self::default()
        }
    }

    pub fn with_touch_priority(mut self, priority: i32) -> Self {
        self.touch_priority = priority;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }
}

pub struct MenuItem {
    node: NodeId,
    enabled: bool,
    selected: bool,
    on_activate: Option<Rc<dyn Fn(NodeId)>>,
    on_selection: Option<Rc<dyn Fn(NodeId, bool)>>,
}

impl MenuItem {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            enabled: true,
            selected: false,
            on_activate: None,
            on_selection: None,
        }
    }

    /// Builds an item around a fresh node of the given size, anchored at its
    /// center like the layouts expect.
    pub fn with_size(tree: &mut NodeTree, size: Size) -> Self {
        Self::new(tree.insert(
            Node::new()
                .with_size(size)
                .with_anchor(Vec2::new(0.5, 0.5)),
        ))
    }

    pub fn on_activate(mut self, f: impl Fn(NodeId) + 'static) -> Self {
        self.on_activate = Some(Rc::new(f));
        self
    }

    /// Highlight hook: called with `true` on select and `false` on unselect.
    pub fn on_selection(mut self, f: impl Fn(NodeId, bool) + 'static) -> Self {
        self.on_selection = Some(Rc::new(f));
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn selected(&mut self) {
        self.selected = true;
        if let Some(cb) = &self.on_selection {
            cb(self.node, true);
        }
    }

    pub fn unselected(&mut self) {
        self.selected = false;
        if let Some(cb) = &self.on_selection {
            cb(self.node, false);
        }
    }

    /// Runs the bound callback. Disabled items do nothing.
    pub fn activate(&self) {
        if !self.enabled {
            return;
        }
        if let Some(cb) = &self.on_activate {
            log::debug!("menu item {:?} activated", self.node);
            cb(self.node);
        }
    }
}

pub struct Menu {
    node: NodeId,
    items: Vec<MenuItem>,
    selected: Option<NodeId>,
    enabled: bool,
    state: MenuState,
    config: MenuConfig,
    win_size: Size,
}

impl Menu {
    /// Creates an empty, window-sized menu node centered on its anchor.
    pub fn new(stage: &mut Stage, config: MenuConfig) -> Self {
        let win_size = stage.win_size();
        let mut node = Node::new()
            .with_size(win_size)
            .with_anchor(Vec2::new(0.5, 0.5));
        node.ignore_anchor_for_position = true;
        Self {
            node: stage.tree.insert(node),
            items: Vec::new(),
            selected: None,
            enabled: true,
            state: MenuState::Waiting,
            config,
            win_size,
        }
    }

    pub fn with_items(
        stage: &mut Stage,
        config: MenuConfig,
        items: impl IntoIterator<Item = MenuItem>,
    ) -> Self {
        let mut menu = Self::new(stage, config);
        for item in items {
            menu.add_item(&mut stage.tree, item);
        }
        menu
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_swallow_touches(&mut self, swallow: bool) {
        self.config.swallow_touches = swallow;
    }

    pub fn selected_item(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, id: NodeId) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.node == id)
    }

    fn item_mut(&mut self, id: NodeId) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|i| i.node == id)
    }

    fn item_nodes(&self) -> Vec<NodeId> {
        self.items.iter().map(|i| i.node).collect()
    }

    /// Appends `item` and parents its node under the menu.
    pub fn add_item(&mut self, tree: &mut NodeTree, item: MenuItem) -> bool {
        if !tree.add_child(self.node, item.node) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes the item and detaches its node. Removing the selected item
    /// clears the selection without activating anything.
    pub fn remove_item(&mut self, tree: &mut NodeTree, id: NodeId) -> Option<MenuItem> {
        let idx = self.items.iter().position(|i| i.node == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        tree.remove_child(self.node, id);
        Some(self.items.remove(idx))
    }

    /// Enables or disables one item; a disabled item cannot stay selected.
    pub fn set_item_enabled(&mut self, id: NodeId, enabled: bool) {
        let was_selected = self.selected == Some(id);
        let Some(item) = self.item_mut(id) else {
            return;
        };
        item.enabled = enabled;
        if !enabled && was_selected {
            item.unselected();
            self.selected = None;
        }
    }

    /// First enabled, visible item whose content rect contains `location`.
    /// A non-empty menu rejects touches outside its own bounds first.
    pub fn item_for_touch(&self, tree: &NodeTree, location: Vec2) -> Option<NodeId> {
        let own = tree.get(self.node)?;
        if !own.content_size.is_zero() && !tree.hit_test(self.node, location) {
            return None;
        }
        self.items
            .iter()
            .filter(|i| i.enabled && tree.get(i.node).is_some_and(|n| n.visible))
            .find(|i| tree.hit_test(i.node, location))
            .map(|i| i.node)
    }

    fn select(&mut self, id: Option<NodeId>) {
        self.selected = id;
        if let Some(item) = id.and_then(|id| self.item_mut(id)) {
            item.selected();
        }
    }

    fn unselect_current(&mut self) {
        if let Some(item) = self.selected.and_then(|id| self.item_mut(id)) {
            item.unselected();
        }
    }

    fn assert_tracking(&self, event: &str) {
        assert_eq!(
            self.state,
            MenuState::TrackingTouch,
            "menu: touch {event} while not tracking a touch"
        );
    }

    /// Resets tracking when the menu leaves the running scene.
    pub fn on_exit(&mut self) {
        if self.state == MenuState::TrackingTouch {
            self.unselect_current();
            self.selected = None;
            self.state = MenuState::Waiting;
        }
    }

    /// Installs the menu with the touch dispatcher at its configured priority.
    pub fn register(self, stage: &mut Stage) -> Rc<RefCell<Menu>> {
        let priority = self.config.touch_priority;
        let menu = shared(self);
        stage.touch_mut().add_targeted(menu.clone(), priority, true);
        menu
    }

    pub fn align_items_vertically(&self, tree: &mut NodeTree) {
        layout::align_items_vertically_with_padding(tree, &self.item_nodes(), self.config.padding);
    }

    pub fn align_items_vertically_with_padding(&self, tree: &mut NodeTree, padding: f32) {
        layout::align_items_vertically_with_padding(tree, &self.item_nodes(), padding);
    }

    pub fn align_items_horizontally(&self, tree: &mut NodeTree) {
        layout::align_items_horizontally_with_padding(tree, &self.item_nodes(), self.config.padding);
    }

    pub fn align_items_horizontally_with_padding(&self, tree: &mut NodeTree, padding: f32) {
        layout::align_items_horizontally_with_padding(tree, &self.item_nodes(), padding);
    }

    /// `rows[i]` items go in row `i`. Panics unless the counts cover every
    /// item exactly.
    pub fn align_items_in_columns(&self, tree: &mut NodeTree, rows: &[u32]) {
        layout::align_items_in_columns(tree, &self.item_nodes(), rows, self.win_size.width);
    }

    /// `columns[i]` items go in column `i`. Panics unless the counts cover
    /// every item exactly.
    pub fn align_items_in_rows(&self, tree: &mut NodeTree, columns: &[u32]) {
        layout::align_items_in_rows(tree, &self.item_nodes(), columns);
    }
}

impl TouchDelegate for Menu {
    fn node(&self) -> NodeId {
        self.node
    }

    fn touch_began(&mut self, tree: &NodeTree, touch: &Touch) -> bool {
        if self.state != MenuState::Waiting || !self.enabled || !tree.is_visible_in_tree(self.node)
        {
            return false;
        }

        if let Some(hit) = self.item_for_touch(tree, touch.location) {
            self.state = MenuState::TrackingTouch;
            self.select(Some(hit));
            return true;
        }

        self.selected = None;
        if self.config.swallow_touches && tree.hit_test(self.node, touch.location) {
            self.state = MenuState::TrackingTouch;
            return true;
        }
        false
    }

    fn touch_moved(&mut self, tree: &NodeTree, touch: &Touch) {
        self.assert_tracking("moved");
        let current = self.item_for_touch(tree, touch.location);

        if !self.enabled {
            // only drops the selection when the touch is still over it
            if current.is_some() && current == self.selected {
                self.unselect_current();
                self.selected = None;
            }
            return;
        }

        if current != self.selected {
            self.unselect_current();
            self.select(current);
        }
    }

    fn touch_ended(&mut self, _tree: &NodeTree, _touch: &Touch) {
        self.assert_tracking("ended");
        self.unselect_current();
        if self.enabled {
            if let Some(item) = self.selected.and_then(|id| self.item(id)) {
                item.activate();
            }
        }
        self.selected = None;
        self.state = MenuState::Waiting;
    }

    fn touch_cancelled(&mut self, _tree: &NodeTree, _touch: &Touch) {
        self.assert_tracking("cancelled");
        self.unselect_current();
        self.selected = None;
        self.state = MenuState::Waiting;
    }

    fn on_exit(&mut self, _tree: &NodeTree) {
        Menu::on_exit(self);
    }
}
