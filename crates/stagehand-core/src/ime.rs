//! Input-method host: which node receives keyboard text, and whether the
//! on-screen keyboard is up.

use crate::node::NodeId;

pub trait InputMethod {
    /// Routes text input to `node`. Returns false if the host refuses.
    fn attach(&mut self, node: NodeId) -> bool;
    /// Stops routing text input to `node`. Returns false if `node` was not
    /// the attached receiver.
    fn detach(&mut self, node: NodeId) -> bool;
    fn set_keyboard_visible(&mut self, visible: bool);
}

/// Single-receiver IME host. Attaching a new node replaces the previous
/// receiver; the platform layer polls `keyboard_visible` to show or hide
/// its keyboard.
#[derive(Debug, Default)]
pub struct ImeDispatcher {
    attached: Option<NodeId>,
    keyboard_visible: bool,
}

impl ImeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.attached
    }

    pub fn keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }
}

impl InputMethod for ImeDispatcher {
    fn attach(&mut self, node: NodeId) -> bool {
        if self.attached == Some(node) {
            return false;
        }
        if let Some(prev) = self.attached.replace(node) {
            log::debug!("ime: {prev:?} replaced by {node:?}");
        }
        true
    }

    fn detach(&mut self, node: NodeId) -> bool {
        if self.attached != Some(node) {
            return false;
        }
        self.attached = None;
        true
    }

    fn set_keyboard_visible(&mut self, visible: bool) {
        if self.keyboard_visible != visible {
            log::debug!("ime: keyboard {}", if visible { "open" } else { "closed" });
        }
        self.keyboard_visible = visible;
    }
}
