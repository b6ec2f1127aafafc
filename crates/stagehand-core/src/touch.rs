//! Touch input and targeted dispatch.
//!
//! Delegates register with a priority (lower runs first) and a swallow flag.
//! A delegate that claims a touch in `touch_began` receives that touch's
//! moves, end or cancel; a swallowing claim hides the touch from every
//! delegate after it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::node::{NodeId, NodeTree};
use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TouchId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    pub id: TouchId,
    /// World-space location.
    pub location: Vec2,
}

impl Touch {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id: TouchId(id),
            location: Vec2::new(x, y),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

pub trait TouchDelegate {
    /// Node whose subtree this delegate belongs to.
    fn node(&self) -> NodeId;
    /// Returns true to claim the touch.
    fn touch_began(&mut self, tree: &NodeTree, touch: &Touch) -> bool;
    fn touch_moved(&mut self, tree: &NodeTree, touch: &Touch);
    fn touch_ended(&mut self, tree: &NodeTree, touch: &Touch);
    fn touch_cancelled(&mut self, tree: &NodeTree, touch: &Touch);
    /// The delegate's scene left the stage. Touches it had claimed are
    /// already dropped and will not be routed to it again.
    fn on_exit(&mut self, _tree: &NodeTree) {}
}

pub type SharedDelegate = Rc<RefCell<dyn TouchDelegate>>;

struct Registration {
    delegate: SharedDelegate,
    priority: i32,
    swallows: bool,
    claimed: Vec<TouchId>,
}

pub struct TouchDispatcher {
    enabled: bool,
    registrations: Vec<Registration>,
}

impl Default for TouchDispatcher {
    fn default() -> Self {
        Self {
            enabled: true,
            registrations: Vec::new(),
        }
    }
}

impl TouchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registers a targeted delegate. Equal priorities keep insertion order.
    pub fn add_targeted(&mut self, delegate: SharedDelegate, priority: i32, swallows: bool) {
        let idx = self
            .registrations
            .iter()
            .position(|r| r.priority > priority)
            .unwrap_or(self.registrations.len());
        self.registrations.insert(
            idx,
            Registration {
                delegate,
                priority,
                swallows,
                claimed: Vec::new(),
            },
        );
    }

    pub fn remove(&mut self, delegate: &SharedDelegate) {
        self.registrations
            .retain(|r| !Rc::ptr_eq(&r.delegate, delegate));
    }

    /// Drops the touches claimed by delegates in the subtree rooted at
    /// `root` (or whose node no longer exists) and tells them they exited.
    pub fn exit_delegates_under(&mut self, tree: &NodeTree, root: NodeId) {
        for r in &mut self.registrations {
            let node = r.delegate.borrow().node();
            if tree.contains(node) && !tree.is_descendant_or_self(node, root) {
                continue;
            }
            if !r.claimed.is_empty() {
                log::debug!("dropping {} claimed touch(es) of {node:?}", r.claimed.len());
                r.claimed.clear();
            }
            r.delegate.borrow_mut().on_exit(tree);
        }
    }

    /// Exits and drops every delegate whose node lies in the subtree rooted
    /// at `root` (or no longer exists).
    pub fn remove_delegates_under(&mut self, tree: &NodeTree, root: NodeId) {
        self.exit_delegates_under(tree, root);
        let before = self.registrations.len();
        self.registrations.retain(|r| {
            let node = r.delegate.borrow().node();
            tree.contains(node) && !tree.is_descendant_or_self(node, root)
        });
        let removed = before - self.registrations.len();
        if removed > 0 {
            log::debug!("detached {removed} touch delegate(s) under {root:?}");
        }
    }

    /// Routes one touch event. Returns true when some delegate claimed or
    /// was tracking the touch.
    pub fn dispatch(&mut self, tree: &NodeTree, phase: TouchPhase, touch: &Touch) -> bool {
        if !self.enabled {
            log::debug!("touch {:?} dropped: dispatch disabled", touch.id);
            return false;
        }

        match phase {
            TouchPhase::Began => {
                let mut claimed_any = false;
                for r in &mut self.registrations {
                    if r.delegate.borrow_mut().touch_began(tree, touch) {
                        r.claimed.push(touch.id);
                        claimed_any = true;
                        if r.swallows {
                            break;
                        }
                    }
                }
                claimed_any
            }
            TouchPhase::Moved | TouchPhase::Ended | TouchPhase::Cancelled => {
                let mut routed = false;
                for r in &mut self.registrations {
                    let Some(pos) = r.claimed.iter().position(|&id| id == touch.id) else {
                        continue;
                    };
                    routed = true;
                    let mut d = r.delegate.borrow_mut();
                    match phase {
                        TouchPhase::Moved => d.touch_moved(tree, touch),
                        TouchPhase::Ended => {
                            d.touch_ended(tree, touch);
                            r.claimed.remove(pos);
                        }
                        _ => {
                            d.touch_cancelled(tree, touch);
                            r.claimed.remove(pos);
                        }
                    }
                }
                if !routed {
                    log::warn!("touch {:?} {:?} with no tracking delegate", touch.id, phase);
                }
                routed
            }
        }
    }

    /// Cancels every tracked touch, e.g. when input is interrupted.
    pub fn cancel_all(&mut self, tree: &NodeTree) {
        for r in &mut self.registrations {
            for id in std::mem::take(&mut r.claimed) {
                let touch = Touch {
                    id,
                    location: Vec2::ZERO,
                };
                r.delegate.borrow_mut().touch_cancelled(tree, &touch);
            }
        }
    }
}

/// Wraps a delegate for registration while keeping a typed handle to it.
pub fn shared<D: TouchDelegate + 'static>(delegate: D) -> Rc<RefCell<D>> {
    Rc::new(RefCell::new(delegate))
}
