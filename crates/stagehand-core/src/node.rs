//! Node arena: the scene graph every widget and scene lives in.
//!
//! Nodes are addressed by [`NodeId`], a generational handle. A handle kept
//! after its node was removed simply stops resolving, which is what the
//! menu's selected-item reference and the transition's scene references rely
//! on: they never dangle, they go stale.

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::{Affine, Color, Rect, Size, Vec2};

new_key_type! {
    pub struct NodeId;
}

/// Camera orbit angles in degrees, animated by flip transitions. Rendering
/// the perspective is up to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orbit {
    pub angle_z: f32,
    pub angle_x: f32,
}

#[derive(Clone, Debug)]
pub struct Node {
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    running: bool,

    pub position: Vec2,
    /// Normalized anchor (0..1 on each axis) within `content_size`.
    pub anchor_point: Vec2,
    pub ignore_anchor_for_position: bool,
    pub content_size: Size,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub visible: bool,
    pub opacity: u8,
    pub color: Color,
    pub camera: Orbit,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            running: false,
            position: Vec2::ZERO,
            anchor_point: Vec2::ZERO,
            ignore_anchor_for_position: false,
            content_size: Size::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            visible: true,
            opacity: 255,
            color: Color::WHITE,
            camera: Orbit::default(),
        }
    }
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// A root-level scene covering the window, anchored at its center.
    pub fn scene(win_size: Size) -> Self {
        Self {
            content_size: win_size,
            anchor_point: Vec2::new(0.5, 0.5),
            ignore_anchor_for_position: true,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.content_size = size;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor_point = anchor;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Uniform scale; reads `scale_x` when the axes differ.
    pub fn scale(&self) -> f32 {
        self.scale_x
    }

    pub fn set_scale(&mut self, s: f32) {
        self.scale_x = s;
        self.scale_y = s;
    }

    pub fn anchor_in_points(&self) -> Vec2 {
        Vec2::new(
            self.anchor_point.x * self.content_size.width,
            self.anchor_point.y * self.content_size.height,
        )
    }

    pub fn node_to_parent(&self) -> Affine {
        let anchor = self.anchor_in_points();
        let mut x = self.position.x;
        let mut y = self.position.y;
        if self.ignore_anchor_for_position {
            x += anchor.x;
            y += anchor.y;
        }

        let (s, c) = (-self.rotation.to_radians()).sin_cos();
        let (sx, sy) = (self.scale_x, self.scale_y);

        if anchor != Vec2::ZERO {
            x += c * -anchor.x * sx + -s * -anchor.y * sy;
            y += s * -anchor.x * sx + c * -anchor.y * sy;
        }

        Affine {
            a: c * sx,
            b: s * sx,
            c: -s * sy,
            d: c * sy,
            tx: x,
            ty: y,
        }
    }
}

#[derive(Default)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, Node>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        let mut node = node;
        node.parent = None;
        node.children.clear();
        node.running = false;
        self.nodes.insert(node)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn is_descendant_or_self(&self, id: NodeId, root: NodeId) -> bool {
        id == root || self.ancestors(id).any(|a| a == root)
    }

    /// Appends `child` under `parent`, detaching it from any previous parent.
    /// A child joining a running parent enters with it.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            log::warn!("add_child: stale or self-referencing node id");
            return false;
        }
        if self.is_descendant_or_self(parent, child) {
            log::warn!("add_child: refusing to create a cycle");
            return false;
        }
        if let Some(old) = self.parent(child) {
            self.remove_child(old, child);
        }

        let parent_running = self.nodes[parent].running;
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        if parent_running {
            self.enter(child);
        }
        true
    }

    /// Detaches `child` from `parent`. The child stays alive in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(p) = self.nodes.get_mut(parent) else {
            log::warn!("remove_child: stale parent id");
            return false;
        };
        let Some(idx) = p.children.iter().position(|&c| c == child) else {
            return false;
        };
        p.children.remove(idx);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        if self.is_running(child) {
            self.exit(child);
        }
        true
    }

    /// Detaches `id` from its parent and frees it and all its descendants.
    pub fn remove_subtree(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if let Some(p) = self.parent(id) {
            self.remove_child(p, id);
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.remove(n) {
                stack.extend(node.children.iter().copied());
            }
        }
        true
    }

    pub fn is_running(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.running)
    }

    /// Marks the subtree as part of the active scene graph.
    pub fn enter(&mut self, id: NodeId) {
        self.set_running(id, true);
    }

    /// Marks the subtree as removed from the active scene graph.
    pub fn exit(&mut self, id: NodeId) {
        self.set_running(id, false);
    }

    fn set_running(&mut self, id: NodeId, running: bool) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(n) {
                node.running = running;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// True when the node and every ancestor are visible.
    pub fn is_visible_in_tree(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
            && self
                .ancestors(id)
                .all(|a| self.nodes.get(a).is_some_and(|n| n.visible))
    }

    pub fn node_to_world(&self, id: NodeId) -> Affine {
        let mut t = match self.nodes.get(id) {
            Some(n) => n.node_to_parent(),
            None => return Affine::IDENTITY,
        };
        for a in self.ancestors(id) {
            t = t.then(&self.nodes[a].node_to_parent());
        }
        t
    }

    pub fn world_to_node(&self, id: NodeId) -> Affine {
        self.node_to_world(id).inverse()
    }

    pub fn convert_to_node_space(&self, id: NodeId, world: Vec2) -> Vec2 {
        self.world_to_node(id).apply(world)
    }

    pub fn convert_to_world_space(&self, id: NodeId, local: Vec2) -> Vec2 {
        self.node_to_world(id).apply(local)
    }

    /// True when `world` falls inside the node's own content rect.
    pub fn hit_test(&self, id: NodeId, world: Vec2) -> bool {
        match self.nodes.get(id) {
            Some(n) => {
                Rect::from_size(n.content_size).contains(self.convert_to_node_space(id, world))
            }
            None => false,
        }
    }

    /// Content rect in the parent's coordinate space.
    pub fn bounding_box(&self, id: NodeId) -> Rect {
        match self.nodes.get(id) {
            Some(n) => n
                .node_to_parent()
                .apply_to_rect(Rect::from_size(n.content_size)),
            None => Rect::default(),
        }
    }
}
