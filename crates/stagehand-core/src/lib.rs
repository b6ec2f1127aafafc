//! # Nodes, Actions, and the Stage
//!
//! Stagehand's core is a small scene graph plus the collaborators the
//! widgets in `stagehand-ui` and `stagehand-transitions` build on:
//!
//! - `NodeTree` — generational arena of nodes (position, anchor, scale,
//!   rotation, visibility, opacity) with parent/child links.
//! - `Action` / `ActionManager` — interval animations (move, scale, fade,
//!   orbit) composed with sequence, spawn and easing.
//! - `Stage` — explicit context: the tree, the running scene and the touch
//!   dispatcher.
//! - `TouchDispatcher` — targeted touch delivery by priority.
//! - `InputMethod` — where keyboard text goes.
//!
//! ## Nodes
//!
//! ```rust
//! use stagehand_core::*;
//!
//! let mut stage = Stage::new(StageConfig::default());
//! let scene = stage.create_scene();
//! let sprite = stage.tree.insert(Node::new().with_size(Size::new(40.0, 20.0)));
//! stage.tree.add_child(scene, sprite);
//! stage.run_with_scene(scene).unwrap();
//! assert!(stage.tree.is_running(sprite));
//! ```
//!
//! `NodeId`s are generational: once a node is removed, old ids stop
//! resolving instead of aliasing whatever reuses the slot.
//!
//! ## Actions
//!
//! ```rust
//! use stagehand_core::*;
//!
//! let mut tree = NodeTree::new();
//! let n = tree.insert(Node::new());
//! let mut actions = ActionManager::new();
//! actions.run(
//!     n,
//!     Action::sequence([
//!         Action::move_by(1.0, Vec2::new(100.0, 0.0)).eased(Easing::OutRate(2.0)),
//!         Action::cue(Cue::Finish),
//!     ]),
//! );
//! let cues = actions.tick(&mut tree, 1.0);
//! assert_eq!(cues, vec![(n, Cue::Finish)]);
//! ```
//!
//! Cues replace completion callbacks: whoever ticks the manager decides
//! what a cue means.

pub mod action;
pub mod animation;
pub mod color;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod ime;
pub mod node;
pub mod prelude;
pub mod stage;
pub mod tests;
pub mod touch;

pub use action::*;
pub use animation::*;
pub use color::*;
pub use draw::*;
pub use error::{Error, Result};
pub use geometry::*;
pub use ime::*;
pub use node::*;
pub use stage::*;
pub use touch::*;
