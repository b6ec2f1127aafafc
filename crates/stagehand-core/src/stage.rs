//! The stage: explicit context that owns the node tree, knows which scene is
//! running, and carries the touch dispatcher. Widgets and transitions take
//! it as a parameter instead of reaching for a global director.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeTree};
use crate::touch::TouchDispatcher;
use crate::Size;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageConfig {
    pub win_size: Size,
    /// Release a replaced scene from the tree instead of only exiting it.
    pub send_cleanup_to_scene: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            win_size: Size::new(480.0, 320.0),
            send_cleanup_to_scene: true,
        }
    }
}

impl StageConfig {
    pub fn with_win_size(mut self, width: f32, height: f32) -> Self {
        self.win_size = Size::new(width, height);
        self
    }

    pub fn with_send_cleanup_to_scene(mut self, cleanup: bool) -> Self {
        self.send_cleanup_to_scene = cleanup;
        self
    }
}

pub struct Stage {
    pub tree: NodeTree,
    config: StageConfig,
    running: Option<NodeId>,
    touch: TouchDispatcher,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(StageConfig::default())
    }
}

impl Stage {
    pub fn new(config: StageConfig) -> Self {
        Self {
            tree: NodeTree::new(),
            config,
            running: None,
            touch: TouchDispatcher::new(),
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn win_size(&self) -> Size {
        self.config.win_size
    }

    pub fn set_send_cleanup_to_scene(&mut self, cleanup: bool) {
        self.config.send_cleanup_to_scene = cleanup;
    }

    pub fn running_scene(&self) -> Option<NodeId> {
        self.running
    }

    pub fn touch(&self) -> &TouchDispatcher {
        &self.touch
    }

    pub fn touch_mut(&mut self) -> &mut TouchDispatcher {
        &mut self.touch
    }

    /// Splits the borrow so the dispatcher can read the tree it routes for.
    pub fn touch_and_tree(&mut self) -> (&mut TouchDispatcher, &NodeTree) {
        (&mut self.touch, &self.tree)
    }

    /// Creates a window-sized root scene (not yet running).
    pub fn create_scene(&mut self) -> NodeId {
        self.tree.insert(Node::scene(self.config.win_size))
    }

    fn check_scene(&self, scene: NodeId) -> Result<()> {
        if !self.tree.contains(scene) {
            return Err(Error::MissingScene(scene));
        }
        if self.tree.parent(scene).is_some() {
            return Err(Error::NotAScene(scene));
        }
        Ok(())
    }

    /// Starts the first scene. Behaves like `replace_scene` if one is running.
    pub fn run_with_scene(&mut self, scene: NodeId) -> Result<()> {
        if self.running.is_some() {
            return self.replace_scene(scene);
        }
        self.check_scene(scene)?;
        self.running = Some(scene);
        self.tree.enter(scene);
        log::debug!("stage: running {scene:?}");
        Ok(())
    }

    /// Makes `scene` the running scene. The previous scene exits and its
    /// touch delegates drop their claimed touches. When
    /// `send_cleanup_to_scene` is set the scene is also released from the
    /// tree along with its delegates.
    pub fn replace_scene(&mut self, scene: NodeId) -> Result<()> {
        self.check_scene(scene)?;
        let old = self.running.replace(scene);
        if let Some(old) = old.filter(|&o| o != scene) {
            if self.config.send_cleanup_to_scene {
                self.tree.exit(old);
                self.release_scene(old);
            } else {
                self.touch.exit_delegates_under(&self.tree, old);
                self.tree.exit(old);
            }
        }
        self.tree.enter(scene);
        log::debug!("stage: replaced {old:?} with {scene:?}");
        Ok(())
    }

    /// Swaps in a decorator scene (a transition) without exiting the current
    /// one; the decorator drives the old scene's lifecycle itself.
    pub fn present(&mut self, scene: NodeId) -> Result<()> {
        self.check_scene(scene)?;
        self.running = Some(scene);
        self.tree.enter(scene);
        Ok(())
    }

    /// Frees `scene` and detaches every touch delegate inside it.
    pub fn release_scene(&mut self, scene: NodeId) {
        self.touch.remove_delegates_under(&self.tree, scene);
        if self.running == Some(scene) {
            self.running = None;
        }
        self.tree.remove_subtree(scene);
    }
}
