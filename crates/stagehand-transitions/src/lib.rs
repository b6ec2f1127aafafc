//! Scene transitions.
//!
//! A [`Transition`] is a short-lived decorator scene. While it runs it is
//! the stage's running scene, touch dispatch is off, and a choreography of
//! actions moves, scales, spins, flips or fades the outgoing and incoming
//! scenes. When the choreography reaches its `Finish` cue the transition
//! puts both scenes back in their resting state and hands the stage over to
//! the incoming scene.
//!
//! ```rust
//! use stagehand_core::*;
//! use stagehand_transitions::*;
//!
//! let mut stage = Stage::default();
//! let menu = stage.create_scene();
//! stage.run_with_scene(menu).unwrap();
//!
//! let game = stage.create_scene();
//! let mut t = Transition::move_in_left(&mut stage, 0.3, game).unwrap();
//! t.enter(&mut stage).unwrap();
//! while !t.tick(&mut stage, 1.0 / 60.0).unwrap() {}
//! assert_eq!(stage.running_scene(), Some(game));
//! ```

pub mod kind;

pub use kind::{Edge, Orientation, TransitionKind};

use stagehand_core::*;

/// Distance (in points) a sliding scene stops short of a full window, so
/// the seam between the two scenes does not show a gap.
pub const SLIDE_ADJUST_FACTOR: f32 = 0.5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    Created,
    Running,
    Finished,
}

#[derive(Clone, Copy, Default)]
struct Resting {
    anchor_point: Vec2,
    position: Vec2,
}

pub struct Transition {
    node: NodeId,
    in_scene: NodeId,
    out_scene: NodeId,
    kind: TransitionKind,
    duration: f32,
    easing: Easing,
    in_scene_on_top: bool,
    send_cleanup_to_scene: bool,
    actions: ActionManager,
    layer: Option<NodeId>,
    resting: [Resting; 2],
    phase: Phase,
}

impl Transition {
    /// Builds a transition from the stage's running scene to `incoming`.
    /// With nothing running, an empty scene stands in for the outgoing one.
    /// Nothing is added to the tree until [`Transition::enter`].
    pub fn new(
        stage: &mut Stage,
        kind: TransitionKind,
        duration: f32,
        incoming: NodeId,
    ) -> Result<Self> {
        if !stage.tree.contains(incoming) {
            return Err(Error::MissingScene(incoming));
        }
        if stage.tree.parent(incoming).is_some() {
            return Err(Error::NotAScene(incoming));
        }
        let out_scene = match stage.running_scene() {
            Some(running) if running == incoming => return Err(Error::SameScene(incoming)),
            Some(running) => running,
            None => NodeId::default(),
        };

        Ok(Self {
            node: NodeId::default(),
            in_scene: incoming,
            out_scene,
            kind,
            duration: duration.max(0.0),
            easing: kind.default_easing(),
            in_scene_on_top: kind.in_scene_on_top(),
            send_cleanup_to_scene: stage.config().send_cleanup_to_scene,
            actions: ActionManager::new(),
            layer: None,
            resting: [Resting::default(); 2],
            phase: Phase::Created,
        })
    }

    pub fn rotozoom(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::RotoZoom, duration, incoming)
    }

    pub fn jump_zoom(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::JumpZoom, duration, incoming)
    }

    pub fn move_in_left(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::MoveIn(Edge::Left), duration, incoming)
    }

    pub fn move_in_right(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::MoveIn(Edge::Right), duration, incoming)
    }

    pub fn move_in_top(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::MoveIn(Edge::Top), duration, incoming)
    }

    pub fn move_in_bottom(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::MoveIn(Edge::Bottom), duration, incoming)
    }

    pub fn slide_in_left(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::SlideIn(Edge::Left), duration, incoming)
    }

    pub fn slide_in_right(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::SlideIn(Edge::Right), duration, incoming)
    }

    pub fn slide_in_top(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::SlideIn(Edge::Top), duration, incoming)
    }

    pub fn slide_in_bottom(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::SlideIn(Edge::Bottom), duration, incoming)
    }

    pub fn shrink_grow(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::ShrinkGrow, duration, incoming)
    }

    pub fn flip_x(
        stage: &mut Stage,
        duration: f32,
        incoming: NodeId,
        orientation: Orientation,
    ) -> Result<Self> {
        Self::new(stage, TransitionKind::FlipX(orientation), duration, incoming)
    }

    pub fn flip_y(
        stage: &mut Stage,
        duration: f32,
        incoming: NodeId,
        orientation: Orientation,
    ) -> Result<Self> {
        Self::new(stage, TransitionKind::FlipY(orientation), duration, incoming)
    }

    pub fn flip_angular(
        stage: &mut Stage,
        duration: f32,
        incoming: NodeId,
        orientation: Orientation,
    ) -> Result<Self> {
        Self::new(stage, TransitionKind::FlipAngular(orientation), duration, incoming)
    }

    pub fn zoom_flip_x(
        stage: &mut Stage,
        duration: f32,
        incoming: NodeId,
        orientation: Orientation,
    ) -> Result<Self> {
        Self::new(stage, TransitionKind::ZoomFlipX(orientation), duration, incoming)
    }

    pub fn zoom_flip_y(
        stage: &mut Stage,
        duration: f32,
        incoming: NodeId,
        orientation: Orientation,
    ) -> Result<Self> {
        Self::new(stage, TransitionKind::ZoomFlipY(orientation), duration, incoming)
    }

    pub fn zoom_flip_angular(
        stage: &mut Stage,
        duration: f32,
        incoming: NodeId,
        orientation: Orientation,
    ) -> Result<Self> {
        Self::new(stage, TransitionKind::ZoomFlipAngular(orientation), duration, incoming)
    }

    /// Fades through black.
    pub fn fade(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::fade_with_color(stage, duration, incoming, Color::BLACK)
    }

    pub fn fade_with_color(
        stage: &mut Stage,
        duration: f32,
        incoming: NodeId,
        color: Color,
    ) -> Result<Self> {
        Self::new(stage, TransitionKind::Fade(color), duration, incoming)
    }

    pub fn cross_fade(stage: &mut Stage, duration: f32, incoming: NodeId) -> Result<Self> {
        Self::new(stage, TransitionKind::CrossFade, duration, incoming)
    }

    /// Replaces the easing applied to the choreography's motion.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_send_cleanup_to_scene(mut self, cleanup: bool) -> Self {
        self.send_cleanup_to_scene = cleanup;
        self
    }

    /// The decorator scene. A null id until the transition has entered.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn in_scene(&self) -> NodeId {
        self.in_scene
    }

    /// The outgoing scene. When nothing was running this is a null id until
    /// the stand-in scene is created on enter.
    pub fn out_scene(&self) -> NodeId {
        self.out_scene
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn in_scene_on_top(&self) -> bool {
        self.in_scene_on_top
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Scenes to paint, bottom first, followed by the fade layer if any.
    pub fn paint_order(&self) -> Vec<NodeId> {
        let mut order = if self.in_scene_on_top {
            vec![self.out_scene, self.in_scene]
        } else {
            vec![self.in_scene, self.out_scene]
        };
        order.extend(self.layer);
        order
    }

    /// Emits the transition's own drawing (the fade layer).
    pub fn draw(&self, tree: &NodeTree, list: &mut DrawList) {
        let Some(layer) = self.layer else {
            return;
        };
        if let Some(n) = tree.get(layer) {
            list.push(DrawCommand::Rect {
                node: layer,
                rect: Rect::from_size(n.content_size),
                color: n.color.with_alpha(n.opacity),
            });
        }
    }

    /// Makes the transition the running scene and starts the choreography.
    pub fn enter(&mut self, stage: &mut Stage) -> Result<()> {
        if self.phase != Phase::Created {
            return Ok(());
        }
        if self.out_scene == NodeId::default() {
            self.out_scene = stage.create_scene();
        }
        self.resting = [self.in_scene, self.out_scene].map(|id| {
            let n = stage.tree.get(id);
            Resting {
                anchor_point: n.map_or(Vec2::new(0.5, 0.5), |n| n.anchor_point),
                position: n.map_or(Vec2::ZERO, |n| n.position),
            }
        });
        self.node = stage.create_scene();
        stage.present(self.node)?;
        stage.touch_mut().set_enabled(false);
        stage.tree.enter(self.in_scene);
        self.phase = Phase::Running;
        log::debug!(
            "transition {}: {:?} -> {:?} over {}s",
            self.kind.name(),
            self.out_scene,
            self.in_scene,
            self.duration
        );
        self.choreograph(stage);
        Ok(())
    }

    /// Advances the choreography. Returns `true` once the incoming scene
    /// has taken over.
    pub fn tick(&mut self, stage: &mut Stage, dt: f32) -> Result<bool> {
        match self.phase {
            Phase::Finished => return Ok(true),
            Phase::Created => return Ok(false),
            Phase::Running => {}
        }
        if self.kind == TransitionKind::Plain {
            self.finish(stage)?;
            return Ok(true);
        }
        for (_, cue) in self.actions.tick(&mut stage.tree, dt) {
            match cue {
                Cue::HideOutShowIn => self.hide_out_show_in(&mut stage.tree),
                Cue::Finish => {
                    self.finish(stage)?;
                    return Ok(true);
                }
                Cue::Custom(_) => {}
            }
        }
        Ok(false)
    }

    pub fn hide_out_show_in(&self, tree: &mut NodeTree) {
        if let Some(n) = tree.get_mut(self.in_scene) {
            n.visible = true;
        }
        if let Some(n) = tree.get_mut(self.out_scene) {
            n.visible = false;
        }
    }

    /// Restores both scenes, detaches the outgoing scene's touch delegates,
    /// re-enables touch dispatch and makes the incoming scene the running
    /// scene. The outgoing scene exits and, with cleanup on, is released.
    pub fn finish(&mut self, stage: &mut Stage) -> Result<()> {
        if self.phase != Phase::Running {
            return Ok(());
        }
        self.phase = Phase::Finished;
        self.actions.stop_all(self.in_scene);
        self.actions.stop_all(self.out_scene);

        let [in_rest, out_rest] = self.resting;
        reset_scene(&mut stage.tree, self.in_scene, in_rest);
        reset_scene(&mut stage.tree, self.out_scene, out_rest);
        self.in_scene_on_top = self.kind.in_scene_on_top();

        {
            let (touch, tree) = stage.touch_and_tree();
            touch.remove_delegates_under(tree, self.out_scene);
        }

        let result = stage.replace_scene(self.in_scene);
        stage.touch_mut().set_enabled(true);
        if stage.tree.contains(self.node) {
            stage.release_scene(self.node);
        }
        self.layer = None;

        stage.tree.exit(self.out_scene);
        if self.send_cleanup_to_scene {
            stage.release_scene(self.out_scene);
        }
        log::debug!("transition {} finished", self.kind.name());
        result
    }

    fn choreograph(&mut self, stage: &mut Stage) {
        let d = self.duration;
        let win = stage.win_size();
        let (i, o) = (self.in_scene, self.out_scene);
        let easing = self.easing;
        let ease = |a: Action| eased(a, easing);
        let tree = &mut stage.tree;

        match self.kind {
            TransitionKind::Plain => {}
            TransitionKind::RotoZoom => {
                set(tree, i, |n| {
                    n.set_scale(0.001);
                    n.anchor_point = Vec2::new(0.5, 0.5);
                });
                set(tree, o, |n| {
                    n.set_scale(1.0);
                    n.anchor_point = Vec2::new(0.5, 0.5);
                });
                let rotozoom = ease(Action::sequence([
                    Action::spawn([Action::scale_by(d / 2.0, 0.001), Action::rotate_by(d / 2.0, 720.0)]),
                    Action::delay(d / 2.0),
                ]));
                self.actions.run(
                    i,
                    Action::sequence([rotozoom.reversed(), Action::cue(Cue::Finish)]),
                );
                self.actions.run(o, rotozoom);
            }
            TransitionKind::JumpZoom => {
                set(tree, i, |n| {
                    n.set_scale(0.5);
                    n.position = Vec2::new(win.width, 0.0);
                    n.anchor_point = Vec2::new(0.5, 0.5);
                });
                set(tree, o, |n| n.anchor_point = Vec2::new(0.5, 0.5));
                let jump = || Action::jump_by(d / 4.0, Vec2::new(-win.width, 0.0), win.width / 4.0, 2);
                self.actions.run(
                    o,
                    ease(Action::sequence([Action::scale_to(d / 4.0, 0.5), jump()])),
                );
                self.actions.run(
                    i,
                    Action::sequence([
                        Action::delay(d / 2.0),
                        ease(Action::sequence([jump(), Action::scale_to(d / 4.0, 1.0)])),
                        Action::cue(Cue::Finish),
                    ]),
                );
            }
            TransitionKind::MoveIn(edge) => {
                let start = match edge {
                    Edge::Left => Vec2::new(-win.width, 0.0),
                    Edge::Right => Vec2::new(win.width, 0.0),
                    Edge::Top => Vec2::new(0.0, win.height),
                    Edge::Bottom => Vec2::new(0.0, -win.height),
                };
                set(tree, i, |n| n.position = start);
                self.actions.run(
                    i,
                    Action::sequence([
                        ease(Action::move_to(d, Vec2::ZERO)),
                        Action::cue(Cue::Finish),
                    ]),
                );
            }
            TransitionKind::SlideIn(edge) => {
                let w = win.width - SLIDE_ADJUST_FACTOR;
                let h = win.height - SLIDE_ADJUST_FACTOR;
                let (start, delta) = match edge {
                    Edge::Left => (Vec2::new(-w, 0.0), Vec2::new(w, 0.0)),
                    Edge::Right => (Vec2::new(w, 0.0), Vec2::new(-w, 0.0)),
                    Edge::Top => (Vec2::new(0.0, h), Vec2::new(0.0, -h)),
                    Edge::Bottom => (Vec2::new(0.0, -h), Vec2::new(0.0, h)),
                };
                set(tree, i, |n| n.position = start);
                let slide = ease(Action::move_by(d, delta));
                self.actions.run(
                    i,
                    Action::sequence([slide.clone(), Action::cue(Cue::Finish)]),
                );
                self.actions.run(o, slide);
            }
            TransitionKind::ShrinkGrow => {
                set(tree, i, |n| {
                    n.set_scale(0.001);
                    n.anchor_point = Vec2::new(2.0 / 3.0, 0.5);
                });
                set(tree, o, |n| {
                    n.set_scale(1.0);
                    n.anchor_point = Vec2::new(1.0 / 3.0, 0.5);
                });
                self.actions.run(i, ease(Action::scale_to(d, 1.0)));
                self.actions.run(
                    o,
                    Action::sequence([
                        ease(Action::scale_to(d, 0.01)),
                        Action::cue(Cue::Finish),
                    ]),
                );
            }
            TransitionKind::FlipX(orientation)
            | TransitionKind::FlipY(orientation)
            | TransitionKind::FlipAngular(orientation)
            | TransitionKind::ZoomFlipX(orientation)
            | TransitionKind::ZoomFlipY(orientation)
            | TransitionKind::ZoomFlipAngular(orientation) => {
                self.flip(tree, orientation);
            }
            TransitionKind::Fade(color) => {
                set(tree, i, |n| n.visible = false);
                let mut layer = Node::scene(win);
                layer.color = color;
                layer.opacity = 0;
                let layer = tree.insert(layer);
                tree.add_child(self.node, layer);
                self.layer = Some(layer);
                self.actions.run(
                    layer,
                    Action::sequence([
                        ease(Action::fade_in(d / 2.0)),
                        Action::cue(Cue::HideOutShowIn),
                        ease(Action::fade_out(d / 2.0)),
                        Action::cue(Cue::Finish),
                    ]),
                );
            }
            TransitionKind::CrossFade => {
                set(tree, o, |n| n.opacity = 255);
                self.actions.run(
                    o,
                    Action::sequence([ease(Action::fade_out(d)), Action::cue(Cue::Finish)]),
                );
            }
        }
    }

    /// Camera flips: the outgoing scene turns away during the first half,
    /// the incoming scene turns in during the second.
    fn flip(&mut self, tree: &mut NodeTree, orientation: Orientation) {
        let d = self.duration;
        let (i, o) = (self.in_scene, self.out_scene);
        let easing = self.easing;
        let ease = |a: Action| eased(a, easing);

        let (forward, in_x, out_x, zoom) = match self.kind {
            TransitionKind::FlipX(_) => (orientation == Orientation::RightOver, 0.0, 0.0, false),
            TransitionKind::ZoomFlipX(_) => (orientation == Orientation::RightOver, 0.0, 0.0, true),
            TransitionKind::FlipY(_) => (orientation == Orientation::UpOver, 90.0, 90.0, false),
            TransitionKind::ZoomFlipY(_) => (orientation == Orientation::UpOver, 90.0, 90.0, true),
            TransitionKind::FlipAngular(_) => (orientation == Orientation::RightOver, -45.0, 45.0, false),
            _ => (orientation == Orientation::RightOver, -45.0, 45.0, true),
        };
        let (in_z, in_dz, out_z, out_dz) = if forward {
            (270.0, 90.0, 0.0, 90.0)
        } else {
            (90.0, -90.0, 0.0, -90.0)
        };

        let orbit = |angle_z: f32, delta_z: f32, angle_x: f32| Action::Orbit {
            duration: d / 2.0,
            angle_z,
            delta_z,
            angle_x,
            delta_x: 0.0,
        };

        set(tree, i, |n| {
            n.visible = false;
            if zoom {
                n.set_scale(0.5);
            }
        });

        let (turn_in, turn_out) = if zoom {
            (
                Action::spawn([
                    ease(orbit(in_z, in_dz, in_x)),
                    Action::scale_to(d / 2.0, 1.0),
                    Action::Show,
                ]),
                Action::spawn([
                    ease(orbit(out_z, out_dz, out_x)),
                    Action::scale_to(d / 2.0, 0.5),
                ]),
            )
        } else {
            (
                Action::sequence([Action::Show, ease(orbit(in_z, in_dz, in_x))]),
                ease(orbit(out_z, out_dz, out_x)),
            )
        };

        self.actions.run(
            i,
            Action::sequence([Action::delay(d / 2.0), turn_in, Action::cue(Cue::Finish)]),
        );
        self.actions.run(
            o,
            Action::sequence([turn_out, Action::Hide, Action::delay(d / 2.0)]),
        );
    }
}

fn eased(action: Action, easing: Easing) -> Action {
    match easing {
        Easing::Linear => action,
        easing => action.eased(easing),
    }
}

fn set(tree: &mut NodeTree, id: NodeId, f: impl FnOnce(&mut Node)) {
    if let Some(n) = tree.get_mut(id) {
        f(n);
    }
}

fn reset_scene(tree: &mut NodeTree, id: NodeId, rest: Resting) {
    set(tree, id, |n| {
        n.visible = true;
        n.position = rest.position;
        n.anchor_point = rest.anchor_point;
        n.set_scale(1.0);
        n.rotation = 0.0;
        n.opacity = 255;
        n.camera = Orbit::default();
    });
}
