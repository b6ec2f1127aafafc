//! Interval actions: declarative animation trees run against a node.
//!
//! An [`Action`] describes what happens over time (move, scale, fade, ...)
//! and how steps compose ([`Action::Sequence`], [`Action::Spawn`],
//! [`Action::Ease`]). The [`ActionManager`] advances running actions by the
//! frame delta and reports [`Cue`]s as they are reached, which is how a
//! transition learns that its choreography has finished.

use crate::animation::{Easing, Interpolate};
use crate::node::{Node, NodeId, NodeTree};
use crate::Vec2;

/// Marker emitted when a running action reaches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Finish,
    HideOutShowIn,
    Custom(u32),
}

#[derive(Clone, Debug)]
pub enum Action {
    MoveTo {
        duration: f32,
        to: Vec2,
    },
    MoveBy {
        duration: f32,
        delta: Vec2,
    },
    JumpBy {
        duration: f32,
        delta: Vec2,
        height: f32,
        jumps: u32,
    },
    ScaleTo {
        duration: f32,
        to: f32,
    },
    ScaleBy {
        duration: f32,
        factor: f32,
    },
    RotateBy {
        duration: f32,
        degrees: f32,
    },
    FadeTo {
        duration: f32,
        opacity: u8,
    },
    /// Camera orbit from `angle` to `angle + delta` on each axis.
    Orbit {
        duration: f32,
        angle_z: f32,
        delta_z: f32,
        angle_x: f32,
        delta_x: f32,
    },
    Delay(f32),
    Show,
    Hide,
    Cue(Cue),
    Sequence(Vec<Action>),
    Spawn(Vec<Action>),
    Ease(Box<Action>, Easing),
}

impl Action {
    pub fn move_to(duration: f32, to: Vec2) -> Self {
        Action::MoveTo { duration, to }
    }
    pub fn move_by(duration: f32, delta: Vec2) -> Self {
        Action::MoveBy { duration, delta }
    }
    pub fn jump_by(duration: f32, delta: Vec2, height: f32, jumps: u32) -> Self {
        Action::JumpBy {
            duration,
            delta,
            height,
            jumps,
        }
    }
    pub fn scale_to(duration: f32, to: f32) -> Self {
        Action::ScaleTo { duration, to }
    }
    pub fn scale_by(duration: f32, factor: f32) -> Self {
        Action::ScaleBy { duration, factor }
    }
    pub fn rotate_by(duration: f32, degrees: f32) -> Self {
        Action::RotateBy { duration, degrees }
    }
    pub fn fade_to(duration: f32, opacity: u8) -> Self {
        Action::FadeTo { duration, opacity }
    }
    pub fn fade_in(duration: f32) -> Self {
        Action::fade_to(duration, 255)
    }
    pub fn fade_out(duration: f32) -> Self {
        Action::fade_to(duration, 0)
    }
    pub fn delay(duration: f32) -> Self {
        Action::Delay(duration)
    }
    pub fn cue(cue: Cue) -> Self {
        Action::Cue(cue)
    }
    pub fn sequence(steps: impl IntoIterator<Item = Action>) -> Self {
        Action::Sequence(steps.into_iter().collect())
    }
    pub fn spawn(steps: impl IntoIterator<Item = Action>) -> Self {
        Action::Spawn(steps.into_iter().collect())
    }
    pub fn eased(self, easing: Easing) -> Self {
        Action::Ease(Box::new(self), easing)
    }

    /// Total running time in seconds.
    pub fn duration(&self) -> f32 {
        match self {
            Action::MoveTo { duration, .. }
            | Action::MoveBy { duration, .. }
            | Action::JumpBy { duration, .. }
            | Action::ScaleTo { duration, .. }
            | Action::ScaleBy { duration, .. }
            | Action::RotateBy { duration, .. }
            | Action::FadeTo { duration, .. }
            | Action::Orbit { duration, .. } => *duration,
            Action::Delay(d) => *d,
            Action::Show | Action::Hide | Action::Cue(_) => 0.0,
            Action::Sequence(steps) => steps.iter().map(Action::duration).sum(),
            Action::Spawn(steps) => steps.iter().map(Action::duration).fold(0.0, f32::max),
            Action::Ease(inner, _) => inner.duration(),
        }
    }

    /// The action played backwards. Relative actions invert their delta;
    /// absolute (`*To`) actions and cues reverse to themselves.
    pub fn reversed(&self) -> Action {
        match self {
            Action::MoveBy { duration, delta } => Action::move_by(*duration, -*delta),
            Action::JumpBy {
                duration,
                delta,
                height,
                jumps,
            } => Action::jump_by(*duration, -*delta, *height, *jumps),
            Action::ScaleBy { duration, factor } => Action::scale_by(*duration, 1.0 / factor),
            Action::RotateBy { duration, degrees } => Action::rotate_by(*duration, -degrees),
            Action::Orbit {
                duration,
                angle_z,
                delta_z,
                angle_x,
                delta_x,
            } => Action::Orbit {
                duration: *duration,
                angle_z: angle_z + delta_z,
                delta_z: -delta_z,
                angle_x: angle_x + delta_x,
                delta_x: -delta_x,
            },
            Action::Show => Action::Hide,
            Action::Hide => Action::Show,
            Action::Sequence(steps) => Action::Sequence(steps.iter().rev().map(Action::reversed).collect()),
            Action::Spawn(steps) => Action::Spawn(steps.iter().map(Action::reversed).collect()),
            Action::Ease(inner, easing) => Action::Ease(Box::new(inner.reversed()), easing.reversed()),
            other => other.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Start {
    Position(Vec2),
    Scale(f32, f32),
    Rotation(f32),
    Opacity(u8),
    Nothing,
}

/// Runtime state mirroring an `Action` tree.
#[derive(Debug)]
enum Step {
    Leaf {
        action: Action,
        start: Option<Start>,
        done: bool,
    },
    Sequence {
        steps: Vec<Step>,
        offsets: Vec<f32>,
        durations: Vec<f32>,
        total: f32,
    },
    Spawn {
        steps: Vec<Step>,
        durations: Vec<f32>,
        total: f32,
    },
    Ease {
        inner: Box<Step>,
        easing: Easing,
    },
}

impl Step {
    fn new(action: Action) -> Step {
        match action {
            Action::Sequence(children) => {
                let durations: Vec<f32> = children.iter().map(Action::duration).collect();
                let mut offsets = Vec::with_capacity(durations.len());
                let mut acc = 0.0;
                for d in &durations {
                    offsets.push(acc);
                    acc += d;
                }
                Step::Sequence {
                    steps: children.into_iter().map(Step::new).collect(),
                    offsets,
                    durations,
                    total: acc,
                }
            }
            Action::Spawn(children) => {
                let durations: Vec<f32> = children.iter().map(Action::duration).collect();
                let total = durations.iter().copied().fold(0.0, f32::max);
                Step::Spawn {
                    steps: children.into_iter().map(Step::new).collect(),
                    durations,
                    total,
                }
            }
            Action::Ease(inner, easing) => Step::Ease {
                inner: Box::new(Step::new(*inner)),
                easing,
            },
            leaf => Step::Leaf {
                action: leaf,
                start: None,
                done: false,
            },
        }
    }

    /// Applies progress `t` (0..=1, possibly eased past the ends).
    fn update(&mut self, node: &mut Node, t: f32, cues: &mut Vec<Cue>) {
        match self {
            Step::Leaf {
                action,
                start,
                done,
            } => {
                if *done {
                    return;
                }
                let s = *start.get_or_insert_with(|| capture(action, node));
                apply(action, s, node, t, cues);
                if t >= 1.0 {
                    *done = true;
                }
            }
            Step::Sequence {
                steps,
                offsets,
                durations,
                total,
            } => {
                let elapsed = t * *total;
                for ((step, &offset), &d) in steps.iter_mut().zip(offsets.iter()).zip(durations.iter())
                {
                    if elapsed < offset {
                        break;
                    }
                    step.update(node, local_progress(elapsed - offset, d), cues);
                }
            }
            Step::Spawn {
                steps,
                durations,
                total,
            } => {
                let elapsed = t * *total;
                for (step, &d) in steps.iter_mut().zip(durations.iter()) {
                    step.update(node, local_progress(elapsed, d), cues);
                }
            }
            Step::Ease { inner, easing } => {
                // curves that do not land on 1.0 (springs) still finish
                let t = if t >= 1.0 { 1.0 } else { easing.apply(t) };
                inner.update(node, t, cues);
            }
        }
    }
}

fn local_progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).min(1.0)
    }
}

fn capture(action: &Action, node: &Node) -> Start {
    match action {
        Action::MoveTo { .. } | Action::MoveBy { .. } | Action::JumpBy { .. } => {
            Start::Position(node.position)
        }
        Action::ScaleTo { .. } | Action::ScaleBy { .. } => Start::Scale(node.scale_x, node.scale_y),
        Action::RotateBy { .. } => Start::Rotation(node.rotation),
        Action::FadeTo { .. } => Start::Opacity(node.opacity),
        _ => Start::Nothing,
    }
}

fn apply(action: &Action, start: Start, node: &mut Node, t: f32, cues: &mut Vec<Cue>) {
    match (action, start) {
        (Action::MoveTo { to, .. }, Start::Position(from)) => {
            node.position = from.interpolate(to, t);
        }
        (Action::MoveBy { delta, .. }, Start::Position(from)) => {
            node.position = from + *delta * t;
        }
        (
            Action::JumpBy {
                delta,
                height,
                jumps,
                ..
            },
            Start::Position(from),
        ) => {
            let frac = (t * *jumps as f32).fract();
            let y = height * 4.0 * frac * (1.0 - frac) + delta.y * t;
            node.position = from + Vec2::new(delta.x * t, y);
        }
        (Action::ScaleTo { to, .. }, Start::Scale(sx, sy)) => {
            node.scale_x = sx.interpolate(to, t);
            node.scale_y = sy.interpolate(to, t);
        }
        (Action::ScaleBy { factor, .. }, Start::Scale(sx, sy)) => {
            node.scale_x = sx.interpolate(&(sx * factor), t);
            node.scale_y = sy.interpolate(&(sy * factor), t);
        }
        (Action::RotateBy { degrees, .. }, Start::Rotation(from)) => {
            node.rotation = from + degrees * t;
        }
        (Action::FadeTo { opacity, .. }, Start::Opacity(from)) => {
            node.opacity = from.interpolate(opacity, t);
        }
        (
            Action::Orbit {
                angle_z,
                delta_z,
                angle_x,
                delta_x,
                ..
            },
            _,
        ) => {
            node.camera.angle_z = angle_z + delta_z * t;
            node.camera.angle_x = angle_x + delta_x * t;
        }
        (Action::Show, _) if t >= 1.0 => node.visible = true,
        (Action::Hide, _) if t >= 1.0 => node.visible = false,
        (Action::Cue(cue), _) if t >= 1.0 => cues.push(*cue),
        _ => {}
    }
}

struct Running {
    target: NodeId,
    step: Step,
    duration: f32,
    elapsed: f32,
}

/// Owns the actions currently animating nodes of one tree.
#[derive(Default)]
pub struct ActionManager {
    running: Vec<Running>,
}

impl ActionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, target: NodeId, action: Action) {
        let duration = action.duration();
        self.running.push(Running {
            target,
            step: Step::new(action),
            duration,
            elapsed: 0.0,
        });
    }

    pub fn stop_all(&mut self, target: NodeId) {
        self.running.retain(|r| r.target != target);
    }

    pub fn is_running(&self, target: NodeId) -> bool {
        self.running.iter().any(|r| r.target == target)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Advances every action by `dt` seconds. Finished actions are dropped,
    /// as are actions whose target no longer exists. Returns the cues reached
    /// during this tick, in the order they fired.
    pub fn tick(&mut self, tree: &mut NodeTree, dt: f32) -> Vec<(NodeId, Cue)> {
        let mut fired = Vec::new();
        let mut cues = Vec::new();

        self.running.retain_mut(|r| {
            let Some(node) = tree.get_mut(r.target) else {
                log::debug!("dropping action for removed node {:?}", r.target);
                return false;
            };
            r.elapsed += dt.max(0.0);
            let t = local_progress(r.elapsed, r.duration);
            r.step.update(node, t, &mut cues);
            fired.extend(cues.drain(..).map(|c| (r.target, c)));
            t < 1.0
        });

        fired
    }
}
