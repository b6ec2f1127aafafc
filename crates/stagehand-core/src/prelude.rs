pub use crate::action::{Action, ActionManager, Cue};
pub use crate::animation::{Easing, Interpolate};
pub use crate::color::Color;
pub use crate::draw::{DrawCommand, DrawList, TextAlignment};
pub use crate::error::{Error, Result};
pub use crate::geometry::{Affine, Rect, Size, Vec2};
pub use crate::ime::{ImeDispatcher, InputMethod};
pub use crate::node::{Node, NodeId, NodeTree, Orbit};
pub use crate::stage::{Stage, StageConfig};
pub use crate::touch::{SharedDelegate, Touch, TouchDelegate, TouchDispatcher, TouchId, TouchPhase};
