use crate::{Color, NodeId, Rect};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Draw commands produced by widgets for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        node: NodeId,
        rect: Rect,
        color: Color,
    },
    Text {
        node: NodeId,
        rect: Rect,
        text: String,
        font_name: String,
        size: f32,
        color: Color,
        alignment: TextAlignment,
    },
}

/// Renderable output of one frame, in paint order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every text command, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        })
    }
}
