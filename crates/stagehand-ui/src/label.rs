use stagehand_core::*;

/// A single run of text attached to a node. Glyph layout belongs to the
/// renderer; the label only says what to draw, where, and in which color.
#[derive(Clone, Debug)]
pub struct Label {
    node: NodeId,
    pub text: String,
    pub font_name: String,
    pub font_size: f32,
    pub dimensions: Size,
    pub alignment: TextAlignment,
    pub color: Color,
}

impl Label {
    pub fn new(
        tree: &mut NodeTree,
        text: impl Into<String>,
        font_name: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self::with_dimensions(
            tree,
            text,
            font_name,
            font_size,
            Size::ZERO,
            TextAlignment::default(),
        )
    }

    pub fn with_dimensions(
        tree: &mut NodeTree,
        text: impl Into<String>,
        font_name: impl Into<String>,
        font_size: f32,
        dimensions: Size,
        alignment: TextAlignment,
    ) -> Self {
        let node = tree.insert(Node::new().with_size(dimensions));
        Self {
            node,
            text: text.into(),
            font_name: font_name.into(),
            font_size,
            dimensions,
            alignment,
            color: Color::WHITE,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn draw(&self, list: &mut DrawList) {
        self.draw_with_color(list, self.color);
    }

    /// Draws in `color` without touching the label's own color.
    pub fn draw_with_color(&self, list: &mut DrawList, color: Color) {
        list.push(DrawCommand::Text {
            node: self.node,
            rect: Rect::from_size(self.dimensions),
            text: self.text.clone(),
            font_name: self.font_name.clone(),
            size: self.font_size,
            color,
            alignment: self.alignment,
        });
    }
}
