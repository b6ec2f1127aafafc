use std::cell::RefCell;
use std::rc::Rc;

use stagehand_core::*;

use crate::label::Label;

/// Hooks a text field offers its owner. Every `bool` hook is a veto:
/// returning `true` stops the field from doing what it was about to do.
#[allow(unused_variables)]
pub trait TextFieldDelegate {
    fn on_attach_with_ime(&mut self, field: &TextField) -> bool {
        false
    }
    fn on_detach_with_ime(&mut self, field: &TextField) -> bool {
        false
    }
    /// `text` is what is about to be appended, or `"\n"` for end of input.
    fn on_insert_text(&mut self, field: &TextField, text: &str) -> bool {
        false
    }
    fn on_inserted(&mut self, field: &TextField, text: &str) {}
    /// `text` is the trailing code point about to be removed.
    fn on_delete_backward(&mut self, field: &TextField, text: &str) -> bool {
        false
    }
    fn on_deleted(&mut self, field: &TextField, text: &str) {}
    /// Returning `true` replaces the default drawing.
    fn on_draw(&mut self, field: &TextField) -> bool {
        false
    }
}

pub type SharedTextFieldDelegate = Rc<RefCell<dyn TextFieldDelegate>>;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextFieldConfig {
    pub placeholder: String,
    pub font_name: String,
    pub font_size: f32,
    pub dimensions: Size,
    pub alignment: TextAlignment,
    pub placeholder_color: Color,
}

impl Default for TextFieldConfig {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            font_name: String::new(),
            font_size: 16.0,
            dimensions: Size::ZERO,
            alignment: TextAlignment::Left,
            placeholder_color: Color::GRAY,
        }
    }
}

impl TextFieldConfig {
    pub fn new(placeholder: impl Into<String>, font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            placeholder: placeholder.into(),
            font_name: font_name.into(),
            font_size,
            ..Self::default()
        }
    }

    pub fn with_dimensions(mut self, dimensions: Size, alignment: TextAlignment) -> Self {
        self.dimensions = dimensions;
        self.alignment = alignment;
        self
    }

    pub fn with_placeholder_color(mut self, color: Color) -> Self {
        self.placeholder_color = color;
        self
    }
}

/// Counts code points by their leading bytes (anything but `10xxxxxx`).
fn code_points(text: &str) -> usize {
    text.bytes().filter(|b| b & 0xC0 != 0x80).count()
}

/// Single-line text input drawn through a [`Label`]. Text arrives from an
/// [`InputMethod`] host once the field is attached; a line feed ends input.
pub struct TextField {
    label: Label,
    input: String,
    placeholder: String,
    char_count: usize,
    placeholder_color: Color,
    attached: bool,
    delegate: Option<SharedTextFieldDelegate>,
    ime: Rc<RefCell<dyn InputMethod>>,
}

impl TextField {
    pub fn new(tree: &mut NodeTree, config: TextFieldConfig, ime: Rc<RefCell<dyn InputMethod>>) -> Self {
        let label = Label::with_dimensions(
            tree,
            config.placeholder.clone(),
            config.font_name,
            config.font_size,
            config.dimensions,
            config.alignment,
        );
        Self {
            label,
            input: String::new(),
            placeholder: config.placeholder,
            char_count: 0,
            placeholder_color: config.placeholder_color,
            attached: false,
            delegate: None,
            ime,
        }
    }

    pub fn node(&self) -> NodeId {
        self.label.node()
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn placeholder_color(&self) -> Color {
        self.placeholder_color
    }

    pub fn set_placeholder_color(&mut self, color: Color) {
        self.placeholder_color = color;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_delegate(&mut self, delegate: Option<SharedTextFieldDelegate>) {
        self.delegate = delegate;
    }

    /// Replaces the buffer. An empty buffer shows the placeholder.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.char_count = code_points(&self.input);
        self.sync_label();
    }

    pub fn set_placeholder(&mut self, text: impl Into<String>) {
        self.placeholder = text.into();
        if self.input.is_empty() {
            self.label.set_text(self.placeholder.clone());
        }
    }

    fn sync_label(&mut self) {
        let shown = if self.input.is_empty() {
            &self.placeholder
        } else {
            &self.input
        };
        self.label.set_text(shown.clone());
    }

    /// Appends keyboard text. Everything from the first line feed on is
    /// dropped; the line feed itself detaches the field unless vetoed.
    pub fn insert_text(&mut self, text: &str) {
        let (insert, line_feed) = match text.find('\n') {
            Some(pos) => (&text[..pos], true),
            None => (text, false),
        };

        if !insert.is_empty() {
            let delegate = self.delegate.clone();
            if let Some(d) = &delegate {
                if d.borrow_mut().on_insert_text(self, insert) {
                    return;
                }
            }
            self.char_count += code_points(insert);
            self.input.push_str(insert);
            self.sync_label();
            if let Some(d) = &delegate {
                d.borrow_mut().on_inserted(self, insert);
            }
        }

        if !line_feed {
            return;
        }
        if let Some(d) = self.delegate.clone() {
            if d.borrow_mut().on_insert_text(self, "\n") {
                return;
            }
        }
        self.detach_with_ime();
    }

    /// Removes the last code point. Emptying the buffer brings back the
    /// placeholder.
    pub fn delete_backward(&mut self) {
        let Some(last) = self.input.chars().next_back() else {
            return;
        };
        let cut = self.input.len() - last.len_utf8();

        let delegate = self.delegate.clone();
        if let Some(d) = &delegate {
            if d.borrow_mut().on_delete_backward(self, &self.input[cut..]) {
                return;
            }
        }

        let removed = self.input.split_off(cut);
        if self.input.is_empty() {
            self.char_count = 0;
        } else {
            self.char_count -= 1;
        }
        self.sync_label();
        if let Some(d) = &delegate {
            d.borrow_mut().on_deleted(self, &removed);
        }
    }

    /// Draws the buffer, or the placeholder in the placeholder color when
    /// the buffer is empty. The label's own color is left as it was.
    pub fn draw(&self, list: &mut DrawList) {
        if let Some(d) = &self.delegate {
            if d.borrow_mut().on_draw(self) {
                return;
            }
        }
        if self.input.is_empty() {
            self.label.draw_with_color(list, self.placeholder_color);
        } else {
            self.label.draw(list);
        }
    }

    /// Starts receiving text. Fails if already attached, if the delegate
    /// vetoes, or if the host refuses; on success the keyboard opens.
    pub fn attach_with_ime(&mut self) -> bool {
        if self.attached {
            return false;
        }
        if let Some(d) = self.delegate.clone() {
            if d.borrow_mut().on_attach_with_ime(self) {
                return false;
            }
        }
        let node = self.node();
        let mut ime = self.ime.borrow_mut();
        if !ime.attach(node) {
            return false;
        }
        ime.set_keyboard_visible(true);
        drop(ime);
        self.attached = true;
        log::debug!("text field {node:?} attached to IME");
        true
    }

    /// Stops receiving text and closes the keyboard. Fails if not attached,
    /// if the delegate vetoes, or if the host refuses.
    pub fn detach_with_ime(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        if let Some(d) = self.delegate.clone() {
            if d.borrow_mut().on_detach_with_ime(self) {
                return false;
            }
        }
        let node = self.node();
        let mut ime = self.ime.borrow_mut();
        if !ime.detach(node) {
            return false;
        }
        ime.set_keyboard_visible(false);
        drop(ime);
        self.attached = false;
        log::debug!("text field {node:?} detached from IME");
        true
    }

    /// Drops the delegate.
    pub fn cleanup(&mut self) {
        self.delegate = None;
    }
}
