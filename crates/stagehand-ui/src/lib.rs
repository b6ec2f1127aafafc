//! Widgets: menus, labels and text fields.
//!
//! Everything here lives on a [`stagehand_core::NodeTree`]. Widgets own the
//! node ids they create; the tree owns the nodes.

pub mod label;
pub mod layout;
pub mod menu;
pub mod textfield;

pub use label::Label;
pub use layout::{
    DEFAULT_PADDING, GRID_GAP, align_items_horizontally, align_items_horizontally_with_padding,
    align_items_in_columns, align_items_in_rows, align_items_vertically,
    align_items_vertically_with_padding,
};
pub use menu::{MENU_HANDLER_PRIORITY, Menu, MenuConfig, MenuItem, MenuState};
pub use textfield::{SharedTextFieldDelegate, TextField, TextFieldConfig, TextFieldDelegate};
