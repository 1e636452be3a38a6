// src/editor/mod.rs

pub mod commands;
mod core;
pub mod grid;
pub mod hit;
pub mod interaction;

pub use self::core::{Editor, RotateDirection};
pub use commands::{Command, CommandType};
pub use grid::GridSettings;
pub use interaction::{DragMode, Gesture, InteractionSession};

/// What a primary-button press does on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, drag, and resize tables.
    #[default]
    Select,
    /// Place the next unplaced registry table.
    Add,
    Delete,
}

impl Tool {
    /// Returns a user-friendly name for the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Add => "Add",
            Tool::Delete => "Delete",
        }
    }

    /// Returns all available tools. Useful for UI elements like toolbars.
    pub fn all() -> &'static [Tool] {
        &[Tool::Select, Tool::Add, Tool::Delete]
    }
}
