// src/lib.rs

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod layout;
pub mod render;
#[cfg(feature = "gui")]
pub mod ui;
pub mod utils;
