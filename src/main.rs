#![warn(non_snake_case)]
//! # tableplan
//!
//! Floor-plan editor for arranging a venue's tables. This binary boots
//! logging, loads the editor configuration, wires the layout repository to
//! its storage backend, and starts the eframe/egui event loop.
//!
//! Run with `--demo` to edit an in-memory plan seeded with sample tables.
//!
//! ## License
//! Licensed under the MIT License.

use std::error::Error;
use std::sync::Arc;

use log::info;

use tableplan::config::EditorConfig;
use tableplan::document::{JsonFileStore, LayoutRepository, MemoryStore, RegistryTable};
use tableplan::editor::Editor;
use tableplan::ui::TablePlanApp;

fn demo_tables() -> Vec<RegistryTable> {
    (1..=8)
        .map(|i| RegistryTable::new(format!("T{}", i), format!("{}", i), if i % 3 == 0 { 6 } else { 4 }))
        .collect()
}

fn repository(config: &EditorConfig, demo: bool) -> LayoutRepository {
    let repo = if demo {
        info!("Using in-memory demo store");
        let store = Arc::new(MemoryStore::new(demo_tables()));
        LayoutRepository::new(store.clone(), store)
    } else {
        info!("Using data directory {}", config.data_dir.display());
        let store = Arc::new(JsonFileStore::new(config.data_dir.clone()));
        LayoutRepository::new(store.clone(), store)
    };
    repo.with_canvas(config.canvas_width, config.canvas_height)
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();
    info!("tableplan starting...");

    let demo = std::env::args().skip(1).any(|arg| arg == "--demo");
    let config = EditorConfig::from_env();

    let mut editor = Editor::new(&config, repository(&config, demo));
    editor.request_load();

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1280.0, 860.0)),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "tableplan",
        native_options,
        Box::new(|_cc| Box::new(TablePlanApp::new(editor))),
    );
    info!("tableplan exiting.");
    Ok(())
}
