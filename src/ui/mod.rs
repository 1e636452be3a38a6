// src/ui/mod.rs
//! The egui front end. Every panel shares one `Arc<RwLock<Editor>>`.
pub mod app;
pub mod central_panel;
pub mod dialog;
pub mod menu;
pub mod side_panel;
pub mod status_bar;

pub use app::TablePlanApp;
pub use dialog::DialogManager;
