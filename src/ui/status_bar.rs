// src/ui/status_bar.rs

use std::sync::Arc;

use eframe::egui::{self, Color32, Context};
use parking_lot::RwLock;

use crate::editor::Editor;

pub struct StatusBar {
    editor: Arc<RwLock<Editor>>,
}

impl StatusBar {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        Self { editor }
    }

    pub fn update(&mut self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let editor = self.editor.read(); // Keep the read lock short.

            let coord_label = match editor.pointer() {
                Some(p) => format!("({}, {})", p.x.round() as i64, p.y.round() as i64),
                None => String::new(),
            };

            ui.horizontal(|ui| {
                if editor.is_busy() {
                    ui.spinner();
                }
                match &editor.error_message {
                    Some(err) => {
                        ui.colored_label(Color32::from_rgb(200, 60, 50), err);
                    }
                    None => {
                        ui.label(&editor.status_message);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Tool: {}", editor.current_tool().name()));
                    ui.label(format!("{:.0}%", editor.zoom() * 100.0));
                    ui.label(coord_label);
                    if editor.has_unsaved_changes() {
                        ui.label("● unsaved");
                    }
                });
            });
        });
    }
}
