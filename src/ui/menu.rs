// src/ui/menu.rs

use std::sync::Arc;

use eframe::egui::{self, Context};
use parking_lot::RwLock;

use crate::editor::{Editor, RotateDirection};

/// Requests from the menu that need the app (dialogs, window close).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewPlan,
    Reload,
    Exit,
}

pub struct MenuBar {
    editor: Arc<RwLock<Editor>>,
}

impl MenuBar {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        Self { editor }
    }

    pub fn update(&mut self, ctx: &Context) -> Option<MenuAction> {
        let mut action = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                let mut editor = self.editor.write();
                let has_plan = editor.plan().is_some();

                ui.menu_button("File", |ui| {
                    if ui.button("New Plan...").clicked() {
                        action = Some(MenuAction::NewPlan);
                        ui.close_menu();
                    }
                    if ui.button("Reload").clicked() {
                        action = Some(MenuAction::Reload);
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_plan && !editor.is_saving(), egui::Button::new("Save")).clicked() {
                        editor.request_save();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        action = Some(MenuAction::Exit);
                        ui.close_menu();
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui.add_enabled(editor.can_undo(), egui::Button::new("Undo")).clicked() {
                        editor.undo();
                        ui.close_menu();
                    }
                    if ui.add_enabled(editor.can_redo(), egui::Button::new("Redo")).clicked() {
                        editor.redo();
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_selection = editor.selected().is_some();
                    if ui.add_enabled(has_selection, egui::Button::new("Rotate Left")).clicked() {
                        editor.rotate_selected(RotateDirection::CounterClockwise);
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_selection, egui::Button::new("Rotate Right")).clicked() {
                        editor.rotate_selected(RotateDirection::Clockwise);
                        ui.close_menu();
                    }
                    if ui.add_enabled(has_selection, egui::Button::new("Delete Table")).clicked() {
                        editor.delete_selected();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Tables", |ui| {
                    if ui.add_enabled(has_plan, egui::Button::new("Add Unplaced Tables")).clicked() {
                        editor.request_add_unplaced();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut editor.show_side_panel, "Tools Panel").clicked() {
                        ui.close_menu();
                    }
                    let mut show_grid = editor.view().show_grid;
                    if ui.checkbox(&mut show_grid, "Show Grid").clicked() {
                        editor.set_show_grid(show_grid);
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        editor.set_zoom(1.0);
                        ui.close_menu();
                    }
                });
            });
        });
        action
    }
}
