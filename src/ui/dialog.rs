// src/ui/dialog.rs

use eframe::egui::{self, Context};

/// What to do once the operator has answered the "Unsaved Changes" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Reload,
    Exit,
}

/// The types of dialogs you may show.
#[derive(Debug, PartialEq, Eq)]
pub enum Dialog {
    CreatePlan { name: String },
    SaveChanges(PendingAction),
}

/// The possible outcomes when a dialog is closed.
#[derive(Debug, PartialEq, Eq)]
pub enum DialogResult {
    Create(String),
    Save(PendingAction),
    DontSave(PendingAction),
    Cancel,
}

/// Manages the currently active dialog (if any) and its result.
#[derive(Default)]
pub struct DialogManager {
    active_dialog: Option<Dialog>,
    result: Option<DialogResult>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active_dialog.is_some()
    }

    pub fn show_dialog(&mut self, dialog: Dialog) {
        self.active_dialog = Some(dialog);
    }

    pub fn show_create_plan_dialog(&mut self, default_name: &str) {
        self.show_dialog(Dialog::CreatePlan {
            name: default_name.to_string(),
        });
    }

    pub fn show_save_changes_dialog(&mut self, then: PendingAction) {
        self.show_dialog(Dialog::SaveChanges(then));
    }

    /// Call this method on every UI frame to render the active dialog (if any).
    /// When the user responds, the method returns `Some(DialogResult)` and clears the active dialog.
    pub fn update(&mut self, ctx: &Context) -> Option<DialogResult> {
        let result = &mut self.result;
        match self.active_dialog.as_mut()? {
            Dialog::CreatePlan { name } => {
                egui::Window::new("Create Floor Plan")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label("This venue has no floor plan yet. Every registry table will be placed on a grid.");
                        ui.horizontal(|ui| {
                            ui.label("Name:");
                            ui.text_edit_singleline(name);
                        });
                        ui.horizontal(|ui| {
                            if ui.button("Create").clicked() {
                                *result = Some(DialogResult::Create(name.clone()));
                            }
                            if ui.button("Later").clicked() {
                                *result = Some(DialogResult::Cancel);
                            }
                        });
                    });
            }
            Dialog::SaveChanges(then) => {
                let then = *then;
                let question = match then {
                    PendingAction::Reload => "You have unsaved changes. Do you want to save before reloading?",
                    PendingAction::Exit => "You have unsaved changes. Do you want to save before exiting?",
                };
                egui::Window::new("Unsaved Changes")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label(question);
                        ui.horizontal(|ui| {
                            if ui.button("Save").clicked() {
                                *result = Some(DialogResult::Save(then));
                            }
                            if ui.button("Don't Save").clicked() {
                                *result = Some(DialogResult::DontSave(then));
                            }
                            if ui.button("Cancel").clicked() {
                                *result = Some(DialogResult::Cancel);
                            }
                        });
                    });
            }
        }
        // If the user has made a selection, retrieve the result and clear the dialog.
        let result = self.result.take()?;
        self.active_dialog = None;
        Some(result)
    }
}
