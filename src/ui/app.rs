// src/ui/app.rs

use std::sync::Arc;

use eframe::egui::{self, Context, Key};
use log::info;
use parking_lot::RwLock;

use super::central_panel::CentralPanel;
use super::dialog::{DialogManager, DialogResult, PendingAction};
use super::menu::{MenuAction, MenuBar};
use super::side_panel::SidePanel;
use super::status_bar::StatusBar;
use crate::editor::{Editor, RotateDirection};

/// The eframe application: one shared editor and the panels around it.
pub struct TablePlanApp {
    editor: Arc<RwLock<Editor>>,
    menu_bar: MenuBar,
    side_panel: SidePanel,
    central_panel: CentralPanel,
    status_bar: StatusBar,
    dialogs: DialogManager,

    /// The operator chose "Later" on the create prompt.
    plan_prompt_dismissed: bool,
    /// Runs once the pending save has been answered.
    after_save: Option<PendingAction>,
    allow_close: bool,
    close_requested: bool,
}

impl TablePlanApp {
    pub fn new(editor: Editor) -> Self {
        let editor = Arc::new(RwLock::new(editor));
        Self {
            menu_bar: MenuBar::new(editor.clone()),
            side_panel: SidePanel::new(editor.clone()),
            central_panel: CentralPanel::new(editor.clone()),
            status_bar: StatusBar::new(editor.clone()),
            editor,
            dialogs: DialogManager::new(),
            plan_prompt_dismissed: false,
            after_save: None,
            allow_close: false,
            close_requested: false,
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() || self.dialogs.is_open() {
            return;
        }
        let (escape, delete, rotate, shift, undo, redo, save) = {
            let input = ctx.input();
            let command = input.modifiers.command;
            (
                input.key_pressed(Key::Escape),
                input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace),
                input.key_pressed(Key::R) && !command,
                input.modifiers.shift,
                command && input.key_pressed(Key::Z) && !input.modifiers.shift,
                command && (input.key_pressed(Key::Y) || (input.key_pressed(Key::Z) && input.modifiers.shift)),
                command && input.key_pressed(Key::S),
            )
        };

        let mut editor = self.editor.write();
        if escape {
            editor.cancel_current_operation();
        }
        if delete {
            editor.delete_selected();
        }
        if rotate {
            let direction = if shift {
                RotateDirection::CounterClockwise
            } else {
                RotateDirection::Clockwise
            };
            editor.rotate_selected(direction);
        }
        if undo {
            editor.undo();
        }
        if redo {
            editor.redo();
        }
        if save {
            editor.request_save();
        }
    }

    fn handle_menu_action(&mut self, action: MenuAction) {
        let editor = self.editor.read();
        match action {
            MenuAction::NewPlan => {
                let name = editor.default_plan_name().to_string();
                drop(editor);
                self.dialogs.show_create_plan_dialog(&name);
            }
            MenuAction::Reload if editor.has_unsaved_changes() => {
                drop(editor);
                self.dialogs.show_save_changes_dialog(PendingAction::Reload);
            }
            MenuAction::Reload => {
                drop(editor);
                self.editor.write().request_load();
            }
            MenuAction::Exit => {
                drop(editor);
                self.close_requested = true;
            }
        }
    }

    fn handle_dialog_result(&mut self, result: DialogResult) {
        match result {
            DialogResult::Create(name) => {
                self.editor.write().request_create(&name);
            }
            DialogResult::Save(then) => {
                self.editor.write().request_save();
                self.after_save = Some(then);
            }
            DialogResult::DontSave(then) => self.run_pending(then),
            DialogResult::Cancel => {
                self.plan_prompt_dismissed = true;
            }
        }
    }

    fn run_pending(&mut self, action: PendingAction) {
        match action {
            PendingAction::Reload => self.editor.write().request_load(),
            PendingAction::Exit => {
                self.allow_close = true;
                self.close_requested = true;
            }
        }
    }

    /// Finishes "save, then reload/exit" once the save has reported back.
    /// A failed save leaves the error visible and abandons the action.
    fn check_after_save(&mut self) {
        let Some(action) = self.after_save else {
            return;
        };
        let (busy, dirty) = {
            let editor = self.editor.read();
            (editor.is_busy(), editor.has_unsaved_changes())
        };
        if busy {
            return;
        }
        self.after_save = None;
        if !dirty {
            self.run_pending(action);
        }
    }
}

impl eframe::App for TablePlanApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let (busy, needs_plan, default_name) = {
            let mut editor = self.editor.write();
            editor.poll_sync();
            (editor.is_busy(), editor.needs_plan(), editor.default_plan_name().to_string())
        };
        if busy {
            ctx.request_repaint();
        }
        self.check_after_save();

        if !needs_plan {
            self.plan_prompt_dismissed = false;
        } else if !self.plan_prompt_dismissed && !self.dialogs.is_open() {
            self.dialogs.show_create_plan_dialog(&default_name);
        }

        if let Some(action) = self.menu_bar.update(ctx) {
            self.handle_menu_action(action);
        }
        self.status_bar.update(ctx);
        self.side_panel.update(ctx);
        self.central_panel.update(ctx);
        self.handle_shortcuts(ctx);

        if let Some(result) = self.dialogs.update(ctx) {
            self.handle_dialog_result(result);
        }

        if self.close_requested {
            self.close_requested = false;
            frame.close();
        }
    }

    fn on_close_event(&mut self) -> bool {
        if self.allow_close || !self.editor.read().has_unsaved_changes() {
            info!("Closing editor");
            return true;
        }
        self.dialogs.show_save_changes_dialog(PendingAction::Exit);
        false
    }
}
