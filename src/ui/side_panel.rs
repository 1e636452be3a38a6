// src/ui/side_panel.rs

use std::sync::Arc;

use eframe::egui::{self, Context, Ui};
use parking_lot::RwLock;

use crate::config::{MAX_ZOOM, MIN_ZOOM};
use crate::editor::{Editor, RotateDirection, Tool};
use crate::layout::TableShape;
use crate::utils::geometry::Rect;

/// Form state for a new area.
struct AreaDraft {
    name: String,
    color: String,
    rect: Rect,
}

impl Default for AreaDraft {
    fn default() -> Self {
        Self {
            name: "Patio".to_string(),
            color: "#88cc88".to_string(),
            rect: Rect::new(0.0, 0.0, 320.0, 200.0),
        }
    }
}

/// Manages the left-side panel with tools, table properties, view options,
/// and areas.
pub struct SidePanel {
    editor: Arc<RwLock<Editor>>,
    area_draft: AreaDraft,
}

impl SidePanel {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        Self {
            editor,
            area_draft: AreaDraft::default(),
        }
    }

    /// Called each frame, updates the side panel UI if it's visible.
    pub fn update(&mut self, ctx: &Context) {
        if !self.editor.read().show_side_panel {
            return;
        }

        egui::SidePanel::left("tools_panel")
            .default_width(250.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let mut editor = self.editor.write();
                    show_tools(ui, &mut editor);
                    ui.separator();
                    show_properties(ui, &mut editor);
                    ui.separator();
                    show_view(ui, &mut editor);
                    ui.separator();
                    show_tables(ui, &mut editor);
                    ui.separator();
                    show_areas(ui, &mut editor, &mut self.area_draft);
                });
            });
    }
}

fn show_tools(ui: &mut Ui, editor: &mut Editor) {
    ui.heading("Tools");
    ui.horizontal(|ui| {
        for tool in Tool::all() {
            let selected = editor.current_tool() == *tool;
            if ui.selectable_label(selected, tool.name()).clicked() {
                editor.set_current_tool(*tool);
            }
        }
    });
}

fn show_properties(ui: &mut Ui, editor: &mut Editor) {
    ui.heading("Properties");

    let Some(p) = editor.selected_placement().cloned() else {
        ui.label("Nothing selected.");
        return;
    };

    egui::Grid::new("table_properties").num_columns(2).show(ui, |ui| {
        ui.label("Table");
        ui.label(format!("{} ({})", p.label, p.table_id));
        ui.end_row();
        ui.label("Status");
        ui.label(p.status.name());
        ui.end_row();
        ui.label("Position");
        ui.label(format!("{:.0}, {:.0}", p.x, p.y));
        ui.end_row();
        ui.label("Size");
        ui.label(format!("{:.0} × {:.0}", p.width, p.height));
        ui.end_row();
        ui.label("Rotation");
        ui.label(format!("{:.0}°", p.rotation));
        ui.end_row();
    });

    let step = editor.rotation_step();
    ui.horizontal(|ui| {
        if ui.button("⟲").on_hover_text(format!("Rotate left {}°", step)).clicked() {
            editor.rotate_selected(RotateDirection::CounterClockwise);
        }
        if ui.button("⟳").on_hover_text(format!("Rotate right {}°", step)).clicked() {
            editor.rotate_selected(RotateDirection::Clockwise);
        }
    });

    let mut shape = p.shape;
    egui::ComboBox::from_label("Shape")
        .selected_text(shape.name())
        .show_ui(ui, |ui| {
            for option in TableShape::all() {
                ui.selectable_value(&mut shape, *option, option.name());
            }
        });
    if shape != p.shape {
        editor.set_selected_shape(shape);
    }

    ui.horizontal(|ui| {
        ui.label(format!("Seats: {}", p.capacity));
        if ui.add_enabled(p.capacity > 0, egui::Button::new("−")).clicked() {
            editor.set_selected_capacity(p.capacity - 1);
        }
        if ui.button("+").clicked() {
            editor.set_selected_capacity(p.capacity + 1);
        }
    });

    if ui.button("Delete table").clicked() {
        editor.delete_selected();
    }
}

fn show_view(ui: &mut Ui, editor: &mut Editor) {
    ui.heading("Grid & View");

    let mut view = editor.view();
    if ui.checkbox(&mut view.show_grid, "Show grid").changed() {
        editor.set_show_grid(view.show_grid);
    }
    let mut grid = editor.grid();
    if ui.checkbox(&mut grid.enabled, "Snap to grid").changed() {
        editor.set_snap_to_grid(grid.enabled);
    }
    if ui
        .add(egui::Slider::new(&mut grid.step, 5.0..=100.0).step_by(5.0).text("Grid step"))
        .changed()
    {
        editor.set_grid_step(grid.step);
    }
    let mut zoom = editor.zoom();
    if ui
        .add(egui::Slider::new(&mut zoom, MIN_ZOOM..=MAX_ZOOM).text("Zoom"))
        .changed()
    {
        editor.set_zoom(zoom);
    }
}

fn show_tables(ui: &mut Ui, editor: &mut Editor) {
    ui.heading("Tables");
    let Some(placed) = editor.plan().map(|plan| plan.tables.len()) else {
        ui.label("No floor plan loaded.");
        return;
    };
    ui.label(format!("{} placed, {} unplaced", placed, editor.unplaced_count()));
    if ui.button("Add unplaced tables").clicked() {
        editor.request_add_unplaced();
    }
}

fn show_areas(ui: &mut Ui, editor: &mut Editor, draft: &mut AreaDraft) {
    ui.heading("Areas");
    let Some(names) = editor
        .plan()
        .map(|plan| plan.areas.iter().map(|a| a.name.clone()).collect::<Vec<_>>())
    else {
        return;
    };

    let mut remove = None;
    for (index, name) in names.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(name);
            if ui.small_button("✖").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        editor.remove_area(index);
    }

    ui.collapsing("New area", |ui| {
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut draft.name);
        });
        ui.horizontal(|ui| {
            ui.label("Color");
            ui.text_edit_singleline(&mut draft.color);
        });
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut draft.rect.x).prefix("x "));
            ui.add(egui::DragValue::new(&mut draft.rect.y).prefix("y "));
        });
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut draft.rect.width).prefix("w ").clamp_range(10.0..=5000.0));
            ui.add(egui::DragValue::new(&mut draft.rect.height).prefix("h ").clamp_range(10.0..=5000.0));
        });
        if ui.button("Add area").clicked() && !draft.name.trim().is_empty() {
            editor.add_area(draft.name.trim(), draft.color.trim(), draft.rect);
        }
    });
}
