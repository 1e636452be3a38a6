// src/editor/core.rs

use log::{debug, error, info, warn};

use super::commands::{Command, CommandType};
use super::grid::GridSettings;
use super::interaction::InteractionSession;
use super::Tool;
use crate::config::{clamp_zoom, EditorConfig};
use crate::document::{
    add_unplaced, first_unplaced, refresh_registry_fields, seed_placement, LayoutRepository, LayoutSync,
    LoadOutcome, RegistryTable, SyncEvent,
};
use crate::error::LayoutError;
use crate::layout::{Area, FloorPlan, TableId, TablePlacement, TableShape};
use crate::render::{render, Frame, ViewOptions};
use crate::utils::geometry::{bounding_box, clamp_size, Point2D, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// The core `Editor` struct: the open floor plan, the interaction state, the
/// undo history, and the background link to the layout repository.
pub struct Editor {
    /// The open plan, if any.
    plan: Option<FloorPlan>,

    /// Registry snapshot from the last load or refresh.
    registry: Vec<RegistryTable>,

    session: InteractionSession,
    grid: GridSettings,
    view: ViewOptions,
    rotation_step: f64,
    default_plan_name: String,

    /// Undo/redo stacks of commands.
    command_history: Vec<CommandType>,
    redo_stack: Vec<CommandType>,

    /// Messages or status for UI.
    pub status_message: String,
    pub error_message: Option<String>,

    pub show_side_panel: bool,

    /// Last pointer position on the canvas, in plan units.
    pointer: Option<Point2D>,

    /// Bumped on every committed change; compared against the revision of
    /// the last successful save.
    revision: u64,
    saved_revision: u64,
    /// Revision at which the current plan was opened. Saves of older
    /// revisions belong to a replaced plan.
    opened_revision: u64,

    sync: LayoutSync,
    needs_plan: bool,
    save_after_registry: bool,
}

impl Editor {
    pub fn new(config: &EditorConfig, repository: LayoutRepository) -> Self {
        Self {
            plan: None,
            registry: Vec::new(),
            session: InteractionSession::new(),
            grid: GridSettings::new(config.snap_to_grid, config.grid_step),
            view: ViewOptions {
                show_grid: config.show_grid,
                grid_step: config.grid_step,
                zoom: clamp_zoom(config.zoom),
            },
            rotation_step: config.rotation_step,
            default_plan_name: config.default_plan_name.clone(),
            command_history: Vec::new(),
            redo_stack: Vec::new(),
            status_message: String::new(),
            error_message: None,
            show_side_panel: true,
            pointer: None,
            revision: 0,
            saved_revision: 0,
            opened_revision: 0,
            sync: LayoutSync::new(repository),
            needs_plan: false,
            save_after_registry: false,
        }
    }

    // ----------------- Accessors -----------------

    pub fn plan(&self) -> Option<&FloorPlan> {
        self.plan.as_ref()
    }

    pub fn registry(&self) -> &[RegistryTable] {
        &self.registry
    }

    /// Registry tables without a placement on the open plan.
    pub fn unplaced_count(&self) -> usize {
        match &self.plan {
            Some(plan) => self.registry.iter().filter(|t| !plan.contains(&t.id)).count(),
            None => 0,
        }
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn current_tool(&self) -> Tool {
        self.session.tool()
    }

    /// Switches tools between gestures and logs a status message.
    pub fn set_current_tool(&mut self, tool: Tool) {
        if self.session.set_tool(tool) {
            self.status_message = format!("Selected tool: {}", tool.name());
        }
    }

    pub fn selected(&self) -> Option<&TableId> {
        self.session.selected()
    }

    pub fn selected_placement(&self) -> Option<&TablePlacement> {
        let id = self.session.selected()?;
        self.plan.as_ref()?.placement(id)
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.grid.enabled = enabled;
    }

    pub fn set_grid_step(&mut self, step: f64) {
        if step.is_finite() && step > 0.0 {
            self.grid.step = step;
            self.view.grid_step = step;
        }
    }

    pub fn view(&self) -> ViewOptions {
        self.view
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.view.show_grid = show;
    }

    pub fn zoom(&self) -> f64 {
        self.view.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.view.zoom = clamp_zoom(zoom);
    }

    pub fn rotation_step(&self) -> f64 {
        self.rotation_step
    }

    pub fn default_plan_name(&self) -> &str {
        &self.default_plan_name
    }

    pub fn pointer(&self) -> Option<Point2D> {
        self.pointer
    }

    /// True when no plan could be loaded and the operator should create one.
    pub fn needs_plan(&self) -> bool {
        self.needs_plan
    }

    pub fn is_busy(&self) -> bool {
        self.sync.pending() > 0
    }

    pub fn is_saving(&self) -> bool {
        self.sync.is_saving()
    }

    pub fn can_undo(&self) -> bool {
        !self.command_history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.plan.is_some() && self.revision != self.saved_revision
    }

    /// Draw commands for the current state.
    pub fn frame(&self) -> Option<Frame> {
        let plan = self.plan.as_ref()?;
        Some(render(plan, self.session.selected().map(String::as_str), &self.view))
    }

    /// Replaces the open plan, discarding history and any open gesture.
    pub fn open_plan(&mut self, plan: FloorPlan, tables: Vec<RegistryTable>) {
        self.status_message = format!("Opened {} ({} tables)", plan.name, plan.tables.len());
        self.plan = Some(plan);
        self.registry = tables;
        self.session = InteractionSession::new();
        self.command_history.clear();
        self.redo_stack.clear();
        self.revision += 1;
        self.saved_revision = self.revision;
        self.opened_revision = self.revision;
        self.needs_plan = false;
        self.error_message = None;
    }

    // ----------------- Pointer input -----------------

    /// Primary-button press at `point` (plan units).
    pub fn pointer_down(&mut self, point: Point2D) {
        let Some(plan) = self.plan.as_mut() else {
            return;
        };
        let new_table = if self.session.tool() == Tool::Add && self.session.is_idle() {
            match first_unplaced(plan, &self.registry) {
                Some(table) => Some(seed_placement(table, 0)),
                None => {
                    self.status_message = "Every registry table is already placed".to_string();
                    return;
                }
            }
        } else {
            None
        };
        if let Some(command) = self.session.pointer_down(plan, point, &self.grid, new_table) {
            self.record(command);
        }
    }

    /// Pointer motion. Returns true if the plan changed.
    pub fn pointer_move(&mut self, point: Point2D) -> bool {
        self.pointer = Some(point);
        match self.plan.as_mut() {
            Some(plan) => self.session.pointer_move(plan, point, &self.grid),
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        let Some(plan) = self.plan.as_ref() else {
            return;
        };
        if let Some(command) = self.session.pointer_up(plan) {
            self.record(command);
        }
    }

    /// Abandons the current gesture, restoring the table it was moving.
    pub fn cancel_current_operation(&mut self) {
        if let Some(plan) = self.plan.as_mut() {
            if !self.session.is_idle() {
                self.session.cancel(plan);
                self.status_message = "Cancelled".to_string();
            }
        }
    }

    // ----------------- Property edits -----------------

    /// Rotates the selected table by one rotation step.
    pub fn rotate_selected(&mut self, direction: RotateDirection) {
        let Some(p) = self.selected_placement() else {
            return;
        };
        let delta = match direction {
            RotateDirection::Clockwise => self.rotation_step,
            RotateDirection::CounterClockwise => -self.rotation_step,
        };
        let mut preview = p.clone();
        preview.set_rotation(p.rotation + delta);
        let command = CommandType::Rotate {
            table_id: p.table_id.clone(),
            before: p.rotation,
            after: preview.rotation,
        };
        self.execute_command(command);
    }

    /// Changes the selected table's shape. Square and circle take the width
    /// as their side.
    pub fn set_selected_shape(&mut self, shape: TableShape) {
        let Some(p) = self.selected_placement() else {
            return;
        };
        if p.shape == shape {
            return;
        }
        let before = bounding_box(p);
        let mut after = before;
        if shape.is_uniform() {
            let (side, _) = clamp_size(before.width, before.width);
            after.width = side;
            after.height = side;
        }
        let command = CommandType::SetShape {
            table_id: p.table_id.clone(),
            before: (p.shape, before),
            after: (shape, after),
        };
        self.execute_command(command);
    }

    /// Local capacity override. Never persisted.
    pub fn set_selected_capacity(&mut self, capacity: u32) {
        let Some(p) = self.selected_placement() else {
            return;
        };
        if p.capacity == capacity {
            return;
        }
        let command = CommandType::SetCapacity {
            table_id: p.table_id.clone(),
            before: p.capacity,
            after: capacity,
        };
        self.execute_command(command);
    }

    pub fn delete_selected(&mut self) {
        if let Some(table_id) = self.selected().cloned() {
            self.execute_command(CommandType::DeleteTable {
                table_id,
                removed: None,
            });
        }
    }

    pub fn add_area(&mut self, name: &str, color: &str, rect: Rect) {
        self.execute_command(CommandType::AddArea {
            area: Area::new(name, color, rect),
            index: None,
        });
    }

    pub fn remove_area(&mut self, index: usize) {
        self.execute_command(CommandType::RemoveArea { index, area: None });
    }

    // ----------------- History -----------------

    /// Execute a command, handle errors, and reset redo stack on success.
    pub fn execute_command(&mut self, mut command: CommandType) {
        let Some(plan) = self.plan.as_mut() else {
            self.error_message = Some("No floor plan to edit.".to_string());
            return;
        };
        if !self.session.is_idle() {
            debug!("Ignoring {} during a gesture", command.describe());
            return;
        }
        match command.execute(plan) {
            Ok(()) => self.record(command),
            Err(err) => {
                warn!("Command failed: {}", err);
                self.error_message = Some(format!("Error executing command: {}", err));
            }
        }
    }

    /// Records a change that has already been applied to the plan.
    fn record(&mut self, command: CommandType) {
        debug!("Recorded {}", command.describe());
        self.status_message = format!("Done: {}", command.describe());
        self.command_history.push(command);
        self.redo_stack.clear();
        self.mark_changed();
    }

    fn mark_changed(&mut self) {
        self.revision += 1;
        self.error_message = None;
        if let Some(plan) = &self.plan {
            self.session.prune(plan);
        }
    }

    /// Undo the last command, if any.
    pub fn undo(&mut self) {
        self.cancel_current_operation();
        let Some(plan) = self.plan.as_mut() else {
            return;
        };
        if let Some(mut cmd) = self.command_history.pop() {
            match cmd.unexecute(plan) {
                Ok(()) => {
                    self.status_message = format!("Undid {}", cmd.describe());
                    self.redo_stack.push(cmd);
                    self.mark_changed();
                }
                Err(err) => {
                    self.error_message = Some(format!("Error undoing command: {}", err));
                }
            }
        }
    }

    /// Redo the last undone command, if any.
    pub fn redo(&mut self) {
        self.cancel_current_operation();
        let Some(plan) = self.plan.as_mut() else {
            return;
        };
        if let Some(mut cmd) = self.redo_stack.pop() {
            match cmd.execute(plan) {
                Ok(()) => {
                    self.status_message = format!("Redid {}", cmd.describe());
                    self.command_history.push(cmd);
                    self.mark_changed();
                }
                Err(err) => {
                    self.error_message = Some(format!("Error redoing command: {}", err));
                }
            }
        }
    }

    // ----------------- Repository -----------------

    pub fn request_load(&mut self) {
        self.status_message = "Loading floor plan...".to_string();
        self.sync.request_load();
    }

    pub fn request_create(&mut self, name: &str) {
        let name = name.trim();
        let name = if name.is_empty() { self.default_plan_name.clone() } else { name.to_string() };
        self.status_message = format!("Creating {}...", name);
        self.sync.request_create(name);
    }

    /// Refreshes the registry, places any new tables, then saves.
    pub fn request_add_unplaced(&mut self) {
        if self.plan.is_none() {
            self.error_message = Some(LayoutError::NoDocument.to_string());
            return;
        }
        self.save_after_registry = true;
        self.sync.request_registry();
    }

    /// Saves a snapshot of the plan in the background.
    pub fn request_save(&mut self) {
        let Some(plan) = self.plan.as_ref() else {
            self.error_message = Some(LayoutError::NoDocument.to_string());
            return;
        };
        match self.sync.request_save(plan, self.revision) {
            Ok(()) => self.status_message = "Saving...".to_string(),
            Err(e) => self.status_message = e.to_string(),
        }
    }

    /// Applies finished background requests. Call once per frame.
    pub fn poll_sync(&mut self) {
        for event in self.sync.poll() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Loaded(Ok(LoadOutcome { plan: Some(plan), tables }))
            | SyncEvent::Created(Ok(LoadOutcome { plan: Some(plan), tables })) => {
                self.open_plan(plan, tables);
            }
            SyncEvent::Loaded(Ok(LoadOutcome { plan: None, tables }))
            | SyncEvent::Created(Ok(LoadOutcome { plan: None, tables })) => {
                info!("No active floor plan; {} registry tables", tables.len());
                self.registry = tables;
                self.needs_plan = self.plan.is_none();
                self.status_message = "No floor plan yet".to_string();
            }
            SyncEvent::Loaded(Err(e)) => {
                error!("Loading the floor plan failed: {}", e);
                self.error_message = Some(format!("Failed to load: {}", e));
                self.needs_plan = self.plan.is_none();
            }
            SyncEvent::Created(Err(e)) => {
                error!("Creating the floor plan failed: {}", e);
                self.error_message = Some(format!("Failed to create plan: {}", e));
                self.needs_plan = self.plan.is_none();
            }
            SyncEvent::RegistryFetched(Ok(tables)) => self.apply_registry(tables),
            SyncEvent::RegistryFetched(Err(e)) => {
                self.save_after_registry = false;
                error!("Fetching the table registry failed: {}", e);
                self.error_message = Some(format!("Failed to fetch tables: {}", e));
            }
            SyncEvent::Saved { revision, result: Ok(()) } if revision < self.opened_revision => {
                debug!("Ignoring save of revision {} from a replaced plan", revision);
            }
            SyncEvent::Saved { revision, result: Ok(()) } => {
                self.saved_revision = self.saved_revision.max(revision);
                self.error_message = None;
                self.status_message = "Saved".to_string();
            }
            SyncEvent::Saved { result: Err(e), .. } => {
                self.error_message = Some(if e.is_retryable() {
                    format!("Save failed, your changes are kept. Retry with Save. ({})", e)
                } else {
                    format!("Save failed: {}", e)
                });
            }
        }
    }

    fn apply_registry(&mut self, tables: Vec<RegistryTable>) {
        let save = std::mem::take(&mut self.save_after_registry);
        let Some(plan) = self.plan.as_mut() else {
            self.registry = tables;
            return;
        };
        refresh_registry_fields(plan, &tables);
        let added = add_unplaced(plan, &tables);
        self.registry = tables;

        if added.is_empty() {
            self.status_message = "All tables are already placed".to_string();
            return;
        }
        let commands = added
            .iter()
            .filter_map(|id| {
                let index = plan.index_of(id)?;
                Some(CommandType::AddTable {
                    placement: plan.tables[index].clone(),
                    index: Some(index),
                })
            })
            .collect();
        info!("Placed {} unplaced tables", added.len());
        self.record(CommandType::BatchCommand { commands });
        self.status_message = format!("Placed {} new tables", added.len());
        if save {
            self.request_save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryStore, PlanStore};
    use crate::editor::DragMode;
    use assert_approx_eq::assert_approx_eq;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn registry(ids: &[&str]) -> Vec<RegistryTable> {
        ids.iter()
            .map(|id| RegistryTable::new(*id, id.trim_start_matches('T'), 4))
            .collect()
    }

    fn editor_with(store: &Arc<MemoryStore>) -> Editor {
        let repo = LayoutRepository::new(store.clone(), store.clone());
        Editor::new(&EditorConfig::default(), repo)
    }

    fn settle(editor: &mut Editor) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while editor.is_busy() && Instant::now() < deadline {
            editor.poll_sync();
            std::thread::sleep(Duration::from_millis(2));
        }
        editor.poll_sync();
    }

    fn created(ids: &[&str]) -> (Arc<MemoryStore>, Editor) {
        let store = Arc::new(MemoryStore::new(registry(ids)));
        let mut editor = editor_with(&store);
        editor.request_create("Main");
        settle(&mut editor);
        (store, editor)
    }

    #[test]
    fn test_missing_plan_offers_creation() {
        let store = Arc::new(MemoryStore::new(registry(&["T1"])));
        let mut editor = editor_with(&store);
        editor.request_load();
        settle(&mut editor);
        assert!(editor.needs_plan());
        assert!(editor.plan().is_none());
        assert_eq!(editor.registry().len(), 1);
    }

    #[test]
    fn test_load_failure_never_crashes() {
        let store = Arc::new(MemoryStore::new(registry(&["T1"])));
        store.fail_next("offline");
        let mut editor = editor_with(&store);
        editor.request_load();
        settle(&mut editor);
        assert!(editor.needs_plan());
        assert!(editor.error_message.is_some());
    }

    #[test]
    fn test_scenario_create_drag_save() {
        let (store, mut editor) = created(&["T1", "T2", "T3"]);
        let plan = editor.plan().unwrap();
        assert_eq!(plan.tables.len(), 3);
        assert!(!editor.has_unsaved_changes());
        let seeded = store.saved_plan().unwrap();

        editor.pointer_down(Point2D::new(230.0, 100.0));
        assert_eq!(editor.session().mode(), DragMode::Dragging);
        editor.pointer_move(Point2D::new(245.0, 107.0));
        editor.pointer_up();
        let t2 = editor.plan().unwrap().placement("T2").unwrap();
        assert_approx_eq!(t2.x, 220.0);
        assert_approx_eq!(t2.y, 80.0);
        assert!(editor.has_unsaved_changes());

        editor.request_save();
        settle(&mut editor);
        assert!(!editor.has_unsaved_changes());

        let saved = store.saved_plan().unwrap();
        let changed: Vec<_> = seeded
            .tables
            .iter()
            .zip(&saved.tables)
            .filter(|(a, b)| a != b)
            .map(|(_, b)| b.table_id.clone())
            .collect();
        assert_eq!(changed, vec!["T2".to_string()]);
    }

    #[test]
    fn test_gesture_is_one_undo_step() {
        let (_store, mut editor) = created(&["T1"]);
        editor.pointer_down(Point2D::new(60.0, 90.0));
        for x in [70.0, 90.0, 130.0] {
            editor.pointer_move(Point2D::new(x, 90.0));
        }
        editor.pointer_up();
        assert_approx_eq!(editor.plan().unwrap().tables[0].x, 120.0);

        editor.undo();
        assert_approx_eq!(editor.plan().unwrap().tables[0].x, 50.0);
        assert!(!editor.can_undo());
        editor.redo();
        assert_approx_eq!(editor.plan().unwrap().tables[0].x, 120.0);
    }

    #[test]
    fn test_rotate_and_reshape_selected() {
        let (_store, mut editor) = created(&["T1"]);
        editor.pointer_down(Point2D::new(60.0, 90.0));
        editor.pointer_up();
        assert_eq!(editor.selected().map(String::as_str), Some("T1"));

        editor.rotate_selected(RotateDirection::CounterClockwise);
        assert_approx_eq!(editor.selected_placement().unwrap().rotation, 345.0);
        editor.rotate_selected(RotateDirection::Clockwise);
        editor.rotate_selected(RotateDirection::Clockwise);
        assert_approx_eq!(editor.selected_placement().unwrap().rotation, 15.0);

        editor.set_selected_capacity(8);
        assert_eq!(editor.selected_placement().unwrap().capacity, 8);
        editor.set_selected_shape(TableShape::Circle);
        assert_eq!(editor.selected_placement().unwrap().shape, TableShape::Circle);
        editor.undo();
        assert_eq!(editor.selected_placement().unwrap().shape, TableShape::Rectangle);
    }

    #[test]
    fn test_add_tool_uses_first_unplaced_table() {
        let store = Arc::new(MemoryStore::new(registry(&["T1", "T2"])));
        store
            .save(&crate::document::FloorPlanRecord::from(&FloorPlan::new("p", "Main", 1200.0, 800.0)))
            .unwrap();
        let mut editor = editor_with(&store);
        editor.request_load();
        settle(&mut editor);
        editor.set_current_tool(Tool::Add);

        editor.pointer_down(Point2D::new(305.0, 412.0));
        editor.pointer_up();
        let plan = editor.plan().unwrap();
        assert_eq!(plan.tables[0].table_id, "T1");
        assert_approx_eq!(plan.tables[0].x, 300.0);
        assert_approx_eq!(plan.tables[0].y, 420.0);

        editor.pointer_down(Point2D::new(500.0, 500.0));
        editor.pointer_down(Point2D::new(700.0, 500.0));
        assert_eq!(editor.plan().unwrap().tables.len(), 2);
        assert!(editor.status_message.contains("already placed"));
    }

    #[test]
    fn test_add_unplaced_records_and_saves() {
        let (store, mut editor) = created(&["T1"]);
        store.set_tables(registry(&["T1", "T2", "T3"]));
        editor.request_add_unplaced();
        settle(&mut editor);
        assert_eq!(editor.plan().unwrap().tables.len(), 3);
        assert_eq!(store.saved_plan().unwrap().tables.len(), 3);
        assert!(!editor.has_unsaved_changes());

        editor.undo();
        assert_eq!(editor.plan().unwrap().tables.len(), 1);

        editor.redo();
        editor.request_add_unplaced();
        settle(&mut editor);
        assert_eq!(editor.plan().unwrap().tables.len(), 3);
        assert!(editor.status_message.contains("already placed"));
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let (store, mut editor) = created(&["T1"]);
        editor.pointer_down(Point2D::new(60.0, 90.0));
        editor.pointer_up();
        editor.delete_selected();
        store.fail_next("disk full");
        editor.request_save();
        settle(&mut editor);
        assert!(editor.error_message.is_some());
        assert!(editor.has_unsaved_changes());
        assert!(editor.plan().unwrap().tables.is_empty());

        editor.request_save();
        settle(&mut editor);
        assert!(!editor.has_unsaved_changes());
        assert!(store.saved_plan().unwrap().tables.is_empty());
    }

    #[test]
    fn test_areas_and_zoom() {
        let (_store, mut editor) = created(&["T1"]);
        editor.add_area("Patio", "#88cc88", Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(editor.plan().unwrap().areas.len(), 1);
        editor.remove_area(0);
        assert!(editor.plan().unwrap().areas.is_empty());
        editor.remove_area(3);
        assert!(editor.error_message.is_some());

        editor.undo();
        assert!(editor.error_message.is_none());
        assert_eq!(editor.plan().unwrap().areas.len(), 1);

        editor.set_zoom(5.0);
        assert_approx_eq!(editor.zoom(), 2.0);
        assert_approx_eq!(editor.frame().unwrap().scale, 2.0);
    }

    #[test]
    fn test_save_reply_after_reopen_keeps_plan_clean() {
        let (store, mut editor) = created(&["T1"]);
        editor.pointer_down(Point2D::new(60.0, 90.0));
        editor.pointer_move(Point2D::new(200.0, 90.0));
        editor.pointer_up();
        editor.request_save();

        let fresh = crate::document::seed_plan("p2", "Reloaded", 1200.0, 800.0, &registry(&["T1"]));
        editor.open_plan(fresh, registry(&["T1"]));
        settle(&mut editor);

        assert_eq!(editor.plan().unwrap().name, "Reloaded");
        assert!(!editor.has_unsaved_changes());
        assert_eq!(store.save_count(), 2);
    }
}
