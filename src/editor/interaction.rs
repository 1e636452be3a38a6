// src/editor/interaction.rs
//! The pointer state machine: `Idle -> {Dragging, Resizing} -> Idle`.
//!
//! The active [`Tool`] is orthogonal to the machine and only decides what a
//! pointer-down does. Gesture changes are applied to the plan as the pointer
//! moves; pointer-up hands back a single [`CommandType`] describing the whole
//! gesture so it can be recorded for undo.

use log::debug;

use super::commands::{geometry_change, CommandType};
use super::grid::GridSettings;
use super::hit::{hit_test, hit_test_handle};
use super::Tool;
use crate::layout::{FloorPlan, TableId, TablePlacement};
use crate::utils::geometry::{bounding_box, center, clamp_size, rotate_about, Point2D, Rect, ResizeHandle};
use crate::utils::util::clamp;

/// Coarse view of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Idle,
    Dragging,
    Resizing,
}

/// A gesture in progress, with everything needed to continue or undo it.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        table_id: TableId,
        offset_x: f64,
        offset_y: f64,
        before: Rect,
    },
    Resizing {
        table_id: TableId,
        handle: ResizeHandle,
        before: Rect,
        /// Center and rotation at grab time. The pointer is mapped into this
        /// frame for the whole gesture so the handle doesn't drift as the
        /// center moves.
        pivot: Point2D,
        rotation: f64,
    },
}

/// Ephemeral editing state: the tool, the selection, and the gesture.
#[derive(Debug, Clone)]
pub struct InteractionSession {
    tool: Tool,
    selected: Option<TableId>,
    gesture: Gesture,
}

impl Default for InteractionSession {
    fn default() -> Self {
        Self {
            tool: Tool::Select,
            selected: None,
            gesture: Gesture::Idle,
        }
    }
}

impl InteractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches tools. Only takes effect between gestures.
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.tool = tool;
        true
    }

    pub fn selected(&self) -> Option<&TableId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, table_id: Option<TableId>) {
        self.selected = table_id;
    }

    pub fn mode(&self) -> DragMode {
        match self.gesture {
            Gesture::Idle => DragMode::Idle,
            Gesture::Dragging { .. } => DragMode::Dragging,
            Gesture::Resizing { .. } => DragMode::Resizing,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn resize_handle(&self) -> Option<ResizeHandle> {
        match self.gesture {
            Gesture::Resizing { handle, .. } => Some(handle),
            _ => None,
        }
    }

    /// Forgets a selection that no longer refers to a placed table.
    pub fn prune(&mut self, plan: &FloorPlan) {
        if let Some(id) = &self.selected {
            if !plan.contains(id) {
                self.selected = None;
            }
        }
        let gesture_lost = match &self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging { table_id, .. } | Gesture::Resizing { table_id, .. } => {
                !plan.contains(table_id)
            }
        };
        if gesture_lost {
            self.gesture = Gesture::Idle;
        }
    }

    /// Handles a primary-button press at `point` (plan units).
    ///
    /// `new_table` is the placement the add tool drops; it is ignored by the
    /// other tools. Returns the committed change for add/delete clicks. A
    /// press that arrives while a gesture is still open (a lost pointer-up)
    /// just finishes that gesture.
    pub fn pointer_down(
        &mut self,
        plan: &mut FloorPlan,
        point: Point2D,
        grid: &GridSettings,
        new_table: Option<TablePlacement>,
    ) -> Option<CommandType> {
        if !self.is_idle() {
            return self.pointer_up(plan);
        }
        let point = sanitize_point(point, plan);

        match self.tool {
            Tool::Add => {
                let mut placement = new_table?;
                let at = grid.snap_point(point);
                placement.x = at.x;
                placement.y = at.y;
                let table_id = placement.table_id.clone();
                if !plan.add_placement(placement.clone()) {
                    return None;
                }
                self.selected = Some(table_id);
                Some(CommandType::AddTable {
                    placement,
                    index: Some(plan.tables.len() - 1),
                })
            }
            Tool::Delete => {
                let table_id = hit_test(point, &plan.tables)?.clone();
                let removed = plan.remove_placement(&table_id)?;
                if self.selected.as_ref() == Some(&table_id) {
                    self.selected = None;
                }
                Some(CommandType::DeleteTable {
                    table_id,
                    removed: Some(removed),
                })
            }
            Tool::Select => {
                if let Some(gesture) = self.grab_handle(plan, point) {
                    self.gesture = gesture;
                    return None;
                }
                match hit_test(point, &plan.tables).cloned() {
                    Some(table_id) => {
                        if let Some(p) = plan.placement(&table_id) {
                            self.gesture = Gesture::Dragging {
                                table_id: table_id.clone(),
                                offset_x: point.x - p.x,
                                offset_y: point.y - p.y,
                                before: bounding_box(p),
                            };
                        }
                        self.selected = Some(table_id);
                    }
                    None => self.selected = None,
                }
                None
            }
        }
    }

    fn grab_handle(&self, plan: &FloorPlan, point: Point2D) -> Option<Gesture> {
        let selected = self.selected.as_ref()?;
        let placement = plan.placement(selected)?;
        let handle = hit_test_handle(point, placement)?;
        debug!("Grabbed {} handle of table {}", handle.name(), selected);
        Some(Gesture::Resizing {
            table_id: selected.clone(),
            handle,
            before: bounding_box(placement),
            pivot: center(placement),
            rotation: placement.rotation,
        })
    }

    /// Continues the current gesture. Returns true if the plan changed.
    pub fn pointer_move(&mut self, plan: &mut FloorPlan, point: Point2D, grid: &GridSettings) -> bool {
        let point = sanitize_point(point, plan);
        match &self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging {
                table_id,
                offset_x,
                offset_y,
                ..
            } => {
                let Point2D { x, y } = grid.snap_point(point.offset(-*offset_x, -*offset_y));
                match plan.placement_mut(table_id) {
                    Some(p) => {
                        let changed = p.x != x || p.y != y;
                        p.x = x;
                        p.y = y;
                        changed
                    }
                    None => {
                        self.gesture = Gesture::Idle;
                        false
                    }
                }
            }
            Gesture::Resizing {
                table_id,
                handle,
                before,
                pivot,
                rotation,
            } => {
                let local = rotate_about(point, *pivot, -rotation);
                match plan.placement_mut(table_id) {
                    Some(p) => {
                        let rect = resize_rect(*before, *handle, local, grid, p.shape.is_uniform());
                        let changed = bounding_box(p) != rect;
                        p.x = rect.x;
                        p.y = rect.y;
                        p.width = rect.width;
                        p.height = rect.height;
                        changed
                    }
                    None => {
                        self.gesture = Gesture::Idle;
                        false
                    }
                }
            }
        }
    }

    /// Ends the current gesture. The plan already holds the final values;
    /// the returned command records them for undo. Nothing is persisted here.
    pub fn pointer_up(&mut self, plan: &FloorPlan) -> Option<CommandType> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => None,
            Gesture::Dragging { table_id, before, .. } | Gesture::Resizing { table_id, before, .. } => {
                geometry_change(plan.placement(&table_id)?, before)
            }
        }
    }

    /// Abandons the current gesture, putting the table back where it was.
    pub fn cancel(&mut self, plan: &mut FloorPlan) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        if let Gesture::Dragging { table_id, before, .. } | Gesture::Resizing { table_id, before, .. } = gesture {
            if let Some(p) = plan.placement_mut(&table_id) {
                p.x = before.x;
                p.y = before.y;
                p.width = before.width;
                p.height = before.height;
            }
        }
    }
}

/// Clamps a pointer position into the canvas. NaN maps to the origin.
pub fn sanitize_point(point: Point2D, plan: &FloorPlan) -> Point2D {
    Point2D::new(
        clamp(point.x, 0.0, plan.width.max(0.0)),
        clamp(point.y, 0.0, plan.height.max(0.0)),
    )
}

/// Computes the new rectangle when `handle` of `before` is dragged to
/// `pointer` (in the placement's unrotated frame).
///
/// Handles on the left/top move that edge and keep the opposite edge fixed;
/// the others only change the size. Only the size is snapped: the origin is
/// derived from the fixed edge, so off-grid tables keep their anchored edges.
/// Sizes are clamped, snapped, then clamped again so that a coarse grid can
/// never push them out of bounds.
pub fn resize_rect(
    before: Rect,
    handle: ResizeHandle,
    pointer: Point2D,
    grid: &GridSettings,
    uniform: bool,
) -> Rect {
    let raw_width = if handle.moves_left() {
        before.right() - pointer.x
    } else {
        pointer.x - before.x
    };
    let raw_height = if handle.moves_top() {
        before.bottom() - pointer.y
    } else {
        pointer.y - before.y
    };

    let (width, height) = clamp_size(raw_width, raw_height);
    let (mut width, mut height) = clamp_size(grid.snap(width), grid.snap(height));
    if uniform {
        let side = width.max(height);
        width = side;
        height = side;
    }

    let x = if handle.moves_left() { before.right() - width } else { before.x };
    let y = if handle.moves_top() { before.bottom() - height } else { before.y };
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{TableShape, MAX_SIZE, MIN_SIZE};

    fn plan() -> FloorPlan {
        let mut plan = FloorPlan::new("p", "Main", 1200.0, 800.0);
        plan.add_placement(TablePlacement::new("T1", "1", 50.0, 80.0));
        plan.add_placement(TablePlacement::new("T2", "2", 210.0, 80.0));
        plan.add_placement(TablePlacement::new("T3", "3", 370.0, 80.0));
        plan
    }

    fn grid() -> GridSettings {
        GridSettings::new(true, 20.0)
    }

    #[test]
    fn test_drag_snaps_to_grid() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.pointer_down(&mut plan, Point2D::new(230.0, 100.0), &grid(), None);
        assert_eq!(session.mode(), DragMode::Dragging);
        assert_eq!(session.selected().map(String::as_str), Some("T2"));

        session.pointer_move(&mut plan, Point2D::new(245.0, 107.0), &grid());
        let t2 = plan.placement("T2").unwrap();
        assert_eq!((t2.x, t2.y), (220.0, 80.0));

        let cmd = session.pointer_up(&plan).unwrap();
        assert_eq!(session.mode(), DragMode::Idle);
        match cmd {
            CommandType::SetGeometry { table_id, before, after } => {
                assert_eq!(table_id, "T2");
                assert_eq!((before.x, before.y), (210.0, 80.0));
                assert_eq!((after.x, after.y), (220.0, 80.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.pointer_down(&mut plan, Point2D::new(60.0, 90.0), &grid(), None);
        assert!(session.pointer_up(&plan).is_none());
        assert_eq!(session.selected().map(String::as_str), Some("T1"));
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.select(Some("T1".into()));
        session.pointer_down(&mut plan, Point2D::new(900.0, 700.0), &grid(), None);
        assert!(session.selected().is_none());
        assert_eq!(session.mode(), DragMode::Idle);
    }

    #[test]
    fn test_handle_of_selected_starts_resize() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.select(Some("T1".into()));
        session.pointer_down(&mut plan, Point2D::new(130.0, 160.0), &grid(), None);
        assert_eq!(session.mode(), DragMode::Resizing);
        assert_eq!(session.resize_handle(), Some(ResizeHandle::Se));

        session.pointer_move(&mut plan, Point2D::new(171.0, 199.0), &grid());
        let t1 = plan.placement("T1").unwrap();
        assert_eq!((t1.x, t1.y, t1.width, t1.height), (50.0, 80.0, 120.0, 120.0));
    }

    #[test]
    fn test_resize_keeps_fixed_edges_of_off_grid_table() {
        let before = Rect::new(50.0, 80.0, 80.0, 80.0);
        let se = resize_rect(before, ResizeHandle::Se, Point2D::new(171.0, 199.0), &grid(), false);
        assert_eq!((se.x, se.y), (before.x, before.y));

        let off = Rect::new(55.0, 85.0, 80.0, 80.0);
        let nw = resize_rect(off, ResizeHandle::Nw, Point2D::new(10.0, 40.0), &grid(), false);
        assert_eq!(nw.right(), off.right());
        assert_eq!(nw.bottom(), off.bottom());
        assert_eq!((nw.width, nw.height), (120.0, 120.0));

        let ne = resize_rect(off, ResizeHandle::Ne, Point2D::new(160.0, 40.0), &grid(), false);
        assert_eq!(ne.x, off.x);
        assert_eq!(ne.bottom(), off.bottom());
    }

    #[test]
    fn test_handle_ignored_when_not_selected() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.pointer_down(&mut plan, Point2D::new(130.0, 160.0), &grid(), None);
        assert_eq!(session.mode(), DragMode::Dragging);
    }

    #[test]
    fn test_nw_resize_keeps_opposite_corner() {
        let before = Rect::new(100.0, 100.0, 80.0, 80.0);
        let rect = resize_rect(before, ResizeHandle::Nw, Point2D::new(60.0, 80.0), &grid(), false);
        assert_eq!(rect, Rect::new(60.0, 80.0, 120.0, 100.0));
        assert_eq!(rect.right(), before.right());
        assert_eq!(rect.bottom(), before.bottom());
    }

    #[test]
    fn test_resize_clamps_for_any_pointer() {
        let before = Rect::new(300.0, 300.0, 80.0, 80.0);
        let grids = [GridSettings::new(true, 20.0), GridSettings::new(true, 30.0), GridSettings::new(false, 20.0)];
        let pointers = [-1000.0, 0.0, 299.0, 300.0, 301.0, 340.0, 380.0, 390.0, 1000.0, 5000.0];
        for grid in &grids {
            for handle in ResizeHandle::all() {
                for &px in &pointers {
                    for &py in &pointers {
                        let rect = resize_rect(before, *handle, Point2D::new(px, py), grid, false);
                        assert!(rect.width >= MIN_SIZE && rect.width <= MAX_SIZE, "{:?}", rect);
                        assert!(rect.height >= MIN_SIZE && rect.height <= MAX_SIZE, "{:?}", rect);
                    }
                }
            }
        }
    }

    #[test]
    fn test_uniform_shapes_stay_square() {
        let before = Rect::new(0.0, 0.0, 80.0, 80.0);
        let rect = resize_rect(before, ResizeHandle::Se, Point2D::new(130.0, 95.0), &grid(), true);
        assert_eq!(rect.width, rect.height);
        assert_eq!(rect.width, 140.0);
    }

    #[test]
    fn test_delete_tool_removes_hit_table() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.select(Some("T3".into()));
        session.set_tool(Tool::Delete);
        let cmd = session.pointer_down(&mut plan, Point2D::new(400.0, 100.0), &grid(), None);
        assert!(matches!(cmd, Some(CommandType::DeleteTable { .. })));
        assert!(!plan.contains("T3"));
        assert!(session.selected().is_none());
        assert_eq!(session.mode(), DragMode::Idle);

        // Empty space: nothing happens.
        assert!(session
            .pointer_down(&mut plan, Point2D::new(1000.0, 700.0), &grid(), None)
            .is_none());
        assert_eq!(plan.tables.len(), 2);
    }

    #[test]
    fn test_add_tool_places_at_snapped_pointer() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.set_tool(Tool::Add);
        let template = TablePlacement::new("T4", "4", 0.0, 0.0);
        let cmd = session.pointer_down(&mut plan, Point2D::new(611.0, 409.0), &grid(), Some(template));
        assert!(matches!(cmd, Some(CommandType::AddTable { index: Some(3), .. })));
        let t4 = plan.placement("T4").unwrap();
        assert_eq!((t4.x, t4.y), (620.0, 400.0));
        assert_eq!(session.selected().map(String::as_str), Some("T4"));
        assert_eq!(session.mode(), DragMode::Idle);

        // Without a table to place the click is a no-op.
        assert!(session
            .pointer_down(&mut plan, Point2D::new(700.0, 500.0), &grid(), None)
            .is_none());
    }

    #[test]
    fn test_malformed_pointer_is_clamped() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.pointer_down(&mut plan, Point2D::new(60.0, 90.0), &grid(), None);
        session.pointer_move(&mut plan, Point2D::new(f64::NAN, f64::INFINITY), &grid());
        let t1 = plan.placement("T1").unwrap();
        assert!(t1.x.is_finite() && t1.y.is_finite());
        // Offset was (10, 10); NaN -> 0 and +inf -> canvas height (800).
        assert_eq!((t1.x, t1.y), (-20.0, 800.0));
        assert_eq!(session.mode(), DragMode::Dragging);
    }

    #[test]
    fn test_cancel_restores_geometry() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.pointer_down(&mut plan, Point2D::new(60.0, 90.0), &grid(), None);
        session.pointer_move(&mut plan, Point2D::new(300.0, 300.0), &grid());
        session.cancel(&mut plan);
        let t1 = plan.placement("T1").unwrap();
        assert_eq!((t1.x, t1.y), (50.0, 80.0));
        assert!(session.is_idle());
    }

    #[test]
    fn test_tool_change_blocked_mid_gesture() {
        let mut plan = plan();
        let mut session = InteractionSession::new();
        session.pointer_down(&mut plan, Point2D::new(60.0, 90.0), &grid(), None);
        assert!(!session.set_tool(Tool::Delete));
        session.pointer_up(&plan);
        assert!(session.set_tool(Tool::Delete));
    }

    #[test]
    fn test_rotated_resize_uses_grab_frame() {
        let mut plan = plan();
        {
            let t1 = plan.placement_mut("T1").unwrap();
            t1.set_rotation(90.0);
            t1.shape = TableShape::Rectangle;
        }
        let mut session = InteractionSession::new();
        session.select(Some("T1".into()));
        // The unrotated se corner (130, 160) turns to (50, 160) under 90 degrees.
        session.pointer_down(&mut plan, Point2D::new(50.0, 160.0), &grid(), None);
        assert_eq!(session.resize_handle(), Some(ResizeHandle::Se));
    }
}
