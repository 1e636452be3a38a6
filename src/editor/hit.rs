// src/editor/hit.rs
//! Pointer hit-testing against rotated table shapes.

use crate::layout::{TableId, TablePlacement, TableShape};
use crate::utils::geometry::{
    bounding_box, center, handle_positions, world_to_local, Point2D, ResizeHandle,
};

/// How close (in plan units) the pointer must be to a corner to grab it.
pub const HANDLE_TOLERANCE: f64 = 10.0;

/// Returns true if `point` lies inside the placement's rotated shape.
///
/// Circles are tested against `width / 2` even when `height` differs; an
/// elliptical table is approximated by the circle of its width.
pub fn contains(placement: &TablePlacement, point: Point2D) -> bool {
    match placement.shape {
        TableShape::Rectangle | TableShape::Square => {
            bounding_box(placement).contains_point(&world_to_local(placement, point))
        }
        TableShape::Circle => center(placement).distance_to(&point) <= placement.width / 2.0,
    }
}

/// Finds the top-most placement under `point`. Later entries are drawn on top,
/// so the slice is scanned back to front.
pub fn hit_test(point: Point2D, placements: &[TablePlacement]) -> Option<&TableId> {
    placements
        .iter()
        .rev()
        .find(|p| contains(p, point))
        .map(|p| &p.table_id)
}

/// Finds the resize handle of `placement` under `point`, in `nw, ne, sw, se`
/// priority order. The pointer is mapped into the placement's unrotated frame
/// first, so handles follow the table's rotation.
pub fn hit_test_handle(point: Point2D, placement: &TablePlacement) -> Option<ResizeHandle> {
    let local = world_to_local(placement, point);
    let handles = handle_positions(placement);
    ResizeHandle::all()
        .iter()
        .copied()
        .find(|&handle| handles.get(handle).distance_to(&local) <= HANDLE_TOLERANCE)
}
