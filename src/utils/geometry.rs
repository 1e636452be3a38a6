// src/utils/geometry.rs
//! Plan-space geometry: points, rectangles, and the rotation model used for
//! table placements.
//!
//! A placement stores its unrotated rectangle. Rotation is applied only when
//! drawing and hit-testing, about the rectangle's own center, so the "local"
//! frame of a placement is simply plan space with the rotation undone.

use crate::layout::{TablePlacement, MAX_SIZE, MIN_SIZE};
use crate::utils::util::clamp;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point2D {
        Point2D::new(self.x + dx, self.y + dy)
    }

    pub fn scale(&self, factor: f64) -> Point2D {
        Point2D::new(self.x * factor, self.y * factor)
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive on all edges.
    pub fn contains_point(&self, point: &Point2D) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// True when the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }
}

/// Rotates `point` about `pivot` by `degrees`. Positive angles turn clockwise
/// on screen (y grows downward).
pub fn rotate_about(point: Point2D, pivot: Point2D, degrees: f64) -> Point2D {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point2D::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

/// The placement's stored rectangle. Rotation does not affect it.
pub fn bounding_box(p: &TablePlacement) -> Rect {
    Rect::new(p.x, p.y, p.width, p.height)
}

pub fn center(p: &TablePlacement) -> Point2D {
    Point2D::new(p.x + p.width / 2.0, p.y + p.height / 2.0)
}

/// Maps a point from the placement's unrotated frame into plan space.
pub fn local_to_world(p: &TablePlacement, local: Point2D) -> Point2D {
    rotate_about(local, center(p), p.rotation)
}

/// Maps a plan-space point into the placement's unrotated frame.
pub fn world_to_local(p: &TablePlacement, world: Point2D) -> Point2D {
    rotate_about(world, center(p), -p.rotation)
}

/// One of the four corner resize manipulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    /// All handles in hit-test priority order.
    pub fn all() -> &'static [ResizeHandle] {
        &[ResizeHandle::Nw, ResizeHandle::Ne, ResizeHandle::Sw, ResizeHandle::Se]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResizeHandle::Nw => "nw",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Sw => "sw",
            ResizeHandle::Se => "se",
        }
    }

    /// True when dragging this handle moves the left edge.
    pub fn moves_left(&self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw)
    }

    /// True when dragging this handle moves the top edge.
    pub fn moves_top(&self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne)
    }
}

/// Unrotated corner coordinates of a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePositions {
    pub nw: Point2D,
    pub ne: Point2D,
    pub sw: Point2D,
    pub se: Point2D,
}

impl HandlePositions {
    pub fn get(&self, handle: ResizeHandle) -> Point2D {
        match handle {
            ResizeHandle::Nw => self.nw,
            ResizeHandle::Ne => self.ne,
            ResizeHandle::Sw => self.sw,
            ResizeHandle::Se => self.se,
        }
    }
}

pub fn handle_positions(p: &TablePlacement) -> HandlePositions {
    let rect = bounding_box(p);
    HandlePositions {
        nw: Point2D::new(rect.x, rect.y),
        ne: Point2D::new(rect.right(), rect.y),
        sw: Point2D::new(rect.x, rect.bottom()),
        se: Point2D::new(rect.right(), rect.bottom()),
    }
}

/// The placement's corners in plan space, clockwise from the top-left, with
/// rotation applied.
pub fn rotated_corners(p: &TablePlacement) -> [Point2D; 4] {
    let h = handle_positions(p);
    [
        local_to_world(p, h.nw),
        local_to_world(p, h.ne),
        local_to_world(p, h.se),
        local_to_world(p, h.sw),
    ]
}

/// Clamps both dimensions independently into `[MIN_SIZE, MAX_SIZE]`.
pub fn clamp_size(width: f64, height: f64) -> (f64, f64) {
    (clamp(width, MIN_SIZE, MAX_SIZE), clamp(height, MIN_SIZE, MAX_SIZE))
}
