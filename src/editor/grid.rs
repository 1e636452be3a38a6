// src/editor/grid.rs

use crate::utils::geometry::Point2D;
use crate::utils::util::snap;

/// Grid snapping settings. Drags snap the table origin, resizes snap the
/// size. Rotation is never snapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    pub enabled: bool,
    pub step: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            step: 20.0,
        }
    }
}

impl GridSettings {
    pub fn new(enabled: bool, step: f64) -> Self {
        Self { enabled, step }
    }

    pub fn snap(&self, value: f64) -> f64 {
        snap(value, self.step, self.enabled)
    }

    pub fn snap_point(&self, point: Point2D) -> Point2D {
        Point2D::new(self.snap(point.x), self.snap(point.y))
    }
}
