// src/layout/area.rs

use serde::{Deserialize, Serialize};

use crate::utils::geometry::{Point2D, Rect};

/// A named zone on the floor plan (e.g. "Patio").
///
/// Areas are purely organizational: they may overlap tables freely and are
/// never hit-tested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,

    /// CSS-style hex color, `#rrggbb`.
    pub color: String,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Area {
    pub fn new(name: impl Into<String>, color: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Where the area's name is drawn.
    pub fn label_anchor(&self) -> Point2D {
        Point2D::new(self.x + 8.0, self.y + 8.0)
    }
}
