// src/layout/placement.rs

use serde::{Deserialize, Serialize};

use super::{TableId, DEFAULT_SIZE};

/// The outline a table is drawn and hit-tested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Rectangle,
    Square,
    Circle,
}

impl TableShape {
    pub fn name(&self) -> &'static str {
        match self {
            TableShape::Rectangle => "Rectangle",
            TableShape::Square => "Square",
            TableShape::Circle => "Circle",
        }
    }

    pub fn all() -> &'static [TableShape] {
        &[TableShape::Rectangle, TableShape::Square, TableShape::Circle]
    }

    /// Square and circle tables keep equal sides.
    pub fn is_uniform(&self) -> bool {
        !matches!(self, TableShape::Rectangle)
    }
}

/// Live occupancy as reported by the registry. Read-only for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl TableStatus {
    pub fn name(&self) -> &'static str {
        match self {
            TableStatus::Available => "Available",
            TableStatus::Occupied => "Occupied",
            TableStatus::Reserved => "Reserved",
            TableStatus::Cleaning => "Cleaning",
        }
    }
}

/// One table's position on the floor plan.
///
/// `x`/`y` is the top-left corner of the unrotated rectangle, in plan units.
/// Rotation is applied about the rectangle's own center and never changes the
/// stored geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlacement {
    /// Foreign key into the table registry.
    pub table_id: TableId,

    /// Table number, copied from the registry for rendering.
    pub label: String,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    pub shape: TableShape,

    /// Degrees in `[0, 360)`.
    pub rotation: f64,

    /// Seat count. Sourced from the registry, may be overridden locally.
    pub capacity: u32,

    pub status: TableStatus,
}

impl TablePlacement {
    /// Creates a default-sized rectangular placement at `(x, y)`.
    pub fn new(table_id: impl Into<TableId>, label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            table_id: table_id.into(),
            label: label.into(),
            x,
            y,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            shape: TableShape::default(),
            rotation: 0.0,
            capacity: 0,
            status: TableStatus::default(),
        }
    }

    /// Sets the rotation, wrapping into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
