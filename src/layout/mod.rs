// src/layout/mod.rs
pub mod area;
pub mod floor_plan;
pub mod placement;

pub use area::Area;
pub use floor_plan::FloorPlan;
pub use placement::{normalize_degrees, TablePlacement, TableShape, TableStatus};

/// Identifier of a table in the external registry.
pub type TableId = String;

/// Smallest width/height a placement may have, in plan units.
pub const MIN_SIZE: f64 = 40.0;
/// Largest width/height a placement may have, in plan units.
pub const MAX_SIZE: f64 = 200.0;
/// Size of freshly seeded or added placements.
pub const DEFAULT_SIZE: f64 = 80.0;
