// src/document/mod.rs
//! The layout repository: persisted records, the plan store and table
//! registry seams, reconciliation between them, and the background worker
//! that runs repository calls off the UI thread.
mod json_store;
mod memory;
mod reconcile;
mod record;
mod repository;
mod store;
mod sync;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
pub use reconcile::{
    add_unplaced, first_unplaced, merge, refresh_registry_fields, seed_placement, seed_plan,
    seed_position,
    SEED_COLUMNS, SEED_ORIGIN, SEED_SPACING,
};
pub use record::{FloorPlanRecord, PlacementRecord, RegistryTable};
pub use repository::LayoutRepository;
pub use store::{PlanStore, TableRegistry};
pub use sync::{LayoutSync, LoadOutcome, SyncEvent};
