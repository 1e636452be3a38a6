// src/document/store.rs

use super::record::{FloorPlanRecord, RegistryTable};
use crate::error::LayoutError;

/// Persistence for the venue's active floor plan.
pub trait PlanStore: Send + Sync {
    /// The active plan, or `None` if the venue has none yet.
    fn load_active(&self) -> Result<Option<FloorPlanRecord>, LayoutError>;

    /// Stores `record` as the active plan.
    fn save(&self, record: &FloorPlanRecord) -> Result<(), LayoutError>;
}

/// Read access to the external system of record for tables.
pub trait TableRegistry: Send + Sync {
    fn list_tables(&self) -> Result<Vec<RegistryTable>, LayoutError>;
}
