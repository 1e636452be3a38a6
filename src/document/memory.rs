// src/document/memory.rs

use parking_lot::RwLock;

use super::record::{FloorPlanRecord, RegistryTable};
use super::store::{PlanStore, TableRegistry};
use crate::error::LayoutError;

/// Plan store and registry held in memory. Backs the editor when no
/// persistence is configured, and the tests.
#[derive(Default)]
pub struct MemoryStore {
    plan: RwLock<Option<FloorPlanRecord>>,
    tables: RwLock<Vec<RegistryTable>>,
    fail_next: RwLock<Option<String>>,
    saves: RwLock<usize>,
    lists: RwLock<usize>,
}

impl MemoryStore {
    pub fn new(tables: Vec<RegistryTable>) -> Self {
        Self {
            tables: RwLock::new(tables),
            ..Self::default()
        }
    }

    pub fn with_plan(self, record: FloorPlanRecord) -> Self {
        *self.plan.write() = Some(record);
        self
    }

    pub fn set_tables(&self, tables: Vec<RegistryTable>) {
        *self.tables.write() = tables;
    }

    /// The last successfully saved (or seeded) plan.
    pub fn saved_plan(&self) -> Option<FloorPlanRecord> {
        self.plan.read().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.read()
    }

    /// How many registry reads have completed.
    pub fn list_count(&self) -> usize {
        *self.lists.read()
    }

    /// Makes the next store call (load, save, or list) fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.write() = Some(message.into());
    }

    fn check_failure(&self) -> Result<(), LayoutError> {
        match self.fail_next.write().take() {
            Some(message) => Err(LayoutError::Store(message)),
            None => Ok(()),
        }
    }
}

impl PlanStore for MemoryStore {
    fn load_active(&self) -> Result<Option<FloorPlanRecord>, LayoutError> {
        self.check_failure()?;
        Ok(self.plan.read().clone())
    }

    fn save(&self, record: &FloorPlanRecord) -> Result<(), LayoutError> {
        self.check_failure()?;
        *self.plan.write() = Some(record.clone());
        *self.saves.write() += 1;
        Ok(())
    }
}

impl TableRegistry for MemoryStore {
    fn list_tables(&self) -> Result<Vec<RegistryTable>, LayoutError> {
        self.check_failure()?;
        let tables = self.tables.read().clone();
        *self.lists.write() += 1;
        Ok(tables)
    }
}
