// src/document/repository.rs

use std::sync::Arc;

use log::{error, info};

use super::reconcile;
use super::record::{FloorPlanRecord, RegistryTable};
use super::store::{PlanStore, TableRegistry};
use crate::error::LayoutError;
use crate::layout::{FloorPlan, TableId};

pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;

/// Loads, creates, and saves the active floor plan, keeping it consistent
/// with the table registry.
#[derive(Clone)]
pub struct LayoutRepository {
    store: Arc<dyn PlanStore>,
    registry: Arc<dyn TableRegistry>,
    canvas_width: f64,
    canvas_height: f64,
}

impl LayoutRepository {
    pub fn new(store: Arc<dyn PlanStore>, registry: Arc<dyn TableRegistry>) -> Self {
        Self {
            store,
            registry,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }

    /// Canvas extent used for newly created plans.
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn registry_tables(&self) -> Result<Vec<RegistryTable>, LayoutError> {
        self.registry.list_tables()
    }

    /// The active plan reconciled against the registry, or `None` if the
    /// venue has no plan yet.
    pub fn load(&self) -> Result<Option<FloorPlan>, LayoutError> {
        self.load_with_registry().map(|(plan, _)| plan)
    }

    /// Like [`load`](Self::load), also returning the registry snapshot the
    /// plan was reconciled against.
    pub fn load_with_registry(&self) -> Result<(Option<FloorPlan>, Vec<RegistryTable>), LayoutError> {
        let tables = self.registry.list_tables().map_err(|e| {
            error!("Failed to fetch table registry: {}", e);
            e
        })?;
        let record = self.store.load_active().map_err(|e| {
            error!("Failed to load floor plan: {}", e);
            e
        })?;
        let plan = record.map(|record| {
            let plan = reconcile::merge(record, &tables);
            info!("Loaded floor plan {} ({} tables)", plan.name, plan.tables.len());
            plan
        });
        Ok((plan, tables))
    }

    /// Seeds and persists a new plan with one placement per registry table.
    pub fn create(&self, name: &str, tables: &[RegistryTable]) -> Result<FloorPlan, LayoutError> {
        let id = format!("plan-{:08x}", rand::random::<u32>());
        let plan = reconcile::seed_plan(id, name, self.canvas_width, self.canvas_height, tables);
        self.save(&plan)?;
        info!("Created floor plan {} with {} tables", plan.name, plan.tables.len());
        Ok(plan)
    }

    /// Places every registry table missing from `plan`. Returns the added ids.
    pub fn add_unplaced(&self, plan: &mut FloorPlan) -> Result<Vec<TableId>, LayoutError> {
        let tables = self.registry.list_tables()?;
        let added = reconcile::add_unplaced(plan, &tables);
        if added.is_empty() {
            info!("All registry tables are already placed");
        } else {
            info!("Placed {} new tables", added.len());
        }
        Ok(added)
    }

    /// Persists the editor-owned fields of every placement.
    pub fn save(&self, plan: &FloorPlan) -> Result<(), LayoutError> {
        let record = FloorPlanRecord::from(plan);
        match self.store.save(&record) {
            Ok(()) => {
                info!("Saved floor plan {} ({} tables)", plan.name, plan.tables.len());
                Ok(())
            }
            Err(e) => {
                error!("Failed to save floor plan {}: {}", plan.name, e);
                Err(e)
            }
        }
    }
}
