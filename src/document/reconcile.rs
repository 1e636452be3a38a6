// src/document/reconcile.rs
//! Merging saved placements with the table registry.

use std::collections::{HashMap, HashSet};

use log::warn;

use super::record::{FloorPlanRecord, RegistryTable};
use crate::layout::{normalize_degrees, FloorPlan, TableId, TablePlacement};
use crate::utils::geometry::{bounding_box, clamp_size, Point2D};

/// Top-left of the first seeded slot.
pub const SEED_ORIGIN: Point2D = Point2D { x: 50.0, y: 80.0 };
/// Distance between seeded slots on both axes.
pub const SEED_SPACING: f64 = 160.0;
pub const SEED_COLUMNS: usize = 5;

/// Top-left corner of seed slot `slot`, filling rows left to right.
pub fn seed_position(slot: usize) -> Point2D {
    let col = (slot % SEED_COLUMNS) as f64;
    let row = (slot / SEED_COLUMNS) as f64;
    SEED_ORIGIN.offset(col * SEED_SPACING, row * SEED_SPACING)
}

/// A default placement for `table` at seed slot `slot`.
pub fn seed_placement(table: &RegistryTable, slot: usize) -> TablePlacement {
    let at = seed_position(slot);
    let mut placement = TablePlacement::new(table.id.clone(), table.label.clone(), at.x, at.y);
    placement.capacity = table.capacity;
    placement.status = table.status;
    placement
}

/// A new plan with one seeded placement per registry table, in registry
/// order. Duplicate registry ids are placed once.
pub fn seed_plan(
    id: impl Into<String>,
    name: impl Into<String>,
    width: f64,
    height: f64,
    tables: &[RegistryTable],
) -> FloorPlan {
    let mut plan = FloorPlan::new(id, name, width, height);
    add_unplaced(&mut plan, tables);
    plan
}

/// Builds the in-memory plan from a saved record.
///
/// Registry fields (label, capacity, status) are merged in by table id.
/// Placements whose table is gone from the registry are dropped and logged.
/// Sizes outside the allowed range are clamped and rotation is normalised.
pub fn merge(record: FloorPlanRecord, tables: &[RegistryTable]) -> FloorPlan {
    let registry: HashMap<&str, &RegistryTable> =
        tables.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut plan = FloorPlan::new(record.id, record.name, record.width, record.height);
    plan.areas = record.areas;

    for saved in record.tables {
        let Some(table) = registry.get(saved.table_id.as_str()) else {
            warn!("Dropping placement for unknown table {}", saved.table_id);
            continue;
        };
        let (width, height) = clamp_size(saved.width, saved.height);
        let placement = TablePlacement {
            table_id: saved.table_id,
            label: table.label.clone(),
            x: if saved.x.is_finite() { saved.x } else { 0.0 },
            y: if saved.y.is_finite() { saved.y } else { 0.0 },
            width,
            height,
            shape: saved.shape,
            rotation: normalize_degrees(saved.rotation),
            capacity: table.capacity,
            status: table.status,
        };
        if !plan.add_placement(placement) {
            warn!("Ignoring duplicate placement for table {}", table.id);
        }
    }
    plan
}

/// Appends seeded placements for every registry table not yet on the plan.
///
/// Existing placements are untouched. Each new table takes the first seed
/// slot whose rectangle no placement overlaps. Returns the ids that were
/// added, which is empty when everything is already placed.
pub fn add_unplaced(plan: &mut FloorPlan, tables: &[RegistryTable]) -> Vec<TableId> {
    let mut placed: HashSet<TableId> = plan.table_ids().cloned().collect();
    let mut added = Vec::new();
    let mut slot = 0;
    for table in tables {
        if !placed.insert(table.id.clone()) {
            continue;
        }
        let mut placement = seed_placement(table, slot);
        while slot_taken(plan, &placement) {
            slot += 1;
            placement = seed_placement(table, slot);
        }
        plan.add_placement(placement);
        added.push(table.id.clone());
        slot += 1;
    }
    added
}

fn slot_taken(plan: &FloorPlan, candidate: &TablePlacement) -> bool {
    let rect = bounding_box(candidate);
    plan.tables.iter().any(|p| bounding_box(p).intersects(&rect))
}

/// The first registry table that has no placement yet.
pub fn first_unplaced<'a>(plan: &FloorPlan, tables: &'a [RegistryTable]) -> Option<&'a RegistryTable> {
    tables.iter().find(|t| !plan.contains(&t.id))
}

/// Copies registry-owned display fields (label, status) onto placements.
/// Returns how many placements changed.
pub fn refresh_registry_fields(plan: &mut FloorPlan, tables: &[RegistryTable]) -> usize {
    let mut changed = 0;
    for table in tables {
        if let Some(p) = plan.placement_mut(&table.id) {
            if p.label != table.label || p.status != table.status {
                p.label = table.label.clone();
                p.status = table.status;
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::record::PlacementRecord;
    use crate::layout::{TableShape, TableStatus, MAX_SIZE, MIN_SIZE};
    use assert_approx_eq::assert_approx_eq;

    fn registry(n: usize) -> Vec<RegistryTable> {
        (1..=n)
            .map(|i| RegistryTable::new(format!("T{}", i), format!("{}", i), 4))
            .collect()
    }

    fn saved(table_id: &str, x: f64, y: f64) -> PlacementRecord {
        PlacementRecord {
            table_id: table_id.into(),
            x,
            y,
            width: 80.0,
            height: 80.0,
            rotation: 0.0,
            shape: TableShape::Rectangle,
        }
    }

    fn record(tables: Vec<PlacementRecord>) -> FloorPlanRecord {
        FloorPlanRecord {
            id: "p1".into(),
            name: "Main".into(),
            width: 1200.0,
            height: 800.0,
            tables,
            areas: Vec::new(),
        }
    }

    #[test]
    fn test_seed_positions() {
        assert_eq!(seed_position(0), Point2D::new(50.0, 80.0));
        assert_eq!(seed_position(1), Point2D::new(210.0, 80.0));
        assert_eq!(seed_position(2), Point2D::new(370.0, 80.0));
        assert_eq!(seed_position(5), Point2D::new(50.0, 240.0));
    }

    #[test]
    fn test_seed_plan_defaults() {
        let plan = seed_plan("p", "Main", 1200.0, 800.0, &registry(3));
        assert_eq!(plan.tables.len(), 3);
        for p in &plan.tables {
            assert_approx_eq!(p.width, 80.0);
            assert_approx_eq!(p.height, 80.0);
            assert_approx_eq!(p.rotation, 0.0);
            assert_eq!(p.shape, TableShape::Rectangle);
        }
        assert_approx_eq!(plan.placement("T2").unwrap().x, 210.0);
    }

    #[test]
    fn test_merge_drops_orphans() {
        let rec = record(vec![saved("T1", 0.0, 0.0), saved("GONE", 10.0, 10.0), saved("T2", 100.0, 0.0)]);
        let plan = merge(rec, &registry(2));
        let ids: Vec<_> = plan.table_ids().cloned().collect();
        assert_eq!(ids, vec!["T1".to_string(), "T2".to_string()]);
    }

    #[test]
    fn test_merge_takes_registry_fields() {
        let mut tables = registry(1);
        tables[0].label = "Window".into();
        tables[0].capacity = 6;
        tables[0].status = TableStatus::Reserved;
        let plan = merge(record(vec![saved("T1", 0.0, 0.0)]), &tables);
        let p = plan.placement("T1").unwrap();
        assert_eq!(p.label, "Window");
        assert_eq!(p.capacity, 6);
        assert_eq!(p.status, TableStatus::Reserved);
    }

    #[test]
    fn test_merge_repairs_geometry() {
        let mut bad = saved("T1", f64::NAN, 5.0);
        bad.width = 5.0;
        bad.height = 900.0;
        bad.rotation = -90.0;
        let plan = merge(record(vec![bad, saved("T1", 1.0, 1.0)]), &registry(1));
        assert_eq!(plan.tables.len(), 1);
        let p = &plan.tables[0];
        assert_approx_eq!(p.x, 0.0);
        assert_approx_eq!(p.width, MIN_SIZE);
        assert_approx_eq!(p.height, MAX_SIZE);
        assert_approx_eq!(p.rotation, 270.0);
    }

    #[test]
    fn test_add_unplaced_fills_registry() {
        let tables = registry(7);
        let mut plan = merge(record(vec![saved("T3", 0.0, 0.0), saved("T5", 100.0, 0.0)]), &tables);
        let before: Vec<_> = plan.tables.clone();

        let added = add_unplaced(&mut plan, &tables);
        assert_eq!(added.len(), 5);
        assert_eq!(plan.tables.len(), 7);
        assert_eq!(&plan.tables[..2], &before[..]);

        let unique: HashSet<_> = plan.table_ids().collect();
        assert_eq!(unique.len(), 7);

        let snapshot = plan.clone();
        assert!(add_unplaced(&mut plan, &tables).is_empty());
        assert_eq!(plan, snapshot);
    }

    #[test]
    fn test_readded_table_takes_free_slot() {
        let tables = registry(3);
        let mut plan = seed_plan("p", "Main", 1200.0, 800.0, &tables);
        plan.remove_placement("T2");

        assert_eq!(add_unplaced(&mut plan, &tables), vec!["T2".to_string()]);
        let t2 = bounding_box(plan.placement("T2").unwrap());
        assert_eq!((t2.x, t2.y), (210.0, 80.0));
        for other in plan.tables.iter().filter(|p| p.table_id != "T2") {
            assert!(!bounding_box(other).intersects(&t2), "T2 overlaps {}", other.table_id);
        }
    }

    #[test]
    fn test_add_unplaced_skips_occupied_slots() {
        let tables = registry(3);
        let mut plan = merge(record(vec![saved("T1", 60.0, 90.0)]), &tables);
        add_unplaced(&mut plan, &tables);
        assert_eq!((plan.placement("T2").unwrap().x, plan.placement("T3").unwrap().x), (210.0, 370.0));
    }

    #[test]
    fn test_add_unplaced_ignores_duplicate_registry_rows() {
        let mut tables = registry(2);
        tables.push(tables[0].clone());
        let mut plan = FloorPlan::new("p", "Main", 800.0, 600.0);
        assert_eq!(add_unplaced(&mut plan, &tables).len(), 2);
    }

    #[test]
    fn test_first_unplaced_and_refresh() {
        let mut tables = registry(3);
        let mut plan = seed_plan("p", "Main", 800.0, 600.0, &tables[..2]);
        assert_eq!(first_unplaced(&plan, &tables).map(|t| t.id.as_str()), Some("T3"));

        tables[0].status = TableStatus::Occupied;
        assert_eq!(refresh_registry_fields(&mut plan, &tables), 1);
        assert_eq!(plan.placement("T1").unwrap().status, TableStatus::Occupied);
        assert_eq!(refresh_registry_fields(&mut plan, &tables), 0);
    }
}
