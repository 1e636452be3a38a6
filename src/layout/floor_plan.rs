// src/layout/floor_plan.rs

use super::{Area, TableId, TablePlacement};

/// The aggregate root of the layout: canvas extent, table placements (in
/// z-order, last is top-most) and areas.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlan {
    pub id: String,
    pub name: String,

    /// Canvas extent in plan units.
    pub width: f64,
    pub height: f64,

    /// Unique by `table_id`. Array order is z-order.
    pub tables: Vec<TablePlacement>,

    pub areas: Vec<Area>,
}

impl FloorPlan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            tables: Vec::new(),
            areas: Vec::new(),
        }
    }

    pub fn contains(&self, table_id: &str) -> bool {
        self.index_of(table_id).is_some()
    }

    pub fn index_of(&self, table_id: &str) -> Option<usize> {
        self.tables.iter().position(|p| p.table_id == table_id)
    }

    pub fn placement(&self, table_id: &str) -> Option<&TablePlacement> {
        self.tables.iter().find(|p| p.table_id == table_id)
    }

    pub fn placement_mut(&mut self, table_id: &str) -> Option<&mut TablePlacement> {
        self.tables.iter_mut().find(|p| p.table_id == table_id)
    }

    /// Appends a placement on top of the z-order. Returns `false` (and leaves
    /// the plan untouched) if the table is already placed.
    pub fn add_placement(&mut self, placement: TablePlacement) -> bool {
        if self.contains(&placement.table_id) {
            return false;
        }
        self.tables.push(placement);
        true
    }

    /// Inserts at a specific z-order slot, clamped to the current length.
    pub fn insert_placement(&mut self, index: usize, placement: TablePlacement) -> bool {
        if self.contains(&placement.table_id) {
            return false;
        }
        let index = index.min(self.tables.len());
        self.tables.insert(index, placement);
        true
    }

    /// Removes a placement, returning its former z-order index with it.
    pub fn remove_placement(&mut self, table_id: &str) -> Option<(usize, TablePlacement)> {
        let index = self.index_of(table_id)?;
        Some((index, self.tables.remove(index)))
    }

    pub fn table_ids(&self) -> impl Iterator<Item = &TableId> {
        self.tables.iter().map(|p| &p.table_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> FloorPlan {
        let mut plan = FloorPlan::new("p1", "Main", 800.0, 600.0);
        plan.add_placement(TablePlacement::new("T1", "1", 0.0, 0.0));
        plan.add_placement(TablePlacement::new("T2", "2", 100.0, 0.0));
        plan
    }

    #[test]
    fn test_placements_unique_by_table_id() {
        let mut plan = plan();
        assert!(!plan.add_placement(TablePlacement::new("T1", "1", 300.0, 300.0)));
        assert_eq!(plan.tables.len(), 2);
        assert_eq!(plan.placement("T1").unwrap().x, 0.0);
    }

    #[test]
    fn test_remove_and_reinsert_keeps_z_order() {
        let mut plan = plan();
        let (index, removed) = plan.remove_placement("T1").unwrap();
        assert_eq!(index, 0);
        assert_eq!(plan.tables.len(), 1);
        assert!(plan.insert_placement(index, removed));
        let ids: Vec<_> = plan.table_ids().cloned().collect();
        assert_eq!(ids, vec!["T1".to_string(), "T2".to_string()]);
    }

    #[test]
    fn test_remove_missing() {
        let mut plan = plan();
        assert!(plan.remove_placement("T9").is_none());
    }
}
