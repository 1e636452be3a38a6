// src/document/record.rs
//! Wire/storage shapes. Positions are plan units, so a stored layout does not
//! depend on screen resolution or zoom.

use serde::{Deserialize, Serialize};

use crate::layout::{Area, FloorPlan, TableId, TablePlacement, TableShape, TableStatus};

/// A table as the registry reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryTable {
    pub id: TableId,
    pub label: String,
    pub capacity: u32,
    #[serde(default)]
    pub status: TableStatus,
}

impl RegistryTable {
    pub fn new(id: impl Into<TableId>, label: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            capacity,
            status: TableStatus::default(),
        }
    }
}

/// The editor-owned fields of one placement. Status and capacity belong to
/// the registry and are never written by a layout save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub table_id: TableId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub shape: TableShape,
}

impl From<&TablePlacement> for PlacementRecord {
    fn from(p: &TablePlacement) -> Self {
        Self {
            table_id: p.table_id.clone(),
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
            rotation: p.rotation,
            shape: p.shape,
        }
    }
}

/// A persisted floor plan, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanRecord {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub tables: Vec<PlacementRecord>,
    #[serde(default)]
    pub areas: Vec<Area>,
}

impl From<&FloorPlan> for FloorPlanRecord {
    fn from(plan: &FloorPlan) -> Self {
        Self {
            id: plan.id.clone(),
            name: plan.name.clone(),
            width: plan.width,
            height: plan.height,
            tables: plan.tables.iter().map(PlacementRecord::from).collect(),
            areas: plan.areas.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_carries_only_editor_fields() {
        let mut plan = FloorPlan::new("p1", "Main", 800.0, 600.0);
        let mut p = TablePlacement::new("T1", "1", 10.0, 20.0);
        p.status = TableStatus::Occupied;
        p.capacity = 6;
        plan.add_placement(p);

        let json = serde_json::to_value(FloorPlanRecord::from(&plan)).unwrap();
        let table = &json["tables"][0];
        let mut keys: Vec<_> = table.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["height", "rotation", "shape", "tableId", "width", "x", "y"]);
        assert_eq!(table["tableId"], "T1");
    }

    #[test]
    fn test_record_defaults_optional_fields() {
        let json = r#"{"id":"p","name":"Main","width":800,"height":600,
            "tables":[{"tableId":"T1","x":0,"y":0,"width":80,"height":80}]}"#;
        let record: FloorPlanRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tables[0].shape, TableShape::Rectangle);
        assert_eq!(record.tables[0].rotation, 0.0);
        assert!(record.areas.is_empty());
    }
}
