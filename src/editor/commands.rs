// src/editor/commands.rs

use crate::layout::{Area, FloorPlan, TableId, TablePlacement, TableShape};
use crate::utils::geometry::{bounding_box, Rect};

pub trait Command {
    fn execute(&mut self, plan: &mut FloorPlan) -> Result<(), String>;
    fn unexecute(&mut self, plan: &mut FloorPlan) -> Result<(), String>;
    fn undo(&mut self, plan: &mut FloorPlan) -> Result<(), String> {
        self.unexecute(plan)
    }
}

/// A reversible edit of the floor plan.
///
/// Interactive gestures apply their changes incrementally and are recorded
/// after the fact (one `SetGeometry` per completed drag or resize), so every
/// variant must be safe to `execute` on a plan where it has already been
/// applied.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandType {
    // Table Commands
    AddTable {
        placement: TablePlacement,
        index: Option<usize>,
    },
    DeleteTable {
        table_id: TableId,
        removed: Option<(usize, TablePlacement)>,
    },
    SetGeometry {
        table_id: TableId,
        before: Rect,
        after: Rect,
    },
    Rotate {
        table_id: TableId,
        before: f64,
        after: f64,
    },
    SetShape {
        table_id: TableId,
        before: (TableShape, Rect),
        after: (TableShape, Rect),
    },
    SetCapacity {
        table_id: TableId,
        before: u32,
        after: u32,
    },

    // Area Commands
    AddArea {
        area: Area,
        index: Option<usize>,
    },
    RemoveArea {
        index: usize,
        area: Option<Area>,
    },

    // Batch Operations
    BatchCommand { commands: Vec<CommandType> },
}

impl CommandType {
    /// Short label for status messages.
    pub fn describe(&self) -> String {
        match self {
            CommandType::AddTable { placement, .. } => format!("add table {}", placement.label),
            CommandType::DeleteTable { table_id, .. } => format!("delete table {}", table_id),
            CommandType::SetGeometry { table_id, .. } => format!("move/resize table {}", table_id),
            CommandType::Rotate { table_id, .. } => format!("rotate table {}", table_id),
            CommandType::SetShape { table_id, .. } => format!("reshape table {}", table_id),
            CommandType::SetCapacity { table_id, .. } => format!("set capacity of {}", table_id),
            CommandType::AddArea { area, .. } => format!("add area {}", area.name),
            CommandType::RemoveArea { index, .. } => format!("remove area #{}", index),
            CommandType::BatchCommand { commands } => format!("{} changes", commands.len()),
        }
    }
}

fn placement_mut<'a>(plan: &'a mut FloorPlan, table_id: &str) -> Result<&'a mut TablePlacement, String> {
    plan.placement_mut(table_id)
        .ok_or_else(|| format!("Table {} is not placed", table_id))
}

fn set_rect(placement: &mut TablePlacement, rect: Rect) {
    placement.x = rect.x;
    placement.y = rect.y;
    placement.width = rect.width;
    placement.height = rect.height;
}

impl Command for CommandType {
    fn execute(&mut self, plan: &mut FloorPlan) -> Result<(), String> {
        match self {
            CommandType::BatchCommand { commands } => {
                for command in commands {
                    command.execute(plan)?;
                }
                Ok(())
            }
            CommandType::AddTable { placement, index } => {
                if let Some(existing) = plan.index_of(&placement.table_id) {
                    *index = Some(existing);
                    return Ok(());
                }
                let slot = index.unwrap_or(plan.tables.len());
                plan.insert_placement(slot, placement.clone());
                *index = plan.index_of(&placement.table_id);
                Ok(())
            }
            CommandType::DeleteTable { table_id, removed } => {
                if !plan.contains(table_id) {
                    return if removed.is_some() {
                        Ok(())
                    } else {
                        Err(format!("Table {} is not placed", table_id))
                    };
                }
                *removed = plan.remove_placement(table_id);
                Ok(())
            }
            CommandType::SetGeometry { table_id, after, .. } => {
                set_rect(placement_mut(plan, table_id)?, *after);
                Ok(())
            }
            CommandType::Rotate { table_id, after, .. } => {
                placement_mut(plan, table_id)?.set_rotation(*after);
                Ok(())
            }
            CommandType::SetShape { table_id, after, .. } => {
                let p = placement_mut(plan, table_id)?;
                p.shape = after.0;
                set_rect(p, after.1);
                Ok(())
            }
            CommandType::SetCapacity { table_id, after, .. } => {
                placement_mut(plan, table_id)?.capacity = *after;
                Ok(())
            }
            CommandType::AddArea { area, index } => {
                if let Some(i) = *index {
                    if plan.areas.get(i) == Some(&*area) {
                        return Ok(());
                    }
                }
                let slot = index.unwrap_or(plan.areas.len()).min(plan.areas.len());
                plan.areas.insert(slot, area.clone());
                *index = Some(slot);
                Ok(())
            }
            CommandType::RemoveArea { index, area } => {
                if *index >= plan.areas.len() {
                    return Err(format!("Area #{} does not exist", index));
                }
                *area = Some(plan.areas.remove(*index));
                Ok(())
            }
        }
    }

    fn unexecute(&mut self, plan: &mut FloorPlan) -> Result<(), String> {
        match self {
            CommandType::BatchCommand { commands } => {
                for command in commands.iter_mut().rev() {
                    command.unexecute(plan)?;
                }
                Ok(())
            }
            CommandType::AddTable { placement, .. } => plan
                .remove_placement(&placement.table_id)
                .map(|_| ())
                .ok_or_else(|| format!("Table {} is not placed", placement.table_id)),
            CommandType::DeleteTable { table_id, removed } => match removed.take() {
                Some((index, placement)) => {
                    plan.insert_placement(index, placement);
                    Ok(())
                }
                None => Err(format!("Nothing to restore for table {}", table_id)),
            },
            CommandType::SetGeometry { table_id, before, .. } => {
                set_rect(placement_mut(plan, table_id)?, *before);
                Ok(())
            }
            CommandType::Rotate { table_id, before, .. } => {
                placement_mut(plan, table_id)?.set_rotation(*before);
                Ok(())
            }
            CommandType::SetShape { table_id, before, .. } => {
                let p = placement_mut(plan, table_id)?;
                p.shape = before.0;
                set_rect(p, before.1);
                Ok(())
            }
            CommandType::SetCapacity { table_id, before, .. } => {
                placement_mut(plan, table_id)?.capacity = *before;
                Ok(())
            }
            CommandType::AddArea { index, .. } => match *index {
                Some(i) if i < plan.areas.len() => {
                    plan.areas.remove(i);
                    Ok(())
                }
                _ => Err("Area to remove no longer exists".to_string()),
            },
            CommandType::RemoveArea { index, area } => match area.take() {
                Some(a) => {
                    let slot = (*index).min(plan.areas.len());
                    plan.areas.insert(slot, a);
                    Ok(())
                }
                None => Err(format!("Nothing to restore for area #{}", index)),
            },
        }
    }
}

/// Builds a `SetGeometry` record if the placement moved or changed size since
/// `before`.
pub fn geometry_change(placement: &TablePlacement, before: Rect) -> Option<CommandType> {
    let after = bounding_box(placement);
    if after == before {
        return None;
    }
    Some(CommandType::SetGeometry {
        table_id: placement.table_id.clone(),
        before,
        after,
    })
}
