// src/document/json_store.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::record::{FloorPlanRecord, RegistryTable};
use super::store::{PlanStore, TableRegistry};
use crate::error::LayoutError;

pub const PLAN_FILE: &str = "floor_plan.json";
pub const TABLES_FILE: &str = "tables.json";

/// Plan store and registry snapshot kept as JSON files in one directory.
///
/// `floor_plan.json` holds the active plan; `tables.json` holds the table
/// list exported by the registry. Writes go to a temporary file first and are
/// renamed into place, so a failed save leaves the previous layout intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn plan_path(&self) -> PathBuf {
        self.dir.join(PLAN_FILE)
    }

    pub fn tables_path(&self) -> PathBuf {
        self.dir.join(TABLES_FILE)
    }

    /// Writes the registry snapshot. Used to seed a fresh data directory.
    pub fn write_tables(&self, tables: &[RegistryTable]) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(tables)?;
        self.write_atomic(&self.tables_path(), &json)
    }

    fn read_optional(path: &Path) -> Result<Option<String>, LayoutError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LayoutError::io(path, e)),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), LayoutError> {
        fs::create_dir_all(&self.dir).map_err(|e| LayoutError::io(&self.dir, e))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| LayoutError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| LayoutError::io(path, e))?;
        debug!("Wrote {} ({} bytes)", path.display(), contents.len());
        Ok(())
    }
}

impl PlanStore for JsonFileStore {
    fn load_active(&self) -> Result<Option<FloorPlanRecord>, LayoutError> {
        match Self::read_optional(&self.plan_path())? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, record: &FloorPlanRecord) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(record)?;
        self.write_atomic(&self.plan_path(), &json)
    }
}

impl TableRegistry for JsonFileStore {
    fn list_tables(&self) -> Result<Vec<RegistryTable>, LayoutError> {
        match Self::read_optional(&self.tables_path())? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => {
                warn!("No registry snapshot at {}", self.tables_path().display());
                Ok(Vec::new())
            }
        }
    }
}
