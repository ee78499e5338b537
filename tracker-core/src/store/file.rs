//! JSON file slot.
//!
//! The collection is stored as one JSON array. Writes go to a sibling temp
//! file which is then renamed over the target, so a crash mid-write leaves
//! the previous collection intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::Project;

use super::{Slot, StoreResult};

pub const DEFAULT_FILE_NAME: &str = "projects.json";

#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for FileSlot {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn read(&self) -> StoreResult<Option<Vec<Project>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let projects: Vec<Project> = serde_json::from_str(&json)?;
        Ok(Some(projects))
    }

    fn write(&mut self, projects: &[Project]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(projects)?;

        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
