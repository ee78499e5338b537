use crate::models::Project;

use super::{Slot, StoreResult};

/// Process-local slot used when no persistent context is configured.
#[derive(Debug, Default)]
pub struct MemorySlot {
    projects: Option<Vec<Project>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slot for MemorySlot {
    fn describe(&self) -> String {
        "memory".into()
    }

    fn read(&self) -> StoreResult<Option<Vec<Project>>> {
        Ok(self.projects.clone())
    }

    fn write(&mut self, projects: &[Project]) -> StoreResult<()> {
        self.projects = Some(projects.to_vec());
        Ok(())
    }
}
