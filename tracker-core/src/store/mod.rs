//! Persisted store adapter.
//!
//! The whole project collection lives in a single [`Slot`]. The adapter
//! keeps the last collection it saw in memory and falls back to it whenever
//! the slot cannot be read or written, so callers never see a persistence
//! error.

mod config;
mod file;
mod memory;
mod schema;
mod sqlite;

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::clock::Clock;
use crate::models::Project;
use crate::seed;

pub use config::{default_data_dir, Backend, StoreConfig};
pub use file::FileSlot;
pub use memory::MemorySlot;
pub use sqlite::SqliteSlot;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A named location holding the serialized project collection.
///
/// `read` returns `Ok(None)` when nothing has ever been written. The keyed
/// operations receive the collection as it looks after the change; slots
/// that store one blob just rewrite it, slots that store one record per key
/// touch only that record.
pub trait Slot: Send {
    fn describe(&self) -> String;

    fn read(&self) -> StoreResult<Option<Vec<Project>>>;

    fn write(&mut self, projects: &[Project]) -> StoreResult<()>;

    fn put(&mut self, projects: &[Project], _project: &Project) -> StoreResult<()> {
        self.write(projects)
    }

    fn remove(&mut self, projects: &[Project], _id: &str) -> StoreResult<()> {
        self.write(projects)
    }
}

struct Inner {
    slot: Box<dyn Slot>,
    cache: Vec<Project>,
    seed: Vec<Project>,
}

impl Inner {
    /// Re-reads the slot into the cache.
    ///
    /// An empty slot is seeded and persisted. A slot that cannot be read or
    /// parsed leaves the cache as it was.
    fn refresh(&mut self) {
        match self.slot.read() {
            Ok(Some(mut projects)) => {
                projects.iter_mut().for_each(Project::normalize);
                self.cache = projects;
            }
            Ok(None) => {
                self.cache = self.seed.clone();
                self.persist_all("Initialized slot with default projects");
            }
            Err(e) => tracing::error!(
                slot = %self.slot.describe(),
                error = %e,
                "Failed to read project slot, using in-memory collection"
            ),
        }
    }

    fn persist_all(&mut self, done: &str) {
        match self.slot.write(&self.cache) {
            Ok(()) => tracing::debug!(count = self.cache.len(), "{}", done),
            Err(e) => tracing::error!(
                slot = %self.slot.describe(),
                error = %e,
                "Failed to save project collection"
            ),
        }
    }

    fn persist_project(&mut self, index: usize) {
        let project = &self.cache[index];
        match self.slot.put(&self.cache, project) {
            Ok(()) => tracing::debug!(project_id = %project.id, "Saved project"),
            Err(e) => tracing::error!(
                slot = %self.slot.describe(),
                project_id = %project.id,
                error = %e,
                "Failed to save project"
            ),
        }
    }
}

pub struct StoreAdapter {
    inner: Mutex<Inner>,
    clock: Clock,
}

impl StoreAdapter {
    /// Adapter over `slot`, seeding it with the example project when empty.
    pub fn new(slot: Box<dyn Slot>) -> Self {
        Self::with_seed(slot, seed::default_projects(Utc::now()))
    }

    pub fn with_seed(slot: Box<dyn Slot>, seed: Vec<Project>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                slot,
                cache: seed.clone(),
                seed,
            }),
            clock: Clock::new(),
        }
    }

    /// Process-local adapter; nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySlot::new()))
    }

    pub fn describe(&self) -> String {
        self.lock().slot.describe()
    }

    /// Timestamp and id source shared by everything writing to this store.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Latest persisted collection.
    ///
    /// An empty slot is seeded and persisted. A slot that cannot be read or
    /// parsed yields the last collection this adapter saw.
    pub fn load(&self) -> Vec<Project> {
        let mut inner = self.lock();
        inner.refresh();
        inner.cache.clone()
    }

    /// Overwrites the whole collection.
    pub fn save(&self, projects: &[Project]) {
        let mut inner = self.lock();
        inner.cache = projects.to_vec();
        inner.persist_all("Saved project collection");
    }

    /// Writes the seed collection if the slot holds no projects, including
    /// a slot explicitly saved as empty. Returns whether it wrote anything.
    pub fn seed_if_empty(&self) -> bool {
        let mut inner = self.lock();
        inner.refresh();
        if !inner.cache.is_empty() {
            return false;
        }
        inner.cache = inner.seed.clone();
        inner.persist_all("Seeded empty project slot");
        true
    }

    /// Replaces the project with the same id, or appends it.
    pub fn save_project(&self, project: &Project) {
        let mut inner = self.lock();
        inner.refresh();

        let index = match inner.cache.iter().position(|p| p.id == project.id) {
            Some(index) => {
                inner.cache[index] = project.clone();
                index
            }
            None => {
                inner.cache.push(project.clone());
                inner.cache.len() - 1
            }
        };
        inner.persist_project(index);
    }

    /// Read-modify-write of one project under a single lock.
    ///
    /// `f` edits a copy of the latest stored project. If the project is
    /// gone or `f` returns `None`, nothing is written and `None` is
    /// returned; otherwise the copy replaces the stored project.
    pub fn modify_project<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Project) -> Option<R>,
    ) -> Option<R> {
        let mut inner = self.lock();
        inner.refresh();

        let index = inner.cache.iter().position(|p| p.id == id)?;
        let mut draft = inner.cache[index].clone();
        let out = f(&mut draft)?;

        inner.cache[index] = draft;
        inner.persist_project(index);
        Some(out)
    }

    /// Removes a project by id. Returns whether it was present.
    pub fn remove_project(&self, id: &str) -> bool {
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.refresh();

        let before = inner.cache.len();
        inner.cache.retain(|p| p.id != id);
        if inner.cache.len() == before {
            return false;
        }

        match inner.slot.remove(&inner.cache, id) {
            Ok(()) => tracing::debug!(
                project_id = %id,
                remaining = inner.cache.len(),
                "Removed project"
            ),
            Err(e) => tracing::error!(
                slot = %inner.slot.describe(),
                project_id = %id,
                error = %e,
                "Failed to remove project"
            ),
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
