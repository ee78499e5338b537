use std::path::PathBuf;

use directories::ProjectDirs;

use super::file::{FileSlot, DEFAULT_FILE_NAME};
use super::memory::MemorySlot;
use super::sqlite::{SqliteSlot, DEFAULT_DB_NAME};
use super::{Slot, StoreAdapter, StoreError, StoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    Memory,
    #[default]
    File,
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::Sqlite => "sqlite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "memory" => Some(Self::Memory),
            "file" => Some(Self::File),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    fn default_file_name(&self) -> Option<&'static str> {
        match self {
            Self::Memory => None,
            Self::File => Some(DEFAULT_FILE_NAME),
            Self::Sqlite => Some(DEFAULT_DB_NAME),
        }
    }
}

/// Which slot backs the store, chosen once at startup.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Location of the file or database. Defaults to the platform data dir.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory,
            path: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File,
            path: Some(path.into()),
        }
    }

    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Sqlite,
            path: Some(path.into()),
        }
    }

    pub fn resolved_path(&self) -> StoreResult<Option<PathBuf>> {
        let Some(file_name) = self.backend.default_file_name() else {
            return Ok(None);
        };
        if let Some(path) = &self.path {
            return Ok(Some(path.clone()));
        }
        default_data_dir()
            .map(|dir| Some(dir.join(file_name)))
            .ok_or_else(|| StoreError::Unavailable("no data directory for this platform".into()))
    }

    pub fn open_slot(&self) -> StoreResult<Box<dyn Slot>> {
        let path = self.resolved_path()?;
        let slot: Box<dyn Slot> = match (self.backend, path) {
            (Backend::File, Some(path)) => Box::new(FileSlot::new(path)),
            (Backend::Sqlite, Some(path)) => Box::new(SqliteSlot::open(path)?),
            _ => Box::new(MemorySlot::new()),
        };
        Ok(slot)
    }

    /// Opens the configured slot, falling back to memory if it is unavailable.
    pub fn open(&self) -> StoreAdapter {
        match self.open_slot() {
            Ok(slot) => {
                tracing::info!(slot = %slot.describe(), "Opened project store");
                StoreAdapter::new(slot)
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.as_str(),
                    error = %e,
                    "Project store unavailable, falling back to memory"
                );
                StoreAdapter::in_memory()
            }
        }
    }
}

pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "research-tracker", "research-tracker")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_backend_has_no_path() {
        assert_eq!(StoreConfig::memory().resolved_path().unwrap(), None);
    }

    #[test]
    fn explicit_path_wins() {
        let config = StoreConfig::file("/tmp/elsewhere.json");
        assert_eq!(
            config.resolved_path().unwrap(),
            Some(PathBuf::from("/tmp/elsewhere.json"))
        );
    }

    #[test]
    fn backend_names_round_trip() {
        for backend in [Backend::Memory, Backend::File, Backend::Sqlite] {
            assert_eq!(Backend::from_str(backend.as_str()), Some(backend));
        }
        assert_eq!(Backend::from_str("postgres"), None);
    }

    #[test]
    fn opens_each_backend() {
        let dir = TempDir::new().unwrap();

        let file = StoreConfig::file(dir.path().join("p.json")).open();
        assert!(file.describe().starts_with("file:"));

        let sqlite = StoreConfig::sqlite(dir.path().join("p.db")).open();
        assert!(sqlite.describe().starts_with("sqlite:"));

        assert_eq!(StoreConfig::memory().open().describe(), "memory");
    }

    #[test]
    fn unopenable_database_falls_back_to_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = StoreConfig::sqlite(blocker.join("p.db")).open();
        assert_eq!(store.describe(), "memory");
    }
}
