use crate::models::AppData;
use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read data file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize data: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write data file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Injected(String),
}

/// Whole-document store. `load` never fails: unreadable or malformed input
/// yields the default document.
pub trait Persistence: Send {
    fn load(&self) -> AppData;
    fn save(&self, data: &AppData) -> Result<(), StorageError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn try_load(&self) -> Result<Option<AppData>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> AppData {
        match self.try_load() {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(path = %self.path.display(), "no data file yet, starting empty");
                AppData::default()
            }
            Err(err) => {
                error!("{err}; falling back to an empty document");
                AppData::default()
            }
        }
    }

    fn save(&self, data: &AppData) -> Result<(), StorageError> {
        let payload =
            serde_json::to_vec_pretty(data).map_err(|source| StorageError::Serialize { source })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, payload).map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

/// In-memory store. Clones share the same document, so a test can keep a
/// handle and inspect what was written.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    data: Option<AppData>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: AppData) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.data = Some(data);
        }
        store
    }

    pub fn snapshot(&self) -> Option<AppData> {
        self.inner.lock().ok().and_then(|inner| inner.data.clone())
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> AppData {
        self.snapshot().unwrap_or_default()
    }

    fn save(&self, data: &AppData) -> Result<(), StorageError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Injected("memory store poisoned".into()))?;
        if inner.fail_writes {
            return Err(StorageError::Injected("storage unavailable".into()));
        }
        inner.data = Some(data.clone());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayState;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("bike_quest_{tag}_{}_{nanos}", std::process::id()))
            .join("health_data.json")
    }

    #[test]
    fn missing_file_loads_default() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load(), AppData::default());
    }

    #[test]
    fn corrupt_file_loads_default() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{ not json").unwrap();
        let store = JsonFileStore::new(path);
        assert_eq!(store.load(), AppData::default());
    }

    #[test]
    fn save_then_load_creates_parent_dir() {
        let path = temp_path("save");
        let store = JsonFileStore::new(path.clone());
        let mut data = AppData::default();
        data.days.insert(
            "2026-01-05".into(),
            DayState {
                water_ml: 500,
                ..DayState::default()
            },
        );
        store.save(&data).unwrap();
        assert!(path.exists());
        assert!(!store.tmp_path().exists());
        assert_eq!(store.load(), data);
    }

    #[test]
    fn memory_store_can_fail_writes() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(store.save(&AppData::default()).is_err());
        assert_eq!(store.writes(), 0);
        store.set_fail_writes(false);
        store.save(&AppData::default()).unwrap();
        assert_eq!(store.writes(), 1);
    }
}
