use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Name of the single persisted entry holding all playlists
pub const STORE_ENTRY_NAME: &str = "pods-music-playlists.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error during {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Single-entry key/value storage for the serialized playlist list
///
/// Mirrors the browser-local storage layout: one named entry, read in
/// full at startup, rewritten in full on every change.
pub trait StorageBackend {
    /// Read the entry; `None` when nothing has been persisted yet
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the entry with the given serialized payload
    fn save(&self, payload: &str) -> Result<(), StorageError>;
}

/// File-backed storage: one JSON file under a caller-supplied directory
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORE_ENTRY_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(
                format!("reading {}", self.path.display()),
                e,
            )),
        }
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::io(format!("creating {}", parent.display()), e))?;
        }
        std::fs::write(&self.path, payload)
            .map_err(|e| StorageError::io(format!("writing {}", self.path.display()), e))
    }
}

/// In-memory storage entry
///
/// Used when no durable location is available and by tests; the
/// `fail_writes` switch exercises the store's degraded session-only
/// mode.
#[derive(Default)]
pub struct MemoryBackend {
    entry: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw persisted payload, for inspection in tests
    pub fn entry(&self) -> Option<String> {
        self.entry.lock().clone()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.entry.lock().clone())
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        *self.entry.lock() = Some(payload.to_string());
        Ok(())
    }
}
