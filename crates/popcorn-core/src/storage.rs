use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid slot name '{0}'")]
    InvalidSlot(String),

    #[error("failed to access slot '{slot}': {source}")]
    Io {
        slot: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode slot '{slot}': {source}")]
    Encode {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw named-slot storage. Values are opaque serialized text.
pub trait SlotStore: Send + Sync {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StorageError>;
    fn write_slot(&self, slot: &str, contents: &str) -> Result<(), StorageError>;
    /// Returns whether anything was removed
    fn remove_slot(&self, slot: &str) -> Result<bool, StorageError>;
}

/// Read `slot` and parse it, falling back to `default` when it is missing or corrupt.
pub fn load<T>(store: &dyn SlotStore, slot: &str, default: T) -> T
where
    T: DeserializeOwned,
{
    let content = match store.read_slot(slot) {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!("Slot miss: {} (nothing stored yet)", slot);
            return default;
        }
        Err(e) => {
            warn!("Failed to read slot {}: {}. Using default.", slot, e);
            return default;
        }
    };

    match serde_json::from_str::<T>(&content) {
        Ok(value) => {
            info!("Loaded slot {}", slot);
            value
        }
        Err(e) => {
            warn!("Slot {} holds unparseable data ({}). Using default.", slot, e);
            default
        }
    }
}

/// Serialize `value` and overwrite `slot`
pub fn store<T>(store: &dyn SlotStore, slot: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let content = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        slot: slot.to_string(),
        source,
    })?;
    store.write_slot(slot, &content)
}

fn validate_slot(slot: &str) -> Result<(), StorageError> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !slot.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSlot(slot.to_string()))
    }
}

/// One `<slot>.json` file per slot under a directory
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }

    fn io_error(slot: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            slot: slot.to_string(),
            source,
        }
    }
}

impl SlotStore for FileSlotStore {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StorageError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Self::io_error(slot, e))
    }

    fn write_slot(&self, slot: &str, contents: &str) -> Result<(), StorageError> {
        validate_slot(slot)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(slot, e))?;

        // Atomic write: write to temp file, then rename
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents).map_err(|e| Self::io_error(slot, e))?;
        std::fs::rename(&temp_path, &path).map_err(|e| Self::io_error(slot, e))?;

        debug!("Wrote slot {} to {}", slot, path.display());
        Ok(())
    }

    fn remove_slot(&self, slot: &str) -> Result<bool, StorageError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).map_err(|e| Self::io_error(slot, e))?;
        Ok(true)
    }
}

/// In-process storage; contents vanish with the value
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(slot).cloned())
    }

    fn write_slot(&self, slot: &str, contents: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(slot.to_string(), contents.to_string());
        Ok(())
    }

    fn remove_slot(&self, slot: &str) -> Result<bool, StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.remove(slot).is_some())
    }
}

/// An in-memory value mirrored to a slot.
///
/// Every mutation made through [`PersistedSlot::update`] is written back
/// immediately. Write failures are logged and not retried; the in-memory
/// value stays authoritative.
pub struct PersistedSlot<T> {
    store: Arc<dyn SlotStore>,
    slot: String,
    value: T,
}

impl<T> PersistedSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn load(store: Arc<dyn SlotStore>, slot: impl Into<String>, default: T) -> Self {
        let slot = slot.into();
        let value = load(store.as_ref(), &slot, default);
        Self { store, slot, value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.value);
        self.flush();
        result
    }

    /// Drop the stored copy and go back to `default`
    pub fn reset(&mut self, default: T) {
        self.value = default;
        match self.store.remove_slot(&self.slot) {
            Ok(removed) => debug!("Reset slot {} (removed: {})", self.slot, removed),
            Err(e) => warn!("Failed to remove slot {}: {}", self.slot, e),
        }
    }

    fn flush(&self) {
        if let Err(e) = store(self.store.as_ref(), &self.slot, &self.value) {
            warn!("Failed to persist slot {}: {}", self.slot, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_files() {
        let dir = TempDir::new().unwrap();
        let files = FileSlotStore::new(dir.path().join("storage"));

        let value = vec!["tt0372784".to_string(), "tt1877830".to_string()];
        store(&files, "watched", &value).unwrap();

        let loaded: Vec<String> = load(&files, "watched", Vec::new());
        assert_eq!(loaded, value);
        assert!(files.slot_path("watched").exists());
        assert!(!files.slot_path("watched").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_slot_yields_default() {
        let dir = TempDir::new().unwrap();
        let files = FileSlotStore::new(dir.path());
        let loaded: Vec<u32> = load(&files, "watched", vec![7]);
        assert_eq!(loaded, vec![7]);
    }

    #[test]
    fn test_corrupt_slot_yields_default() {
        let dir = TempDir::new().unwrap();
        let files = FileSlotStore::new(dir.path());
        std::fs::write(files.slot_path("watched"), "{not json").unwrap();

        let loaded: Vec<u32> = load(&files, "watched", Vec::new());
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_wrong_shape_yields_default() {
        let memory = MemorySlotStore::new();
        memory.write_slot("watched", r#"{"imdbID":"tt1"}"#).unwrap();
        let loaded: Vec<u32> = load(&memory, "watched", Vec::new());
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_store_overwrites() {
        let memory = MemorySlotStore::new();
        store(&memory, "n", &1u32).unwrap();
        store(&memory, "n", &2u32).unwrap();
        assert_eq!(load(&memory, "n", 0u32), 2);
    }

    #[test]
    fn test_rejects_path_like_slot_names() {
        let dir = TempDir::new().unwrap();
        let files = FileSlotStore::new(dir.path());
        assert!(matches!(files.write_slot("../escape", "1"), Err(StorageError::InvalidSlot(_))));
        assert!(matches!(files.read_slot(""), Err(StorageError::InvalidSlot(_))));
        assert!(matches!(files.read_slot(".hidden"), Err(StorageError::InvalidSlot(_))));
    }

    #[test]
    fn test_remove_slot() {
        let dir = TempDir::new().unwrap();
        let files = FileSlotStore::new(dir.path());
        assert!(!files.remove_slot("watched").unwrap());
        store(&files, "watched", &Vec::<u32>::new()).unwrap();
        assert!(files.remove_slot("watched").unwrap());
        assert_eq!(files.read_slot("watched").unwrap(), None);
    }

    #[test]
    fn test_persisted_slot_writes_on_update() {
        let memory: Arc<dyn SlotStore> = Arc::new(MemorySlotStore::new());
        let mut slot = PersistedSlot::load(memory.clone(), "numbers", Vec::<u32>::new());
        assert!(memory.read_slot("numbers").unwrap().is_none());

        slot.update(|v| v.push(3));
        assert_eq!(memory.read_slot("numbers").unwrap().as_deref(), Some("[3]"));

        let reloaded = PersistedSlot::load(memory, "numbers", Vec::<u32>::new());
        assert_eq!(reloaded.get(), &vec![3]);
    }

    #[test]
    fn test_persisted_slot_reset_removes_file() {
        let dir = TempDir::new().unwrap();
        let files = Arc::new(FileSlotStore::new(dir.path()));
        let mut slot = PersistedSlot::load(files.clone(), "numbers", Vec::<u32>::new());
        slot.update(|v| v.push(3));
        assert!(files.slot_path("numbers").exists());

        slot.reset(Vec::new());
        assert!(slot.get().is_empty());
        assert!(!files.slot_path("numbers").exists());
        assert!(PersistedSlot::load(files, "numbers", vec![9u32]).get() == &vec![9]);
    }
}
