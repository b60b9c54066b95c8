use popcorn_models::WatchedEntry;
use std::sync::Arc;
use tracing::{debug, info};
use crate::storage::{PersistedSlot, SlotStore};

/// The user's rated movies, unique by identifier, in insertion order.
///
/// Every change is written through to the backing slot.
pub struct WatchedList {
    entries: PersistedSlot<Vec<WatchedEntry>>,
}

impl WatchedList {
    pub fn load(store: Arc<dyn SlotStore>, slot: &str) -> Self {
        let entries = PersistedSlot::load(store, slot, Vec::new());
        debug!(slot = %slot, count = entries.get().len(), "Watched list ready");
        Self { entries }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        self.entries.get()
    }

    pub fn len(&self) -> usize {
        self.entries.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.get().is_empty()
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries.get().iter().find(|e| e.imdb_id == imdb_id)
    }

    /// Append `entry` unless its identifier is already listed. Returns whether it was added.
    pub fn add(&mut self, entry: WatchedEntry) -> bool {
        if self.contains(&entry.imdb_id) {
            debug!(imdb_id = %entry.imdb_id, "Already on watched list");
            return false;
        }
        if entry.user_rating == 0 {
            debug!(imdb_id = %entry.imdb_id, "Refusing unrated entry");
            return false;
        }

        info!(imdb_id = %entry.imdb_id, title = %entry.title, "Adding to watched list");
        self.entries.update(|entries| entries.push(entry));
        true
    }

    /// Remove the entry for `imdb_id`. Returns whether anything was removed.
    pub fn remove(&mut self, imdb_id: &str) -> bool {
        if !self.contains(imdb_id) {
            return false;
        }

        info!(imdb_id = %imdb_id, "Removing from watched list");
        self.entries.update(|entries| entries.retain(|e| e.imdb_id != imdb_id));
        true
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.len();
        if removed > 0 {
            info!(count = removed, "Clearing watched list");
            self.entries.reset(Vec::new());
        }
        removed
    }
}
