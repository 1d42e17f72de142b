//! In-memory store for tests and previews.

use std::sync::Mutex;

use super::LocalStore;
use crate::entry::Entry;
use crate::error::StoreError;
use crate::streak::StreakState;

/// [`LocalStore`] that keeps everything behind a mutex and never touches
/// disk. Loads return clones, so callers see stable snapshots.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<Entry>>,
    streak: Mutex<StreakState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a preloaded entry set.
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            streak: Mutex::new(StreakState::default()),
        }
    }
}

impl LocalStore for MemoryStore {
    fn load_entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    fn save_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        *self.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }

    fn load_streak(&self) -> StreakState {
        self.streak.lock().unwrap().clone()
    }

    fn save_streak(&self, state: &StreakState) -> Result<(), StoreError> {
        *self.streak.lock().unwrap() = state.clone();
        Ok(())
    }
}
