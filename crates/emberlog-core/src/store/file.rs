//! JSON-file store: one blob per record set in the data directory.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{data_dir, LocalStore};
use crate::entry::Entry;
use crate::error::StoreError;
use crate::streak::StreakState;

const ENTRIES_FILE: &str = "entries.json";
const STREAK_FILE: &str = "streak.json";

/// [`LocalStore`] that keeps each record set as a JSON file in a
/// directory. Corrupt files are logged and treated as absent rather than
/// blocking a check-in.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under the default data directory.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Store under a specific directory (tests and tooling).
    pub fn open_at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_or<T: DeserializeOwned>(&self, file: &str, fallback: impl FnOnce() -> T) -> T {
        let path = self.dir.join(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            // First run or unreadable file: start fresh.
            Err(_) => return fallback(),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(file, %err, "discarding undecodable local data");
                fallback()
            }
        }
    }

    fn write<T: Serialize>(&self, file: &str, what: &'static str, value: &T) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let raw = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Encode { what, source })?;
        fs::write(&path, raw).map_err(|source| StoreError::Write { path, source })
    }
}

impl LocalStore for FileStore {
    fn load_entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.read_or(ENTRIES_FILE, Vec::new);
        entries.sort_by_key(|entry| (entry.timestamp, entry.date));
        entries
    }

    fn save_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        self.write(ENTRIES_FILE, "entries", &entries)
    }

    fn load_streak(&self) -> StreakState {
        self.read_or(STREAK_FILE, StreakState::default)
    }

    fn save_streak(&self, state: &StreakState) -> Result<(), StoreError> {
        self.write(STREAK_FILE, "streak state", state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_entry(date: &str, timestamp: i64) -> Entry {
        Entry::for_date(date.parse().unwrap(), "mood", "🙂 Good").with_timestamp(timestamp)
    }

    #[test]
    fn missing_files_load_as_empty_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open_at(dir.path());

        assert!(store.load_entries().is_empty());
        assert_eq!(store.load_streak(), StreakState::default());
    }

    #[test]
    fn entries_survive_a_save_load_cycle() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open_at(dir.path());

        let entries = vec![make_entry("2024-03-01", 100), make_entry("2024-03-02", 200)];
        store.save_entries(&entries).unwrap();

        assert_eq!(store.load_entries(), entries);
    }

    #[test]
    fn load_entries_sorts_by_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open_at(dir.path());

        store
            .save_entries(&[make_entry("2024-03-05", 500), make_entry("2024-03-01", 100)])
            .unwrap();

        let loaded = store.load_entries();
        assert_eq!(loaded[0].timestamp, 100);
        assert_eq!(loaded[1].timestamp, 500);
    }

    #[test]
    fn corrupt_entries_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ENTRIES_FILE), "{not json").unwrap();
        let store = FileStore::open_at(dir.path());

        assert!(store.load_entries().is_empty());
    }

    #[test]
    fn corrupt_streak_file_loads_as_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(STREAK_FILE), "[]").unwrap();
        let store = FileStore::open_at(dir.path());

        assert_eq!(store.load_streak(), StreakState::default());
    }

    #[test]
    fn corrupt_file_is_overwritten_by_next_save() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ENTRIES_FILE), "garbage").unwrap();
        let store = FileStore::open_at(dir.path());

        store.save_entries(&[make_entry("2024-03-01", 100)]).unwrap();
        assert_eq!(store.load_entries().len(), 1);
    }

    #[test]
    fn streak_state_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open_at(dir.path());

        let state = StreakState {
            current_streak: 5,
            last_check_in: Some("2024-03-10".parse().unwrap()),
            forgiveness_used_this_month: 1,
            last_forgiveness_reset_month: 202403,
            used_forgiveness_in_current_streak: true,
        };
        store.save_streak(&state).unwrap();

        assert_eq!(store.load_streak(), state);
    }

    #[test]
    fn write_failure_surfaces_as_store_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-subdir");
        let store = FileStore::open_at(&missing);

        let err = store.save_entries(&[make_entry("2024-03-01", 100)]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
