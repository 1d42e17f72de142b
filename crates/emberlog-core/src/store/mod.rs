//! Local persistence: the blob store trait, its backends, and the data
//! directory convention.

mod config;
mod file;
mod memory;

pub use config::{Config, DepthLevel, ParseDepthError, RemoteConfig};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::entry::Entry;
use crate::error::StoreError;
use crate::streak::StreakState;

/// Returns the data directory, creating it if needed.
/// Uses `~/.config/emberlog/` by default, or `~/.config/emberlog-dev/`
/// when `EMBERLOG_ENV=dev`.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("EMBERLOG_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("emberlog-dev")
    } else {
        base_dir.join("emberlog")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StoreError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Device-local persistence for entries and streak state.
///
/// Reads are infallible by contract: missing or undecodable data comes
/// back as the empty set or default state, so the journal can always
/// proceed. Writes report their failures so a check-in is never silently
/// dropped.
pub trait LocalStore: Send + Sync {
    /// All stored entries, ascending by timestamp.
    fn load_entries(&self) -> Vec<Entry>;

    /// Replace the stored entry set wholesale.
    fn save_entries(&self, entries: &[Entry]) -> Result<(), StoreError>;

    fn load_streak(&self) -> StreakState;

    fn save_streak(&self, state: &StreakState) -> Result<(), StoreError>;
}
