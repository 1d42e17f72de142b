//! Shared plumbing for CLI commands.

use std::error::Error;
use std::sync::Arc;

use emberlog_core::{Config, DeviceId, FileStore, Journal, RemoteStore, SupabaseStore};

/// Journal wired to the configured remote, if any. Must run inside a
/// Tokio runtime because the upload worker spawns at construction.
pub fn open_journal(config: &Config) -> Result<Journal, Box<dyn Error>> {
    let store = FileStore::open()?;
    let device_id = DeviceId::load_or_create_default()?;
    let remote =
        SupabaseStore::from_config(&config.remote).map(|s| Arc::new(s) as Arc<dyn RemoteStore>);
    Ok(Journal::new(Box::new(store), remote, device_id))
}

/// Journal without a remote, for commands that only read. Safe to call
/// outside a runtime since no worker is spawned.
pub fn open_journal_offline() -> Result<Journal, Box<dyn Error>> {
    let store = FileStore::open()?;
    let device_id = DeviceId::load_or_create_default()?;
    Ok(Journal::new(Box::new(store), None, device_id))
}
