//! Remote entry mirror.
//!
//! The cloud side is a dumb per-device mirror: fetch everything for a
//! device id, upsert one row at a time. All reconciliation intelligence
//! stays on the client in [`crate::reconcile`].

pub mod supabase;

pub use supabase::SupabaseStore;

use async_trait::async_trait;

use crate::entry::Entry;

/// Errors from the remote mirror and the insight generator.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{operation} returned status {status}")]
    Status { operation: &'static str, status: u16 },

    #[error("{operation} response was missing expected fields")]
    MalformedResponse { operation: &'static str },
}

/// Per-device entry mirror.
///
/// Upserts are keyed by `(device_id, date)` on the server, so replaying
/// the same entry any number of times converges on one row.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All entries stored for this device, ascending by timestamp.
    async fn fetch_entries(&self, device_id: &str) -> Result<Vec<Entry>, RemoteError>;

    /// Insert or replace the row for `(device_id, entry.date)`.
    async fn upsert_entry(&self, device_id: &str, entry: &Entry) -> Result<(), RemoteError>;
}
