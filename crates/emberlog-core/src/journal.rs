//! The journal: check-in recording, streak upkeep, and cloud
//! reconciliation.
//!
//! ## Architecture
//!
//! [`Journal`] sequences the pure pieces ([`crate::reconcile`],
//! [`crate::streak`]) against injected collaborators: a [`LocalStore`]
//! and an optional [`RemoteStore`]. Local writes are the source of truth.
//! A check-in counts as saved once the local store holds it; the remote
//! push runs on a background task that can only ever log its failures,
//! never surface them to the caller.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dates;
use crate::device::DeviceId;
use crate::entry::Entry;
use crate::error::Result;
use crate::reconcile;
use crate::remote::RemoteStore;
use crate::store::LocalStore;
use crate::streak::{self, StreakState};

/// Summary of one full reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Rows the remote returned (0 when the fetch failed).
    pub fetched: usize,
    /// Canonical entry count after the merge.
    pub merged: usize,
    /// Entries pushed to the remote this pass.
    pub uploaded: usize,
    /// Entries that failed to push and stay local until the next pass.
    pub upload_failures: usize,
    /// False when the remote could not be reached at all.
    pub remote_reachable: bool,
}

/// Orchestrates check-ins against the local store and the remote mirror.
pub struct Journal {
    local: Box<dyn LocalStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    device_id: DeviceId,
    upload_tx: Option<mpsc::UnboundedSender<Entry>>,
    worker: Option<JoinHandle<()>>,
}

impl Journal {
    /// Build a journal around its collaborators.
    ///
    /// When a remote store is supplied this spawns the background upload
    /// worker, so construction must happen inside a Tokio runtime.
    pub fn new(
        local: Box<dyn LocalStore>,
        remote: Option<Arc<dyn RemoteStore>>,
        device_id: DeviceId,
    ) -> Self {
        let (upload_tx, worker) = match &remote {
            Some(remote) => {
                let (tx, rx) = mpsc::unbounded_channel();
                let handle = spawn_upload_worker(Arc::clone(remote), device_id.clone(), rx);
                (Some(tx), Some(handle))
            }
            None => (None, None),
        };
        Self {
            local,
            remote,
            device_id,
            upload_tx,
            worker,
        }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Record a check-in: upsert it locally, advance the streak, then
    /// queue the entry for background upload.
    ///
    /// The local writes complete before the upload is dispatched, and a
    /// dead or missing remote never fails this call. Only local write
    /// errors propagate.
    pub fn record_check_in(&self, entry: Entry) -> Result<StreakState> {
        let entries = reconcile::upsert(&self.local.load_entries(), entry.clone());
        self.local.save_entries(&entries)?;

        let state = streak::advance(&self.local.load_streak(), entry.date);
        self.local.save_streak(&state)?;

        if let Some(tx) = &self.upload_tx {
            // A closed channel means shutdown already ran; the entry goes
            // out with the next full sync instead.
            if tx.send(entry).is_err() {
                debug!("upload worker stopped, deferring push to next sync");
            }
        }

        Ok(state)
    }

    /// Bidirectional reconciliation with the remote mirror.
    ///
    /// A failed fetch degrades to merging against the empty set, and each
    /// upload is attempted independently, so one bad row cannot abort the
    /// pass. Local state ends up canonical regardless of what the network
    /// did; only local write errors propagate.
    pub async fn full_sync(&self) -> Result<SyncReport> {
        let Some(remote) = &self.remote else {
            return Ok(SyncReport {
                merged: self.local.load_entries().len(),
                ..SyncReport::default()
            });
        };

        let mut report = SyncReport {
            remote_reachable: true,
            ..SyncReport::default()
        };

        let remote_entries = match remote.fetch_entries(self.device_id.as_str()).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(%err, "remote fetch failed, reconciling against empty set");
                report.remote_reachable = false;
                Vec::new()
            }
        };
        report.fetched = remote_entries.len();

        let outcome = reconcile::merge(&self.local.load_entries(), &remote_entries);
        self.local.save_entries(&outcome.merged)?;
        report.merged = outcome.merged.len();

        for entry in &outcome.to_upload {
            match remote.upsert_entry(self.device_id.as_str(), entry).await {
                Ok(()) => report.uploaded += 1,
                Err(err) => {
                    report.upload_failures += 1;
                    warn!(date = %entry.date, %err, "entry upload failed");
                }
            }
        }

        Ok(report)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// All entries, ascending by creation time.
    pub fn entries(&self) -> Vec<Entry> {
        self.local.load_entries()
    }

    /// Today's entry, if the user already checked in.
    pub fn today_entry(&self) -> Option<Entry> {
        let today = dates::today();
        self.local
            .load_entries()
            .into_iter()
            .find(|entry| entry.date == today)
    }

    /// Entries from the last `n` days, inclusive of the cutoff.
    pub fn last_n_days(&self, n: u32) -> Vec<Entry> {
        let cutoff = dates::recent_cutoff(dates::today(), n);
        self.local
            .load_entries()
            .into_iter()
            .filter(|entry| entry.date >= cutoff)
            .collect()
    }

    /// Whether the journal holds at least `n` distinct recent days.
    pub fn has_n_days(&self, n: u32) -> bool {
        self.last_n_days(n).len() >= n as usize
    }

    /// Streak state with the monthly forgiveness rollover applied. The
    /// rolled state is persisted by the next check-in, not here, so reads
    /// stay side-effect free.
    pub fn streak(&self) -> StreakState {
        streak::roll_month(&self.local.load_streak(), dates::today())
    }

    /// Encouragement line for the current streak, if one applies.
    pub fn streak_message(&self) -> Option<&'static str> {
        streak::message(&self.streak())
    }

    /// Reassurance line after a lost streak, if one applies.
    pub fn streak_reset_message(&self) -> Option<&'static str> {
        streak::reset_message(&self.streak(), dates::today())
    }

    /// Close the upload channel and wait for the worker to drain.
    ///
    /// Call before process exit (or in tests) when queued pushes should
    /// finish. Without it the worker is simply dropped with the runtime.
    pub async fn shutdown(mut self) {
        self.upload_tx = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}

/// The single place background push outcomes are handled: one worker task
/// owns the remote store end of the channel, logs failures, and drops
/// them. Entries that failed to push are still local, so a later full
/// sync retries them naturally.
fn spawn_upload_worker(
    remote: Arc<dyn RemoteStore>,
    device_id: DeviceId,
    mut rx: mpsc::UnboundedReceiver<Entry>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(entry) = rx.recv().await {
            match remote.upsert_entry(device_id.as_str(), &entry).await {
                Ok(()) => debug!(date = %entry.date, "entry pushed"),
                Err(err) => {
                    warn!(date = %entry.date, %err, "background push failed, entry stays local");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Scriptable in-memory remote.
    #[derive(Default)]
    struct FakeRemote {
        rows: Mutex<Vec<Entry>>,
        fail_fetch: AtomicBool,
        fail_uploads: AtomicBool,
    }

    impl FakeRemote {
        fn with_rows(rows: Vec<Entry>) -> Self {
            Self {
                rows: Mutex::new(rows),
                ..Self::default()
            }
        }

        fn uploaded(&self) -> Vec<Entry> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteStore for FakeRemote {
        async fn fetch_entries(&self, _device_id: &str) -> Result<Vec<Entry>, RemoteError> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(RemoteError::Status {
                    operation: "fetch",
                    status: 500,
                });
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn upsert_entry(&self, _device_id: &str, entry: &Entry) -> Result<(), RemoteError> {
            if self.fail_uploads.load(Ordering::SeqCst) {
                return Err(RemoteError::Status {
                    operation: "upsert",
                    status: 500,
                });
            }
            let mut rows = self.rows.lock().unwrap();
            rows.retain(|row| row.date != entry.date);
            rows.push(entry.clone());
            Ok(())
        }
    }

    fn make_entry(date: &str, choice: &str, timestamp: i64) -> Entry {
        Entry::for_date(date.parse().unwrap(), "mood", choice).with_timestamp(timestamp)
    }

    fn device() -> DeviceId {
        DeviceId::parse("ember-test").unwrap()
    }

    #[tokio::test]
    async fn test_check_in_persists_locally_before_any_push() {
        let store = Box::new(MemoryStore::new());
        let remote = Arc::new(FakeRemote::default());
        let journal = Journal::new(store, Some(remote.clone()), device());

        let entry = make_entry("2024-03-01", "🙂 Good", 100);
        let state = journal.record_check_in(entry).unwrap();

        // Local state is already canonical when the call returns, whatever
        // the worker is up to.
        assert_eq!(journal.entries().len(), 1);
        assert_eq!(state.current_streak, 1);

        journal.shutdown().await;
        assert_eq!(remote.uploaded().len(), 1);
    }

    #[tokio::test]
    async fn test_check_in_succeeds_when_every_push_fails() {
        let store = Box::new(MemoryStore::new());
        let remote = Arc::new(FakeRemote::default());
        remote.fail_uploads.store(true, Ordering::SeqCst);
        let journal = Journal::new(store, Some(remote.clone()), device());

        journal
            .record_check_in(make_entry("2024-03-01", "🙂 Good", 100))
            .unwrap();

        assert_eq!(journal.entries().len(), 1);
        journal.shutdown().await;
        assert!(remote.uploaded().is_empty());
    }

    #[tokio::test]
    async fn test_check_in_without_remote() {
        let journal = Journal::new(Box::new(MemoryStore::new()), None, device());

        let state = journal
            .record_check_in(make_entry("2024-03-01", "🙂 Good", 100))
            .unwrap();

        assert_eq!(state.current_streak, 1);
        assert_eq!(journal.entries().len(), 1);
        journal.shutdown().await;
    }

    #[tokio::test]
    async fn test_same_day_checkin_replaces_entry_keeps_streak() {
        let journal = Journal::new(Box::new(MemoryStore::new()), None, device());

        journal
            .record_check_in(make_entry("2024-03-01", "🙂 Good", 100))
            .unwrap();
        let state = journal
            .record_check_in(make_entry("2024-03-01", "😐 Meh", 200))
            .unwrap();

        let entries = journal.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].choice, "😐 Meh");
        assert_eq!(state.current_streak, 1);
    }

    #[tokio::test]
    async fn test_consecutive_checkins_grow_streak() {
        let journal = Journal::new(Box::new(MemoryStore::new()), None, device());

        journal
            .record_check_in(make_entry("2024-03-01", "🙂 Good", 100))
            .unwrap();
        journal
            .record_check_in(make_entry("2024-03-02", "😐 Meh", 200))
            .unwrap();
        let state = journal
            .record_check_in(make_entry("2024-03-03", "🙂 Good", 300))
            .unwrap();

        assert_eq!(state.current_streak, 3);
    }

    #[tokio::test]
    async fn test_full_sync_adopts_newer_remote_and_uploads_newer_local() {
        let local_store = MemoryStore::with_entries(vec![
            make_entry("2024-01-01", "local-stale", 100),
            make_entry("2024-01-03", "local-only", 300),
        ]);
        let remote = Arc::new(FakeRemote::with_rows(vec![
            make_entry("2024-01-01", "remote-fresh", 150),
            make_entry("2024-01-02", "remote-only", 200),
        ]));
        let journal = Journal::new(Box::new(local_store), Some(remote.clone()), device());

        let report = journal.full_sync().await.unwrap();

        assert!(report.remote_reachable);
        assert_eq!(report.fetched, 2);
        assert_eq!(report.merged, 3);
        assert_eq!(report.uploaded, 1);
        assert_eq!(report.upload_failures, 0);

        let choices: Vec<String> = journal.entries().iter().map(|e| e.choice.clone()).collect();
        assert_eq!(choices, vec!["remote-fresh", "remote-only", "local-only"]);

        // The local-only entry reached the mirror.
        assert!(remote
            .uploaded()
            .iter()
            .any(|row| row.choice == "local-only"));
        journal.shutdown().await;
    }

    #[tokio::test]
    async fn test_full_sync_tolerates_fetch_failure() {
        let local_store =
            MemoryStore::with_entries(vec![make_entry("2024-01-01", "mine", 100)]);
        let remote = Arc::new(FakeRemote::default());
        remote.fail_fetch.store(true, Ordering::SeqCst);
        let journal = Journal::new(Box::new(local_store), Some(remote.clone()), device());

        let report = journal.full_sync().await.unwrap();

        assert!(!report.remote_reachable);
        assert_eq!(report.fetched, 0);
        // Local data is untouched by the failed fetch.
        assert_eq!(journal.entries().len(), 1);
        journal.shutdown().await;
    }

    #[tokio::test]
    async fn test_full_sync_counts_partial_upload_failures() {
        let local_store = MemoryStore::with_entries(vec![
            make_entry("2024-01-01", "a", 100),
            make_entry("2024-01-02", "b", 200),
        ]);
        let remote = Arc::new(FakeRemote::default());
        remote.fail_uploads.store(true, Ordering::SeqCst);
        let journal = Journal::new(Box::new(local_store), Some(remote.clone()), device());

        let report = journal.full_sync().await.unwrap();

        assert!(report.remote_reachable);
        assert_eq!(report.uploaded, 0);
        assert_eq!(report.upload_failures, 2);
        // Failed pushes never shrink the local set.
        assert_eq!(journal.entries().len(), 2);
        journal.shutdown().await;
    }

    #[tokio::test]
    async fn test_full_sync_without_remote_reports_local_count() {
        let local_store =
            MemoryStore::with_entries(vec![make_entry("2024-01-01", "mine", 100)]);
        let journal = Journal::new(Box::new(local_store), None, device());

        let report = journal.full_sync().await.unwrap();

        assert!(!report.remote_reachable);
        assert_eq!(report.merged, 1);
    }

    #[tokio::test]
    async fn test_repeated_sync_converges() {
        let local_store =
            MemoryStore::with_entries(vec![make_entry("2024-01-01", "mine", 100)]);
        let remote = Arc::new(FakeRemote::with_rows(vec![make_entry(
            "2024-01-02",
            "theirs",
            200,
        )]));
        let journal = Journal::new(Box::new(local_store), Some(remote.clone()), device());

        let first = journal.full_sync().await.unwrap();
        assert_eq!(first.merged, 2);
        assert_eq!(first.uploaded, 1);
        let after_first = journal.entries();

        // A second pass finds both sides already agreeing and changes
        // nothing locally.
        let second = journal.full_sync().await.unwrap();
        assert_eq!(second.merged, 2);
        assert_eq!(journal.entries(), after_first);
        journal.shutdown().await;
    }
}
