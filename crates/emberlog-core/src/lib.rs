//! # Emberlog Core Library
//!
//! Core logic for Emberlog, a one-tap daily check-in journal: canned
//! prompts, the forgiveness-buffered streak engine, last-write-wins
//! reconciliation against a per-device cloud mirror, and weekly recap
//! insights.
//!
//! ## Architecture
//!
//! - **Journal**: orchestrates check-ins over injected stores; local
//!   persistence always completes before any network work starts
//! - **Streak engine**: pure calendar math over [`StreakState`]
//! - **Reconciler**: one-entry-per-date merge, greater timestamp wins
//! - **Stores**: [`LocalStore`] JSON-file and in-memory backends, plus a
//!   [`RemoteStore`] Supabase mirror keyed by an opaque device id
//! - **Insights**: remote generator with a deterministic local fallback
//!
//! Presentation lives in the CLI crate; everything here is UI-free.

pub mod dates;
pub mod device;
pub mod entry;
pub mod error;
pub mod insights;
pub mod journal;
pub mod prompts;
pub mod reconcile;
pub mod remote;
pub mod store;
pub mod streak;

pub use device::{DeviceId, DeviceIdError};
pub use entry::{Entry, FollowUp, Reflection};
pub use error::{ConfigError, CoreError, Result, StoreError};
pub use insights::InsightClient;
pub use journal::{Journal, SyncReport};
pub use prompts::Prompt;
pub use reconcile::MergeOutcome;
pub use remote::{RemoteError, RemoteStore, SupabaseStore};
pub use store::{Config, DepthLevel, FileStore, LocalStore, MemoryStore, RemoteConfig};
pub use streak::{StreakState, MAX_FORGIVENESS_PER_MONTH};
