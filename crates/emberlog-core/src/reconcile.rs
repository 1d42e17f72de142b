//! Last-write-wins reconciliation of local and remote entry sets.
//!
//! One entry per date is the law of the canonical set. When two entries
//! claim the same date, the one with the greater creation timestamp wins
//! whole; fields are never mixed across versions. Merging is commutative
//! and idempotent over the canonical set, so repeated or crossed syncs
//! converge instead of compounding.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::entry::Entry;

/// Result of merging the local and remote entry sets.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Canonical one-entry-per-date set, ascending by timestamp.
    pub merged: Vec<Entry>,
    /// Local entries the remote is missing or holds an older copy of.
    /// Deliberately over-approximated: a local entry tied with its remote
    /// counterpart is re-uploaded, which the keyed upsert makes harmless.
    pub to_upload: Vec<Entry>,
}

/// Merge `local` and `remote` into the canonical set.
///
/// `local` wins ties; a remote entry replaces a local one only when its
/// timestamp is strictly greater. The upload direction is computed the
/// other way round: anything the remote does not strictly beat goes out.
pub fn merge(local: &[Entry], remote: &[Entry]) -> MergeOutcome {
    let mut by_date: BTreeMap<NaiveDate, Entry> = BTreeMap::new();
    for entry in local {
        by_date.insert(entry.date, entry.clone());
    }
    for entry in remote {
        let newer = by_date
            .get(&entry.date)
            .map_or(true, |held| entry.timestamp > held.timestamp);
        if newer {
            by_date.insert(entry.date, entry.clone());
        }
    }

    let mut newest_remote: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for entry in remote {
        let ts = newest_remote.entry(entry.date).or_insert(entry.timestamp);
        *ts = (*ts).max(entry.timestamp);
    }
    let to_upload: Vec<Entry> = local
        .iter()
        .filter(|entry| {
            newest_remote
                .get(&entry.date)
                .map_or(true, |&remote_ts| remote_ts <= entry.timestamp)
        })
        .cloned()
        .collect();

    let mut merged: Vec<Entry> = by_date.into_values().collect();
    merged.sort_by_key(|entry| (entry.timestamp, entry.date));

    debug_assert!(
        one_per_date(&merged),
        "merge produced duplicate dates in the canonical set"
    );

    MergeOutcome { merged, to_upload }
}

/// Insert `entry` into the set, replacing any entry sharing its date.
/// Returns the new canonical set, ascending by timestamp.
pub fn upsert(entries: &[Entry], entry: Entry) -> Vec<Entry> {
    let mut next: Vec<Entry> = entries
        .iter()
        .filter(|existing| existing.date != entry.date)
        .cloned()
        .collect();
    next.push(entry);
    next.sort_by_key(|entry| (entry.timestamp, entry.date));
    next
}

fn one_per_date(entries: &[Entry]) -> bool {
    let mut seen = std::collections::HashSet::new();
    entries.iter().all(|entry| seen.insert(entry.date))
}
