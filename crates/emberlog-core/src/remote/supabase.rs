//! Supabase REST client for the entry mirror.
//!
//! Entries live in a single `entries` table with one row per
//! `(device_id, date)`. Upserts lean on PostgREST's `on_conflict` merge
//! so the server enforces the one-per-date rule; follow-up pairs are
//! flattened into nullable columns.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RemoteError, RemoteStore};
use crate::entry::{Entry, FollowUp, Reflection};
use crate::store::RemoteConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Row shape of the `entries` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRow {
    id: Uuid,
    device_id: String,
    date: NaiveDate,
    prompt_id: String,
    choice: String,
    #[serde(default)]
    secondary_prompt_id: Option<String>,
    #[serde(default)]
    secondary_response: Option<String>,
    #[serde(default)]
    tertiary_prompt_id: Option<String>,
    #[serde(default)]
    tertiary_response: Option<String>,
    timestamp: i64,
}

impl EntryRow {
    fn from_entry(device_id: &str, entry: &Entry) -> Self {
        let (context, deep) = match &entry.reflection {
            Reflection::None => (None, None),
            Reflection::Context(context) => (Some(context.clone()), None),
            Reflection::Deep { context, deep } => (Some(context.clone()), Some(deep.clone())),
        };
        let split = |pair: Option<FollowUp>| match pair {
            Some(pair) => (Some(pair.prompt_id), Some(pair.response)),
            None => (None, None),
        };
        let (secondary_prompt_id, secondary_response) = split(context);
        let (tertiary_prompt_id, tertiary_response) = split(deep);

        Self {
            id: entry.id,
            device_id: device_id.to_string(),
            date: entry.date,
            prompt_id: entry.prompt_id.clone(),
            choice: entry.choice.clone(),
            secondary_prompt_id,
            secondary_response,
            tertiary_prompt_id,
            tertiary_response,
            timestamp: entry.timestamp,
        }
    }

    /// Rebuild the entry, folding half-filled column pairs down to the
    /// nearest valid shape instead of failing the whole fetch.
    fn into_entry(self) -> Entry {
        let pair = |prompt_id: Option<String>, response: Option<String>| match (prompt_id, response)
        {
            (Some(prompt_id), Some(response)) => Some(FollowUp {
                prompt_id,
                response,
            }),
            _ => None,
        };
        let context = pair(self.secondary_prompt_id, self.secondary_response);
        let deep = pair(self.tertiary_prompt_id, self.tertiary_response);

        let reflection = match (context, deep) {
            (Some(context), Some(deep)) => Reflection::Deep { context, deep },
            (Some(context), None) => Reflection::Context(context),
            // A deep pair without its context pair would break the
            // pairing rule; drop it.
            _ => Reflection::None,
        };

        Entry {
            id: self.id,
            date: self.date,
            prompt_id: self.prompt_id,
            choice: self.choice,
            reflection,
            timestamp: self.timestamp,
        }
    }
}

/// [`RemoteStore`] backed by the Supabase REST API.
pub struct SupabaseStore {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Build from user settings; `None` until the endpoint is filled in.
    pub fn from_config(remote: &RemoteConfig) -> Option<Self> {
        remote
            .is_configured()
            .then(|| Self::new(remote.url.clone(), remote.anon_key.clone()))
    }

    fn entries_url(&self) -> String {
        format!("{}/rest/v1/entries", self.base_url)
    }
}

#[async_trait]
impl RemoteStore for SupabaseStore {
    async fn fetch_entries(&self, device_id: &str) -> Result<Vec<Entry>, RemoteError> {
        let response = self
            .http
            .get(self.entries_url())
            .query(&[
                ("device_id", format!("eq.{device_id}")),
                ("select", "*".to_string()),
                ("order", "timestamp.asc".to_string()),
            ])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                operation: "fetch",
                status: response.status().as_u16(),
            });
        }

        let rows: Vec<EntryRow> = response.json().await?;
        Ok(rows.into_iter().map(EntryRow::into_entry).collect())
    }

    async fn upsert_entry(&self, device_id: &str, entry: &Entry) -> Result<(), RemoteError> {
        let row = EntryRow::from_entry(device_id, entry);
        let response = self
            .http
            .post(self.entries_url())
            .query(&[("on_conflict", "device_id,date")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "resolution=merge-duplicates")
            .timeout(REQUEST_TIMEOUT)
            .json(&[row])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                operation: "upsert",
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
