//! Journal entry model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;

/// One follow-up prompt/response pair attached to a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub prompt_id: String,
    pub response: String,
}

impl FollowUp {
    pub fn new(prompt_id: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt_id: prompt_id.into(),
            response: response.into(),
        }
    }
}

/// Optional follow-up depth recorded with a check-in.
///
/// A deep pair can only exist on top of a context pair, so half-filled
/// combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reflection {
    #[default]
    None,
    Context(FollowUp),
    Deep { context: FollowUp, deep: FollowUp },
}

/// Record of one day's check-in.
///
/// The canonical entry set holds exactly one entry per `date`; when two
/// entries claim the same date, the greater `timestamp` wins and the
/// other is discarded entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    /// Calendar day this check-in belongs to (`YYYY-MM-DD` on the wire).
    pub date: NaiveDate,
    /// Which primary prompt was asked.
    pub prompt_id: String,
    /// The selected response text. Never empty.
    pub choice: String,
    #[serde(default)]
    pub reflection: Reflection,
    /// Creation instant in seconds since the Unix epoch. Sole tie-breaker
    /// when two devices hold different entries for the same date.
    pub timestamp: i64,
}

impl Entry {
    /// New entry for today, stamped with the current time.
    pub fn new(prompt_id: impl Into<String>, choice: impl Into<String>) -> Self {
        Self::for_date(dates::today(), prompt_id, choice)
    }

    /// New entry for an explicit date, stamped with the current time.
    pub fn for_date(
        date: NaiveDate,
        prompt_id: impl Into<String>,
        choice: impl Into<String>,
    ) -> Self {
        let choice = choice.into();
        debug_assert!(!choice.is_empty(), "entry choice must not be empty");
        Self {
            id: Uuid::new_v4(),
            date,
            prompt_id: prompt_id.into(),
            choice,
            reflection: Reflection::None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_reflection(mut self, reflection: Reflection) -> Self {
        self.reflection = reflection;
        self
    }

    /// Override the creation timestamp (sync plumbing and tests).
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The context-level follow-up, if the user went past the primary prompt.
    pub fn context(&self) -> Option<&FollowUp> {
        match &self.reflection {
            Reflection::None => None,
            Reflection::Context(pair) => Some(pair),
            Reflection::Deep { context, .. } => Some(context),
        }
    }

    /// The deep-level follow-up, if one was recorded.
    pub fn deep(&self) -> Option<&FollowUp> {
        match &self.reflection {
            Reflection::Deep { deep, .. } => Some(deep),
            _ => None,
        }
    }

    pub fn context_response(&self) -> Option<&str> {
        self.context().map(|pair| pair.response.as_str())
    }

    pub fn deep_response(&self) -> Option<&str> {
        self.deep().map(|pair| pair.response.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn new_is_dated_today() {
        let entry = Entry::new("mood", "🙂 Good");
        assert_eq!(entry.date, dates::today());
        assert!(entry.timestamp > 0);
    }

    #[test]
    fn for_date_starts_without_reflection() {
        let entry = Entry::for_date(date("2024-03-01"), "mood", "🙂 Good");
        assert_eq!(entry.reflection, Reflection::None);
        assert_eq!(entry.context(), None);
        assert_eq!(entry.deep(), None);
    }

    #[test]
    fn deep_reflection_exposes_both_pairs() {
        let entry = Entry::for_date(date("2024-03-01"), "mood", "🙂 Good").with_reflection(
            Reflection::Deep {
                context: FollowUp::new("pace", "⚖️ Steady"),
                deep: FollowUp::new("sleep", "😴 Good"),
            },
        );
        assert_eq!(entry.context_response(), Some("⚖️ Steady"));
        assert_eq!(entry.deep_response(), Some("😴 Good"));
    }

    #[test]
    fn context_only_reflection_has_no_deep() {
        let entry = Entry::for_date(date("2024-03-01"), "mood", "🙂 Good")
            .with_reflection(Reflection::Context(FollowUp::new("pace", "🏃 Busy")));
        assert_eq!(entry.context_response(), Some("🏃 Busy"));
        assert_eq!(entry.deep_response(), None);
    }

    #[test]
    fn serializes_date_as_plain_string() {
        let entry = Entry::for_date(date("2024-03-01"), "mood", "🙂 Good").with_timestamp(1_700_000_000);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["timestamp"], 1_700_000_000_i64);
    }

    #[test]
    fn deserializes_entry_without_reflection_field() {
        // Blobs written before follow-ups existed lack the field entirely.
        let json = r#"{
            "id": "7f0c0e9b-3a51-4ad4-9a11-61a0c3a1f000",
            "date": "2024-03-01",
            "prompt_id": "mood",
            "choice": "🙂 Good",
            "timestamp": 1700000000
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.reflection, Reflection::None);
    }
}
