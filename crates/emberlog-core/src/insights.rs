//! Weekly recap insights.
//!
//! Two sources produce the recap lines: a remote generator behind an
//! edge function, and a deterministic local heuristic used whenever the
//! remote is unavailable, disabled, or slow. Either way the output is
//! capped per depth level so recaps stay glanceable.

use std::time::Duration;

use chrono::{Datelike, NaiveDate, Weekday};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::entry::Entry;
use crate::remote::RemoteError;
use crate::store::{DepthLevel, RemoteConfig};

const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

const CALM_WORDS: &[&str] = &["calm", "good", "clear"];
const HEAVY_WORDS: &[&str] = &["heavy", "down", "overwhelmed"];
const STEADY_WORDS: &[&str] = &["neutral", "meh", "okay"];

/// Line count and per-line character caps for a depth level.
fn budget(depth: DepthLevel) -> (usize, usize) {
    match depth {
        DepthLevel::Light => (3, 80),
        DepthLevel::Reflect => (4, 90),
        DepthLevel::Deep => (5, 100),
    }
}

fn apply_budget(insights: Vec<String>, depth: DepthLevel) -> Vec<String> {
    let (max_lines, max_chars) = budget(depth);
    insights
        .into_iter()
        .take(max_lines)
        .map(|line| truncate_at_word(line, max_chars))
        .collect()
}

/// Shorten an overlong line, preferring a word boundary when one sits
/// past 60% of the cap so the cut does not look arbitrary.
fn truncate_at_word(line: String, max_chars: usize) -> String {
    if line.chars().count() <= max_chars {
        return line;
    }
    let truncated: String = line.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(cut) if cut > max_chars * 6 / 10 => format!("{}...", &truncated[..cut]),
        _ => format!("{truncated}..."),
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

/// Most frequent value with its count. The earliest-seen value wins ties
/// so the result never depends on hash order.
fn most_frequent<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<(&'a str, usize)> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some(slot) => slot.1 += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.into_iter().fold(None, |best, candidate| match best {
        Some((_, count)) if candidate.1 <= count => best,
        _ => Some(candidate),
    })
}

fn heavy_share(choices: &[&str]) -> f64 {
    if choices.is_empty() {
        return 0.0;
    }
    let heavy = choices
        .iter()
        .filter(|choice| contains_any(&choice.to_lowercase(), HEAVY_WORDS))
        .count();
    heavy as f64 / choices.len() as f64
}

/// Contrast line when one side of the week was clearly heavier. Needs at
/// least one check-in on each side to say anything.
fn weekday_weekend_contrast(entries: &[Entry]) -> Option<&'static str> {
    let mut weekday = Vec::new();
    let mut weekend = Vec::new();
    for entry in entries {
        match entry.date.weekday() {
            Weekday::Sat | Weekday::Sun => weekend.push(entry.choice.as_str()),
            _ => weekday.push(entry.choice.as_str()),
        }
    }
    if weekday.is_empty() || weekend.is_empty() {
        return None;
    }

    let weekday_share = heavy_share(&weekday);
    let weekend_share = heavy_share(&weekend);
    if weekday_share > weekend_share + 0.3 {
        Some("Weekdays felt heavier than the weekend.")
    } else if weekend_share > weekday_share + 0.3 {
        Some("The weekend was heavier than weekdays.")
    } else {
        None
    }
}

/// Recurring context answer, called out once it shows up three times.
fn theme_callout(entries: &[Entry]) -> Option<&'static str> {
    let responses: Vec<&str> = entries.iter().filter_map(Entry::context_response).collect();
    let (dominant, count) = most_frequent(responses)?;
    if count < 3 {
        return None;
    }

    let dominant = dominant.to_lowercase();
    if dominant.contains("work") {
        Some("Work shaped a lot of your week.")
    } else if dominant.contains("people") {
        Some("People were a big influence this week.")
    } else if dominant.contains("busy") {
        Some("The pace was busy this week.")
    } else {
        None
    }
}

/// Deterministic recap derived from the entries alone. Never fails and
/// never touches the network.
///
/// The dominant-mood line and the count line always appear; the
/// weekday/weekend contrast joins when the data supports it, the theme
/// callout from depth Reflect up, and the body-tension line at Deep
/// only.
pub fn heuristic_insights(entries: &[Entry], depth: DepthLevel) -> Vec<String> {
    if entries.is_empty() {
        return vec![
            "No check-ins yet this week.".to_string(),
            "Come back after a few days.".to_string(),
        ];
    }

    let mut insights = Vec::new();

    if let Some((dominant, _)) = most_frequent(entries.iter().map(|e| e.choice.as_str())) {
        let dominant = dominant.to_lowercase();
        let line = if contains_any(&dominant, CALM_WORDS) {
            "This week felt mostly calm."
        } else if contains_any(&dominant, HEAVY_WORDS) {
            "This week carried some weight."
        } else if contains_any(&dominant, STEADY_WORDS) {
            "This week moved at its own pace."
        } else {
            "This week had its moments."
        };
        insights.push(line.to_string());
    }

    if let Some(line) = weekday_weekend_contrast(entries) {
        insights.push(line.to_string());
    }

    if depth.max_prompt_level() >= 2 {
        if let Some(line) = theme_callout(entries) {
            insights.push(line.to_string());
        }
    }

    if depth == DepthLevel::Deep {
        let tense_days = entries
            .iter()
            .filter_map(Entry::deep_response)
            .filter(|response| contains_any(&response.to_lowercase(), &["tense", "drained"]))
            .count();
        if tense_days >= 2 {
            insights.push("Your body held some tension this week.".to_string());
        }
    }

    let count = entries.len();
    if count >= 5 {
        insights.push(format!("You showed up {count} days. That's enough."));
    } else if count >= 3 {
        insights.push(format!("You checked in {count} times this week."));
    } else if count == 1 {
        insights.push("You checked in once. That counts.".to_string());
    } else {
        insights.push(format!("You checked in {count} times. Every one matters."));
    }

    apply_budget(insights, depth)
}

/// Wire form of one entry sent to the generator.
#[derive(Debug, Serialize)]
struct InsightEntry<'a> {
    date: NaiveDate,
    choice: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_response: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tertiary_response: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct InsightResponse {
    #[serde(default)]
    insights: Vec<String>,
}

/// HTTP client for the remote insight generator.
pub struct InsightClient {
    http: Client,
    url: String,
    anon_key: String,
}

impl InsightClient {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: format!(
                "{}/functions/v1/generate-insights",
                base_url.trim_end_matches('/')
            ),
            anon_key: anon_key.into(),
        }
    }

    /// Build from user settings; `None` until the endpoint is filled in.
    pub fn from_config(remote: &RemoteConfig) -> Option<Self> {
        remote
            .is_configured()
            .then(|| Self::new(&remote.url, remote.anon_key.clone()))
    }

    /// Ask the generator for recap lines over this week's entries.
    pub async fn generate(
        &self,
        entries: &[Entry],
        depth: DepthLevel,
    ) -> Result<Vec<String>, RemoteError> {
        let wire_entries: Vec<InsightEntry<'_>> = entries
            .iter()
            .map(|entry| InsightEntry {
                date: entry.date,
                choice: &entry.choice,
                secondary_response: entry.context_response(),
                tertiary_response: entry.deep_response(),
            })
            .collect();

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.anon_key)
            .timeout(GENERATE_TIMEOUT)
            .json(&serde_json::json!({
                "entries": wire_entries,
                "depth": depth,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                operation: "insights",
                status: response.status().as_u16(),
            });
        }

        let parsed: InsightResponse = response.json().await?;
        if parsed.insights.is_empty() {
            return Err(RemoteError::MalformedResponse {
                operation: "insights",
            });
        }
        Ok(apply_budget(parsed.insights, depth))
    }
}

/// Recap from the remote generator when one is available, the local
/// heuristic otherwise. Never fails; generator trouble is logged here and
/// absorbed.
pub async fn summarize(
    client: Option<&InsightClient>,
    entries: &[Entry],
    depth: DepthLevel,
) -> Vec<String> {
    if entries.is_empty() {
        return heuristic_insights(entries, depth);
    }
    if let Some(client) = client {
        match client.generate(entries, depth).await {
            Ok(insights) => return insights,
            Err(err) => warn!(%err, "insight generator unavailable, using local fallback"),
        }
    }
    heuristic_insights(entries, depth)
}
