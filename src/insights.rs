//! Feedback history aggregation
//!
//! Pure aggregation over stored feedback rows, supplied most recent
//! first. Produces the progress view: average overall score, the most
//! frequent weaknesses and leak kinds, and digests of the latest rated
//! sessions. Malformed blobs in old rows are tolerated: an unreadable
//! score blob counts as zero, an unreadable list as empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::FeedbackRecord;

/// How many rows back the aggregation looks
const HISTORY_WINDOW: usize = 20;

/// How many session digests the summary carries
const DIGEST_COUNT: usize = 5;

/// How many entries each frequency list keeps
const TOP_LIMIT: usize = 10;

/// One stored feedback row joined with its session metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedSession {
    pub session_id: String,

    /// Session kind, `roleplay` or `transcript`
    pub session_type: String,

    pub scenario_title: Option<String>,

    /// When the session was held (not when it was rated)
    pub created_at: DateTime<Utc>,

    pub record: FeedbackRecord,
}

/// A weakness line with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaknessCount {
    pub weakness: String,
    pub count: u32,
}

/// A leak kind name with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakCount {
    pub leak: String,
    pub count: u32,
}

/// Compact view of one recent rated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDigest {
    pub session_id: String,
    pub session_type: String,
    pub scenario_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub overall_score: u8,
}

/// Aggregated progress view over recent feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsSummary {
    pub average_overall_score: u8,

    /// Most frequent weakness lines, most frequent first
    pub top_weaknesses: Vec<String>,

    pub top_weaknesses_with_count: Vec<WeaknessCount>,

    pub top_primary_leaks: Vec<LeakCount>,

    pub top_secondary_leaks: Vec<LeakCount>,

    /// The five most recent rated sessions
    pub last_five_sessions: Vec<SessionDigest>,
}

/// Overall score for one row; unreadable blobs count as zero.
fn overall_from_record(record: &FeedbackRecord) -> u8 {
    record
        .phase_scores()
        .map(|scores| scores.overall())
        .unwrap_or(0)
}

/// Parse a JSON array blob into strings, leniently.
fn string_items(blob: Option<&str>) -> Vec<String> {
    let Some(text) = blob else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Count an occurrence, preserving first-seen order for ties.
fn bump(counts: &mut Vec<(String, u32)>, key: &str) {
    let key = key.trim();
    if key.is_empty() {
        return;
    }
    if let Some(entry) = counts.iter_mut().find(|(k, _)| k == key) {
        entry.1 += 1;
    } else {
        counts.push((key.to_string(), 1));
    }
}

/// Most frequent first; stable, so equal counts keep first-seen order.
fn top_entries(mut counts: Vec<(String, u32)>) -> Vec<(String, u32)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_LIMIT);
    counts
}

/// Aggregate recent feedback into the progress view.
///
/// `entries` must be ordered most recent first; only the first
/// [`HISTORY_WINDOW`] rows are considered.
pub fn summarize_history(entries: &[RatedSession]) -> InsightsSummary {
    let window = &entries[..entries.len().min(HISTORY_WINDOW)];

    let mut overalls: Vec<u8> = Vec::with_capacity(window.len());
    let mut weakness_counts: Vec<(String, u32)> = Vec::new();
    let mut primary_counts: Vec<(String, u32)> = Vec::new();
    let mut secondary_counts: Vec<(String, u32)> = Vec::new();
    let mut last_sessions: Vec<SessionDigest> = Vec::new();

    for (i, entry) in window.iter().enumerate() {
        let overall = overall_from_record(&entry.record);
        overalls.push(overall);

        if i < DIGEST_COUNT {
            last_sessions.push(SessionDigest {
                session_id: entry.session_id.clone(),
                session_type: entry.session_type.clone(),
                scenario_title: entry.scenario_title.clone(),
                created_at: entry.created_at,
                overall_score: overall,
            });
        }

        for weakness in string_items(entry.record.weaknesses.as_deref()) {
            bump(&mut weakness_counts, &weakness);
        }
        if let Some(leak) = entry.record.primary_leak.as_deref() {
            bump(&mut primary_counts, leak);
        }
        if let Some(leak) = entry.record.secondary_leak.as_deref() {
            bump(&mut secondary_counts, leak);
        }
    }

    let average_overall_score = if overalls.is_empty() {
        0
    } else {
        let sum: u32 = overalls.iter().map(|&v| v as u32).sum();
        (sum as f64 / overalls.len() as f64).round() as u8
    };

    let top_weaknesses_with_count: Vec<WeaknessCount> = top_entries(weakness_counts)
        .into_iter()
        .map(|(weakness, count)| WeaknessCount { weakness, count })
        .collect();
    let top_weaknesses = top_weaknesses_with_count
        .iter()
        .map(|item| item.weakness.clone())
        .collect();

    InsightsSummary {
        average_overall_score,
        top_weaknesses,
        top_weaknesses_with_count,
        top_primary_leaks: top_entries(primary_counts)
            .into_iter()
            .map(|(leak, count)| LeakCount { leak, count })
            .collect(),
        top_secondary_leaks: top_entries(secondary_counts)
            .into_iter()
            .map(|(leak, count)| LeakCount { leak, count })
            .collect(),
        last_five_sessions: last_sessions,
    }
}
