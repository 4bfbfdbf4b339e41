//! Persisted feedback rows
//!
//! Row shape for one stored evaluation, matching the storage convention
//! of keeping scores and list-valued feedback as JSON text blobs.
//! Optional columns are `None` rather than an empty blob when the
//! evaluation had nothing to store, so absence survives the round trip.
//! [`FeedbackRecord::from_evaluation`] and [`FeedbackRecord::decode`]
//! convert between the row shape and a live [`Evaluation`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::evaluator::{Evaluation, LeakDiagnostic, LeakKind};
use crate::types::PhaseScores;

/// Unique identifier for feedback rows
///
/// Wraps a UUID to keep feedback IDs from mixing with other
/// UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub Uuid);

impl FeedbackId {
    /// Create a new random feedback ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a feedback ID from a string
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for FeedbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn encode_list(items: &[String]) -> Result<Option<String>> {
    if items.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(items)?))
    }
}

fn decode_list(column: Option<&str>) -> Result<Vec<String>> {
    match column {
        Some(text) => Ok(serde_json::from_str(text)?),
        None => Ok(Vec::new()),
    }
}

fn none_if_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// One stored evaluation row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    // === Identity ===
    /// Unique row identifier
    pub id: FeedbackId,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    // === Headline feedback ===
    /// Phase scores as a JSON object blob
    pub scores: String,

    /// Overall assessment line
    pub summary: String,

    /// Improvement actions as a JSON array blob
    pub actions: String,

    /// What to drill next
    pub practice_next: String,

    // === Optional detail columns ===
    /// Weak-phase lines as a JSON array blob
    pub weaknesses: Option<String>,

    /// Strong-phase lines as a JSON array blob
    pub strengths: Option<String>,

    /// Replacement line for the weakest moment
    pub suggested_rewrite: Option<String>,

    /// Concrete practice drill
    pub drill: Option<String>,

    // === Leak diagnostic ===
    /// Primary leak name (Frame, Leverage, or Precision)
    pub primary_leak: Option<String>,

    /// Secondary leak name
    pub secondary_leak: Option<String>,

    /// Diagnostic explanation
    pub leak_explanation: Option<String>,

    /// Supporting observations as a JSON array blob
    pub leak_evidence: Option<String>,
}

impl FeedbackRecord {
    /// Encode an evaluation into the row shape, minting a fresh ID and
    /// timestamp.
    pub fn from_evaluation(evaluation: &Evaluation) -> Result<Self> {
        Ok(Self {
            id: FeedbackId::new(),
            created_at: Utc::now(),
            scores: serde_json::to_string(&evaluation.scores)?,
            summary: evaluation.summary.clone(),
            actions: serde_json::to_string(&evaluation.actions)?,
            practice_next: evaluation.practice_next.clone(),
            weaknesses: encode_list(&evaluation.weaknesses)?,
            strengths: encode_list(&evaluation.strengths)?,
            suggested_rewrite: none_if_empty(&evaluation.suggested_rewrite),
            drill: none_if_empty(&evaluation.drill),
            primary_leak: evaluation.leak.primary.map(|k| k.as_str().to_string()),
            secondary_leak: evaluation.leak.secondary.map(|k| k.as_str().to_string()),
            leak_explanation: none_if_empty(&evaluation.leak.explanation),
            leak_evidence: encode_list(&evaluation.leak.evidence)?,
        })
    }

    /// Decode the row back into a live evaluation.
    ///
    /// Score blobs with missing phase keys decode with the 50 default,
    /// and the overall score is recomputed from the decoded scores.
    /// Absent optional columns decode as empty.
    pub fn decode(&self) -> Result<Evaluation> {
        let scores: PhaseScores = serde_json::from_str(&self.scores)?;
        let overall = scores.overall();
        Ok(Evaluation {
            scores,
            overall,
            summary: self.summary.clone(),
            actions: serde_json::from_str(&self.actions)?,
            practice_next: self.practice_next.clone(),
            weaknesses: decode_list(self.weaknesses.as_deref())?,
            strengths: decode_list(self.strengths.as_deref())?,
            suggested_rewrite: self.suggested_rewrite.clone().unwrap_or_default(),
            drill: self.drill.clone().unwrap_or_default(),
            leak: LeakDiagnostic {
                primary: self.primary_leak.as_deref().and_then(LeakKind::parse),
                secondary: self.secondary_leak.as_deref().and_then(LeakKind::parse),
                explanation: self.leak_explanation.clone().unwrap_or_default(),
                evidence: decode_list(self.leak_evidence.as_deref())?,
            },
        })
    }

    /// Parsed phase scores, without decoding the full evaluation
    pub fn phase_scores(&self) -> Result<PhaseScores> {
        Ok(serde_json::from_str(&self.scores)?)
    }
}
