//! Model-backed transcript rating with deterministic fallback
//!
//! Builds the rating prompt, parses the structured JSON reply leniently,
//! and composes the final [`Evaluation`]. The leak diagnostic is always
//! computed by the deterministic rules, even when the scores and feedback
//! come from the model. Any generation or parse failure falls back to
//! [`evaluate_transcript`] and flags the outcome.

use serde_json::Value;
use tracing::{debug, warn};

use crate::services::{GenerateOptions, TextGenerator};
use crate::types::{Phase, PhaseScores};

use super::{build_leak_diagnostic, evaluate_transcript, Evaluation};

/// Transcript prefix length sent to the model
const TRANSCRIPT_PROMPT_LIMIT: usize = 6000;

/// Rating produced by one path or the other
#[derive(Debug, Clone, PartialEq)]
pub struct RatingOutcome {
    pub evaluation: Evaluation,

    /// True when a model was attempted and the deterministic engine had
    /// to stand in. Stays false on the pure rule-based path.
    pub used_fallback: bool,
}

/// Structured fields recovered from a model reply
#[derive(Debug, Clone, PartialEq)]
pub struct RatingReply {
    pub scores: PhaseScores,
    pub summary: String,
    pub actions: Vec<String>,
    pub weaknesses: Vec<String>,
    pub strengths: Vec<String>,
    pub suggested_rewrite: String,
    pub drill: String,
}

/// Build the evaluation prompt. Long transcripts are cut to the first
/// 6000 characters to bound the request.
pub fn rating_prompt(transcript: &str) -> String {
    let excerpt: String = transcript.chars().take(TRANSCRIPT_PROMPT_LIMIT).collect();
    format!(
        r#"You are a sales coach. Evaluate this sales conversation transcript.

Transcript:
---
{}
---

Respond with a JSON object only (no markdown, no code block), with these exact keys:
- scores (object): Five keys exactly: opening, discovery, pitch, objection, close. Each value a number 0-100.
- summary (string): 1-2 sentences overall assessment.
- actions (array of strings): 2-4 specific improvements (e.g. "Add 2 open questions in discovery.").
- weaknesses (array of strings): 1-3 top weaknesses (short phrases).
- strengths (array of strings): 1-3 strengths (short phrases).
- suggestedRewrite (string): One example of a better "next message" the seller could have said (one sentence).
- drill (string): One concrete practice drill based on the weakest area (e.g. "Practice: Ask 5 discovery questions before mentioning your product.").

Output only valid JSON."#,
        excerpt
    )
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn score_field(scores: Option<&Value>, phase: Phase) -> u8 {
    scores
        .and_then(|s| s.get(phase.as_str()))
        .and_then(Value::as_f64)
        .map(|v| v.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(50)
}

/// Parse a model reply into rating fields.
///
/// Returns `None` when the reply is not a JSON object; individual fields
/// are recovered leniently: malformed or absent scores default to 50,
/// absent lists to empty, an absent summary to a fixed line.
pub fn parse_rating_reply(content: &str) -> Option<RatingReply> {
    let value: Value = serde_json::from_str(content.trim()).ok()?;
    if !value.is_object() {
        return None;
    }

    let raw_scores = value.get("scores");
    let scores = PhaseScores {
        opening: score_field(raw_scores, Phase::Opening),
        discovery: score_field(raw_scores, Phase::Discovery),
        pitch: score_field(raw_scores, Phase::Pitch),
        objection: score_field(raw_scores, Phase::Objection),
        close: score_field(raw_scores, Phase::Close),
    };

    let mut summary = string_field(&value, "summary");
    if summary.is_empty() {
        summary = "Review the conversation.".to_string();
    }

    Some(RatingReply {
        scores,
        summary,
        actions: string_list(&value, "actions"),
        weaknesses: string_list(&value, "weaknesses"),
        strengths: string_list(&value, "strengths"),
        suggested_rewrite: string_field(&value, "suggestedRewrite"),
        drill: string_field(&value, "drill"),
    })
}

fn evaluation_from_reply(reply: RatingReply, transcript: &str) -> Evaluation {
    let overall = reply.scores.overall();
    // the leak diagnostic stays rule-based regardless of scoring path
    let leak = build_leak_diagnostic(transcript);
    Evaluation {
        scores: reply.scores,
        overall,
        summary: reply.summary,
        actions: reply.actions,
        practice_next: reply.drill.clone(),
        weaknesses: reply.weaknesses,
        strengths: reply.strengths,
        suggested_rewrite: reply.suggested_rewrite,
        drill: reply.drill,
        leak,
    }
}

/// Rate a transcript, preferring the model when one is supplied.
///
/// With no model this is exactly [`evaluate_transcript`] and
/// `used_fallback` stays false; the flag means "a model was attempted and
/// failed", not "the deterministic engine ran".
pub async fn rate_transcript(
    model: Option<&dyn TextGenerator>,
    transcript: &str,
) -> RatingOutcome {
    let transcript = transcript.trim();

    let model = match model {
        Some(m) => m,
        None => {
            return RatingOutcome {
                evaluation: evaluate_transcript(transcript),
                used_fallback: false,
            }
        }
    };

    let options = GenerateOptions::new(800, 0.4);
    match model.generate(&rating_prompt(transcript), options).await {
        Ok(reply) => {
            if let Some(parsed) = parse_rating_reply(&reply) {
                debug!("Using model-produced rating");
                return RatingOutcome {
                    evaluation: evaluation_from_reply(parsed, transcript),
                    used_fallback: false,
                };
            }
            warn!("Rating reply was not valid JSON, falling back to rule-based scoring");
        }
        Err(e) => {
            warn!(error = %e, "Rating generation failed, falling back to rule-based scoring");
        }
    }

    RatingOutcome {
        evaluation: evaluate_transcript(transcript),
        used_fallback: true,
    }
}
