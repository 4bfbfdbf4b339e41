//! Scenario presets and phase sequences
//!
//! A scenario frames one practice session: a title, a short setup
//! description, and the sequence of phases the roleplay walks through.
//! Stored sequences arrive as a JSON text blob; decoding is lenient and
//! every malformed shape falls back to the canonical five-phase flow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::playbooks::{Playbook, PlaybookKind};
use crate::types::Phase;

/// Canonical five-phase flow, in call order
pub fn default_phase_sequence() -> Vec<String> {
    Phase::ALL.iter().map(|p| p.as_str().to_string()).collect()
}

/// One built-in practice scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPreset {
    pub title: String,
    pub description: String,
    pub phases: Vec<String>,
}

/// The built-in scenario catalog
pub fn default_presets() -> Vec<ScenarioPreset> {
    let presets = [
        (
            "Cold outreach",
            "First touch with a prospect who doesn't know you.",
        ),
        (
            "Demo follow-up",
            "Follow up after a product demo to address concerns and move to next step.",
        ),
        (
            "Pricing objection",
            "Handle pushback on price and justify value.",
        ),
        (
            "Closing negotiation",
            "Negotiate terms and get to yes.",
        ),
        (
            "Discovery call",
            "Ask questions to uncover needs and qualify the opportunity.",
        ),
    ];
    presets
        .into_iter()
        .map(|(title, description)| ScenarioPreset {
            title: title.to_string(),
            description: description.to_string(),
            phases: default_phase_sequence(),
        })
        .collect()
}

/// Starter playbooks for a fresh account
pub fn default_playbooks() -> Vec<Playbook> {
    vec![
        Playbook::new(
            "Opening hook",
            PlaybookKind::OpeningHooks,
            "We help teams like yours cut follow-up time by half.\nWhat's your biggest bottleneck right now?",
        ),
        Playbook::new(
            "Objection responses",
            PlaybookKind::ObjectionResponses,
            "I hear you. Can I ask what you're comparing us to?\nWhat would need to be true for this to become a priority?",
        ),
    ]
}

/// Decode a stored phase-sequence blob.
///
/// Accepts a JSON array of values, stringifying each element. `None`,
/// invalid JSON, a non-array, and an empty array all decode to the
/// default sequence.
pub fn parse_phase_sequence(blob: Option<&str>) -> Vec<String> {
    let blob = match blob {
        Some(b) => b,
        None => return default_phase_sequence(),
    };
    match serde_json::from_str::<Value>(blob) {
        Ok(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => default_phase_sequence(),
    }
}

/// Encode a phase sequence for storage
pub fn encode_phase_sequence(phases: &[String]) -> String {
    serde_json::to_string(phases).unwrap_or_else(|_| "[]".to_string())
}
