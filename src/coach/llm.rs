//! Coach prompt construction and structured-reply parsing
//!
//! The model plays the prospect and returns coaching fields as a JSON
//! object. The prompt carries the active phase, a capped sample of the
//! seller's playbook bullets, the recent conversation, and the ranked
//! note excerpts. Parsing is lenient: missing keys default rather than
//! fail, and a reply that is not a JSON object at all is rejected so the
//! caller can fall back to the mock coach.

use serde_json::Value;

use crate::notes::build_context_block;

use super::{CoachRequest, CoachTurn};

/// Bullets included per playbook kind
const PROMPT_BULLETS_PER_KIND: usize = 5;

/// Conversation turns included
const PROMPT_HISTORY_TURNS: usize = 6;

/// Build the coaching prompt for one turn.
pub fn coach_prompt(request: &CoachRequest) -> String {
    let phase = request.current_phase.as_deref().unwrap_or("opening");

    let mut bullet_lines: Vec<String> = Vec::new();
    for (kind, bullets) in request.playbooks.iter() {
        if !bullets.is_empty() {
            let sample: Vec<&str> = bullets
                .iter()
                .take(PROMPT_BULLETS_PER_KIND)
                .map(String::as_str)
                .collect();
            bullet_lines.push(format!("{}: {}", kind, sample.join(" | ")));
        }
    }
    let playbook_block = if bullet_lines.is_empty() {
        String::new()
    } else {
        format!(
            "Playbook bullets (use where relevant):\n{}",
            bullet_lines.join("\n")
        )
    };

    let history = &request.history;
    let start = history.len().saturating_sub(PROMPT_HISTORY_TURNS);
    let convo = history[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    let notes_block = if request.notes_chunks.is_empty() {
        String::new()
    } else {
        format!(
            "Relevant notes (user's gold knowledge—prioritize these over generic advice):\n{}",
            build_context_block(&request.notes_chunks)
        )
    };

    format!(
        r#"You are a sales coach. The user is doing a roleplay: they play the seller, you play the prospect.

Current phase: {phase}
{playbook_block}
{notes_section}Recent conversation:
{convo}

Latest seller message: {user_message}

Respond with a JSON object only (no markdown, no code block), with these exact keys:
- assistantReply (string): Your next line as the prospect (1-3 sentences).
- suggestedNextUserMessage (string): One specific thing the seller could say next (e.g. a question or reframe).
- oneThingToFix (string): One concise coaching tip (e.g. "Ask one more open question before pitching.").
- drill (string): A short practice prompt they can do next (e.g. "Practice: End with one concrete next step.").
- phaseRationale (string, optional): One sentence on why we're in this phase.
- nextPhase (string, optional): The next phase if moving on: one of opening, discovery, pitch, objection, close.

Output only valid JSON."#,
        phase = phase,
        playbook_block = playbook_block,
        notes_section = if notes_block.is_empty() {
            String::new()
        } else {
            format!("\n{}\n", notes_block)
        },
        convo = if convo.is_empty() {
            "(none yet)".to_string()
        } else {
            convo
        },
        user_message = request.user_message,
    )
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn optional_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::Null) | None => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(other) => Some(other.to_string()),
    }
}

/// Parse a model reply into a coach turn.
///
/// Returns `None` when the reply is not a JSON object. An empty
/// assistant reply defaults to a neutral prompt for more.
pub fn parse_coach_reply(content: &str) -> Option<CoachTurn> {
    let value: Value = serde_json::from_str(content.trim()).ok()?;
    if !value.is_object() {
        return None;
    }

    let mut assistant_reply = string_field(&value, "assistantReply");
    if assistant_reply.is_empty() {
        assistant_reply = "Tell me more.".to_string();
    }

    Some(CoachTurn {
        assistant_reply,
        suggested_next_user_message: string_field(&value, "suggestedNextUserMessage"),
        one_thing_to_fix: string_field(&value, "oneThingToFix"),
        drill: string_field(&value, "drill"),
        next_phase: optional_field(&value, "nextPhase"),
        phase_rationale: optional_field(&value, "phaseRationale"),
    })
}
