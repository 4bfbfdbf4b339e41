//! Roleplay coach
//!
//! Simulates the prospect's side of a practice conversation and wraps
//! every reply in coaching guidance: what to say next, one thing to fix,
//! and a drill. Two paths produce a turn:
//!
//! - the deterministic mock ([`mock_coach_turn`]), driven entirely by
//!   fixed tables, a seeded bullet pick, and the caller's playbooks
//! - a model-backed path that prompts a [`TextGenerator`] for structured
//!   output and falls back to the mock on any failure
//!
//! [`coach_turn`] composes the two and reports which path produced the
//! reply.

pub mod llm;
pub mod mock;
pub mod tables;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::notes::RankedChunk;
use crate::playbooks::PlaybookLibrary;
use crate::services::{GenerateOptions, TextGenerator};
use crate::types::ChatTurn;

pub use llm::{coach_prompt, parse_coach_reply};
pub use mock::{mock_coach_turn, phase_playbook_kind};
pub use tables::{PhaseTables, DEFAULT_TABLES};

/// Everything one coaching turn needs
#[derive(Debug, Clone, PartialEq)]
pub struct CoachRequest {
    /// Phase the session is currently in, if tracked. May be a custom
    /// label outside the canonical five.
    pub current_phase: Option<String>,

    /// The scenario's phase sequence
    pub phases: Vec<String>,

    /// The seller's playbook bullets, grouped by kind
    pub playbooks: PlaybookLibrary,

    /// The seller's latest message
    pub user_message: String,

    /// Prior turns, oldest first. Only the model path reads these.
    pub history: Vec<ChatTurn>,

    /// Ranked note excerpts for this turn's context
    pub notes_chunks: Vec<RankedChunk>,
}

/// One coaching turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachTurn {
    /// The prospect's next line
    pub assistant_reply: String,

    /// One specific thing the seller could say next
    pub suggested_next_user_message: String,

    /// One concise coaching tip
    pub one_thing_to_fix: String,

    /// A short practice prompt
    pub drill: String,

    /// Phase to advance the session to, when moving on
    pub next_phase: Option<String>,

    /// Why the conversation sits in the current phase
    pub phase_rationale: Option<String>,
}

/// A coach turn plus the path that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachOutcome {
    pub turn: CoachTurn,

    /// True when a model was attempted and the mock had to stand in
    pub used_fallback: bool,
}

/// Next phase in the sequence, or the first when nothing is current.
/// `None` once the sequence is exhausted or the current label is not in
/// the sequence at all.
pub fn next_phase<'a>(current: Option<&str>, phases: &'a [String]) -> Option<&'a str> {
    match current {
        None => phases.first().map(String::as_str),
        Some(c) => {
            let i = phases.iter().position(|p| p == c)?;
            phases.get(i + 1).map(String::as_str)
        }
    }
}

/// Notes query for a coaching turn: scenario title, phase, and message
/// joined into one keyword soup.
pub fn coach_notes_query(
    scenario_title: Option<&str>,
    current_phase: Option<&str>,
    user_message: &str,
) -> String {
    [
        scenario_title.unwrap_or(""),
        current_phase.unwrap_or(""),
        user_message,
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" | ")
}

/// Produce one coaching turn, preferring the model when one is supplied.
///
/// Without a model this is exactly [`mock_coach_turn`] and
/// `used_fallback` stays false.
pub async fn coach_turn(
    model: Option<&dyn TextGenerator>,
    tables: &PhaseTables,
    request: &CoachRequest,
) -> CoachOutcome {
    let model = match model {
        Some(m) => m,
        None => {
            return CoachOutcome {
                turn: mock_coach_turn(tables, request),
                used_fallback: false,
            }
        }
    };

    let options = GenerateOptions::new(600, 0.6);
    match model.generate(&coach_prompt(request), options).await {
        Ok(reply) => {
            if let Some(turn) = parse_coach_reply(&reply) {
                debug!("Using model-produced coach turn");
                return CoachOutcome {
                    turn,
                    used_fallback: false,
                };
            }
            warn!("Coach reply was not valid JSON, falling back to mock coach");
        }
        Err(e) => {
            warn!(error = %e, "Coach generation failed, falling back to mock coach");
        }
    }

    CoachOutcome {
        turn: mock_coach_turn(tables, request),
        used_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::default_phase_sequence;
    use crate::services::MockTextGenerator;

    fn request() -> CoachRequest {
        CoachRequest {
            current_phase: Some("objection".to_string()),
            phases: default_phase_sequence(),
            playbooks: PlaybookLibrary::default(),
            user_message: "I understand the price concern.".to_string(),
            history: Vec::new(),
            notes_chunks: Vec::new(),
        }
    }

    #[test]
    fn test_next_phase_walks_the_sequence() {
        let phases = default_phase_sequence();
        assert_eq!(next_phase(None, &phases), Some("opening"));
        assert_eq!(next_phase(Some("opening"), &phases), Some("discovery"));
        assert_eq!(next_phase(Some("close"), &phases), None);
        assert_eq!(next_phase(Some("unknown"), &phases), None);
    }

    #[test]
    fn test_notes_query_skips_missing_parts() {
        assert_eq!(
            coach_notes_query(Some("Cold outreach"), Some("opening"), "Hi there"),
            "Cold outreach | opening | Hi there"
        );
        assert_eq!(coach_notes_query(None, None, "Hi there"), "Hi there");
    }

    #[tokio::test]
    async fn test_no_model_uses_mock_without_fallback_flag() {
        let req = request();
        let outcome = coach_turn(None, &DEFAULT_TABLES, &req).await;
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.turn, mock_coach_turn(&DEFAULT_TABLES, &req));
    }

    #[tokio::test]
    async fn test_model_turn_passes_through() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().returning(|_, _| {
            Ok(r#"{"assistantReply": "Fair enough. When could you start?", "suggestedNextUserMessage": "Propose a date.", "oneThingToFix": "Be direct.", "drill": "Practice: name the date.", "nextPhase": "close"}"#.to_string())
        });

        let outcome = coach_turn(Some(&mock), &DEFAULT_TABLES, &request()).await;
        assert!(!outcome.used_fallback);
        assert_eq!(
            outcome.turn.assistant_reply,
            "Fair enough. When could you start?"
        );
        assert_eq!(outcome.turn.next_phase.as_deref(), Some("close"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back_to_mock() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .returning(|_, _| Ok("I'd rather chat freely!".to_string()));

        let req = request();
        let outcome = coach_turn(Some(&mock), &DEFAULT_TABLES, &req).await;
        assert!(outcome.used_fallback);
        assert_eq!(outcome.turn, mock_coach_turn(&DEFAULT_TABLES, &req));
    }

    #[tokio::test]
    async fn test_generation_error_falls_back_to_mock() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().returning(|_, _| {
            Err(crate::error::PitchdrillError::LlmApi("503".to_string()))
        });

        let req = request();
        let outcome = coach_turn(Some(&mock), &DEFAULT_TABLES, &req).await;
        assert!(outcome.used_fallback);
        assert_eq!(outcome.turn, mock_coach_turn(&DEFAULT_TABLES, &req));
    }
}
