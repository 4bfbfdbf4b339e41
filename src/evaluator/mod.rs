//! Rule-based transcript evaluator
//!
//! Scores a practice conversation across the five sales phases using
//! deterministic keyword heuristics: question counts, objection keywords,
//! next-step phrases, and transcript length. No model calls, no state,
//! no randomness. The same transcript always produces the same
//! [`Evaluation`].
//!
//! Per-phase scoring:
//!
//! - opening: 35 + 10 per distinct greeting keyword, capped at 100
//! - discovery: 40 + 4 per question mark + 5 per distinct question stem
//! - pitch: 50 + 1 per 50 words, bonus capped at 20
//! - objection: 40 + 15 per distinct pricing/affordability keyword
//! - close: 30 + 12 per distinct next-step phrase
//!
//! A phase under 60 is weak, 75 or above is strong. The summary, action
//! list, drill, and suggested rewrite are selected from fixed templates by
//! score thresholds, so coaching language stays consistent between runs.

pub mod leaks;
pub mod llm;

use serde::{Deserialize, Serialize};

use crate::lexicon;
use crate::types::{Phase, PhaseScores};

pub use leaks::{build_leak_diagnostic, extract_seller_blocks, LeakDiagnostic, LeakKind};
pub use llm::{parse_rating_reply, rate_transcript, rating_prompt, RatingOutcome, RatingReply};

pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

pub(crate) fn count_questions(text: &str) -> u32 {
    text.matches('?').count() as u32
}

pub(crate) fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Full evaluation of one practice transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Per-phase scores, each 0-100
    pub scores: PhaseScores,

    /// Rounded mean of the five phase scores
    pub overall: u8,

    /// One of three fixed summary lines keyed off the overall score
    pub summary: String,

    /// Targeted improvement actions, at least one
    pub actions: Vec<String>,

    /// Short drill line naming the first weak phase
    pub practice_next: String,

    /// One line per weak phase, or an overall nudge when none are weak
    /// but the conversation still scored under 70
    pub weaknesses: Vec<String>,

    /// One line per strong phase, with a generic fallback
    pub strengths: Vec<String>,

    /// Replacement line for the weakest moment of the conversation
    pub suggested_rewrite: String,

    /// Concrete practice instruction for the first weak phase
    pub drill: String,

    /// Frame / Leverage / Precision diagnostic
    pub leak: LeakDiagnostic,
}

fn phase_scores(normalized: &str, word_count: u32, question_count: u32) -> PhaseScores {
    let objection = 40 + lexicon::distinct_hits(normalized, lexicon::OBJECTION_WORDS) * 15;
    let close = 30 + lexicon::distinct_hits(normalized, lexicon::NEXT_STEP_WORDS) * 12;
    let opening = 35 + lexicon::distinct_hits(normalized, lexicon::OPENING_WORDS) * 10;
    let discovery =
        40 + question_count * 4 + lexicon::distinct_hits(normalized, lexicon::DISCOVERY_WORDS) * 5;
    let pitch = 50 + (word_count / 50).min(20);

    PhaseScores {
        opening: opening.min(100) as u8,
        discovery: discovery.min(100) as u8,
        pitch: pitch.min(100) as u8,
        objection: objection.min(100) as u8,
        close: close.min(100) as u8,
    }
}

/// Evaluate a transcript. Pure and total: any input string, including an
/// empty one, yields a complete [`Evaluation`].
pub fn evaluate_transcript(transcript: &str) -> Evaluation {
    let t = transcript.trim();
    let normalized = normalize(t);
    let word_count = count_words(&normalized);
    let question_count = count_questions(t);

    let scores = phase_scores(&normalized, word_count, question_count);
    let overall = scores.overall();

    let weak_phases: Vec<Phase> = Phase::ALL
        .into_iter()
        .filter(|p| scores.get(*p) < 60)
        .collect();
    let strong_phases: Vec<Phase> = Phase::ALL
        .into_iter()
        .filter(|p| scores.get(*p) >= 75)
        .collect();

    let mut weaknesses: Vec<String> = weak_phases
        .iter()
        .map(|p| {
            let detail = match p {
                Phase::Discovery => "ask more questions",
                Phase::Close => "suggest a clear next step",
                Phase::Objection => "address concerns explicitly",
                _ => "develop this phase",
            };
            format!("Need more in {}: {}.", p, detail)
        })
        .collect();
    if weaknesses.is_empty() && overall < 70 {
        weaknesses
            .push("Overall flow could be tighter; try one clear next step per conversation.".to_string());
    }

    let mut strengths: Vec<String> = strong_phases
        .iter()
        .map(|p| format!("{} was strong.", p.label()))
        .collect();
    if strengths.is_empty() {
        strengths
            .push("You covered multiple phases; focus on one or two to improve next.".to_string());
    }

    let mut actions: Vec<String> = Vec::new();
    if scores.discovery < 70 {
        actions.push("Add 2–3 open questions in discovery.".to_string());
    }
    if scores.objection < 70 {
        actions.push("Acknowledge price/objection and reframe with value.".to_string());
    }
    if scores.close < 70 {
        actions.push(
            "End with one concrete next step (e.g. calendar link or follow-up date).".to_string(),
        );
    }
    if word_count < 100 {
        actions.push("Practice longer roleplays to build depth.".to_string());
    }
    if actions.is_empty() {
        actions.push("Keep structure; try varying your opening hook.".to_string());
    }

    let summary = if overall >= 75 {
        "Solid conversation with clear structure. Small tweaks will make it even stronger."
    } else if overall >= 60 {
        "Good base. Focus on the suggested improvements to score higher next time."
    } else {
        "Practice the drills below and re-run a similar conversation to see improvement."
    }
    .to_string();

    let first_weak = weak_phases.first().copied();

    let practice_next = match first_weak {
        Some(p) => {
            let instruction = match p {
                Phase::Discovery => "Ask 5 questions before pitching.",
                Phase::Close => "End every practice with 'So the next step is…'.",
                _ => "Roleplay this phase twice with a peer.",
            };
            format!("Drill: {} — {}", p, instruction)
        }
        None => "Drill: Record yourself on a cold open and rate again.".to_string(),
    };

    let drill = match first_weak {
        Some(Phase::Discovery) => {
            "Practice: Ask 5 discovery questions in your next call before mentioning your product."
                .to_string()
        }
        Some(Phase::Close) => {
            "Practice: End your next 3 conversations with one concrete next step (e.g. 'Can we schedule a 15-min follow-up Tuesday?')."
                .to_string()
        }
        Some(Phase::Objection) => {
            "Practice: When they mention price or concern, say 'I hear you' then reframe with one benefit."
                .to_string()
        }
        Some(p) => format!("Practice: Focus on {}—roleplay that phase twice.", p),
        None => practice_next.clone(),
    };

    let suggested_rewrite = if scores.close < 70 {
        "So the next step is [concrete action, e.g. a 15-min call next week]. Does that work?"
    } else if scores.discovery < 70 {
        "What would need to be true for this to become a priority for you?"
    } else if scores.objection < 70 {
        "I hear you. If we could show [specific outcome], would that change how you see it?"
    } else {
        "Great—what's one thing you'd want to see before making a decision?"
    }
    .to_string();

    let leak = build_leak_diagnostic(t);

    Evaluation {
        scores,
        overall,
        summary,
        actions,
        practice_next,
        weaknesses,
        strengths,
        suggested_rewrite,
        drill,
        leak,
    }
}
