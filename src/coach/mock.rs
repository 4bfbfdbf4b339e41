//! Deterministic mock coach
//!
//! Produces a trainer-like turn with no model: a canned prospect reply
//! for the active phase, up to two playbook bullets picked by a
//! length-derived seed, and an optional excerpt from the seller's own
//! notes. The same request always yields the same turn; the seed varies
//! the bullet pick across different messages without any RNG.

use crate::notes::RankedChunk;
use crate::playbooks::PlaybookKind;

use super::tables::PhaseTables;
use super::{next_phase, CoachRequest, CoachTurn};

/// Which playbook kind feeds each phase. Unknown phases read openers.
pub fn phase_playbook_kind(phase: &str) -> PlaybookKind {
    match phase {
        "opening" => PlaybookKind::OpeningHooks,
        "discovery" => PlaybookKind::DiscoveryQuestions,
        "pitch" | "objection" => PlaybookKind::ObjectionResponses,
        "close" => PlaybookKind::ClosingNextSteps,
        _ => PlaybookKind::OpeningHooks,
    }
}

/// Pick up to `count` bullets starting at `seed % len`, skipping the
/// second pick when it would repeat the first.
fn pick_bullets(bullets: &[String], count: usize, seed: usize) -> Vec<&str> {
    if bullets.is_empty() {
        return Vec::new();
    }
    let idx = seed % bullets.len();
    let mut out = vec![bullets[idx].as_str()];
    if count >= 2 && bullets.len() > 1 {
        let idx2 = (seed + 1) % bullets.len();
        if idx2 != idx {
            out.push(bullets[idx2].as_str());
        }
    }
    out
}

fn notes_suffix(chunks: &[RankedChunk]) -> String {
    let top = match chunks.iter().find(|c| c.score > 0) {
        Some(top) => top,
        None => return String::new(),
    };
    let taken: String = top.content.chars().take(80).collect();
    let ellipsis = if top.content.chars().count() > 80 {
        "…"
    } else {
        ""
    };
    format!(" [From your notes: {}{}]", taken.trim(), ellipsis)
}

/// Produce one deterministic coaching turn.
pub fn mock_coach_turn(tables: &PhaseTables, request: &CoachRequest) -> CoachTurn {
    let phase: &str = match &request.current_phase {
        Some(p) if request.phases.iter().any(|x| x == p) => p.as_str(),
        _ => request
            .phases
            .first()
            .map(String::as_str)
            .unwrap_or("opening"),
    };
    let next = next_phase(Some(phase), &request.phases);

    let bullets = request.playbooks.bullets_for(phase_playbook_kind(phase));
    // seed uses the raw requested phase, not the resolved one
    let seed = request.user_message.chars().count()
        + request
            .current_phase
            .as_ref()
            .map(|p| p.chars().count())
            .unwrap_or(0);
    let selected = pick_bullets(bullets, 2, seed);

    let prospect_line = tables
        .prospect_reply(phase)
        .unwrap_or("I'm following along. Tell me more.");
    let playbook_suffix = if selected.is_empty() {
        String::new()
    } else {
        format!(" [Your playbook: {}]", selected.join(" | "))
    };
    let assistant_reply = format!(
        "{}{}{}",
        prospect_line,
        playbook_suffix,
        notes_suffix(&request.notes_chunks)
    );

    let suggested_next_user_message = match selected.first() {
        Some(bullet) if phase == "discovery" => {
            let taken: String = bullet.chars().take(120).collect();
            let ellipsis = if bullet.chars().count() > 120 { "…" } else { "" };
            format!("{}{}", taken, ellipsis)
        }
        _ => tables
            .suggested_next(phase)
            .unwrap_or("Ask one clear follow-up question.")
            .to_string(),
    };

    let one_thing_to_fix = tables
        .one_thing_to_fix(phase)
        .unwrap_or("Keep the conversation moving toward a clear next step.")
        .to_string();
    let drill = tables
        .drill(phase)
        .unwrap_or("Record yourself and rate the conversation.")
        .to_string();
    let phase_rationale = tables.rationale(phase).map(str::to_string);

    CoachTurn {
        assistant_reply,
        suggested_next_user_message,
        one_thing_to_fix,
        drill,
        next_phase: next.map(str::to_string),
        phase_rationale,
    }
}
