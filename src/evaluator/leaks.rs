//! Frame / Leverage / Precision leak diagnostic
//!
//! Diagnoses the three conversational "leaks" from a raw transcript:
//!
//! - **Frame**: authority erosion through long seller monologues or
//!   hedging language
//! - **Leverage**: missing commitment because no next step or time-bound
//!   anchor was proposed
//! - **Precision**: insufficient discovery, measured by question count
//!   against a length-scaled threshold and question density
//!
//! Signals are scored independently, ranked descending, and zero-score
//! categories are excluded. Ties keep the Frame > Leverage > Precision
//! declaration order via the stable sort.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon;

use super::{count_questions, count_words, normalize};

/// Role labels that mark a line as spoken by the seller.
///
/// Alternation order matters: longer labels come before the bare "s" so
/// that "Seller:" strips as a whole label.
static SELLER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(seller|salesperson|sales rep|rep|you|s):\s*").unwrap());

/// The three leak categories, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeakKind {
    Frame,
    Leverage,
    Precision,
}

impl LeakKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeakKind::Frame => "Frame",
            LeakKind::Leverage => "Leverage",
            LeakKind::Precision => "Precision",
        }
    }

    pub fn parse(s: &str) -> Option<LeakKind> {
        match s {
            "Frame" => Some(LeakKind::Frame),
            "Leverage" => Some(LeakKind::Leverage),
            "Precision" => Some(LeakKind::Precision),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeakKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scored leak category with its supporting observations
#[derive(Debug, Clone, PartialEq, Eq)]
struct LeakSignal {
    kind: LeakKind,
    score: u32,
    evidence: Vec<String>,
}

/// Ranked diagnostic over all three categories.
///
/// `primary` is the highest-scoring category with a nonzero score,
/// `secondary` the runner-up; both are `None` when every category scores
/// zero. `evidence` concatenates the primary's observations followed by
/// the secondary's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakDiagnostic {
    pub primary: Option<LeakKind>,
    pub secondary: Option<LeakKind>,
    pub explanation: String,
    pub evidence: Vec<String>,
}

/// Split a transcript into seller speech blocks.
///
/// A block starts at a line carrying a seller role prefix (prefix
/// stripped) and absorbs every following line until the next seller
/// prefix. Lines before the first seller prefix are dropped. A transcript
/// with no role labels at all is treated as a single seller block.
pub fn extract_seller_blocks(transcript: &str) -> Vec<String> {
    let lines = transcript
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in lines {
        if SELLER_PREFIX.is_match(line) {
            if !current.is_empty() {
                blocks.push(current.join(" "));
                current.clear();
            }
            current.push(SELLER_PREFIX.replace(line, "").trim().to_string());
        } else if !current.is_empty() {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(current.join(" "));
    }

    if blocks.is_empty() && !transcript.trim().is_empty() {
        return vec![transcript.trim().to_string()];
    }
    blocks
}

fn compute_leak_signals(transcript: &str) -> [LeakSignal; 3] {
    let t = transcript.trim();
    let normalized = normalize(t);
    let word_count = count_words(t);
    let seller_blocks = extract_seller_blocks(t);
    let question_count = count_questions(t);
    let question_density = if word_count > 0 {
        (question_count as f64 / word_count as f64) * 100.0
    } else {
        0.0
    };

    let soft_count = lexicon::total_hits(&normalized, lexicon::SOFT_WORDS);
    let max_block_words = seller_blocks
        .iter()
        .map(|b| count_words(b))
        .max()
        .unwrap_or(0);
    let has_long_monologue = max_block_words > 120;

    let mut frame_evidence = Vec::new();
    let mut frame_score = 0;
    if has_long_monologue {
        frame_score += 2;
        frame_evidence.push(format!(
            "Seller block of {} words (over 120-word threshold)",
            max_block_words
        ));
    }
    if soft_count >= 2 {
        frame_score += 1 + (soft_count - 2).min(2);
        frame_evidence.push(format!(
            "{} soft-language phrases detected (maybe, just, I think, sort of, kind of)",
            soft_count
        ));
    }

    let has_next_step = lexicon::NEXT_STEP_WORDS
        .iter()
        .any(|p| normalized.contains(p));
    let has_time_bound = lexicon::TIME_BOUND_PHRASES
        .iter()
        .any(|p| normalized.contains(p));

    let mut leverage_evidence = Vec::new();
    let mut leverage_score = 0;
    if !has_next_step {
        leverage_score += 2;
        leverage_evidence.push("No explicit next-step phrases found".to_string());
    }
    if !has_time_bound {
        leverage_score += 1;
        leverage_evidence.push("No time-bound language (e.g. next week, 15 min) found".to_string());
    }

    let mut precision_evidence = Vec::new();
    let mut precision_score = 0;
    let question_threshold = if word_count < 150 {
        1
    } else if word_count < 400 {
        2
    } else {
        3
    };
    if question_count < question_threshold {
        precision_score += 2;
        precision_evidence.push(format!(
            "Only {} question(s) in {} words (threshold: {})",
            question_count, word_count, question_threshold
        ));
    }
    if question_density < 0.5 && word_count > 100 {
        precision_score += 1;
        precision_evidence.push(format!(
            "Low question density: {:.1} per 100 words",
            question_density
        ));
    }

    [
        LeakSignal {
            kind: LeakKind::Frame,
            score: frame_score,
            evidence: frame_evidence,
        },
        LeakSignal {
            kind: LeakKind::Leverage,
            score: leverage_score,
            evidence: leverage_evidence,
        },
        LeakSignal {
            kind: LeakKind::Precision,
            score: precision_score,
            evidence: precision_evidence,
        },
    ]
}

/// Rank leak signals and produce the primary/secondary diagnostic.
pub fn build_leak_diagnostic(transcript: &str) -> LeakDiagnostic {
    let mut ranked: Vec<LeakSignal> = compute_leak_signals(transcript)
        .into_iter()
        .filter(|s| s.score > 0)
        .collect();
    // Stable sort: equal scores keep declaration order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    if ranked.is_empty() {
        return LeakDiagnostic {
            primary: None,
            secondary: None,
            explanation:
                "No major Frame, Leverage, or Precision leaks detected. Conversation shows solid structure."
                    .to_string(),
            evidence: Vec::new(),
        };
    }

    let primary = &ranked[0];
    let secondary = ranked.get(1);

    let mut evidence = primary.evidence.clone();
    if let Some(sec) = secondary {
        evidence.extend(sec.evidence.iter().cloned());
    }

    let mut explanations = Vec::new();
    explanations.push(match primary.kind {
        LeakKind::Frame => {
            "Frame leak suggests authority or confidence may be softening—long monologues or hedging language reduce presence."
        }
        LeakKind::Leverage => {
            "Leverage leak indicates unclear commitment—without next steps or time-bound language, the prospect has no clear path forward."
        }
        LeakKind::Precision => {
            "Precision leak points to insufficient discovery—too few questions limit understanding of the prospect's needs and priorities."
        }
    }.to_string());
    if let Some(sec) = secondary {
        explanations.push(format!(
            "{} also shows minor signals worth addressing in future conversations.",
            sec.kind
        ));
    }

    LeakDiagnostic {
        primary: Some(primary.kind),
        secondary: secondary.map(|s| s.kind),
        explanation: explanations.join(" "),
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seller_blocks_strip_role_prefix() {
        let blocks = extract_seller_blocks("Seller: Hi there.\nProspect: Hello.");
        assert_eq!(blocks, vec!["Hi there. Prospect: Hello."]);
    }

    #[test]
    fn test_seller_blocks_split_on_each_seller_line() {
        let transcript = "Rep: First point.\nProspect: Okay.\nRep: Second point.";
        let blocks = extract_seller_blocks(transcript);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "First point. Prospect: Okay.");
        assert_eq!(blocks[1], "Second point.");
    }

    #[test]
    fn test_unlabeled_transcript_is_one_block() {
        let blocks = extract_seller_blocks("No labels here.\n\nStill no labels.");
        assert_eq!(blocks, vec!["No labels here.\n\nStill no labels."]);
    }

    #[test]
    fn test_lines_before_first_seller_prefix_dropped() {
        let blocks = extract_seller_blocks("Prospect: Who is this?\nYou: This is Sam.");
        assert_eq!(blocks, vec!["This is Sam."]);
    }

    #[test]
    fn test_longer_label_wins_over_bare_s() {
        let blocks = extract_seller_blocks("Seller: keep all of this text");
        assert_eq!(blocks, vec!["keep all of this text"]);
    }

    #[test]
    fn test_empty_transcript_no_leaks_named() {
        let diag = build_leak_diagnostic("");
        // no seller text at all still flags leverage and precision
        assert_eq!(diag.primary, Some(LeakKind::Leverage));
        assert_eq!(diag.secondary, Some(LeakKind::Precision));
        assert!(diag
            .evidence
            .iter()
            .any(|e| e == "Only 0 question(s) in 0 words (threshold: 1)"));
    }

    #[test]
    fn test_clean_transcript_has_no_leaks() {
        let transcript = "You: What's blocking you today? Why now?\n\
                          You: Let's schedule a follow up next week.";
        let diag = build_leak_diagnostic(transcript);
        assert_eq!(diag.primary, None);
        assert_eq!(diag.secondary, None);
        assert_eq!(
            diag.explanation,
            "No major Frame, Leverage, or Precision leaks detected. Conversation shows solid structure."
        );
        assert!(diag.evidence.is_empty());
    }

    #[test]
    fn test_monologue_with_hedging_is_frame_primary() {
        let filler =
            "Our platform keeps teams aligned and reduces busywork across departments every single day. "
                .repeat(12);
        let transcript = format!("You: I think we just maybe sort of have a fit. {}", filler);

        let diag = build_leak_diagnostic(&transcript);
        assert_eq!(diag.primary, Some(LeakKind::Frame));
        // leverage (3) ties precision (3); declaration order breaks the tie
        assert_eq!(diag.secondary, Some(LeakKind::Leverage));
        assert_eq!(
            diag.evidence[0],
            "Seller block of 166 words (over 120-word threshold)"
        );
        assert_eq!(
            diag.evidence[1],
            "4 soft-language phrases detected (maybe, just, I think, sort of, kind of)"
        );
        assert!(diag.explanation.starts_with("Frame leak suggests"));
        assert!(diag.explanation.ends_with(
            "Leverage also shows minor signals worth addressing in future conversations."
        ));
    }

    #[test]
    fn test_question_threshold_scales_with_length() {
        // 160+ words, one question: threshold is 2, so precision fires
        let filler = "word ".repeat(160);
        let transcript = format!("You: {}is that fair?", filler);
        let diag = build_leak_diagnostic(&transcript);
        assert!(
            diag.evidence
                .iter()
                .any(|e| e.contains("(threshold: 2)")),
            "expected threshold evidence, got {:?}",
            diag.evidence
        );
    }
}
