//! Core data types for the pitchdrill coaching engine
//!
//! This module defines the structures shared across the evaluator, the
//! roleplay coach, and the feedback record layer: the five canonical sales
//! phases, per-phase score sets, and conversation turns.

use serde::{Deserialize, Serialize};

/// The five canonical sales phases, in call order.
///
/// Enumeration order is significant: it is the iteration order for score
/// reporting and the tie-break order wherever phases compete (weakness
/// selection, drill selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Greeting and call framing
    Opening,

    /// Question-driven needs discovery
    Discovery,

    /// Value presentation
    Pitch,

    /// Objection handling
    Objection,

    /// Commitment and next steps
    Close,
}

impl Phase {
    /// All phases in canonical order
    pub const ALL: [Phase; 5] = [
        Phase::Opening,
        Phase::Discovery,
        Phase::Pitch,
        Phase::Objection,
        Phase::Close,
    ];

    /// Canonical lowercase string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Opening => "opening",
            Phase::Discovery => "discovery",
            Phase::Pitch => "pitch",
            Phase::Objection => "objection",
            Phase::Close => "close",
        }
    }

    /// Parse a canonical phase string. Scenario phase lists may carry
    /// arbitrary labels; only the five canonical names map to a variant.
    pub fn parse(s: &str) -> Option<Phase> {
        match s {
            "opening" => Some(Phase::Opening),
            "discovery" => Some(Phase::Discovery),
            "pitch" => Some(Phase::Pitch),
            "objection" => Some(Phase::Objection),
            "close" => Some(Phase::Close),
            _ => None,
        }
    }

    /// Human-readable capitalized label for summaries and drills
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Opening => "Opening",
            Phase::Discovery => "Discovery",
            Phase::Pitch => "Pitch",
            Phase::Objection => "Objection",
            Phase::Close => "Close",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_phase_score() -> u8 {
    50
}

/// Scores for all five phases, each in [0, 100].
///
/// Every phase is always present. When decoding stored score blobs a
/// missing key falls back to the neutral 50 rather than failing, matching
/// the feedback record contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseScores {
    #[serde(default = "default_phase_score")]
    pub opening: u8,

    #[serde(default = "default_phase_score")]
    pub discovery: u8,

    #[serde(default = "default_phase_score")]
    pub pitch: u8,

    #[serde(default = "default_phase_score")]
    pub objection: u8,

    #[serde(default = "default_phase_score")]
    pub close: u8,
}

impl PhaseScores {
    /// Score for a single phase
    pub fn get(&self, phase: Phase) -> u8 {
        match phase {
            Phase::Opening => self.opening,
            Phase::Discovery => self.discovery,
            Phase::Pitch => self.pitch,
            Phase::Objection => self.objection,
            Phase::Close => self.close,
        }
    }

    /// Iterate scores in canonical phase order
    pub fn iter(&self) -> impl Iterator<Item = (Phase, u8)> + '_ {
        Phase::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// Rounded mean of the five scores (half rounds up)
    pub fn overall(&self) -> u8 {
        let sum: u32 = Phase::ALL.iter().map(|p| self.get(*p) as u32).sum();
        ((sum + 2) / 5) as u8
    }
}

impl Default for PhaseScores {
    fn default() -> Self {
        Self {
            opening: 50,
            discovery: 50,
            pitch: 50,
            objection: 50,
            close: 50,
        }
    }
}

/// Speaker role in a coaching conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The practicing seller
    User,

    /// The simulated prospect
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One prior turn of a coaching conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
