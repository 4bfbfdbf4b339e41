//! Fixed per-phase coaching templates
//!
//! All of the mock coach's language lives here as one immutable value
//! passed by reference, so callers can swap in their own tables without
//! touching any global state. Lookups are keyed by the phase's string
//! label; unknown labels (custom scenario phases) miss and the caller
//! falls back to its generic line.

/// One immutable set of per-phase templates
#[derive(Debug, Clone, Copy)]
pub struct PhaseTables {
    /// Prospect's simulated reply for each phase
    pub prospect_replies: &'static [(&'static str, &'static str)],

    /// What the seller could say next
    pub suggested_next: &'static [(&'static str, &'static str)],

    /// One concise coaching tip
    pub one_thing_to_fix: &'static [(&'static str, &'static str)],

    /// Practice drill per phase
    pub drills: &'static [(&'static str, &'static str)],

    /// Why the conversation sits in this phase
    pub phase_rationale: &'static [(&'static str, &'static str)],
}

fn lookup(table: &[(&str, &'static str)], phase: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == phase).map(|(_, v)| *v)
}

impl PhaseTables {
    pub fn prospect_reply(&self, phase: &str) -> Option<&'static str> {
        lookup(self.prospect_replies, phase)
    }

    pub fn suggested_next(&self, phase: &str) -> Option<&'static str> {
        lookup(self.suggested_next, phase)
    }

    pub fn one_thing_to_fix(&self, phase: &str) -> Option<&'static str> {
        lookup(self.one_thing_to_fix, phase)
    }

    pub fn drill(&self, phase: &str) -> Option<&'static str> {
        lookup(self.drills, phase)
    }

    pub fn rationale(&self, phase: &str) -> Option<&'static str> {
        lookup(self.phase_rationale, phase)
    }
}

/// The built-in coaching voice
pub static DEFAULT_TABLES: PhaseTables = PhaseTables {
    prospect_replies: &[
        (
            "opening",
            "Hi, thanks for reaching out. What's this call about?",
        ),
        (
            "discovery",
            "We're looking to improve follow-ups. Our main pain is losing leads after the demo. What do you typically see?",
        ),
        (
            "pitch",
            "That sounds relevant. Can you walk me through how your solution would help? We're also a bit concerned about price.",
        ),
        (
            "objection",
            "I hear you. Our budget is tight this quarter—what would it take to get something we could start with?",
        ),
        (
            "close",
            "Okay, I'm open to trying it. What's the next step on your side?",
        ),
    ],
    suggested_next: &[
        (
            "opening",
            "Ask what their biggest challenge is right now.",
        ),
        (
            "discovery",
            "Ask: 'What would need to be true for this to become a priority?'",
        ),
        (
            "pitch",
            "Tie one feature to the pain they shared, then ask if that would help.",
        ),
        (
            "objection",
            "Acknowledge the concern, then reframe: 'If we could show X, would that change things?'",
        ),
        (
            "close",
            "Propose one concrete next step: 'Can we schedule a 15-min follow-up next Tuesday?'",
        ),
    ],
    one_thing_to_fix: &[
        (
            "opening",
            "Try leading with one clear value prop before asking a question.",
        ),
        (
            "discovery",
            "Ask one more open question before moving to the pitch.",
        ),
        (
            "pitch",
            "Tie your next sentence directly to something they said.",
        ),
        (
            "objection",
            "Acknowledge their words first ('I hear you') before reframing.",
        ),
        (
            "close",
            "Name the exact next step instead of leaving it vague.",
        ),
    ],
    drills: &[
        (
            "opening",
            "Practice opening with: state your one-sentence value prop, then ask one open question.",
        ),
        (
            "discovery",
            "Drill: Ask 3 discovery questions in a row without pitching. Then rate yourself.",
        ),
        (
            "pitch",
            "Roleplay: After they state a need, reply with only one feature tied to that need.",
        ),
        (
            "objection",
            "Drill: Say 'I hear you' + repeat their concern, then one reframe. Record and replay.",
        ),
        (
            "close",
            "Practice: End your next 3 roleplays with 'So the next step is [concrete action].'",
        ),
    ],
    phase_rationale: &[
        (
            "opening",
            "We're in the opening; prospect is sizing you up.",
        ),
        ("discovery", "Discovery phase; they're sharing context."),
        ("pitch", "Pitch phase; time to tie solution to needs."),
        (
            "objection",
            "They raised an objection; acknowledge then reframe.",
        ),
        ("close", "Closing; lock in a clear next step."),
    ],
};
