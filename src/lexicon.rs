//! Keyword lexicon for the rule-based transcript evaluator
//!
//! These lists drive both the per-phase scoring and the leak diagnostic.
//! Matching is case-insensitive substring containment against the
//! lowercased transcript; each list entry counts at most once toward a
//! phase score, while soft-language hits are counted per occurrence.

/// Pricing and affordability language signaling a live objection
pub const OBJECTION_WORDS: &[&str] = &[
    "price", "expensive", "budget", "cost", "too much", "cheaper", "discount", "afford",
];

/// Commitment and scheduling language signaling a proposed next step
pub const NEXT_STEP_WORDS: &[&str] = &[
    "next step",
    "follow up",
    "schedule",
    "calendar",
    "send",
    "meeting",
    "call back",
    "let's do",
];

/// Greeting language opening a call
pub const OPENING_WORDS: &[&str] = &[
    "hi",
    "hello",
    "thanks for",
    "good morning",
    "good afternoon",
    "hey",
];

/// Question stems signaling discovery work
pub const DISCOVERY_WORDS: &[&str] = &[
    "tell me", "what's", "how do", "why", "when", "which", "who", "where",
];

/// Hedging language that weakens the seller's frame
pub const SOFT_WORDS: &[&str] = &["maybe", "just", "i think", "sort of", "kind of"];

/// Concrete scheduling anchors that make a next step time-bound
pub const TIME_BOUND_PHRASES: &[&str] = &[
    "next week",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "monday",
    "15 min",
    "tomorrow",
    "this week",
    "next month",
];

/// Count how many distinct list entries occur in `haystack`.
///
/// `haystack` must already be lowercased; entries are matched by substring
/// containment and each entry contributes at most 1.
pub fn distinct_hits(haystack: &str, words: &[&str]) -> u32 {
    words.iter().filter(|w| haystack.contains(**w)).count() as u32
}

/// Total non-overlapping occurrences of every list entry in `haystack`.
/// Used for soft-language counting where repeats matter.
pub fn total_hits(haystack: &str, words: &[&str]) -> u32 {
    words
        .iter()
        .map(|w| haystack.matches(*w).count() as u32)
        .sum()
}
