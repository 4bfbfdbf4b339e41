//! Pitchdrill - Deterministic Sales-Practice Coaching Engine
//!
//! A rule-first coaching core for sales practice sessions that provides:
//! - Five-phase transcript scoring from fixed keyword heuristics
//! - Frame / Leverage / Precision conversation-leak diagnostics
//! - Scripted roleplay coaching turns grounded in playbooks and notes
//! - Paragraph-preserving notes chunking with keyword-overlap ranking
//! - Optional model-backed paths that degrade to the rule engine
//!
//! # Architecture
//!
//! The crate is organized into a deterministic core and a thin AI edge:
//! - **Types**: Phases, scores, chat turns (Phase, PhaseScores, ChatTurn)
//! - **Evaluator**: Transcript scoring and the leak diagnostic
//! - **Coach**: Scripted roleplay turns over phase tables and playbooks
//! - **Notes**: Chunking, ranking, and question answering
//! - **Services**: The OpenAI text-generation client behind a trait
//!
//! Every function outside `services` is pure and total: the same input
//! always produces the same output, and no input produces an error.
//!
//! # Example
//!
//! ```ignore
//! use pitchdrill::evaluate_transcript;
//!
//! let evaluation = evaluate_transcript(
//!     "Seller: Hi, thanks for taking the time today.\n\
//!      Prospect: Sure, what's this about?\n\
//!      Seller: What challenges are you seeing with onboarding?",
//! );
//!
//! println!("overall: {}", evaluation.overall);
//! for action in &evaluation.actions {
//!     println!("- {}", action);
//! }
//! ```

pub mod coach;
pub mod error;
pub mod evaluator;
pub mod insights;
pub mod lexicon;
pub mod notes;
pub mod playbooks;
pub mod record;
pub mod scenarios;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use coach::{coach_turn, CoachOutcome, CoachRequest, CoachTurn};
pub use error::{PitchdrillError, Result};
pub use evaluator::{
    evaluate_transcript, rate_transcript, Evaluation, LeakDiagnostic, LeakKind, RatingOutcome,
};
pub use insights::{summarize_history, InsightsSummary, RatedSession};
pub use notes::{answer_question, chunk_text, top_chunks, AskOutcome, NoteChunk, RankedChunk};
pub use playbooks::{Playbook, PlaybookKind, PlaybookLibrary};
pub use record::{FeedbackId, FeedbackRecord};
pub use services::{GenerateOptions, LlmConfig, OpenAiGenerator, TextGenerator};
pub use types::{ChatRole, ChatTurn, Phase, PhaseScores};
