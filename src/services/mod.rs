//! Services layer for the pitchdrill coaching engine
//!
//! Provides the text-generation capability used by the AI-backed rating,
//! coaching, and notes Q&A paths. Everything else in the crate is
//! deterministic and never touches this layer.

pub mod llm;

pub use llm::{GenerateOptions, LlmConfig, OpenAiGenerator, TextGenerator};

#[cfg(test)]
pub use llm::MockTextGenerator;
