//! Question answering over ranked note chunks
//!
//! Composes the answer surface for "ask my notes": source attributions,
//! the notes context block for the model prompt, and the deterministic
//! answer used when no model is configured or the model path fails.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::services::{GenerateOptions, TextGenerator};

use super::RankedChunk;

const SNIPPET_CHARS: usize = 200;
const PREVIEW_CHARS: usize = 300;

/// Attribution line for one matched chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSource {
    pub source_title: String,
    pub snippet: String,
}

/// Longer excerpt shown when no synthesized answer is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPreview {
    pub source_title: String,
    pub content: String,
}

/// Answer plus supporting material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskAnswer {
    pub answer: String,
    pub sources: Vec<NoteSource>,

    /// Present on the deterministic path only; a synthesized answer
    /// stands on its own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_chunks_preview: Option<Vec<ChunkPreview>>,
}

/// Answer with the path taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOutcome {
    pub response: AskAnswer,

    /// True when a model was attempted and failed
    pub used_fallback: bool,
}

fn excerpt(content: &str, limit: usize) -> String {
    let truncated: String = content.chars().take(limit).collect();
    if content.chars().count() > limit {
        format!("{}…", truncated)
    } else {
        truncated
    }
}

/// 200-character source snippets, in rank order
pub fn build_sources(chunks: &[RankedChunk]) -> Vec<NoteSource> {
    chunks
        .iter()
        .map(|c| NoteSource {
            source_title: c.source_title.clone(),
            snippet: excerpt(&c.content, SNIPPET_CHARS),
        })
        .collect()
}

fn build_previews(chunks: &[RankedChunk]) -> Vec<ChunkPreview> {
    chunks
        .iter()
        .map(|c| ChunkPreview {
            source_title: c.source_title.clone(),
            content: excerpt(&c.content, PREVIEW_CHARS),
        })
        .collect()
}

/// Full-content context block for the model prompt
pub fn build_context_block(chunks: &[RankedChunk]) -> String {
    if chunks.is_empty() {
        return "(No relevant notes found.)".to_string();
    }
    chunks
        .iter()
        .map(|c| format!("[{}]\n{}", c.source_title, c.content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Deterministic answer: matched notes with attributions, no synthesis.
pub fn mock_answer(chunks: &[RankedChunk]) -> AskAnswer {
    let answer = if chunks.is_empty() {
        "No notes matched your question. Ingest some notes first."
    } else {
        "AI not configured (showing matched notes). Set OPENAI_API_KEY and ask again to get a synthesized answer."
    };
    AskAnswer {
        answer: answer.to_string(),
        sources: build_sources(chunks),
        matched_chunks_preview: Some(build_previews(chunks)),
    }
}

fn ask_prompt(question: &str, chunks: &[RankedChunk]) -> String {
    format!(
        "You are a sales coach. Answer the user's question using ONLY the following notes. \
         If the notes don't contain enough information, say so briefly. Do not make up details.\n\n\
         Notes:\n{}\n\nQuestion: {}",
        build_context_block(chunks),
        question
    )
}

/// Answer a question over already-ranked chunks, preferring the model.
///
/// Without a model this is [`mock_answer`] and `used_fallback` stays
/// false. Any generation failure degrades to the matched-notes answer
/// with the flag set.
pub async fn answer_question(
    model: Option<&dyn TextGenerator>,
    question: &str,
    chunks: &[RankedChunk],
) -> AskOutcome {
    let model = match model {
        Some(m) => m,
        None => {
            return AskOutcome {
                response: mock_answer(chunks),
                used_fallback: false,
            }
        }
    };

    let options = GenerateOptions::new(500, 0.3);
    match model.generate(&ask_prompt(question, chunks), options).await {
        Ok(answer) => AskOutcome {
            response: AskAnswer {
                answer,
                sources: build_sources(chunks),
                matched_chunks_preview: None,
            },
            used_fallback: false,
        },
        Err(e) => {
            warn!(error = %e, "Notes answer generation failed, returning matched notes");
            AskOutcome {
                response: AskAnswer {
                    answer: "AI is unavailable. Here are your matched notes instead.".to_string(),
                    sources: build_sources(chunks),
                    matched_chunks_preview: Some(build_previews(chunks)),
                },
                used_fallback: true,
            }
        }
    }
}
