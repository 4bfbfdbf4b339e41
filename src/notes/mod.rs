//! Notes retrieval without an index
//!
//! RAG-lite over pasted sales notes: split text into paragraph-preserving
//! chunks at ingestion, then rank chunks against a question by keyword
//! overlap at query time. No embeddings, no persistent index, no
//! stemming. Ranking is a pure function of the query and the chunk set,
//! so results are reproducible.

pub mod ask;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use ask::{
    answer_question, build_context_block, build_sources, mock_answer, AskAnswer, AskOutcome,
    ChunkPreview, NoteSource,
};

/// Soft chunk size; a chunk closes once it reaches this many characters
const TARGET_CHUNK_CHARS: usize = 3000;

/// Hard ceiling; a paragraph that would push past this starts a new chunk
const MAX_CHUNK_CHARS: usize = 4000;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// One stored chunk of a notes document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteChunk {
    pub id: String,
    pub source_title: String,
    pub content: String,
}

impl NoteChunk {
    pub fn new(
        id: impl Into<String>,
        source_title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_title: source_title.into(),
            content: content.into(),
        }
    }
}

/// A chunk with its keyword-overlap score for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedChunk {
    pub id: String,
    pub source_title: String,
    pub content: String,
    pub score: u32,
}

/// Split text into roughly 3k-character chunks, preserving paragraphs.
///
/// Paragraphs (blank-line separated) are never split: a chunk grows until
/// it reaches the target size, and a paragraph that would overflow the
/// 4k ceiling starts the next chunk instead. A single paragraph larger
/// than the ceiling is emitted on its own. Empty input yields no chunks.
pub fn chunk_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let paragraphs: Vec<&str> = PARAGRAPH_BREAK
        .split(trimmed)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        return vec![trimmed.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_length = 0usize;

    for p in paragraphs {
        // +2 accounts for the blank-line join
        let p_len = p.chars().count() + 2;
        if current_length + p_len > MAX_CHUNK_CHARS && !current.is_empty() {
            chunks.push(current.join("\n\n"));
            current = vec![p];
            current_length = p_len;
        } else if current_length + p_len >= TARGET_CHUNK_CHARS && !current.is_empty() {
            current.push(p);
            chunks.push(current.join("\n\n"));
            current = Vec::new();
            current_length = 0;
        } else {
            current.push(p);
            current_length += p_len;
        }
    }
    if !current.is_empty() {
        chunks.push(current.join("\n\n"));
    }

    chunks
}

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Extract query terms: lowercased word tokens longer than one character.
fn query_terms(question: &str) -> Vec<String> {
    let lowered = question.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Rank chunks by term frequency of the question's terms.
///
/// Every chunk is returned. Scores are summed substring occurrence counts
/// over the lowercased content; the sort is stable and descending, so
/// equal scores keep input order. A query with no usable terms scores
/// everything 0 and preserves input order outright.
pub fn rank_chunks(question: &str, chunks: Vec<NoteChunk>) -> Vec<RankedChunk> {
    let terms = query_terms(question);

    let mut ranked: Vec<RankedChunk> = chunks
        .into_iter()
        .map(|chunk| {
            let score = if terms.is_empty() {
                0
            } else {
                let lower = chunk.content.to_lowercase();
                terms
                    .iter()
                    .map(|t| lower.matches(t.as_str()).count() as u32)
                    .sum()
            };
            RankedChunk {
                id: chunk.id,
                source_title: chunk.source_title,
                content: chunk.content,
                score,
            }
        })
        .collect();

    if !terms.is_empty() {
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
    }
    ranked
}

/// Rank and keep the best `limit` chunks for a question.
pub fn top_chunks(question: &str, chunks: Vec<NoteChunk>, limit: usize) -> Vec<RankedChunk> {
    let mut ranked = rank_chunks(question, chunks);
    ranked.truncate(limit);
    ranked
}
