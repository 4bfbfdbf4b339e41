//! Notes pipeline tests: chunk, rank, answer
//!
//! Drives the ingestion-to-answer flow the way the CLI does: split a
//! document into chunks, rank them against a question, and produce the
//! matched-notes answer.

use pitchdrill::notes::{answer_question, chunk_text, mock_answer, top_chunks, NoteChunk};

fn chunks_from(text: &str, title: &str) -> Vec<NoteChunk> {
    chunk_text(text)
        .into_iter()
        .enumerate()
        .map(|(i, content)| NoteChunk::new(format!("chunk-{}", i + 1), title, content))
        .collect()
}

fn chunk(id: &str, content: &str) -> NoteChunk {
    NoteChunk::new(id, "Product wiki", content)
}

#[test]
fn chunking_respects_paragraphs_and_ceiling() {
    let doc = format!(
        "{}\n\n{}\n\n{}",
        "a".repeat(1600),
        "b".repeat(1600),
        "c".repeat(1600)
    );
    let chunks = chunk_text(&doc);

    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.chars().count() <= 4000));
    // nothing is lost or reordered
    assert_eq!(chunks.join("\n\n"), doc);
}

#[test]
fn oversized_paragraph_is_kept_whole() {
    let doc = "x".repeat(4500);
    let chunks = chunk_text(&doc);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chars().count(), 4500);
}

#[test]
fn ranking_orders_by_keyword_overlap() {
    let chunks = vec![
        chunk("a", "Our pricing starts at $400 per seat. Pricing scales with volume."),
        chunk("b", "Support is 24/7 with a dedicated CSM."),
        chunk("c", "Security review takes two weeks."),
    ];

    let ranked = top_chunks("What is the pricing?", chunks, 5);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].id, "a");
    assert!(ranked[0].score > ranked[1].score);
}

#[test]
fn limit_truncates_after_ranking() {
    let chunks = vec![
        chunk("a", "pricing pricing pricing"),
        chunk("b", "pricing pricing"),
        chunk("c", "pricing"),
    ];
    let ranked = top_chunks("pricing", chunks, 2);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].id, "a");
    assert_eq!(ranked[1].id, "b");
}

#[test]
fn mock_answer_previews_matched_notes() {
    let ranked = top_chunks("pricing", vec![chunk("a", "Pricing is usage based.")], 5);
    let answer = mock_answer(&ranked);

    assert!(answer.answer.contains("AI not configured"));
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].source_title, "Product wiki");
    assert!(answer.matched_chunks_preview.is_some());
}

#[test]
fn mock_answer_with_no_notes_asks_for_ingestion() {
    let answer = mock_answer(&[]);
    assert!(answer.answer.starts_with("No notes matched"));
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn ask_without_model_returns_matched_notes() {
    let ranked = top_chunks("pricing", vec![chunk("a", "Pricing is usage based.")], 5);
    let outcome = answer_question(None, "pricing", &ranked).await;

    assert!(!outcome.used_fallback);
    assert_eq!(outcome.response, mock_answer(&ranked));
}

#[tokio::test]
async fn pipeline_handles_multi_chunk_documents() {
    let mut doc = String::new();
    for i in 0..80 {
        doc.push_str(&format!(
            "Paragraph {} talks about onboarding flows and setup time.\n\n",
            i
        ));
    }
    doc.push_str("Pricing: the enterprise tier is $2k monthly.");

    let chunks = chunks_from(&doc, "Playbook notes");
    assert!(chunks.len() > 1);

    let ranked = top_chunks("enterprise pricing tier", chunks, 5);
    assert!(ranked[0].content.contains("enterprise tier"));

    let outcome = answer_question(None, "enterprise pricing tier", &ranked).await;
    assert!(outcome.response.answer.contains("AI not configured"));
    assert_eq!(outcome.response.sources[0].source_title, "Playbook notes");
}
