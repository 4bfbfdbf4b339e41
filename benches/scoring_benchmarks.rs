//! Performance benchmarks for the deterministic coaching core
//!
//! Targets:
//! - Transcript evaluation: <1ms for a typical call transcript
//! - Leak diagnostic: <1ms for a typical call transcript
//! - Chunking: <10ms for a 100KB notes document
//! - Ranking: <5ms for 200 chunks
//! - Mock coach turn: <1ms per turn

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pitchdrill::coach::{mock_coach_turn, CoachRequest, DEFAULT_TABLES};
use pitchdrill::evaluate_transcript;
use pitchdrill::evaluator::build_leak_diagnostic;
use pitchdrill::notes::{chunk_text, rank_chunks, top_chunks, NoteChunk};
use pitchdrill::playbooks::PlaybookLibrary;
use pitchdrill::scenarios::{default_phase_sequence, default_playbooks};

/// Build a transcript of alternating seller and prospect turns
fn build_transcript(turns: usize) -> String {
    let seller_lines = [
        "Seller: Hi, thanks for taking the time today. What's top of mind for you?",
        "Seller: How does your team handle follow-up today, and what does that cost you?",
        "Seller: That's exactly the workflow we shorten. Most teams see results in two weeks.",
        "Seller: I hear the budget concern. What are you comparing the price against?",
        "Seller: Let's schedule a follow-up on Tuesday so we can agree on next steps.",
    ];
    let prospect_lines = [
        "Prospect: We're swamped, so keep it short.",
        "Prospect: Mostly spreadsheets, and it definitely costs us deals.",
        "Prospect: Interesting, though I'm not sure it fits the budget.",
        "Prospect: Mainly against doing nothing, honestly.",
        "Prospect: Tuesday could work.",
    ];

    let mut lines = Vec::with_capacity(turns);
    for i in 0..turns {
        if i % 2 == 0 {
            lines.push(seller_lines[(i / 2) % seller_lines.len()]);
        } else {
            lines.push(prospect_lines[(i / 2) % prospect_lines.len()]);
        }
    }
    lines.join("\n")
}

/// Build a notes document with the given number of paragraphs
fn build_notes(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "Paragraph {i} covers pricing tiers, discovery questions, and objection \
                 handling for enterprise deals. {}",
                "Anchor on annual value before discussing discounts. ".repeat(4)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build a chunk set for ranking
fn build_chunks(count: usize) -> Vec<NoteChunk> {
    (0..count)
        .map(|i| {
            NoteChunk::new(
                format!("chunk-{i}"),
                "Enterprise playbook",
                format!(
                    "Chunk {i}: pricing follows usage bands, and objections about budget \
                     are answered by anchoring on annual value."
                ),
            )
        })
        .collect()
}

/// Build a coaching request with playbooks and note context
fn build_coach_request() -> CoachRequest {
    CoachRequest {
        current_phase: Some("objection".to_string()),
        phases: default_phase_sequence(),
        playbooks: PlaybookLibrary::from_playbooks(&default_playbooks()),
        user_message: "It sounds expensive compared to what we pay today.".to_string(),
        history: Vec::new(),
        notes_chunks: top_chunks("pricing objection", build_chunks(6), 3),
    }
}

/// Benchmark 1: Transcript Evaluation
fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("transcript_evaluation");

    for turns in [4, 20, 60].iter() {
        let transcript = build_transcript(*turns);
        group.throughput(Throughput::Elements(*turns as u64));

        group.bench_with_input(
            BenchmarkId::new("evaluate", turns),
            &transcript,
            |b, transcript| {
                b.iter(|| {
                    let evaluation = evaluate_transcript(black_box(transcript));
                    black_box(evaluation);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark 2: Leak Diagnostic
fn bench_leak_diagnostic(c: &mut Criterion) {
    let mut group = c.benchmark_group("leak_diagnostic");
    group.throughput(Throughput::Elements(1));

    let transcript = build_transcript(20);
    group.bench_function("diagnose", |b| {
        b.iter(|| {
            let diagnostic = build_leak_diagnostic(black_box(&transcript));
            black_box(diagnostic);
        });
    });

    group.finish();
}

/// Benchmark 3: Notes Chunking
fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("notes_chunking");

    for paragraphs in [10, 100, 400].iter() {
        let notes = build_notes(*paragraphs);
        group.throughput(Throughput::Elements(*paragraphs as u64));

        group.bench_with_input(
            BenchmarkId::new("chunk_text", paragraphs),
            &notes,
            |b, notes| {
                b.iter(|| {
                    let chunks = chunk_text(black_box(notes));
                    black_box(chunks);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark 4: Chunk Ranking
fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_ranking");

    for num_chunks in [10, 50, 200].iter() {
        let chunks = build_chunks(*num_chunks);
        group.throughput(Throughput::Elements(*num_chunks as u64));

        group.bench_with_input(
            BenchmarkId::new("rank_chunks", num_chunks),
            &chunks,
            |b, chunks| {
                b.iter_batched(
                    || chunks.clone(),
                    |chunks| {
                        let ranked =
                            rank_chunks(black_box("pricing objections annual value"), chunks);
                        black_box(ranked);
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark 5: Mock Coach Turn
fn bench_coach_turn(c: &mut Criterion) {
    let mut group = c.benchmark_group("coach_turn");
    group.throughput(Throughput::Elements(1));

    let request = build_coach_request();
    group.bench_function("mock_turn", |b| {
        b.iter(|| {
            let turn = mock_coach_turn(&DEFAULT_TABLES, black_box(&request));
            black_box(turn);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluation,
    bench_leak_diagnostic,
    bench_chunking,
    bench_ranking,
    bench_coach_turn,
);

criterion_main!(benches);
