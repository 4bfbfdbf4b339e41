//! End-to-end rating flow tests
//!
//! Covers the full path a practice session takes: deterministic
//! evaluation, persistence round-trip through the row shape, and
//! history aggregation into the progress view.

use pitchdrill::{
    evaluate_transcript, rate_transcript, summarize_history, FeedbackRecord, LeakKind,
    RatedSession,
};

const DEMO_TRANSCRIPT: &str = "\
Seller: Hi, thanks for taking the time today.
Prospect: Sure.
Seller: Tell me, what's your current process? How do you handle renewals? Why now?
Prospect: We struggle with pricing. It feels expensive and over budget.
Seller: I hear you. Let's schedule a follow up meeting next week to walk through cost options. I'll send a calendar invite. So the next step is a 15 min call Tuesday. Does that work?";

fn session(id: &str, transcript: &str) -> RatedSession {
    let record = FeedbackRecord::from_evaluation(&evaluate_transcript(transcript)).unwrap();
    RatedSession {
        session_id: id.to_string(),
        session_type: "transcript".to_string(),
        scenario_title: Some("Cold outreach".to_string()),
        created_at: record.created_at,
        record,
    }
}

#[test]
fn realistic_conversation_scores_and_diagnoses() {
    let evaluation = evaluate_transcript(DEMO_TRANSCRIPT);

    assert_eq!(evaluation.scores.opening, 55);
    assert_eq!(evaluation.scores.discovery, 76);
    assert_eq!(evaluation.scores.pitch, 51);
    assert_eq!(evaluation.scores.objection, 100);
    assert_eq!(evaluation.scores.close, 100);
    assert_eq!(evaluation.overall, 76);

    // clean transcript: nothing leaks
    assert_eq!(evaluation.leak.primary, None);
    assert!(evaluation.leak.evidence.is_empty());
    assert!(!evaluation.actions.is_empty());
}

#[test]
fn record_round_trip_preserves_feedback() {
    let evaluation = evaluate_transcript(DEMO_TRANSCRIPT);
    let record = FeedbackRecord::from_evaluation(&evaluation).unwrap();

    // scores travel as a JSON blob and decode to the same evaluation
    assert!(record.scores.contains("\"objection\":100"));
    assert_eq!(record.decode().unwrap(), evaluation);
}

#[tokio::test]
async fn rating_without_model_is_the_rule_path() {
    let outcome = rate_transcript(None, DEMO_TRANSCRIPT).await;
    assert!(!outcome.used_fallback);
    assert_eq!(outcome.evaluation, evaluate_transcript(DEMO_TRANSCRIPT));
}

#[test]
fn history_aggregates_into_progress_view() {
    let sessions = vec![
        session("s1", DEMO_TRANSCRIPT),
        session("s2", ""),
        session("s3", ""),
    ];

    let summary = summarize_history(&sessions);

    // overalls 76, 39, 39
    assert_eq!(summary.average_overall_score, 51);
    assert_eq!(summary.last_five_sessions.len(), 3);
    assert_eq!(summary.last_five_sessions[0].session_id, "s1");
    assert_eq!(summary.last_five_sessions[0].overall_score, 76);

    // the opening was weak in all three sessions
    assert_eq!(
        summary.top_weaknesses_with_count[0].weakness,
        "Need more in opening: develop this phase."
    );
    assert_eq!(summary.top_weaknesses_with_count[0].count, 3);

    // empty transcripts trip the leverage rule
    let empty_leak = evaluate_transcript("").leak;
    assert_eq!(empty_leak.primary, Some(LeakKind::Leverage));
    assert_eq!(summary.top_primary_leaks[0].leak, "Leverage");
    assert_eq!(summary.top_primary_leaks[0].count, 2);
    assert_eq!(summary.top_secondary_leaks[0].leak, "Precision");
}

#[test]
fn history_file_format_round_trips() {
    use std::io::Write;

    let sessions = vec![session("s1", DEMO_TRANSCRIPT), session("s2", "")];

    // the insights subcommand consumes exactly this file shape
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string_pretty(&sessions).unwrap()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let decoded: Vec<RatedSession> = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, sessions);

    let summary = summarize_history(&decoded);
    assert_eq!(summary.last_five_sessions.len(), 2);
    assert_eq!(summary.last_five_sessions[0].overall_score, 76);
}
