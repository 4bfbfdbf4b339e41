//! Pitchdrill - Deterministic Sales-Practice Coaching Engine
//!
//! This is the main entry point for the pitchdrill CLI, which rates
//! practice transcripts, chunks and queries prep notes, and produces
//! roleplay coaching turns. Results print as JSON on stdout; logs go to
//! stderr.

use clap::{Parser, Subcommand};
use pitchdrill::{
    coach::{coach_notes_query, coach_turn, CoachRequest, DEFAULT_TABLES},
    evaluator::rate_transcript,
    insights::{summarize_history, RatedSession},
    notes::{answer_question, chunk_text, top_chunks, NoteChunk},
    playbooks::{parse_bulk_playbooks, Playbook, PlaybookLibrary},
    scenarios::{default_phase_sequence, default_playbooks, default_presets},
    services::{OpenAiGenerator, TextGenerator},
    FeedbackRecord,
};
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pitchdrill")]
#[command(about = "Deterministic sales-practice coaching engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate a practice transcript
    Rate {
        /// Transcript file (reads stdin if not specified)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Score with the model, falling back to the rule engine
        #[arg(long)]
        ai: bool,
    },

    /// Split a notes file into storage-sized chunks
    Chunk {
        /// Notes file (reads stdin if not specified)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Source title attached to the chunks
        #[arg(short, long, default_value = "Untitled notes")]
        title: String,
    },

    /// Answer a question from a notes file
    Ask {
        /// The question to answer
        question: String,

        /// Notes file (reads stdin if not specified)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Source title attached to the notes
        #[arg(short, long, default_value = "Untitled notes")]
        title: String,

        /// How many matched chunks to answer from
        #[arg(long, default_value = "5")]
        top: usize,

        /// Answer with the model, falling back to the matched notes
        #[arg(long)]
        ai: bool,
    },

    /// Produce one roleplay coaching turn
    Coach {
        /// The seller's message
        message: String,

        /// Current phase (opening, discovery, pitch, objection, close)
        #[arg(short, long)]
        phase: Option<String>,

        /// Comma-separated phase sequence (defaults to the standard five)
        #[arg(long)]
        phases: Option<String>,

        /// Playbook file; headings named after a kind (opening, discovery,
        /// objection, close) sort their bullets into that playbook
        #[arg(long)]
        playbooks: Option<PathBuf>,

        /// Notes file to ground the turn in
        #[arg(long)]
        notes: Option<PathBuf>,

        /// Scenario title, used when matching notes
        #[arg(long)]
        scenario: Option<String>,

        /// Coach with the model, falling back to the scripted coach
        #[arg(long)]
        ai: bool,
    },

    /// Aggregate rated-session history into the progress view
    Insights {
        /// JSON file holding rated sessions, most recent first
        /// (reads stdin if not specified)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List the built-in practice scenarios
    Scenarios,
}

/// How many matched note chunks ground a coaching turn
const COACH_NOTE_CHUNKS: usize = 3;

/// Read a file, or stdin when no path was given
fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Build the model client when `--ai` was given and a key is configured.
///
/// A missing key is not an error: the command runs the deterministic
/// path instead, exactly as if `--ai` had been omitted.
fn make_generator(ai: bool) -> Option<OpenAiGenerator> {
    if !ai {
        return None;
    }
    match OpenAiGenerator::from_env() {
        Ok(generator) => Some(generator),
        Err(e) => {
            warn!(error = %e, "Model client unavailable, using the deterministic path");
            None
        }
    }
}

fn model_ref(generator: &Option<OpenAiGenerator>) -> Option<&dyn TextGenerator> {
    generator.as_ref().map(|g| g as &dyn TextGenerator)
}

/// Chunk a notes document the way ingestion would store it
fn note_chunks(text: &str, title: &str) -> Vec<NoteChunk> {
    chunk_text(text)
        .into_iter()
        .enumerate()
        .map(|(i, content)| NoteChunk::new(format!("chunk-{}", i + 1), title, content))
        .collect()
}

fn print_json(payload: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

async fn run_rate(file: Option<PathBuf>, ai: bool) -> anyhow::Result<()> {
    let transcript = read_input(file.as_deref())?;
    let model = make_generator(ai);
    let outcome = rate_transcript(model_ref(&model), &transcript).await;

    let record = FeedbackRecord::from_evaluation(&outcome.evaluation)?;
    let mut payload = json!({
        "feedback_id": record.id,
        "created_at": record.created_at,
        "result": outcome.evaluation,
    });
    if outcome.used_fallback {
        payload["used_fallback"] = Value::Bool(true);
    }
    print_json(&payload)
}

fn run_chunk(file: Option<PathBuf>, title: String) -> anyhow::Result<()> {
    let text = read_input(file.as_deref())?;
    let chunks = chunk_text(&text);
    debug!(count = chunks.len(), "Chunked notes document");

    let payload = json!({
        "source_title": title,
        "count": chunks.len(),
        "chunks": chunks
            .iter()
            .map(|content| json!({
                "chars": content.chars().count(),
                "content": content,
            }))
            .collect::<Vec<_>>(),
    });
    print_json(&payload)
}

async fn run_ask(
    question: String,
    file: Option<PathBuf>,
    title: String,
    top: usize,
    ai: bool,
) -> anyhow::Result<()> {
    let text = read_input(file.as_deref())?;
    let ranked = top_chunks(&question, note_chunks(&text, &title), top);
    debug!(matched = ranked.len(), "Matched note chunks");

    let model = make_generator(ai);
    let outcome = answer_question(model_ref(&model), &question, &ranked).await;

    let mut payload = serde_json::to_value(&outcome.response)?;
    if outcome.used_fallback {
        payload["used_fallback"] = Value::Bool(true);
    }
    print_json(&payload)
}

async fn run_coach(
    message: String,
    phase: Option<String>,
    phases: Option<String>,
    playbooks: Option<PathBuf>,
    notes: Option<PathBuf>,
    scenario: Option<String>,
    ai: bool,
) -> anyhow::Result<()> {
    let phases: Vec<String> = match phases {
        Some(csv) => {
            let parsed: Vec<String> = csv
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if parsed.is_empty() {
                default_phase_sequence()
            } else {
                parsed
            }
        }
        None => default_phase_sequence(),
    };

    let library = match playbooks {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let imported: Vec<Playbook> = parse_bulk_playbooks(&text)
                .into_iter()
                .map(|p| {
                    let kind_hint = p.title.clone();
                    Playbook::from_raw(p.title, &kind_hint, p.content)
                })
                .collect();
            debug!(count = imported.len(), "Imported playbooks");
            PlaybookLibrary::from_playbooks(&imported)
        }
        None => PlaybookLibrary::from_playbooks(&default_playbooks()),
    };

    let notes_chunks = match notes {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let query = coach_notes_query(scenario.as_deref(), phase.as_deref(), &message);
            top_chunks(
                &query,
                note_chunks(&text, scenario.as_deref().unwrap_or("Untitled notes")),
                COACH_NOTE_CHUNKS,
            )
        }
        None => Vec::new(),
    };

    let request = CoachRequest {
        current_phase: phase,
        phases,
        playbooks: library,
        user_message: message,
        history: Vec::new(),
        notes_chunks,
    };

    let model = make_generator(ai);
    let outcome = coach_turn(model_ref(&model), &DEFAULT_TABLES, &request).await;

    let mut payload = serde_json::to_value(&outcome.turn)?;
    if outcome.used_fallback {
        payload["used_fallback"] = Value::Bool(true);
    }
    print_json(&payload)
}

fn run_insights(file: Option<PathBuf>) -> anyhow::Result<()> {
    let text = read_input(file.as_deref())?;
    let entries: Vec<RatedSession> = serde_json::from_str(&text)?;
    let summary = summarize_history(&entries);
    print_json(&serde_json::to_value(&summary)?)
}

fn run_scenarios() -> anyhow::Result<()> {
    print_json(&json!({ "scenarios": default_presets() }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!("pitchdrill={}", level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Pitchdrill v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Rate { file, ai } => run_rate(file, ai).await,
        Commands::Chunk { file, title } => run_chunk(file, title),
        Commands::Ask {
            question,
            file,
            title,
            top,
            ai,
        } => run_ask(question, file, title, top, ai).await,
        Commands::Coach {
            message,
            phase,
            phases,
            playbooks,
            notes,
            scenario,
            ai,
        } => run_coach(message, phase, phases, playbooks, notes, scenario, ai).await,
        Commands::Insights { file } => run_insights(file),
        Commands::Scenarios => run_scenarios(),
    }
}
