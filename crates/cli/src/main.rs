//! Sift CLI - corpus quality-signal batch harness.
//!
//! Classifies input files by extension, evaluates each one against the
//! registered signal set, and prints one serialized verdict per line.

mod classify;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sift_core::{Applicability, Document, EngineConfig, Enforcement};
use sift_engine::{Engine, SignalRegistry};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Corpus quality-signal evaluation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate files and print one verdict per line
    Eval {
        /// Input files
        paths: Vec<PathBuf>,
        /// Default per-signal timeout in seconds
        #[arg(long, default_value = "10")]
        timeout: f64,
        /// Error-text truncation budget in characters
        #[arg(long, default_value = "10000")]
        error_budget: usize,
        /// Timeout enforcement strategy (preemptive or watchdog)
        #[arg(long)]
        enforcement: Option<Enforcement>,
        /// Parallel workers, each owning its own engine instance
        #[arg(long, default_value = "1")]
        jobs: usize,
    },
    /// List registered signals and their applicability
    Signals,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            paths,
            timeout,
            error_budget,
            enforcement,
            jobs,
        } => eval(paths, timeout, error_budget, enforcement, jobs).await,
        Commands::Signals => {
            list_signals();
            Ok(())
        }
    }
}

async fn eval(
    paths: Vec<PathBuf>,
    timeout: f64,
    error_budget: usize,
    enforcement: Option<Enforcement>,
    jobs: usize,
) -> Result<()> {
    anyhow::ensure!(!paths.is_empty(), "no input files");
    anyhow::ensure!(
        timeout.is_finite() && timeout > 0.0 && timeout <= 86_400.0,
        "timeout must be a positive number of seconds (at most one day)"
    );

    let mut config = EngineConfig::default();
    config.default_deadline = Duration::from_secs_f64(timeout);
    config.error_budget = error_budget;
    if let Some(enforcement) = enforcement {
        config.enforcement = enforcement;
    }

    let registry = Arc::new(SignalRegistry::new(sift_signals::builtin_signals()));
    let jobs = jobs.max(1).min(paths.len());
    tracing::info!(files = paths.len(), jobs, "evaluating");

    let indexed: Vec<(usize, PathBuf)> = paths.into_iter().enumerate().collect();
    let chunk_size = indexed.len().div_ceil(jobs);

    // One engine per worker: parser instances are not safe for
    // concurrent use, so engines are never shared across threads.
    let mut tasks = tokio::task::JoinSet::new();
    for chunk in indexed.chunks(chunk_size) {
        let chunk = chunk.to_vec();
        let registry = Arc::clone(&registry);
        let config = config.clone();
        tasks.spawn_blocking(move || evaluate_chunk(registry, config, chunk));
    }

    let mut lines: Vec<Option<String>> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        for (index, line) in joined?? {
            if lines.len() <= index {
                lines.resize(index + 1, None);
            }
            lines[index] = Some(line);
        }
    }

    for line in lines.into_iter().flatten() {
        println!("{line}");
    }
    Ok(())
}

fn evaluate_chunk(
    registry: Arc<SignalRegistry>,
    config: EngineConfig,
    chunk: Vec<(usize, PathBuf)>,
) -> Result<Vec<(usize, String)>> {
    let mut engine = Engine::new(registry, config)?;
    let mut out = Vec::with_capacity(chunk.len());

    for (index, path) in chunk {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (doc_type, program_lang) = classify::classify_extension(&extension);

        let size_in_bytes = content.len() as u64;
        let doc = Document::new(
            content,
            filename,
            "unknown",
            extension,
            size_in_bytes,
            program_lang,
            doc_type,
        );
        out.push((index, engine.evaluate(doc)));
    }
    Ok(out)
}

fn list_signals() {
    for signal in sift_signals::builtin_signals() {
        let applicability = match signal.applicability() {
            Applicability::Code => "code".to_string(),
            Applicability::Text => "text".to_string(),
            Applicability::Language(lang) => format!("code/{lang}"),
        };
        println!("{:40} {applicability}", signal.name());
    }
}
