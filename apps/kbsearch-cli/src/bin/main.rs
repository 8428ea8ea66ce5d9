use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kbsearch_core::config::Config;
use kbsearch_core::extract::collect_files;
use kbsearch_core::schema::{IngestRequest, QueryRequest, QueryResponse, SourceOutcome};
use kbsearch_embed::get_default_embedder;
use kbsearch_store::KnowledgeBase;

#[derive(Parser)]
#[command(name = "kbsearch", about = "Semantic search over local documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest files, then answer one question
    Ask {
        /// Files or directories to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(short, long)]
        question: String,
        /// Number of passages to retrieve (config default when unset)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ingest files, then answer questions read from stdin
    Shell {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
}

/// Directories become their supported files; anything else is passed through
/// so a missing path shows up as a failed source.
fn expand_inputs(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .flat_map(|p| if p.is_dir() { collect_files(p) } else { vec![p.clone()] })
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

fn ingest(kb: &KnowledgeBase, paths: &[PathBuf]) -> anyhow::Result<()> {
    let file_paths = expand_inputs(paths);
    if file_paths.is_empty() {
        let shown: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        anyhow::bail!("no ingestible files under {}", shown.join(", "));
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Embedding {} files...", file_paths.len()));
    let resp = kb.ingest(&IngestRequest { file_paths });
    pb.finish_and_clear();
    let resp = resp?;

    for report in &resp.sources {
        match &report.outcome {
            SourceOutcome::Chunked { chunks } => println!("  ✅ {} ({} chunks)", report.source, chunks),
            SourceOutcome::Failed { reason } => println!("  ⚠️  {}: {}", report.source, reason),
        }
    }
    let failed = resp.failed().count();
    if failed > 0 {
        println!("📊 Indexed {} chunks ({} of {} sources failed)", resp.ingested_documents, failed, resp.sources.len());
    } else {
        println!("📊 Indexed {} chunks", resp.ingested_documents);
    }
    Ok(())
}

fn print_answer(resp: &QueryResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resp)?);
        return Ok(());
    }
    println!("{}", resp.answer);
    if !resp.sources.is_empty() {
        println!("\nSources:");
        for (i, source) in resp.sources.iter().enumerate() {
            println!("  {}. {}", i + 1, source);
        }
    }
    Ok(())
}

fn shell(kb: &KnowledgeBase, top_k: Option<usize>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        let resp = kb.query(&QueryRequest { question: question.to_string(), top_k })?;
        print_answer(&resp, false)?;
        println!();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Config::load()?.settings()?;
    let embedder = Arc::from(get_default_embedder(&settings.embedding)?);
    let kb = KnowledgeBase::from_settings(embedder, &settings)?;
    info!(index = %kb.health().index, "knowledge base ready");

    match cli.command {
        Commands::Ask { paths, question, top_k, json } => {
            ingest(&kb, &paths)?;
            let resp = kb.query(&QueryRequest { question, top_k })?;
            print_answer(&resp, json)
        }
        Commands::Shell { paths, top_k } => {
            ingest(&kb, &paths)?;
            shell(&kb, top_k)
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).map_err(|e| {
        eprintln!("Error: {e:#}");
        e
    })
}
