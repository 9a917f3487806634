//! # FAQ Desk CLI (`faqdesk`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `faqdesk serve` | Ingest the FAQ page and start the chat API |
//! | `faqdesk inspect` | Fetch and chunk the page, print stats, no embedding |
//! | `faqdesk ask "<question>"` | One-shot question against a fresh index |
//!
//! All commands accept `--config` pointing to a TOML configuration
//! file; see `config/faqdesk.example.toml`.

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use faqdesk::chunk::split_text;
use faqdesk::config::{load_config, Config};
use faqdesk::embedding::OpenAiEmbedder;
use faqdesk::fetch::{extract_text, fetch_document};
use faqdesk::generate::{answer_question, OpenAiGenerator};
use faqdesk::history::ConversationLog;
use faqdesk::ingest::build_index;
use faqdesk::scope::is_in_scope;
use faqdesk::server::{run_server, AppState};
use faqdesk::suggest::suggest_questions;

/// FAQ Desk — a conversational FAQ assistant with retrieval-scoped
/// answers and follow-up suggestions.
#[derive(Parser)]
#[command(
    name = "faqdesk",
    about = "FAQ Desk — a conversational FAQ assistant with retrieval-scoped answers",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/faqdesk.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the configured FAQ page and serve the chat API.
    Serve,

    /// Fetch and chunk the page without embedding; print stats.
    ///
    /// Useful for checking the source URL and chunking settings before
    /// spending embedding calls.
    Inspect,

    /// Ask a single question against a freshly built index and exit.
    Ask {
        /// The question to ask.
        question: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faqdesk=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve => cmd_serve(config).await,
        Commands::Inspect => cmd_inspect(config).await,
        Commands::Ask { question } => cmd_ask(config, &question).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Build the index, then serve. Ingestion failure is fatal: the server
/// never binds with an empty index.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    let embedder = Arc::new(OpenAiEmbedder::new(&config.embedding)?);
    let generator = Arc::new(OpenAiGenerator::new(&config.generation)?);

    let index = build_index(&config, embedder.as_ref()).await?;
    let log = Arc::new(ConversationLog::new(&config.generation.greeting));

    let state = AppState {
        config: Arc::new(config),
        index: Arc::new(index),
        embedder,
        generator,
        log,
    };

    run_server(state).await
}

async fn cmd_inspect(config: Config) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.source.timeout_secs))
        .build()?;

    let html = fetch_document(&client, &config.source.url).await?;
    let text = extract_text(&html);
    let chunks = split_text(
        &text,
        config.chunking.max_chars,
        config.chunking.overlap_chars,
    );

    println!("source url       : {}", config.source.url);
    println!("extracted chars  : {}", text.len());
    println!("chunks           : {}", chunks.len());
    if let Some(first) = chunks.first() {
        let preview: String = first.text.chars().take(120).collect();
        println!("first chunk      : {}", preview);
    }

    Ok(())
}

async fn cmd_ask(config: Config, question: &str) -> anyhow::Result<()> {
    let embedder = Arc::new(OpenAiEmbedder::new(&config.embedding)?);
    let generator = Arc::new(OpenAiGenerator::new(&config.generation)?);

    let index = build_index(&config, embedder.as_ref()).await?;

    let in_scope = is_in_scope(
        &index,
        embedder.as_ref(),
        question,
        config.retrieval.scope_threshold,
    )
    .await?;

    if !in_scope {
        println!("{}", config.generation.fallback_message);
        return Ok(());
    }

    let history = vec![faqdesk::models::ChatMessage::assistant(
        config.generation.greeting.as_str(),
    )];
    let answer = answer_question(
        generator.as_ref(),
        embedder.as_ref(),
        &index,
        &history,
        question,
        &config.retrieval,
        &config.generation,
    )
    .await?;
    println!("{}", answer);

    let questions = suggest_questions(
        &index,
        embedder.as_ref(),
        question,
        config.retrieval.top_match_threshold,
        config.retrieval.suggestion_count,
    )
    .await?;
    if !questions.is_empty() {
        println!();
        println!("You might also ask:");
        for q in questions {
            println!("  - {}", q);
        }
    }

    Ok(())
}
