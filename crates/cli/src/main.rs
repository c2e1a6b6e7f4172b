//! ragfile CLI
//!
//! Main entry point for the ragfile command-line tool.
//! Ingests documents into a flat-file vector store and answers questions from it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    AskCommand, CleanCommand, IngestCommand, InvokeCommand, QueryCommand, StatsCommand,
};
use ragfile_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// ragfile - local retrieval-augmented answering over a flat-file vector store
#[derive(Parser, Debug)]
#[command(name = "ragfile")]
#[command(about = "Local retrieval-augmented answering over a flat-file vector store", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RAGFILE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RAGFILE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Text-generation provider for answers
    #[arg(short, long, global = true, env = "RAGFILE_PROVIDER")]
    provider: Option<String>,

    /// Text-generation model identifier
    #[arg(short, long, global = true, env = "RAGFILE_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk, embed and store documents
    Ingest(IngestCommand),

    /// Retrieve the most relevant contexts for a question
    Query(QueryCommand),

    /// Answer a question from retrieved contexts
    Ask(AskCommand),

    /// Show vector store statistics
    Stats(StatsCommand),

    /// Delete the vector store
    Clean(CleanCommand),

    /// Handle a JSON request and print the JSON response
    Invoke(InvokeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load()?.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_format()?)?;

    tracing::info!("ragfile starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.ensure_state_dir()?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Query(_) => "query",
        Commands::Ask(_) => "ask",
        Commands::Stats(_) => "stats",
        Commands::Clean(_) => "clean",
        Commands::Invoke(_) => "invoke",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config, &cancel).await,
        Commands::Query(cmd) => cmd.execute(&config, &cancel).await,
        Commands::Ask(cmd) => cmd.execute(&config, &cancel).await,
        Commands::Stats(cmd) => cmd.execute(&config),
        Commands::Clean(cmd) => cmd.execute(&config),
        Commands::Invoke(cmd) => cmd.execute(&config, &cancel).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
