//! LedgerTap CLI — operate the stream processor and its ledger surfaces.
//!
//! # Commands
//! ```
//! ledgertap serve
//! ledgertap digest
//! ledgertap replay --file <batch.json>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledgertap_http::Config;
use ledgertap_ledger::{LedgerService, RemoteLedger};
use ledgertap_observability::{init_tracing, LogConfig};
use std::path::PathBuf;
use std::sync::Arc;

mod cmd_replay;

#[derive(Parser)]
#[command(
    name = "ledgertap",
    about = "Ledger change-stream processor — LedgerTap CLI",
    long_about = "
LedgerTap CLI: run the document submission surface, fetch ledger digests
for integrity verification, and replay captured stream batches.

ENVIRONMENT VARIABLES:
  LEDGER           Name of the ledger (required)
  TABLE            Target table for submitted documents (required)
  LEDGER_ENDPOINT  Base URL of the ledger service (default http://localhost:8081)
  LISTEN_ADDR      Bind address for `serve` (default 0.0.0.0:8080)
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP submission surface
    Serve,

    /// Fetch the current ledger digest for out-of-band verification
    Digest,

    /// Replay a captured batch of transport records through the pipeline
    Replay {
        /// JSON file containing an array of transport records
        #[arg(short, long)]
        file: PathBuf,
        /// Pretty-print each classified record instead of log lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    init_tracing(&LogConfig::with_level(level));

    match cli.command {
        Commands::Serve => serve().await,
        Commands::Digest => digest().await,
        Commands::Replay { file, json } => cmd_replay::run(&file, json).await,
    }
}

async fn serve() -> Result<()> {
    let config = Config::from_env().context("invalid environment configuration")?;
    let ledger: Arc<dyn LedgerService> = Arc::new(RemoteLedger::new(&config.ledger_endpoint));

    ledgertap_http::run_server(config, ledger)
        .await
        .context("server failed")
}

async fn digest() -> Result<()> {
    let config = Config::from_env().context("invalid environment configuration")?;
    let ledger = RemoteLedger::new(&config.ledger_endpoint);

    let digest = ledger
        .get_digest(&config.ledger)
        .await
        .context("no digest was produced")?;

    println!("Put this into the 'Digest' box: {}", digest.digest);
    println!(
        "and this into 'Digest tip address' (you may need to remove slashes if added by your CLI tool): {}",
        digest.tip_address
    );
    Ok(())
}
