//! `lettrage`: pair invoices with the bank transactions that settled them.

mod commands;
mod export;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{extract, reconcile, statement};
use lettrage_core::Settings;

/// Extract invoice fields from PDFs, normalize bank statements and reconcile
/// the two.
#[derive(Parser)]
#[command(name = "lettrage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More output (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract invoice fields from PDF files
    Extract(extract::ExtractArgs),

    /// Load and normalize a bank statement
    Statement(statement::StatementArgs),

    /// Extract invoices, load a statement and match them
    Match(reconcile::MatchArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(p) => format!("loading config {}", p.display()),
        None => "loading config".to_string(),
    })?;

    match cli.command {
        Commands::Extract(args) => extract::run(args, settings).await,
        Commands::Statement(args) => statement::run(args),
        Commands::Match(args) => reconcile::run(args, settings).await,
    }
}
