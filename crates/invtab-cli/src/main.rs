//! CLI application for invoice line extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, ingest, invoices};

/// Invoice table extraction - turn document-analysis results into invoice lines
#[derive(Parser)]
#[command(name = "invtab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract invoice lines from an analysis response
    Extract(extract::ExtractArgs),

    /// Upload, analyse, extract and store one invoice document
    Ingest(ingest::IngestArgs),

    /// Extract invoice lines from many analysis responses
    Batch(batch::BatchArgs),

    /// Query stored invoice lines
    Invoices(invoices::InvoicesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Ingest(args) => ingest::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Invoices(args) => invoices::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
