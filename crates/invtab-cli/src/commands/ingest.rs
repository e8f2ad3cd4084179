//! Ingest command - run one invoice document through the full pipeline.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use invtab_core::invoice::InvoiceExtractor;
use invtab_core::models::config::InvtabConfig;
use invtab_core::models::invoice::OwnerId;
use invtab_core::service::{DocumentAnalyzer, InvoiceService, StoredObject, UploadedFile};
use invtab_core::store::{AnalysisDirectory, LocalObjectStore, SqliteInvoiceRepository};

use super::extract::print_warnings;
use super::output::{format_lines, OutputFormat};
use super::{build_extractor, load_config};

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// Invoice document (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Owner identifier stamped on every line
    #[arg(long)]
    owner: Option<String>,

    /// Directory holding the analysis response (`<file stem>.json`)
    #[arg(long)]
    analysis_dir: Option<PathBuf>,

    /// Analyse and extract only; nothing is uploaded or stored
    #[arg(long)]
    dry_run: bool,

    /// Output format for the extracted lines
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: IngestArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let file = UploadedFile::from_path(&args.input)?;
    let response_dir = args
        .analysis_dir
        .clone()
        .unwrap_or_else(|| config.response_dir_for(&args.input));
    let analyzer = AnalysisDirectory::new(response_dir);
    let extractor = build_extractor(&config, false, false);
    let owner_id = OwnerId::parse(args.owner.as_deref())?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    if args.dry_run {
        pb.set_message(format!("Analysing {}...", file.name));
        let object = StoredObject {
            bucket: config.storage.bucket.clone(),
            key: file.name.clone(),
        };
        let analysis = analyzer.analyze(&file, &object)?;
        let result = extractor.extract(&analysis.blocks, &owner_id)?;
        pb.finish_and_clear();

        print_warnings(&result);
        println!("{}", format_lines(&result.lines, args.format)?);
        println!(
            "{} Dry run: {} lines extracted, nothing stored",
            style("ℹ").blue(),
            result.lines.len()
        );
        return Ok(());
    }

    pb.set_message(format!("Processing {}...", file.name));
    let repository = open_repository(&config)?;
    let service = InvoiceService::new(
        config.storage.bucket.clone(),
        LocalObjectStore::new(&config.storage),
        analyzer,
        repository,
    )
    .with_extractor(extractor);

    let outcome = service.process(&file, Some(owner_id.as_str()));
    pb.finish_and_clear();
    let outcome = outcome?;

    info!(
        "Stored {}/{} and {} invoice lines",
        outcome.object.bucket, outcome.object.key, outcome.inserted
    );

    print_warnings(&outcome.extraction);
    println!("{}", format_lines(&outcome.extraction.lines, args.format)?);
    println!(
        "{} Stored {} lines from {} ({}ms)",
        style("✓").green(),
        outcome.inserted,
        file.name,
        outcome.extraction.processing_time_ms
    );

    Ok(())
}

/// Open the configured database, creating its directory if needed.
pub fn open_repository(config: &InvtabConfig) -> anyhow::Result<SqliteInvoiceRepository> {
    let path: &Path = &config.database.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(SqliteInvoiceRepository::open(path)?)
}
