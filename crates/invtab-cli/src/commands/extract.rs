//! Extract command - invoice lines from a single analysis response.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use invtab_core::invoice::{ExtractionResult, InvoiceExtractor};
use invtab_core::models::block::AnalysisResult;
use invtab_core::models::invoice::OwnerId;

use super::output::{format_lines, OutputFormat};
use super::{build_extractor, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Analysis response (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Owner identifier stamped on every line
    #[arg(long)]
    owner: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Map each structured table on its own instead of merging them
    #[arg(long)]
    separate_tables: bool,

    /// Fail when the last row is shorter than the header
    #[arg(long)]
    strict_rows: bool,

    /// Show resolved headers and column mapping
    #[arg(long)]
    show_mapping: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let owner_id = OwnerId::parse(args.owner.as_deref())?;
    info!("Extracting invoice lines from {}", args.input.display());

    let analysis = AnalysisResult::from_file(&args.input)?;
    let extractor = build_extractor(&config, args.separate_tables, args.strict_rows);
    let result = extractor.extract(&analysis.blocks, &owner_id)?;

    print_warnings(&result);
    if args.show_mapping {
        print_mapping(&result);
    }

    let output = format_lines(&result.lines, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} lines written to {}",
            style("✓").green(),
            result.lines.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn print_warnings(result: &ExtractionResult) {
    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
}

fn print_mapping(result: &ExtractionResult) {
    if result.tables.is_empty() {
        eprintln!("{} No structured tables found", style("ℹ").blue());
        return;
    }

    for table in &result.tables {
        eprintln!(
            "{} Table {} ({} rows)",
            style("ℹ").blue(),
            table.table_ids.join(", "),
            table.rows
        );
        for (column, header) in table.headers.iter().enumerate() {
            let fields: Vec<String> = table
                .mapping
                .iter()
                .filter(|(_, mapped)| *mapped == column)
                .map(|(field, _)| field.to_string())
                .collect();
            let target = if fields.is_empty() {
                style("-".to_string()).dim()
            } else {
                style(fields.join(", ")).green()
            };
            eprintln!("  [{}] {:<24} -> {}", column, header, target);
        }
    }
}
