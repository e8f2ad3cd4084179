//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod invoices;
pub mod output;

use std::path::Path;

use tracing::debug;

use invtab_core::invoice::{ShortRowPolicy, TableInvoiceExtractor, TableMode};
use invtab_core::models::config::InvtabConfig;

/// Load the configuration named on the command line, else the default file
/// if it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvtabConfig> {
    let config = match config_path {
        Some(path) => InvtabConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using configuration at {}", default_path.display());
                InvtabConfig::from_file(&default_path)?
            } else {
                InvtabConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Extractor configured from the file, with command-line overrides.
pub fn build_extractor(
    config: &InvtabConfig,
    separate_tables: bool,
    strict_rows: bool,
) -> TableInvoiceExtractor {
    let table_mode = if separate_tables {
        TableMode::Separate
    } else {
        config.extraction.table_mode
    };
    let short_rows = if strict_rows {
        ShortRowPolicy::Reject
    } else {
        config.extraction.short_rows
    };

    TableInvoiceExtractor::new()
        .with_table_mode(table_mode)
        .with_short_rows(short_rows)
}
