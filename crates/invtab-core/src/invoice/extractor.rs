//! Template-free invoice line extraction from structured tables.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::builder::InvoiceBuilder;
use super::rules::{ColumnMapping, FieldMapper, FieldRules, InvoiceField};
use super::{InvoiceExtractor, Result};
use crate::error::ExtractionError;
use crate::graph::BlockGraph;
use crate::models::block::Block;
use crate::models::invoice::{InvoiceLine, OwnerId};
use crate::table::{CellExtractor, HeaderResolver, LocatedTable, Row, RowAssembler, TableLocator};

/// How several structured tables in one document are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    /// All tables form one header list and one cell stream.
    #[default]
    Merged,
    /// Each table gets its own headers, rows and mapping.
    Separate,
}

/// What to do with a trailing row shorter than the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortRowPolicy {
    /// Keep the row; missing cells take field defaults.
    #[default]
    Lenient,
    /// Fail with [`ExtractionError::IncompleteRow`].
    Reject,
}

/// Diagnostics for one processed table (or the merged table set).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    /// Ids of the table blocks that fed this row set.
    pub table_ids: Vec<String>,
    /// Resolved header labels.
    pub headers: Vec<String>,
    /// Column chosen per field.
    pub mapping: ColumnMapping,
    /// Number of assembled rows.
    pub rows: usize,
}

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted lines in table and row order.
    pub lines: Vec<InvoiceLine>,
    /// Per-table diagnostics.
    pub tables: Vec<TableSummary>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Reconstructs invoice lines from the structured tables of a block graph.
#[derive(Debug, Clone, Default)]
pub struct TableInvoiceExtractor {
    mapper: FieldMapper,
    table_mode: TableMode,
    short_rows: ShortRowPolicy,
    created_at: Option<DateTime<Utc>>,
}

impl TableInvoiceExtractor {
    /// Create an extractor with the default header keywords, merged tables
    /// and lenient short rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the header keyword table.
    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.mapper = FieldMapper::new(rules);
        self
    }

    /// Set how multiple tables are combined.
    pub fn with_table_mode(mut self, mode: TableMode) -> Self {
        self.table_mode = mode;
        self
    }

    /// Set the trailing short row policy.
    pub fn with_short_rows(mut self, policy: ShortRowPolicy) -> Self {
        self.short_rows = policy;
        self
    }

    /// Stamp every line with a fixed timestamp instead of the current time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Group located tables into the row sets the current mode processes.
    fn row_sets<'a>(&self, tables: Vec<LocatedTable<'a>>) -> Vec<(Vec<&'a str>, Vec<&'a str>)> {
        match self.table_mode {
            TableMode::Separate => tables
                .into_iter()
                .map(|table| (vec![table.id], table.cell_ids))
                .collect(),
            TableMode::Merged if tables.is_empty() => Vec::new(),
            TableMode::Merged => {
                let ids = tables.iter().map(|table| table.id).collect();
                let cell_ids = tables.into_iter().flat_map(|table| table.cell_ids).collect();
                vec![(ids, cell_ids)]
            }
        }
    }

    /// Check the trailing row against the header width.
    fn check_short_row(&self, rows: &[Row], width: usize, warnings: &mut Vec<String>) -> Result<()> {
        let Some(last) = rows.last() else {
            return Ok(());
        };
        if last.len() == width {
            return Ok(());
        }

        match self.short_rows {
            ShortRowPolicy::Reject => Err(ExtractionError::IncompleteRow {
                row: last.index,
                expected: width,
                found: last.len(),
            }),
            ShortRowPolicy::Lenient => {
                warnings.push(format!(
                    "row {} has {} of {} cells; missing fields use defaults",
                    last.index,
                    last.len(),
                    width
                ));
                Ok(())
            }
        }
    }
}

impl InvoiceExtractor for TableInvoiceExtractor {
    fn extract(&self, blocks: &[Block], owner_id: &OwnerId) -> Result<ExtractionResult> {
        let start = Instant::now();
        let graph = BlockGraph::new(blocks);
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let builder = InvoiceBuilder::new(owner_id, created_at);

        let mut lines = Vec::new();
        let mut tables = Vec::new();
        let mut warnings = Vec::new();

        for (table_ids, cell_ids) in self.row_sets(TableLocator::locate(&graph)) {
            let headers = HeaderResolver::resolve(&graph, &cell_ids)?;
            let cells = CellExtractor::extract(&graph, &cell_ids)?;
            let width = headers.len();

            if width == 0 && !cells.is_empty() {
                warnings.push(format!(
                    "table {} has {} data cells but no column headers; skipped",
                    table_ids.join(", "),
                    cells.len()
                ));
            }

            // Row indices run across the whole document, matching line order.
            let mut rows = RowAssembler::assemble(cells, width);
            for row in &mut rows {
                row.index += lines.len();
            }
            self.check_short_row(&rows, width, &mut warnings)?;

            let mapping = self.mapper.map(&headers);
            let unmapped = mapping.unmapped();
            if !rows.is_empty() && !unmapped.is_empty() {
                let names: Vec<String> = unmapped.iter().map(InvoiceField::to_string).collect();
                warnings.push(format!(
                    "no column found for {}; using defaults",
                    names.join(", ")
                ));
            }

            debug!(
                "Table {:?}: {} headers, {} rows",
                table_ids,
                headers.len(),
                rows.len()
            );

            lines.extend(builder.build(&rows, &mapping)?);
            tables.push(TableSummary {
                table_ids: table_ids.into_iter().map(str::to_string).collect(),
                headers,
                mapping,
                rows: rows.len(),
            });
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} invoice lines from {} tables in {}ms",
            lines.len(),
            tables.len(),
            processing_time_ms
        );

        Ok(ExtractionResult {
            lines,
            tables,
            warnings,
            processing_time_ms,
        })
    }
}
