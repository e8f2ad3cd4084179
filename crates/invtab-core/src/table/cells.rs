//! Data cell extraction.

use tracing::debug;

use super::collect_cell_text;
use crate::error::ExtractionError;
use crate::graph::BlockGraph;
use crate::models::block::Block;

/// Builds cell strings from untagged cells.
pub struct CellExtractor;

impl CellExtractor {
    /// One string per data cell, in the order the ids are given.
    ///
    /// The order is trusted as-is: rows come out row-major only when the
    /// analysis service lists cells row-major.
    pub fn extract(
        graph: &BlockGraph<'_>,
        cell_ids: &[&str],
    ) -> Result<Vec<String>, ExtractionError> {
        let cells = collect_cell_text(graph, cell_ids, Block::is_data_cell)?;
        debug!("Extracted {} data cells", cells.len());
        Ok(cells)
    }
}
