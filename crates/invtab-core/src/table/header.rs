//! Column header resolution.

use tracing::debug;

use super::collect_cell_text;
use crate::error::ExtractionError;
use crate::graph::BlockGraph;
use crate::models::block::Block;

/// Builds header labels from cells tagged `COLUMN_HEADER`.
pub struct HeaderResolver;

impl HeaderResolver {
    /// One label per header cell, in the order the ids are given.
    ///
    /// A header cell without children still yields an (empty) label so the
    /// column count stays aligned with the data rows.
    pub fn resolve(
        graph: &BlockGraph<'_>,
        cell_ids: &[&str],
    ) -> Result<Vec<String>, ExtractionError> {
        let headers = collect_cell_text(graph, cell_ids, Block::is_header_cell)?;
        debug!("Resolved {} column headers: {:?}", headers.len(), headers);
        Ok(headers)
    }
}
