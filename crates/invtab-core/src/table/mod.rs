//! Table reconstruction from the block graph.
//!
//! Structured tables are located first, then header labels and data cells are
//! read off the same ordered id stream and the cells are sliced into rows of
//! the header width.

mod cells;
mod header;
mod locator;
mod rows;

pub use cells::CellExtractor;
pub use header::HeaderResolver;
pub use locator::{LocatedTable, TableLocator};
pub use rows::{Row, RowAssembler};

use crate::error::ExtractionError;
use crate::graph::BlockGraph;
use crate::models::block::Block;

/// Resolve every id and return the child text of the blocks accepted by `keep`.
fn collect_cell_text(
    graph: &BlockGraph<'_>,
    cell_ids: &[&str],
    keep: fn(&Block) -> bool,
) -> Result<Vec<String>, ExtractionError> {
    let mut texts = Vec::new();
    for id in cell_ids {
        let block = graph.by_id(id)?;
        if keep(block) {
            texts.push(graph.child_text(block)?);
        }
    }
    Ok(texts)
}
