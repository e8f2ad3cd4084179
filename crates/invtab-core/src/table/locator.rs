//! Locating structured tables in the block graph.

use tracing::debug;

use crate::graph::BlockGraph;
use crate::models::block::RelationshipType;

/// A structured table and the ids of its direct children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTable<'a> {
    /// Table block id.
    pub id: &'a str,
    /// CHILD ids in reading order.
    pub cell_ids: Vec<&'a str>,
}

/// Finds blocks that represent structured tables.
pub struct TableLocator;

impl TableLocator {
    /// All structured tables in source order.
    pub fn locate<'a>(graph: &BlockGraph<'a>) -> Vec<LocatedTable<'a>> {
        let tables: Vec<LocatedTable<'a>> = graph
            .blocks()
            .iter()
            .filter(|block| block.is_structured_table())
            .map(|table| LocatedTable {
                id: table.id.as_str(),
                cell_ids: graph.child_ids(table, RelationshipType::Child),
            })
            .collect();

        debug!("Located {} structured tables", tables.len());
        tables
    }

    /// Child ids of every structured table flattened into one stream.
    pub fn cell_ids<'a>(graph: &BlockGraph<'a>) -> Vec<&'a str> {
        Self::locate(graph)
            .into_iter()
            .flat_map(|table| table.cell_ids)
            .collect()
    }
}
