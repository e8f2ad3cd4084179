//! Indexed, read-only view over a flat block collection.

use std::collections::HashMap;

use crate::error::ExtractionError;
use crate::models::block::{Block, RelationshipType};

/// Lookup and relationship traversal over the blocks of one document.
///
/// The graph borrows the blocks; nothing here mutates them.
#[derive(Debug)]
pub struct BlockGraph<'a> {
    blocks: &'a [Block],
    index: HashMap<&'a str, &'a Block>,
}

impl<'a> BlockGraph<'a> {
    /// Index a block collection. When ids repeat, the first block wins.
    pub fn new(blocks: &'a [Block]) -> Self {
        let mut index = HashMap::with_capacity(blocks.len());
        for block in blocks {
            index.entry(block.id.as_str()).or_insert(block);
        }

        Self { blocks, index }
    }

    /// All blocks in source order.
    pub fn blocks(&self) -> &'a [Block] {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by id.
    pub fn by_id(&self, id: &str) -> Result<&'a Block, ExtractionError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ExtractionError::DanglingReference { id: id.to_string() })
    }

    /// Ids listed under every relationship of the given type, in order.
    pub fn child_ids(&self, block: &'a Block, relationship: RelationshipType) -> Vec<&'a str> {
        block
            .relationships
            .iter()
            .filter(|r| r.relationship_type == relationship)
            .flat_map(|r| r.ids.iter().map(String::as_str))
            .collect()
    }

    /// Resolve the CHILD blocks of a block.
    pub fn children(&self, block: &'a Block) -> Result<Vec<&'a Block>, ExtractionError> {
        self.child_ids(block, RelationshipType::Child)
            .into_iter()
            .map(|id| self.by_id(id))
            .collect()
    }

    /// Text of a container block: the text of its CHILD leaves joined by
    /// single spaces. A block without children yields an empty string; leaves
    /// without text contribute nothing.
    pub fn child_text(&self, block: &'a Block) -> Result<String, ExtractionError> {
        let children = self.children(block)?;
        let parts: Vec<&str> = children
            .iter()
            .filter_map(|child| child.text.as_deref())
            .collect();

        Ok(parts.join(" "))
    }
}
