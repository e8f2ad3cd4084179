//! Document-analysis block graph as delivered by the analysis service.
//!
//! Field names follow the service's JSON response (`Blocks`, `BlockType`,
//! `EntityTypes`, `Relationships`, ...). Kinds and tags this crate does not
//! care about deserialize to `Other` and are ignored downstream.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Complete analysis result for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalysisResult {
    /// Flat block collection.
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Document-level metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,
}

/// Document-level metadata reported by the analysis service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetadata {
    /// Number of pages analysed.
    pub pages: u32,
}

impl AnalysisResult {
    /// Decode an analysis response from JSON text.
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an analysis response from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Number of pages, when the service reported it.
    pub fn page_count(&self) -> Option<u32> {
        self.document_metadata.as_ref().map(|m| m.pages)
    }
}

/// A node in the document-analysis graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Identifier, unique within one graph.
    pub id: String,

    /// Layout kind.
    pub block_type: BlockType,

    /// Semantic tags. `None` and an empty list are different: only a block
    /// without tags counts as a data cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_types: Option<Vec<EntityType>>,

    /// Text payload of leaf blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Outgoing relationships in reading order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// Detection confidence (0 - 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Block {
    /// Create a block with no tags, text or relationships.
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            entity_types: None,
            text: None,
            relationships: Vec::new(),
            confidence: None,
            page: None,
        }
    }

    /// Set the tag list.
    pub fn with_entity_types(mut self, entity_types: Vec<EntityType>) -> Self {
        self.entity_types = Some(entity_types);
        self
    }

    /// Set the text payload.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a CHILD relationship.
    pub fn with_children<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships.push(Relationship {
            relationship_type: RelationshipType::Child,
            ids: ids.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Check whether the block carries a tag.
    pub fn has_entity_type(&self, entity_type: EntityType) -> bool {
        self.entity_types
            .as_ref()
            .is_some_and(|types| types.contains(&entity_type))
    }

    /// Check whether the tag list is absent (not merely empty).
    pub fn is_untagged(&self) -> bool {
        self.entity_types.is_none()
    }

    /// A table the service marked as having machine-parseable structure.
    pub fn is_structured_table(&self) -> bool {
        self.block_type == BlockType::Table && self.has_entity_type(EntityType::StructuredTable)
    }

    /// A cell tagged as a column title.
    pub fn is_header_cell(&self) -> bool {
        self.block_type == BlockType::Cell && self.has_entity_type(EntityType::ColumnHeader)
    }

    /// A cell carrying a data value.
    pub fn is_data_cell(&self) -> bool {
        self.block_type == BlockType::Cell && self.is_untagged()
    }
}

/// Layout kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    Table,
    Cell,
    MergedCell,
    TableTitle,
    TableFooter,
    SelectionElement,
    /// Any kind this crate does not interpret.
    #[serde(other)]
    Other,
}

/// Semantic tag on a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    StructuredTable,
    SemiStructuredTable,
    ColumnHeader,
    TableTitle,
    TableFooter,
    TableSectionTitle,
    TableSummary,
    Key,
    Value,
    /// Any tag this crate does not interpret.
    #[serde(other)]
    Other,
}

/// Typed edge list from a block to other blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    /// Edge type.
    #[serde(rename = "Type")]
    pub relationship_type: RelationshipType,

    /// Target block ids in reading order.
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Relationship type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Child,
    Value,
    MergedCell,
    Title,
    TableFooter,
    /// Any relationship this crate does not interpret.
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESPONSE: &str = r#"{
        "DocumentMetadata": { "Pages": 1 },
        "Blocks": [
            {
                "Id": "t1",
                "BlockType": "TABLE",
                "EntityTypes": ["STRUCTURED_TABLE"],
                "Confidence": 99.1,
                "Page": 1,
                "Relationships": [
                    { "Type": "CHILD", "Ids": ["c1", "c2"] },
                    { "Type": "TABLE_TITLE", "Ids": ["x"] }
                ]
            },
            {
                "Id": "c1",
                "BlockType": "CELL",
                "EntityTypes": ["COLUMN_HEADER"],
                "Relationships": [{ "Type": "CHILD", "Ids": ["w1"] }]
            },
            { "Id": "c2", "BlockType": "CELL" },
            { "Id": "w1", "BlockType": "WORD", "Text": "Qtd" },
            { "Id": "k1", "BlockType": "KEY_VALUE_SET", "EntityTypes": ["KEY"] }
        ]
    }"#;

    #[test]
    fn test_decode_analysis_response() {
        let result = AnalysisResult::from_json(RESPONSE).unwrap();

        assert_eq!(result.page_count(), Some(1));
        assert_eq!(result.blocks.len(), 5);

        let table = &result.blocks[0];
        assert!(table.is_structured_table());
        assert_eq!(table.relationships[0].ids, vec!["c1", "c2"]);
        assert_eq!(table.relationships[1].relationship_type, RelationshipType::Other);

        assert!(result.blocks[1].is_header_cell());
        assert!(result.blocks[2].is_data_cell());
        assert!(result.blocks[2].relationships.is_empty());
        assert_eq!(result.blocks[3].text.as_deref(), Some("Qtd"));
        assert_eq!(result.blocks[4].block_type, BlockType::Other);
    }

    #[test]
    fn test_empty_tag_list_is_not_a_data_cell() {
        let cell = Block::new("c", BlockType::Cell).with_entity_types(Vec::new());
        assert!(!cell.is_data_cell());
        assert!(!cell.is_header_cell());
    }

    #[test]
    fn test_invalid_response_is_rejected() {
        let err = AnalysisResult::from_json("{\"Blocks\": 3}").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidResponse(_)));
    }
}
