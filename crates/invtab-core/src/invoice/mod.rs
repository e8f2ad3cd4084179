//! Invoice line extraction module.

mod builder;
mod extractor;
pub mod rules;

pub use builder::{zero_amount, InvoiceBuilder};
pub use extractor::{
    ExtractionResult, ShortRowPolicy, TableInvoiceExtractor, TableMode, TableSummary,
};

#[cfg(test)]
pub(crate) use extractor::tests::table_blocks;

use crate::error::ExtractionError;
use crate::models::block::Block;
use crate::models::invoice::OwnerId;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for invoice line extractors.
pub trait InvoiceExtractor {
    /// Extract the invoice lines of one document from its analysis blocks.
    fn extract(&self, blocks: &[Block], owner_id: &OwnerId) -> Result<ExtractionResult>;
}
