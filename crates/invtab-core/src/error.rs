//! Error types for the invtab-core library.

use thiserror::Error;

use crate::invoice::rules::InvoiceField;

/// Main error type for the invtab library.
#[derive(Error, Debug)]
pub enum InvtabError {
    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Document analysis collaborator error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Persistence collaborator error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a block graph into invoice lines.
///
/// Every variant aborts the extraction of the whole document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The caller did not supply an owner identifier.
    #[error("missing owner identifier")]
    MissingOwnerId,

    /// The object store did not report success, so analysis was not attempted.
    #[error("upload failed with status {status}")]
    UpstreamUploadFailed { status: u16 },

    /// A relationship points at a block that is not in the graph.
    #[error("dangling block reference: {id}")]
    DanglingReference { id: String },

    /// A numeric cell could not be parsed. `row` counts rows across all
    /// tables of the document, in line order.
    #[error("malformed {field} cell at row {row}, column {column}: {value:?}")]
    MalformedCell {
        row: usize,
        column: usize,
        field: InvoiceField,
        value: String,
    },

    /// A row is shorter than the header (only with the strict row policy).
    #[error("row {row} has {found} cells, expected {expected}")]
    IncompleteRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors from the document analysis collaborator.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No analysis response is available for the document.
    #[error("no analysis response for {0}")]
    NotFound(String),

    /// The analysis response could not be decoded.
    #[error("invalid analysis response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Reading the response failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be decoded.
    #[error("invalid stored value in column {column}: {value}")]
    InvalidValue { column: String, value: String },
}

/// Result type for the invtab library.
pub type Result<T> = std::result::Result<T, InvtabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_cell_message_names_position() {
        let err = ExtractionError::MalformedCell {
            row: 2,
            column: 0,
            field: InvoiceField::Quantity,
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed quantity cell at row 2, column 0: \"abc\""
        );
    }

    #[test]
    fn test_extraction_error_wraps_into_invtab_error() {
        let err: InvtabError = ExtractionError::DanglingReference {
            id: "cell-9".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "extraction error: dangling block reference: cell-9"
        );
    }
}
