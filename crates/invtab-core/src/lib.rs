//! Core library for invoice line extraction from document-analysis results.
//!
//! This crate provides:
//! - A typed view over the analysis block graph (tables, cells, words)
//! - Table reconstruction: headers, data cells, fixed-width rows
//! - Keyword-based column mapping and typed invoice lines
//! - An ingestion service over pluggable storage, analysis and persistence
//! - Local collaborators backed by the filesystem and SQLite

pub mod error;
pub mod graph;
pub mod invoice;
pub mod models;
pub mod service;
pub mod store;
pub mod table;

pub use error::{AnalysisError, ExtractionError, InvtabError, Result, StoreError};
pub use graph::BlockGraph;
pub use invoice::rules::{ColumnMapping, FieldMapper, FieldRules, InvoiceField};
pub use invoice::{
    ExtractionResult, InvoiceBuilder, InvoiceExtractor, ShortRowPolicy, TableInvoiceExtractor,
    TableMode, TableSummary,
};
pub use models::block::{AnalysisResult, Block, BlockType, EntityType, Relationship, RelationshipType};
pub use models::config::InvtabConfig;
pub use models::invoice::{InvoiceLine, OwnerId, StoredInvoiceLine};
pub use service::{
    DocumentAnalyzer, InvoiceRepository, InvoiceService, ObjectStore, ProcessOutcome, StoredObject,
    UploadOutcome, UploadedFile,
};
pub use store::{AnalysisDirectory, LocalObjectStore, SqliteInvoiceRepository};
pub use table::{CellExtractor, HeaderResolver, Row, RowAssembler, TableLocator};
