//! Document ingestion: upload, analysis, extraction, persistence.
//!
//! The service owns no I/O of its own. Storage, analysis and persistence are
//! collaborators behind traits; [`crate::store`] has local implementations.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{AnalysisError, ExtractionError, Result, StoreError};
use crate::invoice::{ExtractionResult, InvoiceExtractor, TableInvoiceExtractor};
use crate::models::block::AnalysisResult;
use crate::models::invoice::{InvoiceLine, OwnerId};

/// An invoice document as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name; used as the object key.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a document from disk, guessing the content type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, content_type_for(path), bytes))
    }
}

/// MIME type for a document path.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Status reported by an object store for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// HTTP-style status code.
    pub status_code: u16,
    /// Failure detail, if any.
    pub message: Option<String>,
}

impl UploadOutcome {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            message: None,
        }
    }

    pub fn failed(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Location of a successfully uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
}

/// Binary object storage.
pub trait ObjectStore {
    /// Store `bytes` under `bucket`/`key`. Failures are reported through the
    /// status code.
    fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> UploadOutcome;
}

/// Document analysis service.
pub trait DocumentAnalyzer {
    /// Return the complete block graph for an uploaded document.
    fn analyze(&self, file: &UploadedFile, object: &StoredObject) -> std::result::Result<AnalysisResult, AnalysisError>;
}

/// Invoice line persistence.
pub trait InvoiceRepository {
    /// Insert all lines or none. Returns the number of rows written.
    fn insert_batch(&self, lines: &[InvoiceLine]) -> std::result::Result<usize, StoreError>;
}

/// Outcome of processing one document.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Where the document was stored.
    pub object: StoredObject,
    /// Extracted lines and diagnostics.
    pub extraction: ExtractionResult,
    /// Lines written to the repository.
    pub inserted: usize,
}

/// Runs one document through upload, analysis, extraction and persistence.
pub struct InvoiceService<S: ObjectStore, A: DocumentAnalyzer, R: InvoiceRepository> {
    bucket: String,
    store: S,
    analyzer: A,
    repository: R,
    extractor: TableInvoiceExtractor,
}

impl<S: ObjectStore, A: DocumentAnalyzer, R: InvoiceRepository> InvoiceService<S, A, R> {
    pub fn new(bucket: impl Into<String>, store: S, analyzer: A, repository: R) -> Self {
        Self {
            bucket: bucket.into(),
            store,
            analyzer,
            repository,
            extractor: TableInvoiceExtractor::new(),
        }
    }

    /// Set the extractor used for every document.
    pub fn with_extractor(mut self, extractor: TableInvoiceExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Process one document for `owner`.
    ///
    /// Steps run in order and the first failure aborts the document: no
    /// analysis without a successful upload, no insert unless every row
    /// extracted cleanly.
    pub fn process(&self, file: &UploadedFile, owner: Option<&str>) -> Result<ProcessOutcome> {
        let owner_id = OwnerId::parse(owner)?;

        let upload = self
            .store
            .put(&self.bucket, &file.name, &file.bytes, &file.content_type);
        if !upload.is_success() {
            warn!(
                "Upload of {} failed with status {}: {}",
                file.name,
                upload.status_code,
                upload.message.as_deref().unwrap_or("no detail")
            );
            return Err(ExtractionError::UpstreamUploadFailed {
                status: upload.status_code,
            }
            .into());
        }

        let object = StoredObject {
            bucket: self.bucket.clone(),
            key: file.name.clone(),
        };
        let analysis = self.analyzer.analyze(file, &object)?;
        let extraction = self.extractor.extract(&analysis.blocks, &owner_id)?;

        let inserted = if extraction.lines.is_empty() {
            0
        } else {
            self.repository.insert_batch(&extraction.lines)?
        };

        info!(
            "Processed {} for {}: {} lines extracted, {} stored",
            file.name,
            owner_id,
            extraction.lines.len(),
            inserted
        );

        Ok(ProcessOutcome {
            object,
            extraction,
            inserted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvtabError;
    use crate::invoice::table_blocks;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};

    struct MockStore {
        status: u16,
        puts: RefCell<Vec<(String, String, String)>>,
    }

    impl MockStore {
        fn with_status(status: u16) -> Self {
            Self {
                status,
                puts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ObjectStore for MockStore {
        fn put(&self, bucket: &str, key: &str, _bytes: &[u8], content_type: &str) -> UploadOutcome {
            self.puts
                .borrow_mut()
                .push((bucket.to_string(), key.to_string(), content_type.to_string()));
            if self.status == 200 {
                UploadOutcome::ok()
            } else {
                UploadOutcome::failed(self.status, "rejected")
            }
        }
    }

    struct MockAnalyzer {
        blocks: Vec<crate::models::block::Block>,
        calls: Cell<usize>,
    }

    impl DocumentAnalyzer for MockAnalyzer {
        fn analyze(
            &self,
            _file: &UploadedFile,
            _object: &StoredObject,
        ) -> std::result::Result<AnalysisResult, AnalysisError> {
            self.calls.set(self.calls.get() + 1);
            Ok(AnalysisResult {
                blocks: self.blocks.clone(),
                document_metadata: None,
            })
        }
    }

    #[derive(Default)]
    struct MockRepository {
        batches: RefCell<Vec<Vec<InvoiceLine>>>,
    }

    impl InvoiceRepository for MockRepository {
        fn insert_batch(&self, lines: &[InvoiceLine]) -> std::result::Result<usize, StoreError> {
            self.batches.borrow_mut().push(lines.to_vec());
            Ok(lines.len())
        }
    }

    fn service(
        status: u16,
        headers: &[&str],
        cells: &[&str],
    ) -> InvoiceService<MockStore, MockAnalyzer, MockRepository> {
        InvoiceService::new(
            "invoices",
            MockStore::with_status(status),
            MockAnalyzer {
                blocks: table_blocks("t", headers, cells),
                calls: Cell::new(0),
            },
            MockRepository::default(),
        )
    }

    fn invoice_pdf() -> UploadedFile {
        UploadedFile::new("nota-01.pdf", "application/pdf", b"%PDF-1.4".to_vec())
    }

    #[test]
    fn test_process_stores_all_lines() {
        let service = service(200, &["Qtd", "Descrição", "Valor"], &["2", "Bolt", "3.00", "1", "Nut", "0.40"]);

        let outcome = service.process(&invoice_pdf(), Some("user-7")).unwrap();

        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.object.key, "nota-01.pdf");
        assert_eq!(
            service.store.puts.borrow().as_slice(),
            &[("invoices".to_string(), "nota-01.pdf".to_string(), "application/pdf".to_string())]
        );
        let batches = service.repository().batches.borrow();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].iter().all(|line| line.owner_id.as_str() == "user-7"));
    }

    #[test]
    fn test_missing_owner_stops_before_upload() {
        let service = service(200, &["Qtd"], &["1"]);

        let err = service.process(&invoice_pdf(), None).unwrap_err();
        assert!(matches!(err, InvtabError::Extraction(ExtractionError::MissingOwnerId)));
        assert!(service.store.puts.borrow().is_empty());
        assert_eq!(service.analyzer.calls.get(), 0);
    }

    #[test]
    fn test_failed_upload_prevents_analysis() {
        let service = service(400, &["Qtd"], &["1"]);

        let err = service.process(&invoice_pdf(), Some("user-7")).unwrap_err();
        assert!(matches!(
            err,
            InvtabError::Extraction(ExtractionError::UpstreamUploadFailed { status: 400 })
        ));
        assert_eq!(service.analyzer.calls.get(), 0);
        assert!(service.repository().batches.borrow().is_empty());
    }

    #[test]
    fn test_extraction_failure_persists_nothing() {
        let service = service(200, &["Qtd", "Descrição"], &["1", "Bolt", "many", "Nut"]);

        let err = service.process(&invoice_pdf(), Some("user-7")).unwrap_err();
        assert!(matches!(
            err,
            InvtabError::Extraction(ExtractionError::MalformedCell { row: 1, .. })
        ));
        assert!(service.repository().batches.borrow().is_empty());
    }

    #[test]
    fn test_no_lines_skips_insert() {
        let service = service(200, &[], &[]);

        let outcome = service.process(&invoice_pdf(), Some("user-7")).unwrap();
        assert_eq!(outcome.inserted, 0);
        assert!(outcome.extraction.lines.is_empty());
        assert!(service.repository().batches.borrow().is_empty());
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for(Path::new("a/scan.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("invoice.pdf")), "application/pdf");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }
}
