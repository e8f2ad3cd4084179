//! Pre-computed analysis responses read from a directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AnalysisError;
use crate::models::block::AnalysisResult;
use crate::service::{DocumentAnalyzer, StoredObject, UploadedFile};

/// Serves the analysis response saved as `<dir>/<file stem>.json`.
#[derive(Debug, Clone)]
pub struct AnalysisDirectory {
    dir: PathBuf,
}

impl AnalysisDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Response path for a document name.
    pub fn response_path(&self, file_name: &str) -> PathBuf {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!("{stem}.json"))
    }
}

impl DocumentAnalyzer for AnalysisDirectory {
    fn analyze(&self, file: &UploadedFile, object: &StoredObject) -> Result<AnalysisResult, AnalysisError> {
        let path = self.response_path(&file.name);
        if !path.is_file() {
            return Err(AnalysisError::NotFound(path.display().to_string()));
        }

        let result = AnalysisResult::from_file(&path)?;
        debug!(
            "Loaded {} blocks for {}/{} from {}",
            result.blocks.len(),
            object.bucket,
            object.key,
            path.display()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn object() -> StoredObject {
        StoredObject {
            bucket: "invoices".to_string(),
            key: "scan.png".to_string(),
        }
    }

    #[test]
    fn test_reads_response_by_stem() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("scan.json"),
            r#"{"Blocks":[{"Id":"w","BlockType":"WORD","Text":"Total"}]}"#,
        )
        .unwrap();

        let analyzer = AnalysisDirectory::new(dir.path());
        let file = UploadedFile::new("scan.png", "image/png", Vec::new());
        let result = analyzer.analyze(&file, &object()).unwrap();
        assert_eq!(result.blocks.len(), 1);
    }

    #[test]
    fn test_missing_and_invalid_responses() {
        let dir = TempDir::new().unwrap();
        let analyzer = AnalysisDirectory::new(dir.path());
        let file = UploadedFile::new("scan.png", "image/png", Vec::new());

        assert!(matches!(analyzer.analyze(&file, &object()), Err(AnalysisError::NotFound(_))));

        std::fs::write(dir.path().join("scan.json"), "not json").unwrap();
        assert!(matches!(
            analyzer.analyze(&file, &object()),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }
}
