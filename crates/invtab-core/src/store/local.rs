//! Directory-backed object store.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::config::StorageConfig;
use crate::service::{ObjectStore, UploadOutcome};

/// Stores objects at `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    /// Path an object would be written to. Bucket and key are reduced to
    /// their last path component, so `../x` lands inside the bucket.
    pub fn object_path(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        let bucket = Path::new(bucket).file_name()?;
        let key = Path::new(key).file_name()?;
        Some(self.root.join(bucket).join(key))
    }
}

impl ObjectStore for LocalObjectStore {
    fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> UploadOutcome {
        let Some(path) = self.object_path(bucket, key) else {
            return UploadOutcome::failed(400, format!("invalid object location {bucket}/{key}"));
        };

        let written = path
            .parent()
            .map_or(Ok(()), |dir| std::fs::create_dir_all(dir))
            .and_then(|_| std::fs::write(&path, bytes));

        match written {
            Ok(()) => {
                debug!("Stored {} bytes ({}) at {}", bytes.len(), content_type, path.display());
                UploadOutcome::ok()
            }
            Err(e) => UploadOutcome::failed(500, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store(root: &Path) -> LocalObjectStore {
        LocalObjectStore::new(&StorageConfig {
            root: root.to_path_buf(),
            bucket: "invoices".to_string(),
        })
    }

    #[test]
    fn test_put_writes_into_bucket() {
        let dir = TempDir::new().unwrap();
        let store = store(dir.path());

        let outcome = store.put("invoices", "nota.pdf", b"%PDF", "application/pdf");
        assert!(outcome.is_success());
        assert_eq!(std::fs::read(dir.path().join("invoices/nota.pdf")).unwrap(), b"%PDF");
    }

    #[test]
    fn test_keys_cannot_escape_bucket() {
        let dir = TempDir::new().unwrap();
        let store = store(dir.path());

        assert_eq!(
            store.object_path("invoices", "../../etc/passwd"),
            Some(dir.path().join("invoices").join("passwd"))
        );
        assert_eq!(store.object_path("invoices", ".."), None);

        let outcome = store.put("invoices", "", b"x", "text/plain");
        assert_eq!(outcome.status_code, 400);
    }

    #[test]
    fn test_io_failure_is_a_status() {
        let dir = TempDir::new().unwrap();
        // A regular file where the bucket directory should be.
        std::fs::write(dir.path().join("invoices"), b"").unwrap();

        let outcome = store(dir.path()).put("invoices", "nota.pdf", b"%PDF", "application/pdf");
        assert_eq!(outcome.status_code, 500);
        assert!(!outcome.is_success());
        assert!(outcome.message.is_some());
    }
}
