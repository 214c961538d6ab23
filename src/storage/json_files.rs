//! One JSON file per document kind

use serde_json::Value;
use tracing::debug;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;

use super::file_io::{read_json_value, write_json_atomic};
use super::{DocumentKind, Persistence};

/// File-backed persistence rooted at a data directory
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    paths: LedgerPaths,
}

impl JsonFilePersistence {
    /// Create the persistence and make sure its directories exist
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self, kind: DocumentKind) -> LedgerResult<Option<Value>> {
        let path = self.paths.document_file(kind);
        debug!(kind = %kind, path = %path.display(), "loading document");
        read_json_value(path)
    }

    fn save(&mut self, kind: DocumentKind, document: &Value) -> LedgerResult<()> {
        let path = self.paths.document_file(kind);
        debug!(kind = %kind, path = %path.display(), "saving document");
        write_json_atomic(path, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_per_kind() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut persistence = JsonFilePersistence::new(paths.clone()).unwrap();

        assert!(persistence.load(DocumentKind::Vendors).unwrap().is_none());

        let doc = json!({"schema_version": 1, "vendors": []});
        persistence.save(DocumentKind::Vendors, &doc).unwrap();

        assert!(paths.document_file(DocumentKind::Vendors).exists());
        assert_eq!(persistence.load(DocumentKind::Vendors).unwrap(), Some(doc));
        assert!(persistence.load(DocumentKind::Transactions).unwrap().is_none());
    }

    #[test]
    fn test_malformed_document() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let persistence = JsonFilePersistence::new(paths.clone()).unwrap();

        std::fs::write(paths.document_file(DocumentKind::YearBudgets), "{{").unwrap();

        assert!(matches!(
            persistence.load(DocumentKind::YearBudgets),
            Err(LedgerError::Json(_))
        ));
    }
}
