//! Quote file retrieval
//!
//! Quotes are HTML documents generated elsewhere and stored below a fixed
//! base directory. Identifiers are relative paths such as
//! `2026/10/QUOTE_123.html`.

use std::path::PathBuf;
use tokio::fs;

use super::error::StorageError;

/// A quote document read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDocument {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct QuoteStore {
    base: PathBuf,
}

impl QuoteStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Map an identifier to a path below the base directory
    ///
    /// Only `..` and `~` sequences are refused; the result is not
    /// canonicalized. Leading separators are dropped so the identifier is
    /// always joined under the base.
    pub fn resolve(&self, file: &str) -> Result<PathBuf, StorageError> {
        if file.is_empty() {
            return Err(StorageError::MissingParameter("file"));
        }
        if file.contains("..") || file.contains('~') {
            return Err(StorageError::UnsafePath);
        }

        let relative = file.trim_start_matches(['/', '\\']);
        Ok(self.base.join(relative))
    }

    pub async fn read(&self, file: &str) -> Result<QuoteDocument, StorageError> {
        let path = self.resolve(file)?;

        if !fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            return Err(StorageError::NotFound);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| StorageError::io("read", &path, e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(QuoteDocument { file_name, content })
    }
}
