//! Filesystem access for opening documents.

use std::path::Path;

use crate::domain::errors::OpenError;
use crate::domain::model::Document;

/// Read a document from disk. Invalid UTF-8 is replaced rather than rejected.
pub async fn load_document(path: &Path) -> Result<Document, OpenError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| OpenError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Document {
        path: path.to_path_buf(),
        text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
