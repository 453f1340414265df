//! The toggle command: resolve the companion and show it in place of the active document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::app::resolve::CompanionResolver;
use crate::app::search::FileSearch;
use crate::domain::errors::{OpenError, ToggleError};
use crate::domain::model::{Document, EditorContext, ViewColumn};

/// Editor surface able to open a document and show it in a view column.
#[async_trait]
pub trait Editor: Send + Sync {
    async fn open(&self, path: &Path) -> Result<Document, OpenError>;

    async fn show(&self, document: Document, column: ViewColumn) -> Result<(), OpenError>;
}

/// Runs one toggle per invocation: a single resolution and at most one open attempt.
#[derive(Debug)]
pub struct ToggleController<S, E> {
    resolver: CompanionResolver<S>,
    editor: E,
}

impl<S: FileSearch, E: Editor> ToggleController<S, E> {
    pub fn new(resolver: CompanionResolver<S>, editor: E) -> Self {
        Self { resolver, editor }
    }

    /// Show the companion of the active document in the same view column.
    pub async fn toggle(&self, context: &EditorContext) -> Result<PathBuf, ToggleError> {
        let companion = self
            .resolver
            .resolve(&context.document)
            .await?
            .into_companion()?;

        let document = self.editor.open(&companion.path).await?;
        self.editor.show(document, context.column).await?;
        Ok(companion.path)
    }
}
