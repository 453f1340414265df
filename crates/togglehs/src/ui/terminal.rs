//! [`Editor`] implementation for terminal use.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;

use crate::app::toggle::Editor;
use crate::domain::errors::OpenError;
use crate::domain::model::{Document, ViewColumn};
use crate::infra::fs::load_document;

/// Opens documents from disk and shows them by running an editor command, or by printing
/// the path to stdout when no command is configured.
#[derive(Debug, Clone, Default)]
pub struct TerminalEditor {
    command: Option<Vec<String>>,
}

impl TerminalEditor {
    /// `command` is split on whitespace; the document path is appended as the last argument.
    pub fn new(command: Option<&str>) -> Self {
        let command = command
            .map(|cmd| cmd.split_whitespace().map(str::to_owned).collect::<Vec<_>>())
            .filter(|argv| !argv.is_empty());
        Self { command }
    }
}

#[async_trait]
impl Editor for TerminalEditor {
    async fn open(&self, path: &Path) -> Result<Document, OpenError> {
        load_document(path).await
    }

    async fn show(&self, document: Document, column: ViewColumn) -> Result<(), OpenError> {
        tracing::debug!(path = %document.path.display(), column = column.0, "showing document");

        let Some((program, args)) = self.command.as_ref().and_then(|argv| argv.split_first())
        else {
            let mut stdout = std::io::stdout().lock();
            return writeln!(stdout, "{}", document.path.display()).map_err(|err| {
                OpenError::Show {
                    path: document.path.clone(),
                    message: err.to_string(),
                }
            });
        };

        let status = tokio::process::Command::new(program)
            .args(args)
            .arg(&document.path)
            .status()
            .await
            .map_err(|err| OpenError::Show {
                path: document.path.clone(),
                message: format!("failed to run `{program}`: {err}"),
            })?;

        if !status.success() {
            return Err(OpenError::Show {
                path: document.path,
                message: format!("`{program}` exited with {status}"),
            });
        }
        Ok(())
    }
}
