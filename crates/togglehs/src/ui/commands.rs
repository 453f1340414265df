//! Registration and dispatch of user-invocable commands.

use std::path::PathBuf;

use thiserror::Error;

use crate::app::search::FileSearch;
use crate::app::toggle::{Editor, ToggleController};
use crate::domain::errors::ToggleError;
use crate::domain::model::EditorContext;

/// Name of the single toggle command.
pub const TOGGLE_COMMAND: &str = "togglehs.toggleHS";

/// Where user-facing messages go.
pub trait MessageSink: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Writes messages to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrMessages;

impl MessageSink for StderrMessages {
    fn show_error(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error(transparent)]
    Toggle(#[from] ToggleError),
}

/// Commands bound to the active editor context.
pub struct CommandRegistry<S, E, M> {
    toggle: ToggleController<S, E>,
    messages: M,
}

impl<S: FileSearch, E: Editor, M: MessageSink> CommandRegistry<S, E, M> {
    pub fn register(toggle: ToggleController<S, E>, messages: M) -> Self {
        tracing::debug!(command = TOGGLE_COMMAND, "registered command");
        Self { toggle, messages }
    }

    pub fn names(&self) -> &'static [&'static str] {
        &[TOGGLE_COMMAND]
    }

    /// Run a command. Any failure is reported to the message sink exactly once and returned.
    pub async fn execute(
        &self,
        name: &str,
        context: &EditorContext,
    ) -> Result<PathBuf, CommandError> {
        let result = if name == TOGGLE_COMMAND {
            self.toggle.toggle(context).await.map_err(CommandError::from)
        } else {
            Err(CommandError::Unknown(name.to_owned()))
        };

        if let Err(err) = &result {
            let message = match err {
                CommandError::Toggle(toggle) => toggle.user_message(),
                CommandError::Unknown(_) => err.to_string(),
            };
            tracing::debug!(command = name, error = %err, "command failed");
            self.messages.show_error(&message);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::app::resolve::CompanionResolver;
    use crate::app::search::SearchPattern;
    use crate::domain::errors::{OpenError, SearchError};
    use crate::domain::extensions::ExtensionSet;
    use crate::domain::model::{Document, DocumentLocation, ViewColumn};

    struct NoFiles;

    #[async_trait]
    impl FileSearch for NoFiles {
        async fn find_files(
            &self,
            _pattern: &SearchPattern,
            _root: &Path,
        ) -> Result<Vec<PathBuf>, SearchError> {
            Ok(Vec::new())
        }
    }

    struct NullEditor;

    #[async_trait]
    impl Editor for NullEditor {
        async fn open(&self, path: &Path) -> Result<Document, OpenError> {
            Ok(Document {
                path: path.to_path_buf(),
                text: String::new(),
            })
        }

        async fn show(&self, _document: Document, _column: ViewColumn) -> Result<(), OpenError> {
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct Collected(Arc<Mutex<Vec<String>>>);

    impl MessageSink for Collected {
        fn show_error(&self, message: &str) {
            self.0.lock().expect("messages lock").push(message.to_owned());
        }
    }

    fn registry(messages: Collected) -> CommandRegistry<NoFiles, NullEditor, Collected> {
        let resolver = CompanionResolver::new(Arc::new(ExtensionSet::default()), NoFiles, "/proj");
        CommandRegistry::register(ToggleController::new(resolver, NullEditor), messages)
    }

    fn context(document: &str) -> EditorContext {
        EditorContext {
            document: DocumentLocation::parse(document),
            column: ViewColumn::default(),
        }
    }

    #[tokio::test]
    async fn each_failure_reports_one_message() {
        let messages = Collected::default();
        let registry = registry(messages.clone());

        let missing = registry
            .execute(TOGGLE_COMMAND, &context("/proj/src/foo.cpp"))
            .await;
        let remote = registry
            .execute(TOGGLE_COMMAND, &context("untitled:Untitled-1"))
            .await;

        assert!(missing.is_err());
        assert!(remote.is_err());
        assert_eq!(
            *messages.0.lock().expect("messages lock"),
            vec![
                "Cannot find corresponding header/source file.".to_owned(),
                "Unsupported file scheme.".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_commands_are_rejected() {
        let messages = Collected::default();
        let registry = registry(messages.clone());

        let result = registry.execute("togglehs.other", &context("/proj/foo.h")).await;

        assert!(matches!(result, Err(CommandError::Unknown(_))));
        assert_eq!(registry.names(), &[TOGGLE_COMMAND]);
        assert_eq!(messages.0.lock().expect("messages lock").len(), 1);
    }
}
