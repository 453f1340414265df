//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected extension set declarations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtensionSetError {
    #[error("extension set must not be empty")]
    Empty,
    #[error("invalid extension `{0}`")]
    Invalid(String),
    #[error("duplicate extension `{0}` (extensions are case-insensitive)")]
    Duplicate(String),
}

/// Failures reported by a file search collaborator.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The collaborator signals "nothing matched" by failing instead of returning an empty list.
    #[error("no files matched `{pattern}`")]
    NoMatches { pattern: String },
    #[error("invalid search pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("search root {} is not a directory", .0.display())]
    InvalidRoot(PathBuf),
    #[error("workspace search failed: {0}")]
    Walk(String),
}

/// Failures opening or displaying a resolved companion.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot display {}: {message}", .path.display())]
    Show { path: PathBuf, message: String },
}

/// Every way a single toggle invocation can end without showing a companion.
#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("{} has no supported header/source extension", .path.display())]
    UnsupportedFileType { path: PathBuf },
    #[error("unsupported file scheme `{scheme}`")]
    UnsupportedScheme { scheme: String },
    #[error("no companion file found for `{base_name}`")]
    NoCompanionFound { base_name: String },
    #[error(transparent)]
    SearchFailure(#[from] SearchError),
    #[error(transparent)]
    OpenFailure(#[from] OpenError),
}

impl ToggleError {
    /// The single message shown to the user for this invocation.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFileType { .. } => {
                "Cannot toggle to corresponding header/source, this filetype is not supported."
                    .to_owned()
            }
            Self::UnsupportedScheme { .. } => "Unsupported file scheme.".to_owned(),
            Self::NoCompanionFound { .. } => {
                "Cannot find corresponding header/source file.".to_owned()
            }
            Self::SearchFailure(err) => err.to_string(),
            Self::OpenFailure(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_results_have_distinct_messages() {
        let unsupported = ToggleError::UnsupportedFileType {
            path: PathBuf::from("/proj/x.txt"),
        };
        let missing = ToggleError::NoCompanionFound {
            base_name: "foo".into(),
        };
        let scheme = ToggleError::UnsupportedScheme {
            scheme: "untitled".into(),
        };

        assert_ne!(unsupported.user_message(), missing.user_message());
        assert_ne!(missing.user_message(), scheme.user_message());
        assert!(unsupported.user_message().contains("not supported"));
    }

    #[test]
    fn failures_are_reported_verbatim() {
        let err = ToggleError::from(SearchError::Walk("permission denied".into()));
        assert_eq!(
            err.user_message(),
            "workspace search failed: permission denied"
        );
    }
}
