//! Domain models for files, documents, and editor locations.

use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::errors::ToggleError;
use crate::domain::extensions::ExtensionSet;

/// A file known to belong to the companion family, with its derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub path: PathBuf,
    /// File name without its last extension.
    pub base_name: String,
    /// Canonical (declared) form of the extension.
    pub extension: String,
    /// Index of the extension within the [`ExtensionSet`].
    pub slot: usize,
    /// Directory segments from the root to the containing directory.
    pub directory_parts: Vec<OsString>,
}

impl FileRef {
    /// Build a reference for `path`, or `None` when its extension is outside the set.
    pub fn from_path(path: impl Into<PathBuf>, extensions: &ExtensionSet) -> Option<Self> {
        let path = path.into();
        let slot = extensions.classify(&path)?;
        let base_name = path.file_stem()?.to_str()?.to_owned();
        let extension = extensions.get(slot)?.to_owned();
        let directory_parts = directory_parts(&path);
        Some(Self {
            path,
            base_name,
            extension,
            slot,
            directory_parts,
        })
    }
}

/// Segments of the directory containing `path`.
///
/// The root marker is not a segment; a drive or UNC prefix is, so files on different volumes
/// share nothing.
pub fn directory_parts(path: &Path) -> Vec<OsString> {
    let Some(parent) = path.parent() else {
        return Vec::new();
    };
    parent
        .components()
        .filter_map(|component| match component {
            Component::Prefix(prefix) => Some(prefix.as_os_str().to_os_string()),
            Component::Normal(segment) => Some(segment.to_os_string()),
            Component::RootDir | Component::CurDir | Component::ParentDir => None,
        })
        .collect()
}

/// Where the active document lives, as reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    /// Addressable on the local filesystem.
    File(PathBuf),
    /// Virtual or remote document, e.g. `untitled:` or `vscode-remote://`.
    Remote { scheme: String, uri: String },
}

impl DocumentLocation {
    /// Interpret editor input as either a `scheme:` URI or a plain filesystem path.
    ///
    /// Single-letter schemes are treated as Windows drive letters, not URIs.
    pub fn parse(input: &str) -> Self {
        match url::Url::parse(input) {
            Ok(uri) if uri.scheme().len() > 1 => {
                if uri.scheme() == "file"
                    && let Ok(path) = uri.to_file_path()
                {
                    return Self::File(path);
                }
                Self::Remote {
                    scheme: uri.scheme().to_owned(),
                    uri: input.to_owned(),
                }
            }
            _ => Self::File(PathBuf::from(input)),
        }
    }

    /// The local path, or [`ToggleError::UnsupportedScheme`] for anything not on disk.
    pub fn local_path(&self) -> Result<&Path, ToggleError> {
        match self {
            Self::File(path) => Ok(path),
            Self::Remote { scheme, .. } => Err(ToggleError::UnsupportedScheme {
                scheme: scheme.clone(),
            }),
        }
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote { uri, .. } => f.write_str(uri),
        }
    }
}

/// Editor view column a document is shown in; columns are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewColumn(pub u32);

impl Default for ViewColumn {
    fn default() -> Self {
        Self(1)
    }
}

/// An opened document ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

/// The active editor state a toggle runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContext {
    pub document: DocumentLocation,
    pub column: ViewColumn,
}
