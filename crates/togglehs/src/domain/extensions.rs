//! The ordered family of companion-file extensions and its classifier.
//!
//! Order matters: it drives the rotating priority chain used to break ties
//! between equally close candidates (`.hpp -> .inl -> .cpp -> .hpp`).

use std::path::Path;

use crate::domain::errors::ExtensionSetError;

/// Extensions recognized when no configuration overrides them.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".h", ".hpp", ".hh", ".hxx", ".inl", ".c", ".cpp", ".cc", ".cxx", ".m", ".mm",
];

/// Path separators, dots and glob metacharacters; extensions are spliced into search globs.
const FORBIDDEN: &[char] = &['.', '/', '\\', '{', '}', '[', ']', ',', '*', '?', '!'];

/// Ordered, case-insensitive set of companion-file extensions.
///
/// Entries are stored in their declared (canonical) form with a leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    entries: Vec<String>,
}

impl ExtensionSet {
    /// Build a set from declared extensions, with or without leading dots.
    pub fn new<I, S>(declared: I) -> Result<Self, ExtensionSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = Vec::new();
        for raw in declared {
            let trimmed = raw.as_ref().trim();
            let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
            if bare.is_empty()
                || bare.contains(FORBIDDEN)
                || bare.contains(char::is_whitespace)
            {
                return Err(ExtensionSetError::Invalid(trimmed.to_owned()));
            }
            if entries
                .iter()
                .any(|existing| existing[1..].eq_ignore_ascii_case(bare))
            {
                return Err(ExtensionSetError::Duplicate(trimmed.to_owned()));
            }
            entries.push(format!(".{bare}"));
        }

        if entries.is_empty() {
            return Err(ExtensionSetError::Empty);
        }
        Ok(Self { entries })
    }

    /// Number of declared extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared extensions in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Canonical extension for a slot.
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.entries.get(slot).map(String::as_str)
    }

    /// Slot of an extension given with or without its leading dot, compared case-insensitively.
    pub fn slot_of(&self, extension: &str) -> Option<usize> {
        let bare = extension.strip_prefix('.').unwrap_or(extension);
        if bare.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .position(|entry| entry[1..].eq_ignore_ascii_case(bare))
    }

    /// Classify a file by the text after the last `.` of its file name.
    ///
    /// Names such as `.h` have no extension and never classify.
    pub fn classify(&self, path: &Path) -> Option<usize> {
        let extension = path.extension()?.to_str()?;
        self.slot_of(extension)
    }

    /// Bare extensions to hand to a search collaborator: each declared form followed by its
    /// upper-cased form when that differs.
    pub fn search_variants(&self) -> Vec<String> {
        let mut variants = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            let bare = &entry[1..];
            variants.push(bare.to_owned());
            let upper = bare.to_ascii_uppercase();
            if upper != bare {
                variants.push(upper);
            }
        }
        variants
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            entries: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_owned()).collect(),
        }
    }
}
