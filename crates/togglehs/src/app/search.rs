//! Workspace file search used to discover companion candidates.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder, WalkState};

use crate::domain::errors::SearchError;
use crate::domain::extensions::ExtensionSet;
use crate::infra::config::Config;

/// "Any file under the root with this base name and one of these extensions."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    base_name: String,
    extensions: Vec<String>,
}

impl SearchPattern {
    pub fn new(base_name: impl Into<String>, extensions: &ExtensionSet) -> Self {
        Self {
            base_name: base_name.into(),
            extensions: extensions.search_variants(),
        }
    }

    /// Recursive glob of the form `**/<base>.{ext1,ext2,...}`.
    pub fn glob(&self) -> String {
        format!(
            "**/{}.{{{}}}",
            globset::escape(&self.base_name),
            self.extensions.join(",")
        )
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob())
    }
}

/// Read-only collaborator that enumerates files under a project root.
///
/// An empty result is a valid answer. Implementations may instead report
/// [`SearchError::NoMatches`]; callers treat both the same way.
#[async_trait]
pub trait FileSearch: Send + Sync {
    async fn find_files(
        &self,
        pattern: &SearchPattern,
        root: &Path,
    ) -> Result<Vec<PathBuf>, SearchError>;
}

/// Filters applied while walking the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub show_hidden: bool,
    pub respect_gitignore: bool,
    pub ignore_paths: Vec<String>,
    pub ignore_globs: Vec<String>,
}

impl WalkOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            show_hidden: config.search.show_hidden,
            respect_gitignore: config.search.respect_gitignore,
            ignore_paths: config.ignore.paths.clone(),
            ignore_globs: config.ignore.globs.clone(),
        }
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// [`FileSearch`] backed by a gitignore-aware filesystem walk.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceSearch {
    options: WalkOptions,
}

impl WorkspaceSearch {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl FileSearch for WorkspaceSearch {
    async fn find_files(
        &self,
        pattern: &SearchPattern,
        root: &Path,
    ) -> Result<Vec<PathBuf>, SearchError> {
        let glob = pattern.glob();
        let root = root.to_path_buf();
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || walk(&glob, &root, &options))
            .await
            .map_err(|err| SearchError::Walk(err.to_string()))?
    }
}

fn walk(glob: &str, root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>, SearchError> {
    if !root.is_dir() {
        return Err(SearchError::InvalidRoot(root.to_path_buf()));
    }

    let matcher = compile(glob)?;
    let ignore = Arc::new(build_ignore_matcher(options)?);

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(!options.show_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false);

    let walk_root = root.to_path_buf();
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 {
            return true;
        }
        let rel = entry.path().strip_prefix(&walk_root).unwrap_or(entry.path());
        !ignore.should_skip(rel)
    });

    let found = Mutex::new(Vec::new());
    builder.build_parallel().run(|| {
        let found = &found;
        let matcher = &matcher;
        Box::new(move |result| match result {
            Ok(entry) if is_match(&entry, root, matcher) => record(found, entry.into_path()),
            Ok(_) => WalkState::Continue,
            Err(err) => {
                tracing::warn!(error = %err, "workspace search error");
                WalkState::Continue
            }
        })
    });

    let mut found = found
        .into_inner()
        .map_err(|err| SearchError::Walk(err.to_string()))?;
    found.sort();
    tracing::debug!(pattern = glob, root = %root.display(), matches = found.len(), "workspace search finished");
    Ok(found)
}

fn compile(glob: &str) -> Result<GlobMatcher, SearchError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|err| SearchError::InvalidPattern {
            pattern: glob.to_owned(),
            message: err.to_string(),
        })
}

/// Push a hit. A poisoned list stops the walk; draining it afterwards reports the failure.
fn record(found: &Mutex<Vec<PathBuf>>, path: PathBuf) -> WalkState {
    match found.lock() {
        Ok(mut guard) => {
            guard.push(path);
            WalkState::Continue
        }
        Err(_) => {
            tracing::warn!(path = %path.display(), "search results lock poisoned");
            WalkState::Quit
        }
    }
}

fn is_match(entry: &DirEntry, root: &Path, matcher: &GlobMatcher) -> bool {
    // Links are not followed, so a symlinked file is checked through its target.
    let is_file = match entry.file_type() {
        Some(kind) if kind.is_symlink() => entry.path().is_file(),
        Some(kind) => kind.is_file(),
        None => false,
    };
    if !is_file {
        return false;
    }
    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    matcher.is_match(rel)
}

#[derive(Debug, Clone)]
struct IgnoreMatcher {
    globs: GlobSet,
}

impl IgnoreMatcher {
    fn should_skip(&self, rel: &Path) -> bool {
        self.globs.is_match(rel)
    }
}

fn build_ignore_matcher(options: &WalkOptions) -> Result<IgnoreMatcher, SearchError> {
    let mut builder = GlobSetBuilder::new();

    let expanded = options
        .ignore_paths
        .iter()
        .flat_map(|pattern| expand_dir_pattern(pattern));
    for pattern in expanded.chain(options.ignore_globs.iter().cloned()) {
        let glob = Glob::new(&pattern).map_err(|err| SearchError::InvalidPattern {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;
        builder.add(glob);
    }

    let globs = builder.build().map_err(|err| SearchError::InvalidPattern {
        pattern: "ignore rules".to_owned(),
        message: err.to_string(),
    })?;
    Ok(IgnoreMatcher { globs })
}

fn expand_dir_pattern(raw: &str) -> Vec<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Vec::new();
    }
    vec![
        trimmed.to_owned(),
        format!("{trimmed}/**"),
        format!("**/{trimmed}"),
        format!("**/{trimmed}/**"),
    ]
}
