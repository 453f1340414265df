//! Git integration utilities.

use std::path::{Path, PathBuf};

/// Lightweight wrapper around [`gix::Repository`] discovery used to locate the project root.
#[derive(Default)]
pub struct GitClient {
    repo: Option<gix::Repository>,
}

impl GitClient {
    /// Attempt to locate a git repository enclosing `path`, which may be a file.
    pub fn discover(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let start = if path.is_dir() { Some(path) } else { path.parent() };
        let repo = start.and_then(|dir| gix::discover(dir).ok());
        Self { repo }
    }

    /// Work tree of the discovered repository, if any. Bare repositories have none.
    pub fn work_tree(&self) -> Option<PathBuf> {
        let repo = self.repo.as_ref()?;
        repo.work_dir().map(Path::to_path_buf)
    }
}

/// Project root for `path`: the enclosing git work tree, if there is one.
pub fn project_root(path: &Path) -> Option<PathBuf> {
    let root = GitClient::discover(path).work_tree()?;
    Some(std::fs::canonicalize(&root).unwrap_or(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_repository_means_no_root() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("foo.cpp");
        std::fs::write(&file, b"")?;
        // tempdirs normally live outside any repository; skip if this one does not.
        if GitClient::discover(temp.path()).work_tree().is_none() {
            assert!(project_root(&file).is_none());
        }
        Ok(())
    }
}
