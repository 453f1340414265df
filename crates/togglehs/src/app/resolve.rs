//! Companion resolution: classify, search, rank.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::rank::{RankedCandidate, Ranker};
use crate::app::search::{FileSearch, SearchPattern};
use crate::domain::errors::{SearchError, ToggleError};
use crate::domain::extensions::ExtensionSet;
use crate::domain::model::{DocumentLocation, FileRef};

/// The chosen companion along with the full ranking it was picked from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    pub reference: FileRef,
    pub path: PathBuf,
    pub ranking: Vec<RankedCandidate>,
}

/// Outcome of a resolution that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Companion),
    /// The active file's extension is not in the [`ExtensionSet`]; no search was issued.
    UnsupportedFileType { path: PathBuf },
    /// The search ran and produced no usable candidate.
    NoCompanionFound { base_name: String },
}

impl Resolution {
    /// Collapse negative results into the matching [`ToggleError`].
    pub fn into_companion(self) -> Result<Companion, ToggleError> {
        match self {
            Self::Found(companion) => Ok(companion),
            Self::UnsupportedFileType { path } => Err(ToggleError::UnsupportedFileType { path }),
            Self::NoCompanionFound { base_name } => {
                Err(ToggleError::NoCompanionFound { base_name })
            }
        }
    }
}

/// Finds the best companion for a document under one project root.
#[derive(Debug, Clone)]
pub struct CompanionResolver<S> {
    extensions: Arc<ExtensionSet>,
    search: S,
    root: PathBuf,
}

impl<S: FileSearch> CompanionResolver<S> {
    pub fn new(extensions: Arc<ExtensionSet>, search: S, root: impl Into<PathBuf>) -> Self {
        Self {
            extensions,
            search,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the companion of `location` with a single search.
    ///
    /// Non-local documents fail with [`ToggleError::UnsupportedScheme`] before anything else;
    /// search failures other than "nothing matched" propagate as
    /// [`ToggleError::SearchFailure`].
    pub async fn resolve(&self, location: &DocumentLocation) -> Result<Resolution, ToggleError> {
        let path = location.local_path()?;

        let Some(reference) = FileRef::from_path(path, &self.extensions) else {
            tracing::debug!(path = %path.display(), "not a header/source file");
            return Ok(Resolution::UnsupportedFileType {
                path: path.to_path_buf(),
            });
        };

        let pattern = SearchPattern::new(reference.base_name.clone(), &self.extensions);
        tracing::debug!(
            reference = %reference.path.display(),
            pattern = %pattern,
            root = %self.root.display(),
            "looking for companion"
        );

        let found = match self.search.find_files(&pattern, &self.root).await {
            Ok(found) => found,
            Err(SearchError::NoMatches { .. }) => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let candidates = self.candidates(&reference, found);
        let ranking = Ranker::new(&self.extensions).rank(&reference, candidates);
        log_ranking(&ranking);

        match ranking.first() {
            Some(best) => {
                let path = best.file.path.clone();
                tracing::info!(companion = %path.display(), "resolved companion");
                Ok(Resolution::Found(Companion {
                    reference,
                    path,
                    ranking,
                }))
            }
            None => Ok(Resolution::NoCompanionFound {
                base_name: reference.base_name,
            }),
        }
    }

    /// Turn raw search hits into candidates.
    ///
    /// Hits outside the extension family or with a different base name are dropped, as is the
    /// reference file itself.
    fn candidates(&self, reference: &FileRef, found: Vec<PathBuf>) -> Vec<FileRef> {
        found
            .into_iter()
            .filter(|path| path != &reference.path)
            .filter_map(|path| match FileRef::from_path(&path, &self.extensions) {
                Some(file) if file.base_name == reference.base_name => Some(file),
                _ => {
                    tracing::debug!(path = %path.display(), "ignoring search hit");
                    None
                }
            })
            .collect()
    }
}

fn log_ranking(ranking: &[RankedCandidate]) {
    match ranking {
        [] => tracing::debug!("no matches found"),
        [only] => tracing::debug!(path = %only.file.path.display(), "only found one match"),
        _ => {
            tracing::debug!(count = ranking.len(), "found matches");
            for (index, candidate) in ranking.iter().enumerate() {
                tracing::debug!(
                    index,
                    affinity = candidate.affinity,
                    priority = candidate.priority,
                    path = %candidate.file.path.display(),
                    "candidate"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Canned search collaborator recording the patterns it was asked for.
    #[derive(Default)]
    struct StubSearch {
        response: Mutex<Option<Result<Vec<PathBuf>, SearchError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubSearch {
        fn returning(paths: &[&str]) -> Self {
            let found = paths.iter().map(PathBuf::from).collect();
            Self {
                response: Mutex::new(Some(Ok(found))),
                calls: Mutex::default(),
            }
        }

        fn failing(err: SearchError) -> Self {
            Self {
                response: Mutex::new(Some(Err(err))),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl FileSearch for StubSearch {
        async fn find_files(
            &self,
            pattern: &SearchPattern,
            _root: &Path,
        ) -> Result<Vec<PathBuf>, SearchError> {
            self.calls.lock().expect("calls lock").push(pattern.glob());
            self.response
                .lock()
                .expect("response lock")
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn resolver(search: StubSearch) -> CompanionResolver<StubSearch> {
        CompanionResolver::new(Arc::new(ExtensionSet::default()), search, "/proj")
    }

    fn local(path: &str) -> DocumentLocation {
        DocumentLocation::File(PathBuf::from(path))
    }

    #[tokio::test]
    async fn prefers_the_closest_directory() -> Result<(), ToggleError> {
        let resolver = resolver(StubSearch::returning(&[
            "/proj/include/foo.h",
            "/proj/src/foo.hpp",
        ]));

        let companion = resolver
            .resolve(&local("/proj/src/foo.cpp"))
            .await?
            .into_companion()?;

        assert_eq!(companion.path, PathBuf::from("/proj/src/foo.hpp"));
        assert_eq!(companion.ranking[0].affinity, 2);
        assert_eq!(companion.ranking[1].affinity, 1);
        Ok(())
    }

    #[tokio::test]
    async fn equal_affinity_uses_priority_chain() -> Result<(), ToggleError> {
        let resolver = resolver(StubSearch::returning(&["/proj/a/foo.cc", "/proj/a/foo.cpp"]));

        let companion = resolver
            .resolve(&local("/proj/a/foo.h"))
            .await?
            .into_companion()?;

        assert_eq!(companion.path, PathBuf::from("/proj/a/foo.cpp"));
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_extension_skips_search() -> Result<(), ToggleError> {
        let search = StubSearch::returning(&["/proj/x.h"]);
        let resolver = resolver(search);

        let resolution = resolver.resolve(&local("/proj/x.txt")).await?;

        assert_eq!(
            resolution,
            Resolution::UnsupportedFileType {
                path: PathBuf::from("/proj/x.txt")
            }
        );
        assert!(resolver.search.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn empty_search_is_no_companion_found() -> Result<(), ToggleError> {
        let resolver = resolver(StubSearch::returning(&[]));

        let resolution = resolver.resolve(&local("/proj/src/foo.cpp")).await?;

        assert_eq!(
            resolution,
            Resolution::NoCompanionFound {
                base_name: "foo".into()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn no_matches_failure_is_no_companion_found() -> Result<(), ToggleError> {
        let resolver = resolver(StubSearch::failing(SearchError::NoMatches {
            pattern: "**/foo.{h}".into(),
        }));

        let resolution = resolver.resolve(&local("/proj/src/foo.cpp")).await?;

        assert!(matches!(resolution, Resolution::NoCompanionFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn other_search_failures_propagate() {
        let resolver = resolver(StubSearch::failing(SearchError::Walk("disk on fire".into())));

        let result = resolver.resolve(&local("/proj/src/foo.cpp")).await;

        assert!(matches!(
            result,
            Err(ToggleError::SearchFailure(SearchError::Walk(_)))
        ));
    }

    #[tokio::test]
    async fn remote_documents_are_rejected_before_searching() {
        let resolver = resolver(StubSearch::returning(&["/proj/foo.h"]));
        let location = DocumentLocation::parse("vscode-remote://ssh/proj/foo.cpp");

        let result = resolver.resolve(&location).await;

        assert!(matches!(result, Err(ToggleError::UnsupportedScheme { .. })));
        assert!(resolver.search.calls().is_empty());
    }

    #[tokio::test]
    async fn issues_one_search_for_the_base_name() -> Result<(), ToggleError> {
        let resolver = resolver(StubSearch::returning(&["/proj/foo.h"]));

        resolver.resolve(&local("/proj/foo.cpp")).await?;

        let calls = resolver.search.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("**/foo.{h,H,hpp,HPP"));
        Ok(())
    }

    #[tokio::test]
    async fn reference_itself_and_foreign_hits_are_not_candidates() -> Result<(), ToggleError> {
        let resolver = resolver(StubSearch::returning(&[
            "/proj/src/foo.cpp",
            "/proj/src/foo.txt",
            "/proj/src/Foo.h",
            "/proj/include/foo.h",
        ]));

        let companion = resolver
            .resolve(&local("/proj/src/foo.cpp"))
            .await?
            .into_companion()?;

        assert_eq!(companion.path, PathBuf::from("/proj/include/foo.h"));
        assert_eq!(companion.ranking.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn same_extension_elsewhere_is_a_last_resort() -> Result<(), ToggleError> {
        let resolver = resolver(StubSearch::returning(&[
            "/proj/a/foo.cpp",
            "/proj/a/foo.h",
        ]));

        let companion = resolver
            .resolve(&local("/proj/a/b/foo.cpp"))
            .await?
            .into_companion()?;

        assert_eq!(companion.path, PathBuf::from("/proj/a/foo.h"));
        assert_eq!(companion.ranking[1].file.path, PathBuf::from("/proj/a/foo.cpp"));
        Ok(())
    }
}
