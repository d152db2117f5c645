//! Loading PHP source trees from disk into a [`SourceSet`](crate::hir::SourceSet).

mod file_loader;
mod workspace_loader;

use std::path::{Path, PathBuf};

use crate::base::FileId;
use crate::hir::Diagnostic;

pub use file_loader::{collect_file_paths, read_source};
pub use workspace_loader::WorkspaceLoader;

/// Which files a [`WorkspaceLoader`] picks up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// File extensions to load, compared case-insensitively, without the dot.
    pub extensions: Vec<String>,
    pub follow_links: bool,
    /// Maximum directory depth below the root; `None` is unlimited.
    pub max_depth: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["php".to_owned()],
            follow_links: false,
            max_depth: None,
        }
    }
}

impl LoaderConfig {
    /// Replace the extensions to load.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Follow symbolic links while walking.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Limit how deep below the root the walk goes.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Whether `path` has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Outcome of loading a directory.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    /// Units loaded, in path order.
    pub files: Vec<FileId>,
    /// Files that could not be read.
    pub failed: Vec<PathBuf>,
    /// Read failures and skipped imports, ordered by file and position.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// Every file loaded and no import was skipped.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.diagnostics.is_empty()
    }
}
