use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, warn};

use super::{file_loader, LoadError, LoadReport, LoaderConfig};
use crate::base::FileId;
use crate::hir::{check_imports, Diagnostic, DiagnosticCollector, SourceSet};

/// Loads PHP files from disk into a [`SourceSet`].
#[derive(Clone, Debug, Default)]
pub struct WorkspaceLoader {
    config: LoaderConfig,
}

impl WorkspaceLoader {
    /// Create a loader with the default [`LoaderConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with `config`.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load every matching file below `dir`.
    ///
    /// Files are read and checked in parallel. A file that cannot be read is
    /// reported and skipped; only a missing or unwalkable directory fails
    /// the whole load.
    pub fn load_directory(
        &self,
        dir: impl AsRef<Path>,
        sources: &SourceSet,
    ) -> Result<LoadReport, LoadError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LoadError::DirectoryNotFound(dir.to_owned()));
        }

        // Ids are assigned up front so they follow path order.
        let paths = file_loader::collect_file_paths(dir, &self.config)?;
        let files: Vec<(FileId, &Path)> = paths
            .iter()
            .map(|path| (sources.file_id(path), path.as_path()))
            .collect();

        let results: Vec<_> = files
            .par_iter()
            .map(|&(file, path)| {
                let loaded = file_loader::read_source(path).map(|text| {
                    let diagnostics = check_imports(file, &text);
                    (text, diagnostics)
                });
                (file, path, loaded)
            })
            .collect();

        let mut report = LoadReport::default();
        let mut collector = DiagnosticCollector::new();
        for (file, path, loaded) in results {
            match loaded {
                Ok((text, diagnostics)) => {
                    sources.set_contents(file, text);
                    collector.extend(diagnostics);
                    report.files.push(file);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable source file");
                    collector.add(Diagnostic::error(file, err.to_string()));
                    report.failed.push(path.to_owned());
                }
            }
        }
        report.diagnostics = collector.finish();

        debug!(
            dir = %dir.display(),
            loaded = report.files.len(),
            failed = report.failed.len(),
            "loaded source directory"
        );
        Ok(report)
    }

    /// Load a single file, whatever its extension.
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        sources: &SourceSet,
    ) -> Result<FileId, LoadError> {
        let path = path.as_ref();
        let text = file_loader::read_source(path)?;
        let file = sources.file_id(path);
        sources.set_contents(file, text);
        Ok(file)
    }
}
