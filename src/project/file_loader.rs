use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{LoadError, LoaderConfig};

/// All files under `dir` the config selects, sorted by path.
pub fn collect_file_paths(
    dir: &Path,
    config: &LoaderConfig,
) -> Result<Vec<PathBuf>, LoadError> {
    let mut walker = WalkDir::new(dir)
        .follow_links(config.follow_links)
        .sort_by_file_name();
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && config.matches(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Read `path` as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })
}
