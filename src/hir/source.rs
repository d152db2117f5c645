//! In-memory set of PHP source units, indexed by the types they declare.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::ids::TypeIdentity;
use super::imports::SourceLocator;
use crate::base::FileId;
use crate::syntax::parse_use_statements;

/// Paths, contents and declared types of loaded source units.
///
/// Acts as the [`SourceLocator`] for everything it holds: a type maps to the
/// unit with the lowest [`FileId`] among those declaring it.
#[derive(Debug, Default)]
pub struct SourceSet {
    inner: RwLock<SourceSetInner>,
}

#[derive(Debug, Default)]
struct SourceSetInner {
    path_to_id: IndexMap<PathBuf, FileId>,
    id_to_path: IndexMap<FileId, PathBuf>,
    contents: IndexMap<FileId, Arc<str>>,
    /// Types declared by each unit, in declaration order.
    declared: IndexMap<FileId, Vec<TypeIdentity>>,
    types: FxHashMap<TypeIdentity, FileId>,
    next_id: u32,
}

impl SourceSetInner {
    /// Forget the types `file` declares; each one it owned passes to the next
    /// unit still declaring it.
    fn unindex(&mut self, file: FileId) {
        for ty in self.declared.swap_remove(&file).unwrap_or_default() {
            if self.types.get(&ty) != Some(&file) {
                continue;
            }
            match self.next_owner(&ty) {
                Some(owner) => {
                    self.types.insert(ty, owner);
                }
                None => {
                    self.types.remove(&ty);
                }
            }
        }
    }

    fn next_owner(&self, ty: &TypeIdentity) -> Option<FileId> {
        self.declared
            .iter()
            .filter(|(_, types)| types.contains(ty))
            .map(|(&file, _)| file)
            .min()
    }

    fn claim(&mut self, ty: TypeIdentity, file: FileId) {
        let owner = self.types.entry(ty).or_insert(file);
        if file < *owner {
            *owner = file;
        }
    }
}

impl SourceSet {
    /// Create a new empty source set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the id for `path`.
    pub fn file_id(&self, path: &Path) -> FileId {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        let mut inner = self.inner.write();
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.id_to_path.insert(id, path.to_owned());
        id
    }

    /// Register `path` with `contents` in one step.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Arc<str>>) -> FileId {
        let id = self.file_id(path.as_ref());
        self.set_contents(id, contents);
        id
    }

    /// Path registered for `file`.
    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().id_to_path.get(&file).cloned()
    }

    /// Replace the contents of `file` and re-index the types it declares.
    ///
    /// A type declared by several units belongs to the one with the lowest id.
    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) {
        let contents = contents.into();
        let declared: Vec<TypeIdentity> = parse_use_statements(&contents)
            .declarations
            .iter()
            .filter_map(|decl| TypeIdentity::parse(&decl.qualified_name))
            .collect();

        let mut inner = self.inner.write();
        inner.unindex(file);
        for ty in &declared {
            inner.claim(ty.clone(), file);
        }
        inner.declared.insert(file, declared);
        inner.contents.insert(file, contents);
    }

    /// Current contents of `file`, if set.
    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// The unit declaring `ty`, if any.
    pub fn file_for_type(&self, ty: &TypeIdentity) -> Option<FileId> {
        self.inner.read().types.get(ty).copied()
    }

    /// Types declared by `file`, in declaration order.
    pub fn declared_types(&self, file: FileId) -> Vec<TypeIdentity> {
        self.inner
            .read()
            .declared
            .get(&file)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop `file` with its path and contents; its types pass to other units declaring them.
    pub fn remove(&self, file: FileId) {
        let mut inner = self.inner.write();
        if let Some(path) = inner.id_to_path.swap_remove(&file) {
            inner.path_to_id.swap_remove(&path);
        }
        inner.contents.swap_remove(&file);
        inner.unindex(file);
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All file ids, in registration order.
    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().id_to_path.keys().copied().collect()
    }
}

impl SourceLocator for SourceSet {
    fn source_text(&self, ty: &TypeIdentity) -> Option<Arc<str>> {
        let inner = self.inner.read();
        let file = inner.types.get(ty)?;
        inner.contents.get(file).cloned()
    }
}
