//! The query facade: import tables and class-name expansion per type.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::hir::{
    expand_with, extract, import_tables, ExpandError, ImportTable, SourceLocator, TypeIdentity,
};

/// Answers `import_table` and `expand_class_name` queries for types whose
/// source a [`SourceLocator`] can find.
///
/// ```ignore
/// use use_statements::{SourceSet, TypeIdentity, UseStatements};
///
/// let sources = SourceSet::new();
/// sources.add_file("Bar.php", "<?php namespace App; use Lib\\Util as U; class Bar {}");
///
/// let uses = UseStatements::new(sources);
/// let bar = TypeIdentity::parse("App\\Bar").unwrap();
/// assert_eq!(uses.expand_class_name("U\\Str", &bar)?, "Lib\\Util\\Str");
/// ```
#[derive(Debug)]
pub struct UseStatements<L> {
    locator: L,
    cache: Option<ImportCache>,
}

/// Read-through cache of import tables.
///
/// Entries are only ever added, never replaced, so a table handed out once
/// is the table handed out forever.
#[derive(Debug, Default)]
struct ImportCache {
    tables: RwLock<FxHashMap<TypeIdentity, Arc<ImportTable>>>,
}

impl ImportCache {
    fn get(&self, ty: &TypeIdentity) -> Option<Arc<ImportTable>> {
        self.tables.read().get(ty).cloned()
    }

    fn contains(&self, ty: &TypeIdentity) -> bool {
        self.tables.read().contains_key(ty)
    }

    /// Store every table found in one scan and return the one for `ty`.
    fn populate(
        &self,
        ty: &TypeIdentity,
        found: IndexMap<TypeIdentity, ImportTable>,
    ) -> Arc<ImportTable> {
        let mut tables = self.tables.write();
        for (declared, table) in found {
            tables.entry(declared).or_insert_with(|| Arc::new(table));
        }
        tables.entry(ty.clone()).or_default().clone()
    }

    fn len(&self) -> usize {
        self.tables.read().len()
    }
}

impl<L: SourceLocator> UseStatements<L> {
    /// A facade that caches every import table it computes.
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            cache: Some(ImportCache::default()),
        }
    }

    /// A facade that rescans the source on every query.
    pub fn uncached(locator: L) -> Self {
        Self {
            locator,
            cache: None,
        }
    }

    /// The locator queries are answered from.
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Import aliases visible to `ty`; empty when it has no source.
    pub fn import_table(&self, ty: &TypeIdentity) -> Arc<ImportTable> {
        let Some(cache) = &self.cache else {
            return Arc::new(extract(ty, &self.locator));
        };

        if let Some(table) = cache.get(ty) {
            trace!(ty = %ty, "import table cache hit");
            return table;
        }

        trace!(ty = %ty, "import table cache miss");
        let Some(text) = self.locator.source_text(ty) else {
            debug!(ty = %ty, "no source for type; using empty import table");
            return cache.populate(ty, IndexMap::new());
        };
        let found = import_tables(&text, Some(ty))
            .into_iter()
            .filter(|(declared, _)| declared == ty || self.located_in(cache, declared, &text))
            .collect();
        cache.populate(ty, found)
    }

    /// Whether the locator hands out `text` for `declared`, so its table from
    /// this scan is the one a direct query would compute.
    fn located_in(&self, cache: &ImportCache, declared: &TypeIdentity, text: &Arc<str>) -> bool {
        !cache.contains(declared)
            && self
                .locator
                .source_text(declared)
                .is_some_and(|other| Arc::ptr_eq(&other, text))
    }

    /// Fully-qualified form of `reference` as written inside `ty`.
    pub fn expand_class_name(
        &self,
        reference: &str,
        ty: &TypeIdentity,
    ) -> Result<String, ExpandError> {
        expand_with(reference, ty, || self.import_table(ty))
    }

    /// Number of types with a cached table.
    pub fn cached_types(&self) -> usize {
        self.cache.as_ref().map_or(0, ImportCache::len)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::hir::{from_fn, SourceSet};

    const UNIT: &str = r"<?php
namespace App;
use Lib\Util as U;
class First {}
use Lib\Later;
class Second {}
class Third {}
";

    fn ty(name: &str) -> TypeIdentity {
        TypeIdentity::parse(name).unwrap()
    }

    #[test]
    fn test_expand_through_facade() {
        let sources = SourceSet::new();
        sources.add_file("/App.php", UNIT);
        let uses = UseStatements::new(&sources);

        assert_eq!(uses.expand_class_name("U\\Str", &ty("App\\First")).unwrap(), "Lib\\Util\\Str");
        assert_eq!(uses.expand_class_name("Later", &ty("App\\First")).unwrap(), "App\\Later");
        assert_eq!(uses.expand_class_name("Later", &ty("App\\Second")).unwrap(), "Lib\\Later");
        assert_eq!(uses.expand_class_name("self", &ty("App\\Third")).unwrap(), "App\\Third");
    }

    #[test]
    fn test_one_scan_fills_earlier_types() {
        let reads = Cell::new(0);
        let text: Arc<str> = Arc::from(UNIT);
        let uses = UseStatements::new(from_fn(|_: &TypeIdentity| {
            reads.set(reads.get() + 1);
            Some(text.clone())
        }));

        // One read for Second, one to confirm First lives in the same unit.
        let second = uses.import_table(&ty("App\\Second"));
        assert_eq!(second.len(), 2);
        assert_eq!(reads.get(), 2);
        assert_eq!(uses.cached_types(), 2);

        assert_eq!(uses.import_table(&ty("App\\First")).len(), 1);
        assert_eq!(reads.get(), 2);

        // Types already cached are not looked up again.
        assert_eq!(uses.import_table(&ty("App\\Third")).len(), 2);
        assert_eq!(reads.get(), 3);
    }

    #[test]
    fn test_type_owned_by_another_unit_is_not_cached_from_this_scan() {
        let sources = SourceSet::new();
        sources.add_file("/one.php", "<?php use One\\Dep; class Shared {}");
        sources.add_file("/two.php", "<?php use Two\\Dep; class Shared {} class Tail {}");

        let cached = UseStatements::new(&sources);
        let uncached = UseStatements::uncached(&sources);

        assert_eq!(cached.import_table(&ty("Tail")).get("Dep"), Some("Two\\Dep"));
        assert_eq!(cached.cached_types(), 1);
        assert_eq!(cached.import_table(&ty("Shared")).get("Dep"), Some("One\\Dep"));
        assert_eq!(
            cached.import_table(&ty("Shared")),
            uncached.import_table(&ty("Shared"))
        );
    }

    #[test]
    fn test_cached_table_is_shared() {
        let sources = SourceSet::new();
        sources.add_file("/App.php", UNIT);
        let uses = UseStatements::new(sources);

        let a = uses.import_table(&ty("App\\First"));
        let b = uses.import_table(&ty("App\\First"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_uncached_rescans() {
        let reads = Cell::new(0);
        let uses = UseStatements::uncached(from_fn(|_: &TypeIdentity| {
            reads.set(reads.get() + 1);
            Some(Arc::from(UNIT))
        }));

        uses.import_table(&ty("App\\First"));
        uses.import_table(&ty("App\\First"));
        assert_eq!(reads.get(), 2);
        assert_eq!(uses.cached_types(), 0);
    }

    #[test]
    fn test_reserved_names_do_not_touch_source() {
        let reads = Cell::new(0);
        let uses = UseStatements::new(from_fn(|_: &TypeIdentity| {
            reads.set(reads.get() + 1);
            None
        }));
        let foo = ty("Test\\Space\\Foo");

        assert_eq!(uses.expand_class_name("$this", &foo).unwrap(), "Test\\Space\\Foo");
        assert_eq!(uses.expand_class_name("Array", &foo).unwrap(), "array");
        assert_eq!(uses.expand_class_name("\\Absolute", &foo).unwrap(), "Absolute");
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn test_type_without_source() {
        let uses = UseStatements::new(SourceSet::new());
        let std_class = ty("stdClass");

        assert!(uses.import_table(&std_class).is_empty());
        assert_eq!(uses.expand_class_name("Foo", &std_class).unwrap(), "Foo");
        assert_eq!(uses.cached_types(), 1);
    }
}
