//! Import tables: which aliases are visible to a type, and what they stand for.
//!
//! The extractor asks a [`SourceLocator`] for the text of the unit declaring
//! a type, scans it up to that type's declaration and folds the visible
//! `use` clauses into an [`ImportTable`].

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::ids::TypeIdentity;
use crate::syntax::{parse_use_statements, parse_use_statements_until, ParsedUnit, UseClause};

// ============================================================================
// SOURCE LOCATOR
// ============================================================================

/// Finds the source text of the unit that declares a type.
///
/// `None` is a normal answer (built-in or generated types have no source)
/// and yields an empty import table.
pub trait SourceLocator {
    fn source_text(&self, ty: &TypeIdentity) -> Option<Arc<str>>;
}

impl<T: SourceLocator + ?Sized> SourceLocator for &T {
    fn source_text(&self, ty: &TypeIdentity) -> Option<Arc<str>> {
        (**self).source_text(ty)
    }
}

impl<T: SourceLocator + ?Sized> SourceLocator for Arc<T> {
    fn source_text(&self, ty: &TypeIdentity) -> Option<Arc<str>> {
        (**self).source_text(ty)
    }
}

/// A locator backed by a closure; see [`from_fn`].
#[derive(Clone, Copy, Debug)]
pub struct FromFn<F>(F);

/// Wrap `f` as a [`SourceLocator`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(&TypeIdentity) -> Option<Arc<str>>,
{
    FromFn(f)
}

impl<F> SourceLocator for FromFn<F>
where
    F: Fn(&TypeIdentity) -> Option<Arc<str>>,
{
    fn source_text(&self, ty: &TypeIdentity) -> Option<Arc<str>> {
        (self.0)(ty)
    }
}

// ============================================================================
// IMPORT TABLE
// ============================================================================

/// Alias → fully-qualified name, for the imports visible to one type.
///
/// Iteration follows declaration order. Redeclaring an alias replaces the
/// earlier target and moves the alias to the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportTable {
    entries: IndexMap<SmolStr, SmolStr>,
}

impl ImportTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import `target` under `alias`, replacing any earlier import of that alias.
    pub fn insert(&mut self, alias: impl Into<SmolStr>, target: impl Into<SmolStr>) {
        let alias = alias.into();
        self.entries.shift_remove(&alias);
        self.entries.insert(alias, target.into());
    }

    /// Target imported under `alias`. Matching is case-sensitive.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(SmolStr::as_str)
    }

    /// Whether `alias` is imported.
    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// `(alias, target)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold scanned clauses into a table, later clauses winning.
    pub fn from_clauses<'a>(clauses: impl IntoIterator<Item = &'a UseClause>) -> Self {
        let mut table = Self::new();
        for clause in clauses {
            table.insert(clause.alias.clone(), clause.target.clone());
        }
        table
    }
}

impl<A, T> FromIterator<(A, T)> for ImportTable
where
    A: Into<SmolStr>,
    T: Into<SmolStr>,
{
    fn from_iter<I: IntoIterator<Item = (A, T)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, target) in iter {
            table.insert(alias, target);
        }
        table
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// The import table visible to `ty`.
///
/// Empty when the locator has no source for `ty`, or when the source does
/// not declare it.
pub fn extract(ty: &TypeIdentity, locator: &impl SourceLocator) -> ImportTable {
    let Some(text) = locator.source_text(ty) else {
        debug!(ty = %ty, "no source for type; using empty import table");
        return ImportTable::new();
    };
    extract_from_source(ty, &text)
}

/// Like [`extract`], with the source text already in hand.
pub fn extract_from_source(ty: &TypeIdentity, source: &str) -> ImportTable {
    let qualified_name = ty.qualified_name();
    let unit = parse_use_statements_until(source, &qualified_name);
    match unit.declaration(&qualified_name) {
        Some(decl) => {
            trace!(ty = %ty, imports = decl.imports.len(), "extracted imports");
            ImportTable::from_clauses(&decl.imports)
        }
        None => {
            debug!(ty = %ty, "type not declared in its source unit");
            ImportTable::new()
        }
    }
}

/// Import tables of every type declared in `source`, in declaration order.
///
/// With `until`, scanning stops after that type's declaration.
pub fn import_tables(
    source: &str,
    until: Option<&TypeIdentity>,
) -> IndexMap<TypeIdentity, ImportTable> {
    let unit = match until {
        Some(ty) => parse_use_statements_until(source, &ty.qualified_name()),
        None => parse_use_statements(source),
    };
    tables_of(&unit)
}

fn tables_of(unit: &ParsedUnit) -> IndexMap<TypeIdentity, ImportTable> {
    unit.declarations
        .iter()
        .filter_map(|decl| {
            let ty = TypeIdentity::parse(&decl.qualified_name)?;
            Some((ty, ImportTable::from_clauses(&decl.imports)))
        })
        .collect()
}
