//! # use-statements
//!
//! Resolves short or aliased PHP type names, as written inside a class-like
//! declaration, to fully-qualified names using the `use` imports visible to
//! that declaration.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → load PHP trees from disk
//!   ↓
//! ide     → UseStatements query facade (import_table, expand_class_name)
//!   ↓
//! hir     → TypeIdentity, ImportTable, extraction, expansion, SourceSet
//!   ↓
//! syntax  → logos lexer + import scanner
//!   ↓
//! base    → FileId, text ranges, line index
//! ```

/// Foundation types: FileId, TextRange, LineIndex
pub mod base;

/// Tokenizer and import scanner
pub mod syntax;

/// Type identities, import tables and name expansion
pub mod hir;

/// Query facade for tooling
pub mod ide;

/// Loading source trees from disk
pub mod project;

pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use hir::{
    expand, extract, ExpandError, ImportTable, SourceLocator, SourceSet, TypeIdentity,
};
pub use ide::UseStatements;
pub use project::{LoadError, LoadReport, LoaderConfig, WorkspaceLoader};
