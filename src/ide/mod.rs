//! Query APIs for tooling built on top of the semantic layer.
//!
//! [`UseStatements`] is the entry point: point it at a
//! [`SourceLocator`](crate::hir::SourceLocator) and ask for import tables or
//! class-name expansions per type.

mod use_statements;

pub use use_statements::UseStatements;
