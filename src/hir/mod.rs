//! Semantic layer: type identities, import tables and name expansion.
//!
//! ```text
//! SourceLocator ──source text──▶ extract ──ImportTable──▶ expand
//! ```
//!
//! The expander never calls back into the extractor; fetch a table once per
//! type and reuse it for as many expansions as needed.

mod diagnostics;
mod ids;
mod imports;
mod resolve;
mod source;

pub use diagnostics::{check_imports, codes, Diagnostic, DiagnosticCollector, Severity};
pub use ids::{TypeIdentity, SEPARATOR};
pub use imports::{
    extract, extract_from_source, from_fn, import_tables, FromFn, ImportTable, SourceLocator,
};
pub use resolve::{expand, expand_with, BuiltinType, ExpandError, ReservedName};
pub use source::SourceSet;

