//! Diagnostics for import declarations the scanner had to skip.
//!
//! Skipping is never an error for resolution itself. Tooling that loads a
//! workspace still wants to tell the user which `use` statements were
//! ignored, and where.

use std::sync::Arc;

use crate::base::{FileId, LineIndex};
use crate::syntax::{parse_use_statements, SyntaxError};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A positioned message about one source unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: FileId,
    /// Start line (0-indexed).
    pub start_line: u32,
    /// Start column (0-indexed, bytes).
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub severity: Severity,
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// An error about the unit as a whole, positioned at its start.
    pub fn error(file: FileId, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(file, 0, 0, message)
        }
    }

    /// A warning at one position; widen it with [`Diagnostic::with_span`].
    pub fn warning(file: FileId, line: u32, col: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
            severity: Severity::Warning,
            code: None,
            message: message.into(),
        }
    }

    /// Set where the diagnostic ends.
    pub fn with_span(mut self, end_line: u32, end_col: u32) -> Self {
        self.end_line = end_line;
        self.end_col = end_col;
        self
    }

    /// Attach a code from [`codes`].
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Build the warning for a skipped import statement.
    pub fn malformed_import(file: FileId, line_index: &LineIndex, error: &SyntaxError) -> Self {
        let (start, end) = line_index.range(error.range);
        Self::warning(file, start.line, start.col, error.to_string())
            .with_span(end.line, end.col)
            .with_code(codes::MALFORMED_IMPORT)
    }
}

pub mod codes {
    /// A `use` statement was skipped because it could not be parsed.
    pub const MALFORMED_IMPORT: &str = "W0001";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record every diagnostic in `diagnostics`.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Diagnostics in the order they were added.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics ordered by file, then position.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|d| (d.file, d.start_line, d.start_col));
        self.diagnostics
    }

    /// Number of diagnostics collected.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Warnings for every import statement in `source` the scanner skipped.
pub fn check_imports(file: FileId, source: &str) -> Vec<Diagnostic> {
    let unit = parse_use_statements(source);
    if unit.errors.is_empty() {
        return Vec::new();
    }
    let line_index = LineIndex::new(source);
    unit.errors
        .iter()
        .map(|error| Diagnostic::malformed_import(file, &line_index, error))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_source_has_no_diagnostics() {
        let source = "<?php\nuse A\\B;\nclass C {}\n";
        assert!(check_imports(FileId::new(0), source).is_empty());
    }

    #[test]
    fn test_malformed_import_position() {
        let source = "<?php\nuse Ok\\One;\nuse Broken as ;\nclass C {}\n";
        let diagnostics = check_imports(FileId::new(4), source);

        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.file, FileId::new(4));
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code.as_deref(), Some(codes::MALFORMED_IMPORT));
        assert_eq!((diag.start_line, diag.start_col), (2, 0));
        assert_eq!(diag.end_line, 2);
        assert!(diag.message.contains("alias"));
    }

    #[test]
    fn test_collector_orders_by_position() {
        let mut collector = DiagnosticCollector::new();
        collector.add(Diagnostic::warning(FileId::new(1), 0, 0, "b"));
        collector.add(Diagnostic::warning(FileId::new(0), 5, 2, "a2"));
        collector.add(Diagnostic::warning(FileId::new(0), 1, 0, "a1"));

        let messages: Vec<_> = collector
            .finish()
            .into_iter()
            .map(|d| d.message.to_string())
            .collect();
        assert_eq!(messages, ["a1", "a2", "b"]);
    }
}
