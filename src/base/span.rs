//! Source positions: byte ranges and line/column lookup.

use std::fmt;

pub use text_size::TextRange;
pub use text_size::TextSize;

/// A 0-indexed line and column, displayed 1-indexed.
///
/// Columns count UTF-8 bytes, matching the offsets produced by the lexer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// 1-indexed line number, as an editor shows it.
    #[inline]
    pub const fn display_line(self) -> u32 {
        self.line + 1
    }

    /// 1-indexed column number, as an editor shows it.
    #[inline]
    pub const fn display_col(self) -> u32 {
        self.col + 1
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.display_line(), self.display_col())
    }
}

/// Maps byte offsets of one source unit to line/column positions.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    /// Index the line starts of `text`.
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
            )
            .collect();

        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Position of `offset`. Offsets past the end clamp to the last byte.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);

        LineCol {
            line: line as u32,
            col: (offset - self.line_starts[line]).into(),
        }
    }

    /// Start and end positions of `range`.
    pub fn range(&self, range: TextRange) -> (LineCol, LineCol) {
        (self.line_col(range.start()), self.line_col(range.end()))
    }

    /// Number of lines, counting a trailing empty line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_displays_one_indexed() {
        assert_eq!(LineCol::new(0, 0).to_string(), "1:1");
        assert_eq!(LineCol::new(3, 7).to_string(), "4:8");
    }

    #[test]
    fn test_line_index_php_header() {
        let text = "<?php\nnamespace A;\nuse B\\C;\n";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(6)), LineCol::new(1, 0));
        assert_eq!(index.line_col(TextSize::from(23)), LineCol::new(2, 4));
    }

    #[test]
    fn test_line_index_range() {
        let text = "<?php\nuse Foo;";
        let index = LineIndex::new(text);
        let range = TextRange::new(TextSize::from(6), TextSize::from(14));

        assert_eq!(index.range(range), (LineCol::new(1, 0), LineCol::new(1, 8)));
    }

    #[test]
    fn test_line_index_clamps_past_end() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.line_col(TextSize::from(99)), LineCol::new(1, 2));
    }
}
