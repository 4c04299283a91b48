//! Byte ranges into the parsed source.

use serde::Serialize;

/// A half-open byte range `start..end` into the source a tree was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `offset`.
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based line and column of `start` within `source`.
    ///
    /// Columns count characters, not bytes. Offsets past the end of
    /// `source` are clamped to its length.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut offset = self.start.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |p| p + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    /// The source text covered by this span, if it lies on char boundaries.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_first_line() {
        assert_eq!(Span::point(0).line_col("<a/>"), (1, 1));
        assert_eq!(Span::point(3).line_col("<a/>"), (1, 4));
    }

    #[test]
    fn test_line_col_after_newlines() {
        let source = "<a>\n  <b/>\n</a>";
        assert_eq!(Span::point(6).line_col(source), (2, 3));
        assert_eq!(Span::point(11).line_col(source), (3, 1));
    }

    #[test]
    fn test_line_col_clamps_past_end() {
        assert_eq!(Span::point(100).line_col("ab"), (1, 3));
    }

    #[test]
    fn test_line_col_counts_chars() {
        // 'é' is two bytes
        let source = "<é/>";
        assert_eq!(Span::point(3).line_col(source), (1, 3));
    }

    #[test]
    fn test_slice_and_len() {
        let span = Span::new(1, 4);
        assert_eq!(span.slice("<abc/>"), Some("abc"));
        assert_eq!(span.len(), 3);
        assert!(Span::point(2).is_empty());
    }
}
