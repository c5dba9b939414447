use serde::{Deserialize, Serialize};

/// Byte-offset span in the analyzed source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A value annotated with its source span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn dummy(node: T) -> Self {
        Self { node, span: Span::dummy() }
    }
}

/// Maps byte offsets to 1-based line numbers.
///
/// Built once per source text; lookups binary-search the precomputed
/// line-start table.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        (line + 1) as u32
    }

    /// 1-based (line, column) of `offset`.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let col = offset - self.line_starts[line];
        ((line + 1) as u32, (col + 1) as u32)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Span tests =====

    #[test]
    fn test_span_new() {
        let span = Span::new(10, 20);
        assert_eq!(span.start, 10);
        assert_eq!(span.end, 20);
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(3, 8);
        let b = Span::new(6, 14);
        assert_eq!(a.merge(b), Span::new(3, 14));
        assert_eq!(b.merge(a), Span::new(3, 14));
    }

    #[test]
    fn test_span_merge_disjoint() {
        let a = Span::new(0, 2);
        let b = Span::new(10, 12);
        assert_eq!(a.merge(b), Span::new(0, 12));
    }

    #[test]
    fn test_span_dummy() {
        let span = Span::dummy();
        assert_eq!(span.start, 0);
        assert_eq!(span.end, 0);
    }

    // ===== Spanned tests =====

    #[test]
    fn test_spanned_new() {
        let span = Span::new(5, 10);
        let spanned = Spanned::new(42, span);
        assert_eq!(spanned.node, 42);
        assert_eq!(spanned.span, span);
    }

    #[test]
    fn test_spanned_dummy() {
        let spanned = Spanned::dummy("hello");
        assert_eq!(spanned.node, "hello");
        assert_eq!(spanned.span, Span::dummy());
    }

    #[test]
    fn test_spanned_roundtrip() {
        let spanned = Spanned::new("test".to_string(), Span::new(5, 10));
        let json = serde_json::to_string(&spanned).unwrap();
        let back: Spanned<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(spanned, back);
    }

    // ===== LineIndex tests =====

    #[test]
    fn test_line_index_single_line() {
        let idx = LineIndex::new("hello");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(4), 1);
        assert_eq!(idx.line_count(), 1);
    }

    #[test]
    fn test_line_index_multi_line() {
        let idx = LineIndex::new("ab\ncd\nef");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(2), 1);
        assert_eq!(idx.line_of(3), 2);
        assert_eq!(idx.line_of(5), 2);
        assert_eq!(idx.line_of(6), 3);
        assert_eq!(idx.line_count(), 3);
    }

    #[test]
    fn test_line_col() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(1), (1, 2));
        assert_eq!(idx.line_col(3), (2, 1));
        assert_eq!(idx.line_col(4), (2, 2));
    }

    #[test]
    fn test_line_index_empty() {
        let idx = LineIndex::new("");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_count(), 1);
    }
}
