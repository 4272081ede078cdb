//! Source positions and line/column mapping.
//!
//! Positions are offsets in Unicode scalar values from the start of the
//! source text. The lexer scans a `Vec<char>`, so its token positions are
//! in the same units; `LineMap` is built over the same units so reported
//! columns always agree with token positions.

use std::fmt;
use std::ops::Range;

/// A position in source text.
pub type TextPos = u32;

/// A half-open range in source text: `pos` inclusive, `end` exclusive.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }

    /// An empty range at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos < self.end
    }

    /// Whether `other` lies entirely within this range.
    #[inline]
    pub fn encloses(&self, other: TextRange) -> bool {
        self.pos <= other.pos && other.end <= self.end
    }

    /// The smallest range covering both.
    pub fn union(&self, other: TextRange) -> TextRange {
        TextRange::new(self.pos.min(other.pos), self.end.max(other.end))
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

/// A resolved line/column pair. Both are 1-based, which is what the
/// error type reports to callers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Maps positions to line/column pairs.
///
/// Built once per source text; lookup is a binary search over line start
/// offsets.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        let mut offset = 0u32;
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            offset += 1;
            match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        offset += 1;
                    }
                    line_starts.push(offset);
                }
                '\n' | '\u{2028}' | '\u{2029}' => line_starts.push(offset),
                _ => {}
            }
        }
        Self { line_starts }
    }

    /// 0-based line containing `pos`.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// 1-based line/column of `pos`.
    pub fn line_col(&self, pos: TextPos) -> LineCol {
        let line = self.line_of(pos);
        let start = self.line_starts[line as usize];
        LineCol { line: line + 1, column: pos - start + 1 }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_union_and_enclose() {
        let outer = TextRange::new(2, 20);
        let inner = TextRange::new(5, 9);
        assert!(outer.encloses(inner));
        assert_eq!(outer.union(inner), outer);
        assert_eq!(inner.union(TextRange::new(0, 3)), TextRange::new(0, 9));
    }

    #[test]
    fn line_map_basic() {
        let map = LineMap::new("ab\ncd\nef");
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_col(0), LineCol { line: 1, column: 1 });
        assert_eq!(map.line_col(4), LineCol { line: 2, column: 2 });
        assert_eq!(map.line_col(6), LineCol { line: 3, column: 1 });
    }

    #[test]
    fn line_map_crlf_counts_one_break() {
        let map = LineMap::new("a\r\nb");
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.line_col(3), LineCol { line: 2, column: 1 });
    }
}
