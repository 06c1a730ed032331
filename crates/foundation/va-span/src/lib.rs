//! Source spans and locations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset
    pub start: u32,
    /// Exclusive end offset
    pub end: u32,
}

impl Span {
    /// Creates a span covering `start..end`
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a zero-width span at `offset`
    pub fn empty(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// Byte range for slicing source text
    pub fn range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Length in bytes
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A zero-based row/column position. Columns count bytes, not characters.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Point {
    /// Zero-based line
    pub line: u32,
    /// Zero-based byte column
    pub column: u32,
}

impl Point {
    /// Creates a point from zero-based parts
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Location of a syntax node: byte offset and length plus start/end points.
///
/// Containment is half-open: an offset is inside the node when
/// `offset <= x < offset + len`, so zero-length nodes contain nothing.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct NodeSpan {
    /// Byte offset of the first byte
    pub offset: u32,
    /// Length in bytes
    pub len: u32,
    /// Position of the first byte
    pub start: Point,
    /// Position just past the last byte
    pub end: Point,
}

impl NodeSpan {
    /// Offset just past the last byte
    pub fn end_offset(&self) -> u32 {
        self.offset + self.len
    }

    /// Whether `offset` falls inside `[offset, offset + len)`
    pub fn contains(&self, offset: u32) -> bool {
        self.offset <= offset && offset < self.end_offset()
    }
}

/// Maps byte offsets to line/column points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    /// Indexes the line starts of `text`
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(idx, _)| idx as u32 + 1),
        );
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Position of `offset`; offsets past the end clamp to the end of the text
    pub fn point(&self, offset: u32) -> Point {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Point::new(line as u32, offset - self.line_starts[line])
    }
}
