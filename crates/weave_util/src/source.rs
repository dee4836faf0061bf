//! Source text and line-offset indexing.
//!
//! [`SourceText`] owns one immutable buffer and a monotone vector of line
//! start offsets, built once up front so that offset-to-line-column lookups
//! (used constantly by the diagnostic renderer) are a binary search instead
//! of a rescan.

use crate::error::{SourceError, SourceResult};
use crate::span::{LinePosition, LineSpan, Position, Span};

/// An immutable, validated, line-indexed source buffer.
///
/// # Examples
///
/// ```
/// use weave_util::source::SourceText;
///
/// let text = SourceText::new("fn main() {}\n".to_string()).unwrap();
/// assert_eq!(text.line_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SourceText {
    buffer: String,
    /// Byte offset of the start of each line. Always starts with `0` and is
    /// strictly increasing; has one more entry than there are newlines.
    line_starts: Vec<u32>,
}

impl SourceText {
    /// Validate `buffer` as UTF-8 (it already is, being a `String`, so this
    /// always succeeds) and index its lines.
    ///
    /// A line break is exactly `"\n"` or `"\r\n"`; a lone `"\r"` is not a
    /// line terminator and is treated as ordinary content.
    pub fn new(buffer: String) -> SourceResult<SourceText> {
        let line_starts = compute_line_starts(&buffer);
        Ok(SourceText { buffer, line_starts })
    }

    /// Validate and index raw bytes, surfacing a [`SourceError::InvalidUtf8`]
    /// with the offset of the first bad byte if decoding fails.
    pub fn from_bytes(bytes: Vec<u8>) -> SourceResult<SourceText> {
        let buffer = String::from_utf8(bytes).map_err(|e| SourceError::InvalidUtf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        })?;
        SourceText::new(buffer)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of lines, counting a trailing unterminated line as one line.
    /// An empty buffer has exactly one (empty) line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Span covering `line` (zero-based) including its terminator, or running
    /// to end-of-buffer for the final line.
    pub fn line(&self, line: u32) -> Span {
        let start = self.line_starts[line as usize];
        let end = self
            .line_starts
            .get(line as usize + 1)
            .copied()
            .unwrap_or(self.buffer.len() as u32);
        Span::new(Position(start), Position(end))
    }

    /// Span covering `line` (zero-based) excluding its terminator.
    pub fn line_content(&self, line: u32) -> Span {
        let full = self.line(line);
        let raw = &self.buffer[full.start.as_usize()..full.end.as_usize()];
        let stripped_len = raw
            .strip_suffix("\r\n")
            .map(str::len)
            .or_else(|| raw.strip_suffix('\n').map(str::len))
            .unwrap_or(raw.len());
        Span::new(full.start, Position(full.start.0 + stripped_len as u32))
    }

    /// Byte slice for `line` (zero-based), including its terminator.
    pub fn line_text(&self, line: u32) -> &str {
        let span = self.line(line);
        &self.buffer[span.start.as_usize()..span.end.as_usize()]
    }

    /// Byte slice for `line` (zero-based), excluding its terminator.
    pub fn line_content_text(&self, line: u32) -> &str {
        let span = self.line_content(line);
        &self.buffer[span.start.as_usize()..span.end.as_usize()]
    }

    /// Byte slice covering `span`. Debug-asserts `span.end` is within bounds.
    pub fn text(&self, span: Span) -> &str {
        debug_assert!(span.end.as_usize() <= self.buffer.len(), "span exceeds buffer length");
        &self.buffer[span.start.as_usize()..span.end.as_usize()]
    }

    /// Convert a byte offset to a zero-based line/column position.
    ///
    /// Uses a binary search over the monotone `line_starts` table (the
    /// largest line whose start is `<= offset`).
    ///
    /// # Examples
    ///
    /// ```
    /// use weave_util::source::SourceText;
    /// use weave_util::span::Position;
    ///
    /// let text = SourceText::new("ab\ncd\n".to_string()).unwrap();
    /// let pos = text.line_position(Position(4));
    /// assert_eq!(pos.line, 1);
    /// assert_eq!(pos.column, 1);
    /// ```
    pub fn line_position(&self, offset: Position) -> LinePosition {
        let offset = offset.0;
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insertion) => insertion - 1,
        };
        let column = offset - self.line_starts[line];
        LinePosition::new(line as u32, column)
    }

    /// Convert a [`Span`] to a pair of line/column positions.
    pub fn line_span(&self, span: Span) -> LineSpan {
        LineSpan { start: self.line_position(span.start), end: self.line_position(span.end) }
    }

    /// Byte offset where `line` starts.
    pub fn line_start_offset(&self, line: u32) -> Position {
        Position(self.line_starts[line as usize])
    }
}

/// Compute the offsets where each line begins.
///
/// Only `"\n"` and `"\r\n"` count as terminators; a lone `"\r"` does not end
/// a line.
fn compute_line_starts(buffer: &str) -> Vec<u32> {
    let bytes = buffer.as_bytes();
    let mut starts = vec![0u32];
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            starts.push((i + 1) as u32);
        }
        i += 1;
    }
    starts
}
