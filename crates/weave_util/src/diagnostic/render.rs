//! Pretty-printing diagnostics against their source text.
//!
//! Each rendered diagnostic is a severity header, a `-->` location line
//! naming the sink's path, a blank gutter, the annotated source line(s)
//! framed in a box once a span crosses more than one line, and a trailing
//! blank gutter. A span spanning more than six lines elides its middle: the
//! first three and last two lines are shown with a `...` gap between them,
//! so a diagnostic spanning a thousand-line function does not dump the
//! whole function into the terminal.

use std::fmt::Write as _;

use crate::diagnostic::{DiagnosticSink, Handle, Level};
use crate::source::SourceText;
use crate::span::Span;

/// Lines of context shown from the start of a multi-line span before eliding.
const ELIDE_HEAD_LINES: u32 = 3;
/// Lines of context shown from the end of a multi-line span after eliding.
const ELIDE_TAIL_LINES: u32 = 2;
/// A span is only elided once it covers *more than* this many lines; a span
/// of exactly this many lines is still shown in full.
const ELISION_THRESHOLD_LINES: u32 = 6;

/// Render every root diagnostic in `sink` against `source`, stopping after
/// `limit` top-level entries and appending a cutoff notice. The `-->` line
/// of each entry names `sink.path()`.
///
/// # Examples
///
/// ```
/// use weave_util::diagnostic::{DiagnosticSink, Level};
/// use weave_util::diagnostic::render::render_all;
/// use weave_util::source::SourceText;
/// use weave_util::span::{Position, Span};
///
/// let source = SourceText::new("let x = 1\n".to_string()).unwrap();
/// let mut sink = DiagnosticSink::with_path("main.wv");
/// sink.emit(Level::Error, "expected `;`", Span::new(Position(9), Position(9)));
///
/// let rendered = render_all(&sink, &source, 100);
/// assert!(rendered.contains("error: expected `;`"));
/// assert!(rendered.contains("--> main.wv:1:10"));
/// ```
pub fn render_all(sink: &DiagnosticSink, source: &SourceText, limit: usize) -> String {
    let mut out = String::new();
    let mut rendered = 0usize;
    let total = sink.roots().count();

    for handle in sink.roots() {
        if rendered == limit {
            let remaining = total - rendered;
            log::debug!("diagnostic render limit ({limit}) reached, {remaining} message(s) cut off");
            let _ = writeln!(out, "Too many error messages: {remaining}");
            break;
        }
        render_entry(&mut out, sink, source, handle, 0);
        rendered += 1;
    }

    out
}

fn render_entry(out: &mut String, sink: &DiagnosticSink, source: &SourceText, handle: Handle, depth: u32) {
    let entry = sink.entry(handle);
    let indent = "  ".repeat(depth as usize);
    let line_span = source.line_span(entry.span);

    // Part 1: header.
    let _ = writeln!(out, "{indent}{}: {}", entry.level, entry.message);
    // Part 2: location line, naming the sink's path rather than anything on
    // `source` - a source buffer has no notion of where it came from.
    let _ = writeln!(
        out,
        "{indent}        --> {}:{}:{}",
        sink.path(),
        line_span.start.line_one_based(),
        line_span.start.column_one_based()
    );
    // Part 3: blank gutter above the snippet.
    let _ = writeln!(out, "{indent}         |");

    // Parts 4 and 5: source line(s), boxed and elided when multi-line.
    render_snippet(out, source, &indent, entry.span);

    // Part 6: blank gutter below the snippet.
    let _ = writeln!(out, "{indent}         |");

    for child in sink.children(handle) {
        render_entry(out, sink, source, child, depth + 1);
    }
}

fn render_snippet(out: &mut String, source: &SourceText, indent: &str, span: Span) {
    let line_span = source.line_span(span);
    let first = line_span.start.line;
    let last = line_span.end.line;

    if first == last {
        let text = source.line_content_text(first);
        let _ = writeln!(out, "{indent}{:>8} | {}", first + 1, text);
        let width = (line_span.end.column.saturating_sub(line_span.start.column)).max(1) as usize;
        let padding = " ".repeat(line_span.start.column as usize);
        let underline: String = std::iter::repeat('^').take(width).collect();
        let _ = writeln!(out, "{indent}         | {padding}{underline}");
        return;
    }

    // The opening frame bar is only drawn when the span doesn't start at the
    // first column - a span beginning at column 0 has nothing to fence off.
    if line_span.start.column > 0 {
        let dashes: String = std::iter::repeat('-').take(line_span.end.column as usize).collect();
        let _ = writeln!(out, "{indent}         | /{dashes}\\");
    }

    let span_lines = last - first + 1;
    if span_lines <= ELISION_THRESHOLD_LINES {
        for line in first..=last {
            render_framed_line(out, source, indent, line);
        }
    } else {
        for line in first..first + ELIDE_HEAD_LINES {
            render_framed_line(out, source, indent, line);
        }
        let _ = writeln!(out, "{indent}     ... | |");
        for line in (last + 1 - ELIDE_TAIL_LINES)..=last {
            render_framed_line(out, source, indent, line);
        }
    }

    let underline: String = std::iter::repeat('_').take(line_span.end.column as usize).collect();
    let _ = writeln!(out, "{indent}         | |{underline}^");
}

fn render_framed_line(out: &mut String, source: &SourceText, indent: &str, line: u32) {
    let _ = writeln!(out, "{indent}{:>8} | | {}", line + 1, source.line_content_text(line));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticSink;
    use crate::span::{Position, Span};

    #[test]
    fn single_line_span_renders_caret_underline() {
        let source = SourceText::new("let x = 1\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Error, "expected `;`", Span::new(Position(9), Position(9)));

        let rendered = render_all(&sink, &source, 10);
        assert!(rendered.contains("error: expected `;`"));
        assert!(rendered.contains("let x = 1"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn arrow_line_names_the_sinks_path() {
        let source = SourceText::new("let x = 1\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::with_path("main.wv");
        sink.emit(Level::Error, "expected `;`", Span::new(Position(9), Position(9)));

        let rendered = render_all(&sink, &source, 10);
        assert!(rendered.contains("--> main.wv:1:10"));
    }

    #[test]
    fn default_path_placeholder_appears_when_unset() {
        let source = SourceText::new("x\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Error, "oops", Span::point(Position(0)));

        let rendered = render_all(&sink, &source, 10);
        assert!(rendered.contains("--> <source>:1:1"));
    }

    #[test]
    fn multi_line_span_under_elision_threshold_shows_all_lines() {
        let source = SourceText::new("a\nb\nc\nd\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Error, "spans four lines", Span::new(Position(0), Position(7)));

        let rendered = render_all(&sink, &source, 10);
        assert!(!rendered.contains("..."));
    }

    #[test]
    fn multi_line_span_is_framed_in_a_box() {
        let source = SourceText::new("aaaa\nbbbb\ncccc\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::new();
        // Starts at column 2 of line 0, so the opening bar is drawn.
        sink.emit(Level::Error, "spans lines", Span::new(Position(2), Position(13)));

        let rendered = render_all(&sink, &source, 10);
        assert!(rendered.contains("| /"));
        assert!(rendered.contains("| | aaaa"));
        assert!(rendered.contains("| | bbbb"));
        assert!(rendered.contains("| |_"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn multi_line_span_starting_at_column_zero_has_no_opening_bar() {
        let source = SourceText::new("aaaa\nbbbb\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Error, "spans lines", Span::new(Position(0), Position(9)));

        let rendered = render_all(&sink, &source, 10);
        assert!(!rendered.contains("| /"));
    }

    #[test]
    fn multi_line_span_over_elision_threshold_elides_middle() {
        let mut buf = String::new();
        for i in 0..12 {
            buf.push_str(&format!("line{i}\n"));
        }
        let source = SourceText::new(buf.clone()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(
            Level::Error,
            "spans the whole buffer",
            Span::new(Position(0), Position(buf.len() as u32)),
        );

        let rendered = render_all(&sink, &source, 10);
        assert!(rendered.contains("..."));
        assert!(rendered.contains("line0"));
        assert!(rendered.contains("line1"));
        assert!(rendered.contains("line2"));
        assert!(!rendered.contains("line3\n"));
        assert!(rendered.contains("line10"));
        assert!(rendered.contains("line11"));
    }

    #[test]
    fn render_limit_cuts_off_remaining_diagnostics() {
        let source = SourceText::new("a\nb\nc\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Error, "first", Span::point(Position(0)));
        sink.emit(Level::Error, "second", Span::point(Position(2)));
        sink.emit(Level::Error, "third", Span::point(Position(4)));

        let rendered = render_all(&sink, &source, 1);
        assert!(rendered.contains("first"));
        assert!(!rendered.contains("second"));
        assert!(rendered.contains("Too many error messages: 2"));
    }

    #[test]
    fn span_of_exactly_threshold_lines_is_not_elided() {
        let mut buf = String::new();
        for i in 0..6 {
            buf.push_str(&format!("line{i}\n"));
        }
        let source = SourceText::new(buf.clone()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Error, "spans six lines exactly", Span::new(Position(0), Position(buf.len() as u32)));

        let rendered = render_all(&sink, &source, 10);
        assert!(!rendered.contains("..."));
        for i in 0..6 {
            assert!(rendered.contains(&format!("line{i}")));
        }
    }

    #[test]
    fn span_of_one_more_than_threshold_lines_is_elided() {
        let mut buf = String::new();
        for i in 0..7 {
            buf.push_str(&format!("line{i}\n"));
        }
        let source = SourceText::new(buf.clone()).unwrap();
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Error, "spans seven lines", Span::new(Position(0), Position(buf.len() as u32)));

        let rendered = render_all(&sink, &source, 10);
        assert!(rendered.contains("..."));
    }

    #[test]
    fn child_diagnostics_render_indented() {
        let source = SourceText::new("a\n".to_string()).unwrap();
        let mut sink = DiagnosticSink::new();
        let root = sink.emit(Level::Error, "root cause", Span::point(Position(0)));
        sink.emit_child(root, Level::Hint, "see also", Span::point(Position(0)));

        let rendered = render_all(&sink, &source, 10);
        assert!(rendered.contains("root cause"));
        assert!(rendered.contains("see also"));
    }
}
