//! Trivia scanning: whitespace, newlines, and line/block comments.

use weave_util::diagnostic::{DiagnosticSink, Level};

use crate::cursor::Cursor;
use crate::token::{Trivia, TriviaKind};
use crate::unicode::is_whitespace_not_newline;

/// Whether the cursor sits at the start of a line terminator (`\n` or
/// `\r\n`). A lone `\r` is whitespace, not a line break, so this peeks one
/// byte past a `\r` rather than treating it as conclusive on its own.
pub(crate) fn at_newline_start(cursor: &Cursor) -> bool {
    let pos = cursor.position().as_usize();
    let bytes = cursor.source().as_bytes();
    match bytes.get(pos) {
        Some(b'\n') => true,
        Some(b'\r') => bytes.get(pos + 1) == Some(&b'\n'),
        _ => false,
    }
}

fn consume_any(cursor: &mut Cursor) -> bool {
    cursor.first_if(|_| true)
}

fn consume_until_newline_or_end(cursor: &mut Cursor) {
    loop {
        if cursor.is_end() || at_newline_start(cursor) {
            break;
        }
        if !consume_any(cursor) {
            break;
        }
    }
}

/// A run of non-newline whitespace: space, tab, vertical tab, form feed, or
/// a lone `\r`.
pub(crate) fn scan_whitespace(cursor: &mut Cursor) -> Trivia {
    cursor.start();
    loop {
        if at_newline_start(cursor) {
            break;
        }
        if !cursor.first_if(is_whitespace_not_newline) {
            break;
        }
    }
    Trivia { kind: TriviaKind::Whitespace, span: cursor.get_span() }
}

/// A single `\n` or `\r\n`.
pub(crate) fn scan_newline(cursor: &mut Cursor) -> Trivia {
    cursor.start();
    if !cursor.starts_with("\r\n") {
        cursor.first('\n');
    }
    Trivia { kind: TriviaKind::NewLine, span: cursor.get_span() }
}

fn line_comment_is_doc(cursor: &Cursor) -> bool {
    let pos = cursor.position().as_usize();
    let bytes = cursor.source().as_bytes();
    bytes.get(pos) == Some(&b'/')
        && bytes.get(pos + 1) == Some(&b'/')
        && bytes.get(pos + 2) == Some(&b'/')
        && bytes.get(pos + 3) != Some(&b'/')
}

/// `//` (or `///` doc) to end of line, not including the terminator.
pub(crate) fn scan_line_comment(cursor: &mut Cursor) -> Trivia {
    cursor.start();
    let is_doc = line_comment_is_doc(cursor);
    cursor.first('/');
    cursor.first('/');
    if is_doc {
        cursor.first('/');
    }
    consume_until_newline_or_end(cursor);
    let kind = if is_doc { TriviaKind::SingleLineDocumentation } else { TriviaKind::SingleLineComment };
    Trivia { kind, span: cursor.get_span() }
}

fn block_comment_is_doc(cursor: &Cursor) -> bool {
    let pos = cursor.position().as_usize();
    let bytes = cursor.source().as_bytes();
    bytes.get(pos) == Some(&b'/')
        && bytes.get(pos + 1) == Some(&b'*')
        && bytes.get(pos + 2) == Some(&b'*')
        && bytes.get(pos + 3) != Some(&b'*')
}

/// `/* ... */` (or `/** ... */` doc), with nesting. An unmatched `/*` at
/// end-of-input is reported once and consumes to end-of-buffer; the trivia
/// piece covering it is tagged `TriviaKind::Error` so a caller can tell a
/// recovered comment apart from a clean one without re-walking diagnostics.
pub(crate) fn scan_block_comment(cursor: &mut Cursor, sink: &mut DiagnosticSink) -> Trivia {
    cursor.start();
    let is_doc = block_comment_is_doc(cursor);
    cursor.first('/');
    cursor.first('*');
    if is_doc {
        cursor.first('*');
    }

    let mut depth: u32 = 1;
    let mut nested = false;
    loop {
        if cursor.is_end() {
            let span = cursor.get_span();
            sink.emit(Level::Error, "unterminated block comment", span);
            return Trivia { kind: TriviaKind::Error, span };
        }
        if cursor.starts_with("*/") {
            depth -= 1;
            if depth == 0 {
                if nested {
                    log::debug!("block comment closed at span {:?} after nesting", cursor.get_span());
                }
                break;
            }
            continue;
        }
        if cursor.starts_with("/*") {
            depth += 1;
            nested = true;
            continue;
        }
        if !consume_any(cursor) {
            break;
        }
    }
    let kind = if is_doc { TriviaKind::MultiLineDocumentation } else { TriviaKind::MultiLineComment };
    Trivia { kind, span: cursor.get_span() }
}
