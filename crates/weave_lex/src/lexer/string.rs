//! String and character literal scanning: raw forms, encoding prefixes,
//! and escape sequence expansion.
//!
//! String values are built as raw bytes rather than `&str` - a `\xHH` byte
//! escape can produce a value above `0x7F` that on its own is not valid
//! UTF-8, and the lexer has no business rejecting it before a later stage
//! decides what encoding the literal actually means.

use weave_util::diagnostic::{DiagnosticSink, Level};
use weave_util::span::Position;

use super::comment::at_newline_start;
use super::{byte_at, Scanned};
use crate::arena::LexerArena;
use crate::cursor::Cursor;
use crate::token::{CharLiteral, LiteralEncoding, LiteralPayload, StringLiteral, TokenKind};
use crate::unicode::{codepoint_to_char, parse_hex_codepoint};

const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

enum Escape {
    Byte(u8),
    Char(char),
}

/// Decode one escape sequence, with the cursor positioned just past the
/// backslash. Bad input is recovered by substituting the replacement
/// character (or, for `\x`, stopping short) and reporting a diagnostic; the
/// caller always gets a value back and keeps scanning.
fn scan_escape(cursor: &mut Cursor, sink: &mut DiagnosticSink, escape_start: Position) -> Escape {
    if !cursor.is_valid() {
        sink.emit(Level::Error, "unterminated escape sequence", cursor.get_span_to_current(escape_start));
        return Escape::Char(REPLACEMENT_CHARACTER);
    }

    let marker = cursor.peek();
    match marker {
        '0' => {
            cursor.advance();
            Escape::Char('\0')
        }
        'a' => {
            cursor.advance();
            Escape::Char('\u{07}')
        }
        'b' => {
            cursor.advance();
            Escape::Char('\u{08}')
        }
        'f' => {
            cursor.advance();
            Escape::Char('\u{0C}')
        }
        'n' => {
            cursor.advance();
            Escape::Char('\n')
        }
        'r' => {
            cursor.advance();
            Escape::Char('\r')
        }
        't' => {
            cursor.advance();
            Escape::Char('\t')
        }
        'v' => {
            cursor.advance();
            Escape::Char('\u{0B}')
        }
        '\\' => {
            cursor.advance();
            Escape::Char('\\')
        }
        '\'' => {
            cursor.advance();
            Escape::Char('\'')
        }
        '"' => {
            cursor.advance();
            Escape::Char('"')
        }
        '$' => {
            cursor.advance();
            Escape::Char('$')
        }
        'x' => {
            cursor.advance();
            let digits_start = cursor.position();
            let n = cursor.skip_max_if(2, |c| c.is_ascii_hexdigit());
            if n == 2 {
                let text = &cursor.source()[digits_start.as_usize()..cursor.position().as_usize()];
                Escape::Byte(u8::from_str_radix(text, 16).expect("two hex digits parse as a byte"))
            } else {
                sink.emit(Level::Error, "hex escape requires exactly two hex digits", cursor.get_span_to_current(escape_start));
                Escape::Char(REPLACEMENT_CHARACTER)
            }
        }
        'u' => {
            cursor.advance();
            if !cursor.first('{') {
                sink.emit(Level::Error, "unicode escape must open with `{`", cursor.get_span_to_current(escape_start));
                return Escape::Char(REPLACEMENT_CHARACTER);
            }
            let digits_start = cursor.position();
            let n = cursor.skip_max_if(8, |c| c.is_ascii_hexdigit());
            let text = &cursor.source()[digits_start.as_usize()..cursor.position().as_usize()];
            let closed = cursor.first('}');
            if n == 0 || !closed {
                sink.emit(Level::Error, "unicode escape is missing its closing `}`", cursor.get_span_to_current(escape_start));
                return Escape::Char(REPLACEMENT_CHARACTER);
            }
            match parse_hex_codepoint(text).and_then(codepoint_to_char) {
                Some(ch) => Escape::Char(ch),
                None => {
                    sink.emit(Level::Error, format!("`{text}` is not a valid codepoint"), cursor.get_span_to_current(escape_start));
                    Escape::Char(REPLACEMENT_CHARACTER)
                }
            }
        }
        other => {
            cursor.advance();
            sink.emit(Level::Error, format!("unknown escape sequence `\\{other}`"), cursor.get_span_to_current(escape_start));
            Escape::Char(REPLACEMENT_CHARACTER)
        }
    }
}

fn push_escape(bytes: &mut Vec<u8>, escape: Escape) {
    match escape {
        Escape::Byte(b) => bytes.push(b),
        Escape::Char(c) => {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
}

/// A non-raw string literal, starting at the opening quote. Strings may
/// embed newlines; only running off the end of the source is unterminated.
pub(crate) fn scan_string<'a>(cursor: &mut Cursor<'a>, arena: &'a LexerArena, sink: &mut DiagnosticSink, encoding: LiteralEncoding) -> Scanned<'a> {
    let literal_start = cursor.position();
    cursor.first('"');
    let mut bytes = Vec::new();

    loop {
        if cursor.is_end() {
            sink.emit(Level::Error, "unterminated string literal", cursor.get_span_to_current(literal_start));
            break;
        }
        if cursor.peek() == '"' {
            cursor.first('"');
            break;
        }
        if cursor.peek() == '\\' {
            let escape_start = cursor.position();
            cursor.advance();
            let escape = scan_escape(cursor, sink, escape_start);
            push_escape(&mut bytes, escape);
            continue;
        }
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(cursor.peek().encode_utf8(&mut buf).as_bytes());
        cursor.advance();
    }

    let value = arena.alloc_bytes(&bytes);
    Scanned { kind: TokenKind::StringLiteral, payload: Some(LiteralPayload::String(StringLiteral { encoding, value })) }
}

/// A raw string, `r"..."` or `r#"..."#`. The caller has already consumed the
/// leading `r` and counted `hashes` `#`s that follow it but has not yet
/// consumed them - this scans past those hashes, the opening quote, the
/// body, and the matching `"` + `hashes` `#`s that close it.
pub(crate) fn scan_raw_string<'a>(cursor: &mut Cursor<'a>, arena: &'a LexerArena, sink: &mut DiagnosticSink, hashes: usize) -> Scanned<'a> {
    let literal_start = cursor.position();
    for _ in 0..hashes {
        cursor.first('#');
    }
    cursor.first('"');
    let body_start = cursor.position();

    loop {
        if cursor.is_end() {
            sink.emit(Level::Error, "unterminated raw string literal", cursor.get_span_to_current(literal_start));
            let text = &cursor.source()[body_start.as_usize()..cursor.position().as_usize()];
            let value = arena.alloc_bytes(text.as_bytes());
            return Scanned { kind: TokenKind::StringLiteral, payload: Some(LiteralPayload::String(StringLiteral { encoding: LiteralEncoding::Default, value })) };
        }
        if cursor.peek() == '"' {
            let body_end = cursor.position();
            let checkpoint = cursor.position();
            cursor.first('"');
            let matched = cursor.skip_max_if(hashes, |c| c == '#');
            if matched == hashes {
                let text = &cursor.source()[body_start.as_usize()..body_end.as_usize()];
                let value = arena.alloc_bytes(text.as_bytes());
                return Scanned { kind: TokenKind::StringLiteral, payload: Some(LiteralPayload::String(StringLiteral { encoding: LiteralEncoding::Default, value })) };
            }
            cursor.reset_to(checkpoint);
            cursor.advance();
            continue;
        }
        cursor.advance();
    }
}

fn read_char_unit(cursor: &mut Cursor, sink: &mut DiagnosticSink) -> char {
    if cursor.peek() == '\\' {
        let escape_start = cursor.position();
        cursor.advance();
        match scan_escape(cursor, sink, escape_start) {
            Escape::Char(c) => c,
            Escape::Byte(b) => b as char,
        }
    } else {
        let ch = cursor.peek();
        cursor.advance();
        ch
    }
}

/// A character literal, starting at the opening quote. Exactly one
/// codepoint is expected between the quotes.
pub(crate) fn scan_char<'a>(cursor: &mut Cursor<'a>, sink: &mut DiagnosticSink, encoding: LiteralEncoding) -> Scanned<'a> {
    let literal_start = cursor.position();
    cursor.first('\'');

    if cursor.is_valid() && cursor.peek() == '\'' {
        let span = cursor.get_span_to_current(literal_start);
        cursor.first('\'');
        sink.emit(Level::Error, "empty character literal", span);
        return Scanned { kind: TokenKind::CharLiteral, payload: Some(LiteralPayload::Char(CharLiteral { encoding, value: REPLACEMENT_CHARACTER })) };
    }

    if cursor.is_end() || at_newline_start(cursor) {
        sink.emit(Level::Error, "unterminated character literal", cursor.get_span_to_current(literal_start));
        return Scanned { kind: TokenKind::CharLiteral, payload: Some(LiteralPayload::Char(CharLiteral { encoding, value: REPLACEMENT_CHARACTER })) };
    }

    let value = read_char_unit(cursor, sink);

    if cursor.is_valid() && cursor.peek() == '\'' {
        cursor.first('\'');
        return Scanned { kind: TokenKind::CharLiteral, payload: Some(LiteralPayload::Char(CharLiteral { encoding, value })) };
    }

    if cursor.is_end() || at_newline_start(cursor) {
        sink.emit(Level::Error, "unterminated character literal", cursor.get_span_to_current(literal_start));
    } else {
        while cursor.is_valid() && cursor.peek() != '\'' && !at_newline_start(cursor) {
            cursor.advance();
        }
        if cursor.is_valid() && cursor.peek() == '\'' {
            cursor.first('\'');
        }
        sink.emit(Level::Error, "character literal contains more than one codepoint", cursor.get_span_to_current(literal_start));
    }
    Scanned { kind: TokenKind::CharLiteral, payload: Some(LiteralPayload::Char(CharLiteral { encoding, value })) }
}

/// Probe for an encoding-prefixed string or character literal - `u8"`,
/// `u"`, `U"`, `u8'`, `u'`, `U'`. These spellings overlap with a plain
/// identifier named `u`, `u8`, or `U`, so this has to run, and succeed or
/// fail, before the generic identifier scanner commits to consuming `u`.
pub(crate) fn try_scan_encoded_literal<'a>(cursor: &mut Cursor<'a>, arena: &'a LexerArena, sink: &mut DiagnosticSink) -> Option<Scanned<'a>> {
    if !cursor.is_valid() {
        return None;
    }
    let is_quote = |b: Option<u8>| matches!(b, Some(b'"') | Some(b'\''));
    let prefix_len = if cursor.peek() == 'u' && byte_at(cursor, 1) == Some(b'8') && is_quote(byte_at(cursor, 2)) {
        2
    } else if (cursor.peek() == 'u' || cursor.peek() == 'U') && is_quote(byte_at(cursor, 1)) {
        1
    } else {
        return None;
    };

    let prefix_text = &cursor.source()[cursor.position().as_usize()..cursor.position().as_usize() + prefix_len];
    let encoding = LiteralEncoding::from_prefix(prefix_text).expect("prefix_len was computed from a recognized prefix");

    for _ in 0..prefix_len {
        cursor.advance();
    }

    Some(match cursor.peek() {
        '"' => scan_string(cursor, arena, sink, encoding),
        '\'' => scan_char(cursor, sink, encoding),
        _ => unreachable!("prefix lookahead already confirmed a quote follows"),
    })
}
