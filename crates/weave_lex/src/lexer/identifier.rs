//! Identifiers, keywords, and the raw string/identifier prefix bucket.
//!
//! Classification precedence puts "raw string/identifier prefix" ahead of
//! plain identifiers: `r"..."`, `r#"..."#`, and `r#ident` all start with the
//! same byte a plain identifier named `r` would, so the disambiguation has
//! to happen by lookahead before any of it is consumed.

use weave_util::diagnostic::DiagnosticSink;
use weave_util::interner::Interner;

use super::{byte_at, char_at, string, Scanned};
use crate::arena::LexerArena;
use crate::cursor::Cursor;
use crate::token::{keyword_from_str, LiteralPayload, TokenKind};
use crate::unicode::{is_ident_continue, is_ident_start};

/// Attempt the raw-prefixed forms. Returns `None`, with the cursor
/// untouched, if the current position is not `r"`, `r#"`/`r##"`/..., or
/// `r#` followed by an identifier-start codepoint.
pub(crate) fn try_scan_raw<'a>(
    cursor: &mut Cursor<'a>,
    arena: &'a LexerArena,
    interner: &dyn Interner,
    sink: &mut DiagnosticSink,
) -> Option<Scanned<'a>> {
    if !cursor.is_valid() || cursor.peek() != 'r' {
        return None;
    }
    match byte_at(cursor, 1) {
        Some(b'"') => {
            cursor.first('r');
            Some(string::scan_raw_string(cursor, arena, sink, 0))
        }
        Some(b'#') => {
            let mut hashes = 0usize;
            while byte_at(cursor, 1 + hashes) == Some(b'#') {
                hashes += 1;
            }
            if byte_at(cursor, 1 + hashes) == Some(b'"') {
                cursor.first('r');
                Some(string::scan_raw_string(cursor, arena, sink, hashes))
            } else if hashes == 1 && char_at(cursor, 2).map(is_ident_start).unwrap_or(false) {
                cursor.first('r');
                cursor.first('#');
                Some(scan_raw_identifier(cursor, interner))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn scan_raw_identifier<'a>(cursor: &mut Cursor<'a>, interner: &dyn Interner) -> Scanned<'a> {
    let start = cursor.position();
    cursor.first_if(is_ident_start);
    cursor.skip_if(is_ident_continue);
    let text = &cursor.source()[start.as_usize()..cursor.position().as_usize()];
    let symbol = interner.intern(text.as_bytes());
    Scanned { kind: TokenKind::Identifier, payload: Some(LiteralPayload::Identifier(symbol)) }
}

/// A plain identifier or keyword. The caller must already have ruled out
/// the raw-prefix and string/char encoding-prefix buckets.
pub(crate) fn scan_identifier_or_keyword<'a>(cursor: &mut Cursor<'a>, interner: &dyn Interner) -> Scanned<'a> {
    let start = cursor.position();
    cursor.first_if(is_ident_start);
    cursor.skip_if(is_ident_continue);
    let text = &cursor.source()[start.as_usize()..cursor.position().as_usize()];
    match keyword_from_str(text) {
        Some(kind) => Scanned { kind, payload: None },
        None => {
            let symbol = interner.intern(text.as_bytes());
            Scanned { kind: TokenKind::Identifier, payload: Some(LiteralPayload::Identifier(symbol)) }
        }
    }
}
