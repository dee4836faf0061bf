//! The top-level scanning loop: leading trivia, one significant lexeme,
//! trailing trivia, repeat.

use std::fmt::Write as _;

use weave_util::diagnostic::{DiagnosticSink, Level};
use weave_util::interner::Interner;
use weave_util::span::Span;

use super::{byte_at, comment, identifier, number, operator, string, Scanned};
use crate::arena::LexerArena;
use crate::cursor::Cursor;
use crate::token::{Token, TokenKind, Trivia, TriviaKind, TriviaRange};
use crate::unicode::is_ident_start;

/// How much trivia a [`Lexer`] keeps attached to the tokens it produces.
/// Every mode still scans and skips the same trivia; the difference is
/// purely which pieces survive into a token's leading/trailing ranges, so a
/// span walk over `source[token.span.start..token.span.end]` plus kept
/// trivia always adds back up to the exact slice of source it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaMode {
    /// Discard every trivia piece; tokens carry only empty ranges.
    None,
    /// Keep only documentation comments (`///`, `/** */`).
    Documentation,
    /// Keep everything: whitespace, newlines, comments, documentation.
    All,
}

fn trivia_is_kept(mode: TriviaMode, kind: TriviaKind) -> bool {
    match mode {
        TriviaMode::All => true,
        TriviaMode::None => false,
        TriviaMode::Documentation => kind.is_documentation(),
    }
}

/// Whether trivia starts at the cursor's current position, without
/// consuming anything.
fn trivia_ahead(cursor: &Cursor) -> bool {
    if cursor.is_end() {
        return false;
    }
    if comment::at_newline_start(cursor) {
        return true;
    }
    if crate::unicode::is_whitespace_not_newline(cursor.peek()) {
        return true;
    }
    cursor.peek() == '/' && matches!(byte_at(cursor, 1), Some(b'/') | Some(b'*'))
}

fn scan_one_trivia_piece(cursor: &mut Cursor, sink: &mut DiagnosticSink) -> Trivia {
    if comment::at_newline_start(cursor) {
        return comment::scan_newline(cursor);
    }
    if crate::unicode::is_whitespace_not_newline(cursor.peek()) {
        return comment::scan_whitespace(cursor);
    }
    match byte_at(cursor, 1) {
        Some(b'*') => comment::scan_block_comment(cursor, sink),
        _ => comment::scan_line_comment(cursor),
    }
}

/// Consume a run of trivia into `out` (subject to `mode`'s filter). When
/// `stop_before_newline` is set, a newline is left for the caller rather
/// than consumed - this is what makes trailing trivia end right before the
/// line break, with the break itself becoming the next token's leading
/// trivia.
fn scan_trivia_run(cursor: &mut Cursor, sink: &mut DiagnosticSink, mode: TriviaMode, stop_before_newline: bool, out: &mut Vec<Trivia>) {
    loop {
        if !trivia_ahead(cursor) {
            break;
        }
        if stop_before_newline && comment::at_newline_start(cursor) {
            break;
        }
        let piece = scan_one_trivia_piece(cursor, sink);
        if trivia_is_kept(mode, piece.kind) {
            out.push(piece);
        }
    }
}

/// Scans a source buffer into a stream of [`Token`]s.
///
/// Built on top of [`Cursor`]; everything it touches goes through the
/// cursor's scanning primitives plus the per-lexeme `scan_*` functions in
/// this module's sibling submodules. Literal payload text is allocated out
/// of `arena`, identifiers are interned through `interner`, and every
/// diagnostic lands in `sink` rather than a return value - lexing never
/// stops at the first error.
///
/// Two lifetimes: `'a` is the arena's (and therefore every produced
/// `Token<'a>`'s) lifetime; `'b` covers `interner` and `sink`, borrowed only
/// for as long as this `Lexer` value exists. Keeping them distinct means a
/// caller can go on using `sink` (e.g. to render diagnostics) right after
/// the lexer is dropped, even while the tokens it produced are still alive.
pub struct Lexer<'a, 'b> {
    cursor: Cursor<'a>,
    arena: &'a LexerArena,
    interner: &'b dyn Interner,
    sink: &'b mut DiagnosticSink,
    mode: TriviaMode,
    trivia: Vec<Trivia>,
    done: bool,
}

impl<'a, 'b> Lexer<'a, 'b> {
    pub fn new(source: &'a str, arena: &'a LexerArena, interner: &'b dyn Interner, sink: &'b mut DiagnosticSink, mode: TriviaMode) -> Lexer<'a, 'b> {
        Lexer { cursor: Cursor::new(source), arena, interner, sink, mode, trivia: Vec::new(), done: false }
    }

    /// Every trivia piece scanned so far, across every token produced. A
    /// token's `leading_trivia`/`trailing_trivia` ranges index into this.
    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    /// Produce the next token. Once `TokenKind::Eof` has been returned once,
    /// every subsequent call returns it again at the same zero-width span.
    pub fn next_token(&mut self) -> Token<'a> {
        if self.done {
            let pos = self.cursor.position();
            return Token::new(TokenKind::Eof, Span::point(pos));
        }

        let leading_start = self.trivia.len() as u32;
        scan_trivia_run(&mut self.cursor, self.sink, self.mode, false, &mut self.trivia);
        let leading_trivia = TriviaRange { start: leading_start, end: self.trivia.len() as u32 };

        if self.cursor.is_end() {
            self.done = true;
            let pos = self.cursor.position();
            return Token {
                kind: TokenKind::Eof,
                span: Span::point(pos),
                leading_trivia,
                trailing_trivia: TriviaRange::EMPTY,
                payload: None,
            };
        }

        self.cursor.start();
        let scanned = self.scan_significant();
        let span = self.cursor.get_span();

        let trailing_start = self.trivia.len() as u32;
        scan_trivia_run(&mut self.cursor, self.sink, self.mode, true, &mut self.trivia);
        let trailing_trivia = TriviaRange { start: trailing_start, end: self.trivia.len() as u32 };

        log::trace!("{:?} at {}..{}", scanned.kind, span.start.0, span.end.0);
        Token { kind: scanned.kind, span, leading_trivia, trailing_trivia, payload: scanned.payload }
    }

    /// Classification order: raw string/identifier prefix, then an
    /// encoding-prefixed string/char literal (its spelling overlaps a
    /// plain identifier's, so it has to be ruled out first), then a plain
    /// identifier or keyword, then a numeric literal, then a bare
    /// string/char literal, then punctuation, then an `Error` token for
    /// anything left over.
    fn scan_significant(&mut self) -> Scanned<'a> {
        if let Some(scanned) = identifier::try_scan_raw(&mut self.cursor, self.arena, self.interner, self.sink) {
            return scanned;
        }
        if let Some(scanned) = string::try_scan_encoded_literal(&mut self.cursor, self.arena, self.sink) {
            return scanned;
        }
        if is_ident_start(self.cursor.peek()) {
            return identifier::scan_identifier_or_keyword(&mut self.cursor, self.interner);
        }
        if self.cursor.peek().is_ascii_digit() {
            return number::scan_number(&mut self.cursor, self.arena, self.sink);
        }
        match self.cursor.peek() {
            '"' => return string::scan_string(&mut self.cursor, self.arena, self.sink, crate::token::LiteralEncoding::Default),
            '\'' => return string::scan_char(&mut self.cursor, self.sink, crate::token::LiteralEncoding::Default),
            _ => {}
        }
        if let Some(kind) = operator::scan_punctuation(&mut self.cursor) {
            return Scanned { kind, payload: None };
        }

        let span = self.cursor.get_span_for_current();
        self.sink.emit(Level::Error, "unrecognized character", span);
        self.cursor.advance();
        Scanned { kind: TokenKind::Error, payload: None }
    }
}

/// Lex every token out of `source` and return them alongside the lexer's
/// trivia buffer.
pub fn lex_all<'a, 'b>(source: &'a str, arena: &'a LexerArena, interner: &'b dyn Interner, sink: &'b mut DiagnosticSink, mode: TriviaMode) -> (Vec<Token<'a>>, Vec<Trivia>) {
    let mut lexer = Lexer::new(source, arena, interner, sink, mode);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let is_eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    (tokens, lexer.trivia)
}

/// A one-line-per-token textual dump: `<KindName> "<lexeme>" [start..end]
/// {leading:trailing}`, with literal tokens followed by an indented payload
/// line. Meant for eyeballing in a test failure, not for machine parsing.
pub fn dump_token_stream(source: &str, tokens: &[Token], _trivia: &[Trivia]) -> String {
    let mut out = String::new();
    for token in tokens {
        let lexeme = &source[token.span.start.as_usize()..token.span.end.as_usize()];
        let _ = writeln!(
            out,
            "{:?} {:?} [{}..{}] {{{}:{}}}",
            token.kind,
            lexeme,
            token.span.start.0,
            token.span.end.0,
            token.leading_trivia.len(),
            token.trailing_trivia.len(),
        );
        if let Some(payload) = &token.payload {
            let _ = writeln!(out, "  {:?}", payload);
        }
    }
    out
}
