//! Punctuation scanning: longest-match lookup against the fixed spelling
//! table in [`crate::token::TokenKind`].
//!
//! The table below is sorted longest-spelling-first so a linear scan trying
//! [`Cursor::starts_with`] in order always finds the longest match - no
//! spelling in the table is a prefix of an earlier, shorter entry, so the
//! first hit is the only hit.

use crate::cursor::Cursor;
use crate::token::TokenKind;

const PUNCTUATION: &[(&str, TokenKind)] = &[
    // 3 codepoints.
    ("<<=", TokenKind::ShlEq),
    (">>=", TokenKind::ShrEq),
    ("...", TokenKind::DotDotDot),
    ("..=", TokenKind::DotDotEq),
    // 2 codepoints.
    ("&&", TokenKind::AmpAmp),
    ("||", TokenKind::PipePipe),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("^=", TokenKind::CaretEq),
    ("&=", TokenKind::AmpEq),
    ("|=", TokenKind::PipeEq),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::Ne),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("..", TokenKind::DotDot),
    ("::", TokenKind::PathSep),
    ("->", TokenKind::RArrow),
    ("=>", TokenKind::FatArrow),
    // 1 codepoint.
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("^", TokenKind::Caret),
    ("!", TokenKind::Not),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("=", TokenKind::Eq),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
    (";", TokenKind::Semi),
    (":", TokenKind::Colon),
    ("#", TokenKind::Pound),
    ("$", TokenKind::Dollar),
    ("?", TokenKind::Question),
    ("@", TokenKind::At),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
];

/// Try every spelling in the table, longest first. Returns `None`, cursor
/// untouched, if nothing matches.
pub(crate) fn scan_punctuation(cursor: &mut Cursor) -> Option<TokenKind> {
    for &(spelling, kind) in PUNCTUATION {
        if cursor.starts_with(spelling) {
            return Some(kind);
        }
    }
    None
}
