//! The lexer state machine: turns a [`crate::cursor::Cursor`] into a stream
//! of [`crate::token::Token`]s.
//!
//! Split the way the token grammar is split: [`core`] holds the top-level
//! loop and dispatch, [`comment`] scans trivia, [`identifier`] handles
//! identifiers/keywords/raw forms, [`number`] handles numeric literals,
//! [`string`] handles string/character literals, and [`operator`] handles
//! punctuation.

mod comment;
mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use self::core::{dump_token_stream, lex_all, Lexer, TriviaMode};

use crate::cursor::Cursor;
use crate::token::{LiteralPayload, TokenKind};

/// Result of recognizing one significant lexeme: its kind and, for literals
/// and identifiers, its payload. Shared by every `scan_*` entry point in
/// this module's submodules.
pub(crate) struct Scanned<'a> {
    pub kind: TokenKind,
    pub payload: Option<LiteralPayload<'a>>,
}

/// Byte at `offset` past the cursor's current position, without consuming
/// anything. Used for the small fixed-width lookaheads (`r#`, `u8"`, `///`,
/// `/**`) that disambiguate which scanner should run before any of them
/// commit to consuming input.
pub(crate) fn byte_at(cursor: &Cursor, offset: usize) -> Option<u8> {
    let pos = cursor.position().as_usize() + offset;
    cursor.source().as_bytes().get(pos).copied()
}

/// Decoded codepoint at `byte_offset` past the cursor's current position,
/// without consuming anything.
pub(crate) fn char_at(cursor: &Cursor, byte_offset: usize) -> Option<char> {
    let pos = cursor.position().as_usize() + byte_offset;
    let bytes = cursor.source().as_bytes();
    if pos >= bytes.len() {
        return None;
    }
    weave_util::utf8::decode(&bytes[pos..]).map(|d| d.ch)
}
