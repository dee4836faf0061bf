//! weave_lex - the lexical analyzer for the Weave compiler front-end.
//!
//! Turns source text into a token stream: identifiers and keywords, typed
//! numeric/string/character literals, punctuation, and the trivia (comments,
//! whitespace) attached to each token. Built in layers:
//!
//! - [`cursor`] - a UTF-8-aware reading cursor and its scanning primitives.
//! - [`unicode`] - identifier/whitespace classification and escape decoding.
//! - [`arena`] - bump allocation for literal payload text.
//! - [`token`] - the token and trivia data model.
//! - [`lexer`] - the scanning state machine built on top of all of the above.
//!
//! Parsing, semantic analysis, and literal evaluation into host numeric
//! types are out of scope; a [`token::LiteralPayload`] carries its value as
//! unevaluated source text for a later stage to interpret.

pub mod arena;
pub mod cursor;
mod edge_cases;
pub mod lexer;
pub mod token;
pub mod unicode;

pub use arena::LexerArena;
pub use lexer::{dump_token_stream, lex_all, Lexer, TriviaMode};
pub use token::{Token, TokenKind};
