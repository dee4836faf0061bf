//! Cross-cutting invariants and edge cases for the lexer as a whole.
//!
//! Everything in `lexer/*.rs` is tested against its own scanner in
//! isolation; this module instead drives the full [`crate::lex_all`] entry
//! point and checks properties that only make sense at that level: coverage
//! of the source buffer, span validity, and stability of the significant
//! token stream across [`TriviaMode`]s.
