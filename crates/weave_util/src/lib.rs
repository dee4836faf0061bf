//! weave_util - Core utilities shared by the Weave compiler front-end.
//!
//! This crate has no knowledge of syntax or semantics; it provides the
//! foundation every other front-end crate builds on:
//!
//! - [`span`] - byte-offset positions and ranges, independent of any buffer.
//! - [`source`] - an indexed, line-addressable source buffer.
//! - [`utf8`] - a decode/encode codec with explicit partial-input handling.
//! - [`charset`] - compact ASCII/Unicode membership tables.
//! - [`interner`] - an abstract string-interning seam plus a default impl.
//! - [`diagnostic`] - a tree-structured diagnostic sink and renderer.
//! - [`error`] - ambient error types.

pub mod charset;
pub mod diagnostic;
pub mod error;
pub mod interner;
pub mod source;
pub mod span;
pub mod utf8;

pub use diagnostic::{DiagnosticSink, Level};
pub use error::{SourceError, SourceResult};
pub use interner::{DefaultInterner, InternedStr, Interner};
pub use source::SourceText;
pub use span::{LinePosition, LineSpan, Position, Span};
