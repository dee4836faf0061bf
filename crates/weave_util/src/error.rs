//! Ambient error types shared across the front-end.

use thiserror::Error;

/// Errors surfaced while constructing or decoding source text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The input buffer is not valid UTF-8.
    ///
    /// `valid_up_to` mirrors [`std::str::Utf8Error::valid_up_to`]: the byte
    /// offset of the first byte that could not be decoded.
    #[error("input is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

pub type SourceResult<T> = Result<T, SourceError>;
