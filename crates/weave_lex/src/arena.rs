//! Bump allocation backing a single lexer run.
//!
//! Literal payloads need owned text once separators are stripped or escapes
//! are expanded - the stored value is no longer a plain slice of the source
//! buffer. A [`bumpalo::Bump`] gives every such string `O(1)` allocation and
//! a single bulk free at the end of the pass, instead of one heap
//! allocation (and one `Drop`) per literal.

use bumpalo::Bump;

/// Owns the bump arena a [`crate::lexer::Lexer`] allocates literal payload
/// text from. Dropped as a whole once the token stream it backs is no
/// longer needed.
#[derive(Default)]
pub struct LexerArena {
    bump: Bump,
}

impl LexerArena {
    pub fn new() -> LexerArena {
        LexerArena { bump: Bump::new() }
    }

    /// Copy `s` into the arena and return a reference with the arena's
    /// lifetime.
    pub fn alloc_str<'a>(&'a self, s: &str) -> &'a str {
        self.bump.alloc_str(s)
    }

    /// Copy `bytes` into the arena and return a reference with the arena's
    /// lifetime. Used for string literal values, which are not always valid
    /// UTF-8 once a `\xHH` byte escape has been expanded.
    pub fn alloc_bytes<'a>(&'a self, bytes: &[u8]) -> &'a [u8] {
        self.bump.alloc_slice_copy(bytes)
    }

    /// Bytes currently allocated, for diagnostics/benchmarks.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}
