//! An abstract string-interning seam.
//!
//! The front-end never owns interning policy itself: identifiers are
//! interned behind the [`Interner`] trait so a host embedding this crate can
//! plug in its own session-wide, possibly-concurrent symbol table.
//! [`DefaultInterner`] is a minimal single-threaded implementation usable
//! standalone or in tests.

use std::cell::RefCell;

use ahash::AHashMap;

/// A handle to an interned string. Cheap to copy and compare; carries no
/// lifetime, so it can be stored in arena-allocated tokens without tying
/// their lifetime to the interner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternedStr(u32);

impl InternedStr {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

// A handle is just an index; it must stay safely shareable across threads
// even though `DefaultInterner` itself (a `RefCell` behind the scenes) is
// not - a concurrent `Interner` implementation is exactly what the trait
// seam above exists to allow a host to plug in.
static_assertions::assert_impl_all!(InternedStr: Send, Sync);

/// Intern and resolve byte strings.
///
/// Implementations are free to choose their own concurrency model; this
/// crate only ever borrows `&self`, never `&mut self`, so a host can wrap a
/// concurrent map behind it without forcing interior mutability choices on
/// callers.
pub trait Interner {
    /// Intern `bytes`, returning a handle. Interning the same bytes twice
    /// returns the same handle.
    fn intern(&self, bytes: &[u8]) -> InternedStr;

    /// Resolve a handle back to its string. Panics if `sym` was not produced
    /// by this interner.
    fn resolve(&self, sym: InternedStr) -> &str;
}

/// A simple single-threaded interner backed by a `RefCell`-guarded map and
/// an append-only backing buffer.
///
/// # Examples
///
/// ```
/// use weave_util::interner::{DefaultInterner, Interner};
///
/// let interner = DefaultInterner::new();
/// let a = interner.intern(b"hello");
/// let b = interner.intern(b"hello");
/// assert_eq!(a, b);
/// assert_eq!(interner.resolve(a), "hello");
/// ```
pub struct DefaultInterner {
    inner: RefCell<InternerInner>,
}

struct InternerInner {
    map: AHashMap<&'static str, InternedStr>,
    strings: Vec<&'static str>,
}

impl DefaultInterner {
    pub fn new() -> DefaultInterner {
        DefaultInterner {
            inner: RefCell::new(InternerInner { map: AHashMap::new(), strings: Vec::new() }),
        }
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.inner.borrow().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DefaultInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner for DefaultInterner {
    fn intern(&self, bytes: &[u8]) -> InternedStr {
        // Lossy only matters for genuinely malformed input, which the lexer
        // should never hand this interner; identifiers are always valid
        // UTF-8 by construction.
        let text = String::from_utf8_lossy(bytes);
        let mut inner = self.inner.borrow_mut();
        if let Some(&sym) = inner.map.get(text.as_ref()) {
            return sym;
        }
        // Leaked once per distinct string for the lifetime of the process;
        // bounded by the number of distinct identifiers in one compilation.
        let leaked: &'static str = Box::leak(text.into_owned().into_boxed_str());
        let sym = InternedStr(inner.strings.len() as u32);
        inner.strings.push(leaked);
        inner.map.insert(leaked, sym);
        sym
    }

    fn resolve(&self, sym: InternedStr) -> &str {
        self.inner.borrow().strings[sym.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_bytes_returns_same_handle() {
        let interner = DefaultInterner::new();
        let a = interner.intern(b"token");
        let b = interner.intern(b"token");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn interning_distinct_bytes_returns_distinct_handles() {
        let interner = DefaultInterner::new();
        let a = interner.intern(b"foo");
        let b = interner.intern(b"bar");
        assert_ne!(a, b);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn resolve_round_trips() {
        let interner = DefaultInterner::new();
        let sym = interner.intern(b"identifier");
        assert_eq!(interner.resolve(sym), "identifier");
    }

    #[test]
    fn empty_interner_has_no_strings() {
        let interner = DefaultInterner::new();
        assert!(interner.is_empty());
    }
}
