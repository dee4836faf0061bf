//! A tree-structured diagnostic sink.
//!
//! Diagnostics form a forest: a top-level error can carry child notes
//! ("expected this because...") that in turn can carry their own children.
//! Rather than `Option<Box<Node>>` trees, entries and their links live in two
//! parallel append-only vectors indexed by a dense [`Handle`], and siblings
//! are threaded through a circular ring per parent - the same shape as an
//! intrusive doubly linked list, except the "past-the-end" sentinel is the
//! parent's own handle instead of a null pointer, so no entry ever needs an
//! `Option` just to mark "last sibling".

pub mod level;
pub mod render;

pub use level::Level;

use crate::span::Span;

/// A dense index into a [`DiagnosticSink`]'s entry table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    /// Sentinel standing in for "the forest root" - never a real entry.
    const ROOT: Handle = Handle(u32::MAX);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One diagnostic: a severity, a message, and the span it annotates.
#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy)]
struct Links {
    parent: Handle,
    first_child: Option<Handle>,
    last_child: Option<Handle>,
    next_sibling: Handle,
    prev_sibling: Handle,
}

/// An append-only forest of diagnostics.
///
/// # Examples
///
/// ```
/// use weave_util::diagnostic::{DiagnosticSink, Level};
/// use weave_util::span::{Position, Span};
///
/// let mut sink = DiagnosticSink::new();
/// let root = sink.emit(Level::Error, "unterminated string literal", Span::point(Position(0)));
/// sink.emit_child(root, Level::Hint, "string literals cannot span a line", Span::point(Position(0)));
///
/// assert_eq!(sink.len(), 2);
/// assert!(sink.has_errors());
/// assert_eq!(sink.children(root).count(), 1);
/// ```
#[derive(Debug)]
pub struct DiagnosticSink {
    /// Display name for the file these diagnostics were raised against - the
    /// renderer's `--> {path}:{line}:{column}` line reads this, not anything
    /// on `SourceText` (the source buffer has no notion of where it came
    /// from; the host that loaded it does).
    path: String,
    entries: Vec<Entry>,
    links: Vec<Links>,
    root_first: Option<Handle>,
    root_last: Option<Handle>,
}

impl Default for DiagnosticSink {
    fn default() -> DiagnosticSink {
        DiagnosticSink::new()
    }
}

impl DiagnosticSink {
    pub fn new() -> DiagnosticSink {
        DiagnosticSink::with_path("<source>")
    }

    /// A sink whose diagnostics render against `path` in the `-->` line.
    pub fn with_path(path: impl Into<String>) -> DiagnosticSink {
        DiagnosticSink {
            path: path.into(),
            entries: Vec::new(),
            links: Vec::new(),
            root_first: None,
            root_last: None,
        }
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Emit a top-level diagnostic.
    pub fn emit(&mut self, level: Level, message: impl Into<String>, span: Span) -> Handle {
        let handle = self.push_entry(Handle::ROOT, level, message, span);
        self.append_root(handle);
        handle
    }

    /// Emit a diagnostic as a child of `parent`, in emission order.
    pub fn emit_child(
        &mut self,
        parent: Handle,
        level: Level,
        message: impl Into<String>,
        span: Span,
    ) -> Handle {
        let handle = self.push_entry(parent, level, message, span);
        self.append_child(parent, handle);
        handle
    }

    fn push_entry(
        &mut self,
        parent: Handle,
        level: Level,
        message: impl Into<String>,
        span: Span,
    ) -> Handle {
        let handle = Handle(self.entries.len() as u32);
        self.entries.push(Entry { level, message: message.into(), span });
        self.links.push(Links {
            parent,
            first_child: None,
            last_child: None,
            next_sibling: Handle::ROOT,
            prev_sibling: Handle::ROOT,
        });
        handle
    }

    fn append_child(&mut self, parent: Handle, child: Handle) {
        match self.links[parent.index()].last_child {
            Some(last) => {
                self.links[last.index()].next_sibling = child;
                self.links[child.index()].prev_sibling = last;
            }
            None => {
                self.links[parent.index()].first_child = Some(child);
                self.links[child.index()].prev_sibling = parent;
            }
        }
        self.links[child.index()].next_sibling = parent;
        self.links[parent.index()].last_child = Some(child);
    }

    fn append_root(&mut self, child: Handle) {
        match self.root_last {
            Some(last) => {
                self.links[last.index()].next_sibling = child;
                self.links[child.index()].prev_sibling = last;
            }
            None => {
                self.root_first = Some(child);
                self.links[child.index()].prev_sibling = Handle::ROOT;
            }
        }
        self.links[child.index()].next_sibling = Handle::ROOT;
        self.root_last = Some(child);
    }

    #[inline]
    pub fn entry(&self, handle: Handle) -> &Entry {
        &self.entries[handle.index()]
    }

    /// Iterate `parent`'s direct children in emission order.
    pub fn children(&self, parent: Handle) -> Children<'_> {
        Children { sink: self, sentinel: parent, current: self.links[parent.index()].first_child }
    }

    /// Iterate every top-level diagnostic in emission order.
    pub fn roots(&self) -> Children<'_> {
        Children { sink: self, sentinel: Handle::ROOT, current: self.root_first }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == Level::Error)
    }

    pub fn count(&self, level: Level) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }
}

/// Iterator over a sibling ring, produced by [`DiagnosticSink::children`] or
/// [`DiagnosticSink::roots`].
pub struct Children<'a> {
    sink: &'a DiagnosticSink,
    sentinel: Handle,
    current: Option<Handle>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        let current = self.current?;
        let next = self.sink.links[current.index()].next_sibling;
        self.current = if next == self.sentinel { None } else { Some(next) };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Position, Span};

    fn span(n: u32) -> Span {
        Span::point(Position(n))
    }

    #[test]
    fn default_path_is_a_placeholder() {
        let sink = DiagnosticSink::new();
        assert_eq!(sink.path(), "<source>");
    }

    #[test]
    fn with_path_and_set_path_round_trip() {
        let mut sink = DiagnosticSink::with_path("main.wv");
        assert_eq!(sink.path(), "main.wv");
        sink.set_path("other.wv");
        assert_eq!(sink.path(), "other.wv");
    }

    #[test]
    fn empty_sink_has_no_roots() {
        let sink = DiagnosticSink::new();
        assert_eq!(sink.roots().count(), 0);
        assert!(!sink.has_errors());
    }

    #[test]
    fn root_level_ring_preserves_emission_order() {
        let mut sink = DiagnosticSink::new();
        let a = sink.emit(Level::Error, "a", span(0));
        let b = sink.emit(Level::Warning, "b", span(1));
        let c = sink.emit(Level::Info, "c", span(2));

        let roots: Vec<Handle> = sink.roots().collect();
        assert_eq!(roots, vec![a, b, c]);
    }

    #[test]
    fn children_ring_preserves_emission_order() {
        let mut sink = DiagnosticSink::new();
        let root = sink.emit(Level::Error, "root", span(0));
        let c1 = sink.emit_child(root, Level::Hint, "first", span(1));
        let c2 = sink.emit_child(root, Level::Hint, "second", span(2));
        let c3 = sink.emit_child(root, Level::Hint, "third", span(3));

        let children: Vec<Handle> = sink.children(root).collect();
        assert_eq!(children, vec![c1, c2, c3]);
    }

    #[test]
    fn sibling_ring_does_not_leak_into_other_parents() {
        let mut sink = DiagnosticSink::new();
        let root_a = sink.emit(Level::Error, "a", span(0));
        let root_b = sink.emit(Level::Error, "b", span(1));
        sink.emit_child(root_a, Level::Hint, "a-child", span(2));
        sink.emit_child(root_b, Level::Hint, "b-child", span(3));

        assert_eq!(sink.children(root_a).count(), 1);
        assert_eq!(sink.children(root_b).count(), 1);
    }

    #[test]
    fn has_errors_and_counts() {
        let mut sink = DiagnosticSink::new();
        sink.emit(Level::Warning, "w", span(0));
        assert!(!sink.has_errors());
        sink.emit(Level::Error, "e", span(1));
        assert!(sink.has_errors());
        assert_eq!(sink.count(Level::Error), 1);
        assert_eq!(sink.count(Level::Warning), 1);
    }

    #[test]
    fn leaf_with_no_children_has_empty_ring() {
        let mut sink = DiagnosticSink::new();
        let leaf = sink.emit(Level::Error, "leaf", span(0));
        assert_eq!(sink.children(leaf).count(), 0);
    }

    /// The sibling ring threaded through `next_sibling` closes back onto the
    /// parent handle (the end sentinel) after visiting each child exactly
    /// once - the core claim of the intrusive-ring design, checked by
    /// walking the links directly rather than through the `Children`
    /// iterator that already relies on this closing.
    #[test]
    fn sibling_ring_closes_onto_the_parent_after_one_full_pass() {
        let mut sink = DiagnosticSink::new();
        let root = sink.emit(Level::Error, "root", span(0));
        let c1 = sink.emit_child(root, Level::Hint, "first", span(1));
        let c2 = sink.emit_child(root, Level::Hint, "second", span(2));
        let c3 = sink.emit_child(root, Level::Hint, "third", span(3));

        let mut visited = Vec::new();
        let mut current = c1;
        loop {
            visited.push(current);
            let next = sink.links[current.index()].next_sibling;
            if next == root {
                break;
            }
            assert!(!visited.contains(&next), "ring revisited a child before closing");
            current = next;
        }
        assert_eq!(visited, vec![c1, c2, c3]);
    }

    mod properties {
        use super::*;
        use quickcheck_macros::quickcheck;

        /// For any number of children emitted under one root, the ring
        /// visits each exactly once, in emission order, and closes.
        #[quickcheck]
        fn children_ring_visits_each_child_exactly_once_in_emission_order(count: u8) -> bool {
            let count = count as usize % 64;
            let mut sink = DiagnosticSink::new();
            let root = sink.emit(Level::Error, "root", span(0));
            let expected: Vec<Handle> = (0..count)
                .map(|i| sink.emit_child(root, Level::Hint, format!("child {i}"), span(i as u32 + 1)))
                .collect();
            sink.children(root).collect::<Vec<_>>() == expected
        }

        /// Roots and children are independent rings: emitting children under
        /// one root never changes another root's (empty) child ring.
        #[quickcheck]
        fn roots_ring_is_unaffected_by_unrelated_children(root_count: u8, child_count: u8) -> bool {
            let root_count = root_count as usize % 16;
            let child_count = child_count as usize % 16;
            let mut sink = DiagnosticSink::new();
            let roots: Vec<Handle> = (0..root_count).map(|i| sink.emit(Level::Error, format!("root {i}"), span(i as u32))).collect();
            if let Some(&first_root) = roots.first() {
                for i in 0..child_count {
                    sink.emit_child(first_root, Level::Hint, format!("child {i}"), span(i as u32));
                }
            }
            sink.roots().collect::<Vec<_>>() == roots
        }
    }
}
