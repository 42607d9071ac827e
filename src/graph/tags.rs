/*!
Bookkeeping for capture groups, called tags.

A [`TagMapper`] is built while compiling a pattern. It assigns every
capturing group a [`TagID`] and a name (explicit for `(?<name>...)`, the
group's number otherwise) and tracks whether the group's closing paren has
been seen yet, since only closed groups may be referenced by `\k<name>`.

A [`TagTracker`] records where one tag matched during a single search. Since
a group inside a loop may be entered many times, a tracker keeps a stack of
start positions alongside its single end position.
*/

use std::{collections::HashMap, sync::Arc};

use crate::util::{
    primitives::{TagID, TagIDError},
    stream::Span,
};

/// A map from tag names to tag identifiers.
#[derive(Clone, Debug, Default)]
pub struct TagMapper {
    /// Indexed by tag ID.
    entries: Vec<TagEntry>,
    by_name: HashMap<Arc<str>, TagID>,
}

#[derive(Clone, Debug)]
struct TagEntry {
    name: Arc<str>,
    closed: bool,
}

impl TagMapper {
    /// Create an empty mapper.
    pub fn new() -> TagMapper {
        TagMapper::default()
    }

    /// Register a new, still open, tag with the given name.
    ///
    /// Callers must check that the name is not already registered.
    pub(crate) fn open(&mut self, name: &str) -> Result<TagID, TagIDError> {
        let tag = TagID::new(self.entries.len())?;
        let name: Arc<str> = Arc::from(name);
        self.entries.push(TagEntry { name: Arc::clone(&name), closed: false });
        self.by_name.insert(name, tag);
        Ok(tag)
    }

    /// Mark the given tag as closed, which makes it referenceable.
    pub(crate) fn close(&mut self, tag: TagID) {
        self.entries[tag.as_usize()].closed = true;
    }

    /// Look up a tag by name.
    pub fn get(&self, name: &str) -> Option<TagID> {
        self.by_name.get(name).copied()
    }

    /// Returns true if the closing paren of the given tag has been compiled.
    pub fn is_closed(&self, tag: TagID) -> bool {
        self.entries[tag.as_usize()].closed
    }

    /// The name of the given tag.
    pub fn name(&self, tag: TagID) -> &str {
        &self.entries[tag.as_usize()].name
    }

    /// The total number of tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over every tag name in the order the groups were opened.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| &*e.name)
    }
}

/// The positions at which one tag matched.
///
/// Invariant: when `end` is set, `start` is non-empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagTracker<P> {
    start: Vec<P>,
    end: Option<P>,
}

/// What is needed to reverse a single mutation of a [`TagTracker`].
#[derive(Clone, Debug)]
pub(crate) enum TagUndo<P> {
    /// Reverses `bind_start`.
    Start { popped: Option<P>, prev_end: Option<P> },
    /// Reverses `bind_end`.
    End { popped: Vec<P>, prev_end: Option<P> },
}

impl<P: Copy> TagTracker<P> {
    /// Create a tracker that has not matched anything.
    pub fn new() -> TagTracker<P> {
        TagTracker { start: vec![], end: None }
    }

    /// Record `pos` as the start of the tag.
    ///
    /// If the tag already has an end, it is being re-entered (for example,
    /// by another iteration of an enclosing loop), so the start of the
    /// previous occurrence is discarded along with its end.
    pub(crate) fn bind_start(&mut self, pos: P) -> TagUndo<P> {
        let prev_end = self.end.take();
        let popped = if prev_end.is_some() { self.start.pop() } else { None };
        self.start.push(pos);
        TagUndo::Start { popped, prev_end }
    }

    /// Record `pos` as the end of the tag, collapsing any pending starts to
    /// the oldest one.
    pub(crate) fn bind_end(&mut self, pos: P) -> TagUndo<P> {
        let mut popped = vec![];
        while self.start.len() > 1 {
            // Unwrap is OK since the length was just checked.
            popped.push(self.start.pop().unwrap());
        }
        let prev_end = self.end.replace(pos);
        TagUndo::End { popped, prev_end }
    }

    /// Reverse a mutation previously returned by `bind_start` or
    /// `bind_end`. Undos must be applied in the reverse order of the
    /// mutations that produced them.
    pub(crate) fn undo(&mut self, undo: TagUndo<P>) {
        match undo {
            TagUndo::Start { popped, prev_end } => {
                self.start.pop();
                if let Some(pos) = popped {
                    self.start.push(pos);
                }
                self.end = prev_end;
            }
            TagUndo::End { popped, prev_end } => {
                self.start.extend(popped.into_iter().rev());
                self.end = prev_end;
            }
        }
    }

    /// Forget everything this tracker has recorded.
    pub(crate) fn clear(&mut self) {
        self.start.clear();
        self.end = None;
    }

    /// The span of the most recent complete occurrence of this tag, if any.
    pub fn span(&self) -> Option<Span<P>> {
        let end = self.end?;
        let start = *self.start.last()?;
        Some(Span { start, end })
    }

    /// The number of pending start positions.
    pub fn depth(&self) -> usize {
        self.start.len()
    }
}

impl<P: Copy> Default for TagTracker<P> {
    fn default() -> TagTracker<P> {
        TagTracker::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapper_names() {
        let mut tags = TagMapper::new();
        let one = tags.open("1").unwrap();
        let word = tags.open("word").unwrap();
        assert_eq!(Some(word), tags.get("word"));
        assert_eq!("1", tags.name(one));
        assert!(!tags.is_closed(word));
        tags.close(word);
        assert!(tags.is_closed(word));
        assert_eq!(vec!["1", "word"], tags.names().collect::<Vec<_>>());
        assert_eq!(None, tags.get("2"));
    }

    #[test]
    fn reentered_tag_replaces_previous_occurrence() {
        let mut t = TagTracker::new();
        t.bind_start(0usize);
        t.bind_end(2);
        assert_eq!(Some(Span { start: 0, end: 2 }), t.span());

        let undo_start = t.bind_start(2);
        assert_eq!(1, t.depth());
        assert_eq!(None, t.span());
        let undo_end = t.bind_end(5);
        assert_eq!(Some(Span { start: 2, end: 5 }), t.span());

        t.undo(undo_end);
        assert_eq!(None, t.span());
        t.undo(undo_start);
        assert_eq!(Some(Span { start: 0, end: 2 }), t.span());
    }

    #[test]
    fn end_collapses_pending_starts() {
        let mut t = TagTracker::new();
        t.bind_start(1usize);
        t.bind_start(3);
        assert_eq!(2, t.depth());
        let undo = t.bind_end(4);
        assert_eq!(1, t.depth());
        assert_eq!(Some(Span { start: 1, end: 4 }), t.span());
        t.undo(undo);
        assert_eq!(2, t.depth());
        assert_eq!(None, t.span());
    }
}
