use core::fmt;

use std::sync::Arc;

use crate::{
    graph::{
        builder::Builder,
        compiler::{Compiler, Config},
        error::BuildError,
        state::State,
        tags::TagMapper,
    },
    util::{
        charset::CharSet,
        primitives::{ClassID, IteratorIndexExt, StateID},
    },
};

/// A compiled pattern: an explicit graph of states connected by arrows.
///
/// States are stored in an arena and arrows refer to their targets by
/// [`StateID`], so the loops introduced by repetition are ordinary data. A
/// graph is immutable once built.
///
/// # Cheap clones
///
/// A graph uses reference counting internally, so it is cheap to clone and
/// may be shared between threads. Every search keeps its mutable state (tag
/// positions, loop counts, the backtracking stack) in its own
/// [`Cache`](crate::backtrack::Cache), so any number of searches may run
/// against the same graph at once.
///
/// # Example
///
/// ```
/// use regex_graph::graph::Graph;
///
/// let graph = Graph::new(r"(?<word>[a-z]+)-\k<word>")?;
/// assert_eq!(1, graph.tags().len());
/// assert!(graph.tags().get("word").is_some());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Graph(Arc<Inner>);

/// The "inner" part of a graph, split out so that it can be wrapped in an
/// `Arc`. See builder.rs for the code that constructs it.
pub(super) struct Inner {
    pub(super) states: Vec<State>,
    pub(super) start: StateID,
    pub(super) end: StateID,
    pub(super) classes: Vec<CharSet>,
    pub(super) tags: TagMapper,
    pub(super) trap_len: usize,
    pub(super) prefix: Option<Arc<[char]>>,
}

impl Graph {
    /// Compile the given pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Graph, BuildError> {
        Graph::compiler().build(pattern)
    }

    /// Return a default configuration for compiling a graph.
    pub fn config() -> Config {
        Config::new()
    }

    /// Return a compiler for turning patterns into graphs.
    pub fn compiler() -> Compiler {
        Compiler::new()
    }

    /// Return a builder for assembling a graph by hand.
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(super) fn from_inner(inner: Inner) -> Graph {
        Graph(Arc::new(inner))
    }

    /// The state at which every search begins.
    pub fn start(&self) -> StateID {
        self.0.start
    }

    /// The terminal state. Reaching it means the pattern matched.
    pub fn end(&self) -> StateID {
        self.0.end
    }

    /// Return the state with the given identifier.
    ///
    /// # Panics
    ///
    /// When the identifier does not belong to this graph.
    #[inline]
    pub fn state(&self, id: StateID) -> &State {
        &self.0.states[id]
    }

    /// All states in this graph, indexed by their identifiers.
    pub fn states(&self) -> &[State] {
        &self.0.states
    }

    /// Return the character class with the given identifier.
    #[inline]
    pub fn class(&self, id: ClassID) -> &CharSet {
        &self.0.classes[id]
    }

    /// The tags (capture groups) declared by the compiled pattern.
    pub fn tags(&self) -> &TagMapper {
        &self.0.tags
    }

    /// The number of loop anchors in this graph.
    pub fn trap_len(&self) -> usize {
        self.0.trap_len
    }

    /// The literal every match must begin with, if the pattern starts with
    /// one.
    pub fn literal_prefix(&self) -> Option<&[char]> {
        self.0.prefix.as_deref()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "graph::Graph(")?;
        for (sid, state) in self.states.iter().with_state_ids() {
            let status = if sid == self.start { '>' } else { ' ' };
            writeln!(f, "{}{:06?}: {:?}", status, sid.as_usize(), state)?;
        }
        if !self.classes.is_empty() {
            writeln!(f)?;
            for (i, class) in self.classes.iter().enumerate() {
                writeln!(f, "CLASS({:06?}): {:?}", i, class)?;
            }
        }
        if !self.tags.is_empty() {
            writeln!(f)?;
            for (i, name) in self.tags.names().enumerate() {
                writeln!(f, "TAG({:06?}): {}", i, name)?;
            }
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph>();
    }

    #[test]
    fn debug_dump_lists_every_state() {
        let graph = Graph::new("a[bc](?<x>d)").unwrap();
        let dump = format!("{:?}", graph);
        assert!(dump.starts_with("graph::Graph(\n"));
        assert!(dump.contains("TERMINAL"));
        assert!(dump.contains("CLASS(000000): [b-c]"));
        assert!(dump.contains("TAG(000000): x"));
        let listed = dump.lines().filter(|l| l.contains(": ")).count();
        assert!(listed >= graph.states().len());
    }
}
