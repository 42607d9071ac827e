use std::sync::Arc;

use crate::{
    graph::{
        error::BuildError,
        graph::{Graph, Inner},
        state::{Arrow, ArrowKind, State},
        tags::TagMapper,
    },
    util::{
        charset::CharSet,
        iteration::Iteration,
        primitives::{ClassID, StateID, TagID, TrapID},
    },
};

/// An intermediate graph state used during construction.
///
/// During construction, states are appended before all of their arrows are
/// known, and traps in particular get their `leave` arrow and iteration only
/// once the end of the looped sub-graph has been compiled. Once construction
/// is finished, the builder converts these states into the immutable
/// [`State`](crate::graph::State) representation, turning every fanout with
/// a single arrow into a relay.
#[derive(Clone, Debug, Eq, PartialEq)]
enum BState {
    Fanout { arrows: Vec<Arrow> },
    TagOpen { tag: Option<TagID>, arrows: Vec<Arrow> },
    TagClose { tag: Option<TagID>, arrows: Vec<Arrow> },
    Trap {
        trap: TrapID,
        iteration: Option<Iteration>,
        body: Option<Arrow>,
        leave: Option<Arrow>,
    },
    Terminal,
}

/// A low level builder for a [`Graph`].
///
/// The pattern [`Compiler`](crate::graph::Compiler) drives this builder, but
/// it can also be used directly to assemble a graph by hand. Adding an arrow
/// to a state that cannot hold arrows, or building a graph with a trap that
/// is missing its body, leave arrow or iteration, panics.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    states: Vec<BState>,
    classes: Vec<CharSet>,
    trap_len: usize,
    state_limit: Option<usize>,
}

impl Builder {
    /// Create a new builder with no states.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Limit the number of states that may be added. Adding a state beyond
    /// the limit returns an error.
    pub fn set_state_limit(&mut self, limit: Option<usize>) -> &mut Builder {
        self.state_limit = limit;
        self
    }

    /// The number of states added so far.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no states have been added.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Add a state whose arrows are tried in order.
    pub fn add_fanout(&mut self) -> Result<StateID, BuildError> {
        self.add(BState::Fanout { arrows: vec![] })
    }

    /// Add a state that records the start of `tag` when reached.
    pub fn add_tag_open(
        &mut self,
        tag: Option<TagID>,
    ) -> Result<StateID, BuildError> {
        self.add(BState::TagOpen { tag, arrows: vec![] })
    }

    /// Add a state that records the end of `tag` when reached.
    pub fn add_tag_close(
        &mut self,
        tag: Option<TagID>,
    ) -> Result<StateID, BuildError> {
        self.add(BState::TagClose { tag, arrows: vec![] })
    }

    /// Add a new loop anchor with a fresh trap identity. Its body, leave
    /// arrow and iteration must be set before building.
    pub fn add_trap(&mut self) -> Result<StateID, BuildError> {
        let trap = TrapID::new(self.trap_len)?;
        let sid = self.add(BState::Trap {
            trap,
            iteration: None,
            body: None,
            leave: None,
        })?;
        self.trap_len += 1;
        Ok(sid)
    }

    /// Add a terminal state.
    pub fn add_terminal(&mut self) -> Result<StateID, BuildError> {
        self.add(BState::Terminal)
    }

    /// Store a character class and return its identifier.
    pub fn add_class(&mut self, set: CharSet) -> Result<ClassID, BuildError> {
        let id = ClassID::new(self.classes.len())
            .map_err(|_| BuildError::too_many_indices())?;
        self.classes.push(set);
        Ok(id)
    }

    /// Append an arrow to the given fanout or tag state.
    pub fn add_arrow(&mut self, from: StateID, kind: ArrowKind, to: StateID) {
        let arrow = Arrow { kind, target: to };
        match self.states[from] {
            BState::Fanout { ref mut arrows }
            | BState::TagOpen { ref mut arrows, .. }
            | BState::TagClose { ref mut arrows, .. } => arrows.push(arrow),
            ref state => panic!(
                "cannot add an arrow to state {} ({:?})",
                from.as_usize(),
                state
            ),
        }
    }

    /// Set the arrow a trap takes to start another repetition.
    pub fn set_trap_body(
        &mut self,
        trap: StateID,
        kind: ArrowKind,
        to: StateID,
    ) {
        match self.states[trap] {
            BState::Trap { ref mut body, .. } => {
                *body = Some(Arrow { kind, target: to })
            }
            ref state => panic!("state {:?} is not a trap", state),
        }
    }

    /// Set the state a trap leads to when leaving the loop.
    pub fn set_trap_leave(&mut self, trap: StateID, to: StateID) {
        match self.states[trap] {
            BState::Trap { ref mut leave, .. } => {
                *leave = Some(Arrow::empty(to))
            }
            ref state => panic!("state {:?} is not a trap", state),
        }
    }

    /// Set the acceptable repetition counts of a trap.
    pub fn set_trap_iteration(&mut self, trap: StateID, it: Iteration) {
        match self.states[trap] {
            BState::Trap { ref mut iteration, .. } => *iteration = Some(it),
            ref state => panic!("state {:?} is not a trap", state),
        }
    }

    /// Finish construction, producing an immutable graph that starts at
    /// `start` and whose tags are described by `tags`.
    pub fn build(
        self,
        start: StateID,
        tags: TagMapper,
    ) -> Result<Graph, BuildError> {
        let len = self.states.len();
        let mut terminal = None;
        let mut states = Vec::with_capacity(len);
        for (i, bstate) in self.states.into_iter().enumerate() {
            let state = match bstate {
                BState::Fanout { mut arrows } => {
                    if arrows.len() == 1 {
                        // Unwrap is OK since the length was just checked.
                        State::Relay { arrow: arrows.pop().unwrap() }
                    } else {
                        State::Fanout { arrows: arrows.into_boxed_slice() }
                    }
                }
                BState::TagOpen { tag, arrows } => {
                    State::TagOpen { tag, arrows: arrows.into_boxed_slice() }
                }
                BState::TagClose { tag, arrows } => {
                    State::TagClose { tag, arrows: arrows.into_boxed_slice() }
                }
                BState::Trap { trap, iteration, body, leave } => {
                    match (iteration, body, leave) {
                        (Some(iteration), Some(body), Some(leave)) => {
                            State::Trap { trap, iteration, body, leave }
                        }
                        _ => panic!("trap state {} was never completed", i),
                    }
                }
                BState::Terminal => {
                    terminal = Some(StateID::new_unchecked(i));
                    State::Terminal
                }
            };
            for target in state.targets() {
                assert!(
                    target.as_usize() < len,
                    "state {} has an arrow to nonexistent state {}",
                    i,
                    target.as_usize(),
                );
            }
            states.push(state);
        }
        assert!(start.as_usize() < states.len(), "invalid start state");
        let end = terminal.expect("graph must contain a terminal state");
        let prefix = literal_prefix(&states, start);
        let graph = Graph::from_inner(Inner {
            states,
            start,
            end,
            classes: self.classes,
            tags,
            trap_len: self.trap_len,
            prefix,
        });
        debug!(
            "built graph with {} states, {} tags and {} traps",
            graph.states().len(),
            graph.tags().len(),
            graph.trap_len(),
        );
        Ok(graph)
    }

    fn add(&mut self, state: BState) -> Result<StateID, BuildError> {
        let id = StateID::new(self.states.len())
            .map_err(|_| BuildError::state_overflow())?;
        if let Some(limit) = self.state_limit {
            if self.states.len() >= limit {
                return Err(BuildError::too_many_states(limit));
            }
        }
        self.states.push(state);
        Ok(id)
    }
}

/// Find the literal that every match must begin with, if there is one.
///
/// This follows the single path out of `start` through states with exactly
/// one arrow, skipping empty arrows, until the first arrow that consumes
/// input.
fn literal_prefix(states: &[State], start: StateID) -> Option<Arc<[char]>> {
    let mut sid = start;
    // Bounding the walk protects against a hand built cycle of relays.
    for _ in 0..states.len() {
        let arrow = match states[sid] {
            State::Relay { ref arrow } => arrow,
            State::TagOpen { ref arrows, .. }
            | State::TagClose { ref arrows, .. }
                if arrows.len() == 1 =>
            {
                &arrows[0]
            }
            _ => return None,
        };
        match arrow.kind {
            ArrowKind::Empty => sid = arrow.target,
            ArrowKind::Char(ch) => return Some(Arc::from(vec![ch])),
            ArrowKind::Literal(ref chars) => return Some(Arc::from(&**chars)),
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_arrow_fanout_becomes_relay() {
        let mut b = Builder::new();
        let start = b.add_fanout().unwrap();
        let end = b.add_terminal().unwrap();
        b.add_arrow(start, ArrowKind::Char('x'), end);
        let graph = b.build(start, TagMapper::new()).unwrap();
        assert!(matches!(graph.state(start), State::Relay { .. }));
        assert_eq!(end, graph.end());
        assert_eq!(Some(&['x'][..]), graph.literal_prefix());
    }

    #[test]
    fn state_limit() {
        let mut b = Builder::new();
        b.set_state_limit(Some(2));
        b.add_fanout().unwrap();
        b.add_fanout().unwrap();
        assert!(b.add_terminal().is_err());
    }

    #[test]
    #[should_panic]
    fn incomplete_trap_panics() {
        let mut b = Builder::new();
        let trap = b.add_trap().unwrap();
        let end = b.add_terminal().unwrap();
        b.set_trap_leave(trap, end);
        let _ = b.build(trap, TagMapper::new());
    }
}
