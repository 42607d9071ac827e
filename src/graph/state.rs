use core::fmt;

use crate::util::{
    iteration::Iteration,
    primitives::{ClassID, StateID, TagID, TrapID},
};

/// A single state in a compiled graph.
///
/// States never change once a graph is built. Everything that varies while
/// matching (tag positions, loop counts) lives in the matcher's cache.
#[derive(Clone, Eq, PartialEq)]
pub enum State {
    /// A pass-through state with exactly one outgoing arrow.
    Relay {
        /// The only way out of this state.
        arrow: Arrow,
    },
    /// A state whose arrows are tried in order. Earlier arrows have
    /// priority over later ones, which is how alternation expresses its
    /// leftmost-first preference.
    Fanout {
        /// The outgoing arrows, in priority order.
        arrows: Box<[Arrow]>,
    },
    /// A loop anchor. Taking `body` starts another repetition of the looped
    /// sub-graph, which eventually leads back to this state. Taking `leave`
    /// exits the loop.
    ///
    /// How many repetitions have completed is not stored here, since the
    /// same trap is visited with different counts on different backtracking
    /// branches. Each trap has an identity that the matcher uses to keep
    /// that count on the side.
    Trap {
        /// The identity of this trap, used to index runtime loop state.
        trap: TrapID,
        /// The acceptable repetition counts.
        iteration: Iteration,
        /// The arrow that re-enters the looped sub-graph.
        body: Arrow,
        /// The arrow that exits the loop.
        leave: Arrow,
    },
    /// Reaching this state means the pattern matched.
    Terminal,
    /// Like `Fanout`, but records the current position as the start of a
    /// capture before trying any arrow.
    TagOpen {
        /// The capture group whose start is recorded, if any.
        tag: Option<TagID>,
        /// The outgoing arrows, in priority order.
        arrows: Box<[Arrow]>,
    },
    /// Like `Fanout`, but records the current position as the end of a
    /// capture before trying any arrow.
    TagClose {
        /// The capture group whose end is recorded, if any.
        tag: Option<TagID>,
        /// The outgoing arrows, in priority order.
        arrows: Box<[Arrow]>,
    },
}

impl State {
    /// Returns every outgoing arrow of this state in priority order.
    pub fn arrows(&self) -> &[Arrow] {
        match *self {
            State::Relay { ref arrow } => core::slice::from_ref(arrow),
            State::Fanout { ref arrows }
            | State::TagOpen { ref arrows, .. }
            | State::TagClose { ref arrows, .. } => arrows,
            State::Trap { .. } | State::Terminal => &[],
        }
    }

    /// Returns the targets of every arrow leaving this state, including the
    /// two arrows of a trap.
    pub fn targets(&self) -> Vec<StateID> {
        match *self {
            State::Trap { ref body, ref leave, .. } => {
                vec![body.target, leave.target]
            }
            _ => self.arrows().iter().map(|a| a.target).collect(),
        }
    }

    /// Returns true if this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(*self, State::Terminal)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(arrows: &[Arrow]) -> String {
            arrows
                .iter()
                .map(|a| format!("{:?}", a))
                .collect::<Vec<String>>()
                .join(", ")
        }
        fn tag_name(tag: Option<TagID>) -> String {
            tag.map_or("-".to_string(), |t| t.as_usize().to_string())
        }

        match *self {
            State::Relay { ref arrow } => write!(f, "relay({:?})", arrow),
            State::Fanout { ref arrows } => {
                write!(f, "fanout({})", list(arrows))
            }
            State::Trap { trap, ref iteration, ref body, ref leave } => {
                write!(
                    f,
                    "trap(id={}, {:?}) loop {:?}, leave {:?}",
                    trap.as_usize(),
                    iteration,
                    body,
                    leave,
                )
            }
            State::Terminal => write!(f, "TERMINAL"),
            State::TagOpen { tag, ref arrows } => {
                write!(f, "tag-open({}) {}", tag_name(tag), list(arrows))
            }
            State::TagClose { tag, ref arrows } => {
                write!(f, "tag-close({}) {}", tag_name(tag), list(arrows))
            }
        }
    }
}

/// A labeled transition from one state to another.
#[derive(Clone, Eq, PartialEq)]
pub struct Arrow {
    /// What the arrow consumes.
    pub kind: ArrowKind,
    /// The state the arrow leads to.
    pub target: StateID,
}

impl Arrow {
    /// An arrow that consumes nothing.
    pub fn empty(target: StateID) -> Arrow {
        Arrow { kind: ArrowKind::Empty, target }
    }

    /// Returns true if following this arrow never consumes input.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ArrowKind::Empty)
    }
}

impl fmt::Debug for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} => {}", self.kind, self.target.as_usize())
    }
}

/// The label of an arrow, i.e., what it consumes from a stream.
#[derive(Clone, Eq, PartialEq)]
pub enum ArrowKind {
    /// Consumes nothing and always succeeds.
    Empty,
    /// Consumes exactly one token equal to the given character.
    Char(char),
    /// Consumes a run of tokens equal to the given characters. A partial
    /// match consumes nothing.
    Literal(Box<[char]>),
    /// Consumes one token that is a member of the given class.
    Class(ClassID),
    /// Consumes any one token.
    Any,
    /// Consumes a run of tokens equal to the tokens most recently captured
    /// by the given tag.
    Backreference(TagID),
}

impl fmt::Debug for ArrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ArrowKind::Empty => write!(f, "ε"),
            ArrowKind::Char(ch) => write!(f, "{:?}", ch),
            ArrowKind::Literal(ref chars) => {
                write!(f, "{:?}", chars.iter().collect::<String>())
            }
            ArrowKind::Class(id) => write!(f, "class({})", id.as_usize()),
            ArrowKind::Any => write!(f, "any"),
            ArrowKind::Backreference(tag) => {
                write!(f, "backref({})", tag.as_usize())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_format() {
        let s = State::Trap {
            trap: TrapID::must(0),
            iteration: Iteration::between(2, 3),
            body: Arrow {
                kind: ArrowKind::Char('a'),
                target: StateID::must(1),
            },
            leave: Arrow::empty(StateID::must(2)),
        };
        assert_eq!(
            "trap(id=0, {2,3}) loop 'a' => 1, leave ε => 2",
            format!("{:?}", s)
        );
        let s = State::TagOpen {
            tag: Some(TagID::must(0)),
            arrows: vec![Arrow {
                kind: ArrowKind::Literal("ab".chars().collect()),
                target: StateID::must(4),
            }]
            .into_boxed_slice(),
        };
        assert_eq!("tag-open(0) \"ab\" => 4", format!("{:?}", s));
    }

    #[test]
    fn trap_targets() {
        let s = State::Trap {
            trap: TrapID::must(0),
            iteration: Iteration::star(),
            body: Arrow::empty(StateID::must(3)),
            leave: Arrow::empty(StateID::must(5)),
        };
        assert!(s.arrows().is_empty());
        assert_eq!(vec![StateID::must(3), StateID::must(5)], s.targets());
    }
}
