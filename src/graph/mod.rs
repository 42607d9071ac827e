/*!
Compiling patterns into explicit state graphs.

A [`Graph`] is an arena of [`State`]s connected by [`Arrow`]s. Loops created
by repetition are ordinary back edges into the arena, anchored at a
[`State::Trap`] that bounds how often its body may repeat. Capture groups are
called tags: [`State::TagOpen`] and [`State::TagClose`] record where a tag
starts and ends during a search.

Graphs are usually produced by a [`Compiler`], but a [`Builder`] can assemble
one by hand.
*/

pub(crate) mod builder;
pub(crate) mod compiler;
pub(crate) mod error;
#[allow(clippy::module_inception)]
pub(crate) mod graph;
pub(crate) mod state;
pub mod tags;

pub use self::{
    builder::Builder,
    compiler::{Compiler, Config},
    error::BuildError,
    graph::Graph,
    state::{Arrow, ArrowKind, State},
    tags::{TagMapper, TagTracker},
};
