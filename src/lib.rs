/*!
A backtracking regular expression engine built on an explicit state graph.

Patterns are compiled into a [`graph::Graph`]: an arena of states connected
by labeled arrows, where repetition is expressed as back edges anchored at
loop states and capture groups (called *tags*) are marked by dedicated
states. A [`backtrack::Backtracker`] then runs a graph over any
[`util::stream::Stream`] of tokens, exploring alternatives depth first with
an explicit stack.

Beyond the usual regex fare, the pattern language supports named groups and
backreferences (`\k<name>`), which is why matching is done by backtracking.

# Overview

* [`Regex`] is the most convenient entry point for matching `&str`
  haystacks.
* [`backtrack::Backtracker`] exposes the matcher directly, for reusing caches
  across searches or for matching custom token streams.
* [`graph`] contains the compiler, the graph representation and a low level
  builder.

# Example

```
use regex_graph::Regex;

let re = Regex::new(r"(?<word>[a-z]+) \k<word>")?;
assert!(re.is_match("bye bye"));
assert!(!re.is_match("bye now"));

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **std** - Enables `std` support in `memchr`. Enabled by default.
* **perf-literal** - Accelerates unanchored searches for patterns that begin
  with a literal. Enabled by default.
* **logging** - Emits diagnostics through the `log` crate while compiling and
  matching. Disabled by default.
*/

#![warn(missing_docs)]

#[cfg(not(any(
    target_pointer_width = "16",
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("regex-graph currently not supported on non-{16,32,64}");

pub use crate::{
    graph::BuildError,
    regex::{Builder, Captures, FindMatches, Regex},
    util::stream::Span,
};

#[macro_use]
mod macros;

pub mod backtrack;
pub mod graph;
mod regex;
pub mod util;
