/*!
A backtracking matcher that runs a compiled [`Graph`] over a [`Stream`].

The matcher walks the graph one state at a time. Whenever a state offers more
than one way forward, the untried alternatives are pushed onto an explicit
stack, and when the current path fails, the most recent alternative is
resumed. Every mutation of the search state (tag positions and loop counts)
is recorded on the same stack as an undo entry, so resuming an alternative
first rolls back everything done since that alternative was pushed. There is
no recursion, so the depth of a search is bounded by heap memory rather than
by the call stack.

Like every backtracking engine, a search may take exponential time on
patterns with nested ambiguous repetition. There is no timeout.

# Example

```
use regex_graph::{backtrack::Backtracker, util::stream::CharStream};

let re = Backtracker::new(r"(?<first>[a-z]+) \k<first>")?;
let mut cache = re.create_cache();

assert!(re.verify(&mut cache, CharStream::new("hey hey")));
let span = re.get_match(&cache, "first").unwrap();
assert_eq!(0..3, span.range());

assert!(!re.verify(&mut cache, CharStream::new("hey you")));
assert_eq!(None, re.get_match(&cache, "first"));

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use core::fmt;

use crate::{
    graph::{
        self,
        error::BuildError,
        graph::Graph,
        state::{Arrow, ArrowKind, State},
        tags::{TagTracker, TagUndo},
    },
    util::{
        iteration::Iteration,
        primitives::{StateID, TagID, TrapID},
        stream::{Span, Stream, Token},
    },
};

/// The configuration used for building a [`Backtracker`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    match_to_end: Option<bool>,
}

impl Config {
    /// Return a new default backtracker configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Whether a match must consume the entire stream.
    ///
    /// When enabled (the default), reaching the terminal state only counts
    /// as a match if no tokens remain, and otherwise the search backtracks
    /// to look for a longer path. When disabled, the first path to reach the
    /// terminal state wins, which makes the search match a prefix of the
    /// stream.
    pub fn match_to_end(mut self, yes: bool) -> Config {
        self.match_to_end = Some(yes);
        self
    }

    /// Returns whether a match must consume the entire stream.
    pub fn get_match_to_end(&self) -> bool {
        self.match_to_end.unwrap_or(true)
    }

    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config { match_to_end: o.match_to_end.or(self.match_to_end) }
    }
}

/// A builder for a [`Backtracker`].
///
/// This combines the configuration of the matcher with the configuration of
/// the compiler used to turn a pattern into a graph.
#[derive(Clone, Debug)]
pub struct Builder {
    config: Config,
    graph: graph::Compiler,
}

impl Builder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Builder {
        Builder { config: Config::default(), graph: graph::Compiler::new() }
    }

    /// Compile the given pattern and build a backtracker for it.
    pub fn build(&self, pattern: &str) -> Result<Backtracker, BuildError> {
        let graph = self.graph.build(pattern)?;
        Ok(self.build_from_graph(graph))
    }

    /// Build a backtracker for an already compiled graph.
    pub fn build_from_graph(&self, graph: Graph) -> Backtracker {
        Backtracker { config: self.config, graph }
    }

    /// Apply the given matcher configuration options.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.overwrite(config);
        self
    }

    /// Apply the given compiler configuration options.
    pub fn graph(&mut self, config: graph::Config) -> &mut Builder {
        self.graph.configure(config);
        self
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

/// A backtracking matcher for one compiled pattern.
///
/// A backtracker is immutable and cheap to clone. All of the state a search
/// mutates lives in a [`Cache`], so one backtracker may be used from many
/// threads at once as long as each thread brings its own cache.
#[derive(Clone, Debug)]
pub struct Backtracker {
    config: Config,
    graph: Graph,
}

impl Backtracker {
    /// Compile the given pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Backtracker, BuildError> {
        Backtracker::builder().build(pattern)
    }

    /// Build a backtracker with the default configuration for an already
    /// compiled graph.
    pub fn new_from_graph(graph: Graph) -> Backtracker {
        Backtracker::builder().build_from_graph(graph)
    }

    /// Return a default configuration.
    pub fn config() -> Config {
        Config::new()
    }

    /// Return a builder for configuring the construction of a backtracker.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Create a cache for searching streams whose positions have type `P`.
    pub fn create_cache<P: Copy + Eq + fmt::Debug>(&self) -> Cache<P> {
        Cache::new(&self.graph)
    }

    /// The graph this backtracker runs.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The configuration this backtracker was built with.
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Returns true if the pattern matches the stream, starting from the
    /// stream's current position.
    ///
    /// On success, the tag positions of the match are left in `cache` and
    /// can be read with [`Backtracker::get_match`]. On failure, every tag is
    /// reset.
    pub fn verify<S: Stream>(
        &self,
        cache: &mut Cache<S::Pos>,
        mut stream: S,
    ) -> bool {
        self.search(cache, &mut stream).is_some()
    }

    /// Like [`Backtracker::verify`], but returns the position at which the
    /// match ended. On success, `stream` is left at that position.
    pub fn search<S: Stream>(
        &self,
        cache: &mut Cache<S::Pos>,
        stream: &mut S,
    ) -> Option<S::Pos> {
        cache.setup(&self.graph);
        let found = self.run(cache, stream);
        cache.stack.clear();
        if !found {
            for tracker in cache.tags.iter_mut() {
                tracker.clear();
            }
            return None;
        }
        Some(stream.pos())
    }

    /// Return the span captured by the named tag in the most recent
    /// successful search using `cache`.
    ///
    /// `None` is returned when no tag has the given name, when the tag did
    /// not participate in the match, or when the most recent search failed.
    pub fn get_match<P: Copy + Eq + fmt::Debug>(
        &self,
        cache: &Cache<P>,
        name: &str,
    ) -> Option<Span<P>> {
        let tag = self.graph.tags().get(name)?;
        cache.tags.get(tag.as_usize())?.span()
    }

    fn run<S: Stream>(
        &self,
        cache: &mut Cache<S::Pos>,
        stream: &mut S,
    ) -> bool {
        let mut sid = self.graph.start();
        loop {
            let next = match *self.graph.state(sid) {
                State::Relay { ref arrow } => {
                    self.follow(cache, stream, arrow)
                }
                State::Fanout { ref arrows } => {
                    self.fan_out(cache, stream, sid, arrows)
                }
                State::TagOpen { tag, ref arrows } => {
                    if let Some(tag) = tag {
                        let undo = cache.tags[tag].bind_start(stream.pos());
                        cache.stack.push(Frame::RestoreTag { tag, undo });
                    }
                    self.fan_out(cache, stream, sid, arrows)
                }
                State::TagClose { tag, ref arrows } => {
                    if let Some(tag) = tag {
                        let undo = cache.tags[tag].bind_end(stream.pos());
                        cache.stack.push(Frame::RestoreTag { tag, undo });
                    }
                    self.fan_out(cache, stream, sid, arrows)
                }
                State::Trap { trap, ref iteration, ref body, ref leave } => {
                    let arrows = (body, leave);
                    self.enter_trap(
                        cache, stream, sid, trap, iteration, arrows,
                    )
                }
                State::Terminal => {
                    if !self.config.get_match_to_end() || stream.is_done() {
                        return true;
                    }
                    None
                }
            };
            sid = match next {
                Some(sid) => sid,
                None => match self.backtrack(cache, stream) {
                    Some(sid) => sid,
                    None => return false,
                },
            };
        }
    }

    /// Try the first arrow of a fanout, leaving a choice point for the rest.
    fn fan_out<S: Stream>(
        &self,
        cache: &mut Cache<S::Pos>,
        stream: &mut S,
        sid: StateID,
        arrows: &[Arrow],
    ) -> Option<StateID> {
        if arrows.len() > 1 {
            cache.stack.push(Frame::Step { sid, arrow: 1, at: stream.pos() });
        }
        self.follow(cache, stream, arrows.first()?)
    }

    /// Handle arriving at a trap, either from outside its loop or at the end
    /// of an iteration of its body.
    fn enter_trap<S: Stream>(
        &self,
        cache: &mut Cache<S::Pos>,
        stream: &mut S,
        sid: StateID,
        trap: TrapID,
        iteration: &Iteration,
        (body, leave): (&Arrow, &Arrow),
    ) -> Option<StateID> {
        let pos = stream.pos();
        let prev = cache.traps[trap];
        let mut slot = prev;
        if !slot.active {
            slot = TrapSlot { active: true, ..TrapSlot::inactive() };
        } else {
            if slot.entered_at == Some(pos) && iteration.accepts(slot.count) {
                // The iteration that just ended consumed nothing, and the
                // loop could have been left before it. Leave now, keeping
                // what the empty iteration captured.
                trace!("empty iteration of trap {:?} at {:?}", trap, pos);
                cache.stack.push(Frame::RestoreTrap { trap, slot: prev });
                slot.active = false;
                cache.traps[trap] = slot;
                return self.follow(cache, stream, leave);
            }
            slot.count = slot.count.saturating_add(1);
        }
        cache.stack.push(Frame::RestoreTrap { trap, slot: prev });
        if iteration.may_repeat(slot.count) {
            slot.entered_at = Some(pos);
            cache.traps[trap] = slot;
            if iteration.accepts(slot.count) {
                cache.stack.push(Frame::Leave { sid, at: pos });
            }
            self.follow(cache, stream, body)
        } else if iteration.accepts(slot.count) {
            slot.active = false;
            cache.traps[trap] = slot;
            self.follow(cache, stream, leave)
        } else {
            cache.traps[trap] = slot;
            None
        }
    }

    /// Pop the stack until an untried alternative is found, undoing every
    /// mutation recorded along the way. Returns the state at which the
    /// search resumes, or `None` when every alternative is exhausted.
    fn backtrack<S: Stream>(
        &self,
        cache: &mut Cache<S::Pos>,
        stream: &mut S,
    ) -> Option<StateID> {
        while let Some(frame) = cache.stack.pop() {
            match frame {
                Frame::RestoreTag { tag, undo } => cache.tags[tag].undo(undo),
                Frame::RestoreTrap { trap, slot } => cache.traps[trap] = slot,
                Frame::Step { sid, arrow, at } => {
                    trace!("backtracking to arrow {} of {:?}", arrow, sid);
                    stream.set_pos(at);
                    let arrows = self.graph.state(sid).arrows();
                    if arrow + 1 < arrows.len() {
                        cache.stack.push(Frame::Step {
                            sid,
                            arrow: arrow + 1,
                            at,
                        });
                    }
                    let next = self.follow(cache, stream, &arrows[arrow]);
                    if next.is_some() {
                        return next;
                    }
                }
                Frame::Leave { sid, at } => {
                    trace!("backtracking to leave trap at {:?}", sid);
                    stream.set_pos(at);
                    let (trap, leave) = match *self.graph.state(sid) {
                        State::Trap { trap, ref leave, .. } => (trap, leave),
                        ref state => unreachable!(
                            "leave choice at non-trap state {:?}",
                            state,
                        ),
                    };
                    let slot = cache.traps[trap];
                    cache.stack.push(Frame::RestoreTrap { trap, slot });
                    cache.traps[trap].active = false;
                    if let Some(next) = self.follow(cache, stream, leave) {
                        return Some(next);
                    }
                }
            }
        }
        None
    }

    /// Try to traverse a single arrow, consuming what it matches. On
    /// failure, the stream is left where it was.
    fn follow<S: Stream>(
        &self,
        cache: &Cache<S::Pos>,
        stream: &mut S,
        arrow: &Arrow,
    ) -> Option<StateID> {
        let matched = match arrow.kind {
            ArrowKind::Empty => true,
            ArrowKind::Char(ch) => consume_if(stream, |t| t.to_char() == ch),
            ArrowKind::Literal(ref chars) => {
                let at = stream.pos();
                let all = chars.iter().all(|&ch| {
                    stream.next_token().map_or(false, |t| t.to_char() == ch)
                });
                if !all {
                    stream.set_pos(at);
                }
                all
            }
            ArrowKind::Class(id) => {
                let class = self.graph.class(id);
                consume_if(stream, |t| class.contains(t.to_char()))
            }
            ArrowKind::Any => stream.next_token().is_some(),
            ArrowKind::Backreference(tag) => {
                replay(&cache.tags[tag], stream)
            }
        };
        if matched {
            Some(arrow.target)
        } else {
            None
        }
    }
}

/// Consume the next token if it satisfies `predicate`.
fn consume_if<S: Stream>(
    stream: &mut S,
    predicate: impl FnOnce(S::Token) -> bool,
) -> bool {
    match stream.peek() {
        Some(t) if predicate(t) => {
            stream.advance(1);
            true
        }
        _ => false,
    }
}

/// Match the tokens most recently captured by `tracker` against the stream.
///
/// A tag without a complete capture never matches.
fn replay<S: Stream>(tracker: &TagTracker<S::Pos>, stream: &mut S) -> bool {
    let span = match tracker.span() {
        None => return false,
        Some(span) => span,
    };
    let at = stream.pos();
    let mut captured = stream.clone();
    captured.set_pos(span.start);
    while captured.pos() != span.end {
        let want = captured.next_token();
        if want.is_none() || want != stream.next_token() {
            stream.set_pos(at);
            return false;
        }
    }
    true
}

/// The mutable state of a search.
///
/// A cache may be reused across searches (and across streams) to amortize
/// allocation. After a successful search, it holds the positions captured by
/// every tag.
#[derive(Clone)]
pub struct Cache<P> {
    stack: Vec<Frame<P>>,
    /// Indexed by tag ID.
    tags: Vec<TagTracker<P>>,
    /// Indexed by trap ID.
    traps: Vec<TrapSlot<P>>,
}

impl<P: Copy + Eq + fmt::Debug> Cache<P> {
    /// Create a new cache for the given graph.
    pub fn new(graph: &Graph) -> Cache<P> {
        let mut cache = Cache { stack: vec![], tags: vec![], traps: vec![] };
        cache.setup(graph);
        cache
    }

    /// The positions recorded for every tag, indexed by tag ID.
    pub fn tags(&self) -> &[TagTracker<P>] {
        &self.tags
    }

    /// The tracker for a single tag.
    pub fn tag(&self, tag: TagID) -> Option<&TagTracker<P>> {
        self.tags.get(tag.as_usize())
    }

    /// Returns the heap memory usage, in bytes, of this cache.
    pub fn memory_usage(&self) -> usize {
        use core::mem::size_of;

        self.stack.capacity() * size_of::<Frame<P>>()
            + self
                .tags
                .iter()
                .map(|t| t.depth() * size_of::<P>())
                .sum::<usize>()
            + self.traps.len() * size_of::<TrapSlot<P>>()
    }

    /// Prepare this cache for a new search over the given graph.
    fn setup(&mut self, graph: &Graph) {
        self.stack.clear();
        self.tags.resize_with(graph.tags().len(), TagTracker::new);
        for tracker in self.tags.iter_mut() {
            tracker.clear();
        }
        self.traps.clear();
        self.traps.resize(graph.trap_len(), TrapSlot::inactive());
    }
}

impl<P: fmt::Debug> fmt::Debug for Cache<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("stack_len", &self.stack.len())
            .field("tags", &self.tags)
            .finish()
    }
}

/// The runtime state of one trap.
#[derive(Clone, Copy, Debug)]
struct TrapSlot<P> {
    /// Whether the search is currently inside this trap's loop.
    active: bool,
    /// The number of completed iterations.
    count: u32,
    /// Where the iteration in progress began.
    entered_at: Option<P>,
}

impl<P> TrapSlot<P> {
    fn inactive() -> TrapSlot<P> {
        TrapSlot { active: false, count: 0, entered_at: None }
    }
}

/// An entry on the backtracking stack.
#[derive(Clone, Debug)]
enum Frame<P> {
    /// Resume by trying the given arrow of a fanout at position `at`.
    Step { sid: StateID, arrow: usize, at: P },
    /// Resume by leaving the loop of the trap `sid` at position `at`.
    Leave { sid: StateID, at: P },
    /// Roll back a change to a tag.
    RestoreTag { tag: TagID, undo: TagUndo<P> },
    /// Roll back a change to a trap's runtime state.
    RestoreTrap { trap: TrapID, slot: TrapSlot<P> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::stream::{CharStream, SliceStream};

    fn verify(pattern: &str, haystack: &str) -> bool {
        let re = Backtracker::new(pattern).unwrap();
        let mut cache = re.create_cache();
        re.verify(&mut cache, CharStream::new(haystack))
    }

    #[test]
    fn literals_and_classes() {
        assert!(verify("abc", "abc"));
        assert!(!verify("abc", "abd"));
        assert!(!verify("abc", "ab"));
        assert!(!verify("abc", "abcd"));
        assert!(verify("a.c", "a\u{2603}c"));
        assert!(verify("[a-c]x[^0-9]", "bxz"));
        assert!(!verify("[a-c]x[^0-9]", "bx5"));
        assert!(verify("", ""));
        assert!(!verify("", "a"));
    }

    #[test]
    fn alternation_is_tried_in_order() {
        assert!(verify("ab|a", "a"));
        assert!(verify("(a|ab)c", "abc"));
        assert!(!verify("a|b", "ab"));
    }

    #[test]
    fn repetition_counts() {
        assert!(verify("a{2,3}", "aa"));
        assert!(verify("a{2,3}", "aaa"));
        assert!(!verify("a{2,3}", "a"));
        assert!(!verify("a{2,3}", "aaaa"));
        assert!(verify("a{0}b", "b"));
        assert!(verify("(ab){2,}", "ababab"));
        assert!(!verify("(ab){2,}", "ab"));
        assert!(verify("a*a", "aaa"));
        assert!(verify("(a|b)*b", "abab"));
    }

    #[test]
    fn loops_with_empty_bodies_terminate() {
        assert!(verify("(a*)*", ""));
        assert!(verify("(a*)*", "aaa"));
        assert!(verify("(a*)+b", "b"));
        assert!(verify("(a|)*b", "aab"));
        assert!(!verify("(a*)*", "b"));
        assert!(verify("(a*){2,3}", ""));
    }

    #[test]
    fn empty_final_iteration_keeps_its_capture() {
        assert!(verify("(?<x>a*)+\\k<x>", "a"));
        assert!(verify("(?<x>c*){1,3}\\k<x>", "c"));
        assert!(verify("(a|)+\\k<1>", "a"));
        assert!(!verify("(?<x>a*)+\\k<x>", "ab"));

        let re = Backtracker::new("(?<x>a*)+").unwrap();
        let mut cache = re.create_cache();
        assert!(re.verify(&mut cache, CharStream::new("a")));
        assert_eq!(Some(Span { start: 1, end: 1 }), re.get_match(&cache, "x"));
    }

    #[test]
    fn backreferences() {
        assert!(verify("(a+)\\k<1>", "aa"));
        assert!(verify("(a+)\\k<1>", "aaaa"));
        assert!(!verify("(a+)\\k<1>", "aaa"));
        assert!(verify("(?<q>['\"])x\\k<q>", "'x'"));
        assert!(!verify("(?<q>['\"])x\\k<q>", "'x\""));
        // A tag that never matched cannot be replayed.
        assert!(!verify("(a)*b\\k<1>", "b"));
        assert!(verify("(a)*b\\k<1>", "aba"));
    }

    #[test]
    fn captures_report_last_iteration() {
        let re = Backtracker::new("(?<x>[a-z])+").unwrap();
        let mut cache = re.create_cache();
        assert!(re.verify(&mut cache, CharStream::new("abc")));
        assert_eq!(Some(Span { start: 2, end: 3 }), re.get_match(&cache, "x"));
        assert_eq!(None, re.get_match(&cache, "nope"));
    }

    #[test]
    fn captures_are_undone_on_backtrack() {
        let re = Backtracker::new("(?<x>ab)c|(?<y>a)bd").unwrap();
        let mut cache = re.create_cache();
        assert!(re.verify(&mut cache, CharStream::new("abd")));
        assert_eq!(None, re.get_match(&cache, "x"));
        assert_eq!(Some(Span { start: 0, end: 1 }), re.get_match(&cache, "y"));
    }

    #[test]
    fn failed_search_resets_tags() {
        let re = Backtracker::new("(a)b").unwrap();
        let mut cache = re.create_cache();
        assert!(re.verify(&mut cache, CharStream::new("ab")));
        assert!(re.get_match(&cache, "1").is_some());
        assert!(!re.verify(&mut cache, CharStream::new("ac")));
        assert_eq!(None, re.get_match(&cache, "1"));
    }

    #[test]
    fn prefix_mode_stops_at_first_terminal() {
        let re = Backtracker::builder()
            .configure(Backtracker::config().match_to_end(false))
            .build("a+")
            .unwrap();
        let mut cache = re.create_cache();
        let mut stream = CharStream::new("aaab");
        assert_eq!(Some(3), re.search(&mut cache, &mut stream));
        assert_eq!(Some('b'), stream.peek());
    }

    #[test]
    fn byte_streams() {
        let re = Backtracker::new("[\\x0080-\\x00FF]+").unwrap();
        let mut cache = re.create_cache();
        let bytes = [0x80u8, 0xFF, 0xC3];
        assert!(re.verify(&mut cache, SliceStream::new(&bytes)));
        assert!(!re.verify(&mut cache, SliceStream::new(&[0x80u8, b'a'])));
    }

    #[test]
    fn cache_follows_graph_size() {
        let small = Backtracker::new("a").unwrap();
        let big = Backtracker::new("(a)(b)(c)").unwrap();
        let mut cache = small.create_cache();
        assert!(big.verify(&mut cache, CharStream::new("abc")));
        assert_eq!(3, cache.tags().len());
        assert!(small.verify(&mut cache, CharStream::new("a")));
        assert!(cache.tags().is_empty());
    }

    #[test]
    fn deep_backtracking_does_not_recurse() {
        let haystack = "a".repeat(100_000);
        assert!(verify("(a|b)*c|a*", &haystack));
    }
}
