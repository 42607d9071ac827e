use crate::{
    graph::{
        builder::Builder, error::BuildError, graph::Graph, state::ArrowKind,
        tags::TagMapper,
    },
    util::{
        charset::CharSet,
        iteration::Iteration,
        primitives::{ClassID, StateID, TagID},
    },
};

/// The configuration used for compiling a pattern into a graph.
///
/// Every option is optional; unset options fall back to their defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    captures: Option<bool>,
    nest_limit: Option<u32>,
    state_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default compiler configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Whether groups capture.
    ///
    /// When disabled, every group (named or not) is compiled as a plain
    /// grouping and no tags are created, so every backreference fails to
    /// resolve. This is enabled by default.
    pub fn captures(mut self, yes: bool) -> Config {
        self.captures = Some(yes);
        self
    }

    /// The deepest permitted nesting of groups. Patterns that exceed it fail
    /// to compile. The default is `250`.
    pub fn nest_limit(mut self, limit: u32) -> Config {
        self.nest_limit = Some(limit);
        self
    }

    /// The maximum number of states a compiled graph may have, or `None` for
    /// no limit. There is no limit by default.
    pub fn state_limit(mut self, limit: Option<usize>) -> Config {
        self.state_limit = Some(limit);
        self
    }

    /// Returns whether groups capture.
    pub fn get_captures(&self) -> bool {
        self.captures.unwrap_or(true)
    }

    /// Returns the group nesting limit.
    pub fn get_nest_limit(&self) -> u32 {
        self.nest_limit.unwrap_or(250)
    }

    /// Returns the state limit, if any.
    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit.unwrap_or(None)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            captures: o.captures.or(self.captures),
            nest_limit: o.nest_limit.or(self.nest_limit),
            state_limit: o.state_limit.or(self.state_limit),
        }
    }
}

/// Compiles patterns into [`Graph`]s.
///
/// # Syntax
///
/// * Any character other than `. ( ) [ ] * + { } | \` matches itself.
/// * `.` matches any single token.
/// * `[abc]`, `[a-z]` and `[^abc]` are character classes. Inside a class,
///   `^` negates only in first position and `-` is literal at either end.
/// * `\n`, `\t`, `\xHHHH` (exactly four hex digits) and `\\` are escapes.
///   Any other escaped character matches itself.
/// * `(exp)` is a capturing group numbered from 1, `(?<name>exp)` is a
///   named capturing group and `(?:exp)` groups without capturing.
/// * `\k<name>` matches the text most recently captured by the named (or
///   numbered) group, which must be closed before the reference.
/// * `*`, `+`, `{m}`, `{m,}` and `{m,n}` repeat the preceding atom or group
///   greedily.
/// * `|` separates alternatives, tried left to right.
///
/// # Example
///
/// ```
/// use regex_graph::graph::{Compiler, Graph};
///
/// let graph = Compiler::new()
///     .configure(Graph::config().captures(false))
///     .build("(a|b)+")?;
/// assert!(graph.tags().is_empty());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Create a new compiler with the default configuration.
    pub fn new() -> Compiler {
        Compiler::default()
    }

    /// Apply the given configuration options to this compiler.
    pub fn configure(&mut self, config: Config) -> &mut Compiler {
        self.config = self.config.overwrite(config);
        self
    }

    /// Compile the given pattern.
    pub fn build(&self, pattern: &str) -> Result<Graph, BuildError> {
        Creator::new(self.config, pattern)?.create()
    }
}

/// The location of a group's closing paren, found by the pre-scan.
#[derive(Clone, Copy, Debug)]
struct GroupPair {
    close: usize,
    /// Whether a quantifier immediately follows the closing paren, which
    /// makes the group the body of a loop.
    quantified: bool,
}

/// An open group (or the whole pattern) whose alternatives are being
/// compiled.
#[derive(Clone, Debug)]
struct Frame {
    /// Every alternative begins with an arrow out of this state.
    open: StateID,
    /// Every alternative ends with an empty arrow into this state.
    close: StateID,
    /// The end of the alternative currently being compiled.
    tail: StateID,
    tag: Option<TagID>,
    /// The loop anchor wrapping this group, when it is quantified.
    trap: Option<StateID>,
    /// Where the group's opening paren is.
    offset: usize,
}

/// A single compilation of one pattern. All state (including the counter
/// used to number groups) is scoped to one call to `Compiler::build`.
#[derive(Debug)]
struct Creator {
    config: Config,
    pattern: Vec<char>,
    pos: usize,
    builder: Builder,
    tags: TagMapper,
    next_number: u32,
    /// Indexed by the offset of each opening paren.
    groups: Vec<Option<GroupPair>>,
    frames: Vec<Frame>,
}

impl Creator {
    fn new(config: Config, pattern: &str) -> Result<Creator, BuildError> {
        let pattern: Vec<char> = pattern.chars().collect();
        let groups = scan_groups(&pattern)?;
        let mut builder = Builder::new();
        builder.set_state_limit(config.get_state_limit());
        Ok(Creator {
            config,
            pattern,
            pos: 0,
            builder,
            tags: TagMapper::new(),
            next_number: 0,
            groups,
            frames: vec![],
        })
    }

    fn create(mut self) -> Result<Graph, BuildError> {
        let start = self.builder.add_fanout()?;
        let close = self.builder.add_fanout()?;
        self.frames.push(Frame {
            open: start,
            close,
            tail: start,
            tag: None,
            trap: None,
            offset: 0,
        });
        while let Some(ch) = self.char() {
            match ch {
                '(' => self.open_group()?,
                ')' => self.close_group()?,
                '|' => self.alternate()?,
                '*' | '+' | '{' | '}' => {
                    return Err(BuildError::dangling_quantifier(self.pos))
                }
                ']' => return Err(BuildError::unmatched_bracket(self.pos)),
                _ => self.atom()?,
            }
        }
        // The pre-scan guarantees every group was closed, so only the frame
        // for the whole pattern remains.
        assert_eq!(1, self.frames.len(), "unbalanced group frames");
        let frame = self.frames.pop().unwrap();
        let end = self.builder.add_terminal()?;
        self.builder.add_arrow(frame.tail, ArrowKind::Empty, frame.close);
        self.builder.add_arrow(frame.close, ArrowKind::Empty, end);
        self.builder.build(start, self.tags)
    }

    fn char(&self) -> Option<char> {
        self.pattern.get(self.pos).copied()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.pattern.get(offset).copied()
    }

    fn frame(&mut self) -> &mut Frame {
        // Unwrap is OK since the frame for the whole pattern is pushed
        // before anything else and only popped at the very end.
        self.frames.last_mut().unwrap()
    }

    fn at_quantifier(&self) -> bool {
        is_quantifier(self.char())
    }

    /// Compile one atom (a literal run, class, wildcard or backreference)
    /// including a quantifier that follows it.
    fn atom(&mut self) -> Result<(), BuildError> {
        let kind = match self.char() {
            Some('[') => ArrowKind::Class(self.parse_class()?),
            Some('.') => {
                self.pos += 1;
                ArrowKind::Any
            }
            Some('\\') if self.char_at(self.pos + 1) == Some('k') => {
                ArrowKind::Backreference(self.parse_backreference()?)
            }
            _ => return self.literal_run(),
        };
        if self.at_quantifier() {
            self.repeat(kind)
        } else {
            self.emit(kind)
        }
    }

    /// Compile a maximal run of unquantified literals into a single arrow.
    /// A literal followed by a quantifier is compiled as its own loop.
    fn literal_run(&mut self) -> Result<(), BuildError> {
        let mut run = vec![];
        loop {
            let before = self.pos;
            let ch = match self.parse_literal()? {
                None => break,
                Some(ch) => ch,
            };
            if self.at_quantifier() {
                if run.is_empty() {
                    return self.repeat(ArrowKind::Char(ch));
                }
                // Leave the quantified literal for the next atom.
                self.pos = before;
                break;
            }
            run.push(ch);
        }
        match run.len() {
            0 => unreachable!("literal run must start at a literal"),
            1 => self.emit(ArrowKind::Char(run[0])),
            _ => self.emit(ArrowKind::Literal(run.into_boxed_slice())),
        }
    }

    /// Add an arrow from the current tail to a fresh state, which becomes
    /// the new tail.
    fn emit(&mut self, kind: ArrowKind) -> Result<(), BuildError> {
        let tail = self.frame().tail;
        let next = self.builder.add_fanout()?;
        self.builder.add_arrow(tail, kind, next);
        self.frame().tail = next;
        Ok(())
    }

    /// Wrap an atom in a loop using the quantifier at the current position.
    ///
    /// The atom's arrow leads straight back to the trap, so each repetition
    /// consumes exactly one occurrence of the atom.
    fn repeat(&mut self, kind: ArrowKind) -> Result<(), BuildError> {
        let iteration = self.parse_quantifier()?;
        let tail = self.frame().tail;
        let trap = self.builder.add_trap()?;
        let after = self.builder.add_fanout()?;
        self.builder.add_arrow(tail, ArrowKind::Empty, trap);
        self.builder.set_trap_body(trap, kind, trap);
        self.builder.set_trap_leave(trap, after);
        self.builder.set_trap_iteration(trap, iteration);
        self.frame().tail = after;
        if self.at_quantifier() {
            return Err(BuildError::repeated_quantifier(self.pos));
        }
        Ok(())
    }

    fn open_group(&mut self) -> Result<(), BuildError> {
        let offset = self.pos;
        let limit = self.config.get_nest_limit();
        if self.frames.len() > limit as usize {
            return Err(BuildError::nest_limit_exceeded(offset, limit));
        }
        // Every '(' reached by the main pass was paired by the pre-scan.
        let pair = self.groups[offset].expect("unpaired group");
        self.pos += 1;
        let tag = self.parse_group_header()?;

        let tail = self.frame().tail;
        let open = self.builder.add_tag_open(tag)?;
        let close = self.builder.add_tag_close(tag)?;
        let trap = if pair.quantified {
            let trap = self.builder.add_trap()?;
            self.builder.add_arrow(tail, ArrowKind::Empty, trap);
            self.builder.set_trap_body(trap, ArrowKind::Empty, open);
            Some(trap)
        } else {
            self.builder.add_arrow(tail, ArrowKind::Empty, open);
            None
        };
        self.frames.push(Frame { open, close, tail: open, tag, trap, offset });
        Ok(())
    }

    /// Parse what follows an opening paren and create the group's tag, if
    /// it captures.
    fn parse_group_header(&mut self) -> Result<Option<TagID>, BuildError> {
        let name = if self.char() == Some('?') {
            match self.char_at(self.pos + 1) {
                Some(':') => {
                    self.pos += 2;
                    return Ok(None);
                }
                Some('<') => {
                    let offset = self.pos - 1;
                    self.pos += 1;
                    let name = self.parse_name()?;
                    if self.tags.get(&name).is_some() {
                        return Err(BuildError::duplicate_tag(offset, &name));
                    }
                    name
                }
                _ => return Err(BuildError::invalid_group_name(self.pos)),
            }
        } else {
            self.next_number += 1;
            let name = self.next_number.to_string();
            if self.tags.get(&name).is_some() {
                return Err(BuildError::duplicate_tag(self.pos - 1, &name));
            }
            name
        };
        if !self.config.get_captures() {
            return Ok(None);
        }
        Ok(Some(self.tags.open(&name)?))
    }

    /// Parse `<name>` at the current position.
    fn parse_name(&mut self) -> Result<String, BuildError> {
        if self.char() != Some('<') {
            return Err(BuildError::invalid_group_name(self.pos));
        }
        let start = self.pos;
        self.pos += 1;
        let mut name = String::new();
        loop {
            match self.char() {
                Some('>') => break,
                Some(ch) if ch.is_alphanumeric() || ch == '_' => {
                    name.push(ch);
                    self.pos += 1;
                }
                Some(_) => {
                    return Err(BuildError::invalid_group_name(self.pos))
                }
                None => return Err(BuildError::invalid_group_name(start)),
            }
        }
        if name.is_empty() {
            return Err(BuildError::invalid_group_name(self.pos));
        }
        self.pos += 1;
        Ok(name)
    }

    fn close_group(&mut self) -> Result<(), BuildError> {
        if self.frames.len() == 1 {
            return Err(BuildError::unmatched_paren(self.pos));
        }
        // Unwrap is OK since there is more than one frame.
        let frame = self.frames.pop().unwrap();
        debug_assert_eq!(
            Some(self.pos),
            self.groups[frame.offset].map(|p| p.close),
        );
        self.builder.add_arrow(frame.tail, ArrowKind::Empty, frame.close);
        if let Some(tag) = frame.tag {
            self.tags.close(tag);
        }
        self.pos += 1;
        match frame.trap {
            None => self.frame().tail = frame.close,
            Some(trap) => {
                let iteration = self.parse_quantifier()?;
                let after = self.builder.add_fanout()?;
                self.builder.add_arrow(frame.close, ArrowKind::Empty, trap);
                self.builder.set_trap_leave(trap, after);
                self.builder.set_trap_iteration(trap, iteration);
                self.frame().tail = after;
                if self.at_quantifier() {
                    return Err(BuildError::repeated_quantifier(self.pos));
                }
            }
        }
        Ok(())
    }

    /// Finish the current alternative and start the next one from the
    /// enclosing group's shared start state.
    fn alternate(&mut self) -> Result<(), BuildError> {
        let frame = self.frame().clone();
        self.builder.add_arrow(frame.tail, ArrowKind::Empty, frame.close);
        self.frame().tail = frame.open;
        self.pos += 1;
        Ok(())
    }

    /// Parse `*`, `+`, `{m}`, `{m,}` or `{m,n}` at the current position.
    fn parse_quantifier(&mut self) -> Result<Iteration, BuildError> {
        match self.char() {
            Some('*') => {
                self.pos += 1;
                Ok(Iteration::star())
            }
            Some('+') => {
                self.pos += 1;
                Ok(Iteration::plus())
            }
            Some('{') => {
                self.pos += 1;
                let min = self.parse_count()?;
                let iteration = match self.char() {
                    Some('}') => Iteration::exactly(min),
                    Some(',') if self.char_at(self.pos + 1) == Some('}') => {
                        self.pos += 1;
                        Iteration::at_least(min)
                    }
                    Some(',') => {
                        self.pos += 1;
                        let offset = self.pos;
                        let max = self.parse_count()?;
                        if min > max {
                            return Err(BuildError::invalid_bounds(offset));
                        }
                        if self.char() != Some('}') {
                            return Err(BuildError::invalid_bounds(self.pos));
                        }
                        Iteration::between(min, max)
                    }
                    _ => return Err(BuildError::invalid_bounds(self.pos)),
                };
                self.pos += 1;
                Ok(iteration)
            }
            _ => Err(BuildError::dangling_quantifier(self.pos)),
        }
    }

    /// Parse a decimal repetition count.
    fn parse_count(&mut self) -> Result<u32, BuildError> {
        let start = self.pos;
        let mut count: u32 = 0;
        while let Some(digit) = self.char().and_then(|c| c.to_digit(10)) {
            count = count
                .checked_mul(10)
                .and_then(|c| c.checked_add(digit))
                .filter(|&c| c <= Iteration::MAX_FINITE)
                .ok_or_else(|| BuildError::invalid_bounds(start))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(BuildError::invalid_bounds(self.pos));
        }
        Ok(count)
    }

    /// Parse one literal character, including escapes, at the current
    /// position. Returns `None` without moving when the current position
    /// does not start a literal.
    fn parse_literal(&mut self) -> Result<Option<char>, BuildError> {
        match self.char() {
            None => Ok(None),
            Some(ch) if is_meta(ch) => Ok(None),
            Some('\\') if self.char_at(self.pos + 1) == Some('k') => Ok(None),
            Some('\\') => self.parse_escape().map(Some),
            Some(ch) => {
                self.pos += 1;
                Ok(Some(ch))
            }
        }
    }

    /// Parse an escape sequence starting with the backslash at the current
    /// position.
    fn parse_escape(&mut self) -> Result<char, BuildError> {
        let offset = self.pos;
        let ch = match self.char_at(self.pos + 1) {
            None => return Err(BuildError::invalid_escape(offset)),
            Some(ch) => ch,
        };
        self.pos += 2;
        match ch {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'x' => {
                let mut value = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .char()
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| BuildError::invalid_escape(offset))?;
                    value = value * 16 + digit;
                    self.pos += 1;
                }
                char::from_u32(value)
                    .ok_or_else(|| BuildError::invalid_escape(offset))
            }
            ch => Ok(ch),
        }
    }

    /// Parse `\k<name>` at the current position and resolve it to a tag.
    fn parse_backreference(&mut self) -> Result<TagID, BuildError> {
        let offset = self.pos;
        self.pos += 2;
        let name = self.parse_name()?;
        let tag = self
            .tags
            .get(&name)
            .ok_or_else(|| BuildError::unknown_tag(offset, &name))?;
        if !self.tags.is_closed(tag) {
            return Err(BuildError::open_tag(offset, &name));
        }
        Ok(tag)
    }

    /// Parse a `[...]` class at the current position and store it.
    fn parse_class(&mut self) -> Result<ClassID, BuildError> {
        let start = self.pos;
        self.pos += 1;
        let mut set = if self.char() == Some('^') {
            self.pos += 1;
            CharSet::negated()
        } else {
            CharSet::new()
        };
        let mut items = 0;
        loop {
            match self.char() {
                None => return Err(BuildError::unmatched_bracket(start)),
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {}
            }
            let offset = self.pos;
            let low = self.class_char()?;
            let is_range = self.char() == Some('-')
                && !matches!(self.char_at(self.pos + 1), None | Some(']'));
            if is_range {
                self.pos += 1;
                let high = self.class_char()?;
                if low > high {
                    return Err(BuildError::invalid_class_range(
                        offset, low, high,
                    ));
                }
                set.add_range(low, high);
            } else {
                set.add(low);
            }
            items += 1;
        }
        if items == 0 || set.is_empty() {
            return Err(BuildError::empty_class(start));
        }
        self.builder.add_class(set)
    }

    /// Parse one (possibly escaped) character inside a class.
    fn class_char(&mut self) -> Result<char, BuildError> {
        match self.char() {
            None => Err(BuildError::unmatched_bracket(self.pos)),
            Some('\\') => self.parse_escape(),
            Some(ch) => {
                self.pos += 1;
                Ok(ch)
            }
        }
    }
}

/// Returns true for characters that never match themselves outside of a
/// class.
fn is_meta(ch: char) -> bool {
    matches!(ch, '.' | '(' | ')' | '[' | ']' | '*' | '+' | '{' | '}' | '|')
}

fn is_quantifier(ch: Option<char>) -> bool {
    matches!(ch, Some('*') | Some('+') | Some('{'))
}

/// Pair up every parenthesis in the pattern, skipping escapes and the
/// contents of classes.
///
/// The result is indexed by the offset of each opening paren. Recording
/// whether a quantifier follows each closing paren lets the main pass decide
/// at the opening paren whether the group becomes a loop.
fn scan_groups(
    pattern: &[char],
) -> Result<Vec<Option<GroupPair>>, BuildError> {
    let mut groups = vec![None; pattern.len()];
    let mut open = vec![];
    let mut i = 0;
    while i < pattern.len() {
        match pattern[i] {
            '\\' => i += 1,
            '[' => i = class_end(pattern, i)?,
            '(' => open.push(i),
            ')' => {
                let start =
                    open.pop().ok_or_else(|| BuildError::unmatched_paren(i))?;
                let quantified = is_quantifier(pattern.get(i + 1).copied());
                groups[start] = Some(GroupPair { close: i, quantified });
            }
            _ => {}
        }
        i += 1;
    }
    if let Some(&start) = open.last() {
        return Err(BuildError::unmatched_paren(start));
    }
    Ok(groups)
}

/// Return the offset of the bracket closing the class that opens at
/// `start`.
fn class_end(pattern: &[char], start: usize) -> Result<usize, BuildError> {
    let mut i = start + 1;
    if pattern.get(i) == Some(&'^') {
        i += 1;
    }
    while i < pattern.len() {
        match pattern[i] {
            '\\' => i += 2,
            ']' => return Ok(i),
            _ => i += 1,
        }
    }
    Err(BuildError::unmatched_bracket(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::state::State;

    fn offset(pattern: &str) -> Option<usize> {
        Graph::new(pattern).unwrap_err().offset()
    }

    #[test]
    fn error_offsets() {
        assert_eq!(Some(0), offset("(a"));
        assert_eq!(Some(1), offset("a)"));
        assert_eq!(Some(1), offset("a(b"));
        assert_eq!(Some(0), offset("[a"));
        assert_eq!(Some(1), offset("a]"));
        assert_eq!(Some(1), offset("[z-a]"));
        assert_eq!(Some(0), offset("[]"));
        assert_eq!(Some(0), offset("*a"));
        assert_eq!(Some(2), offset("a|+"));
        assert_eq!(Some(2), offset("a**"));
        assert_eq!(Some(4), offset("(a)+*"));
        assert_eq!(Some(4), offset("a{3,2}"));
        assert_eq!(Some(2), offset("a{x}"));
        assert_eq!(Some(0), offset("\\x00g1"));
        assert_eq!(Some(1), offset("a\\"));
        assert_eq!(Some(1), offset("(?x)"));
        assert_eq!(Some(7), offset("(?<x>a)(?<x>b)"));
        assert_eq!(Some(0), offset("\\k<x>"));
        assert_eq!(Some(2), offset("(a\\k<1>)"));
    }

    #[test]
    fn error_messages() {
        let err = Graph::new("(?<w>a)\\k<v>").unwrap_err();
        assert_eq!(
            "backreference to unknown group 'v' at offset 7",
            err.to_string(),
        );
        let err = Graph::new("a{1,x}").unwrap_err();
        assert_eq!("invalid repetition bounds at offset 4", err.to_string());
    }

    #[test]
    fn bounds_too_large() {
        assert!(Graph::new("a{4294967295}").is_err());
        assert!(Graph::new("a{4294967294}").is_ok());
        assert!(Graph::new("a{99999999999}").is_err());
    }

    #[test]
    fn nest_limit() {
        let mut compiler = Compiler::new();
        compiler.configure(Graph::config().nest_limit(1));
        assert!(compiler.build("(a)(b)").is_ok());
        let err = compiler.build("((a))").unwrap_err();
        assert_eq!(Some(1), err.offset());
    }

    #[test]
    fn tags_are_numbered_in_order() {
        let graph = Graph::new("(a)(?<n>b)(?:c)(d)").unwrap();
        let names: Vec<&str> = graph.tags().names().collect();
        assert_eq!(vec!["1", "n", "2"], names);
        assert!(graph.tags().get("2").is_some());
        assert!(graph.tags().get("3").is_none());
    }

    #[test]
    fn numbering_restarts_for_every_compile() {
        let compiler = Compiler::new();
        let g1 = compiler.build("(a)").unwrap();
        let g2 = compiler.build("(a)").unwrap();
        assert_eq!(g1.tags().get("1"), g2.tags().get("1"));
        assert_eq!(format!("{:?}", g1), format!("{:?}", g2));
    }

    #[test]
    fn captures_disabled() {
        let mut compiler = Compiler::new();
        compiler.configure(Graph::config().captures(false));
        let graph = compiler.build("(a)(?<x>b)").unwrap();
        assert!(graph.tags().is_empty());
        assert!(compiler.build("(a)\\k<1>").is_err());
    }

    #[test]
    fn literal_runs_share_one_arrow() {
        let graph = Graph::new("abc").unwrap();
        let literal = graph.states().iter().any(|s| {
            s.arrows().iter().any(|a| match a.kind {
                ArrowKind::Literal(ref chars) => &**chars == &['a', 'b', 'c'],
                _ => false,
            })
        });
        assert!(literal);
        assert_eq!(Some(&['a', 'b', 'c'][..]), graph.literal_prefix());
    }

    #[test]
    fn quantified_literal_ends_a_run() {
        let graph = Graph::new("abc*").unwrap();
        assert_eq!(Some(&['a', 'b'][..]), graph.literal_prefix());
        let traps: Vec<&State> = graph
            .states()
            .iter()
            .filter(|s| matches!(s, State::Trap { .. }))
            .collect();
        assert_eq!(1, traps.len());
        match *traps[0] {
            State::Trap { ref body, ref iteration, .. } => {
                assert_eq!(ArrowKind::Char('c'), body.kind);
                assert_eq!(0, iteration.min_times());
                assert_eq!(None, iteration.max_times());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn escapes() {
        let graph = Graph::new("\\x0041\\n\\t\\.\\\\").unwrap();
        assert_eq!(
            Some(&['A', '\n', '\t', '.', '\\'][..]),
            graph.literal_prefix()
        );
        // Surrogates are not characters.
        assert!(Graph::new("\\xD800").is_err());
    }

    #[test]
    fn class_edges() {
        let graph = Graph::new("[-a-c^]").unwrap();
        let class = graph.class(ClassID::ZERO);
        assert!(class.contains('-'));
        assert!(class.contains('b'));
        assert!(class.contains('^'));
        assert!(!class.contains('d'));

        let graph = Graph::new("[^a]").unwrap();
        assert!(!graph.class(ClassID::ZERO).contains('a'));
        assert!(graph.class(ClassID::ZERO).contains('z'));

        // Parens inside classes do not count as groups.
        assert!(Graph::new("[(]").is_ok());
        assert!(Graph::new("[\\]]").is_ok());
    }

    #[test]
    fn graph_shape_is_deterministic() {
        let a = Graph::new("(ab|cd)+[x-z]{2,3}\\k<1>").unwrap();
        let b = Graph::new("(ab|cd)+[x-z]{2,3}\\k<1>").unwrap();
        assert_eq!(format!("{:?}", a), format!("{:?}", b));
        assert_eq!(2, a.trap_len());
    }

    #[test]
    fn empty_pattern_and_alternatives() {
        assert!(Graph::new("").is_ok());
        assert!(Graph::new("|").is_ok());
        assert!(Graph::new("()").is_ok());
        assert!(Graph::new("(|a)*").is_ok());
    }
}
