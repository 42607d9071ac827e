use crate::{
    backtrack::{Backtracker, Cache},
    graph::{self, error::BuildError, graph::Graph},
    util::stream::{CharStream, Span},
};

#[cfg(feature = "perf-literal")]
use crate::util::prefilter::Prefilter;

/// A compiled pattern for matching `&str` haystacks.
///
/// This wraps a [`Backtracker`] with the conveniences most callers want:
/// whole-string matching, capture extraction by name and unanchored search.
/// Each call allocates its own search cache, so a `Regex` can be shared
/// freely between threads. Callers that search in a hot loop may prefer to
/// drive a [`Backtracker`] directly and reuse a [`Cache`].
///
/// # Example
///
/// ```
/// use regex_graph::Regex;
///
/// let re = Regex::new(r"(?<key>[a-z]+)=(?<val>[0-9]+)")?;
/// assert!(re.is_match("width=80"));
/// assert!(!re.is_match("width=80px"));
///
/// let caps = re.captures("width=80").unwrap();
/// assert_eq!(Some("width"), caps.get("key"));
/// assert_eq!(Some("80"), caps.get("val"));
///
/// let span = re.find("set height=24 now").unwrap();
/// assert_eq!("height=24", &"set height=24 now"[span.range()]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Regex {
    /// Requires the match to consume the whole haystack.
    full: Backtracker,
    /// Accepts the first match starting at a given position.
    prefix: Backtracker,
    #[cfg(feature = "perf-literal")]
    prefilter: Option<Prefilter>,
}

/// A builder for a [`Regex`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    compiler: graph::Compiler,
}

impl Builder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Apply the given compiler configuration options.
    pub fn graph(&mut self, config: graph::Config) -> &mut Builder {
        self.compiler.configure(config);
        self
    }

    /// Compile the given pattern.
    pub fn build(&self, pattern: &str) -> Result<Regex, BuildError> {
        let graph = self.compiler.build(pattern)?;
        Ok(self.build_from_graph(graph))
    }

    /// Wrap an already compiled graph.
    pub fn build_from_graph(&self, graph: Graph) -> Regex {
        let full = Backtracker::new_from_graph(graph.clone());
        let prefix = Backtracker::builder()
            .configure(Backtracker::config().match_to_end(false))
            .build_from_graph(graph);
        Regex {
            #[cfg(feature = "perf-literal")]
            prefilter: full.graph().literal_prefix().and_then(Prefilter::new),
            full,
            prefix,
        }
    }
}

impl Regex {
    /// Compile the given pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Regex, BuildError> {
        Regex::builder().build(pattern)
    }

    /// Return a builder for configuring the compilation of a regex.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// The compiled graph underlying this regex.
    pub fn graph(&self) -> &Graph {
        self.full.graph()
    }

    /// Returns true if the pattern matches all of `haystack`.
    pub fn is_match(&self, haystack: &str) -> bool {
        let mut cache = self.full.create_cache();
        self.full.verify(&mut cache, CharStream::new(haystack))
    }

    /// Match the pattern against all of `haystack` and return what every
    /// tag captured, or `None` if it does not match.
    pub fn captures<'h>(&self, haystack: &'h str) -> Option<Captures<'h>> {
        let mut cache = self.full.create_cache();
        if !self.full.verify(&mut cache, CharStream::new(haystack)) {
            return None;
        }
        Some(Captures::new(self.full.graph().clone(), haystack, &cache))
    }

    /// Return the leftmost match of the pattern anywhere in `haystack`.
    ///
    /// Start positions are tried from left to right. At each one, the first
    /// path through the pattern to succeed (in the usual greedy, left to
    /// right preference order) determines where the match ends.
    pub fn find(&self, haystack: &str) -> Option<Span<usize>> {
        let mut cache = self.prefix.create_cache();
        let mut at = 0;
        loop {
            at = self.next_candidate(haystack, at)?;
            let mut stream = CharStream::at(haystack, at);
            if let Some(end) = self.prefix.search(&mut cache, &mut stream) {
                return Some(Span { start: at, end });
            }
            at += haystack[at..].chars().next()?.len_utf8();
        }
    }

    /// Return every non-overlapping match in `haystack`, from left to right.
    pub fn find_iter<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> FindMatches<'r, 'h> {
        FindMatches {
            re: self,
            cache: self.prefix.create_cache(),
            haystack,
            at: 0,
            last_end: None,
        }
    }

    /// Return the first position at or after `at` where a match could begin.
    #[cfg(feature = "perf-literal")]
    fn next_candidate(&self, haystack: &str, at: usize) -> Option<usize> {
        match self.prefilter {
            None if at <= haystack.len() => Some(at),
            None => None,
            Some(ref pre) => pre.find(haystack.as_bytes(), at),
        }
    }

    #[cfg(not(feature = "perf-literal"))]
    fn next_candidate(&self, haystack: &str, at: usize) -> Option<usize> {
        if at <= haystack.len() {
            Some(at)
        } else {
            None
        }
    }
}

/// An iterator over the non-overlapping matches in a haystack.
///
/// Created by [`Regex::find_iter`].
#[derive(Debug)]
pub struct FindMatches<'r, 'h> {
    re: &'r Regex,
    cache: Cache<usize>,
    haystack: &'h str,
    at: usize,
    last_end: Option<usize>,
}

impl<'r, 'h> Iterator for FindMatches<'r, 'h> {
    type Item = Span<usize>;

    fn next(&mut self) -> Option<Span<usize>> {
        loop {
            let start = self.re.next_candidate(self.haystack, self.at)?;
            let mut stream = CharStream::at(self.haystack, start);
            let found = self.re.prefix.search(&mut self.cache, &mut stream);
            match found {
                // An empty match right after the previous match is skipped,
                // since it would repeat that match's end.
                Some(end) if end == start && self.last_end == Some(start) => {}
                Some(end) => {
                    self.last_end = Some(end);
                    self.at = if end == start {
                        start + next_char_len(self.haystack, start)
                    } else {
                        end
                    };
                    return Some(Span { start, end });
                }
                None => {}
            }
            if start >= self.haystack.len() {
                return None;
            }
            self.at = start + next_char_len(self.haystack, start);
        }
    }
}

/// The length in bytes of the character at `at`, or 1 at the end so that
/// iteration always terminates.
fn next_char_len(haystack: &str, at: usize) -> usize {
    haystack[at..].chars().next().map_or(1, char::len_utf8)
}

/// The spans captured by each tag in a successful match.
///
/// Spans are byte offsets into the haystack.
#[derive(Clone, Debug)]
pub struct Captures<'h> {
    graph: Graph,
    haystack: &'h str,
    /// Indexed by tag ID.
    spans: Vec<Option<Span<usize>>>,
}

impl<'h> Captures<'h> {
    fn new(
        graph: Graph,
        haystack: &'h str,
        cache: &Cache<usize>,
    ) -> Captures<'h> {
        let spans = cache.tags().iter().map(|t| t.span()).collect();
        Captures { graph, haystack, spans }
    }

    /// The span captured by the named tag, if it participated in the match.
    pub fn get_match(&self, name: &str) -> Option<Span<usize>> {
        let tag = self.graph.tags().get(name)?;
        self.spans[tag.as_usize()]
    }

    /// The text captured by the named tag, if it participated in the match.
    pub fn get(&self, name: &str) -> Option<&'h str> {
        self.get_match(name).map(|span| &self.haystack[span.range()])
    }

    /// Iterate over every tag name and its span, in the order the groups
    /// appear in the pattern.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Span<usize>>)> {
        self.graph.tags().names().zip(self.spans.iter().copied())
    }

    /// The number of tags, whether or not they participated in the match.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if the pattern has no tags.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(pattern: &str, haystack: &str) -> Option<(usize, usize)> {
        let re = Regex::new(pattern).unwrap();
        re.find(haystack).map(|s| (s.start, s.end))
    }

    fn find_all(pattern: &str, haystack: &str) -> Vec<(usize, usize)> {
        let re = Regex::new(pattern).unwrap();
        re.find_iter(haystack).map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn find_leftmost() {
        assert_eq!(Some((2, 5)), find("b+c", "aabbc"));
        assert_eq!(Some((0, 0)), find("x*", "abc"));
        assert_eq!(None, find("d", "abc"));
        assert_eq!(Some((4, 5)), find("c", "a\u{2603}c"));
        assert_eq!(Some((2, 4)), find("ab", "xxab"));
        assert_eq!(Some((1, 3)), find("(a|b)\\k<1>", "abba"));
    }

    #[test]
    fn find_iter_skips_overlaps() {
        assert_eq!(vec![(0, 2), (3, 4)], find_all("a+", "aa-a"));
        assert_eq!(vec![(0, 0), (1, 1), (2, 2)], find_all("x*", "ab"));
        assert_eq!(vec![(0, 0), (1, 3)], find_all("a*", "baa"));
        assert_eq!(vec![(1, 3), (5, 7)], find_all("ab", "xabxxab"));
    }

    #[test]
    fn captures_by_name() {
        let re = Regex::new("(a)(b)").unwrap();
        let caps = re.captures("ab").unwrap();
        assert_eq!(2, caps.len());
        assert_eq!(Some(Span { start: 0, end: 1 }), caps.get_match("1"));
        assert_eq!(Some("b"), caps.get("2"));
        let names: Vec<&str> = caps.iter().map(|(name, _)| name).collect();
        assert_eq!(vec!["1", "2"], names);
        assert!(re.captures("abc").is_none());
    }

    #[test]
    fn non_capturing_config() {
        let re = Regex::builder()
            .graph(graph::Config::new().captures(false))
            .build("(a)(b)")
            .unwrap();
        let caps = re.captures("ab").unwrap();
        assert!(caps.is_empty());
        assert_eq!(None, caps.get("1"));
    }
}
