use std::sync::Arc;

use quickcheck::quickcheck;

use regex_graph::{
    backtrack::Backtracker,
    graph::{ArrowKind, Graph, TagMapper},
    util::{
        iteration::Iteration,
        stream::{CharStream, Span, Stream},
    },
    Regex,
};

use crate::Result;

fn is_match(pattern: &str, haystack: &str) -> bool {
    Regex::new(pattern).unwrap().is_match(haystack)
}

/// Maps arbitrary bytes onto lowercase ASCII letters, which are never meta
/// characters.
fn letters(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b'a' + b % 26)).collect()
}

quickcheck! {
    fn prop_literal_matches_only_itself(bytes: Vec<u8>, at: usize) -> bool {
        let text = letters(&bytes);
        if !is_match(&text, &text) {
            return false;
        }
        if text.is_empty() {
            return true;
        }
        let mut chars: Vec<char> = text.chars().collect();
        let i = at % chars.len();
        chars[i] = if chars[i] == 'z' { 'a' } else { 'z' };
        let perturbed: String = chars.into_iter().collect();
        !is_match(&text, &perturbed)
    }

    fn prop_compiling_twice_agrees(bytes: Vec<u8>) -> bool {
        let haystack = letters(&bytes);
        let re1 = Regex::new("(a|b)*c*[d-m]+|z{2,}").unwrap();
        let re2 = Regex::new("(a|b)*c*[d-m]+|z{2,}").unwrap();
        re1.is_match(&haystack) == re2.is_match(&haystack)
            && re1.find(&haystack) == re2.find(&haystack)
    }
}

#[test]
fn captures_in_order() -> Result<()> {
    let re = Regex::new("(a)(b)")?;
    let caps = re.captures("ab").unwrap();
    assert_eq!(Some(Span { start: 0, end: 1 }), caps.get_match("1"));
    assert_eq!(Some(Span { start: 1, end: 2 }), caps.get_match("2"));
    Ok(())
}

#[test]
fn compilation_is_deterministic() -> Result<()> {
    let (g1, g2) = (Graph::new("(a|b)+\\k<1>")?, Graph::new("(a|b)+\\k<1>")?);
    assert_eq!(format!("{:?}", g1), format!("{:?}", g2));
    Ok(())
}

#[test]
fn quantifier_bounds() {
    assert!(!is_match("a{2,3}", "a"));
    assert!(is_match("a{2,3}", "aa"));
    assert!(is_match("a{2,3}", "aaa"));
    assert!(!is_match("a{2,3}", "aaaa"));
}

#[test]
fn backreference_requires_equal_halves() {
    assert!(is_match(r"(a+)\k<1>", "aaaa"));
    assert!(is_match(r"(a+)\k<1>", "aa"));
    assert!(!is_match(r"(a+)\k<1>", "aaa"));
}

#[test]
fn negated_class() {
    assert!(is_match("[^abc]", "d"));
    assert!(!is_match("[^abc]", "a"));
    assert!(!is_match("[^abc]", "b"));
    assert!(!is_match("[^abc]", "c"));
}

#[test]
fn alternation_inside_loop() {
    assert!(is_match("(ab|cd)+", "abcdab"));
    assert!(!is_match("(ab|cd)+", "abc"));
}

#[test]
fn empty_loop_terminates() {
    assert!(is_match("(a*)*", ""));
    assert!(is_match("((a*)*)*", ""));
    assert!(is_match("(a*)+(b*)*", "aab"));
}

#[test]
fn shared_between_threads() -> Result<()> {
    let re = Arc::new(Regex::new(r"(?<w>[a-z]+)-\k<w>")?);
    let handles: Vec<_> = ["ab-ab", "xyz-xyz", "ab-ba", "q-q"]
        .iter()
        .map(|&haystack| {
            let re = Arc::clone(&re);
            std::thread::spawn(move || re.is_match(haystack))
        })
        .collect();
    let got: Vec<bool> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(vec![true, true, false, true], got);
    Ok(())
}

/// A stream that folds ASCII letters to lowercase as they are read.
#[derive(Clone, Debug)]
struct Folded<'a>(CharStream<'a>);

impl<'a> Stream for Folded<'a> {
    type Token = char;
    type Pos = usize;

    fn peek(&self) -> Option<char> {
        self.0.peek().map(|ch| ch.to_ascii_lowercase())
    }

    fn advance(&mut self, n: isize) {
        self.0.advance(n)
    }

    fn pos(&self) -> usize {
        self.0.pos()
    }

    fn set_pos(&mut self, pos: usize) {
        self.0.set_pos(pos)
    }
}

#[test]
fn custom_stream() -> Result<()> {
    let re = Backtracker::new(r"(?<tag>[a-z]+)=\k<tag>")?;
    let mut cache = re.create_cache();
    assert!(re.verify(&mut cache, Folded(CharStream::new("Key=kEY"))));
    assert_eq!(
        Some(Span { start: 0, end: 3 }),
        re.get_match(&cache, "tag"),
    );
    assert!(!re.verify(&mut cache, Folded(CharStream::new("Key=kEYs"))));
    Ok(())
}

#[test]
fn search_reports_prefix_end() -> Result<()> {
    let re = Backtracker::builder()
        .configure(Backtracker::config().match_to_end(false))
        .build("a+b")?;
    let mut cache = re.create_cache();
    let mut stream = CharStream::new("aabxyz");
    assert_eq!(Some(3), re.search(&mut cache, &mut stream));
    assert_eq!(3, stream.pos());
    Ok(())
}

#[test]
fn hand_built_graph() -> Result<()> {
    // a(b)* without the tag
    let mut builder = Graph::builder();
    let start = builder.add_fanout()?;
    let trap = builder.add_trap()?;
    let end = builder.add_terminal()?;
    builder.add_arrow(start, ArrowKind::Char('a'), trap);
    builder.set_trap_body(trap, ArrowKind::Char('b'), trap);
    builder.set_trap_leave(trap, end);
    builder.set_trap_iteration(trap, Iteration::star());
    let graph = builder.build(start, TagMapper::new())?;

    let re = Regex::builder().build_from_graph(graph);
    assert!(re.is_match("a"));
    assert!(re.is_match("abbb"));
    assert!(!re.is_match("ab b"));
    assert_eq!(Some(Span { start: 2, end: 5 }), re.find("xxabb"));
    Ok(())
}

#[test]
fn error_offsets_are_in_chars() {
    let err = Regex::new("☃☃(").unwrap_err();
    assert_eq!(Some(2), err.offset());
}

#[test]
fn deep_backtracking_uses_heap_stack() {
    let haystack = "ab".repeat(100_000);
    assert!(is_match("(ab|cd)*", &haystack));
    assert!(!is_match("(ab|cd)*e", &haystack));
}
