use std::cell::RefCell;

use regex_graph::{
    backtrack::Backtracker, graph, util::stream::SliceStream, BuildError,
    Regex,
};

use regex_graph_test::{
    Captures, CompileError, CompiledRegex, Match, RegexTest, TestResult,
    TestRunner,
};

use crate::{suite, Result};

/// Tests the `Regex` front end, which matches `&str` haystacks with byte
/// offsets.
#[test]
fn regex_default() -> Result<()> {
    TestRunner::new()?.test_iter(suite()?.iter(), compiler_regex).assert();
    Ok(())
}

/// Tests the backtracker directly over a slice of chars, reusing one cache
/// for every search of a test. Unanchored searches are skipped since the
/// backtracker only matches from the start of its stream.
#[test]
fn backtracker_char_slice() -> Result<()> {
    TestRunner::new()?
        .test_iter(suite()?.iter(), compiler_backtracker)
        .assert();
    Ok(())
}

/// Tests the backtracker over Latin-1 bytes. Only tests whose input is
/// ASCII are run, since every other byte would be a different character.
#[test]
fn backtracker_bytes() -> Result<()> {
    TestRunner::new()?
        .test_iter(suite()?.iter(), |test| {
            if !test.input().is_ascii() || !test.regex().is_ascii() {
                return Ok(CompiledRegex::skip());
            }
            let re = Backtracker::builder()
                .graph(config(test))
                .build(test.regex())
                .map_err(compile_error)?;
            let cache = RefCell::new(re.create_cache::<usize>());
            Ok(CompiledRegex::compiled(move |test| {
                if test.captures().is_some() || test.matches().is_some() {
                    return vec![TestResult::skip()];
                }
                let stream = SliceStream::new(test.input().as_bytes());
                let matched = re.verify(&mut *cache.borrow_mut(), stream);
                vec![TestResult::is_match(matched).name("verify-bytes")]
            }))
        })
        .assert();
    Ok(())
}

fn compiler_regex(
    test: &RegexTest,
) -> std::result::Result<CompiledRegex, CompileError> {
    let re = Regex::builder()
        .graph(config(test))
        .build(test.regex())
        .map_err(compile_error)?;
    Ok(CompiledRegex::compiled(move |test| vec![run_regex(&re, test)]))
}

fn run_regex(re: &Regex, test: &RegexTest) -> TestResult {
    if test.matches().is_some() {
        let it = re.find_iter(test.input()).map(|span| Match {
            start: span.start,
            end: span.end,
        });
        return TestResult::matches(it).name("find_iter");
    }
    if test.captures().is_some() {
        let caps = re.captures(test.input()).map(|caps| {
            caps.iter()
                .map(|(name, span)| {
                    let m = span.map(|s| Match { start: s.start, end: s.end });
                    (name.to_string(), m)
                })
                .collect::<Captures>()
        });
        return TestResult::captures(caps).name("captures");
    }
    TestResult::is_match(re.is_match(test.input())).name("is_match")
}

fn compiler_backtracker(
    test: &RegexTest,
) -> std::result::Result<CompiledRegex, CompileError> {
    let re = Backtracker::builder()
        .graph(config(test))
        .build(test.regex())
        .map_err(compile_error)?;
    let cache = RefCell::new(re.create_cache::<usize>());
    Ok(CompiledRegex::compiled(move |test| {
        if test.matches().is_some() {
            return vec![TestResult::skip()];
        }
        let chars: Vec<char> = test.input().chars().collect();
        let mut cache = cache.borrow_mut();
        let matched = re.verify(&mut *cache, SliceStream::new(&chars));
        if test.captures().is_none() {
            return vec![TestResult::is_match(matched).name("verify")];
        }
        if !matched {
            return vec![TestResult::captures(None).name("verify")];
        }
        // Tag positions are char indices here, but tests speak in bytes.
        let offsets: Vec<usize> = test
            .input()
            .char_indices()
            .map(|(i, _)| i)
            .chain(Some(test.input().len()))
            .collect();
        let names = re.graph().tags().names();
        let caps = names
            .zip(cache.tags())
            .map(|(name, tracker)| {
                let m = tracker.span().map(|s| Match {
                    start: offsets[s.start],
                    end: offsets[s.end],
                });
                (name.to_string(), m)
            })
            .collect::<Captures>();
        vec![TestResult::captures(Some(caps)).name("verify")]
    }))
}

fn config(test: &RegexTest) -> graph::Config {
    graph::Config::new().captures(test.capture_groups())
}

fn compile_error(err: BuildError) -> CompileError {
    let offset = err.offset();
    CompileError::new(err, offset)
}
