/*!
A TOML driven test suite harness for `regex-graph`.

Tests are grouped in TOML files, one `[[tests]]` table per test:

```toml
[[tests]]
name = "backref-even"
regex = '(a+)\k<1>'
input = "aaaa"
captures = { 1 = [0, 2] }
```

Each test names exactly one expectation:

* `match` is whether the pattern matches the *entire* input.
* `matches` lists every non-overlapping match found by an unanchored
  search, as `[start, end]` byte offsets.
* `captures` maps tag names to the span each tag captured when matching the
  entire input. An empty array means the tag did not participate.

A test with `compiles = false` instead expects compilation to fail, at the
character offset given by `error_offset` when present.
*/

use std::{
    borrow::Borrow,
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

const ENV_REGEX_TEST: &str = "REGEX_TEST";
const ENV_REGEX_TEST_VERBOSE: &str = "REGEX_TEST_VERBOSE";

/// A collection of regex tests.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegexTests {
    tests: Vec<RegexTest>,
    #[serde(skip)]
    seen: HashSet<String>,
}

/// A regex test describes a pattern, an input and what matching one against
/// the other should produce.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexTest {
    #[serde(skip)]
    group: String,
    #[serde(default)]
    name: String,
    #[serde(skip)]
    full_name: String,
    regex: String,
    input: String,
    #[serde(rename = "match")]
    is_match: Option<bool>,
    matches: Option<Vec<Match>>,
    captures: Option<BTreeMap<String, MaybeMatch>>,
    #[serde(default = "default_true")]
    compiles: bool,
    error_offset: Option<usize>,
    #[serde(default = "default_true")]
    capture_groups: bool,
}

/// A single match span, represented via byte offsets.
#[derive(Clone, Copy, Deserialize, Eq, PartialEq)]
#[serde(from = "[usize; 2]")]
pub struct Match {
    /// The starting byte offset of the match.
    pub start: usize,
    /// The ending byte offset of the match.
    pub end: usize,
}

impl From<[usize; 2]> for Match {
    fn from([start, end]: [usize; 2]) -> Match {
        Match { start, end }
    }
}

impl std::fmt::Debug for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// The spans captured by every tag of one successful match, keyed by tag
/// name. A tag that did not participate maps to `None`.
pub type Captures = BTreeMap<String, Option<Match>>;

/// TOML has no null value, so an empty array stands in for a tag that did
/// not participate in a match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
enum MaybeMatch {
    Some([usize; 2]),
    None([usize; 0]),
}

impl From<MaybeMatch> for Option<Match> {
    fn from(m: MaybeMatch) -> Option<Match> {
        match m {
            MaybeMatch::None(_) => None,
            MaybeMatch::Some(span) => Some(Match::from(span)),
        }
    }
}

impl RegexTests {
    /// Create a new empty collection of regex tests.
    pub fn new() -> RegexTests {
        RegexTests::default()
    }

    /// Loads all of the tests in the given TOML file. The group name assigned
    /// to each test is the stem of the file name. For example, if one loads
    /// `foo/bar.toml`, then the group name for each test will be `bar`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let group_name = path
            .file_stem()
            .with_context(|| {
                format!("failed to get file name of {}", path.display())
            })?
            .to_str()
            .with_context(|| {
                format!("invalid UTF-8 found in {}", path.display())
            })?;
        self.load_str(group_name, &data)
            .with_context(|| format!("error loading {}", path.display()))?;
        Ok(())
    }

    /// Load all of the TOML encoded tests in `data` into this collection.
    /// The given group name is assigned to all loaded tests.
    pub fn load_str(&mut self, group_name: &str, data: &str) -> Result<()> {
        let mut index = 1;
        let mut tests: RegexTests =
            toml::from_str(data).context("error decoding TOML")?;
        for t in &mut tests.tests {
            t.group = group_name.to_string();
            if t.name.is_empty() {
                t.name = format!("{}", index);
                index += 1;
            }
            t.full_name = format!("{}/{}", t.group, t.name);
            t.validate().with_context(|| {
                format!("error loading test '{}'", t.full_name())
            })?;
            if !self.seen.insert(t.full_name().to_string()) {
                bail!("found duplicate tests for name '{}'", t.full_name());
            }
        }
        self.tests.extend(tests.tests);
        Ok(())
    }

    /// Return an iterator over all regex tests that have been loaded. The
    /// order of the iterator corresponds to the order in which the tests were
    /// loaded.
    pub fn iter(&self) -> RegexTestsIter<'_> {
        RegexTestsIter { it: self.tests.iter() }
    }
}

impl RegexTest {
    fn validate(&self) -> Result<()> {
        let count = [
            self.is_match.is_some(),
            self.matches.is_some(),
            self.captures.is_some(),
        ]
        .iter()
        .filter(|&&set| set)
        .count();
        if !self.compiles {
            if count > 0 {
                bail!("a test that does not compile cannot expect matches");
            }
            return Ok(());
        }
        if self.error_offset.is_some() {
            bail!("'error_offset' requires 'compiles = false'");
        }
        match count {
            0 => bail!(
                "one of 'match', 'matches' or 'captures' must be present"
            ),
            1 => Ok(()),
            _ => bail!(
                "only one of 'match', 'matches' or 'captures' can be present"
            ),
        }
    }

    /// Return the group name of this test.
    ///
    /// Usually the group name corresponds to a collection of related tests.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The name of this test.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full name of this test, which is formed by joining the group
    /// name with the test name via a `/`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The pattern under test.
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Return the text on which the regex should be matched.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns true if this test expects the pattern to match the entire
    /// input. Tests that expect captures always expect a match.
    pub fn is_match(&self) -> bool {
        self.is_match.unwrap_or(self.captures.is_some())
    }

    /// If this test expects the spans of every non-overlapping unanchored
    /// match, then they are returned.
    pub fn matches(&self) -> Option<&[Match]> {
        self.matches.as_deref()
    }

    /// If this test expects the captures of a whole-input match, then they
    /// are returned.
    pub fn captures(&self) -> Option<Captures> {
        let caps = self.captures.as_ref()?;
        Some(
            caps.iter()
                .map(|(name, m)| (name.clone(), Option::from(m.clone())))
                .collect(),
        )
    }

    /// Returns true if the regex in this test is expected to compile.
    pub fn compiles(&self) -> bool {
        self.compiles
    }

    /// The character offset at which compilation is expected to fail, if
    /// the test checks it.
    pub fn error_offset(&self) -> Option<usize> {
        self.error_offset
    }

    /// Whether groups in the pattern should capture. Enabled by default.
    pub fn capture_groups(&self) -> bool {
        self.capture_groups
    }
}

/// The result of compiling a regex.
///
/// A `CompiledRegex` holds a closure that runs the compiled regex against a
/// test, so that the harness does not need to know about the engine.
pub struct CompiledRegex {
    match_regex: Option<Box<dyn Fn(&RegexTest) -> Vec<TestResult>>>,
}

impl CompiledRegex {
    /// Provide a closure that represents the compiled regex and executes a
    /// regex match on any `RegexTest`.
    pub fn compiled<F: Fn(&RegexTest) -> Vec<TestResult> + 'static>(
        match_regex: F,
    ) -> CompiledRegex {
        CompiledRegex { match_regex: Some(Box::new(match_regex)) }
    }

    /// Indicate that tests on this regex should be skipped.
    pub fn skip() -> CompiledRegex {
        CompiledRegex { match_regex: None }
    }

    fn test(&self, test: &RegexTest) -> Vec<TestResult> {
        match self.match_regex {
            None => vec![TestResult::skip()],
            Some(ref match_regex) => match_regex(test),
        }
    }
}

impl std::fmt::Debug for CompiledRegex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let status = match self.match_regex {
            None => "Skip",
            Some(_) => "Run(...)",
        };
        f.debug_struct("CompiledRegex").field("match_regex", &status).finish()
    }
}

/// An error reported by the engine under test when a pattern fails to
/// compile.
#[derive(Debug)]
pub struct CompileError {
    err: Box<dyn std::error::Error>,
    offset: Option<usize>,
}

impl CompileError {
    /// Wrap an error, recording the character offset it points at.
    pub fn new<E: std::error::Error + 'static>(
        err: E,
        offset: Option<usize>,
    ) -> CompileError {
        CompileError { err: Box::new(err), offset }
    }
}

/// The result of executing a single regex match.
#[derive(Debug, Clone)]
pub struct TestResult {
    name: String,
    kind: TestResultKind,
}

#[derive(Debug, Clone)]
enum TestResultKind {
    Matched(bool),
    MatchedStartEnd(Vec<Match>),
    MatchedCaptures(Option<Captures>),
    Skip,
}

impl TestResult {
    /// Create a test result that indicates a whole-input match.
    pub fn matched() -> TestResult {
        TestResult::is_match(true)
    }

    /// Create a test result that indicates the regex did not match.
    pub fn no_match() -> TestResult {
        TestResult::is_match(false)
    }

    /// Create a test result for whether the regex matched the entire input.
    pub fn is_match(yes: bool) -> TestResult {
        TestResult { name: String::new(), kind: TestResultKind::Matched(yes) }
    }

    /// Create a test result containing a sequence of all matches in the
    /// test's input string.
    pub fn matches<I: IntoIterator<Item = Match>>(it: I) -> TestResult {
        TestResult {
            name: String::new(),
            kind: TestResultKind::MatchedStartEnd(it.into_iter().collect()),
        }
    }

    /// Create a test result containing the captures of a whole-input match,
    /// or `None` if the regex did not match.
    pub fn captures(caps: Option<Captures>) -> TestResult {
        TestResult {
            name: String::new(),
            kind: TestResultKind::MatchedCaptures(caps),
        }
    }

    /// Indicate that this test should be skipped. It will not be counted as
    /// a failure.
    pub fn skip() -> TestResult {
        TestResult { name: String::new(), kind: TestResultKind::Skip }
    }

    /// Give a name to this test result. This will be included in the output
    /// if the test fails.
    pub fn name(mut self, name: &str) -> TestResult {
        self.name = name.to_string();
        self
    }
}

/// A runner for executing regex tests.
///
/// This runner is intended to be used within a Rust unit test, marked with the
/// `#[test]` attribute. Typical usage corresponds to calling `test_iter` on
/// an iterator of `RegexTest`s, and then calling `assert` once done. If any
/// tests failed, then `assert` will panic with an error message containing
/// all test failures.
///
/// ### Skipping tests
///
/// If the `REGEX_TEST` environment variable is set, then it may contain
/// a comma separated list of substrings. Each substring corresponds to a
/// whitelisted item, unless it starts with a `-`, in which case it corresponds
/// to a blacklisted item. If there are any whitelist substrings, then a
/// test's full name must contain at least one of them in order to be run.
/// The last substring that a test name matches takes precedent.
#[derive(Debug)]
pub struct TestRunner {
    include: Vec<IncludePattern>,
    results: RegexTestResults,
}

#[derive(Debug)]
struct IncludePattern {
    blacklist: bool,
    substring: String,
}

impl TestRunner {
    /// Create a new runner for executing tests.
    ///
    /// If there was a problem reading the `REGEX_TEST` environment variable,
    /// then an error is returned.
    pub fn new() -> Result<TestRunner> {
        let mut runner =
            TestRunner { include: vec![], results: RegexTestResults::new() };
        for substring in read_env(ENV_REGEX_TEST)?.split(',') {
            let substring = substring.trim();
            if substring.is_empty() {
                continue;
            }
            if let Some(substring) = substring.strip_prefix('-') {
                runner.blacklist(substring);
            } else {
                runner.whitelist(substring);
            }
        }
        Ok(runner)
    }

    /// Assert that all tests run have either passed or have been skipped.
    ///
    /// If `REGEX_TEST_VERBOSE` is set to `1`, then a longer report of tests
    /// that passed, failed or skipped is printed.
    pub fn assert(&mut self) {
        self.results.assert();
    }

    /// Whitelist the given substring.
    pub fn whitelist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: false,
            substring: substring.to_string(),
        });
        self
    }

    /// Blacklist the given substring.
    pub fn blacklist(&mut self, substring: &str) -> &mut TestRunner {
        self.include.push(IncludePattern {
            blacklist: true,
            substring: substring.to_string(),
        });
        self
    }

    /// Run all of the given tests.
    pub fn test_iter<I, T, C>(
        &mut self,
        it: I,
        mut compile: C,
    ) -> &mut TestRunner
    where
        I: IntoIterator<Item = T>,
        T: Borrow<RegexTest>,
        C: FnMut(&RegexTest) -> Result<CompiledRegex, CompileError>,
    {
        for test in it {
            let test = test.borrow();
            if self.should_skip(test) {
                self.results.skip(test, &TestResult::skip());
                continue;
            }
            self.test(test, &mut compile);
        }
        self
    }

    /// Run a single test, recording its outcome.
    pub fn test<C>(&mut self, test: &RegexTest, compile: C) -> &mut TestRunner
    where
        C: FnOnce(&RegexTest) -> Result<CompiledRegex, CompileError>,
    {
        let compiled = match safe(|| compile(test)) {
            Err(msg) => {
                self.results.fail(
                    test,
                    &TestResult::skip(),
                    FailureKind::UnexpectedPanicCompile(msg),
                );
                return self;
            }
            Ok(Ok(compiled)) => compiled,
            Ok(Err(err)) => {
                if test.compiles() {
                    self.results.fail(
                        test,
                        &TestResult::skip(),
                        FailureKind::CompileError { err: err.err },
                    );
                } else if test.error_offset().map_or(false, |o| {
                    err.offset != Some(o)
                }) {
                    self.results.fail(
                        test,
                        &TestResult::skip(),
                        FailureKind::ErrorOffset { got: err.offset },
                    );
                } else {
                    self.results.pass(test, &TestResult::skip());
                }
                return self;
            }
        };
        if compiled.match_regex.is_none() {
            self.results.skip(test, &TestResult::skip());
            return self;
        }
        if !test.compiles() {
            self.results.fail(
                test,
                &TestResult::skip(),
                FailureKind::NoCompileError,
            );
            return self;
        }
        let results = match safe(|| compiled.test(test)) {
            Ok(results) => results,
            Err(msg) => {
                self.results.fail(
                    test,
                    &TestResult::skip(),
                    FailureKind::UnexpectedPanicSearch(msg),
                );
                return self;
            }
        };
        for result in results.iter() {
            self.check(test, result);
        }
        self
    }

    fn check(&mut self, test: &RegexTest, result: &TestResult) {
        let failure = match result.kind {
            TestResultKind::Skip => {
                self.results.skip(test, result);
                return;
            }
            TestResultKind::Matched(yes) => {
                if yes != test.is_match() {
                    Some(FailureKind::IsMatch)
                } else {
                    None
                }
            }
            TestResultKind::MatchedStartEnd(ref got) => match test.matches() {
                Some(expected) if expected != &**got => {
                    Some(FailureKind::StartEnd { got: got.clone() })
                }
                Some(_) => None,
                None => Some(FailureKind::Incompatible {
                    expected: test.expected_kind(),
                    got: "matches",
                }),
            },
            TestResultKind::MatchedCaptures(ref got) => {
                match (test.captures(), test.is_match) {
                    (Some(expected), _) if Some(&expected) != got.as_ref() => {
                        Some(FailureKind::Captures { got: got.clone() })
                    }
                    (Some(_), _) => None,
                    (None, Some(yes)) if yes != got.is_some() => {
                        Some(FailureKind::IsMatch)
                    }
                    (None, Some(_)) => None,
                    (None, None) => Some(FailureKind::Incompatible {
                        expected: test.expected_kind(),
                        got: "captures",
                    }),
                }
            }
        };
        match failure {
            None => self.results.pass(test, result),
            Some(kind) => self.results.fail(test, result, kind),
        }
    }

    /// Return true if and only if the given test should be skipped.
    fn should_skip(&self, test: &RegexTest) -> bool {
        if self.include.is_empty() {
            return false;
        }
        let mut skip = self.include.iter().any(|pat| !pat.blacklist);
        for pat in &self.include {
            if test.full_name().contains(&pat.substring) {
                skip = pat.blacklist;
            }
        }
        skip
    }
}

impl RegexTest {
    fn expected_kind(&self) -> &'static str {
        if self.is_match.is_some() {
            "match"
        } else if self.matches.is_some() {
            "matches"
        } else {
            "captures"
        }
    }
}

/// A collection of test results, corresponding to passed, skipped and failed
/// tests.
#[derive(Debug)]
struct RegexTestResults {
    pass: Vec<RegexTestResult>,
    fail: Vec<RegexTestFailure>,
    skip: Vec<RegexTestResult>,
}

/// A test that passed or skipped, along with its specific result.
#[derive(Debug)]
struct RegexTestResult {
    test: RegexTest,
    result: TestResult,
}

/// A test that failed along with the reason why.
#[derive(Debug)]
struct RegexTestFailure {
    test: RegexTest,
    result: TestResult,
    kind: FailureKind,
}

/// Describes the nature of the failed test.
#[derive(Debug)]
enum FailureKind {
    /// The test expected a whole-input match (or no match), but the engine
    /// disagreed.
    IsMatch,
    /// The spans found by an unanchored search were wrong.
    StartEnd { got: Vec<Match> },
    /// The spans captured by tags were wrong.
    Captures { got: Option<Captures> },
    /// The test expected the regex to fail to compile, but it compiled.
    NoCompileError,
    /// The test expected the regex to compile, but it failed to compile.
    CompileError { err: Box<dyn std::error::Error> },
    /// The regex failed to compile as expected, but at the wrong offset.
    ErrorOffset { got: Option<usize> },
    /// The engine reported results of a different kind than the test
    /// expects.
    Incompatible { expected: &'static str, got: &'static str },
    /// While compiling, a panic occurred.
    UnexpectedPanicCompile(String),
    /// While searching, a panic occurred.
    UnexpectedPanicSearch(String),
}

impl RegexTestResults {
    fn new() -> RegexTestResults {
        RegexTestResults { pass: vec![], fail: vec![], skip: vec![] }
    }

    fn pass(&mut self, test: &RegexTest, result: &TestResult) {
        self.pass.push(RegexTestResult {
            test: test.clone(),
            result: result.clone(),
        });
    }

    fn fail(
        &mut self,
        test: &RegexTest,
        result: &TestResult,
        kind: FailureKind,
    ) {
        self.fail.push(RegexTestFailure {
            test: test.clone(),
            result: result.clone(),
            kind,
        });
    }

    fn skip(&mut self, test: &RegexTest, result: &TestResult) {
        self.skip.push(RegexTestResult {
            test: test.clone(),
            result: result.clone(),
        });
    }

    fn assert(&self) {
        if read_env(ENV_REGEX_TEST_VERBOSE).map_or(false, |s| s == "1") {
            self.verbose();
        }
        if self.fail.is_empty() {
            return;
        }
        let failures = self
            .fail
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<String>>()
            .join("\n\n");
        panic!(
            "found {} failures:\n{}\n{}\n{}\n\n\
             Set the REGEX_TEST environment variable to filter tests, \n\
             e.g., REGEX_TEST=foo,-foo2 runs every test whose name contains \n\
             foo but not foo2\n\n",
            self.fail.len(),
            "~".repeat(79),
            failures.trim(),
            "~".repeat(79),
        )
    }

    fn verbose(&self) {
        println!("{}", "~".repeat(79));
        for t in &self.skip {
            println!("skip: {}", t.full_name());
        }
        for t in &self.pass {
            println!("pass: {}", t.full_name());
        }
        for t in &self.fail {
            println!("FAIL: {}", t.test.full_name());
        }
        println!(
            "\npassed: {}, skipped: {}, failed: {}",
            self.pass.len(),
            self.skip.len(),
            self.fail.len()
        );
        println!("{}", "~".repeat(79));
    }
}

impl RegexTestResult {
    fn full_name(&self) -> String {
        if self.result.name.is_empty() {
            self.test.full_name().to_string()
        } else {
            format!("{} ({})", self.test.full_name(), self.result.name)
        }
    }
}

impl std::fmt::Display for RegexTestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}: {}\n\
             pattern:     {:?}\n\
             input:       {:?}",
            self.test.full_name(),
            self.kind.describe(&self.test)?,
            self.test.regex(),
            self.test.input(),
        )?;
        if !self.result.name.is_empty() {
            write!(f, "\ntest result: {:?}", self.result.name)?;
        }
        Ok(())
    }
}

impl FailureKind {
    fn describe(&self, test: &RegexTest) -> Result<String, std::fmt::Error> {
        use std::fmt::Write;

        let mut buf = String::new();
        match *self {
            FailureKind::IsMatch => {
                if test.is_match() {
                    write!(buf, "expected match, but none found")?;
                } else {
                    write!(buf, "expected no match, but found a match")?;
                }
            }
            FailureKind::StartEnd { ref got } => {
                write!(
                    buf,
                    "did not find expected matches\n\
                     expected: {:?}\n     \
                     got: {:?}",
                    test.matches().unwrap_or(&[]),
                    got,
                )?;
            }
            FailureKind::Captures { ref got } => {
                write!(
                    buf,
                    "did not find expected captures\n\
                     expected: {:?}\n     \
                     got: {:?}",
                    test.captures(),
                    got,
                )?;
            }
            FailureKind::NoCompileError => {
                write!(buf, "expected regex to NOT compile, but it did")?;
            }
            FailureKind::CompileError { ref err } => {
                write!(buf, "expected regex to compile, failed: {}", err)?;
            }
            FailureKind::ErrorOffset { got } => {
                write!(
                    buf,
                    "expected compile error at offset {:?}, but got {:?}",
                    test.error_offset(),
                    got,
                )?;
            }
            FailureKind::Incompatible { expected, got } => {
                write!(buf, "expected {} results, but got {}", expected, got)?;
            }
            FailureKind::UnexpectedPanicCompile(ref msg) => {
                write!(buf, "got unexpected panic while compiling:\n{}", msg)?;
            }
            FailureKind::UnexpectedPanicSearch(ref msg) => {
                write!(buf, "got unexpected panic while searching:\n{}", msg)?;
            }
        }
        Ok(buf)
    }
}

/// An iterator over regex tests.
#[derive(Debug)]
pub struct RegexTestsIter<'a> {
    it: std::slice::Iter<'a, RegexTest>,
}

impl<'a> Iterator for RegexTestsIter<'a> {
    type Item = &'a RegexTest;

    fn next(&mut self) -> Option<&'a RegexTest> {
        self.it.next()
    }
}

/// Read the environment variable given. If it doesn't exist, then return an
/// empty string. Otherwise, check that it is valid UTF-8.
fn read_env(var: &str) -> Result<String> {
    let val = match std::env::var_os(var) {
        None => return Ok(String::new()),
        Some(val) => val,
    };
    let val = val.into_string().map_err(|os| {
        anyhow::anyhow!(
            "invalid UTF-8 in env var {}={:?}",
            var,
            os.to_string_lossy()
        )
    })?;
    Ok(val)
}

fn safe<T, F>(fun: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    use std::panic;

    panic::catch_unwind(panic::AssertUnwindSafe(fun)).map_err(|any_err| {
        // Extract common types of panic payload:
        // panic and assert produce &str or String
        if let Some(&s) = any_err.downcast_ref::<&str>() {
            s.to_owned()
        } else if let Some(s) = any_err.downcast_ref::<String>() {
            s.to_owned()
        } else {
            "UNABLE TO SHOW RESULT OF PANIC.".to_owned()
        }
    })
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn err_no_expectation() {
        let data = r#"
[[tests]]
name = "foo"
regex = "a"
input = "a"
"#;
        let mut tests = RegexTests::new();
        assert!(tests.load_str("test", data).is_err());
    }

    #[test]
    fn err_unknown_field() {
        let data = r#"
[[tests]]
name = "foo"
regex = "a"
input = "a"
match = true
something = 0
"#;
        let mut tests = RegexTests::new();
        assert!(tests.load_str("test", data).is_err());
    }

    #[test]
    fn err_duplicate_name() {
        let data = r#"
[[tests]]
name = "foo"
regex = "a"
input = "a"
match = true

[[tests]]
name = "foo"
regex = "b"
input = "b"
match = true
"#;
        let mut tests = RegexTests::new();
        assert!(tests.load_str("test", data).is_err());
    }

    #[test]
    fn load_match() {
        let data = r#"
[[tests]]
regex = "a{2,3}"
input = "aaaa"
match = false
"#;
        let mut tests = RegexTests::new();
        tests.load_str("test", data).unwrap();
        let t0 = tests.iter().next().unwrap();
        assert_eq!("test/1", t0.full_name());
        assert_eq!("a{2,3}", t0.regex());
        assert!(!t0.is_match());
        assert!(t0.compiles());
        assert!(t0.capture_groups());
    }

    #[test]
    fn load_captures() {
        let data = r#"
[[tests]]
name = "caps"
regex = '(a)(?<x>b)*'
input = "a"
captures = { 1 = [0, 1], x = [] }
"#;
        let mut tests = RegexTests::new();
        tests.load_str("test", data).unwrap();
        let t0 = tests.iter().next().unwrap();
        assert!(t0.is_match());
        let caps = t0.captures().unwrap();
        assert_eq!(Some(&Some(Match { start: 0, end: 1 })), caps.get("1"));
        assert_eq!(Some(&None), caps.get("x"));
    }

    #[test]
    fn load_compile_error() {
        let data = r#"
[[tests]]
name = "bad"
regex = "(a"
input = ""
compiles = false
error_offset = 0
"#;
        let mut tests = RegexTests::new();
        tests.load_str("test", data).unwrap();
        let t0 = tests.iter().next().unwrap();
        assert!(!t0.compiles());
        assert_eq!(Some(0), t0.error_offset());
    }
}
