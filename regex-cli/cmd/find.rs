use std::io::{stdout, Write};

use regex_graph::Regex;

use crate::{
    config::{common, configure, graph, patterns},
    util::{self, Report},
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &str = "\
Prints every non-overlapping match of a pattern in each input.

Matches are found from left to right. Each one is printed as a span of byte
offsets followed by the text it covers.

USAGE:
    regex-graph-cli find <pattern> [<input> ...]

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut patterns = patterns::Config::with_inputs();
    let mut graph = graph::Config::default();
    configure(p, USAGE, &mut [&mut common, &mut patterns, &mut graph])?;

    let pattern = patterns.pattern()?;
    let (re, time) = util::timed_build(|| {
        Regex::builder().graph(graph.graph()).build(pattern)
    })?;
    if !common.quiet {
        let mut report = Report::new();
        report.add("compile time", time);
        report.add("inputs", patterns.inputs().len());
        report.print(stdout())?;
    }
    let mut out = stdout();
    for input in patterns.inputs() {
        let (spans, time) =
            util::timed(|| re.find_iter(input).collect::<Vec<_>>());
        writeln!(out)?;
        util::print_marked(&mut out, input, &spans)?;
        writeln!(out, "matches: {} ({:?})", spans.len(), time)?;
        for span in spans {
            writeln!(out, "{:?}: {:?}", span, &input[span.range()])?;
        }
    }
    Ok(())
}
