use std::io::{stdout, Write};

use regex_graph::{
    backtrack::Backtracker, util::stream::CharStream, Span,
};

use crate::{
    config::{common, configure, graph, patterns},
    util::{self, Report},
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &str = "\
Reports whether a pattern matches each input in its entirety.

For each input that matches, the span captured by every tag is printed as
byte offsets. Tags that did not participate in the match are only printed
with --verbose.

USAGE:
    regex-graph-cli verify <pattern> [<input> ...]

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
        Backtracker::builder().graph(graph.graph()).build(pattern)
    })?;
    let mut cache = re.create_cache();
    if !common.quiet {
        let mut report = Report::new();
        report.add("compile time", time);
        report.add_graph(re.graph());
        report.add("inputs", patterns.inputs().len());
        report.print(stdout())?;
    }
    let mut out = stdout();
    for input in patterns.inputs() {
        let (matched, time) =
            util::timed(|| re.verify(&mut cache, CharStream::new(input)));
        writeln!(out)?;
        if !matched {
            util::print_marked(&mut out, input, &[])?;
            writeln!(out, "matched: false ({:?})", time)?;
            continue;
        }
        let whole = Span { start: 0, end: input.len() };
        util::print_marked(&mut out, input, &[whole])?;
        writeln!(out, "matched: true ({:?})", time)?;
        let (graph, tags) = (re.graph(), cache.tags());
        util::print_tags(&mut out, graph, tags, input, common.verbose)?;
    }
    Ok(())
}
