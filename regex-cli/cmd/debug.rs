use std::io::{stdout, Write};

use regex_graph::{backtrack::Backtracker, graph::Graph};

use crate::{
    args,
    config::{common, configure, graph, patterns},
    util::{self, Report},
};

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &str = "\
Prints the debug representation of things from regex-graph.

USAGE:
    regex-graph-cli debug <command> ...

COMMANDS:
    graph    Print the debug representation of a compiled graph.
";

    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "graph" => run_graph(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}

fn run_graph(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    const USAGE: &str = "\
Prints the debug representation of a compiled graph.

Every state is listed with its identifier, and the start state is marked with
a '>'. Character classes and tag names follow the states.

USAGE:
    regex-graph-cli debug graph <pattern>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
%options%
";

    let mut common = common::Config::default();
    let mut patterns = patterns::Config::pattern_only();
    let mut graph = graph::Config::default();
    configure(p, USAGE, &mut [&mut common, &mut patterns, &mut graph])?;

    let pattern = patterns.pattern()?;
    let mut report = Report::new();
    let (re, time) = util::timed_build(|| {
        Graph::compiler().configure(graph.graph()).build(pattern)
    })?;
    report.add("compile time", time);
    report.add_graph(&re);
    let backtracker = Backtracker::new_from_graph(re.clone());
    let cache = backtracker.create_cache::<usize>();
    report.add("cache memory", cache.memory_usage());
    report.print(stdout())?;
    if !common.quiet {
        writeln!(stdout(), "\n{:?}", re)?;
    }
    Ok(())
}
