use lexopt::{Arg, Parser};

use regex_graph::graph;

use crate::{
    args::{self, Usage},
    config::Configurable,
};

/// Exposes the knobs of `regex_graph::graph::Config` as flags.
#[derive(Debug, Default)]
pub struct Config {
    graph: graph::Config,
}

impl Config {
    /// The compiler configuration assembled from the flags given.
    pub fn graph(&self) -> graph::Config {
        self.graph
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Long("no-captures") => {
                self.graph = self.graph.captures(false);
            }
            Arg::Long("nest-limit") => {
                let limit = args::parse(p, "--nest-limit")?;
                self.graph = self.graph.nest_limit(limit);
            }
            Arg::Long("state-limit") => {
                let limit = args::parse_maybe(p, "--state-limit")?;
                self.graph = self.graph.state_limit(limit);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[
            Usage::new(
                "--no-captures",
                "Compile groups without tags.",
                r#"
When given, every group compiles as if it were non-capturing. Named groups
still parse, but backreferences to any group then fail to compile since there
is no tag to refer to.
"#,
            ),
            Usage::new(
                "--nest-limit <limit>",
                "Set the group nesting limit.",
                r#"
Set the deepest level of group nesting that the compiler accepts. Patterns
that nest deeper fail to compile.
"#,
            ),
            Usage::new(
                "--state-limit <limit>",
                "Set the limit on the number of states.",
                r#"
Set the largest number of states a compiled graph may have. Patterns that
need more fail to compile. The special value 'none' removes the limit, which
is the default.
"#,
            ),
        ];
        USAGES
    }
}
