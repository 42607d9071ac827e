use lexopt::{Arg, Parser};

use crate::{args::Usage, config::Configurable};

/// Flags shared by every command.
#[derive(Debug, Default)]
pub struct Config {
    pub quiet: bool,
    pub verbose: bool,
}

impl Configurable for Config {
    fn configure(
        &mut self,
        _: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('q') | Arg::Long("quiet") => {
                self.quiet = true;
            }
            Arg::Long("verbose") => {
                self.verbose = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[
            Usage::new(
                "-q, --quiet",
                "Suppress some output.",
                r#"
This is a generic flag that suppresses some (but not all) output. Which output
is suppressed depends on the command. For example, 'regex-graph-cli debug
graph -q' prints only the properties of the graph and not the dump of its
states.
"#,
            ),
            Usage::new(
                "--verbose",
                "Add more output.",
                r#"
This is a generic flag that expands output beyond the "normal" amount. Which
output is added depends on the command. For example, 'regex-graph-cli verify
--verbose' also prints the tags that did not participate in a match.
"#,
            ),
        ];
        USAGES
    }
}
