use crate::args;

mod debug;
mod find;
mod verify;

const USAGE: &str = "\
A tool for interacting with the regex-graph crate on the command line.

USAGE:
    regex-graph-cli <command> ...

COMMANDS:
    debug    Print the debug representation of a compiled pattern.
    find     Print every match of a pattern found in each input.
    verify   Report whether a pattern matches each input in its entirety.
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "debug" => debug::run(p),
        "find" => find::run(p),
        "verify" => verify::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
