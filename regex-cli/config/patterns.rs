use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
};

use crate::{args::Usage, config::Configurable};

/// Collects a pattern and, for commands that search, the inputs to search.
///
/// The first positional argument is the pattern unless `-p/--pattern` was
/// given. Every other positional argument is an input.
#[derive(Debug, Default)]
pub struct Config {
    pattern: Option<String>,
    inputs: Vec<String>,
    with_inputs: bool,
}

impl Config {
    /// Accept only a pattern.
    pub fn pattern_only() -> Config {
        Config::default()
    }

    /// Accept a pattern followed by any number of inputs.
    pub fn with_inputs() -> Config {
        Config { with_inputs: true, ..Config::default() }
    }

    /// The pattern given, or an error if none was.
    pub fn pattern(&self) -> anyhow::Result<&str> {
        self.pattern.as_deref().context("a pattern is required")
    }

    /// The inputs given, in order.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('p') | Arg::Long("pattern") => {
                anyhow::ensure!(
                    self.pattern.is_none(),
                    "only one pattern is allowed",
                );
                let pat = p.value().context("-p/--pattern needs a value")?;
                let pat = pat
                    .string()
                    .context("-p/--pattern must be valid UTF-8")?;
                self.pattern = Some(pat);
            }
            Arg::Value(ref mut v) => {
                let v = std::mem::take(v)
                    .string()
                    .context("arguments must be valid UTF-8")?;
                if self.pattern.is_none() {
                    self.pattern = Some(v);
                } else if self.with_inputs {
                    self.inputs.push(v);
                } else {
                    anyhow::bail!("only one pattern is allowed");
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &[Usage] = &[Usage::new(
            "-p, --pattern <pattern>",
            "Give the pattern by flag.",
            r#"
Give the pattern by flag instead of as the first positional argument. This is
useful when the pattern begins with a '-'. When used, every positional
argument is treated as an input.
"#,
        )];
        USAGES
    }
}
