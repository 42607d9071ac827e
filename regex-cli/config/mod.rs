use std::fmt::Debug;

use lexopt::{Arg, Parser};

use crate::args::Usage;

pub mod common;
pub mod graph;
pub mod patterns;

/// A group of flags that a command accepts.
pub trait Configurable: Debug + 'static {
    /// Consume `arg` if it belongs to this group, returning whether it did.
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool>;

    fn usage(&self) -> &[Usage];
}

/// Feed every remaining argument to the first target that recognizes it.
///
/// `-h` and `--help` print `usage`, with `%options%` replaced by the flags
/// of every target.
pub fn configure(
    p: &mut Parser,
    usage: &str,
    targets: &mut [&mut dyn Configurable],
) -> anyhow::Result<()> {
    while let Some(arg) = p.next()? {
        if let Arg::Short('h') | Arg::Long("help") = arg {
            let mut usages = vec![];
            for t in targets.iter() {
                usages.extend_from_slice(t.usage());
            }
            usages.sort_by_key(|u| u.format);
            let options = if arg == Arg::Short('h') {
                Usage::short(&usages)
            } else {
                Usage::long(&usages)
            };
            let usage = usage.replace("%options%", &options);
            anyhow::bail!("{}", usage.trim());
        }
        // Long flag names borrow from 'p', so they are cloned to let 'p' be
        // handed to each target below.
        let long_flag: Option<String> = match arg {
            Arg::Long(name) => Some(name.to_string()),
            _ => None,
        };
        let mut arg = match long_flag {
            Some(ref flag) => Arg::Long(flag),
            None => match arg {
                Arg::Short(c) => Arg::Short(c),
                Arg::Long(_) => unreachable!(),
                Arg::Value(value) => Arg::Value(value),
            },
        };
        let mut recognized = false;
        for t in targets.iter_mut() {
            if t.configure(p, &mut arg)? {
                recognized = true;
                break;
            }
        }
        if !recognized {
            return Err(arg.unexpected().into());
        }
    }
    Ok(())
}
