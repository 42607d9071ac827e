use core::fmt;

use crate::util::interval::SegmentedSet;

/// The set of acceptable repeat counts for a loop.
///
/// A count of `u32::MAX` stands in for "unbounded", so `{2,}` is stored as
/// the range `2..=u32::MAX`.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Iteration {
    counts: SegmentedSet<u32>,
}

impl Iteration {
    /// The largest finite repeat count that may be written in a pattern.
    pub const MAX_FINITE: u32 = u32::MAX - 1;

    const UNBOUNDED: u32 = u32::MAX;

    /// Exactly `n` repetitions, i.e., `{n}`.
    pub fn exactly(n: u32) -> Iteration {
        Iteration::between(n, n)
    }

    /// At least `n` repetitions, i.e., `{n,}`.
    pub fn at_least(n: u32) -> Iteration {
        Iteration::between(n, Iteration::UNBOUNDED)
    }

    /// Between `min` and `max` repetitions inclusive, i.e., `{min,max}`.
    pub fn between(min: u32, max: u32) -> Iteration {
        let mut counts = SegmentedSet::new();
        counts.add_range(min, max);
        Iteration { counts }
    }

    /// Zero or more repetitions, i.e., `*`.
    pub fn star() -> Iteration {
        Iteration::at_least(0)
    }

    /// One or more repetitions, i.e., `+`.
    pub fn plus() -> Iteration {
        Iteration::at_least(1)
    }

    /// Add more acceptable counts to this iteration.
    pub fn add_range(&mut self, min: u32, max: u32) {
        self.counts.add_range(min, max);
    }

    /// Returns true if stopping after `count` repetitions is acceptable.
    pub fn accepts(&self, count: u32) -> bool {
        self.counts.contains(count)
    }

    /// The fewest repetitions accepted.
    pub fn min_times(&self) -> u32 {
        self.counts.first().map_or(0, |r| r.low())
    }

    /// The most repetitions accepted, or `None` when unbounded.
    pub fn max_times(&self) -> Option<u32> {
        match self.counts.last() {
            None => Some(0),
            Some(r) if r.high() == Iteration::UNBOUNDED => None,
            Some(r) => Some(r.high()),
        }
    }

    /// Returns true if another repetition may be attempted after `count`
    /// repetitions have completed.
    pub fn may_repeat(&self, count: u32) -> bool {
        self.max_times().map_or(true, |max| count < max)
    }
}

impl fmt::Debug for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.min_times();
        match self.max_times() {
            None if min == 0 => write!(f, "*"),
            None if min == 1 => write!(f, "+"),
            None => write!(f, "{{{},}}", min),
            Some(max) if max == min => write!(f, "{{{}}}", min),
            Some(max) => write!(f, "{{{},{}}}", min, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let it = Iteration::between(2, 4);
        assert_eq!(2, it.min_times());
        assert_eq!(Some(4), it.max_times());
        assert!(!it.accepts(1));
        assert!(it.accepts(3));
        assert!(!it.accepts(5));
        assert!(it.may_repeat(3));
        assert!(!it.may_repeat(4));
    }

    #[test]
    fn unbounded() {
        let it = Iteration::plus();
        assert_eq!(1, it.min_times());
        assert_eq!(None, it.max_times());
        assert!(!it.accepts(0));
        assert!(it.accepts(1_000_000));
        assert!(it.may_repeat(Iteration::MAX_FINITE));
    }

    #[test]
    fn debug_format() {
        assert_eq!("*", format!("{:?}", Iteration::star()));
        assert_eq!("+", format!("{:?}", Iteration::plus()));
        assert_eq!("{3,}", format!("{:?}", Iteration::at_least(3)));
        assert_eq!("{2}", format!("{:?}", Iteration::exactly(2)));
        assert_eq!("{0,5}", format!("{:?}", Iteration::between(0, 5)));
    }
}
