use core::fmt;

use crate::util::interval::{OrdinalRange, SegmentedSet};

/// A set of characters, possibly negated.
///
/// A `CharSet` is built once while compiling a `[...]` class and is immutable
/// afterwards. Membership of a negated (exclusive) set is the complement of
/// membership in its inner ranges.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct CharSet {
    set: SegmentedSet<char>,
    exclusive: bool,
}

impl CharSet {
    /// Create a new empty, positive set.
    pub fn new() -> CharSet {
        CharSet { set: SegmentedSet::new(), exclusive: false }
    }

    /// Create a new empty set whose membership is negated. An empty
    /// exclusive set matches every character.
    pub fn negated() -> CharSet {
        CharSet { set: SegmentedSet::new(), exclusive: true }
    }

    /// Create a set that matches every character.
    pub fn any() -> CharSet {
        CharSet::negated()
    }

    /// Add a single character to the inner ranges.
    pub fn add(&mut self, ch: char) {
        self.set.add(ch);
    }

    /// Add the characters `low..=high` to the inner ranges.
    pub fn add_range(&mut self, low: char, high: char) {
        self.set.add_range(low, high);
    }

    /// Returns true if this set matches the given character.
    pub fn contains(&self, ch: char) -> bool {
        self.set.contains(ch) != self.exclusive
    }

    /// Returns true if this set can never match anything.
    ///
    /// A negated set is only empty when its inner ranges cover the entire
    /// domain of characters.
    pub fn is_empty(&self) -> bool {
        if self.exclusive {
            self.set.is_full()
        } else {
            self.set.is_empty()
        }
    }

    /// Returns true if membership in this set is negated.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// The inner (non-negated) ranges of this set.
    pub fn ranges(&self) -> &[OrdinalRange<char>] {
        self.set.ranges()
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclusive {
            write!(f, "^")?;
        }
        write!(f, "[")?;
        for r in self.set.iter() {
            if r.low() == r.high() {
                write!(f, "{}", r.low().escape_debug())?;
            } else {
                write!(
                    f,
                    "{}-{}",
                    r.low().escape_debug(),
                    r.high().escape_debug()
                )?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive() {
        let mut set = CharSet::new();
        assert!(set.is_empty());
        set.add_range('a', 'c');
        set.add('x');
        assert!(set.contains('b'));
        assert!(set.contains('x'));
        assert!(!set.contains('d'));
        assert!(!set.is_empty());
    }

    #[test]
    fn negated() {
        let mut set = CharSet::negated();
        assert!(!set.is_empty());
        assert!(set.contains('q'));
        set.add_range('a', 'c');
        assert!(!set.contains('a'));
        assert!(set.contains('d'));
    }

    #[test]
    fn negated_everything_is_empty() {
        let mut set = CharSet::negated();
        set.add_range('\x00', '\u{10FFFF}');
        assert!(set.is_empty());
        assert!(!set.contains('a'));
    }

    #[test]
    fn debug_format() {
        let mut set = CharSet::negated();
        set.add_range('a', 'z');
        set.add('\n');
        assert_eq!(r"^[\na-z]", format!("{:?}", set));
    }
}
