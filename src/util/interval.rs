use core::{fmt, iter, slice};

/// A type whose values are totally ordered and have well defined immediate
/// neighbors.
///
/// This is what permits a [`SegmentedSet`] to merge ranges that merely touch,
/// e.g., `a-c` and `d-f` become `a-f`.
pub trait Ordinal: Copy + Ord + fmt::Debug {
    /// The smallest representable value.
    fn min_value() -> Self;

    /// The largest representable value.
    fn max_value() -> Self;

    /// Returns the value immediately after this one, or `None` if this is
    /// the maximum value.
    fn successor(self) -> Option<Self>;

    /// Returns the value immediately before this one, or `None` if this is
    /// the minimum value.
    fn predecessor(self) -> Option<Self>;

    /// Returns true if and only if `self` comes immediately after `other`.
    fn is_succeeding(self, other: Self) -> bool {
        other.successor() == Some(self)
    }

    /// Returns true if and only if `self` comes immediately before `other`.
    fn is_preceding(self, other: Self) -> bool {
        self.successor() == Some(other)
    }
}

impl Ordinal for char {
    fn min_value() -> char {
        '\x00'
    }

    fn max_value() -> char {
        '\u{10FFFF}'
    }

    fn successor(self) -> Option<char> {
        match self {
            '\u{D7FF}' => Some('\u{E000}'),
            c => char::from_u32(u32::from(c).checked_add(1)?),
        }
    }

    fn predecessor(self) -> Option<char> {
        match self {
            '\u{E000}' => Some('\u{D7FF}'),
            c => char::from_u32(u32::from(c).checked_sub(1)?),
        }
    }
}

macro_rules! impl_unsigned_ordinal {
    ($($ty:ty),*) => {
        $(
            impl Ordinal for $ty {
                fn min_value() -> $ty {
                    <$ty>::MIN
                }

                fn max_value() -> $ty {
                    <$ty>::MAX
                }

                fn successor(self) -> Option<$ty> {
                    self.checked_add(1)
                }

                fn predecessor(self) -> Option<$ty> {
                    self.checked_sub(1)
                }
            }
        )*
    }
}

impl_unsigned_ordinal!(u8, u16, u32, u64, usize);

/// An inclusive range `low..=high` over an ordinal type.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct OrdinalRange<T> {
    low: T,
    high: T,
}

impl<T: Ordinal> OrdinalRange<T> {
    /// Create a new range. The bounds are swapped if given in decreasing
    /// order.
    pub fn new(low: T, high: T) -> OrdinalRange<T> {
        if low <= high {
            OrdinalRange { low, high }
        } else {
            OrdinalRange { low: high, high: low }
        }
    }

    /// Create a range containing exactly one value.
    pub fn singleton(value: T) -> OrdinalRange<T> {
        OrdinalRange { low: value, high: value }
    }

    /// The smallest value in this range.
    pub fn low(&self) -> T {
        self.low
    }

    /// The largest value in this range.
    pub fn high(&self) -> T {
        self.high
    }

    /// Returns true if the given value falls inside this range.
    pub fn contains(&self, value: T) -> bool {
        self.low <= value && value <= self.high
    }

    /// Returns true if this range ends strictly before `value` with at least
    /// one value in between. Such a range can neither overlap nor be merged
    /// with a range starting at `value`.
    fn is_detached_before(&self, value: T) -> bool {
        self.high < value && !self.high.is_preceding(value)
    }

    /// Returns true if this range starts strictly after `value` with at least
    /// one value in between.
    fn is_detached_after(&self, value: T) -> bool {
        self.low > value && !self.low.is_succeeding(value)
    }
}

impl<T: Ordinal> fmt::Debug for OrdinalRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{:?}", self.low)
        } else {
            write!(f, "{:?}-{:?}", self.low, self.high)
        }
    }
}

/// A sorted set of disjoint, non-adjacent inclusive ranges.
///
/// Ranges are coalesced on insertion, so the number of stored segments is
/// always minimal. A set only ever grows.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct SegmentedSet<T> {
    ranges: Vec<OrdinalRange<T>>,
}

impl<T: Ordinal> SegmentedSet<T> {
    /// Create a new empty set.
    pub fn new() -> SegmentedSet<T> {
        SegmentedSet { ranges: vec![] }
    }

    /// Add a single value to this set.
    pub fn add(&mut self, value: T) {
        self.add_range(value, value);
    }

    /// Add every value in `low..=high` to this set.
    ///
    /// Any stored segments that overlap or touch the new range are absorbed
    /// into it.
    pub fn add_range(&mut self, low: T, high: T) {
        let new = OrdinalRange::new(low, high);
        // Every range before 'start' ends too early to touch 'new', and every
        // range at or after 'end' starts too late. Since segments are sorted
        // and detached from one another, both predicates are monotonic.
        let start =
            self.ranges.partition_point(|r| r.is_detached_before(new.low));
        let end = start
            + self.ranges[start..]
                .partition_point(|r| !r.is_detached_after(new.high));
        if start == end {
            self.ranges.insert(start, new);
            return;
        }
        let merged = OrdinalRange {
            low: new.low.min(self.ranges[start].low),
            high: new.high.max(self.ranges[end - 1].high),
        };
        self.ranges.splice(start..end, iter::once(merged));
    }

    /// Returns true if the given value is in this set.
    pub fn contains(&self, value: T) -> bool {
        self.ranges
            .binary_search_by(|r| {
                if r.high < value {
                    core::cmp::Ordering::Less
                } else if r.low > value {
                    core::cmp::Ordering::Greater
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Returns true if this set contains every value of `T`.
    pub fn is_full(&self) -> bool {
        self.ranges.len() == 1
            && self.ranges[0].low == T::min_value()
            && self.ranges[0].high == T::max_value()
    }

    /// Returns true if this set has no values.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of segments (not values) in this set.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// The segment holding the smallest values, if any.
    pub fn first(&self) -> Option<&OrdinalRange<T>> {
        self.ranges.first()
    }

    /// The segment holding the largest values, if any.
    pub fn last(&self) -> Option<&OrdinalRange<T>> {
        self.ranges.last()
    }

    /// All segments in ascending order.
    pub fn ranges(&self) -> &[OrdinalRange<T>] {
        &self.ranges
    }

    /// Iterate over all segments in ascending order.
    pub fn iter(&self) -> slice::Iter<'_, OrdinalRange<T>> {
        self.ranges.iter()
    }
}

impl<T: Ordinal> fmt::Debug for SegmentedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ranges.iter()).finish()
    }
}

impl<T: Ordinal> iter::FromIterator<OrdinalRange<T>> for SegmentedSet<T> {
    fn from_iter<I: IntoIterator<Item = OrdinalRange<T>>>(
        it: I,
    ) -> SegmentedSet<T> {
        let mut set = SegmentedSet::new();
        for r in it {
            set.add_range(r.low, r.high);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck::quickcheck;

    fn segments(set: &SegmentedSet<u8>) -> Vec<(u8, u8)> {
        set.iter().map(|r| (r.low(), r.high())).collect()
    }

    #[test]
    fn adjacent_ranges_coalesce() {
        let mut set = SegmentedSet::new();
        set.add_range(b'a', b'c');
        set.add_range(b'd', b'f');
        assert_eq!(vec![(b'a', b'f')], segments(&set));

        set.add(b'h');
        assert_eq!(vec![(b'a', b'f'), (b'h', b'h')], segments(&set));
        set.add(b'g');
        assert_eq!(vec![(b'a', b'h')], segments(&set));
    }

    #[test]
    fn spanning_range_absorbs_many() {
        let mut set = SegmentedSet::new();
        for &b in &[b'b', b'e', b'h', b'x'] {
            set.add(b);
        }
        assert_eq!(4, set.len());
        set.add_range(b'a', b'i');
        assert_eq!(vec![(b'a', b'i'), (b'x', b'x')], segments(&set));
        assert!(set.contains(b'c'));
        assert!(!set.contains(b'j'));
    }

    #[test]
    fn reversed_bounds_are_normalized() {
        let mut set = SegmentedSet::new();
        set.add_range(9u32, 3);
        assert_eq!(3, set.first().unwrap().low());
        assert_eq!(9, set.last().unwrap().high());
    }

    #[test]
    fn extremes() {
        let mut set = SegmentedSet::new();
        set.add_range(0u8, 10);
        set.add_range(250, 255);
        set.add_range(11, 249);
        assert!(set.is_full());
        assert_eq!(1, set.len());
    }

    #[test]
    fn char_surrogate_gap_is_adjacent() {
        let mut set = SegmentedSet::new();
        set.add_range('\u{D000}', '\u{D7FF}');
        set.add_range('\u{E000}', '\u{E0FF}');
        assert_eq!(1, set.len());
        set.add_range('\x00', '\u{CFFF}');
        set.add_range('\u{E100}', '\u{10FFFF}');
        assert!(set.is_full());
    }

    quickcheck! {
        fn segments_stay_minimal(ranges: Vec<(u8, u8)>) -> bool {
            let mut set = SegmentedSet::new();
            for &(lo, hi) in &ranges {
                set.add_range(lo, hi);
            }
            set.ranges().windows(2).all(|w| {
                w[0].high() < w[1].low()
                    && !w[0].high().is_preceding(w[1].low())
            })
        }

        fn membership_matches_naive(ranges: Vec<(u8, u8)>, ch: u8) -> bool {
            let mut set = SegmentedSet::new();
            for &(lo, hi) in &ranges {
                set.add_range(lo, hi);
            }
            let expected = ranges
                .iter()
                .any(|&(lo, hi)| lo.min(hi) <= ch && ch <= lo.max(hi));
            set.contains(ch) == expected
        }
    }
}
