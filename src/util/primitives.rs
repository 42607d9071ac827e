/*!
Small index types used to address the arenas of a compiled graph.

States, character classes, tags and traps all live in vectors owned by a
[`Graph`](crate::graph::Graph). Arrows and matcher bookkeeping refer to them
by index, which turns the cyclic graph into plain data.
*/

use core::convert::TryFrom;

macro_rules! define_index_type {
    ($(#[$attr:meta])* $name:ident, $err:ident) => {
        $(#[$attr])*
        #[derive(
            Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// The maximum value.
            pub const MAX: $name = $name(core::i32::MAX as u32 - 1);

            /// The total number of values that can be represented.
            pub const LIMIT: usize = $name::MAX.as_usize() + 1;

            /// The zero value.
            pub const ZERO: $name = $name(0);

            /// Create a new value from the given index.
            ///
            /// If the given index exceeds the maximum allowed value, then
            /// this returns an error.
            #[inline]
            pub fn new(value: usize) -> Result<$name, $err> {
                $name::try_from(value)
            }

            /// Create a new value without checking whether the given index
            /// exceeds the maximum.
            #[inline]
            pub const fn new_unchecked(value: usize) -> $name {
                $name(value as u32)
            }

            /// Like `new`, but panics if the given value is not valid.
            #[inline]
            pub fn must(value: usize) -> $name {
                $name::new(value).expect(concat!(
                    "invalid ",
                    stringify!($name),
                    " value"
                ))
            }

            /// Return the internal value as a `usize`.
            #[inline]
            pub const fn as_usize(&self) -> usize {
                self.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = $err;

            fn try_from(value: usize) -> Result<$name, $err> {
                if value > $name::MAX.as_usize() {
                    return Err($err { attempted: value as u64 });
                }
                Ok($name(value as u32))
            }
        }

        impl<T> core::ops::Index<$name> for [T] {
            type Output = T;

            #[inline]
            fn index(&self, index: $name) -> &T {
                &self[index.as_usize()]
            }
        }

        impl<T> core::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self[index.as_usize()]
            }
        }

        impl<T> core::ops::Index<$name> for Vec<T> {
            type Output = T;

            #[inline]
            fn index(&self, index: $name) -> &T {
                &self[index.as_usize()]
            }
        }

        impl<T> core::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, index: $name) -> &mut T {
                &mut self[index.as_usize()]
            }
        }

        /// This error occurs when an index exceeds the maximum allowed
        /// value.
        #[derive(Clone, Debug, Eq, PartialEq)]
        pub struct $err {
            attempted: u64,
        }

        impl $err {
            /// Returns the value that could not be converted to an ID.
            pub fn attempted(&self) -> u64 {
                self.attempted
            }
        }

        impl std::error::Error for $err {}

        impl core::fmt::Display for $err {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(
                    f,
                    "failed to create {} from {:?}, which exceeds {:?}",
                    stringify!($name),
                    self.attempted(),
                    $name::MAX,
                )
            }
        }
    };
}

define_index_type!(
    /// The identifier of a state in a graph.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_graph::util::primitives::StateID;
    ///
    /// let sid = StateID::new(5)?;
    /// assert_eq!(5, sid.as_usize());
    /// assert!(StateID::new(StateID::LIMIT).is_err());
    ///
    /// # Ok::<(), regex_graph::util::primitives::StateIDError>(())
    /// ```
    StateID,
    StateIDError
);
define_index_type!(
    /// The identifier of a character class shared by the arrows of a graph.
    ClassID,
    ClassIDError
);
define_index_type!(
    /// The identifier of a tag. Tags are numbered in the order their groups
    /// open in the pattern, and this is also the index of a tag's tracker
    /// in a matcher's cache.
    TagID,
    TagIDError
);
define_index_type!(
    /// The identifier of a trap, one per loop. A matcher keeps the count of
    /// each active loop in a slot addressed by this ID.
    TrapID,
    TrapIDError
);

/// An extension trait that pairs each item of an iterator with an index of
/// the given type.
pub(crate) trait IteratorIndexExt: Iterator {
    fn with_state_ids(self) -> WithIndexIter<Self, StateID>
    where
        Self: Sized,
    {
        WithIndexIter { it: self, next: 0, _id: core::marker::PhantomData }
    }
}

impl<I: Iterator> IteratorIndexExt for I {}

/// An iterator adapter produced by [`IteratorIndexExt`].
#[derive(Clone, Debug)]
pub(crate) struct WithIndexIter<I, ID> {
    it: I,
    next: usize,
    _id: core::marker::PhantomData<ID>,
}

impl<I: Iterator> Iterator for WithIndexIter<I, StateID> {
    type Item = (StateID, I::Item);

    fn next(&mut self) -> Option<(StateID, I::Item)> {
        let item = self.it.next()?;
        let id = StateID::new_unchecked(self.next);
        self.next += 1;
        Some((id, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits() {
        assert!(StateID::new(StateID::MAX.as_usize()).is_ok());
        let err = StateID::new(StateID::LIMIT).unwrap_err();
        assert_eq!(StateID::LIMIT as u64, err.attempted());
    }
}
