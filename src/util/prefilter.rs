/*!
Fast scanning for candidate match starts.

When every match of a pattern must begin with a known literal, an unanchored
search only needs to run the matcher where that literal occurs. A
[`Prefilter`] finds those places with the vectorized routines from `memchr`.
*/

use memchr::{memchr, memmem};

/// A literal scanner over UTF-8 haystacks.
#[derive(Clone, Debug)]
pub struct Prefilter {
    imp: Imp,
}

#[derive(Clone, Debug)]
enum Imp {
    Memchr(u8),
    Memmem(memmem::Finder<'static>),
}

impl Prefilter {
    /// Build a prefilter for the given literal prefix. Returns `None` when
    /// the literal is empty.
    pub fn new(literal: &[char]) -> Option<Prefilter> {
        let needle: String = literal.iter().collect();
        let imp = match needle.len() {
            0 => {
                debug!("prefilter building failed: empty literal prefix");
                return None;
            }
            1 => {
                debug!("prefilter built: memchr");
                Imp::Memchr(needle.as_bytes()[0])
            }
            _ => {
                debug!("prefilter built: memmem");
                let finder = memmem::Finder::new(needle.as_bytes());
                Imp::Memmem(finder.into_owned())
            }
        };
        Some(Prefilter { imp })
    }

    /// Return the offset of the first occurrence of the literal in
    /// `haystack[at..]`, relative to the start of `haystack`.
    ///
    /// Since the needle is a complete UTF-8 sequence, the offset returned
    /// for a `str` haystack is always on a character boundary.
    pub fn find(&self, haystack: &[u8], at: usize) -> Option<usize> {
        if at > haystack.len() {
            return None;
        }
        let found = match self.imp {
            Imp::Memchr(b) => memchr(b, &haystack[at..]),
            Imp::Memmem(ref finder) => finder.find(&haystack[at..]),
        }?;
        Some(at + found)
    }

    /// The length of the literal in bytes.
    pub fn needle_len(&self) -> usize {
        match self.imp {
            Imp::Memchr(_) => 1,
            Imp::Memmem(ref finder) => finder.needle().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_multibyte_literals() {
        let pre = Prefilter::new(&['☃', 'x']).unwrap();
        assert_eq!(4, pre.needle_len());
        let haystack = "ab☃y☃x";
        assert_eq!(Some(6), pre.find(haystack.as_bytes(), 0));
        assert_eq!(None, pre.find(haystack.as_bytes(), 7));
        assert!(haystack.is_char_boundary(6));
    }

    #[test]
    fn single_byte() {
        let pre = Prefilter::new(&['z']).unwrap();
        assert_eq!(Some(3), pre.find(b"abcz", 1));
        assert!(Prefilter::new(&[]).is_none());
    }
}
