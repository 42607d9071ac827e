/*!
The token stream abstraction that matching runs over.

A [`Stream`] is a cursor over a sequence of comparable tokens. The matcher
only ever peeks at the current token, moves the cursor and saves/restores
positions, so anything from a slice of bytes to a tokenizer can be matched
against a compiled graph. Two implementations are provided: [`SliceStream`]
for arbitrary slices and [`CharStream`] for `&str`.
*/

use core::fmt;

/// A single token that can be tested against the arrows of a graph.
///
/// Literal and class arrows are written in terms of `char`, so every token
/// type must have a character interpretation. Backreferences compare tokens
/// directly with `Eq`.
pub trait Token: Copy + Eq + fmt::Debug {
    /// The character this token stands for.
    fn to_char(self) -> char;
}

impl Token for char {
    #[inline]
    fn to_char(self) -> char {
        self
    }
}

impl Token for u8 {
    /// Bytes are interpreted as Latin-1.
    #[inline]
    fn to_char(self) -> char {
        char::from(self)
    }
}

/// A cursor over a sequence of tokens.
///
/// Streams are cheap to clone and their positions are plain values that can
/// be captured and restored at will. Reading past the end is not an error:
/// `peek` simply returns `None`.
pub trait Stream: Clone {
    /// The type of token yielded by this stream.
    type Token: Token;
    /// A saved cursor location.
    type Pos: Copy + Eq + fmt::Debug;

    /// Return the token at the cursor without consuming it.
    fn peek(&self) -> Option<Self::Token>;

    /// Move the cursor by `n` tokens, backwards if `n` is negative. The
    /// cursor stops at either end of the stream.
    fn advance(&mut self, n: isize);

    /// Return the current cursor location.
    fn pos(&self) -> Self::Pos;

    /// Move the cursor to a location previously returned by `pos`.
    fn set_pos(&mut self, pos: Self::Pos);

    /// Return the token at the cursor and move past it.
    #[inline]
    fn next_token(&mut self) -> Option<Self::Token> {
        let token = self.peek()?;
        self.advance(1);
        Some(token)
    }

    /// Returns true when no tokens remain after the cursor.
    #[inline]
    fn is_done(&self) -> bool {
        self.peek().is_none()
    }
}

/// A stream over a slice of tokens. Positions are indices into the slice.
#[derive(Clone, Debug)]
pub struct SliceStream<'a, T> {
    tokens: &'a [T],
    at: usize,
}

impl<'a, T> SliceStream<'a, T> {
    /// Create a stream positioned at the first token.
    pub fn new(tokens: &'a [T]) -> SliceStream<'a, T> {
        SliceStream { tokens, at: 0 }
    }
}

impl<'a, T: Token> Stream for SliceStream<'a, T> {
    type Token = T;
    type Pos = usize;

    #[inline]
    fn peek(&self) -> Option<T> {
        self.tokens.get(self.at).copied()
    }

    fn advance(&mut self, n: isize) {
        if n < 0 {
            self.at = self.at.saturating_sub(n.unsigned_abs());
        } else {
            let at = self.at.saturating_add(n as usize);
            self.at = at.min(self.tokens.len());
        }
    }

    #[inline]
    fn pos(&self) -> usize {
        self.at
    }

    #[inline]
    fn set_pos(&mut self, pos: usize) {
        self.at = pos.min(self.tokens.len());
    }
}

/// A stream over the characters of a string. Positions are byte offsets,
/// which are always on a character boundary.
#[derive(Clone, Debug)]
pub struct CharStream<'a> {
    text: &'a str,
    at: usize,
}

impl<'a> CharStream<'a> {
    /// Create a stream positioned at the start of `text`.
    pub fn new(text: &'a str) -> CharStream<'a> {
        CharStream { text, at: 0 }
    }

    /// Create a stream positioned at the byte offset `at`.
    ///
    /// # Panics
    ///
    /// When `at` is not on a character boundary of `text`.
    pub fn at(text: &'a str, at: usize) -> CharStream<'a> {
        assert!(text.is_char_boundary(at), "{} is not a char boundary", at);
        CharStream { text, at }
    }

    /// The full text this stream reads from.
    pub fn text(&self) -> &'a str {
        self.text
    }
}

impl<'a> From<&'a str> for CharStream<'a> {
    fn from(text: &'a str) -> CharStream<'a> {
        CharStream::new(text)
    }
}

impl<'a> Stream for CharStream<'a> {
    type Token = char;
    type Pos = usize;

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text[self.at..].chars().next()
    }

    fn advance(&mut self, n: isize) {
        if n < 0 {
            let back = n.unsigned_abs();
            self.at = self.text[..self.at]
                .char_indices()
                .rev()
                .take(back)
                .last()
                .map_or(self.at, |(i, _)| i);
        } else {
            let fwd = n as usize;
            self.at += self.text[self.at..]
                .chars()
                .take(fwd)
                .map(char::len_utf8)
                .sum::<usize>();
        }
    }

    #[inline]
    fn pos(&self) -> usize {
        self.at
    }

    #[inline]
    fn set_pos(&mut self, pos: usize) {
        debug_assert!(self.text.is_char_boundary(pos));
        self.at = pos;
    }
}

/// A half-open range of stream positions, `start..end`.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Span<P> {
    /// Where the span begins (inclusive).
    pub start: P,
    /// Where the span ends (exclusive).
    pub end: P,
}

impl<P: fmt::Debug> fmt::Debug for Span<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Span<usize> {
    /// The number of positions covered by this span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true when this span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert this span into a standard library range.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_stream_moves() {
        let tokens = [1u8, 2, 3];
        let mut s = SliceStream::new(&tokens);
        assert_eq!(Some(1), s.next_token());
        s.advance(5);
        assert!(s.is_done());
        assert_eq!(3, s.pos());
        s.advance(-2);
        assert_eq!(Some(2), s.peek());
        s.advance(-9);
        assert_eq!(0, s.pos());
    }

    #[test]
    fn char_stream_multibyte() {
        let mut s = CharStream::new("aβc");
        assert_eq!(Some('a'), s.next_token());
        assert_eq!(Some('β'), s.next_token());
        assert_eq!(3, s.pos());
        s.advance(-1);
        assert_eq!(1, s.pos());
        assert_eq!(Some('β'), s.peek());
        s.advance(2);
        assert!(s.is_done());
        assert_eq!(4, s.pos());
        let saved = s.pos();
        s.set_pos(0);
        assert_eq!(Some('a'), s.peek());
        s.set_pos(saved);
        assert!(s.is_done());
    }
}
