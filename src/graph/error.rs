use crate::util::primitives::{StateID, TagID, TrapID};

/// An error that occurred while compiling a pattern into a graph.
///
/// Compilation never produces a partial graph: any error aborts it. Errors
/// caused by the pattern text carry the offset, counted in characters, of
/// the character at which the problem was detected.
///
/// Beyond its `std::fmt::Display` impl, this error does not offer much
/// introspection. Callers are generally only expected to show it to an end
/// user, possibly pointing at [`BuildError::offset`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildError {
    kind: ErrorKind,
    offset: Option<usize>,
}

/// The kind of error that occurred during compilation.
#[derive(Clone, Debug, Eq, PartialEq)]
enum ErrorKind {
    /// An opening paren without a closing paren, or vice versa.
    UnmatchedParen,
    /// An opening bracket without a closing bracket, or a stray closing
    /// bracket.
    UnmatchedBracket,
    /// A character class that can never match anything.
    EmptyClass,
    /// A class range like `z-a` whose ends are in decreasing order.
    InvalidClassRange { low: char, high: char },
    /// A quantifier with nothing before it to repeat.
    DanglingQuantifier,
    /// A quantifier applied directly to another quantifier.
    RepeatedQuantifier,
    /// A `{m,n}` quantifier with missing, non-numeric, too large or
    /// decreasing bounds.
    InvalidBounds,
    /// An unrecognized or incomplete escape sequence.
    InvalidEscape,
    /// A `(?<name>` or `\k<name>` whose name is empty or unterminated, or a
    /// `(?` not followed by `<` or `:`.
    InvalidGroupName,
    /// The same group name was declared twice.
    DuplicateTag { name: String },
    /// A backreference to a tag that does not exist.
    UnknownTag { name: String },
    /// A backreference to a tag whose closing paren has not been seen yet.
    OpenTag { name: String },
    /// Groups were nested more deeply than the configured limit.
    NestLimitExceeded { limit: u32 },
    /// The graph would need more states than permitted.
    TooManyStates { limit: usize },
    /// The pattern declares more tags or loops than can be indexed.
    TooManyIndices,
}

impl BuildError {
    /// The character offset into the pattern at which this error was
    /// detected, if the error was caused by a specific part of the pattern.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    fn at(kind: ErrorKind, offset: usize) -> BuildError {
        BuildError { kind, offset: Some(offset) }
    }

    pub(crate) fn unmatched_paren(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::UnmatchedParen, offset)
    }

    pub(crate) fn unmatched_bracket(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::UnmatchedBracket, offset)
    }

    pub(crate) fn empty_class(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::EmptyClass, offset)
    }

    pub(crate) fn invalid_class_range(
        offset: usize,
        low: char,
        high: char,
    ) -> BuildError {
        BuildError::at(ErrorKind::InvalidClassRange { low, high }, offset)
    }

    pub(crate) fn dangling_quantifier(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::DanglingQuantifier, offset)
    }

    pub(crate) fn repeated_quantifier(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::RepeatedQuantifier, offset)
    }

    pub(crate) fn invalid_bounds(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::InvalidBounds, offset)
    }

    pub(crate) fn invalid_escape(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::InvalidEscape, offset)
    }

    pub(crate) fn invalid_group_name(offset: usize) -> BuildError {
        BuildError::at(ErrorKind::InvalidGroupName, offset)
    }

    pub(crate) fn duplicate_tag(offset: usize, name: &str) -> BuildError {
        let name = name.to_string();
        BuildError::at(ErrorKind::DuplicateTag { name }, offset)
    }

    pub(crate) fn unknown_tag(offset: usize, name: &str) -> BuildError {
        let name = name.to_string();
        BuildError::at(ErrorKind::UnknownTag { name }, offset)
    }

    pub(crate) fn open_tag(offset: usize, name: &str) -> BuildError {
        let name = name.to_string();
        BuildError::at(ErrorKind::OpenTag { name }, offset)
    }

    pub(crate) fn nest_limit_exceeded(
        offset: usize,
        limit: u32,
    ) -> BuildError {
        BuildError::at(ErrorKind::NestLimitExceeded { limit }, offset)
    }

    pub(crate) fn too_many_states(limit: usize) -> BuildError {
        BuildError { kind: ErrorKind::TooManyStates { limit }, offset: None }
    }

    pub(crate) fn too_many_indices() -> BuildError {
        BuildError { kind: ErrorKind::TooManyIndices, offset: None }
    }

    /// Used when a state limit is exceeded by the index type itself.
    pub(crate) fn state_overflow() -> BuildError {
        BuildError::too_many_states(StateID::LIMIT)
    }
}

impl From<crate::util::primitives::TagIDError> for BuildError {
    fn from(_: crate::util::primitives::TagIDError) -> BuildError {
        debug!("exceeded the maximum of {:?} tags", TagID::MAX);
        BuildError::too_many_indices()
    }
}

impl From<crate::util::primitives::TrapIDError> for BuildError {
    fn from(_: crate::util::primitives::TrapIDError) -> BuildError {
        debug!("exceeded the maximum of {:?} traps", TrapID::MAX);
        BuildError::too_many_indices()
    }
}

impl std::error::Error for BuildError {}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::UnmatchedParen => write!(f, "unmatched parenthesis"),
            ErrorKind::UnmatchedBracket => write!(f, "unmatched bracket"),
            ErrorKind::EmptyClass => {
                write!(f, "character class can never match")
            }
            ErrorKind::InvalidClassRange { low, high } => write!(
                f,
                "invalid class range {:?}-{:?}: \
                 start must not be greater than end",
                low, high,
            ),
            ErrorKind::DanglingQuantifier => {
                write!(f, "quantifier has nothing to repeat")
            }
            ErrorKind::RepeatedQuantifier => {
                write!(f, "quantifier cannot be applied to a quantifier")
            }
            ErrorKind::InvalidBounds => write!(f, "invalid repetition bounds"),
            ErrorKind::InvalidEscape => write!(f, "invalid escape sequence"),
            ErrorKind::InvalidGroupName => write!(f, "invalid group name"),
            ErrorKind::DuplicateTag { ref name } => {
                write!(f, "duplicate group name '{}'", name)
            }
            ErrorKind::UnknownTag { ref name } => {
                write!(f, "backreference to unknown group '{}'", name)
            }
            ErrorKind::OpenTag { ref name } => write!(
                f,
                "backreference to group '{}' before it is closed",
                name
            ),
            ErrorKind::NestLimitExceeded { limit } => write!(
                f,
                "group nesting exceeds the limit of {}",
                limit
            ),
            ErrorKind::TooManyStates { limit } => write!(
                f,
                "attempted to compile more than {} graph states",
                limit,
            ),
            ErrorKind::TooManyIndices => {
                write!(f, "pattern contains too many groups or loops")
            }
        }?;
        if let Some(offset) = self.offset {
            write!(f, " at offset {}", offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset() {
        let err = BuildError::unknown_tag(7, "x");
        assert_eq!(Some(7), err.offset());
        assert_eq!(
            "backreference to unknown group 'x' at offset 7",
            err.to_string()
        );
        let err = BuildError::too_many_states(10);
        assert_eq!(None, err.offset());
    }
}
