//! Parsing errors.
//!
//! Inside the combinator graph a failed parse is a plain value: a [`Failure`]
//! holding an [`Error`]. Only the top-level entry points
//! ([`Parse::parse`](crate::Parse::parse) and friends) turn a terminal failure
//! into a [`ParseError`].
//!
//! [`Failure`]: crate::Failure

use crate::{Location, Position, State};

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// The input did not match what the grammar expected.
    ///
    /// Syntax errors can be backtracked over and recovered from.
    Syntax,
    /// A repetition combinator saw its parser succeed without consuming input.
    ///
    /// This is a bug in the grammar, not in the input. It is never recovered
    /// from and never backtracked over.
    InfiniteLoop,
}

/// The error carried by a [`Failure`](crate::Failure).
///
/// An error records what was expected, what was found instead and the
/// furthest position at which the mismatch was detected. That position may be
/// further into the input than the state stored alongside it in the
/// [`Failure`](crate::Failure): a literal such as `"cat"` reports a mismatch on
/// its third character without having consumed the first two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    expected: String,
    found: String,
    position: Position,
}

impl Error {
    /// Creates a syntax error expecting `expected` at the position of `at`.
    pub fn expected(expected: impl Into<String>, at: &State<'_>) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            expected: expected.into(),
            found: at.found(),
            position: at.index(),
        }
    }

    /// Creates the fatal error raised by repetitions that stop making progress.
    pub fn infinite_loop(at: &State<'_>) -> Self {
        Self {
            kind: ErrorKind::InfiniteLoop,
            expected: String::from("a repeated parser to consume input"),
            found: at.found(),
            position: at.index(),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The description of what the grammar expected.
    pub fn expected_message(&self) -> &str {
        &self.expected
    }

    /// The description of the input found instead.
    pub fn found(&self) -> &str {
        &self.found
    }

    /// The furthest position at which the mismatch was detected.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns `true` for errors that must never be backtracked or recovered.
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::InfiniteLoop)
    }

    /// Replaces the expected message.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }

    /// Moves the error to `at`, refreshing the found text.
    pub fn at(mut self, at: &State<'_>) -> Self {
        self.position = at.index();
        self.found = at.found();
        self
    }

    /// Combines the errors of two alternatives.
    ///
    /// The error that reached further into the input wins. When both reached
    /// the same position their expectations are joined with `or`.
    pub fn merge(self, other: Error) -> Error {
        if other.position > self.position {
            return other;
        }
        if other.position < self.position {
            return self;
        }
        let mut merged = self;
        if !merged
            .expected
            .split(" or ")
            .any(|alt| alt == other.expected)
        {
            merged.expected.push_str(" or ");
            merged.expected.push_str(&other.expected);
        }
        merged
    }

    /// Converts this error into the error reported to callers of `parse`.
    pub fn into_parse_error(self, input: &str) -> ParseError {
        let location = crate::state::location_of(input, self.position);
        match self.kind {
            ErrorKind::Syntax => ParseError::Syntax {
                location,
                index: self.position,
                expected: self.expected,
                found: self.found,
            },
            ErrorKind::InfiniteLoop => ParseError::InfiniteLoop {
                location,
                index: self.position,
            },
        }
    }
}

/// The error returned by the top-level parse entry points.
///
/// Every variant carries the 1-based [`Location`] and the byte index of the
/// problem, so callers can distinguish grammar errors from unrelated failures
/// with a plain `match`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input did not match the grammar.
    #[error("Parse error at {location}: Expected {expected} but found {found}")]
    Syntax {
        location: Location,
        index: Position,
        expected: String,
        found: String,
    },
    /// The grammar matched a prefix of the input, but input was left over.
    #[error("Parse error at {location}: Parser did not consume entire input, found {found}")]
    Incomplete {
        location: Location,
        index: Position,
        found: String,
    },
    /// A repetition stopped making progress. This indicates a grammar bug.
    #[error(
        "Parse error at {location}: Infinite loop detected, a repeated parser succeeded without consuming input"
    )]
    InfiniteLoop { location: Location, index: Position },
}

impl ParseError {
    pub(crate) fn incomplete(rest: &State<'_>) -> Self {
        Self::Incomplete {
            location: rest.location(),
            index: rest.index(),
            found: rest.found(),
        }
    }

    /// The line and column at which the error was detected.
    pub const fn location(&self) -> Location {
        match self {
            Self::Syntax { location, .. }
            | Self::Incomplete { location, .. }
            | Self::InfiniteLoop { location, .. } => *location,
        }
    }

    /// The byte index at which the error was detected.
    pub const fn index(&self) -> Position {
        match self {
            Self::Syntax { index, .. }
            | Self::Incomplete { index, .. }
            | Self::InfiniteLoop { index, .. } => *index,
        }
    }

    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }

    pub const fn is_infinite_loop(&self) -> bool {
        matches!(self, Self::InfiniteLoop { .. })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_prefers_furthest() {
        let state = State::new("abcdef");
        let near = Error::expected("\"x\"", &state.advance(1));
        let far = Error::expected("\"y\"", &state.advance(3));
        assert_eq!(near.clone().merge(far.clone()), far);
        assert_eq!(far.clone().merge(near), far);
    }

    #[test]
    fn merge_joins_ties() {
        let state = State::new("cab").advance(2);
        let merged = Error::expected("\"cat\"", &state)
            .merge(Error::expected("\"car\"", &state))
            .merge(Error::expected("\"cat\"", &state));
        assert_eq!(merged.expected_message(), "\"cat\" or \"car\"");
        assert_eq!(merged.found(), "'b'");
    }

    #[test]
    fn display_format() {
        let input = "ab\ncd";
        let err = Error::expected("\"x\"", &State::new(input).advance(4)).into_parse_error(input);
        assert_eq!(
            err.to_string(),
            "Parse error at Line 2, Col 2: Expected \"x\" but found 'd'"
        );
        assert!(err.is_syntax());
    }
}
