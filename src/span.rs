use crate::{Location, Position, State};

/// A region of the input between two positions.
///
/// Produced by [`Parse::recognize`](crate::Parse::recognize) and
/// [`Parse::spanned`](crate::Parse::spanned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span<'a> {
    input: &'a str,
    start: Position,
    end: Position,
}

impl<'a> Span<'a> {
    /// Creates the span covering everything from `start` up to `end`.
    pub fn new(start: State<'a>, end: State<'a>) -> Self {
        Self {
            input: start.input(),
            start: start.index(),
            end: end.index().max(start.index()),
        }
    }

    pub const fn start(&self) -> Position {
        self.start
    }

    pub const fn end(&self) -> Position {
        self.end
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text covered by the span.
    pub fn as_str(&self) -> &'a str {
        &self.input[self.start..self.end]
    }

    /// The line and column of the first character of the span.
    pub fn location(&self) -> Location {
        crate::state::location_of(self.input, self.start)
    }
}

impl<'a> From<Span<'a>> for &'a str {
    fn from(span: Span<'a>) -> &'a str {
        span.as_str()
    }
}

impl core::fmt::Display for Span<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
