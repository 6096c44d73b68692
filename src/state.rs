use core::fmt;

/// A zero-based byte offset into the parsed text.
///
/// Positions handed out by `parsnip` always fall on a UTF-8 character boundary.
pub type Position = usize;

/// The immutable parse cursor.
///
/// A [`State`] pairs the complete input text with the current position inside
/// it. States are [`Copy`], and consuming input never modifies a state in
/// place; [`State::advance`] and [`State::with_index`] return a new state
/// instead. This makes backtracking free: a combinator simply keeps the state
/// it started from and hands it to the next alternative.
///
/// The invariant `0 <= index <= input.len()` holds for every state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct State<'a> {
    input: &'a str,
    index: Position,
}

/// A 1-based line and column pair, as shown in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// The 1-based line number.
    pub line: usize,
    /// The 1-based column number, counted in characters.
    pub column: usize,
}

impl<'a> State<'a> {
    /// Creates a state positioned at the start of `input`.
    pub const fn new(input: &'a str) -> Self {
        Self { input, index: 0 }
    }

    /// The complete input text, independent of the current position.
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// The current position.
    pub const fn index(&self) -> Position {
        self.index
    }

    /// The input that has not been consumed yet.
    pub fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    /// Returns `true` if every character of the input has been consumed.
    pub const fn is_at_end(&self) -> bool {
        self.index >= self.input.len()
    }

    /// The next character, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns a state moved forward by `len` bytes.
    ///
    /// The new position is clamped to the end of the input.
    pub fn advance(&self, len: usize) -> Self {
        self.with_index(self.index + len)
    }

    /// Returns a state moved forward by exactly one character.
    ///
    /// At the end of the input the state is returned unchanged.
    pub fn advance_char(&self) -> Self {
        match self.peek() {
            Some(ch) => self.advance(ch.len_utf8()),
            None => *self,
        }
    }

    /// Returns a state at `index` on the same input.
    pub fn with_index(&self, index: Position) -> Self {
        Self {
            input: self.input,
            index: index.min(self.input.len()),
        }
    }

    /// The text between this state and a later state `end`.
    pub fn slice_to(&self, end: &State<'a>) -> &'a str {
        &self.input[self.index..end.index.max(self.index)]
    }

    /// Computes the line and column of this state.
    pub fn location(&self) -> Location {
        location_of(self.input, self.index)
    }

    /// Describes the input found at this state, for error messages.
    ///
    /// This is the next character quoted, or `end of input`.
    pub fn found(&self) -> String {
        match self.peek() {
            Some(ch) => format!("{ch:?}"),
            None => String::from("end of input"),
        }
    }
}

/// Computes the 1-based line and column of a byte offset in `input`.
pub fn location_of(input: &str, index: Position) -> Location {
    let index = index.min(input.len());
    let before = &input[..index];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
    let column = before[line_start..].chars().count() + 1;
    Location { line, column }
}

impl fmt::Debug for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("index", &self.index)
            .field("rest", &self.rest())
            .finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, Col {}", self.line, self.column)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn location_counts_newlines() {
        let input = "ab\ncd\nef";
        assert_eq!(location_of(input, 0), Location { line: 1, column: 1 });
        assert_eq!(location_of(input, 2), Location { line: 1, column: 3 });
        assert_eq!(location_of(input, 3), Location { line: 2, column: 1 });
        assert_eq!(location_of(input, 7), Location { line: 3, column: 2 });
        assert_eq!(location_of(input, 100), Location { line: 3, column: 3 });
    }

    #[test]
    fn columns_count_characters() {
        let input = "héllo";
        assert_eq!(location_of(input, 3), Location { line: 1, column: 3 });
    }

    #[test]
    fn advance_is_clamped() {
        let state = State::new("abc");
        assert_eq!(state.advance(2).rest(), "c");
        assert_eq!(state.advance(10).index(), 3);
        assert!(state.advance(3).is_at_end());
        assert_eq!(state.advance(3).advance_char().index(), 3);
    }

    #[test]
    fn found_describes_next_char() {
        let state = State::new("xyz");
        assert_eq!(state.found(), "'x'");
        assert_eq!(state.advance(3).found(), "end of input");
    }
}
