//! Parsers for ASCII text.
//!
//! Character classes are expressed as [`Property`] values from the [`prop`]
//! module, which can be combined with `!`, `&` and `|`.
//!
//! # Example
//! ```
//! # use parsnip::prelude::*;
//! use parsnip::ascii::{self, prop};
//!
//! let select = ascii::keyword("SELECT").unwrap();
//! let name = ascii::char_with_prop(prop::Alphabetic).many1().slice();
//! let query = sequence((select, whitespace, name)).map(|(_, _, name)| name);
//! assert_eq!(query.parse("select users"), Ok("users"));
//! ```

use crate::{Context, Error, Failure, PResult, Parse, State, Success};
pub use ::ascii::{AsAsciiStrError, AsciiChar, AsciiStr, AsciiString, ToAsciiChar};

pub mod prop;

/// A class of ASCII characters.
pub trait Property: core::fmt::Debug + Copy {
    /// Returns `true` if `ch` belongs to the class.
    fn contains(self, ch: AsciiChar) -> bool;
}

fn next_ascii(state: &State<'_>) -> Option<AsciiChar> {
    state.peek().and_then(|ch| ch.to_ascii_char().ok())
}

/// Parses a single ASCII character.
pub fn char<'a>(state: State<'a>, _ctx: &mut Context) -> PResult<'a, AsciiChar> {
    match next_ascii(&state) {
        Some(ch) => Ok(Success(ch, state.advance(1))),
        None => Err(Failure(Error::expected("an ASCII character", &state), state)),
    }
}

#[derive(Debug, Clone, Copy)]
struct CharWithPropParser<P: Property>(P);

impl<'a, P: Property> Parse<'a> for CharWithPropParser<P> {
    type Parsed = AsciiChar;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, AsciiChar> {
        match next_ascii(&state) {
            Some(ch) if self.0.contains(ch) => Ok(Success(ch, state.advance(1))),
            _ => Err(Failure(
                Error::expected(format!("an ASCII character in {:?}", self.0), &state),
                state,
            )),
        }
    }
}

/// Creates a parser for one ASCII character belonging to `property`.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// use parsnip::ascii::{char_with_prop, prop::{Digit, HexDigit, Lowercase}, AsciiChar};
///
/// let upper_hex = char_with_prop(HexDigit & !Lowercase);
/// assert_eq!(upper_hex.parse("F"), Ok(AsciiChar::F));
/// assert!(upper_hex.parse("f").is_err());
/// assert!(char_with_prop(Digit).parse("٣").is_err());
/// ```
#[inline]
pub const fn char_with_prop<'a, P: Property>(property: P) -> impl Parse<'a, Parsed = AsciiChar> {
    CharWithPropParser(property)
}

#[derive(Debug, Clone)]
struct KeywordParser(AsciiString);

impl<'a> Parse<'a> for KeywordParser {
    type Parsed = &'a str;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, &'a str> {
        let word = self.0.as_bytes();
        let rest = state.rest().as_bytes();
        let common = word
            .iter()
            .zip(rest)
            .take_while(|(lhs, rhs)| lhs.eq_ignore_ascii_case(rhs))
            .count();
        if common == word.len() {
            let end = state.advance(common);
            Ok(Success(state.slice_to(&end), end))
        } else {
            let err = Error::expected(format!("{:?}", self.0.as_str()), &state.advance(common));
            Err(Failure(err, state))
        }
    }
}

/// Creates a parser matching the ASCII word `word`, ignoring ASCII case.
///
/// The parser produces the input text as written, not `word`. Building the
/// parser fails if `word` contains non-ASCII characters.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let kw = parsnip::ascii::keyword("Insert").unwrap();
/// assert_eq!(kw.parse("INSERT"), Ok("INSERT"));
/// assert_eq!(kw.parse("insert"), Ok("insert"));
/// assert!(parsnip::ascii::keyword("café").is_err());
/// ```
pub fn keyword<'a>(word: &str) -> Result<impl Parse<'a, Parsed = &'a str>, AsAsciiStrError> {
    Ok(KeywordParser(AsciiStr::from_ascii(word)?.to_owned()))
}

/// Parses the rest of the current line, without its line ending.
///
/// The line ending (`\n` or `\r\n`) is consumed. Fails only at the end of the
/// input.
pub fn line<'a>(state: State<'a>, _ctx: &mut Context) -> PResult<'a, &'a str> {
    if state.is_at_end() {
        return Err(Failure(Error::expected("a line", &state), state));
    }
    let rest = state.rest();
    let end = rest.find('\n').unwrap_or(rest.len());
    let text = rest[..end].strip_suffix('\r').unwrap_or(&rest[..end]);
    Ok(Success(text, state.advance(end + 1)))
}

#[cfg(test)]
mod test {
    use super::prop::{Alphabetic, Digit, Whitespace};
    use super::*;
    use crate::sequence::sequence;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_char() {
        assert_eq!(char.parse_prefix("ab"), Ok((AsciiChar::a, "b")));
        let err = char.parse("é").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at Line 1, Col 1: Expected an ASCII character but found 'é'"
        );
    }

    #[test]
    fn char_classes() {
        let digits = char_with_prop(Digit).many1().slice();
        assert_eq!(digits.parse_prefix("42abc"), Ok(("42", "abc")));
        let err = char_with_prop(Alphabetic | Whitespace).parse("1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at Line 1, Col 1: Expected an ASCII character in Or(Alphabetic, Whitespace) but found '1'"
        );
    }

    #[test]
    fn keyword_ignores_case() {
        let kw = keyword("from").unwrap();
        assert_eq!(kw.parse_prefix("FROM t"), Ok(("FROM", " t")));
        assert_eq!(kw.parse("FrOm"), Ok("FrOm"));
    }

    #[test]
    fn keyword_mismatch_is_uncommitted() {
        let kw = keyword("where").unwrap();
        let mut ctx = Context::new();
        let state = State::new("whence");
        let Failure(err, rem) = kw.run(state, &mut ctx).unwrap_err();
        assert_eq!(rem.index(), 0);
        assert_eq!(err.position(), 3);
        assert_eq!(err.expected_message(), "\"where\"");
    }

    #[test]
    fn keyword_rejects_non_ascii() {
        assert!(keyword("naïve").is_err());
    }

    #[test]
    fn lines() {
        let two = sequence((line, line));
        assert_eq!(two.parse("first\r\nsecond"), Ok(("first", "second")));
        assert_eq!(line.parse_prefix("a\n\nb"), Ok(("a", "\nb")));
        assert_eq!(line.parse_prefix("\nb"), Ok(("", "b")));
        assert!(line.parse("").is_err());
    }
}
