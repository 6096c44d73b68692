//! Parsers classifying characters by their Unicode properties.
//!
//! # Example
//! ```
//! # use parsnip::prelude::*;
//! use parsnip::unicode::{self, prop};
//!
//! let word = unicode::char_with_prop(prop::Alphabetic).many1().slice();
//! assert_eq!(word.parse_prefix("Grüße!"), Ok(("Grüße", "!")));
//! assert_eq!(unicode::identifier.parse("naïve_2"), Ok("naïve_2"));
//! ```

use crate::{Context, Error, Failure, PResult, Parse, State, Success};

pub mod prop;

/// A set of characters defined by Unicode character properties.
pub trait Property: core::fmt::Debug + Copy {
    /// Returns `true` if `ch` has the property.
    fn contains(self, ch: char) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct CharWithPropParser<P: Property>(P);

impl<'a, P: Property> Parse<'a> for CharWithPropParser<P> {
    type Parsed = char;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, char> {
        match state.peek() {
            Some(ch) if self.0.contains(ch) => Ok(Success(ch, state.advance_char())),
            _ => Err(Failure(
                Error::expected(format!("a character in {:?}", self.0), &state),
                state,
            )),
        }
    }
}

/// Creates a parser for one character having `property`.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// use parsnip::unicode::{char_with_prop, prop::Category};
///
/// let digit = char_with_prop(Category::Number);
/// assert_eq!(digit.parse("٣"), Ok('٣'));
/// assert!(digit.parse("x").is_err());
/// ```
#[inline]
pub const fn char_with_prop<'a, P: Property>(property: P) -> impl Parse<'a, Parsed = char> {
    CharWithPropParser(property)
}

/// Parses an identifier as defined by UAX #31.
///
/// An identifier is a character with [`XidStart`](prop::XidStart) or an
/// underscore, followed by any number of characters with
/// [`XidContinue`](prop::XidContinue).
pub fn identifier<'a>(state: State<'a>, _ctx: &mut Context) -> PResult<'a, &'a str> {
    use prop::{XidContinue, XidStart};

    let rest = state.rest();
    match rest.chars().next() {
        Some(ch) if ch == '_' || XidStart.contains(ch) => {
            let len = rest
                .char_indices()
                .find(|&(_, ch)| !XidContinue.contains(ch))
                .map_or(rest.len(), |(index, _)| index);
            Ok(Success(&rest[..len], state.advance(len)))
        }
        _ => Err(Failure(Error::expected("an identifier", &state), state)),
    }
}

/// Consumes zero or more characters with the
/// [`PatternWhiteSpace`](prop::PatternWhiteSpace) property.
pub fn pattern_whitespace<'a>(state: State<'a>, _ctx: &mut Context) -> PResult<'a, &'a str> {
    let rest = state.rest();
    let len = rest
        .char_indices()
        .find(|&(_, ch)| !prop::PatternWhiteSpace.contains(ch))
        .map_or(rest.len(), |(index, _)| index);
    Ok(Success(&rest[..len], state.advance(len)))
}

#[cfg(test)]
mod test {
    use super::prop::{Alphabetic, Category, Uppercase};
    use super::*;
    use crate::basic::verbatim;
    use crate::sequence::{sep_by, sequence};
    use pretty_assertions::assert_eq;

    #[test]
    fn char_classes() {
        let upper = char_with_prop(Uppercase & Alphabetic);
        assert_eq!(upper.parse_prefix("ÉCOLE"), Ok(('É', "COLE")));
        let err = char_with_prop(Category::Number).parse("x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at Line 1, Col 1: Expected a character in Number but found 'x'"
        );
    }

    #[test]
    fn identifiers() {
        assert_eq!(identifier.parse_prefix("größe = 1"), Ok(("größe", " = 1")));
        assert_eq!(identifier.parse("_tmp9"), Ok("_tmp9"));
        assert_eq!(identifier.parse("変数"), Ok("変数"));
        assert!(identifier.parse("9lives").is_err());
    }

    #[test]
    fn whitespace_separated_identifiers() {
        let comma = sequence((pattern_whitespace, verbatim(","), pattern_whitespace));
        let names = sep_by(identifier, comma);
        assert_eq!(names.parse("α ,\tβ,γ"), Ok(vec!["α", "β", "γ"]));
    }
}
