//! Algebraic combinators.
//!
//! These treat parsers as the sets of inputs they accept. [`intersect`] and
//! [`difference`] restrict one parser by another, [`permutation`] accepts a
//! group of parsers in any order and [`longest`] picks the longest of several
//! competing matches.

use crate::sequence::Alternatives;
use crate::{Context, Error, Failure, PResult, Parse, State, Success};

#[derive(Debug, Clone)]
struct IntersectParser<P, Q>(P, Q);

impl<'a, P, Q> Parse<'a> for IntersectParser<P, Q>
where
    P: Parse<'a>,
    Q: Parse<'a, Parsed = P::Parsed>,
    P::Parsed: PartialEq,
{
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        let Success(left, end) = self.0.run(state, ctx)?;
        let Success(right, other_end) = self.1.run(state, ctx)?;
        if end.index() == other_end.index() && left == right {
            Ok(Success(left, end))
        } else {
            let err = Error::expected("input matched identically by both parsers", &state);
            Err(Failure(err, state))
        }
    }
}

/// Creates a parser that succeeds only where `first` and `second` both
/// succeed from the same start, produce equal values and consume the same
/// input.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// // Lowercase words that are also valid hexadecimal.
/// let hex_word = intersect(regex("[a-z]+").unwrap(), regex("[0-9a-f]+").unwrap());
/// assert_eq!(hex_word.parse("cafe"), Ok("cafe"));
/// assert!(hex_word.parse("coffee").is_err());
/// ```
#[inline]
pub const fn intersect<'a, P, Q>(first: P, second: Q) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    Q: Parse<'a, Parsed = P::Parsed>,
    P::Parsed: PartialEq,
{
    IntersectParser(first, second)
}

#[derive(Debug, Clone)]
struct DifferenceParser<P, Q>(P, Q);

impl<'a, P: Parse<'a>, Q: Parse<'a>> Parse<'a> for DifferenceParser<P, Q> {
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        match self.1.run(state, ctx) {
            Ok(Success(_, end)) => {
                let expected = format!("anything but {:?}", state.slice_to(&end));
                Err(Failure(Error::expected(expected, &state), state))
            }
            Err(fail) if fail.is_fatal() => Err(fail),
            Err(_) => self.0.run(state, ctx),
        }
    }
}

/// Creates a parser that runs `parser` only where `excluded` does not match.
///
/// `excluded` is run as a lookahead and never consumes input.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let word = || regex("[a-z]+").unwrap();
/// let keyword = suffix(choice((verbatim("if"), verbatim("else"))), not(word()));
/// let identifier = difference(word(), keyword);
/// assert_eq!(identifier.parse("iffy"), Ok("iffy"));
/// assert!(identifier.parse("if").is_err());
/// ```
#[inline]
pub const fn difference<'a, P, Q>(parser: P, excluded: Q) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    Q: Parse<'a>,
{
    DifferenceParser(parser, excluded)
}

#[derive(Debug, Clone)]
struct PermutationParser<A>(A);

impl<'a, A: Alternatives<'a>> Parse<'a> for PermutationParser<A> {
    type Parsed = Vec<A::Parsed>;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        let count = self.0.count();
        let mut slots: Vec<Option<A::Parsed>> = (0..count).map(|_| None).collect();
        let mut rem = state;
        for _ in 0..count {
            let mut furthest: Option<Error> = None;
            let mut matched = false;
            for (index, slot) in slots.iter_mut().enumerate() {
                if slot.is_some() {
                    continue;
                }
                match self.0.attempt(index, rem, ctx) {
                    Some(Ok(Success(val, next))) => {
                        *slot = Some(val);
                        rem = next;
                        matched = true;
                        break;
                    }
                    Some(Err(fail)) if fail.is_fatal() || fail.is_committed(&rem) => {
                        return Err(fail);
                    }
                    Some(Err(Failure(err, _))) => {
                        furthest = Some(match furthest {
                            Some(prev) => prev.merge(err),
                            None => err,
                        });
                    }
                    None => break,
                }
            }
            if !matched {
                let err = furthest.unwrap_or_else(|| Error::expected("a permutation member", &rem));
                return Err(Failure(err, rem));
            }
        }
        Ok(Success(slots.into_iter().flatten().collect(), rem))
    }
}

/// Creates a parser that matches every one of `parsers` exactly once, in any
/// order.
///
/// Each round tries the parsers not yet matched, in their original order, and
/// accepts the first that succeeds. The parsed values are returned in the
/// original order of `parsers`, regardless of the order in which they were
/// found in the input.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let abc = permutation([verbatim("a"), verbatim("b"), verbatim("c")]);
/// assert_eq!(abc.parse("cab"), Ok(vec!["a", "b", "c"]));
/// assert!(abc.parse("ab").is_err());
/// ```
#[inline]
pub const fn permutation<'a, A>(parsers: A) -> impl Parse<'a, Parsed = Vec<A::Parsed>>
where
    A: Alternatives<'a>,
{
    PermutationParser(parsers)
}

#[derive(Debug, Clone)]
struct LongestParser<A>(A);

impl<'a, A: Alternatives<'a>> Parse<'a> for LongestParser<A> {
    type Parsed = A::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, A::Parsed> {
        let mut best: Option<Success<'a, A::Parsed>> = None;
        let mut furthest: Option<Error> = None;
        for index in 0..self.0.count() {
            match self.0.attempt(index, state, ctx) {
                Some(Ok(succ)) => {
                    if best.as_ref().map_or(true, |prev| succ.1.index() > prev.1.index()) {
                        best = Some(succ);
                    }
                }
                Some(Err(fail)) if fail.is_fatal() => return Err(fail),
                Some(Err(Failure(err, _))) => {
                    furthest = Some(match furthest {
                        Some(prev) => prev.merge(err),
                        None => err,
                    });
                }
                None => break,
            }
        }
        match best {
            Some(succ) => Ok(succ),
            None => {
                let err = furthest.unwrap_or_else(|| Error::expected("an alternative", &state));
                Err(Failure(err, state))
            }
        }
    }
}

/// Creates a parser that runs every one of `parsers` from the same start and
/// returns the success that consumed the most input.
///
/// When several parsers consume the same amount, the first of them wins. The
/// parser fails only if none of `parsers` succeeds, reporting the furthest
/// error.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let op = longest((verbatim("<"), verbatim("<="), verbatim("<<=")));
/// assert_eq!(op.parse("<="), Ok("<="));
/// assert_eq!(op.parse("<<="), Ok("<<="));
/// ```
#[inline]
pub const fn longest<'a, A>(parsers: A) -> impl Parse<'a, Parsed = A::Parsed>
where
    A: Alternatives<'a>,
{
    LongestParser(parsers)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::basic::{not, regex, satisfy, suffix, verbatim};
    use crate::sequence::choice;
    use crate::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn intersect_requires_same_extent() {
        let p = intersect(regex("[a-z]+").unwrap(), regex("[a-f]+").unwrap());
        assert_eq!(p.parse("abc"), Ok("abc"));
        assert!(p.parse("abz").is_err());
    }

    #[test]
    fn intersect_requires_equal_values() {
        let p = intersect(verbatim("a").with_value(1), verbatim("a").with_value(2));
        let err = p.parse("a").unwrap_err();
        assert_eq!(err.index(), 0);
    }

    #[test]
    fn difference_excludes_matches() {
        let word = || regex("[a-z]+").unwrap();
        let keyword = suffix(
            choice((verbatim("if"), verbatim("else"))),
            not(satisfy("a letter", |ch| ch.is_ascii_lowercase())),
        );
        let identifier = difference(word(), keyword);
        assert_eq!(identifier.parse("iffy"), Ok("iffy"));
        assert_eq!(identifier.parse("x"), Ok("x"));
        assert_eq!(
            identifier.parse("else").unwrap_err().to_string(),
            "Parse error at Line 1, Col 1: Expected anything but \"else\" but found 'e'"
        );
    }

    #[test]
    fn permutation_is_order_independent() {
        let p = permutation([verbatim("a"), verbatim("b"), verbatim("c")]);
        for input in ["abc", "bca", "cab", "acb"] {
            assert_eq!(p.parse(input), Ok(vec!["a", "b", "c"]));
        }
        assert!(p.parse("aab").is_err());
        assert!(p.parse("ab").is_err());
    }

    #[test]
    fn permutation_of_mixed_parsers() {
        let p = permutation((
            verbatim("x").with_value('x'),
            satisfy("a digit", |ch| ch.is_ascii_digit()),
        ));
        assert_eq!(p.parse("7x"), Ok(vec!['x', '7']));
        assert_eq!(p.parse("x7"), Ok(vec!['x', '7']));
    }

    #[test]
    fn permutation_allows_duplicates() {
        let p = permutation(vec![verbatim("a"), verbatim("a")]);
        assert_eq!(p.parse("aa"), Ok(vec!["a", "a"]));
        assert!(p.parse("a").is_err());
        assert_eq!(p.parse_prefix("aaa"), Ok((vec!["a", "a"], "a")));
        let none: Vec<Parser<'_, ()>> = Vec::new();
        assert_eq!(permutation(none).parse(""), Ok(vec![]));
    }

    #[test]
    fn longest_prefers_most_input() {
        let p = longest((verbatim("a"), verbatim("abc"), verbatim("ab")));
        assert_eq!(p.parse("abc"), Ok("abc"));
        assert_eq!(p.parse_prefix("abx"), Ok(("ab", "x")));
        assert!(p.parse("x").is_err());
    }

    #[test]
    fn longest_first_wins_ties() {
        let p = longest((
            verbatim("ab").with_value(1),
            regex("[a-z]{2}").unwrap().with_value(2),
        ));
        assert_eq!(p.parse("ab"), Ok(1));
        assert_eq!(p.parse("cd"), Ok(2));
    }
}
