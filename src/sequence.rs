//! Sequencing and choice.
//!
//! [`sequence`] and [`choice`] accept groups of parsers: tuples of up to 12
//! parsers, and for parsers of a single type, arrays and [`Vec`]s. A tuple
//! passed to [`sequence`] may mix parsed types; every alternative passed to
//! [`choice`] must produce the same type.

use crate::basic::{as_ref, prefix, repeat, suffix};
use crate::{Context, Error, Failure, PResult, Parse, State, Success};

/// A group of parsers applied one after another.
pub trait Sequence<'a> {
    /// The combined parsed value.
    type Parsed;

    /// Runs each parser in order, threading the state through.
    fn run_all(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed>;
}

/// A group of alternative parsers producing the same value type.
pub trait Alternatives<'a> {
    /// The value type shared by every alternative.
    type Parsed;

    /// The number of alternatives.
    fn count(&self) -> usize;

    /// Runs alternative `index` at `state`, or returns `None` if there is no
    /// such alternative.
    fn attempt(
        &self,
        index: usize,
        state: State<'a>,
        ctx: &mut Context,
    ) -> Option<PResult<'a, Self::Parsed>>;
}

macro_rules! impl_tuple {
    ($count:literal; $p0:ident $v0:ident; $($p:ident $idx:tt $v:ident);*) => {
        impl<'a, $p0: Parse<'a>, $($p: Parse<'a>),*> Sequence<'a> for ($p0, $($p,)*) {
            type Parsed = ($p0::Parsed, $($p::Parsed,)*);

            fn run_all(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
                let Success($v0, rem) = self.0.run(state, ctx)?;
                $(let Success($v, rem) = self.$idx.run(rem, ctx)?;)*
                Ok(Success(($v0, $($v,)*), rem))
            }
        }

        impl<'a, $p0: Parse<'a>, $($p: Parse<'a, Parsed = $p0::Parsed>),*> Alternatives<'a>
            for ($p0, $($p,)*)
        {
            type Parsed = $p0::Parsed;

            fn count(&self) -> usize {
                $count
            }

            fn attempt(
                &self,
                index: usize,
                state: State<'a>,
                ctx: &mut Context,
            ) -> Option<PResult<'a, Self::Parsed>> {
                match index {
                    0 => Some(self.0.run(state, ctx)),
                    $($idx => Some(self.$idx.run(state, ctx)),)*
                    _ => None,
                }
            }
        }
    };
}

impl_tuple!(1; P0 v0;);
impl_tuple!(2; P0 v0; P1 1 v1);
impl_tuple!(3; P0 v0; P1 1 v1; P2 2 v2);
impl_tuple!(4; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3);
impl_tuple!(5; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4);
impl_tuple!(6; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4; P5 5 v5);
impl_tuple!(7; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4; P5 5 v5; P6 6 v6);
impl_tuple!(8; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4; P5 5 v5; P6 6 v6; P7 7 v7);
impl_tuple!(9; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4; P5 5 v5; P6 6 v6; P7 7 v7; P8 8 v8);
impl_tuple!(10; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4; P5 5 v5; P6 6 v6; P7 7 v7; P8 8 v8; P9 9 v9);
impl_tuple!(11; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4; P5 5 v5; P6 6 v6; P7 7 v7; P8 8 v8; P9 9 v9; P10 10 v10);
impl_tuple!(12; P0 v0; P1 1 v1; P2 2 v2; P3 3 v3; P4 4 v4; P5 5 v5; P6 6 v6; P7 7 v7; P8 8 v8; P9 9 v9; P10 10 v10; P11 11 v11);

impl<'a, P: Parse<'a>> Sequence<'a> for Vec<P> {
    type Parsed = Vec<P::Parsed>;

    fn run_all(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        let mut values = Vec::with_capacity(self.len());
        let mut rem = state;
        for parser in self {
            let Success(val, next) = parser.run(rem, ctx)?;
            values.push(val);
            rem = next;
        }
        Ok(Success(values, rem))
    }
}

impl<'a, P: Parse<'a>> Alternatives<'a> for [P] {
    type Parsed = P::Parsed;

    fn count(&self) -> usize {
        self.len()
    }

    fn attempt(
        &self,
        index: usize,
        state: State<'a>,
        ctx: &mut Context,
    ) -> Option<PResult<'a, P::Parsed>> {
        self.get(index).map(|parser| parser.run(state, ctx))
    }
}

impl<'a, P: Parse<'a>, const N: usize> Alternatives<'a> for [P; N] {
    type Parsed = P::Parsed;

    fn count(&self) -> usize {
        N
    }

    fn attempt(
        &self,
        index: usize,
        state: State<'a>,
        ctx: &mut Context,
    ) -> Option<PResult<'a, P::Parsed>> {
        self.as_slice().attempt(index, state, ctx)
    }
}

impl<'a, P: Parse<'a>> Alternatives<'a> for Vec<P> {
    type Parsed = P::Parsed;

    fn count(&self) -> usize {
        self.len()
    }

    fn attempt(
        &self,
        index: usize,
        state: State<'a>,
        ctx: &mut Context,
    ) -> Option<PResult<'a, P::Parsed>> {
        self.as_slice().attempt(index, state, ctx)
    }
}

#[derive(Debug, Clone)]
struct SequenceParser<S>(S);

impl<'a, S: Sequence<'a>> Parse<'a> for SequenceParser<S> {
    type Parsed = S::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, S::Parsed> {
        self.0.run_all(state, ctx)
    }
}

/// Creates a parser that applies each of `parsers` in order.
///
/// The first failure ends the sequence and is returned as is. To build a
/// value other than the tuple, follow up with [`Parse::map`].
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let assignment = sequence((regex("[a-z]+").unwrap(), verbatim("="), regex("[0-9]+").unwrap()))
///     .map(|(name, _, value)| (name, value.parse::<u32>().unwrap_or_default()));
/// assert_eq!(assignment.parse("x=42"), Ok(("x", 42)));
/// ```
#[inline]
pub const fn sequence<'a, S: Sequence<'a>>(parsers: S) -> impl Parse<'a, Parsed = S::Parsed> {
    SequenceParser(parsers)
}

#[derive(Debug, Clone)]
struct ChoiceParser<A>(A);

impl<'a, A: Alternatives<'a>> Parse<'a> for ChoiceParser<A> {
    type Parsed = A::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, A::Parsed> {
        let mut furthest: Option<Error> = None;
        for index in 0..self.0.count() {
            let Some(outcome) = self.0.attempt(index, state, ctx) else {
                break;
            };
            match outcome {
                Ok(succ) => return Ok(succ),
                Err(fail) if fail.is_fatal() || fail.is_committed(&state) => return Err(fail),
                Err(Failure(err, _)) => {
                    furthest = Some(match furthest {
                        Some(prev) => prev.merge(err),
                        None => err,
                    });
                }
            }
        }
        let err = furthest.unwrap_or_else(|| Error::expected("an alternative", &state));
        Err(Failure(err, state))
    }
}

/// Creates a parser that returns the result of the first alternative that
/// succeeds.
///
/// Alternatives are tried in order from the same start. An alternative that
/// fails after consuming input, or fails fatally, ends the choice with its
/// failure. When every alternative fails without consuming input, the error
/// that reached furthest into the input is reported; alternatives failing at
/// the same furthest position are all listed.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let animal = choice((verbatim("cat"), verbatim("car")));
/// assert_eq!(animal.parse("car"), Ok("car"));
/// assert_eq!(
///     animal.parse("cab").unwrap_err().to_string(),
///     "Parse error at Line 1, Col 3: Expected \"cat\" or \"car\" but found 'b'",
/// );
/// ```
#[inline]
pub const fn choice<'a, A: Alternatives<'a>>(alternatives: A) -> impl Parse<'a, Parsed = A::Parsed> {
    ChoiceParser(alternatives)
}

#[derive(Debug, Clone)]
struct SepByParser<P, S> {
    item: P,
    sep: S,
    required: bool,
}

impl<'a, P: Parse<'a>, S: Parse<'a>> Parse<'a> for SepByParser<P, S> {
    type Parsed = Vec<P::Parsed>;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        let mut values = Vec::new();
        let rem = match self.item.run(state, ctx) {
            Ok(Success(val, rem)) => {
                values.push(val);
                rem
            }
            Err(fail) if self.required || fail.is_fatal() => return Err(fail),
            Err(_) => return Ok(Success(values, state)),
        };
        let rest = prefix(as_ref(&self.sep), as_ref(&self.item));
        let rem = repeat(&rest, rem, ctx, &mut values)?;
        Ok(Success(values, rem))
    }
}

/// Creates a parser for zero or more `item`s separated by `sep`.
///
/// Never fails with a syntax error. A trailing separator that is not followed
/// by an item is left unconsumed.
#[inline]
pub const fn sep_by<'a, P, S>(item: P, sep: S) -> impl Parse<'a, Parsed = Vec<P::Parsed>>
where
    P: Parse<'a>,
    S: Parse<'a>,
{
    SepByParser {
        item,
        sep,
        required: false,
    }
}

/// Creates a parser for one or more `item`s separated by `sep`.
#[inline]
pub const fn sep_by1<'a, P, S>(item: P, sep: S) -> impl Parse<'a, Parsed = Vec<P::Parsed>>
where
    P: Parse<'a>,
    S: Parse<'a>,
{
    SepByParser {
        item,
        sep,
        required: true,
    }
}

/// Creates a parser for `content` enclosed by `left` and `right`, keeping
/// only the value of `content`.
#[inline]
pub const fn between<'a, L, C, R>(left: L, content: C, right: R) -> impl Parse<'a, Parsed = C::Parsed>
where
    L: Parse<'a>,
    C: Parse<'a>,
    R: Parse<'a>,
{
    prefix(left, suffix(content, right))
}

#[derive(Debug, Clone)]
struct LabelParser<P> {
    parser: P,
    name: String,
    nested: bool,
}

impl<'a, P: Parse<'a>> Parse<'a> for LabelParser<P> {
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        match self.parser.run(state, ctx) {
            Ok(succ) => Ok(succ),
            Err(fail) if fail.is_fatal() => Err(fail),
            Err(Failure(err, rem)) if self.nested => {
                let expected = format!("{} > {}", self.name, err.expected_message());
                Err(Failure(err.with_expected(expected), rem))
            }
            Err(Failure(err, rem)) if rem.index() == state.index() => {
                Err(Failure(err.with_expected(self.name.clone()).at(&state), rem))
            }
            Err(Failure(err, rem)) => Err(Failure(err.with_expected(self.name.clone()), rem)),
        }
    }
}

/// Creates a parser that reports `name` as the expected input when `parser`
/// fails.
///
/// A failure that consumed no input is reported at the start of `parser`.
/// Consumption is never altered.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let keyword = label(choice((verbatim("if"), verbatim("while"))), "a keyword");
/// assert_eq!(
///     keyword.parse("for").unwrap_err().to_string(),
///     "Parse error at Line 1, Col 1: Expected a keyword but found 'f'",
/// );
/// ```
#[inline]
pub fn label<'a, P: Parse<'a>>(parser: P, name: impl Into<String>) -> impl Parse<'a, Parsed = P::Parsed> {
    LabelParser {
        parser,
        name: name.into(),
        nested: false,
    }
}

/// Creates a parser whose failures name the rule they occurred in.
///
/// The expected message becomes `"{name} > {message}"`. Nested contexts build
/// up a path from the outermost rule inwards.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let call = context(sequence((verbatim("f"), verbatim("("), verbatim(")"))), "call");
/// assert_eq!(
///     call.parse("f(]").unwrap_err().to_string(),
///     "Parse error at Line 1, Col 3: Expected call > \")\" but found ']'",
/// );
/// ```
#[inline]
pub fn context<'a, P: Parse<'a>>(parser: P, name: impl Into<String>) -> impl Parse<'a, Parsed = P::Parsed> {
    LabelParser {
        parser,
        name: name.into(),
        nested: true,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::basic::{either, verbatim, whitespace};
    use pretty_assertions::assert_eq;

    #[test]
    fn sequence_threads_state() {
        let p = sequence((verbatim("a"), verbatim("b"), verbatim("c")));
        assert_eq!(p.parse("abc"), Ok(("a", "b", "c")));
        let err = p.parse("abx").unwrap_err();
        assert_eq!(err.index(), 2);
    }

    #[test]
    fn sequence_of_vec() {
        let p = sequence(vec![verbatim("x"), verbatim("y")]);
        assert_eq!(p.parse("xy"), Ok(vec!["x", "y"]));
        let empty: Vec<crate::Parser<'_, ()>> = Vec::new();
        assert_eq!(sequence(empty).parse(""), Ok(vec![]));
    }

    #[test]
    fn sequence_failure_commits() {
        let mut ctx = Context::new();
        let Failure(_, rem) = sequence((verbatim("a"), verbatim("b")))
            .run(State::new("ax"), &mut ctx)
            .unwrap_err();
        assert_eq!(rem.index(), 1);
    }

    #[test]
    fn or_does_not_backtrack_committed() {
        let p = either(sequence((verbatim("ab"), verbatim("x"))).slice(), verbatim("aby"));
        assert!(p.parse("aby").is_err());
    }

    #[test]
    fn choice_reports_furthest_failure() {
        let p = choice((verbatim("cat"), verbatim("car")));
        let mut ctx = Context::new();
        let Failure(err, rem) = p.run(State::new("cab"), &mut ctx).unwrap_err();
        assert_eq!(rem.index(), 0);
        assert_eq!(err.position(), 2);
        assert_eq!(err.expected_message(), "\"cat\" or \"car\"");
    }

    #[test]
    fn choice_prefers_further_alternative() {
        let p = choice([verbatim("dog"), verbatim("cab"), verbatim("cat")]);
        let err = p.parse("cap").unwrap_err();
        assert_eq!(
            err,
            crate::ParseError::Syntax {
                location: crate::Location { line: 1, column: 3 },
                index: 2,
                expected: String::from("\"cab\" or \"cat\""),
                found: String::from("'p'"),
            }
        );
    }

    #[test]
    fn choice_stops_at_committed_failure() {
        let p = choice((
            sequence((verbatim("a"), verbatim("b"))).slice(),
            verbatim("ac"),
        ));
        assert!(p.parse("ac").is_err());
        assert_eq!(p.parse("ab"), Ok("ab"));
    }

    #[test]
    fn choice_over_vec() {
        let words = vec!["red", "green", "blue"];
        let p = choice(words.into_iter().map(verbatim).collect::<Vec<_>>());
        assert_eq!(p.parse("green"), Ok("green"));
        assert!(p.parse("pink").is_err());
    }

    #[test]
    fn sep_by_lists() {
        let p = sep_by(verbatim("x"), verbatim(","));
        assert_eq!(p.parse(""), Ok(vec![]));
        assert_eq!(p.parse("x,x,x"), Ok(vec!["x", "x", "x"]));
        assert_eq!(p.parse_prefix("x,x,"), Ok((vec!["x", "x"], ",")));
        assert!(sep_by1(verbatim("x"), verbatim(",")).parse("").is_err());
        assert_eq!(sep_by1(verbatim("x"), verbatim(",")).parse("x"), Ok(vec!["x"]));
    }

    #[test]
    fn between_keeps_content() {
        let p = between(verbatim("("), prefix(whitespace, verbatim("x")), verbatim(")"));
        assert_eq!(p.parse("( x)"), Ok("x"));
    }

    #[test]
    fn label_reanchors_uncommitted() {
        let p = label(verbatim("cat"), "animal");
        let err = p.parse("cab").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at Line 1, Col 1: Expected animal but found 'c'"
        );
    }

    #[test]
    fn label_keeps_committed_position() {
        let p = label(sequence((verbatim("a"), verbatim("b"))), "ab pair");
        let mut ctx = Context::new();
        let Failure(err, rem) = p.run(State::new("ax"), &mut ctx).unwrap_err();
        assert_eq!(rem.index(), 1);
        assert_eq!(err.position(), 1);
        assert_eq!(err.expected_message(), "ab pair");
    }

    #[test]
    fn nested_context() {
        let inner = context(verbatim("x"), "inner");
        let outer = context(prefix(verbatim("("), inner), "outer");
        let err = outer.parse("(y").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at Line 1, Col 2: Expected outer > inner > \"x\" but found 'y'"
        );
    }
}
