//! Primitive parsers and the core combinators.
//!
//! Everything else in `parsnip` is assembled from the building blocks in this
//! module. Most functions that take a parser and return a transformed parser
//! are also available as methods on the [`Parse`] trait.
//!
//! Two rules apply to every combinator here:
//!
//! * A failure whose state is still at the start position did not consume
//!   input and may be backtracked over. A failure whose state moved forward is
//!   *committed*: alternatives are not tried and the failure propagates.
//! * Fatal failures (see [`ErrorKind::InfiniteLoop`](crate::ErrorKind)) always
//!   propagate.

use crate::{Context, Error, Failure, PResult, PResultExt, Parse, Span, State, Success};
use core::marker::PhantomData;

#[derive(Debug, Clone)]
struct SucceedParser<T: Clone>(T);

impl<'a, T: Clone> Parse<'a> for SucceedParser<T> {
    type Parsed = T;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, T> {
        Ok(Success(self.0.clone(), state))
    }
}

/// Creates a parser that always succeeds with `value`, consuming nothing.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// assert_eq!(succeed(42).parse(""), Ok(42));
/// ```
#[inline]
pub const fn succeed<'a, T: Clone>(value: T) -> impl Parse<'a, Parsed = T> {
    SucceedParser(value)
}

#[derive(Debug, Clone)]
struct FailParser<T>(String, PhantomData<fn() -> T>);

impl<'a, T> Parse<'a> for FailParser<T> {
    type Parsed = T;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, T> {
        Err(Failure(Error::expected(self.0.clone(), &state), state))
    }
}

/// Creates a parser that always fails, expecting `expected`.
#[inline]
pub fn fail<'a, T>(expected: impl Into<String>) -> impl Parse<'a, Parsed = T> {
    FailParser(expected.into(), PhantomData)
}

#[derive(Debug, Clone)]
struct VerbatimParser<P: AsRef<str>>(P);

impl<'a, P: AsRef<str>> Parse<'a> for VerbatimParser<P> {
    type Parsed = &'a str;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, &'a str> {
        let pattern = self.0.as_ref();
        let rest = state.rest();
        if rest.starts_with(pattern) {
            return Ok(Success(&rest[..pattern.len()], state.advance(pattern.len())));
        }
        let matched: usize = rest
            .chars()
            .zip(pattern.chars())
            .take_while(|(found, expected)| found == expected)
            .map(|(found, _)| found.len_utf8())
            .sum();
        let err = Error::expected(format!("{pattern:?}"), &state.advance(matched));
        Err(Failure(err, state))
    }
}

/// Creates a parser that matches the literal text `pattern`.
///
/// On a mismatch nothing is consumed, but the error points at the first
/// character that differs.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// assert_eq!(verbatim("let").parse("let"), Ok("let"));
/// let err = verbatim("let").parse("lex").unwrap_err();
/// assert_eq!(err.to_string(), "Parse error at Line 1, Col 3: Expected \"let\" but found 'x'");
/// ```
#[inline]
pub const fn verbatim<'a, P: AsRef<str>>(pattern: P) -> impl Parse<'a, Parsed = &'a str> {
    VerbatimParser(pattern)
}

#[derive(Debug, Clone)]
struct RegexParser {
    regex: regex::Regex,
    source: String,
}

impl<'a> Parse<'a> for RegexParser {
    type Parsed = &'a str;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, &'a str> {
        match self.regex.find(state.rest()) {
            Some(m) if m.start() == 0 => Ok(Success(m.as_str(), state.advance(m.end()))),
            _ => Err(Failure(
                Error::expected(format!("/{}/", self.source), &state),
                state,
            )),
        }
    }
}

/// Creates a parser matching the regular expression `pattern` at the current
/// position.
///
/// The pattern is anchored: it only matches text starting exactly at the
/// current position. An invalid pattern is reported when the parser is built.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let number = regex(r"[0-9]+").unwrap();
/// assert_eq!(number.parse("123"), Ok("123"));
/// assert!(number.parse("x1").is_err());
/// ```
pub fn regex<'a>(pattern: &str) -> Result<impl Parse<'a, Parsed = &'a str>, regex::Error> {
    let regex = regex::Regex::new(&format!("^(?:{pattern})"))?;
    Ok(RegexParser {
        regex,
        source: pattern.to_owned(),
    })
}

/// Parses any single character.
pub fn any_char<'a>(state: State<'a>, _ctx: &mut Context) -> PResult<'a, char> {
    match state.peek() {
        Some(ch) => Ok(Success(ch, state.advance(ch.len_utf8()))),
        None => Err(Failure(Error::expected("any character", &state), state)),
    }
}

/// Succeeds, consuming nothing, only at the end of the input.
pub fn eof<'a>(state: State<'a>, _ctx: &mut Context) -> PResult<'a, ()> {
    if state.is_at_end() {
        Ok(Success((), state))
    } else {
        Err(Failure(Error::expected("end of input", &state), state))
    }
}

/// Consumes zero or more whitespace characters.
pub fn whitespace<'a>(state: State<'a>, _ctx: &mut Context) -> PResult<'a, &'a str> {
    let rest = state.rest();
    let len = rest.len() - rest.trim_start().len();
    Ok(Success(&rest[..len], state.advance(len)))
}

#[derive(Debug, Clone)]
struct SatisfyParser<F: Fn(char) -> bool>(F, &'static str);

impl<'a, F: Fn(char) -> bool> Parse<'a> for SatisfyParser<F> {
    type Parsed = char;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, char> {
        match state.peek() {
            Some(ch) if (self.0)(ch) => Ok(Success(ch, state.advance(ch.len_utf8()))),
            _ => Err(Failure(Error::expected(self.1, &state), state)),
        }
    }
}

/// Creates a parser for one character accepted by `pred`.
///
/// `expected` describes the accepted characters in error messages.
#[inline]
pub const fn satisfy<'a, F>(expected: &'static str, pred: F) -> impl Parse<'a, Parsed = char>
where
    F: Fn(char) -> bool,
{
    SatisfyParser(pred, expected)
}

#[derive(Debug, Clone)]
struct OneOfParser<S: AsRef<str>>(S, bool);

impl<'a, S: AsRef<str>> Parse<'a> for OneOfParser<S> {
    type Parsed = char;

    fn run(&self, state: State<'a>, _ctx: &mut Context) -> PResult<'a, char> {
        let set = self.0.as_ref();
        match state.peek() {
            Some(ch) if set.contains(ch) == self.1 => Ok(Success(ch, state.advance(ch.len_utf8()))),
            _ => {
                let expected = if self.1 {
                    format!("one of {set:?}")
                } else {
                    format!("none of {set:?}")
                };
                Err(Failure(Error::expected(expected, &state), state))
            }
        }
    }
}

/// Creates a parser for one character contained in `set`.
#[inline]
pub const fn one_of<'a, S: AsRef<str>>(set: S) -> impl Parse<'a, Parsed = char> {
    OneOfParser(set, true)
}

/// Creates a parser for one character not contained in `set`.
#[inline]
pub const fn none_of<'a, S: AsRef<str>>(set: S) -> impl Parse<'a, Parsed = char> {
    OneOfParser(set, false)
}

#[derive(Debug, Clone)]
struct MapParser<P, F>(P, F);

impl<'a, P, F, R> Parse<'a> for MapParser<P, F>
where
    P: Parse<'a>,
    F: Fn(P::Parsed) -> R,
{
    type Parsed = R;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, R> {
        self.0.run(state, ctx).map_parsed(&self.1)
    }
}

/// Creates a parser whose parsed value is transformed by `map_fn`.
///
/// Failures pass through unchanged.
#[inline]
pub const fn map<'a, P, F, R>(parser: P, map_fn: F) -> impl Parse<'a, Parsed = R>
where
    P: Parse<'a>,
    F: Fn(P::Parsed) -> R,
{
    MapParser(parser, map_fn)
}

#[derive(Debug, Clone)]
struct TryMapParser<P, F>(P, F);

impl<'a, P, F, R, S> Parse<'a> for TryMapParser<P, F>
where
    P: Parse<'a>,
    F: Fn(P::Parsed) -> Result<R, S>,
    S: Into<String>,
{
    type Parsed = R;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, R> {
        let Success(val, rem) = self.0.run(state, ctx)?;
        match (self.1)(val) {
            Ok(val) => Ok(Success(val, rem)),
            Err(expected) => Err(Failure(Error::expected(expected, &state), state)),
        }
    }
}

/// Creates a parser whose parsed value is fallibly transformed by `map_fn`.
///
/// When `map_fn` returns `Err(expected)`, the parser fails at its start
/// position without consuming input, reporting `expected`.
#[inline]
pub const fn try_map<'a, P, F, R, S>(parser: P, map_fn: F) -> impl Parse<'a, Parsed = R>
where
    P: Parse<'a>,
    F: Fn(P::Parsed) -> Result<R, S>,
    S: Into<String>,
{
    TryMapParser(parser, map_fn)
}

#[derive(Debug, Clone)]
struct WithValueParser<P, T: Clone>(P, T);

impl<'a, P: Parse<'a>, T: Clone> Parse<'a> for WithValueParser<P, T> {
    type Parsed = T;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, T> {
        self.0.run(state, ctx).map_parsed(|_| self.1.clone())
    }
}

/// Creates a parser that replaces the parsed value of `parser` with `value`.
#[inline]
pub const fn with_value<'a, P, T>(parser: P, value: T) -> impl Parse<'a, Parsed = T>
where
    P: Parse<'a>,
    T: Clone,
{
    WithValueParser(parser, value)
}

#[derive(Debug, Clone)]
struct FlatMapParser<P, C>(P, C);

impl<'a, P, C, R> Parse<'a> for FlatMapParser<P, C>
where
    P: Parse<'a>,
    C: Fn(P::Parsed) -> R,
    R: Parse<'a>,
{
    type Parsed = R::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, R::Parsed> {
        let Success(val, rem) = self.0.run(state, ctx)?;
        (self.1)(val).run(rem, ctx)
    }
}

/// Maps the parsed value of `parser` onto a new parser, which then parses the
/// remaining input.
///
/// This is the monadic "chain" operation. Every sequencing combinator could be
/// written in terms of it.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// // A digit giving the number of `x` characters that follow.
/// let counted = satisfy("a digit", |ch| ch.is_ascii_digit())
///     .map(|ch| ch as usize - '0' as usize)
///     .flat_map(|n| verbatim("x").many().verify(move |xs| xs.len() == n));
/// assert_eq!(counted.parse("3xxx"), Ok(vec!["x", "x", "x"]));
/// assert!(counted.parse("3xx").is_err());
/// ```
#[inline]
pub const fn flat_map<'a, P, C, R>(parser: P, combinator: C) -> impl Parse<'a, Parsed = R::Parsed>
where
    P: Parse<'a>,
    C: Fn(P::Parsed) -> R,
    R: Parse<'a>,
{
    FlatMapParser(parser, combinator)
}

/// Applies `parser` repeatedly from `state`, pushing values into `values`.
///
/// Returns the state after the last success. A success that does not advance
/// is reported as the fatal infinite-loop failure.
pub(crate) fn repeat<'a, P>(
    parser: &P,
    mut state: State<'a>,
    ctx: &mut Context,
    values: &mut Vec<P::Parsed>,
) -> Result<State<'a>, Failure<'a>>
where
    P: Parse<'a>,
{
    loop {
        match parser.run(state, ctx) {
            Ok(Success(val, rem)) => {
                if rem.index() == state.index() {
                    tracing::debug!(index = state.index(), "repetition made no progress");
                    return Err(Failure(Error::infinite_loop(&state), state));
                }
                values.push(val);
                state = rem;
            }
            Err(fail) if fail.is_fatal() => return Err(fail),
            Err(_) => return Ok(state),
        }
    }
}

#[derive(Debug, Clone)]
struct ManyParser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for ManyParser<P> {
    type Parsed = Vec<P::Parsed>;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        let mut values = Vec::new();
        let rem = repeat(&self.0, state, ctx, &mut values)?;
        Ok(Success(values, rem))
    }
}

/// Creates a parser that applies `parser` zero or more times.
///
/// The first failure ends the repetition and the values collected so far are
/// returned; the repetition itself never fails with a syntax error. If
/// `parser` succeeds without consuming input, the repetition fails with the
/// fatal infinite-loop error instead of spinning forever.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// assert_eq!(verbatim("a").many().parse("aaa"), Ok(vec!["a", "a", "a"]));
/// assert_eq!(verbatim("a").many().parse(""), Ok(vec![]));
/// assert!(succeed(1).many().parse("").unwrap_err().is_infinite_loop());
/// ```
#[inline]
pub const fn many<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = Vec<P::Parsed>> {
    ManyParser(parser)
}

#[derive(Debug, Clone)]
struct Many1Parser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for Many1Parser<P> {
    type Parsed = Vec<P::Parsed>;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        let Success(first, rem) = self.0.run(state, ctx)?;
        let mut values = vec![first];
        let rem = repeat(&self.0, rem, ctx, &mut values)?;
        Ok(Success(values, rem))
    }
}

/// Creates a parser that applies `parser` one or more times.
///
/// The first application must succeed; the rest behave like [`many`].
#[inline]
pub const fn many1<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = Vec<P::Parsed>> {
    Many1Parser(parser)
}

#[derive(Debug, Clone)]
struct EitherParser<P, Q>(P, Q);

impl<'a, P, Q> Parse<'a> for EitherParser<P, Q>
where
    P: Parse<'a>,
    Q: Parse<'a, Parsed = P::Parsed>,
{
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        let first = match self.0.run(state, ctx) {
            Ok(succ) => return Ok(succ),
            Err(fail) if fail.is_fatal() || fail.is_committed(&state) => return Err(fail),
            Err(Failure(err, _)) => err,
        };
        match self.1.run(state, ctx) {
            Ok(succ) => Ok(succ),
            Err(fail) if fail.is_fatal() || fail.is_committed(&state) => Err(fail),
            Err(Failure(err, rem)) => Err(Failure(first.merge(err), rem)),
        }
    }
}

/// Creates a parser that tries `first`, then `second` at the same position.
///
/// `second` is only tried when `first` failed without consuming input. Once
/// `first` has consumed input its failure is committed and returned as is.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let p = either(sequence((verbatim("ab"), verbatim("x"))).slice(), verbatim("aby"));
/// // `ab` was consumed before `x` failed, so `aby` is never tried.
/// assert!(p.parse("aby").is_err());
/// assert_eq!(p.parse("abx"), Ok("abx"));
/// ```
#[inline]
pub const fn either<'a, P, Q>(first: P, second: Q) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    Q: Parse<'a, Parsed = P::Parsed>,
{
    EitherParser(first, second)
}

#[derive(Debug, Clone)]
struct OptParser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for OptParser<P> {
    type Parsed = Option<P::Parsed>;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        match self.0.run(state, ctx) {
            Ok(succ) => Ok(succ.map(Some)),
            Err(fail) if fail.is_fatal() || fail.is_committed(&state) => Err(fail),
            Err(_) => Ok(Success(None, state)),
        }
    }
}

/// Creates a parser that turns an uncommitted failure of `parser` into `None`.
#[inline]
pub const fn opt<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = Option<P::Parsed>> {
    OptParser(parser)
}

#[derive(Debug, Clone)]
struct PairParser<P, Q>(P, Q);

impl<'a, P: Parse<'a>, Q: Parse<'a>> Parse<'a> for PairParser<P, Q> {
    type Parsed = (P::Parsed, Q::Parsed);

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        let Success(first, rem) = self.0.run(state, ctx)?;
        let Success(second, rem) = self.1.run(rem, ctx)?;
        Ok(Success((first, second), rem))
    }
}

/// Creates a parser that applies `first` then `second`, keeping both values.
#[inline]
pub const fn pair<'a, P, Q>(first: P, second: Q) -> impl Parse<'a, Parsed = (P::Parsed, Q::Parsed)>
where
    P: Parse<'a>,
    Q: Parse<'a>,
{
    PairParser(first, second)
}

#[derive(Debug, Clone)]
struct PrefixParser<P, Q>(P, Q);

impl<'a, P: Parse<'a>, Q: Parse<'a>> Parse<'a> for PrefixParser<P, Q> {
    type Parsed = Q::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Q::Parsed> {
        let Success(_, rem) = self.0.run(state, ctx)?;
        self.1.run(rem, ctx)
    }
}

/// Creates a parser that applies `prefix` then `parser`, keeping the value of
/// `parser`.
#[inline]
pub const fn prefix<'a, P, Q>(prefix: P, parser: Q) -> impl Parse<'a, Parsed = Q::Parsed>
where
    P: Parse<'a>,
    Q: Parse<'a>,
{
    PrefixParser(prefix, parser)
}

#[derive(Debug, Clone)]
struct SuffixParser<P, Q>(P, Q);

impl<'a, P: Parse<'a>, Q: Parse<'a>> Parse<'a> for SuffixParser<P, Q> {
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        let Success(val, rem) = self.0.run(state, ctx)?;
        let Success(_, rem) = self.1.run(rem, ctx)?;
        Ok(Success(val, rem))
    }
}

/// Creates a parser that applies `parser` then `suffix`, keeping the value of
/// `parser`.
#[inline]
pub const fn suffix<'a, P, Q>(parser: P, suffix: Q) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    Q: Parse<'a>,
{
    SuffixParser(parser, suffix)
}

#[derive(Debug, Clone)]
struct VerifyParser<P, F>(P, F);

impl<'a, P, F> Parse<'a> for VerifyParser<P, F>
where
    P: Parse<'a>,
    F: Fn(&P::Parsed) -> bool,
{
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        match self.0.run(state, ctx)? {
            Success(val, rem) if (self.1)(&val) => Ok(Success(val, rem)),
            Success(..) => Err(Failure(Error::expected("valid input", &state), state)),
        }
    }
}

/// Creates a parser that fails, without consuming input, when `verify_fn`
/// rejects the parsed value.
#[inline]
pub const fn verify<'a, P, F>(parser: P, verify_fn: F) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    F: Fn(&P::Parsed) -> bool,
{
    VerifyParser(parser, verify_fn)
}

#[derive(Debug, Clone)]
struct NotParser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for NotParser<P> {
    type Parsed = ();

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, ()> {
        match self.0.run(state, ctx) {
            Ok(Success(_, rem)) => {
                let expected = format!("anything but {:?}", state.slice_to(&rem));
                Err(Failure(Error::expected(expected, &state), state))
            }
            Err(fail) if fail.is_fatal() => Err(fail),
            Err(_) => Ok(Success((), state)),
        }
    }
}

/// Creates a parser that succeeds, consuming nothing, only where `parser`
/// fails.
#[inline]
pub const fn not<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = ()> {
    NotParser(parser)
}

#[derive(Debug, Clone)]
struct PeekParser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for PeekParser<P> {
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        match self.0.run(state, ctx) {
            Ok(Success(val, _)) => Ok(Success(val, state)),
            Err(Failure(err, _)) => Err(Failure(err, state)),
        }
    }
}

/// Creates a parser that applies `parser` without consuming any input.
#[inline]
pub const fn peek<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = P::Parsed> {
    PeekParser(parser)
}

#[derive(Debug, Clone)]
struct SliceParser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for SliceParser<P> {
    type Parsed = &'a str;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, &'a str> {
        let Success(_, rem) = self.0.run(state, ctx)?;
        Ok(Success(state.slice_to(&rem), rem))
    }
}

/// Creates a parser that returns the text consumed by `parser` instead of its
/// value.
#[inline]
pub const fn slice<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = &'a str> {
    SliceParser(parser)
}

#[derive(Debug, Clone)]
struct SpannedParser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for SpannedParser<P> {
    type Parsed = (P::Parsed, Span<'a>);

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed> {
        let Success(val, rem) = self.0.run(state, ctx)?;
        Ok(Success((val, Span::new(state, rem)), rem))
    }
}

/// Creates a parser that pairs the value of `parser` with the [`Span`] it
/// consumed.
#[inline]
pub const fn spanned<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = (P::Parsed, Span<'a>)> {
    SpannedParser(parser)
}

#[derive(Debug, Clone)]
struct RecognizeParser<P>(P);

impl<'a, P: Parse<'a>> Parse<'a> for RecognizeParser<P> {
    type Parsed = Span<'a>;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Span<'a>> {
        let Success(_, rem) = self.0.run(state, ctx)?;
        Ok(Success(Span::new(state, rem), rem))
    }
}

/// Creates a parser that returns the [`Span`] consumed by `parser`.
#[inline]
pub const fn recognize<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = Span<'a>> {
    RecognizeParser(parser)
}

#[derive(Debug)]
struct AsRefParser<'p, P>(&'p P);

impl<'a, P: Parse<'a>> Parse<'a> for AsRefParser<'_, P> {
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        self.0.run(state, ctx)
    }
}

/// Creates a parser that borrows `parser` instead of taking ownership.
#[inline]
pub const fn as_ref<'a, 'p, P: Parse<'a>>(parser: &'p P) -> impl Parse<'a, Parsed = P::Parsed> + 'p {
    AsRefParser(parser)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sequence::sequence;
    use pretty_assertions::assert_eq;

    #[test]
    fn verbatim_reports_mismatch_inside_literal() {
        let mut ctx = Context::new();
        let state = State::new("cab");
        let Failure(err, rem) = verbatim("cat").run(state, &mut ctx).unwrap_err();
        assert_eq!(rem.index(), 0);
        assert_eq!(err.position(), 2);
        assert_eq!(err.found(), "'b'");
    }

    #[test]
    fn regex_is_anchored() {
        let word = regex("[a-z]+").unwrap();
        assert_eq!(word.parse_prefix("abc123"), Ok(("abc", "123")));
        assert!(word.parse("1abc").is_err());
        assert!(regex("(").is_err());
    }

    #[test]
    fn map_and_flat_map() {
        let digit = satisfy("a digit", |ch| ch.is_ascii_digit()).map(|ch| ch as u8 - b'0');
        assert_eq!(digit.parse("7"), Ok(7));
        let doubled = digit.flat_map(|n| succeed(n * 2));
        assert_eq!(doubled.parse("4"), Ok(8));
    }

    #[test]
    fn many_collects_and_guards() {
        assert_eq!(verbatim("a").many().parse("aaa"), Ok(vec!["a", "a", "a"]));
        assert_eq!(verbatim("a").many().parse(""), Ok(vec![]));
        assert!(whitespace.many().parse("  ").unwrap_err().is_infinite_loop());
        assert!(verbatim("a").many1().parse("").is_err());
        assert_eq!(verbatim("a").many1().parse("aa"), Ok(vec!["a", "a"]));
    }

    #[test]
    fn many_stops_before_committed_item() {
        let item = sequence((verbatim("a"), verbatim("b"))).slice();
        let Success(items, rem) = item
            .many()
            .run(State::new("ababa"), &mut Context::new())
            .unwrap();
        assert_eq!(items, vec!["ab", "ab"]);
        assert_eq!(rem.index(), 4);
    }

    #[test]
    fn either_commits_after_consuming() {
        let p = either(sequence((verbatim("ab"), verbatim("x"))).slice(), verbatim("aby"));
        assert!(p.parse("aby").is_err());
        let q = either(verbatim("abx"), verbatim("aby"));
        assert_eq!(q.parse("aby"), Ok("aby"));
    }

    #[test]
    fn either_merges_uncommitted_errors() {
        let p = either(verbatim("x"), verbatim("y"));
        let err = p.parse("z").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at Line 1, Col 1: Expected \"x\" or \"y\" but found 'z'"
        );
    }

    #[test]
    fn opt_and_keep() {
        assert_eq!(verbatim("a").opt().parse(""), Ok(None));
        assert_eq!(verbatim("a").opt().parse("a"), Ok(Some("a")));
        let p = verbatim("(").keep_right(verbatim("x")).keep_left(verbatim(")"));
        assert_eq!(p.parse("(x)"), Ok("x"));
    }

    #[test]
    fn slice_and_spans() {
        let p = verbatim("a").many1().slice();
        assert_eq!(p.parse_prefix("aaab"), Ok(("aaa", "b")));
        let span = verbatim("b").recognize().parse("b").unwrap();
        assert_eq!((span.start(), span.end(), span.as_str()), (0, 1, "b"));
    }

    #[test]
    fn lookahead() {
        assert_eq!(verbatim("a").peek().parse_prefix("ab"), Ok(("a", "ab")));
        assert_eq!(not(verbatim("b")).parse_prefix("ab"), Ok(((), "ab")));
        assert!(not(verbatim("a")).parse("ab").is_err());
        assert_eq!(eof.parse(""), Ok(()));
        assert!(eof.parse("x").is_err());
    }

    #[test]
    fn character_classes() {
        assert_eq!(one_of("+-").parse("-"), Ok('-'));
        assert!(one_of("+-").parse("*").is_err());
        assert_eq!(none_of("\"").parse("a"), Ok('a'));
        assert_eq!(any_char.parse("é"), Ok('é'));
        assert!(any_char.parse("").is_err());
    }

    #[test]
    fn try_map_fails_at_start() {
        let number = regex("[0-9]+")
            .unwrap()
            .try_map(|digits: &str| digits.parse::<u8>().map_err(|_| "a byte"));
        assert_eq!(number.parse("200"), Ok(200));
        let err = number.parse("300").unwrap_err();
        assert_eq!(err.index(), 0);
    }
}
