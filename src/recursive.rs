//! Support for recursive grammars.
//!
//! A rule that refers to itself can be written as a plain function, since a
//! function may call itself by name. When a rule is built as a value instead,
//! [`lazy`] breaks the construction cycle. [`memo`] adds packrat caching, and
//! [`left_recursive`] makes left-recursive rules terminate.

use crate::{Context, Error, Failure, PResult, Parse, Parser, ParserId, State, Success};
use std::cell::OnceCell;
use std::rc::{Rc, Weak};

struct LazyParser<F, P>(F, OnceCell<P>);

impl<'a, F, P> Parse<'a> for LazyParser<F, P>
where
    F: Fn() -> P,
    P: Parse<'a>,
{
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        self.1.get_or_init(&self.0).run(state, ctx)
    }
}

/// Creates a parser that calls `factory` to build the actual parser the first
/// time it runs.
///
/// The parser is built at most once, and only if it is ever run.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// // Nested parentheses, counting the depth.
/// fn parens<'a>() -> Parser<'a, usize> {
///     between(verbatim("("), lazy(parens), verbatim(")"))
///         .map(|depth| depth + 1)
///         .or(succeed(0))
///         .boxed()
/// }
///
/// assert_eq!(parens().parse("((()))"), Ok(3));
/// assert!(parens().parse("(()").is_err());
/// ```
#[inline]
pub const fn lazy<'a, F, P>(factory: F) -> impl Parse<'a, Parsed = P::Parsed>
where
    F: Fn() -> P,
    P: Parse<'a>,
{
    LazyParser(factory, OnceCell::new())
}

struct MemoParser<P> {
    parser: P,
    id: ParserId,
}

impl<'a, P> Parse<'a> for MemoParser<P>
where
    P: Parse<'a>,
    P::Parsed: Clone + 'static,
{
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        if let Some(outcome) = ctx.memo_get(self.id, &state) {
            ctx.record_hit();
            tracing::trace!(parser = self.id.as_u32(), index = state.index(), "packrat hit");
            return outcome;
        }
        ctx.record_miss();
        tracing::trace!(parser = self.id.as_u32(), index = state.index(), "packrat miss");
        let outcome = self.parser.run(state, ctx);
        ctx.memo_put(self.id, state.index(), &outcome);
        outcome
    }
}

/// Creates a parser that caches the outcome of `parser` per input position.
///
/// The first run at a position runs `parser` and stores its outcome, success
/// or failure, in the [`Context`]. Later runs at the same position return the
/// stored outcome. Caching is transparent: the memoized parser accepts the
/// same inputs and produces the same values as `parser`.
///
/// Values are cached by type, so they must be `Clone + 'static`; map borrowed
/// slices to owned values before memoizing them.
///
/// Outcomes are stored per parse. Every call to [`Parse::parse`] starts with an
/// empty cache, so a memoized parser can be reused across inputs.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// # use parsnip::{Context, ParseOptions};
/// let word = regex("[a-z]+").unwrap().map(String::from).memo();
/// let p = sequence((word.by_ref().peek(), word.by_ref()));
///
/// let mut ctx = Context::new();
/// let (peeked, parsed) = p.parse_in("hello", &mut ctx, ParseOptions::default()).unwrap();
/// assert_eq!((peeked.as_str(), parsed.as_str()), ("hello", "hello"));
/// assert_eq!(ctx.stats().memo_hits, 1);
/// ```
pub fn memo<'a, P>(parser: P) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    P::Parsed: Clone + 'static,
{
    MemoParser {
        parser,
        id: ParserId::fresh(),
    }
}

struct GrowParser<'a, T> {
    id: ParserId,
    body: Parser<'a, T>,
}

impl<'a, T: Clone + 'static> Parse<'a> for GrowParser<'a, T> {
    type Parsed = T;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, T> {
        if let Some(outcome) = ctx.memo_get(self.id, &state) {
            ctx.record_hit();
            return outcome;
        }
        ctx.record_miss();

        let start = state.index();
        let seed: PResult<'a, T> = Err(Failure(
            Error::expected("a non-left-recursive alternative", &state),
            state,
        ));
        ctx.seed_put(self.id, start, &seed);
        ctx.begin_growth();

        let mut accepted: Option<Success<'a, T>> = None;
        let outcome = loop {
            // Entries cached by the previous round saw a smaller seed.
            ctx.discard_growth_round();
            ctx.record_growth_round();
            match (self.body.run(state, ctx), accepted.take()) {
                (Err(fail), _) if fail.is_fatal() => break Err(fail),
                (Err(fail), None) => break Err(fail),
                (Err(_), Some(prev)) => break Ok(prev),
                (Ok(succ), Some(prev)) if succ.1.index() <= prev.1.index() => break Ok(prev),
                (Ok(succ), _) => {
                    tracing::debug!(
                        parser = self.id.as_u32(),
                        index = start,
                        end = succ.1.index(),
                        "left-recursive seed grew"
                    );
                    ctx.seed_put(self.id, start, &Ok(succ.clone()));
                    accepted = Some(succ);
                }
            }
        };
        ctx.end_growth();
        ctx.memo_put(self.id, start, &outcome);
        outcome
    }
}

struct SelfRef<'a, T>(Weak<GrowParser<'a, T>>);

impl<'a, T: Clone + 'static> Parse<'a> for SelfRef<'a, T> {
    type Parsed = T;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, T> {
        match self.0.upgrade() {
            Some(rule) => rule.run(state, ctx),
            None => Err(Failure(Error::expected("a live recursive rule", &state), state)),
        }
    }
}

/// Creates a parser for a left-recursive rule.
///
/// `build` receives a handle to the rule being defined and returns the rule's
/// body. The body may use the handle anywhere, including in leftmost position,
/// as in `expr = expr "+" term | term`.
///
/// The rule is evaluated by growing a seed. The rule's cache entry at the
/// current position starts out as a failure, so the first evaluation of the
/// body can only succeed through a non-recursive alternative. The body is then
/// evaluated again and again, with recursive references reading the result of
/// the previous round. A new result is accepted only if it ends strictly
/// further into the input than the previous one. Growth stops when the body
/// fails or makes no progress, and the last accepted result is returned. This
/// always terminates and yields the longest left-recursive parse.
///
/// Outcomes that other [`memo`] parsers cache while a round runs depend on the
/// seed of that round, so they are dropped before the next round starts.
///
/// The values of the rule must be `Clone + 'static`, since they are cached in
/// the [`Context`].
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let digit = satisfy("a digit", |ch| ch.is_ascii_digit())
///     .map(|ch| ch as i64 - '0' as i64)
///     .boxed();
/// let expr = left_recursive(|this| {
///     choice((
///         sequence((this, verbatim("-"), digit.clone())).map(|(lhs, _, rhs)| lhs - rhs),
///         digit.clone(),
///     ))
/// });
/// // Subtraction associates to the left.
/// assert_eq!(expr.parse("9-3-2"), Ok(4));
/// ```
pub fn left_recursive<'a, T, F, P>(build: F) -> Parser<'a, T>
where
    T: Clone + 'static,
    F: FnOnce(Parser<'a, T>) -> P,
    P: Parse<'a, Parsed = T> + 'a,
{
    let id = ParserId::fresh();
    let rule = Rc::new_cyclic(|weak: &Weak<GrowParser<'a, T>>| GrowParser {
        id,
        body: Parser::new(build(Parser::new(SelfRef(weak.clone())))),
    });
    Parser::from_rc(rule)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::basic::{either, one_of, satisfy, succeed, verbatim};
    use crate::sequence::{between, choice, sequence};
    use crate::ParseOptions;
    use core::cell::Cell;
    use pretty_assertions::assert_eq;

    fn number<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, i64> {
        satisfy("a digit", |ch| ch.is_ascii_digit())
            .map(|ch| i64::from(ch as u8 - b'0'))
            .run(state, ctx)
    }

    fn sum((lhs, op, rhs): (i64, char, i64)) -> i64 {
        if op == '+' {
            lhs + rhs
        } else {
            lhs - rhs
        }
    }

    fn expr<'a>() -> Parser<'a, i64> {
        left_recursive(|this| choice((sequence((this, one_of("+-"), number)).map(sum), number)))
    }

    fn memoized_expr<'a>() -> Parser<'a, i64> {
        left_recursive(|this| {
            choice((
                sequence((this, one_of("+-"), number)).map(sum).memo().boxed(),
                number.boxed(),
            ))
        })
    }

    fn parens<'a>() -> Parser<'a, usize> {
        either(
            between(verbatim("("), lazy(parens), verbatim(")")).map(|depth| depth + 1),
            succeed(0),
        )
        .boxed()
    }

    #[test]
    fn lazy_builds_once() {
        let built = Cell::new(0);
        let p = lazy(|| {
            built.set(built.get() + 1);
            verbatim("x")
        });
        assert_eq!(built.get(), 0);
        assert_eq!(p.parse("x"), Ok("x"));
        assert_eq!(p.parse("x"), Ok("x"));
        assert_eq!(built.get(), 1);
    }

    #[test]
    fn lazy_allows_self_reference() {
        assert_eq!(parens().parse("((()))"), Ok(3));
        assert_eq!(parens().parse(""), Ok(0));
        assert!(parens().parse("(()").is_err());
    }

    #[test]
    fn memo_hits_repeated_position() {
        let digit = satisfy("a digit", |ch| ch.is_ascii_digit()).memo();
        let p = sequence((digit.by_ref().peek(), digit.by_ref()));
        let mut ctx = Context::new();
        assert_eq!(p.parse_in("7", &mut ctx, ParseOptions::default()), Ok(('7', '7')));
        assert_eq!(ctx.stats().memo_hits, 1);
        assert_eq!(ctx.stats().memo_misses, 1);
    }

    #[test]
    fn memo_caches_failures() {
        let x = verbatim("x").memo();
        let p = either(x.by_ref(), x.by_ref());
        let mut ctx = Context::new();
        assert!(p.parse_in("y", &mut ctx, ParseOptions::default()).is_err());
        assert_eq!(ctx.stats().memo_hits, 1);
    }

    #[test]
    fn memo_is_scoped_per_parse() {
        let run = verbatim("a").many().map(|items| items.len()).memo();
        assert_eq!(run.parse("aa"), Ok(2));
        assert_eq!(run.parse("aaa"), Ok(3));
    }

    #[test]
    fn memo_is_transparent() {
        let plain = sequence((verbatim("a").many(), verbatim("b"))).map(|(run, _)| run.len());
        let cached = sequence((verbatim("a").many(), verbatim("b")))
            .map(|(run, _)| run.len())
            .memo();
        for input in ["b", "aab", "aa", "ba", ""] {
            assert_eq!(plain.parse(input), cached.parse(input));
        }
    }

    #[test]
    fn left_recursion_sums() {
        assert_eq!(expr().parse("1+2+3"), Ok(6));
        assert_eq!(expr().parse("7"), Ok(7));
    }

    #[test]
    fn left_recursion_associates_left() {
        assert_eq!(expr().parse("1-2-3"), Ok(-4));
    }

    #[test]
    fn left_recursion_keeps_longest_parse() {
        let err = expr().parse("1+").unwrap_err();
        assert!(err.is_incomplete());
        assert_eq!(err.index(), 1);
        assert!(expr().parse("").is_err());
    }

    #[test]
    fn memo_is_transparent_inside_left_recursion() {
        for input in ["1+2+3", "1-2-3", "7", "1+", "+1", ""] {
            assert_eq!(memoized_expr().parse(input), expr().parse(input));
        }
        assert_eq!(memoized_expr().parse("1+2+3"), Ok(6));
    }

    #[test]
    fn nested_left_recursion_at_same_start() {
        let product = left_recursive(|this| {
            choice((
                sequence((this, verbatim("*"), number)).map(|(lhs, _, rhs)| lhs * rhs).boxed(),
                number.boxed(),
            ))
        });
        let total = left_recursive(move |this| {
            choice((
                sequence((this, verbatim("+"), product.clone()))
                    .map(|(lhs, _, rhs)| lhs + rhs)
                    .boxed(),
                product,
            ))
        });
        assert_eq!(total.parse("2*3+4*5"), Ok(26));
        assert_eq!(total.parse("2+3*4"), Ok(14));
    }

    #[test]
    fn left_recursion_counts_growth() {
        let mut ctx = Context::new();
        assert_eq!(
            expr().parse_in("1+2+3", &mut ctx, ParseOptions::default()),
            Ok(6)
        );
        assert_eq!(ctx.stats().growth_rounds, 4);
    }
}
