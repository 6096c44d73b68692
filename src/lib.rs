#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Packrat parser-combinator library for Rust.
//! `parsnip` builds text recognizers out of small, composable parsers. On top
//! of the classic combinators it supports left-recursive grammars through
//! packrat memoization, policy-driven error recovery and a handful of
//! algebraic combinators (intersection, difference, permutation and
//! longest-match).
//!
//! # Contents
//! * [Example](#example) - Jump directly into an example parser implementation
//! * [Defining a Parser](#defining-a-parser) - How to write your own parser
//! * [Committing and Backtracking](#committing-and-backtracking) - When
//!   alternatives are tried
//! * [Recursive Grammars](#recursive-grammars) - `lazy`, `memo` and
//!   `left_recursive`
//! * [Error Recovery](#error-recovery) - Continuing after a syntax error
//! * [Parsing Errors](#parsing-errors) - What `parse` reports
//! * [Features](#features) - Available crate features
//!
//! # Example
//! ```
//! use parsnip::prelude::*;
//! use parsnip::{Context, PResult, State};
//!
//! fn number<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, u32> {
//!     satisfy("a digit", |ch| ch.is_ascii_digit())
//!         .many1()
//!         .slice()
//!         .try_map(|digits: &str| digits.parse::<u32>().map_err(|_| "a 32-bit number"))
//!         .run(state, ctx)
//! }
//!
//! fn list<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, Vec<u32>> {
//!     between(
//!         verbatim("["),
//!         sep_by(prefix(whitespace, number), prefix(whitespace, verbatim(","))),
//!         prefix(whitespace, verbatim("]")),
//!     )
//!     .run(state, ctx)
//! }
//!
//! assert_eq!(list.parse("[1, 2,3 ]"), Ok(vec![1, 2, 3]));
//! assert_eq!(
//!     list.parse("[1, 2").unwrap_err().to_string(),
//!     "Parse error at Line 1, Col 6: Expected \"]\" but found end of input",
//! );
//! ```
//!
//! # Defining a Parser
//! A parser is anything implementing [`Parse`]. Most user defined parsers
//! should be plain functions: every type implementing
//! `Fn(State<'a>, &mut Context) -> PResult<'a, T>` automatically implements
//! [`Parse<'a, Parsed = T>`](Parse). Functions are also the easiest way to
//! write a recursive rule, since a function may refer to itself by name.
//!
//! Parsers are built once and reused. Running a parser never modifies it; all
//! per-parse state is carried by the [`State`] cursor and the [`Context`].
//!
//! When a parser value has to be stored, passed around or cloned, erase its
//! type with [`Parse::boxed`], which yields a [`Parser`].
//!
//! # Committing and Backtracking
//! The [`State`] inside a [`Failure`] records how far the failing parser got
//! before giving up. A failure whose state equals the state the parser started
//! from did not consume input. Such failures can be backtracked over: choice
//! combinators ([`Parse::or`], [`choice`](sequence::choice), [`Parse::opt`],
//! ...) go on to try the next alternative. A failure whose state moved forward
//! is *committed* and propagates without trying further alternatives.
//!
//! Primitive tokens such as [`verbatim`](basic::verbatim) never commit: a
//! literal that matches only partially still fails at its start.
//!
//! # Recursive Grammars
//! * [`lazy`](recursive::lazy) defers building a parser until it first runs.
//! * [`memo`](recursive::memo) caches outcomes per input position in the
//!   [`Context`], bounding the work of heavily backtracking grammars.
//! * [`left_recursive`](recursive::left_recursive) makes rules such as
//!   `expr = expr "+" term | term` terminate, returning the longest parse.
//!
//! Recursion depth is bounded by the native stack: every nested rule
//! application is a nested call. Repetition is not recursive, so
//! [`many`](basic::many), [`sep_by`](sequence::sep_by) and
//! [`sequence`](sequence::sequence) over a `Vec` run in a loop regardless of
//! how many items they match.
//!
//! # Error Recovery
//! [`recover`](recovery::recover) and
//! [`recover_with_context`](recovery::recover_with_context) turn a syntax error
//! into a fallback value by scanning forward to a synchronization pattern,
//! such as the `;` ending a statement. Parsing then continues after it.
//!
//! # Parsing Errors
//! The top-level entry points return [`ParseError`], which tells a syntax
//! error apart from unconsumed trailing input and from the fatal error raised
//! when a repetition stops making progress. Inside the combinator graph,
//! failures are plain [`Failure`] values carrying an [`Error`]. The position
//! of an [`Error`] is the furthest point at which a mismatch was detected, and
//! may lie beyond the state of its [`Failure`].
//!
//! # Features
//! * `ascii` - ASCII character classes and case-insensitive keywords
//!   (enabled by default)
//! * `unicode` - Unicode property character classes (enabled by default)

mod context;
mod error;
mod span;
mod state;

pub mod algebra;
pub mod basic;
pub mod recovery;
pub mod recursive;
pub mod sequence;

#[cfg(feature = "ascii")]
#[cfg_attr(docsrs, doc(cfg(feature = "ascii")))]
pub mod ascii;
#[cfg(feature = "unicode")]
#[cfg_attr(docsrs, doc(cfg(feature = "unicode")))]
pub mod unicode;

pub use context::*;
pub use error::*;
pub use span::*;
pub use state::*;

use recovery::RecoveryConfig;
use std::rc::Rc;

/// The `parsnip` prelude.
pub mod prelude {
    pub use super::algebra::{difference, intersect, longest, permutation};
    pub use super::basic::{
        any_char, either, eof, fail, many, many1, none_of, not, one_of, opt, pair, peek, prefix,
        regex, satisfy, succeed, suffix, verbatim, whitespace,
    };
    pub use super::recovery::{
        recover, recover_with_context, terminated, OnSuccess, RecoveryConfig, RecoveryContext,
        Strategy,
    };
    pub use super::recursive::{lazy, left_recursive, memo};
    pub use super::sequence::{between, choice, context, label, sep_by, sep_by1, sequence};
    pub use super::{Failure, PResultExt as _, Parse, Parser, Success};
}

/// Type returned by a parser when parsing succeeds.
///
/// [`Success`] is a named tuple containing the parsed value (see
/// [`Parse::Parsed`]) and the state after the consumed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<'a, T>(
    /// The parsed value
    pub T,
    /// The state following the consumed input
    pub State<'a>,
);

/// Type returned by a parser when parsing fails.
///
/// [`Failure`] is a named tuple containing the parsing error and the state the
/// failing parser reached. A parser that fails without consuming input returns
/// the state it started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<'a>(
    /// The parsing error
    pub Error,
    /// How far the parser got before failing
    pub State<'a>,
);

/// The [`Result`] type returned by a parser.
pub type PResult<'a, T> = Result<Success<'a, T>, Failure<'a>>;

/// Trait implemented by all parsers.
///
/// Only [`Parse::run`] must be implemented. The remaining methods are entry
/// points ([`parse`](Parse::parse) and friends) and combinators, most of which
/// forward to a free function in one of the combinator modules.
pub trait Parse<'a> {
    /// The value type that is produced by the parser on success.
    type Parsed;

    /// Runs the parser at `state`.
    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, Self::Parsed>;

    /// Parses the whole of `input`.
    ///
    /// Trailing input that the parser did not consume is an error. See
    /// [`Parse::parse_with`] to allow it.
    fn parse(&self, input: &'a str) -> Result<Self::Parsed, ParseError> {
        self.parse_with(input, ParseOptions::default())
    }

    /// Parses `input` with a fresh [`Context`] and the given options.
    fn parse_with(&self, input: &'a str, options: ParseOptions) -> Result<Self::Parsed, ParseError> {
        let mut ctx = Context::new();
        self.parse_in(input, &mut ctx, options)
    }

    /// Parses `input` with a caller-owned [`Context`].
    ///
    /// The context keeps its packrat table while it is handed the same input
    /// and clears it when handed a different one. Reusing a context is mostly
    /// useful to inspect [`Context::stats`] afterwards.
    fn parse_in(
        &self,
        input: &'a str,
        ctx: &mut Context,
        options: ParseOptions,
    ) -> Result<Self::Parsed, ParseError> {
        ctx.bind(input);
        match self.run(State::new(input), ctx) {
            Ok(Success(_, rem)) if options.consume_all && !rem.is_at_end() => {
                Err(ParseError::incomplete(&rem))
            }
            Ok(Success(val, _)) => Ok(val),
            Err(Failure(err, _)) => Err(err.into_parse_error(input)),
        }
    }

    /// Parses a prefix of `input`, returning the value and the unconsumed rest.
    ///
    /// # Example
    /// ```
    /// # use parsnip::prelude::*;
    /// assert_eq!(verbatim("key").parse_prefix("key=value"), Ok(("key", "=value")));
    /// ```
    fn parse_prefix(&self, input: &'a str) -> Result<(Self::Parsed, &'a str), ParseError> {
        let mut ctx = Context::new();
        ctx.bind(input);
        match self.run(State::new(input), &mut ctx) {
            Ok(Success(val, rem)) => Ok((val, rem.rest())),
            Err(Failure(err, _)) => Err(err.into_parse_error(input)),
        }
    }

    /// Creates a parser whose parsed result is transformed.
    ///
    /// See also [`basic::map`].
    ///
    /// # Example
    /// ```
    /// # use parsnip::prelude::*;
    /// let len = verbatim("hello").map(|s| s.len());
    /// assert_eq!(len.parse("hello"), Ok(5));
    /// ```
    #[inline]
    fn map<F, R>(self, map_fn: F) -> impl Parse<'a, Parsed = R>
    where
        Self: Sized,
        F: Fn(Self::Parsed) -> R,
    {
        basic::map(self, map_fn)
    }

    /// Creates a parser whose parsed result is transformed by a fallible
    /// function.
    ///
    /// See also [`basic::try_map`].
    #[inline]
    fn try_map<F, R, S>(self, map_fn: F) -> impl Parse<'a, Parsed = R>
    where
        Self: Sized,
        F: Fn(Self::Parsed) -> Result<R, S>,
        S: Into<String>,
    {
        basic::try_map(self, map_fn)
    }

    /// Creates a parser that feeds the parsed value into `combinator` and runs
    /// the parser it returns on the remaining input.
    ///
    /// See also [`basic::flat_map`].
    #[inline]
    fn flat_map<C, R>(self, combinator: C) -> impl Parse<'a, Parsed = R::Parsed>
    where
        Self: Sized,
        C: Fn(Self::Parsed) -> R,
        R: Parse<'a>,
    {
        basic::flat_map(self, combinator)
    }

    /// Creates a parser that replaces the parsed value with `value`.
    #[inline]
    fn with_value<T: Clone>(self, value: T) -> impl Parse<'a, Parsed = T>
    where
        Self: Sized,
    {
        basic::with_value(self, value)
    }

    /// Creates a parser that rejects parsed values failing `verify_fn`.
    ///
    /// See also [`basic::verify`].
    #[inline]
    fn verify<F>(self, verify_fn: F) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
        F: Fn(&Self::Parsed) -> bool,
    {
        basic::verify(self, verify_fn)
    }

    /// Creates a parser that applies `self` zero or more times.
    ///
    /// See also [`basic::many`].
    #[inline]
    fn many(self) -> impl Parse<'a, Parsed = Vec<Self::Parsed>>
    where
        Self: Sized,
    {
        basic::many(self)
    }

    /// Creates a parser that applies `self` one or more times.
    ///
    /// See also [`basic::many1`].
    #[inline]
    fn many1(self) -> impl Parse<'a, Parsed = Vec<Self::Parsed>>
    where
        Self: Sized,
    {
        basic::many1(self)
    }

    /// Creates a parser that tries `self`, then `other` if `self` failed
    /// without consuming input.
    ///
    /// See also [`basic::either`].
    ///
    /// # Example
    /// ```
    /// # use parsnip::prelude::*;
    /// let sign = verbatim("+").or(verbatim("-"));
    /// assert_eq!(sign.parse("-"), Ok("-"));
    /// ```
    #[inline]
    fn or<P>(self, other: P) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
        P: Parse<'a, Parsed = Self::Parsed>,
    {
        basic::either(self, other)
    }

    /// Creates a parser that yields `None` instead of failing without
    /// consuming input.
    ///
    /// See also [`basic::opt`].
    #[inline]
    fn opt(self) -> impl Parse<'a, Parsed = Option<Self::Parsed>>
    where
        Self: Sized,
    {
        basic::opt(self)
    }

    /// Creates a parser that applies `self` then `next`, keeping both values.
    #[inline]
    fn then<P>(self, next: P) -> impl Parse<'a, Parsed = (Self::Parsed, P::Parsed)>
    where
        Self: Sized,
        P: Parse<'a>,
    {
        basic::pair(self, next)
    }

    /// Creates a parser that applies `self` then `next`, keeping the value of
    /// `self`.
    #[inline]
    fn keep_left<P>(self, next: P) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
        P: Parse<'a>,
    {
        basic::suffix(self, next)
    }

    /// Creates a parser that applies `self` then `next`, keeping the value of
    /// `next`.
    #[inline]
    fn keep_right<P>(self, next: P) -> impl Parse<'a, Parsed = P::Parsed>
    where
        Self: Sized,
        P: Parse<'a>,
    {
        basic::prefix(self, next)
    }

    /// Creates a parser that returns the consumed text instead of the parsed
    /// value.
    #[inline]
    fn slice(self) -> impl Parse<'a, Parsed = &'a str>
    where
        Self: Sized,
    {
        basic::slice(self)
    }

    /// Creates a parser that returns the consumed [`Span`] instead of the
    /// parsed value.
    #[inline]
    fn recognize(self) -> impl Parse<'a, Parsed = Span<'a>>
    where
        Self: Sized,
    {
        basic::recognize(self)
    }

    /// Creates a parser that pairs the parsed value with the consumed [`Span`].
    #[inline]
    fn spanned(self) -> impl Parse<'a, Parsed = (Self::Parsed, Span<'a>)>
    where
        Self: Sized,
    {
        basic::spanned(self)
    }

    /// Creates a parser that runs `self` without consuming input.
    #[inline]
    fn peek(self) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
    {
        basic::peek(self)
    }

    /// Creates a parser that reports `name` as the expected input when `self`
    /// fails.
    ///
    /// See also [`sequence::label`].
    #[inline]
    fn label(self, name: impl Into<String>) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
    {
        sequence::label(self, name)
    }

    /// Creates a parser that prefixes the expected input of its failures with
    /// `name`.
    ///
    /// See also [`sequence::context`].
    #[inline]
    fn context(self, name: impl Into<String>) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
    {
        sequence::context(self, name)
    }

    /// Creates a parser that applies `self` any number of times, separated by
    /// `sep`.
    ///
    /// See also [`sequence::sep_by`].
    #[inline]
    fn sep_by<S>(self, sep: S) -> impl Parse<'a, Parsed = Vec<Self::Parsed>>
    where
        Self: Sized,
        S: Parse<'a>,
    {
        sequence::sep_by(self, sep)
    }

    /// Creates a parser that applies `self` at least once, separated by `sep`.
    ///
    /// See also [`sequence::sep_by1`].
    #[inline]
    fn sep_by1<S>(self, sep: S) -> impl Parse<'a, Parsed = Vec<Self::Parsed>>
    where
        Self: Sized,
        S: Parse<'a>,
    {
        sequence::sep_by1(self, sep)
    }

    /// Creates a parser that caches its outcomes per input position.
    ///
    /// See also [`recursive::memo`].
    #[inline]
    fn memo(self) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
        Self::Parsed: Clone + 'static,
    {
        recursive::memo(self)
    }

    /// Creates a parser that requires `terminator` right after `self`.
    ///
    /// See also [`recovery::terminated`].
    #[inline]
    fn terminated<T>(self, terminator: T) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
        T: Parse<'a>,
    {
        recovery::terminated(self, terminator)
    }

    /// Creates a parser that recovers from failures as described by `config`.
    ///
    /// See also [`recovery::recover`].
    #[inline]
    fn recover(self, config: RecoveryConfig<'a, Self::Parsed>) -> impl Parse<'a, Parsed = Self::Parsed>
    where
        Self: Sized,
        Self::Parsed: Clone,
    {
        recovery::recover(self, config)
    }

    /// Erases the type of the parser.
    #[inline]
    fn boxed(self) -> Parser<'a, Self::Parsed>
    where
        Self: Sized + 'a,
    {
        Parser::new(self)
    }

    /// Creates a parser that borrows `self`.
    ///
    /// Combinators take their parsers by value; `by_ref` lets one parser be
    /// used in several places without cloning it.
    #[inline]
    fn by_ref(&self) -> impl Parse<'a, Parsed = Self::Parsed> + '_
    where
        Self: Sized,
    {
        basic::as_ref(self)
    }
}

/// A type-erased, reference-counted parser.
///
/// [`Parser`] is cheap to clone, so one rule can appear in many places of a
/// grammar. It optionally carries a description. The description is fixed at
/// construction: [`Parser::with_description`] returns a new parser and leaves
/// the original untouched.
pub struct Parser<'a, T> {
    inner: Rc<dyn Parse<'a, Parsed = T> + 'a>,
    description: Option<Rc<str>>,
}

impl<'a, T> Parser<'a, T> {
    /// Erases the type of `parser`.
    pub fn new<P>(parser: P) -> Self
    where
        P: Parse<'a, Parsed = T> + 'a,
    {
        Self {
            inner: Rc::new(parser),
            description: None,
        }
    }

    pub(crate) fn from_rc(inner: Rc<dyn Parse<'a, Parsed = T> + 'a>) -> Self {
        Self {
            inner,
            description: None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl<'a, T: 'a> Parser<'a, T> {
    /// Returns a parser that reports `description` as the expected input when
    /// it fails.
    ///
    /// # Example
    /// ```
    /// # use parsnip::prelude::*;
    /// let digits = regex("[0-9]+").unwrap().boxed().with_description("digits");
    /// assert_eq!(digits.description(), Some("digits"));
    /// assert_eq!(
    ///     digits.parse("x").unwrap_err().to_string(),
    ///     "Parse error at Line 1, Col 1: Expected digits but found 'x'",
    /// );
    /// ```
    pub fn with_description(&self, description: impl Into<Rc<str>>) -> Self {
        let description = description.into();
        Self {
            inner: Rc::new(sequence::label(self.clone(), description.to_string())),
            description: Some(description),
        }
    }
}

impl<T> Clone for Parser<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            description: self.description.clone(),
        }
    }
}

impl<T> core::fmt::Debug for Parser<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<'a, T> Parse<'a> for Parser<'a, T> {
    type Parsed = T;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, T> {
        self.inner.run(state, ctx)
    }
}

impl<'a, F, T> Parse<'a> for F
where
    F: Fn(State<'a>, &mut Context) -> PResult<'a, T>,
{
    type Parsed = T;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, T> {
        (*self)(state, ctx)
    }
}

mod sealed {
    pub trait Sealed {}

    impl<T> Sealed for super::PResult<'_, T> {}
}

/// Convenience methods on [`PResult`].
pub trait PResultExt<'a>: sealed::Sealed {
    type Parsed;

    fn success(parsed: Self::Parsed, state: State<'a>) -> Self;

    fn failure(error: Error, state: State<'a>) -> Self;

    /// The state carried by either variant.
    fn state(&self) -> State<'a>;

    fn parsed(&self) -> Option<&Self::Parsed>;

    fn extract(self) -> (Result<Self::Parsed, Error>, State<'a>);

    fn map_parsed<F, R>(self, map_fn: F) -> PResult<'a, R>
    where
        F: FnOnce(Self::Parsed) -> R;
}

impl<'a, T> PResultExt<'a> for PResult<'a, T> {
    type Parsed = T;

    fn success(parsed: T, state: State<'a>) -> Self {
        Ok(Success(parsed, state))
    }

    fn failure(error: Error, state: State<'a>) -> Self {
        Err(Failure(error, state))
    }

    fn state(&self) -> State<'a> {
        match self {
            Ok(Success(_, state)) | Err(Failure(_, state)) => *state,
        }
    }

    fn parsed(&self) -> Option<&T> {
        match self {
            Ok(Success(val, _)) => Some(val),
            Err(_) => None,
        }
    }

    fn extract(self) -> (Result<T, Error>, State<'a>) {
        match self {
            Ok(Success(val, state)) => (Ok(val), state),
            Err(Failure(err, state)) => (Err(err), state),
        }
    }

    fn map_parsed<F, R>(self, map_fn: F) -> PResult<'a, R>
    where
        F: FnOnce(T) -> R,
    {
        self.map(move |succ| succ.map(map_fn))
    }
}

impl<'a, T> Success<'a, T> {
    pub fn map<F, R>(self, map_fn: F) -> Success<'a, R>
    where
        F: FnOnce(T) -> R,
    {
        let Success(val, rem) = self;
        Success(map_fn(val), rem)
    }
}

impl<'a> Failure<'a> {
    /// Returns `true` if the failing parser consumed input after `start`.
    pub fn is_committed(&self, start: &State<'a>) -> bool {
        self.1.index() != start.index()
    }

    /// Returns `true` if the error must never be backtracked or recovered.
    pub fn is_fatal(&self) -> bool {
        self.0.is_fatal()
    }
}

impl<'a, T> From<Success<'a, T>> for (T, State<'a>) {
    fn from(Success(val, state): Success<'a, T>) -> Self {
        (val, state)
    }
}

impl<'a> From<Failure<'a>> for (Error, State<'a>) {
    fn from(Failure(err, state): Failure<'a>) -> Self {
        (err, state)
    }
}

#[cfg(test)]
mod test {
    use super::prelude::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn digit<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, u32> {
        satisfy("a digit", |ch| ch.is_ascii_digit())
            .map(|ch| ch as u32 - '0' as u32)
            .run(state, ctx)
    }

    #[test]
    fn consume_all_is_default() {
        assert_eq!(digit.parse("7"), Ok(7));
        let err = digit.parse("78").unwrap_err();
        assert!(err.is_incomplete());
        assert_eq!(
            err.to_string(),
            "Parse error at Line 1, Col 2: Parser did not consume entire input, found '8'"
        );
        assert_eq!(
            digit.parse_with("78", ParseOptions::new().consume_all(false)),
            Ok(7)
        );
    }

    #[test]
    fn syntax_error_reports_location() {
        let lines = verbatim("a\n").keep_right(digit);
        let err = lines.parse("a\nx").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at Line 2, Col 1: Expected a digit but found 'x'"
        );
        assert_eq!(err.index(), 2);
    }

    #[test]
    fn parsing_is_deterministic() {
        let p = digit.many1();
        assert_eq!(p.parse("123"), p.parse("123"));
        assert_eq!(p.parse("12x"), p.parse("12x"));
    }

    #[test]
    fn boxed_parsers_are_shared() {
        let d = digit.boxed();
        let pair = sequence((d.clone(), d));
        assert_eq!(pair.parse("42"), Ok((4, 2)));
    }

    #[test]
    fn description_builds_new_parser() {
        let d = digit.boxed();
        let described = d.with_description("a number");
        assert_eq!(d.description(), None);
        assert_eq!(described.description(), Some("a number"));
        assert_eq!(
            described.parse("?").unwrap_err().to_string(),
            "Parse error at Line 1, Col 1: Expected a number but found '?'"
        );
    }

    #[test]
    fn by_ref_reuses_parser() {
        let d = digit.many1();
        let both = sequence((d.by_ref(), verbatim(","), d.by_ref()));
        assert_eq!(both.parse("12,3"), Ok((vec![1, 2], ",", vec![3])));
    }

    #[test]
    fn presult_ext() {
        let state = State::new("abc");
        let ok: PResult<'_, i32> = PResultExt::success(1, state.advance(1));
        assert_eq!(ok.parsed(), Some(&1));
        assert_eq!(ok.state().index(), 1);
        let mapped = ok.map_parsed(|n| n + 1);
        assert_eq!(mapped.extract().0, Ok(2));
    }
}
