//! Error recovery.
//!
//! A recovering parser turns a syntax error into a fallback value and resumes
//! at a *synchronization point*: the next place in the input where one of a
//! set of patterns matches, such as the `;` ending a statement. The caller can
//! then keep parsing, collecting every error instead of stopping at the first.
//!
//! Recovery never applies to fatal errors. Those indicate a broken grammar,
//! not broken input.

use crate::basic::with_value;
use crate::{Context, Error, Failure, PResult, Parse, Parser, State, Success};

/// Where a recovering parser resumes after a synchronization pattern matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Resume after the matched pattern.
    #[default]
    Consume,
    /// Resume at the start of the matched pattern, leaving it for an
    /// enclosing parser.
    Position,
    /// Resume after the matched pattern. On the success path the pattern is
    /// only consumed if present, see [`OnSuccess::OptionalPattern`].
    Optional,
}

/// What a recovering parser does when the wrapped parser succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OnSuccess {
    /// Return the success unchanged.
    #[default]
    Ignore,
    /// Require a pattern to match right after the parsed input. If none
    /// matches, the parser fails.
    RequirePattern,
    /// Match a pattern right after the parsed input if there is one.
    OptionalPattern,
}

/// Configuration of [`recover`].
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let config = RecoveryConfig::new(None::<u32>)
///     .pattern(verbatim(";"))
///     .pattern(verbatim("\n"))
///     .strategy(Strategy::Consume);
/// assert_eq!(config.patterns().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RecoveryConfig<'a, T> {
    patterns: Vec<Parser<'a, ()>>,
    fallback: T,
    strategy: Strategy,
    on_success: OnSuccess,
}

impl<'a, T> RecoveryConfig<'a, T> {
    /// Creates a configuration producing `fallback` on recovery, with no
    /// synchronization patterns yet.
    pub fn new(fallback: T) -> Self {
        Self {
            patterns: Vec::new(),
            fallback,
            strategy: Strategy::default(),
            on_success: OnSuccess::default(),
        }
    }

    /// Adds a synchronization pattern. Patterns are tried in the order they
    /// were added.
    pub fn pattern<P>(mut self, pattern: P) -> Self
    where
        P: Parse<'a> + 'a,
    {
        self.patterns.push(Parser::new(with_value(pattern, ())));
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn on_success(mut self, on_success: OnSuccess) -> Self {
        self.on_success = on_success;
        self
    }

    pub fn patterns(&self) -> &[Parser<'a, ()>] {
        &self.patterns
    }

    pub fn fallback(&self) -> &T {
        &self.fallback
    }

    /// Tries each pattern at `at`, returning the end of the first match or the
    /// combined error of all patterns.
    fn match_at(&self, at: State<'a>, ctx: &mut Context) -> Result<State<'a>, Error> {
        let mut furthest: Option<Error> = None;
        for pattern in &self.patterns {
            match pattern.run(at, ctx) {
                Ok(Success((), end)) => return Ok(end),
                Err(Failure(err, _)) => {
                    furthest = Some(match furthest {
                        Some(prev) => prev.merge(err),
                        None => err,
                    });
                }
            }
        }
        Err(furthest.unwrap_or_else(|| Error::expected("a synchronization pattern", &at)))
    }

    fn resume(&self, start: State<'a>, end: State<'a>) -> State<'a> {
        match self.strategy {
            Strategy::Position => start,
            Strategy::Consume | Strategy::Optional => end,
        }
    }
}

struct RecoverParser<'a, P, T> {
    parser: P,
    config: RecoveryConfig<'a, T>,
}

impl<'a, P, T> RecoverParser<'a, P, T>
where
    P: Parse<'a, Parsed = T>,
    T: Clone,
{
    fn on_success(&self, succ: Success<'a, T>, ctx: &mut Context) -> PResult<'a, T> {
        let Success(val, rem) = succ;
        match self.config.on_success {
            OnSuccess::Ignore => Ok(Success(val, rem)),
            OnSuccess::RequirePattern => match self.config.match_at(rem, ctx) {
                Ok(end) => Ok(Success(val, self.config.resume(rem, end))),
                Err(err) => Err(Failure(err, rem)),
            },
            OnSuccess::OptionalPattern => match self.config.match_at(rem, ctx) {
                Ok(end) => Ok(Success(val, self.config.resume(rem, end))),
                Err(_) => Ok(Success(val, rem)),
            },
        }
    }

    fn on_failure(&self, fail: Failure<'a>, ctx: &mut Context) -> PResult<'a, T> {
        let mut at = fail.1;
        loop {
            if let Ok(end) = self.config.match_at(at, ctx) {
                ctx.record_recovery();
                tracing::debug!(
                    error = fail.0.position(),
                    resumed = at.index(),
                    strategy = ?self.config.strategy,
                    "recovered from syntax error"
                );
                return Ok(Success(self.config.fallback.clone(), self.config.resume(at, end)));
            }
            if at.is_at_end() {
                return Err(fail);
            }
            at = at.advance_char();
        }
    }
}

impl<'a, P, T> Parse<'a> for RecoverParser<'a, P, T>
where
    P: Parse<'a, Parsed = T>,
    T: Clone,
{
    type Parsed = T;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, T> {
        match self.parser.run(state, ctx) {
            Ok(succ) => self.on_success(succ, ctx),
            Err(fail) if fail.is_fatal() => Err(fail),
            Err(fail) => self.on_failure(fail, ctx),
        }
    }
}

/// Creates a parser that recovers from failures of `parser`.
///
/// When `parser` fails, the input is scanned one character at a time, starting
/// where `parser` gave up. At each position every pattern of `config` is tried
/// in order. On the first match the parser succeeds with the configured
/// fallback value, resuming as selected by the [`Strategy`]. If the end of the
/// input is reached without a match, the original failure is returned.
///
/// When `parser` succeeds, [`OnSuccess`] selects whether a pattern must,
/// may, or need not follow.
///
/// Note that [`Strategy::Position`] resumes *before* the pattern. Inside a
/// repetition the pattern must be consumed by something else, or the
/// repetition stops making progress.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let number = regex("[0-9]+;").unwrap().map(|s: &str| s.trim_end_matches(';').len());
/// let numbers = recover(number, RecoveryConfig::new(0).pattern(verbatim(";"))).many();
/// assert_eq!(numbers.parse("12;x;345;"), Ok(vec![2, 0, 3]));
/// ```
pub fn recover<'a, P>(parser: P, config: RecoveryConfig<'a, P::Parsed>) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    P::Parsed: Clone,
{
    RecoverParser { parser, config }
}

/// One level of synchronization for [`recover_with_context`].
#[derive(Debug, Clone)]
pub struct RecoveryContext<'a, T> {
    pattern: Parser<'a, ()>,
    fallback: T,
    consume: bool,
}

impl<'a, T> RecoveryContext<'a, T> {
    /// Creates a level synchronizing on `pattern` and producing `fallback`.
    /// The matched pattern is consumed by default.
    pub fn new<P>(pattern: P, fallback: T) -> Self
    where
        P: Parse<'a> + 'a,
    {
        Self {
            pattern: Parser::new(with_value(pattern, ())),
            fallback,
            consume: true,
        }
    }

    /// Sets whether the matched pattern is consumed.
    pub fn consume(mut self, consume: bool) -> Self {
        self.consume = consume;
        self
    }

    fn match_at(&self, at: State<'a>, ctx: &mut Context) -> Option<State<'a>> {
        match self.pattern.run(at, ctx) {
            Ok(Success((), end)) if self.consume => Some(end),
            Ok(_) => Some(at),
            Err(_) => None,
        }
    }
}

struct ContextRecoverParser<'a, P, T> {
    parser: P,
    local: RecoveryContext<'a, T>,
    global: Option<RecoveryContext<'a, T>>,
}

impl<'a, P, T> Parse<'a> for ContextRecoverParser<'a, P, T>
where
    P: Parse<'a, Parsed = T>,
    T: Clone,
{
    type Parsed = T;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, T> {
        let fail = match self.parser.run(state, ctx) {
            Ok(succ) => return Ok(succ),
            Err(fail) if fail.is_fatal() => return Err(fail),
            Err(fail) => fail,
        };
        let mut at = fail.1;
        loop {
            let levels = core::iter::once(&self.local).chain(self.global.as_ref());
            for (depth, level) in levels.enumerate() {
                if let Some(resume) = level.match_at(at, ctx) {
                    ctx.record_recovery();
                    tracing::debug!(
                        error = fail.0.position(),
                        resumed = resume.index(),
                        level = if depth == 0 { "local" } else { "global" },
                        "recovered from syntax error"
                    );
                    return Ok(Success(level.fallback.clone(), resume));
                }
            }
            if at.is_at_end() {
                return Err(fail);
            }
            at = at.advance_char();
        }
    }
}

/// Creates a parser that recovers from failures of `parser` using a local
/// and, optionally, a global synchronization level.
///
/// At each scan position the `local` pattern is tried before the `global`
/// one. Each level decides on its own whether its pattern is consumed. This
/// lets nested constructs recover without swallowing the synchronization
/// token of an enclosing construct: an argument list can recover at its own
/// `)`, but stop in front of a statement's `;` and leave it to the statement.
///
/// # Example
/// ```
/// # use parsnip::prelude::*;
/// let args = between(verbatim("("), regex("[a-z]*").unwrap(), verbatim(")"));
/// let args = recover_with_context(
///     args,
///     RecoveryContext::new(verbatim(")"), "<bad args>"),
///     Some(RecoveryContext::new(verbatim(";"), "<bad args>").consume(false)),
/// );
/// let call = sequence((args, verbatim(";")));
/// assert_eq!(call.parse("(ab1);"), Ok(("<bad args>", ";")));
/// assert_eq!(call.parse("(ab1;"), Ok(("<bad args>", ";")));
/// ```
pub fn recover_with_context<'a, P>(
    parser: P,
    local: RecoveryContext<'a, P::Parsed>,
    global: Option<RecoveryContext<'a, P::Parsed>>,
) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    P::Parsed: Clone,
{
    ContextRecoverParser {
        parser,
        local,
        global,
    }
}

#[derive(Debug, Clone)]
struct TerminatedParser<P, T>(P, T);

impl<'a, P: Parse<'a>, T: Parse<'a>> Parse<'a> for TerminatedParser<P, T> {
    type Parsed = P::Parsed;

    fn run(&self, state: State<'a>, ctx: &mut Context) -> PResult<'a, P::Parsed> {
        let Success(val, rem) = self.0.run(state, ctx)?;
        let Success(_, rem) = self.1.run(rem, ctx)?;
        Ok(Success(val, rem))
    }
}

/// Creates a parser that requires `terminator` immediately after `parser`.
///
/// This does not recover: a missing terminator is a failure like any other.
/// Combine with [`recover`] to resynchronize.
#[inline]
pub const fn terminated<'a, P, T>(parser: P, terminator: T) -> impl Parse<'a, Parsed = P::Parsed>
where
    P: Parse<'a>,
    T: Parse<'a>,
{
    TerminatedParser(parser, terminator)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::basic::{eof, many, satisfy, verbatim, whitespace};
    use crate::sequence::{between, choice, sequence};
    use crate::ParseOptions;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    enum Statement {
        Select(String),
        Insert(String),
        Update(String),
        SyntaxError,
    }

    fn statement<'a>(keyword: &str, make: fn(String) -> Statement) -> Parser<'a, Statement> {
        crate::basic::regex(&format!("{keyword} [^;]*;"))
            .expect("statement pattern")
            .map(move |text: &str| make(text.trim_end_matches(';').to_owned()))
            .boxed()
    }

    fn ok<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, i32> {
        verbatim("ok").with_value(1).run(state, ctx)
    }

    #[test]
    fn success_is_untouched_by_default() {
        let p = recover(ok, RecoveryConfig::new(0).pattern(verbatim(";")));
        assert_eq!(p.parse("ok"), ok.parse("ok"));
        assert_eq!(p.parse_prefix("ok;"), ok.parse_prefix("ok;"));
    }

    #[test]
    fn recovery_consumes_sync_pattern() {
        let p = recover(ok, RecoveryConfig::new(0).pattern(verbatim("SYNC")));
        let mut ctx = Context::new();
        let Success(val, rem) = p.run(State::new("garbageSYNC!"), &mut ctx).unwrap();
        assert_eq!(val, 0);
        assert_eq!(rem.index(), 11);
        assert_eq!(ctx.stats().recoveries, 1);
    }

    #[test]
    fn recovery_by_position_keeps_pattern() {
        let p = recover(
            ok,
            RecoveryConfig::new(0)
                .pattern(verbatim("SYNC"))
                .strategy(Strategy::Position),
        );
        assert_eq!(p.parse_prefix("garbageSYNC"), Ok((0, "SYNC")));
    }

    #[test]
    fn optional_strategy_resumes_after_pattern() {
        let p = recover(
            ok,
            RecoveryConfig::new(0)
                .pattern(verbatim("SYNC"))
                .strategy(Strategy::Optional),
        );
        let mut ctx = Context::new();
        let Success(val, rem) = p.run(State::new("garbageSYNC!"), &mut ctx).unwrap();
        assert_eq!(val, 0);
        assert_eq!(rem.index(), 11);
        assert_eq!(p.parse_prefix("xSYNCok"), Ok((0, "ok")));
    }

    #[test]
    fn exhausted_recovery_returns_original_failure() {
        let p = recover(ok, RecoveryConfig::new(0).pattern(verbatim("SYNC")));
        assert_eq!(p.parse("garbage"), ok.parse("garbage"));
    }

    #[test]
    fn sync_pattern_may_match_at_end() {
        let p = recover(ok, RecoveryConfig::new(0).pattern(eof));
        assert_eq!(p.parse("garbage"), Ok(0));
    }

    #[test]
    fn required_pattern_after_success() {
        let p = recover(
            ok,
            RecoveryConfig::new(0)
                .pattern(verbatim(";"))
                .on_success(OnSuccess::RequirePattern),
        );
        assert_eq!(p.parse("ok;"), Ok(1));
        assert_eq!(
            p.parse("ok").unwrap_err().to_string(),
            "Parse error at Line 1, Col 3: Expected \";\" but found end of input"
        );
    }

    #[test]
    fn required_pattern_by_position_is_left_in_place() {
        let p = recover(
            ok,
            RecoveryConfig::new(0)
                .pattern(verbatim(";"))
                .strategy(Strategy::Position)
                .on_success(OnSuccess::RequirePattern),
        );
        let mut ctx = Context::new();
        let Success(val, rem) = p.run(State::new("ok;rest"), &mut ctx).unwrap();
        assert_eq!(val, 1);
        assert_eq!(rem.index(), 2);
        assert_eq!(p.parse_prefix("ok;"), Ok((1, ";")));
        assert!(p.parse_prefix("ok").is_err());
    }

    #[test]
    fn optional_pattern_after_success() {
        let config = RecoveryConfig::new(0)
            .pattern(verbatim(";"))
            .on_success(OnSuccess::OptionalPattern);
        let p = recover(ok, config.clone());
        assert_eq!(p.parse("ok"), Ok(1));
        assert_eq!(p.parse("ok;"), Ok(1));
        let q = recover(ok, config.strategy(Strategy::Position));
        assert_eq!(q.parse_prefix("ok;"), Ok((1, ";")));
    }

    #[test]
    fn fatal_errors_are_not_recovered() {
        let p = recover(
            whitespace.many().with_value(1),
            RecoveryConfig::new(0).pattern(eof),
        );
        assert!(p.parse("").unwrap_err().is_infinite_loop());
    }

    #[test]
    fn terminated_requires_terminator() {
        let p = terminated(ok, verbatim(";"));
        assert_eq!(p.parse("ok;"), Ok(1));
        let err = p.parse("ok").unwrap_err();
        assert_eq!(err.index(), 2);
    }

    #[test]
    fn statements_recover_at_semicolons() {
        let statements = many(recover(
            choice((
                statement("SELECT", Statement::Select),
                statement("INSERT", Statement::Insert),
                statement("UPDATE", Statement::Update),
            )),
            RecoveryConfig::new(Statement::SyntaxError).pattern(verbatim(";")),
        ));
        let mut ctx = Context::new();
        let parsed = statements.parse_in(
            "SELECT * FROM users;INVALID;UPDATE t SET x=1;",
            &mut ctx,
            ParseOptions::default(),
        );
        assert_eq!(
            parsed,
            Ok(vec![
                Statement::Select(String::from("SELECT * FROM users")),
                Statement::SyntaxError,
                Statement::Update(String::from("UPDATE t SET x=1")),
            ])
        );
        assert_eq!(ctx.stats().recoveries, 1);
    }

    #[test]
    fn nested_recovery_levels() {
        let digit = satisfy("a digit", |ch| ch.is_ascii_digit()).map(|ch| ch as i64 - '0' as i64);
        let args = recover_with_context(
            between(verbatim("("), digit, verbatim(")")),
            RecoveryContext::new(verbatim(")"), -1),
            Some(RecoveryContext::new(verbatim(";"), -2).consume(false)),
        );
        let call = sequence((args, verbatim(";")));
        assert_eq!(call.parse("(7);"), Ok((7, ";")));
        assert_eq!(call.parse("(1 x);"), Ok((-1, ";")));
        assert_eq!(call.parse("(1 x;"), Ok((-2, ";")));
    }

    #[test]
    fn local_level_wins_at_same_position() {
        let p = recover_with_context(
            ok,
            RecoveryContext::new(verbatim(";"), 10),
            Some(RecoveryContext::new(verbatim(";"), 20)),
        );
        assert_eq!(p.parse("bad;"), Ok(10));
    }
}
