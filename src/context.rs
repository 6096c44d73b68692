//! The per-parse context threaded through every parser.
//!
//! Packrat caches do not live inside parsers. A [`memo`](crate::recursive::memo) or
//! [`left_recursive`](crate::recursive::left_recursive) parser only owns a [`ParserId`];
//! its cached outcomes are stored in the [`Context`] handed to
//! [`Parse::run`](crate::Parse::run). The top-level [`Parse::parse`](crate::Parse::parse)
//! creates a fresh context for every call, so one grammar can be reused across
//! inputs without stale cache entries leaking between them.

use crate::{Error, Failure, PResult, Position, State, Success};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies a caching parser within a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParserId(u32);

impl ParserId {
    /// Allocates an identifier that no other parser shares.
    pub fn fresh() -> Self {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

type MemoKey = (ParserId, Position);

/// A cached outcome. States are rebuilt from positions on lookup, so the cache
/// does not borrow the input.
#[derive(Clone)]
struct Memoized<T: Clone>(Result<(T, Position), (Error, Position)>);

/// Counters describing how a parse used its context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Stats {
    /// Lookups answered from the packrat table.
    pub memo_hits: u64,
    /// Lookups that had to run the underlying parser.
    pub memo_misses: u64,
    /// Failures converted into fallback values by a recovery combinator.
    pub recoveries: u64,
    /// Body evaluations performed while growing left-recursive seeds.
    pub growth_rounds: u64,
}

/// Options for the top-level parse entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    /// Whether leftover input after a successful parse is an error.
    ///
    /// Defaults to `true`.
    pub consume_all: bool,
}

impl ParseOptions {
    pub const fn new() -> Self {
        Self { consume_all: true }
    }

    pub const fn consume_all(mut self, consume_all: bool) -> Self {
        self.consume_all = consume_all;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable state scoped to a single parse of a single input.
#[derive(Default)]
pub struct Context {
    memo: HashMap<MemoKey, Box<dyn Any>>,
    /// Keys written under each left-recursive growth in progress, innermost
    /// last. Those entries were computed against a seed that is still growing.
    growth: Vec<Vec<MemoKey>>,
    input: Option<(usize, usize)>,
    stats: Stats,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The counters accumulated since the context was created or cleared.
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// The number of cached outcomes.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Drops every cached outcome and resets the counters.
    pub fn clear(&mut self) {
        self.memo.clear();
        self.growth.clear();
        self.input = None;
        self.stats = Stats::default();
    }

    /// Associates the context with `input`, clearing it if it was last used
    /// with a different text.
    pub(crate) fn bind(&mut self, input: &str) {
        let key = (input.as_ptr() as usize, input.len());
        if self.input != Some(key) {
            if self.input.is_some() {
                tracing::trace!(entries = self.memo.len(), "input changed, clearing packrat table");
            }
            self.memo.clear();
            self.growth.clear();
            self.stats = Stats::default();
            self.input = Some(key);
        }
    }

    pub(crate) fn memo_get<'a, T>(&self, id: ParserId, state: &State<'a>) -> Option<PResult<'a, T>>
    where
        T: Clone + 'static,
    {
        let entry = self
            .memo
            .get(&(id, state.index()))?
            .downcast_ref::<Memoized<T>>()?;
        Some(match &entry.0 {
            Ok((val, end)) => Ok(Success(val.clone(), state.with_index(*end))),
            Err((err, end)) => Err(Failure(err.clone(), state.with_index(*end))),
        })
    }

    pub(crate) fn memo_put<T>(&mut self, id: ParserId, start: Position, outcome: &PResult<'_, T>)
    where
        T: Clone + 'static,
    {
        if let Some(frame) = self.growth.last_mut() {
            frame.push((id, start));
        }
        self.seed_put(id, start, outcome);
    }

    /// Stores the growing entry of a left-recursive rule. Unlike
    /// [`memo_put`](Self::memo_put), the entry survives the rounds of its own
    /// growth.
    pub(crate) fn seed_put<T>(&mut self, id: ParserId, start: Position, outcome: &PResult<'_, T>)
    where
        T: Clone + 'static,
    {
        let stored = match outcome {
            Ok(Success(val, rem)) => Memoized(Ok((val.clone(), rem.index()))),
            Err(Failure(err, rem)) => Memoized(Err((err.clone(), rem.index()))),
        };
        self.memo.insert((id, start), Box::new(stored));
    }

    pub(crate) fn begin_growth(&mut self) {
        self.growth.push(Vec::new());
    }

    /// Drops the entries written since the current growth began or since the
    /// previous call, whichever is later.
    pub(crate) fn discard_growth_round(&mut self) {
        if let Some(frame) = self.growth.last_mut() {
            for key in frame.drain(..) {
                self.memo.remove(&key);
            }
        }
    }

    /// Ends the innermost growth. Its remaining entries also depend on every
    /// enclosing growth, so they are handed to the next frame out.
    pub(crate) fn end_growth(&mut self) {
        if let Some(frame) = self.growth.pop() {
            if let Some(outer) = self.growth.last_mut() {
                outer.extend(frame);
            }
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.stats.memo_hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.stats.memo_misses += 1;
    }

    pub(crate) fn record_recovery(&mut self) {
        self.stats.recoveries += 1;
    }

    pub(crate) fn record_growth_round(&mut self) {
        self.stats.growth_rounds += 1;
    }
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("entries", &self.memo.len())
            .field("stats", &self.stats)
            .finish()
    }
}
