//! This example implements an arithmetic expression parser.
//!
//! When the program is run, there will be a prompt. Enter any
//! basic arithmetic expression, and the result will be printed.
//!
//! Operators:
//! In the following, `n` and `m` are placeholders for numbers.
//! * `+n`    - Identity
//! * `-n`    - Negation
//! * `n + m` - Addition
//! * `n - m` - Subtraction
//! * `n * m` - Multiplication
//! * `n / m` - Division (integer)
//! * `n % m` - Remainder
//!
//! Operators follow standard precedence rules. Parentheses may
//! also be used to explicity specify precedence.
//!
//! The binary operators are written as left-recursive rules, the
//! way they appear in a textbook grammar:
//!
//! ```text
//! expr  = expr ("+" | "-") term | term
//! term  = term ("*" | "/" | "%") unary | unary
//! unary = ("+" | "-")* primary
//! primary = number | "(" expr ")"
//! ```
//!
//! Numbers are signed 64-bit integers. Literals that do not fit,
//! and division by zero, are reported as parse errors.
//!
//! Run with `RUST_LOG=parsnip=debug,arithmetic=debug` to see the
//! left-recursive rules grow.

use parsnip::prelude::*;
use parsnip::{Context, PResult, ParseError, ParseOptions, State};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn ws_delim<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = P::Parsed> {
    prefix(whitespace, parser)
}

fn number<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, i64> {
    ws_delim(satisfy("a digit", |ch| ch.is_ascii_digit()).many1().slice())
        .try_map(|digits: &str| digits.parse::<i64>().map_err(|_| "a 64-bit integer"))
        .label("a number")
        .run(state, ctx)
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Op {
    fn calc(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Op::Add => lhs.checked_add(rhs),
            Op::Sub => lhs.checked_sub(rhs),
            Op::Mul => lhs.checked_mul(rhs),
            Op::Div => lhs.checked_div(rhs),
            Op::Mod => lhs.checked_rem(rhs),
        }
    }
}

fn op<'a>(symbol: &'static str, value: Op) -> impl Parse<'a, Parsed = Op> {
    ws_delim(verbatim(symbol)).with_value(value)
}

fn apply((lhs, op, rhs): (i64, Op, i64)) -> Result<i64, &'static str> {
    op.calc(lhs, rhs).ok_or("an operation without overflow or division by zero")
}

fn grammar<'a>() -> Parser<'a, i64> {
    left_recursive(|expr| {
        let primary = choice((
            number.boxed(),
            between(ws_delim(verbatim("(")), expr.clone(), ws_delim(verbatim(")"))).boxed(),
        ))
        .boxed();

        let unary = sequence((choice((op("+", Op::Add), op("-", Op::Sub))).many(), primary))
            .try_map(|(signs, val): (Vec<Op>, i64)| {
                let negations = signs.iter().filter(|op| matches!(op, Op::Sub)).count();
                if negations % 2 == 0 {
                    Ok(val)
                } else {
                    val.checked_neg().ok_or("a negatable number")
                }
            })
            .boxed();

        let term = left_recursive(move |term| {
            let mul_op = choice((op("*", Op::Mul), op("/", Op::Div), op("%", Op::Mod)));
            choice((
                sequence((term, mul_op, unary.clone())).try_map(apply).boxed(),
                unary,
            ))
        });

        let add_op = choice((op("+", Op::Add), op("-", Op::Sub)));
        choice((
            sequence((expr, add_op, term.clone())).try_map(apply).boxed(),
            term,
        ))
    })
}

fn eval(input: &str) -> Result<i64, ParseError> {
    let mut ctx = Context::new();
    let value = suffix(grammar(), whitespace).parse_in(input, &mut ctx, ParseOptions::default());
    let stats = ctx.stats();
    tracing::debug!(
        memo_hits = stats.memo_hits,
        growth_rounds = stats.growth_rounds,
        "evaluated expression"
    );
    value
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> std::io::Result<()> {
    init_tracing();

    use std::io::BufRead;
    use std::io::Write;

    let mut out = std::io::stdout();
    writeln!(out, "Enter 'q', 'quit', or 'exit' to exit.")?;
    write!(out, "> ")?;
    out.flush()?;

    for input in std::io::stdin().lock().lines() {
        let input = input?;

        if input == "q" || input == "quit" || input == "exit" {
            break;
        }

        if input.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        match eval(&input) {
            Ok(value) => writeln!(out, "{value}")?,
            Err(err) => writeln!(out, "{err}")?,
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    Ok(())
}
