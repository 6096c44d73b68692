//! This example parses a script of SQL-like statements, recovering
//! from malformed statements instead of stopping at the first error.
//!
//! The script is read from the file named on the command line, or
//! from standard input when no file is given. Each statement ends
//! with a `;`. Keywords are case-insensitive.
//!
//! Supported statements:
//! * `SELECT a, b FROM t;`
//! * `INSERT INTO t VALUES (1, 'text');`
//! * `DELETE FROM t;`
//!
//! A statement that fails to parse is printed as `Invalid`, and
//! parsing resumes after the next `;`. Skipped statements are also
//! logged to stderr; set `RUST_LOG=parsnip=debug` for the details of
//! each recovery.

use parsnip::ascii::{self, prop, AsAsciiStrError};
use parsnip::prelude::*;
use parsnip::{Context, PResult, ParseOptions, State};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone)]
enum Statement {
    Select { columns: Vec<String>, table: String },
    Insert { table: String, values: Vec<Value> },
    Delete { table: String },
    Invalid,
}

#[derive(Debug, Clone)]
enum Value {
    Number(i64),
    Text(String),
}

fn ws_delim<'a, P: Parse<'a>>(parser: P) -> impl Parse<'a, Parsed = P::Parsed> {
    prefix(whitespace, parser)
}

fn identifier<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, String> {
    let start = ascii::char_with_prop(prop::Alphabetic);
    let rest = ascii::char_with_prop(prop::Alphanumeric).many();
    ws_delim(start.then(rest).slice().map(String::from))
        .label("an identifier")
        .run(state, ctx)
}

fn value<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, Value> {
    let number = ascii::char_with_prop(prop::Digit)
        .many1()
        .slice()
        .try_map(|digits: &str| digits.parse().map(Value::Number).map_err(|_| "a 64-bit integer"));
    let text = between(verbatim("'"), none_of("'").many().slice(), verbatim("'"))
        .map(|text: &str| Value::Text(text.to_owned()));
    ws_delim(choice((number.boxed(), text.boxed())))
        .label("a value")
        .run(state, ctx)
}

fn comma<'a>(state: State<'a>, ctx: &mut Context) -> PResult<'a, &'a str> {
    ws_delim(verbatim(",")).run(state, ctx)
}

fn statement<'a>() -> Result<Parser<'a, Statement>, AsAsciiStrError> {
    let kw = |word: &str| ascii::keyword(word).map(|kw| ws_delim(kw).boxed());

    let select = sequence((kw("select")?, sep_by1(identifier, comma), kw("from")?, identifier))
        .map(|(_, columns, _, table)| Statement::Select { columns, table });

    let insert = sequence((
        kw("insert")?,
        kw("into")?,
        identifier,
        kw("values")?,
        between(ws_delim(verbatim("(")), sep_by(value, comma), ws_delim(verbatim(")"))),
    ))
    .map(|(_, _, table, _, values)| Statement::Insert { table, values });

    let delete = sequence((kw("delete")?, kw("from")?, identifier))
        .map(|(_, _, table)| Statement::Delete { table });

    let any = choice((select.boxed(), insert.boxed(), delete.boxed()))
        .context("statement")
        .terminated(ws_delim(verbatim(";")));

    Ok(any
        .recover(RecoveryConfig::new(Statement::Invalid).pattern(verbatim(";")))
        .spanned()
        .map(|(stmt, span)| {
            if matches!(stmt, Statement::Invalid) {
                tracing::warn!(location = %span.location(), "skipped malformed statement");
            }
            stmt
        })
        .boxed())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    use std::io::Read;

    let script = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut script = String::new();
            std::io::stdin().read_to_string(&mut script)?;
            script
        }
    };

    let script_parser = suffix(many(statement()?), whitespace);
    let mut ctx = Context::new();
    match script_parser.parse_in(&script, &mut ctx, ParseOptions::default()) {
        Ok(statements) => {
            for stmt in &statements {
                println!("{stmt:?}");
            }
        }
        Err(err) => println!("{err}"),
    }

    let stats = ctx.stats();
    println!(
        "recoveries: {}, memo hits: {}, memo misses: {}",
        stats.recoveries, stats.memo_hits, stats.memo_misses
    );
    Ok(())
}
