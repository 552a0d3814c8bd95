//! Matcher expression parser.
//!
//! The expression grammar is the string format descriptor constants are
//! written in:
//!
//! ```text
//! expr    := path ( '==' literal )?
//! literal := quoted-string | 'true' | 'false' | 'null' | number
//! ```
//!
//! Quoted strings use single or double quotes; a backslash escapes the
//! next character. Whitespace around the path and the literal is ignored.
//! Parsing happens once, when a matcher is built; evaluation never fails.

use std::str::FromStr;

use crate::clause::{Clause, Test};
use crate::error::{KitError, Result};
use crate::path::{FieldPath, SEPARATOR};
use crate::value::{Literal, Number};

const EQUALS: &str = "==";

/// Compiles a single matcher expression into a [`Clause`].
///
/// # Example
///
/// ```
/// use eventkit::{compile, Literal, Test};
///
/// let clause = compile("payload.ACPExtensionEventType=='com.adobe.eventtype.places'").unwrap();
/// assert_eq!(clause.path.to_string(), "payload.ACPExtensionEventType");
/// assert_eq!(clause.test, Test::Equals(Literal::from("com.adobe.eventtype.places")));
///
/// assert!(compile("type=='unterminated").is_err());
/// ```
pub fn compile(expr: &str) -> Result<Clause> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(KitError::syntax(expr, "empty expression"));
    }

    let clause = match trimmed.find('=') {
        None => Clause {
            path: parse_path(expr, trimmed)?,
            test: Test::Exists,
        },
        Some(at) => {
            if !trimmed[at..].starts_with(EQUALS) {
                return Err(KitError::syntax(expr, "expected '==' comparison"));
            }
            let path = trimmed[..at].trim_end();
            let literal = trimmed[at + EQUALS.len()..].trim_start();
            if path.is_empty() {
                return Err(KitError::syntax(expr, "missing path before '=='"));
            }
            Clause {
                path: parse_path(expr, path)?,
                test: Test::Equals(parse_literal(expr, literal)?),
            }
        }
    };

    log::debug!("compiled matcher expression {:?} as {}", expr, clause);
    Ok(clause)
}

/// Characters that belong to the expression syntax rather than to keys.
fn is_reserved(c: char) -> bool {
    c.is_whitespace()
        || matches!(c, '\'' | '"' | '=' | '!' | '<' | '>' | '&' | '|' | '(' | ')' | '[' | ']')
}

fn parse_path(expr: &str, path: &str) -> Result<FieldPath> {
    if let Some(c) = path.chars().find(|&c| is_reserved(c)) {
        return Err(KitError::syntax(
            expr,
            format!("unexpected '{}' in path", c),
        ));
    }
    if path.split(SEPARATOR).any(str::is_empty) {
        return Err(KitError::syntax(expr, "empty path segment"));
    }
    Ok(FieldPath::parse(path))
}

fn parse_literal(expr: &str, text: &str) -> Result<Literal> {
    let mut chars = text.chars();
    match chars.next() {
        None => Err(KitError::syntax(expr, "missing literal after '=='")),
        Some(quote @ ('\'' | '"')) => parse_quoted(expr, quote, chars.as_str()),
        Some(_) => match text {
            "true" => Ok(Literal::Bool(true)),
            "false" => Ok(Literal::Bool(false)),
            "null" => Ok(Literal::Null),
            _ => parse_number(text)
                .map(Literal::Number)
                .ok_or_else(|| KitError::syntax(expr, format!("unparsable literal '{}'", text))),
        },
    }
}

fn parse_quoted(expr: &str, quote: char, body: &str) -> Result<Literal> {
    let mut value = String::with_capacity(body.len());
    let mut chars = body.char_indices();

    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            c if c == quote => {
                let rest = &body[at + c.len_utf8()..];
                if !rest.trim().is_empty() {
                    return Err(KitError::syntax(
                        expr,
                        format!("unexpected '{}' after string literal", rest.trim()),
                    ));
                }
                return Ok(Literal::String(value));
            }
            c => value.push(c),
        }
    }

    Err(KitError::syntax(expr, "unterminated string literal"))
}

/// Parses a numeric literal, keeping integers exact where they fit.
fn parse_number(text: &str) -> Option<Number> {
    let first = text.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '-' | '+' | '.')) {
        return None;
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::I64(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(Number::U64(n));
    }
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Number::F64)
}

impl FromStr for Clause {
    type Err = KitError;

    fn from_str(s: &str) -> Result<Self> {
        compile(s)
    }
}
