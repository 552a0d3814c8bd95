//! Record model and comparison values.
//!
//! A [`Record`] is a plain [`serde_json::Value`]: mappings, sequences and
//! scalars. The [`Literal`] enum is the right-hand side of a comparison
//! clause (`path=='x'`, `path==10`, `path==true`), and [`Number`] carries
//! numeric literals while preserving integer precision.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// A JSON-like tree value exchanged by every toolkit operation.
pub type Record = Value;

/// A mapping node of a [`Record`].
pub type Mapping = serde_json::Map<String, Value>;

/// Returns `true` if a resolved value is truthy.
///
/// Absent values, `null`, `false`, the empty string, `0` and NaN are falsy.
/// Every mapping and sequence is truthy, even when empty.
pub fn is_truthy(value: Option<&Record>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => Number::from_json(n).is_some_and(|n| n.to_f64() != 0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Literal value parsed from a matcher expression.
///
/// # Example
///
/// ```
/// use eventkit::{Literal, Number};
/// use serde_json::json;
///
/// assert!(Literal::String("generic".into()).equals(&json!("generic")));
/// assert!(Literal::Number(Number::I64(10)).equals(&json!(10.0)));
/// assert!(!Literal::Bool(true).equals(&json!("true")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string literal.
    String(String),
    /// Numeric literal.
    Number(Number),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

impl Literal {
    /// Strict equality against a record value. No type coercion is done:
    /// `'10'` never equals `10`, and mappings or sequences never equal a
    /// literal.
    pub fn equals(&self, value: &Record) -> bool {
        match (self, value) {
            (Literal::String(expected), Value::String(actual)) => expected == actual,
            (Literal::Bool(expected), Value::Bool(actual)) => expected == actual,
            (Literal::Null, Value::Null) => true,
            (Literal::Number(expected), Value::Number(actual)) => Number::from_json(actual)
                .and_then(|actual| actual.compare(*expected))
                .is_some_and(|ordering| ordering == Ordering::Equal),
            _ => false,
        }
    }

    /// Returns the name of the literal's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Number(_) => "number",
            Literal::Bool(_) => "boolean",
            Literal::Null => "null",
        }
    }

    /// Converts the literal to a record value.
    pub fn to_value(&self) -> Record {
        match self {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Number(n) => n.to_value(),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }
}

impl fmt::Display for Literal {
    /// Renders the literal in matcher-expression syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("'")
            }
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

macro_rules! literal_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Literal {
                fn from(n: $t) -> Self {
                    Literal::Number(Number::from(n))
                }
            }
        )*
    };
}

literal_from_number!(i32, i64, u32, u64, f64, usize);

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        Literal::Number(n)
    }
}

/// A JSON number with its integer precision kept.
///
/// `serde_json` stores numbers as signed, unsigned or float; literals keep
/// the same split so that large identifiers and timestamps compare exactly.
/// Values of different variants still compare by numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// Reads a JSON number, preferring the integer representations.
    pub fn from_json(n: &serde_json::Number) -> Option<Number> {
        if let Some(i) = n.as_i64() {
            Some(Number::I64(i))
        } else if let Some(u) = n.as_u64() {
            Some(Number::U64(u))
        } else {
            n.as_f64().map(Number::F64)
        }
    }

    /// Lossy float view, used for truthiness and float comparisons.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(i) => i as f64,
            Number::U64(u) => u as f64,
            Number::F64(x) => x,
        }
    }

    /// Converts the number to a record value. Non-finite floats become `null`.
    pub fn to_value(self) -> Record {
        match self {
            Number::I64(n) => Value::from(n),
            Number::U64(n) => Value::from(n),
            Number::F64(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }

    /// Orders two numbers by value. `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        use Number::*;
        match (self, other) {
            (I64(lhs), I64(rhs)) => Some(lhs.cmp(&rhs)),
            (U64(lhs), U64(rhs)) => Some(lhs.cmp(&rhs)),
            (I64(lhs), U64(rhs)) => Some(compare_signed_unsigned(lhs, rhs)),
            (U64(lhs), I64(rhs)) => Some(compare_signed_unsigned(rhs, lhs).reverse()),
            (lhs, rhs) => lhs.to_f64().partial_cmp(&rhs.to_f64()),
        }
    }
}

fn compare_signed_unsigned(signed: i64, unsigned: u64) -> Ordering {
    match u64::try_from(signed) {
        Ok(signed) => signed.cmp(&unsigned),
        Err(_) => Ordering::Less,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{:?}", n),
        }
    }
}

macro_rules! number_from {
    ($($t:ty => $variant:ident as $wide:ty),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )*
    };
}

number_from!(
    i32 => I64 as i64,
    i64 => I64 as i64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    usize => U64 as u64,
    f64 => F64 as f64,
);
