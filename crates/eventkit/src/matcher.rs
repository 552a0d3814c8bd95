//! Matcher tree, combinators and collection filtering.
//!
//! A [`Matcher`] is a parsed predicate over a [`Record`]: either a single
//! [`Clause`] or a group combining other matchers.
//!
//! ```text
//! All(ms)  = every m matches        (empty = matches everything)
//! Any(ms)  = at least one m matches (empty = matches nothing)
//! None(ms) = no m matches           (empty = matches everything)
//! ```
//!
//! Combinators take [`Term`]s, so raw expression strings and previously
//! built matchers can be mixed in one list. Strings are parsed when the
//! combinator runs; evaluation itself never fails.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clause::Clause;
use crate::error::{KitError, Result};
use crate::parse::compile;
use crate::value::Record;

/// A compiled predicate over records.
///
/// # Example
///
/// ```
/// use eventkit::Matcher;
/// use serde_json::json;
///
/// let matcher = Matcher::all(["type=='generic'", "vendor"]).unwrap();
/// let records = vec![
///     json!({"type": "generic", "vendor": "x"}),
///     json!({"type": "other", "vendor": "x"}),
///     json!({"type": "generic"}),
/// ];
///
/// let matched = matcher.filter(&records);
/// assert_eq!(matched, vec![&records[0]]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatcherRepr", into = "MatcherRepr")]
pub enum Matcher {
    /// A single parsed expression.
    Clause(Clause),
    /// Logical AND.
    All(Vec<Matcher>),
    /// Logical OR.
    Any(Vec<Matcher>),
    /// Logical NOR.
    None(Vec<Matcher>),
}

/// One element of a combinator list: a raw expression or a built matcher.
#[derive(Debug, Clone)]
pub enum Term {
    /// Expression string, parsed when the combinator runs.
    Expr(String),
    /// Already compiled matcher.
    Matcher(Matcher),
}

impl Term {
    /// Compiles this term into a matcher.
    pub fn into_matcher(self) -> Result<Matcher> {
        match self {
            Term::Expr(expr) => Matcher::parse(&expr),
            Term::Matcher(matcher) => Ok(matcher),
        }
    }
}

impl From<&str> for Term {
    fn from(expr: &str) -> Self {
        Term::Expr(expr.to_string())
    }
}

impl From<String> for Term {
    fn from(expr: String) -> Self {
        Term::Expr(expr)
    }
}

impl From<&String> for Term {
    fn from(expr: &String) -> Self {
        Term::Expr(expr.clone())
    }
}

impl From<Matcher> for Term {
    fn from(matcher: Matcher) -> Self {
        Term::Matcher(matcher)
    }
}

impl From<&Matcher> for Term {
    fn from(matcher: &Matcher) -> Self {
        Term::Matcher(matcher.clone())
    }
}

impl From<Clause> for Term {
    fn from(clause: Clause) -> Self {
        Term::Matcher(Matcher::Clause(clause))
    }
}

fn compile_terms<I>(terms: I) -> Result<Vec<Matcher>>
where
    I: IntoIterator,
    I::Item: Into<Term>,
{
    terms
        .into_iter()
        .map(|term| term.into().into_matcher())
        .collect()
}

impl Matcher {
    /// Parses a single expression into a clause matcher.
    pub fn parse(expr: &str) -> Result<Matcher> {
        compile(expr).map(Matcher::Clause)
    }

    /// Builds a matcher from its JSON form. A malformed shape is a
    /// [`KitError::Json`]; a malformed expression inside it is a
    /// [`KitError::MatcherSyntax`].
    pub fn from_value(value: serde_json::Value) -> Result<Matcher> {
        let repr: MatcherRepr = serde_json::from_value(value)?;
        Matcher::try_from(repr)
    }

    /// AND over `terms`. An empty list matches every record.
    pub fn all<I>(terms: I) -> Result<Matcher>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        compile_terms(terms).map(Matcher::All)
    }

    /// OR over `terms`. An empty list matches no record.
    pub fn any<I>(terms: I) -> Result<Matcher>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        compile_terms(terms).map(Matcher::Any)
    }

    /// NOR over `terms`. An empty list matches every record.
    pub fn none<I>(terms: I) -> Result<Matcher>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        compile_terms(terms).map(Matcher::None)
    }

    /// Tests if a single record matches.
    pub fn is_match(&self, record: &Record) -> bool {
        match self {
            Matcher::Clause(clause) => clause.matches(record),
            Matcher::All(matchers) => matchers.iter().all(|m| m.is_match(record)),
            Matcher::Any(matchers) => matchers.iter().any(|m| m.is_match(record)),
            Matcher::None(matchers) => !matchers.iter().any(|m| m.is_match(record)),
        }
    }

    /// Filters a slice, returning references to matching records in input order.
    pub fn filter<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let kept: Vec<&'a Record> = records.iter().filter(|r| self.is_match(r)).collect();
        log::trace!("{} kept {} of {} record(s)", self, kept.len(), records.len());
        kept
    }

    /// Filters and clones matching records.
    pub fn filter_cloned(&self, records: &[Record]) -> Vec<Record> {
        self.filter(records).into_iter().cloned().collect()
    }

    /// Counts the number of matching records.
    pub fn count(&self, records: &[Record]) -> usize {
        records.iter().filter(|r| self.is_match(r)).count()
    }

    /// Returns `true` if any record matches.
    pub fn any_match(&self, records: &[Record]) -> bool {
        records.iter().any(|r| self.is_match(r))
    }

    /// Returns `true` if all records match.
    pub fn all_match(&self, records: &[Record]) -> bool {
        records.iter().all(|r| self.is_match(r))
    }

    /// Finds the first matching record.
    pub fn find<'a>(&self, records: &'a [Record]) -> Option<&'a Record> {
        records.iter().find(|r| self.is_match(r))
    }

    /// Finds the index of the first matching record.
    pub fn position(&self, records: &[Record]) -> Option<usize> {
        records.iter().position(|r| self.is_match(r))
    }

    /// Returns the clauses of this matcher, depth first.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Matcher::Clause(clause) => out.push(clause),
            Matcher::All(ms) | Matcher::Any(ms) | Matcher::None(ms) => {
                for m in ms {
                    m.collect_clauses(out);
                }
            }
        }
    }
}

impl FromStr for Matcher {
    type Err = KitError;

    fn from_str(s: &str) -> Result<Self> {
        Matcher::parse(s)
    }
}

impl From<Clause> for Matcher {
    fn from(clause: Clause) -> Self {
        Matcher::Clause(clause)
    }
}

impl fmt::Display for Matcher {
    /// Clauses render as their expression string, groups as
    /// `all(...)`, `any(...)` and `none(...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, matchers) = match self {
            Matcher::Clause(clause) => return write!(f, "{}", clause),
            Matcher::All(ms) => ("all", ms),
            Matcher::Any(ms) => ("any", ms),
            Matcher::None(ms) => ("none", ms),
        };
        write!(f, "{}(", name)?;
        for (i, m) in matchers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", m)?;
        }
        f.write_str(")")
    }
}

/// JSON shape of a matcher: an expression string, a bare array (AND), or
/// a single-key object naming the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MatcherRepr {
    Expr(String),
    List(Vec<MatcherRepr>),
    Group(GroupRepr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum GroupRepr {
    All(Vec<MatcherRepr>),
    Any(Vec<MatcherRepr>),
    None(Vec<MatcherRepr>),
}

impl TryFrom<MatcherRepr> for Matcher {
    type Error = KitError;

    fn try_from(repr: MatcherRepr) -> Result<Self> {
        let convert = |items: Vec<MatcherRepr>| -> Result<Vec<Matcher>> {
            items.into_iter().map(Matcher::try_from).collect()
        };
        match repr {
            MatcherRepr::Expr(expr) => Matcher::parse(&expr),
            MatcherRepr::List(items) => convert(items).map(Matcher::All),
            MatcherRepr::Group(GroupRepr::All(items)) => convert(items).map(Matcher::All),
            MatcherRepr::Group(GroupRepr::Any(items)) => convert(items).map(Matcher::Any),
            MatcherRepr::Group(GroupRepr::None(items)) => convert(items).map(Matcher::None),
        }
    }
}

impl From<Matcher> for MatcherRepr {
    fn from(matcher: Matcher) -> Self {
        let convert = |ms: Vec<Matcher>| ms.into_iter().map(MatcherRepr::from).collect();
        match matcher {
            Matcher::Clause(clause) => MatcherRepr::Expr(clause.to_string()),
            Matcher::All(ms) => MatcherRepr::Group(GroupRepr::All(convert(ms))),
            Matcher::Any(ms) => MatcherRepr::Group(GroupRepr::Any(convert(ms))),
            Matcher::None(ms) => MatcherRepr::Group(GroupRepr::None(convert(ms))),
        }
    }
}
