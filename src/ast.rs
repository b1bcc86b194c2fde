//! Parse tree of a PQL statement.
//!
//! A statement is a `Vec<Node>`; at the top level the list is an implicit conjunction.

use serde::{Deserialize, Serialize};

/// A single node of the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `and(n1, n2, ...)`
    And(Vec<Node>),
    /// `or(n1, n2, ...)`
    Or(Vec<Node>),
    /// `not(n)`
    Not(Box<Node>),
    /// `eq(field, value)`
    Eq { field: String, value: Term },
    /// `in(field, v1, v2, ...)`
    In { field: String, values: Vec<Term> },
    /// `ne|gt|ge|lt|le(field, value)`
    Compare { op: CompOp, field: String, value: Term },
    /// `exists(field)`
    Exists(String),
    /// `missing(field)`
    Missing(String),
    /// `select(*)` or `select(f1, f2, ...)`
    Select(Vec<String>),
    /// `facets(*)` or `facets(f1, f2, ...)`
    Facets(Vec<String>),
    /// `sort(+f1, -f2, ...)`
    Sort(Vec<SortField>),
    /// `limit(size)` or `limit(from, size)`
    Limit(Limit),
    /// `count()`, carrying the rest of the statement as children
    Count(Vec<Node>),
}

impl Node {
    /// The operator name as written in PQL.
    pub fn name(&self) -> &'static str {
        match self {
            Node::And(_) => "and",
            Node::Or(_) => "or",
            Node::Not(_) => "not",
            Node::Eq { .. } => "eq",
            Node::In { .. } => "in",
            Node::Compare { op, .. } => op.name(),
            Node::Exists(_) => "exists",
            Node::Missing(_) => "missing",
            Node::Select(_) => "select",
            Node::Facets(_) => "facets",
            Node::Sort(_) => "sort",
            Node::Limit(_) => "limit",
            Node::Count(_) => "count",
        }
    }
}

/// Comparison operators that PQL supports beyond equality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompOp {
    pub fn name(self) -> &'static str {
        match self {
            CompOp::Ne => "ne",
            CompOp::Gt => "gt",
            CompOp::Ge => "ge",
            CompOp::Lt => "lt",
            CompOp::Le => "le",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ne" => Some(CompOp::Ne),
            "gt" => Some(CompOp::Gt),
            "ge" => Some(CompOp::Ge),
            "lt" => Some(CompOp::Lt),
            "le" => Some(CompOp::Le),
            _ => None,
        }
    }
}

/// A primitive value: quoted text or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    Number(serde_json::Number),
    Text(String),
}

impl Term {
    /// Empty text counts as "no term" for the add/exclude mutators.
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Text(s) if s.is_empty())
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::Text(value.to_string())
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::Text(value)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Number(value.into())
    }
}

impl From<i32> for Term {
    fn from(value: i32) -> Self {
        Term::Number(value.into())
    }
}

impl From<u32> for Term {
    fn from(value: u32) -> Self {
        Term::Number(value.into())
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        // NaN and infinities have no PQL spelling
        match serde_json::Number::from_f64(value) {
            Some(n) => Term::Number(n),
            None => Term::Text(value.to_string()),
        }
    }
}

/// Sort direction, written as a `+`/`-` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+")]
    Asc,
    #[serde(rename = "-")]
    Desc,
}

impl Direction {
    pub fn symbol(self) -> char {
        match self {
            Direction::Asc => '+',
            Direction::Desc => '-',
        }
    }
}

/// One entry of a `sort(...)` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub direction: Direction,
}

impl SortField {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: Direction::Asc }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: Direction::Desc }
    }
}

/// Paging window. `from` is 1-based.
///
/// Both values are kept as supplied by the caller and only truncated to
/// non-negative integers when printed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl Limit {
    pub fn size(size: f64) -> Self {
        Self { from: None, size: Some(size) }
    }

    pub fn from_size(from: f64, size: f64) -> Self {
        Self { from: Some(from), size: Some(size) }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.size.is_none()
    }
}
