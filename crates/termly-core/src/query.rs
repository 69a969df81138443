//! Parameterized filter predicates.
//!
//! A [`Predicate`] is a tree of `field <comparison> value` leaves joined with
//! AND/OR. Values are never spliced into SQL text: the repository layer turns
//! each leaf into a bind parameter (see
//! [`SqlQueryBuilder`](crate::repository::query_builder::SqlQueryBuilder)),
//! and [`Predicate::matches`] evaluates the same tree against records that are
//! already in memory.

use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A value bound on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Orders two values of compatible types. `None` means the values cannot
    /// be compared (different types, or either side is `Null`).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Null, _) | (_, Value::Null) => None,
            (a, b) => a.as_number()?.partial_cmp(&b.as_number()?),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            // Display only; values reach SQL as bind parameters.
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::NotEqual => "!=",
            Comparison::LessThan => "<",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterOrEqual => ">=",
        }
    }

    fn holds(&self, left: &Value, right: &Value) -> bool {
        // NULL only ever equals NULL, mirroring `IS NULL` / `IS NOT NULL` in SQL.
        if matches!(left, Value::Null) || matches!(right, Value::Null) {
            let both_null = matches!(left, Value::Null) && matches!(right, Value::Null);
            return match self {
                Comparison::Equal => both_null,
                Comparison::NotEqual => !both_null,
                _ => false,
            };
        }
        match left.compare(right) {
            Some(ordering) => match self {
                Comparison::Equal => ordering == Ordering::Equal,
                Comparison::NotEqual => ordering != Ordering::Equal,
                Comparison::LessThan => ordering == Ordering::Less,
                Comparison::LessOrEqual => ordering != Ordering::Greater,
                Comparison::GreaterThan => ordering == Ordering::Greater,
                Comparison::GreaterOrEqual => ordering != Ordering::Less,
            },
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    fn keyword(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

/// Anything a predicate can be evaluated against without a round trip to the database.
pub trait Record {
    /// Returns the current value of `field`, or `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<Value>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Compare {
        field: String,
        comparison: Comparison,
        value: Value,
    },
    Binary {
        op: Operator,
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
}

impl Predicate {
    pub fn compare(field: impl Into<String>, comparison: Comparison, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            field: field.into(),
            comparison,
            value: value.into(),
        }
    }

    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::Equal, value)
    }

    pub fn not_equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::NotEqual, value)
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::LessThan, value)
    }

    pub fn less_or_equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::LessOrEqual, value)
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::GreaterThan, value)
    }

    pub fn greater_or_equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Comparison::GreaterOrEqual, value)
    }

    /// Conjunction of two or more predicates, folded left to right.
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Result<Self, CoreError> {
        Self::combine(Operator::And, predicates)
    }

    /// Disjunction of two or more predicates, folded left to right.
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Result<Self, CoreError> {
        Self::combine(Operator::Or, predicates)
    }

    /// Joins exactly two predicates; the infallible form of [`Predicate::and`] / [`Predicate::or`].
    pub fn binary(op: Operator, left: Predicate, right: Predicate) -> Self {
        Predicate::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn combine(op: Operator, predicates: impl IntoIterator<Item = Predicate>) -> Result<Self, CoreError> {
        let mut iter = predicates.into_iter();
        let (first, second) = match (iter.next(), iter.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => {
                return Err(CoreError::InvalidState(format!(
                    "{} needs at least two predicates",
                    op.keyword()
                )))
            }
        };
        Ok(iter.fold(Self::binary(op, first, second), |acc, next| {
            Self::binary(op, acc, next)
        }))
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::Compare {
                field,
                comparison,
                value,
            } => record
                .field(field)
                .map_or(false, |actual| comparison.holds(&actual, value)),
            Predicate::Binary { op, left, right } => match op {
                Operator::And => left.matches(record) && right.matches(record),
                Operator::Or => left.matches(record) || right.matches(record),
            },
        }
    }

    /// Every field name referenced by this predicate, in left-to-right order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Compare { field, .. } => out.push(field),
            Predicate::Binary { left, right, .. } => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare {
                field,
                comparison,
                value,
            } => write!(f, "{} {} {}", field, comparison.symbol(), value),
            Predicate::Binary { op, left, right } => {
                match left.as_ref() {
                    Predicate::Binary { op: inner, .. } if inner != op => write!(f, "({})", left)?,
                    _ => write!(f, "{}", left)?,
                }
                write!(f, " {} ", op.keyword())?;
                match right.as_ref() {
                    Predicate::Binary { .. } => write!(f, "({})", right),
                    _ => write!(f, "{}", right),
                }
            }
        }
    }
}

/// A finished filter, as produced by [`QueryBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    predicate: Predicate,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.predicate.matches(record)
    }
}

impl From<Predicate> for Query {
    fn from(predicate: Predicate) -> Self {
        Self { predicate }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.predicate.fmt(f)
    }
}

/// Accumulates filters that are ANDed together on [`build`](QueryBuilder::build).
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    filters: Vec<Predicate>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn build(self) -> Result<Query, CoreError> {
        let mut filters = self.filters.into_iter();
        let first = filters.next().ok_or_else(|| {
            CoreError::InvalidState("cannot build a query without any filters".to_string())
        })?;
        let predicate = filters.fold(first, |acc, next| Predicate::binary(Operator::And, acc, next));
        Ok(Query { predicate })
    }
}
