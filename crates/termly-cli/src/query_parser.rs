use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_english::Dialect;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::PrattParser;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use termly_core::models::DayOfWeek;
use termly_core::query::{Comparison, Operator, Predicate, Query, Value};

use crate::parser::{parse_date, parse_date_time, parse_time};

#[derive(Parser)]
#[grammar = "filter.pest"]
pub struct FilterParser;

lazy_static::lazy_static! {
    static ref PRATT_PARSER: PrattParser<Rule> = {
        use pest::pratt_parser::{Assoc::*, Op};
        use Rule::*;

        PrattParser::new()
            .op(Op::infix(or, Left))
            .op(Op::infix(and, Left))
    };
}

#[derive(Error, Debug)]
pub enum QueryParseError {
    #[error("Pest parsing error: {0}")]
    Pest(#[from] Box<pest::error::Error<Rule>>),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Unknown rule: {0:?}")]
    UnknownRule(Rule),
}

/// Reference point and dialect for relative dates such as `tomorrow`.
#[derive(Debug, Clone, Copy)]
pub struct DateContext {
    pub now: NaiveDateTime,
    pub dialect: Dialect,
}

fn build_ast(pairs: Pairs<Rule>, ctx: DateContext) -> Result<Predicate, QueryParseError> {
    PRATT_PARSER
        .map_primary(|primary| match primary.as_rule() {
            Rule::filter_expression => build_filter(primary, ctx),
            Rule::expression => build_ast(primary.into_inner(), ctx),
            rule => Err(QueryParseError::UnknownRule(rule)),
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::and => Operator::And,
                Rule::or => Operator::Or,
                rule => return Err(QueryParseError::UnknownRule(rule)),
            };
            Ok(Predicate::binary(op, lhs?, rhs?))
        })
        .parse(pairs)
}

fn build_filter(pair: Pair<Rule>, ctx: DateContext) -> Result<Predicate, QueryParseError> {
    let mut inner = pair.into_inner();
    let (key, comparison, value) = match (inner.next(), inner.next(), inner.next()) {
        (Some(key), Some(comparison), Some(value)) => (key, comparison, value),
        _ => return Err(QueryParseError::UnknownRule(Rule::filter_expression)),
    };

    let key = key.as_str();
    let comparison = match comparison.as_str() {
        "=" | ":" => Comparison::Equal,
        "!=" => Comparison::NotEqual,
        "<" => Comparison::LessThan,
        "<=" => Comparison::LessOrEqual,
        ">" => Comparison::GreaterThan,
        _ => Comparison::GreaterOrEqual,
    };
    let (raw, quoted) = match value.as_rule() {
        Rule::quoted_value => (
            value.into_inner().next().map_or("", |inner| inner.as_str()),
            true,
        ),
        _ => (value.as_str(), false),
    };

    let value = typed_value(key, raw, quoted, ctx).map_err(|e| QueryParseError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok(Predicate::compare(key, comparison, value))
}

/// Types a raw filter value. Date and time columns are recognised by name and
/// accept the same input as the `add` commands; other values are typed by shape.
fn typed_value(key: &str, raw: &str, quoted: bool, ctx: DateContext) -> anyhow::Result<Value> {
    if key.ends_with("date_time") {
        return Ok(parse_date_time(raw, ctx.now, ctx.dialect)?.into());
    }
    if key == "date" || key.ends_with("_date") {
        return Ok(parse_date(raw, ctx.now, ctx.dialect)?.into());
    }
    if key.ends_with("_time") {
        return Ok(parse_time(raw)?.into());
    }
    if key == "day" {
        let day: DayOfWeek = raw.parse()?;
        return Ok(day.as_str().into());
    }
    if quoted {
        return Ok(raw.into());
    }

    let value = match raw.to_lowercase().as_str() {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Value::Integer(i)
            } else if let Ok(r) = raw.parse::<f64>() {
                Value::Real(r)
            } else if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Value::Date(d)
            } else if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M") {
                Value::Time(t)
            } else {
                Value::Text(raw.to_string())
            }
        }
    };
    Ok(value)
}

pub fn parse_query(input: &str, ctx: DateContext) -> Result<Query, QueryParseError> {
    let pairs = FilterParser::parse(Rule::filter_query, input)
        .map_err(Box::new)?
        .next()
        .and_then(|query| query.into_inner().next())
        .ok_or(QueryParseError::UnknownRule(Rule::filter_query))?;
    build_ast(pairs.into_inner(), ctx).map(Query::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DateContext {
        DateContext {
            now: NaiveDate::from_ymd_opt(2024, 6, 10)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            dialect: Dialect::Uk,
        }
    }

    #[test]
    fn simple_equality() {
        let query = parse_query("class_id=3", ctx()).unwrap();
        assert_eq!(query.predicate(), &Predicate::equal("class_id", 3));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let query = parse_query("a=1 or b=2 and c=3", ctx()).unwrap();
        assert_eq!(query.to_string(), "a = 1 OR (b = 2 AND c = 3)");
    }

    #[test]
    fn parentheses_group() {
        let query = parse_query("(a=1 or b=2) and title:\"Lab report\"", ctx()).unwrap();
        assert_eq!(query.to_string(), "(a = 1 OR b = 2) AND title = 'Lab report'");
    }

    #[test]
    fn dates_are_typed_by_column() {
        let query = parse_query("due_date<=tomorrow", ctx()).unwrap();
        assert_eq!(
            query.predicate(),
            &Predicate::less_or_equal("due_date", NaiveDate::from_ymd_opt(2024, 6, 11).unwrap())
        );
        let query = parse_query("day=mon", ctx()).unwrap();
        assert_eq!(query.predicate(), &Predicate::equal("day", "monday"));
    }

    #[test]
    fn bare_values_are_typed_by_shape() {
        let query = parse_query("subject_id!=null and resit=true and name=Maths", ctx()).unwrap();
        assert_eq!(
            query.to_string(),
            "subject_id != NULL AND resit = true AND name = 'Maths'"
        );
    }

    #[test]
    fn keywords_need_a_boundary() {
        assert!(parse_query("a=1 andy=2", ctx()).is_err());
        assert!(parse_query("a=1 AND andy=2", ctx()).is_ok());
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(parse_query("", ctx()).is_err());
        assert!(parse_query("a=", ctx()).is_err());
        assert!(matches!(
            parse_query("due_date=whenever", ctx()),
            Err(QueryParseError::InvalidValue { .. })
        ));
    }
}
