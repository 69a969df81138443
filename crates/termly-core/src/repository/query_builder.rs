use crate::error::CoreError;
use crate::models::EntityKind;
use crate::query::{Comparison, Operator, Predicate, Value};
use sqlx::{QueryBuilder, Sqlite};

/// Utility functions for building SQL queries from predicates
pub struct SqlQueryBuilder;

impl SqlQueryBuilder {
    /// Appends `predicate` to `qb` as a WHERE clause body for rows of `kind`.
    ///
    /// Every value becomes a bind parameter. Field names are checked against
    /// the columns of `kind` and only the known column name is written.
    pub fn build_sql_where_clause<'a>(
        kind: EntityKind,
        predicate: &Predicate,
        qb: &mut QueryBuilder<'a, Sqlite>,
    ) -> Result<(), CoreError> {
        match predicate {
            Predicate::Compare {
                field,
                comparison,
                value,
            } => {
                let column = Self::column(kind, field)?;
                Self::build_comparison_clause(column, *comparison, value, qb);
            }
            Predicate::Binary { op, left, right } => {
                qb.push("(");
                Self::build_sql_where_clause(kind, left, qb)?;
                match op {
                    Operator::And => qb.push(") AND ("),
                    Operator::Or => qb.push(") OR ("),
                };
                Self::build_sql_where_clause(kind, right, qb)?;
                qb.push(")");
            }
        }
        Ok(())
    }

    fn column(kind: EntityKind, field: &str) -> Result<&'static str, CoreError> {
        kind.columns()
            .iter()
            .copied()
            .find(|column| *column == field)
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "Unknown field '{}' for {}. Known fields: {}",
                    field,
                    kind,
                    kind.columns().join(", ")
                ))
            })
    }

    fn build_comparison_clause<'a>(
        column: &'static str,
        comparison: Comparison,
        value: &Value,
        qb: &mut QueryBuilder<'a, Sqlite>,
    ) {
        qb.push(column);
        match (comparison, value) {
            (Comparison::Equal, Value::Null) => {
                qb.push(" IS NULL");
                return;
            }
            (Comparison::NotEqual, Value::Null) => {
                qb.push(" IS NOT NULL");
                return;
            }
            // Ordering against NULL never holds.
            (_, Value::Null) => {
                qb.push(" < NULL");
                return;
            }
            // `IS NOT` so that NULL columns count as different from any value.
            (Comparison::NotEqual, _) => qb.push(" IS NOT "),
            (comparison, _) => qb.push(format!(" {} ", comparison.symbol())),
        };
        Self::push_value(value, qb);
    }

    fn push_value<'a>(value: &Value, qb: &mut QueryBuilder<'a, Sqlite>) {
        match value {
            Value::Null => qb.push("NULL"),
            Value::Integer(i) => qb.push_bind(*i),
            Value::Real(r) => qb.push_bind(*r),
            Value::Text(s) => qb.push_bind(s.clone()),
            Value::Bool(b) => qb.push_bind(*b),
            Value::Date(d) => qb.push_bind(*d),
            Value::Time(t) => qb.push_bind(*t),
            Value::DateTime(dt) => qb.push_bind(*dt),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn render(kind: EntityKind, predicate: &Predicate) -> Result<String, CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM t WHERE ");
        SqlQueryBuilder::build_sql_where_clause(kind, predicate, &mut qb)?;
        Ok(qb.sql().to_string())
    }

    #[test]
    fn values_become_bind_parameters() {
        let predicate = Predicate::and([
            Predicate::equal("name", "x'); DROP TABLE subjects; --"),
            Predicate::greater_or_equal("color_id", 3),
        ])
        .unwrap();
        let sql = render(EntityKind::Subject, &predicate).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE (name = ?) AND (color_id >= ?)");
    }

    #[test]
    fn nested_or_is_parenthesised() {
        let predicate = Predicate::and([
            Predicate::or([
                Predicate::equal("class_id", 1),
                Predicate::equal("class_id", 2),
            ])
            .unwrap(),
            Predicate::less_than("due_date", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        ])
        .unwrap();
        let sql = render(EntityKind::Assignment, &predicate).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE ((class_id = ?) OR (class_id = ?)) AND (due_date < ?)"
        );
    }

    #[test]
    fn null_uses_is_null() {
        let sql = render(EntityKind::Event, &Predicate::equal("subject_id", Value::Null)).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE subject_id IS NULL");
        let sql = render(EntityKind::Event, &Predicate::not_equal("subject_id", 4)).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE subject_id IS NOT ?");
    }

    #[test]
    fn unknown_field_is_invalid_input() {
        let err = render(EntityKind::Exam, &Predicate::equal("grade", 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("grade")));
    }
}
