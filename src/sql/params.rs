//! Typed values bound to PostgreSQL placeholders.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs};
use sqlx::Postgres;

/// A value that can be bound to a PostgreSQL query.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Text(s)
    }
}

impl From<Option<String>> for BindValue {
    fn from(s: Option<String>) -> Self {
        s.map(BindValue::Text).unwrap_or(BindValue::Null)
    }
}

impl From<bool> for BindValue {
    fn from(b: bool) -> Self {
        BindValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for BindValue {
    fn from(t: DateTime<Utc>) -> Self {
        BindValue::Timestamp(t)
    }
}

pub fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: &'q BindValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        BindValue::Null => query.bind(Option::<String>::None),
        BindValue::Bool(b) => query.bind(*b),
        BindValue::Text(s) => query.bind(s.as_str()),
        BindValue::Timestamp(t) => query.bind(*t),
    }
}

pub fn bind_value_as<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    value: &'q BindValue,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        BindValue::Null => query.bind(Option::<String>::None),
        BindValue::Bool(b) => query.bind(*b),
        BindValue::Text(s) => query.bind(s.as_str()),
        BindValue::Timestamp(t) => query.bind(*t),
    }
}
