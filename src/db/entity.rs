//! Mapping between entity structs and their tables

use crate::document::DocumentValidator;
use crate::error::Result;
use chrono::NaiveDateTime;
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::types::Json;
use sqlx::{FromRow, Sqlite};
use uuid::Uuid;

/// A column value ready to be bound to a statement. `None` binds NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Uuid(Option<Uuid>),
    Text(Option<String>),
    Integer(Option<i64>),
    Real(Option<f64>),
    Bool(Option<bool>),
    Blob(Option<Vec<u8>>),
    Json(Option<serde_json::Value>),
    Timestamp(Option<NaiveDateTime>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Uuid(v) => v.is_none(),
            SqlValue::Text(v) => v.is_none(),
            SqlValue::Integer(v) => v.is_none(),
            SqlValue::Real(v) => v.is_none(),
            SqlValue::Bool(v) => v.is_none(),
            SqlValue::Blob(v) => v.is_none(),
            SqlValue::Json(v) => v.is_none(),
            SqlValue::Timestamp(v) => v.is_none(),
        }
    }
}

/// A row type persisted in a table or exposed by a view.
///
/// `COLUMNS` must list every column `values` returns, in the same order.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// Type name used in errors and logs
    const ENTITY: &'static str;

    /// Backing table or view
    const TABLE: &'static str;

    const COLUMNS: &'static [&'static str];

    const PRIMARY_KEY: &'static [&'static str] = &["id"];

    /// Set for entities mapped onto database views; every mutation is rejected
    const READ_ONLY: bool = false;

    /// Columns the database fills in; an update leaves them alone while they are NULL
    const GENERATED: &'static [&'static str] = &[];

    fn values(&self) -> Vec<(&'static str, SqlValue)>;

    /// Field rules checked before the row is queued for insert or update
    fn validate(&self, _rules: &DocumentValidator) -> Result<()> {
        Ok(())
    }

    fn has_column(column: &str) -> bool {
        Self::COLUMNS.contains(&column)
    }
}

pub(crate) fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Uuid(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Integer(v) => query.bind(v),
        SqlValue::Real(v) => query.bind(v),
        SqlValue::Bool(v) => query.bind(v),
        SqlValue::Blob(v) => query.bind(v),
        SqlValue::Json(v) => query.bind(v.map(Json)),
        SqlValue::Timestamp(v) => query.bind(v),
    }
}

pub(crate) fn bind_value_as<'q, T>(
    query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    value: SqlValue,
) -> QueryAs<'q, Sqlite, T, SqliteArguments<'q>> {
    match value {
        SqlValue::Uuid(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Integer(v) => query.bind(v),
        SqlValue::Real(v) => query.bind(v),
        SqlValue::Bool(v) => query.bind(v),
        SqlValue::Blob(v) => query.bind(v),
        SqlValue::Json(v) => query.bind(v.map(Json)),
        SqlValue::Timestamp(v) => query.bind(v),
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    SqlValue::$variant(Some(v.into()))
                }
            }

            impl From<Option<$ty>> for SqlValue {
                fn from(v: Option<$ty>) -> Self {
                    SqlValue::$variant(v.map(Into::into))
                }
            }
        )*
    };
}

impl_from_value! {
    Uuid => Uuid,
    String => Text,
    &str => Text,
    i64 => Integer,
    i32 => Integer,
    f64 => Real,
    bool => Bool,
    Vec<u8> => Blob,
    serde_json::Value => Json,
    NaiveDateTime => Timestamp,
}

impl From<Json<serde_json::Value>> for SqlValue {
    fn from(v: Json<serde_json::Value>) -> Self {
        SqlValue::Json(Some(v.0))
    }
}

impl From<Option<Json<serde_json::Value>>> for SqlValue {
    fn from(v: Option<Json<serde_json::Value>>) -> Self {
        SqlValue::Json(v.map(|j| j.0))
    }
}
