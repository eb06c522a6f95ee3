//! PostgreSQL backend on top of `tokio-postgres`.
//!
//! Built statements use `?` placeholders; PostgreSQL expects `$1, $2, ...`.
//! [`renumber_placeholders`] rewrites them before the statement is prepared.
//! Parameter encoding is chosen from the column type reported by the server,
//! so an `Int` value can be bound to an `INT8` column and a timestamp string
//! to a `TIMESTAMP` column.

use crate::client::{Driver, ResultSet};
use crate::dialect::Dialect;
use crate::error::QbResult;
use crate::value::{TIMESTAMP_FORMAT, Value};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::error::Error;
use tokio_postgres::GenericClient;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};

type BoxError = Box<dyn Error + Sync + Send>;

/// Rewrite `?` placeholders to `$1, $2, ...`, leaving single-quoted
/// literals untouched.
pub fn renumber_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0usize;
    let mut in_literal = false;
    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                n += 1;
                out.push('$');
                out.push_str(&n.to_string());
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Largest integer magnitude an `f64` holds exactly.
const F64_EXACT_INT: u64 = 1 << 53;

/// Narrowing to INT2/INT4/FLOAT8 fails instead of losing digits.
fn encode_integer(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql_checked(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql_checked(ty, out),
        Type::FLOAT8 if v.unsigned_abs() <= F64_EXACT_INT => (v as f64).to_sql_checked(ty, out),
        Type::FLOAT8 => Err(format!("integer {v} is not exactly representable as {ty}").into()),
        _ => v.to_sql_checked(ty, out),
    }
}

/// A FLOAT4 column only takes doubles that survive the round trip through `f32`.
fn encode_double(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => {
            let narrowed = v as f32;
            if f64::from(narrowed) == v || v.is_nan() {
                narrowed.to_sql_checked(ty, out)
            } else {
                Err(format!("double {v} is not exactly representable as {ty}").into())
            }
        }
        _ => v.to_sql_checked(ty, out),
    }
}

fn encode_text(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::TIMESTAMP => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?.to_sql_checked(ty, out),
        Type::TIMESTAMPTZ => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?
            .and_utc()
            .to_sql_checked(ty, out),
        Type::JSON | Type::JSONB => {
            serde_json::from_str::<serde_json::Value>(s)?.to_sql_checked(ty, out)
        }
        _ => s.to_sql_checked(ty, out),
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Int(v) => encode_integer(i64::from(*v), ty, out),
            Value::BigInt(v) => encode_integer(*v, ty, out),
            Value::Double(v) => encode_double(*v, ty, out),
            Value::String(s) => encode_text(s, ty, out),
            Value::Bytes(b) => b.as_slice().to_sql_checked(ty, out),
            Value::Bool(b) => b.to_sql_checked(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::BYTEA
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::JSON
                | Type::JSONB
        ) || <&str as ToSql>::accepts(ty)
    }

    tokio_postgres::types::to_sql_checked!();
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => Value::Int(i32::from(i16::from_sql(ty, raw)?)),
            Type::INT4 => Value::Int(i32::from_sql(ty, raw)?),
            Type::INT8 => Value::BigInt(i64::from_sql(ty, raw)?),
            Type::OID => Value::BigInt(i64::from(u32::from_sql(ty, raw)?)),
            Type::FLOAT4 => Value::Double(f64::from(f32::from_sql(ty, raw)?)),
            Type::FLOAT8 => Value::Double(f64::from_sql(ty, raw)?),
            Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::from(NaiveDateTime::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => Value::from(DateTime::<Utc>::from_sql(ty, raw)?),
            Type::JSON | Type::JSONB => {
                Value::String(serde_json::Value::from_sql(ty, raw)?.to_string())
            }
            _ => Value::String(String::from_sql(ty, raw)?),
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::OID
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::BYTEA
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::JSON
                | Type::JSONB
        ) || <String as FromSql>::accepts(ty)
    }
}

/// Prepare, bind and run `sql`, collecting the rows into a [`ResultSet`].
async fn run<C>(client: &C, sql: &str, values: &[Value]) -> QbResult<ResultSet>
where
    C: GenericClient + Sync,
{
    let sql = renumber_placeholders(sql);
    let params: Vec<&(dyn ToSql + Sync)> = values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
    let stmt = client.prepare(&sql).await?;

    if stmt.columns().is_empty() {
        let rows_affected = client.execute(&stmt, &params).await?;
        return Ok(ResultSet::affected(rows_affected));
    }

    let columns = stmt.columns().iter().map(|c| c.name().to_string()).collect();
    let rows = client
        .query(&stmt, &params)
        .await?
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|i| row.try_get::<_, Value>(i))
                .collect::<Result<Vec<Value>, _>>()
        })
        .collect::<Result<Vec<Vec<Value>>, _>>()?;

    Ok(ResultSet {
        columns,
        rows_affected: rows.len() as u64,
        rows,
    })
}

impl Driver for tokio_postgres::Client {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> QbResult<ResultSet> {
        run(self, sql, values).await
    }

    /// Always `None`: new ids come back through `RETURNING`.
    fn last_insert_id(&self) -> Option<i64> {
        None
    }
}

impl Driver for tokio_postgres::Transaction<'_> {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> QbResult<ResultSet> {
        run(self, sql, values).await
    }

    fn last_insert_id(&self) -> Option<i64> {
        None
    }
}
