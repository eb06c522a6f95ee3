//! UPDATE statement builder.

use crate::dialect::Dialect;
use crate::error::{QbError, QbResult};
use crate::qb::condition::Condition;
use crate::qb::traits::Statement;
use crate::value::Value;
use std::fmt;

/// UPDATE statement builder.
///
/// Renders `UPDATE table SET c1 = ?, c2 = ? [WHERE ...]`. SET values are
/// bound before the WHERE values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateQuery {
    dialect: Dialect,
    table: Option<String>,
    values: Vec<(String, Value)>,
    where_cond: Condition,
}

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set a column. Assignments render in call order.
    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    /// Set a column to `value` serialized as JSON text.
    pub fn value_json<T: serde::Serialize + ?Sized>(
        self,
        column: impl Into<String>,
        value: &T,
    ) -> QbResult<Self> {
        let json = Value::json(value)?;
        Ok(self.value(column, json))
    }

    /// Add a WHERE condition. Repeated calls are ANDed.
    pub fn filter(mut self, cond: Condition) -> Self {
        self.where_cond.push(cond);
        self
    }
}

impl Statement for UpdateQuery {
    const KIND: &'static str = "UPDATE";

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    fn write_sql(&self, out: &mut String) {
        out.push_str("UPDATE ");
        if let Some(table) = &self.table {
            out.push_str(table);
        }
        out.push_str(" SET ");
        for (i, (column, _)) in self.values.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(column);
            out.push_str(" = ?");
        }

        if !self.where_cond.is_empty() {
            out.push_str(" WHERE ");
            self.where_cond.write_sql(out);
        }
    }

    fn collect_values(&self, out: &mut Vec<Value>) {
        out.extend(self.values.iter().map(|(_, value)| value.clone()));
        self.where_cond.collect_values(out);
    }

    fn validate(&self) -> QbResult<()> {
        if self.table.is_none() {
            return Err(QbError::MissingTable(Self::KIND));
        }
        if self.values.is_empty() {
            return Err(QbError::MissingValues(Self::KIND));
        }
        Ok(())
    }
}

impl fmt::Display for UpdateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
