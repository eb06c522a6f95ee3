//! INSERT statement builder.

use crate::dialect::Dialect;
use crate::error::{QbError, QbResult};
use crate::qb::traits::Statement;
use crate::value::Value;
use std::fmt;

/// INSERT statement builder.
///
/// Renders `INSERT INTO table (c1, c2, ...) VALUES (?, ?, ...)`, plus
/// `RETURNING col` on dialects that support it and only when a returning
/// column was configured. Other dialects get the new id from the driver
/// instead; see [`crate::Bound::insert_id`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsertQuery {
    dialect: Dialect,
    table: Option<String>,
    values: Vec<(String, Value)>,
    returning: Option<String>,
}

impl InsertQuery {
    /// Create an empty INSERT for the generic dialect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the target table.
    pub fn into(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add a column value. Columns render in call order.
    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    /// Add a column holding `value` serialized as JSON text.
    pub fn value_json<T: serde::Serialize + ?Sized>(
        self,
        column: impl Into<String>,
        value: &T,
    ) -> QbResult<Self> {
        let json = Value::json(value)?;
        Ok(self.value(column, json))
    }

    /// Column holding the new row id (`RETURNING col` on PostgreSQL).
    pub fn returning(mut self, column: impl Into<String>) -> Self {
        self.returning = Some(column.into());
        self
    }

    /// The configured returning column, if any.
    pub fn returning_column(&self) -> Option<&str> {
        self.returning.as_deref()
    }

    /// RETURNING column actually emitted for the current dialect.
    fn emitted_returning(&self) -> Option<&str> {
        self.returning
            .as_deref()
            .filter(|_| self.dialect.supports_returning())
    }
}

impl Statement for InsertQuery {
    const KIND: &'static str = "INSERT";

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    fn write_sql(&self, out: &mut String) {
        out.push_str("INSERT INTO ");
        if let Some(table) = &self.table {
            out.push_str(table);
        }

        out.push_str(" (");
        for (i, (column, _)) in self.values.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(column);
        }
        out.push_str(") VALUES (");
        for i in 0..self.values.len() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push('?');
        }
        out.push(')');

        if let Some(column) = self.emitted_returning() {
            out.push_str(" RETURNING ");
            out.push_str(column);
        }
    }

    fn collect_values(&self, out: &mut Vec<Value>) {
        out.extend(self.values.iter().map(|(_, value)| value.clone()));
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

impl fmt::Display for InsertQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
