//! DELETE statement builder.

use crate::dialect::Dialect;
use crate::error::{QbError, QbResult};
use crate::qb::condition::Condition;
use crate::qb::traits::Statement;
use crate::value::Value;
use std::fmt;

/// DELETE statement builder: `DELETE FROM table [WHERE ...]`.
///
/// A DELETE without conditions removes every row; nothing guards against it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteQuery {
    dialect: Dialect,
    table: Option<String>,
    where_cond: Condition,
}

impl DeleteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the target table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Alias for [`DeleteQuery::from`].
    pub fn table(self, table: impl Into<String>) -> Self {
        self.from(table)
    }

    /// Add a WHERE condition. Repeated calls are ANDed.
    pub fn filter(mut self, cond: Condition) -> Self {
        self.where_cond.push(cond);
        self
    }
}

impl Statement for DeleteQuery {
    const KIND: &'static str = "DELETE";

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    fn write_sql(&self, out: &mut String) {
        out.push_str("DELETE FROM ");
        if let Some(table) = &self.table {
            out.push_str(table);
        }
        if !self.where_cond.is_empty() {
            out.push_str(" WHERE ");
            self.where_cond.write_sql(out);
        }
    }

    fn collect_values(&self, out: &mut Vec<Value>) {
        self.where_cond.collect_values(out);
    }

    fn validate(&self) -> QbResult<()> {
        if self.table.is_none() {
            return Err(QbError::MissingTable(Self::KIND));
        }
        Ok(())
    }
}

impl fmt::Display for DeleteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
