//! Trait definitions for statement builders.

use crate::dialect::Dialect;
use crate::error::QbResult;
use crate::value::Value;

/// Base contract shared by SELECT/INSERT/UPDATE/DELETE builders.
///
/// [`Statement::write_sql`] and [`Statement::collect_values`] walk the
/// statement in the same structural order; the Nth `?` in the text is bound
/// to the Nth value. Both are pure reads, so a finished builder can be
/// rendered any number of times (or from several threads) with identical
/// results.
pub trait Statement {
    /// Statement kind, used for logging (`"SELECT"`, `"INSERT"`, ...).
    const KIND: &'static str;

    /// Target dialect.
    fn dialect(&self) -> Dialect;

    /// Re-target the statement.
    fn set_dialect(&mut self, dialect: Dialect);

    /// Emit the SQL text. Does not validate.
    fn write_sql(&self, out: &mut String);

    /// Append the bound values, in placeholder order.
    fn collect_values(&self, out: &mut Vec<Value>);

    /// Check that all required parts are configured.
    fn validate(&self) -> QbResult<()>;

    /// Bound values, in placeholder order.
    fn bound_values(&self) -> Vec<Value> {
        let mut values = Vec::new();
        self.collect_values(&mut values);
        values
    }

    /// Validate and render the SQL text.
    fn serialize(&self) -> QbResult<String> {
        self.validate()?;
        Ok(self.to_sql())
    }

    /// Debug helper: render the SQL text without validating.
    fn to_sql(&self) -> String {
        let mut sql = String::with_capacity(128);
        self.write_sql(&mut sql);
        sql
    }

    /// Validate and produce the `(sql, values)` pair handed to a driver.
    fn build(&self) -> QbResult<BuiltQuery> {
        self.validate()?;
        Ok(BuiltQuery::new(self.to_sql(), self.bound_values()))
    }
}

/// The result of building a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, values: Vec<Value>) -> Self {
        Self { sql, values }
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}
