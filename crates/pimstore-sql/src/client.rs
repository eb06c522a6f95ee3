//! Execution context trait for running built statements.

use crate::dialect::Dialect;
use crate::error::QbResult;
use crate::value::Value;

/// A database connection able to run rendered statements.
///
/// Statements arrive with `?` placeholders in the order of `values`;
/// drivers whose wire protocol uses another placeholder style must rewrite
/// them (see `postgres::renumber_placeholders`).
pub trait Driver: Send + Sync {
    /// Backend flavour of this connection.
    fn dialect(&self) -> Dialect;

    /// Run `sql` with `values` bound positionally and return the full result.
    fn execute(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl std::future::Future<Output = QbResult<ResultSet>> + Send;

    /// Auto-increment id produced by the last INSERT on this connection.
    ///
    /// Backends that report new ids through `RETURNING` return `None`.
    fn last_insert_id(&self) -> Option<i64>;
}

/// Rows and counters returned by [`Driver::execute`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Output column names, in order.
    pub columns: Vec<String>,
    /// Result rows; each row has one value per column.
    pub rows: Vec<Vec<Value>>,
    /// Rows inserted, updated or deleted (or returned, for queries).
    pub rows_affected: u64,
}

impl ResultSet {
    /// Result of a statement that produced no rows.
    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    /// Value of `column` in row `row`.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Position of `column` among the output columns.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn first_row(&self) -> Option<&[Value]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
