//! Statement builders for the PIM store schema.
//!
//! Each builder accumulates the parts of one SQL statement and renders it as
//! text with positional `?` placeholders plus the ordered list of values to
//! bind to them.
//!
//! # Features
//!
//! - **Condition trees**: nested AND/OR groups, column-to-column comparisons and IN lists
//! - **Placeholder order is structural**: values are collected by the same walk that emits the text
//! - **Sub-selects**: any SELECT can be used as a table or join target
//! - **CASE columns**: `CASE WHEN` expressions as columns or aggregate arguments
//! - **Dialect aware**: `RETURNING` and `FOR UPDATE` follow the target backend
//!
//! # Usage
//!
//! ```
//! use pimstore_sql::Value;
//! use pimstore_sql::qb::{self, Condition, Statement, count, on, table};
//!
//! let q = qb::select()
//!     .column("c.name")
//!     .column(count().alias("items"))
//!     .from(table("collections").alias("c"))
//!     .left_join(table("pimitems").alias("i"), on("i.collection_id", "c.id"))
//!     .filter(Condition::eq("c.resource_id", 3))
//!     .group_by("c.name");
//!
//! assert_eq!(
//!     q.serialize().unwrap(),
//!     "SELECT c.name, COUNT(*) AS items FROM collections AS c \
//!      LEFT JOIN pimitems AS i ON (i.collection_id = c.id) \
//!      WHERE (c.resource_id = ?) GROUP BY c.name"
//! );
//! assert_eq!(q.bound_values(), vec![Value::Int(3)]);
//! ```

mod column;
mod condition;
mod delete;
mod insert;
mod select;
mod table;
mod traits;
mod update;

pub use column::{
    Aggregate, Case, ColumnExpr, Expression, avg, case_when, column, count, count_of, max, min, sum,
};
pub use condition::{CompareOp, Condition, Logic, and, on, on_value, or};
pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use table::{Join, JoinKind, OrderTerm, SortDirection, TableRef, TableSource, table};
pub use traits::{BuiltQuery, Statement};
pub use update::UpdateQuery;

use crate::dialect::Dialect;

/// Create a SELECT builder for the generic dialect.
pub fn select() -> SelectQuery {
    SelectQuery::new()
}

/// Create a SELECT builder targeting `dialect`.
pub fn select_with_dialect(dialect: Dialect) -> SelectQuery {
    SelectQuery::new().with_dialect(dialect)
}

/// Create an INSERT builder for the generic dialect.
///
/// # Example
/// ```
/// use pimstore_sql::qb::{self, Statement};
///
/// let q = qb::insert().into("flags").value("name", "\\Seen");
/// assert_eq!(q.to_sql(), "INSERT INTO flags (name) VALUES (?)");
/// ```
pub fn insert() -> InsertQuery {
    InsertQuery::new()
}

/// Create an INSERT builder targeting `dialect`.
pub fn insert_with_dialect(dialect: Dialect) -> InsertQuery {
    InsertQuery::new().with_dialect(dialect)
}

/// Create an UPDATE builder for the generic dialect.
pub fn update() -> UpdateQuery {
    UpdateQuery::new()
}

/// Create an UPDATE builder targeting `dialect`.
pub fn update_with_dialect(dialect: Dialect) -> UpdateQuery {
    UpdateQuery::new().with_dialect(dialect)
}

/// Create a DELETE builder for the generic dialect.
///
/// A DELETE without `.filter(...)` removes every row of the table.
pub fn delete() -> DeleteQuery {
    DeleteQuery::new()
}

/// Create a DELETE builder targeting `dialect`.
pub fn delete_with_dialect(dialect: Dialect) -> DeleteQuery {
    DeleteQuery::new().with_dialect(dialect)
}
