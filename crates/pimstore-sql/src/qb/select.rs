//! SELECT statement builder.

use crate::dialect::Dialect;
use crate::error::{QbError, QbResult};
use crate::qb::column::ColumnExpr;
use crate::qb::condition::Condition;
use crate::qb::table::{Join, JoinKind, OrderTerm, SortDirection, TableRef};
use crate::qb::traits::Statement;
use crate::value::Value;
use std::fmt;

/// SELECT statement builder.
///
/// Clause order is fixed:
/// `SELECT [DISTINCT] cols FROM table [joins] [WHERE] [GROUP BY] [HAVING]
/// [ORDER BY] [LIMIT [OFFSET]] [FOR UPDATE]`.
///
/// Bound values follow the same order: CASE columns, the FROM table
/// (sub-selects only), each join, WHERE, then HAVING.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectQuery {
    dialect: Dialect,
    distinct: bool,
    columns: Vec<ColumnExpr>,
    table: Option<TableRef>,
    joins: Vec<Join>,
    where_cond: Condition,
    group_by: Vec<String>,
    having: Condition,
    order_by: Vec<OrderTerm>,
    limit: Option<u64>,
    offset: Option<u64>,
    for_update: bool,
}

impl SelectQuery {
    /// Create an empty SELECT for the generic dialect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target dialect, including every nested sub-select.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.set_dialect(dialect);
        self
    }

    // ==================== Columns ====================

    /// Remove duplicate rows (`SELECT DISTINCT`).
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append one output column or aggregate.
    pub fn column(mut self, col: impl Into<ColumnExpr>) -> Self {
        self.columns.push(col.into());
        self
    }

    /// Append several output columns.
    pub fn columns<C: Into<ColumnExpr>>(mut self, cols: impl IntoIterator<Item = C>) -> Self {
        self.columns.extend(cols.into_iter().map(Into::into));
        self
    }

    // ==================== FROM / JOIN ====================

    /// Set the table to select from.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Select from an aliased sub-select.
    pub fn from_subselect(self, query: SelectQuery, alias: &str) -> Self {
        self.from(TableRef::subselect(query).alias(alias))
    }

    /// Add a join. Joins render in call order.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add LEFT JOIN.
    pub fn left_join(self, table: impl Into<TableRef>, on: Condition) -> Self {
        self.join(Join::new(JoinKind::Left, table, on))
    }

    /// Add RIGHT JOIN.
    pub fn right_join(self, table: impl Into<TableRef>, on: Condition) -> Self {
        self.join(Join::new(JoinKind::Right, table, on))
    }

    /// Add INNER JOIN.
    pub fn inner_join(self, table: impl Into<TableRef>, on: Condition) -> Self {
        self.join(Join::new(JoinKind::Inner, table, on))
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Add a WHERE condition. Repeated calls are ANDed.
    pub fn filter(mut self, cond: Condition) -> Self {
        self.where_cond.push(cond);
        self
    }

    /// Add a GROUP BY column.
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Add several GROUP BY columns.
    pub fn group_by_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a HAVING condition. Repeated calls are ANDed.
    pub fn having(mut self, cond: Condition) -> Self {
        self.having.push(cond);
        self
    }

    // ==================== ORDER BY / LIMIT ====================

    /// Add an ORDER BY term.
    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderTerm::new(column, direction));
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortDirection::Asc)
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    /// Set LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET. Only emitted together with a LIMIT.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Lock the selected rows (`FOR UPDATE`). Dropped on SQLite.
    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }
}

impl Statement for SelectQuery {
    const KIND: &'static str = "SELECT";

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
        if let Some(table) = &mut self.table {
            table.set_dialect(dialect);
        }
        for join in &mut self.joins {
            join.table.set_dialect(dialect);
        }
    }

    fn write_sql(&self, out: &mut String) {
        out.push_str("SELECT ");
        if self.distinct {
            out.push_str("DISTINCT ");
        }
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            col.write_sql(out);
        }

        out.push_str(" FROM ");
        if let Some(table) = &self.table {
            table.write_sql(out);
        }

        for join in &self.joins {
            out.push(' ');
            join.write_sql(out);
        }

        if !self.where_cond.is_empty() {
            out.push_str(" WHERE ");
            self.where_cond.write_sql(out);
        }

        if !self.group_by.is_empty() {
            out.push_str(" GROUP BY ");
            out.push_str(&self.group_by.join(", "));
        }

        if !self.having.is_empty() {
            out.push_str(" HAVING ");
            self.having.write_sql(out);
        }

        if !self.order_by.is_empty() {
            out.push_str(" ORDER BY ");
            for (i, term) in self.order_by.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                term.write_sql(out);
            }
        }

        if let Some(limit) = self.limit {
            out.push_str(&format!(" LIMIT {limit}"));
            if let Some(offset) = self.offset {
                out.push_str(&format!(" OFFSET {offset}"));
            }
        }

        if self.for_update && self.dialect.supports_for_update() {
            out.push_str(" FOR UPDATE");
        }
    }

    fn collect_values(&self, out: &mut Vec<Value>) {
        for col in &self.columns {
            col.collect_values(out);
        }
        if let Some(table) = &self.table {
            table.collect_values(out);
        }
        for join in &self.joins {
            join.collect_values(out);
        }
        self.where_cond.collect_values(out);
        self.having.collect_values(out);
    }

    fn validate(&self) -> QbResult<()> {
        if self.table.is_none() {
            return Err(QbError::MissingTable(Self::KIND));
        }
        if self.columns.is_empty() {
            return Err(QbError::MissingColumns);
        }
        for col in &self.columns {
            col.validate()?;
        }
        if let Some(table) = &self.table {
            table.validate()?;
        }
        for join in &self.joins {
            join.table.validate()?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
