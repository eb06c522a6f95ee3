//! Table references, joins and ORDER BY terms.

use crate::dialect::Dialect;
use crate::error::QbResult;
use crate::qb::condition::Condition;
use crate::qb::select::SelectQuery;
use crate::qb::traits::Statement;
use crate::value::Value;

/// What a [`TableRef`] points at.
#[derive(Clone, Debug, PartialEq)]
pub enum TableSource {
    /// A table by name.
    Named(String),
    /// An inline sub-select, rendered in parentheses.
    Subselect(Box<SelectQuery>),
}

/// A table or sub-select with an optional alias.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRef {
    source: TableSource,
    alias: Option<String>,
}

impl TableRef {
    /// Reference a table by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            source: TableSource::Named(name.into()),
            alias: None,
        }
    }

    /// Use a SELECT as a table.
    pub fn subselect(query: SelectQuery) -> Self {
        Self {
            source: TableSource::Subselect(Box::new(query)),
            alias: None,
        }
    }

    /// Set the alias (`table AS alias`).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn source(&self) -> &TableSource {
        &self.source
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match &self.source {
            TableSource::Named(name) => out.push_str(name),
            TableSource::Subselect(query) => {
                out.push('(');
                query.write_sql(out);
                out.push(')');
            }
        }
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            out.push_str(alias);
        }
    }

    /// Only a sub-select carries bound values.
    pub(crate) fn collect_values(&self, out: &mut Vec<Value>) {
        if let TableSource::Subselect(query) = &self.source {
            query.collect_values(out);
        }
    }

    /// A sub-select must itself be complete.
    pub(crate) fn validate(&self) -> QbResult<()> {
        match &self.source {
            TableSource::Named(_) => Ok(()),
            TableSource::Subselect(query) => query.validate(),
        }
    }

    pub(crate) fn set_dialect(&mut self, dialect: Dialect) {
        if let TableSource::Subselect(query) = &mut self.source {
            query.set_dialect(dialect);
        }
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::named(name)
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::named(name)
    }
}

impl From<SelectQuery> for TableRef {
    fn from(query: SelectQuery) -> Self {
        TableRef::subselect(query)
    }
}

/// Reference a table by name.
pub fn table(name: impl Into<String>) -> TableRef {
    TableRef::named(name)
}

/// JOIN flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN ",
            JoinKind::Right => "RIGHT JOIN ",
            JoinKind::Inner => "INNER JOIN ",
        }
    }
}

/// `<KIND> JOIN <table> ON <condition>`
#[derive(Clone, Debug, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: Condition,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<TableRef>, on: Condition) -> Self {
        Self {
            kind,
            table: table.into(),
            on,
        }
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(self.kind.keyword());
        self.table.write_sql(out);
        if !self.on.is_empty() {
            out.push_str(" ON ");
            self.on.write_sql(out);
        }
    }

    /// Table values first, then the ON condition.
    pub(crate) fn collect_values(&self, out: &mut Vec<Value>) {
        self.table.collect_values(out);
        self.on.collect_values(out);
    }
}

/// Sort direction of an ORDER BY term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// `<column> <ASC|DESC>`. Never parameterized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderTerm {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(&self.column);
        out.push(' ');
        out.push_str(self.direction.as_str());
    }
}
