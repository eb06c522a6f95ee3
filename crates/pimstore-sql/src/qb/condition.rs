//! Condition trees for WHERE/HAVING/ON clauses.
//!
//! A [`Condition`] is rendered by two independent traversals: [`Condition::write_sql`]
//! emits the text with `?` placeholders and [`Condition::collect_values`] emits
//! the bound values. Both visit the tree in the same order, so the Nth `?` in
//! the text always belongs to the Nth value.
//!
//! Every node renders fully parenthesized, which keeps nested AND/OR trees
//! unambiguous regardless of operator precedence:
//!
//! ```ignore
//! use pimstore_sql::qb::{and, or, Condition};
//!
//! let cond = and([
//!     Condition::eq("col1", 42),
//!     or([Condition::eq("col2", 100), Condition::eq("col2", 101)]),
//! ]);
//! // ((col1 = ?) AND ((col2 = ?) OR (col2 = ?)))
//! ```

use crate::value::Value;

/// Comparison operator of a value or column comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Equals,
    NotEquals,
    /// `IS ?`. The operand is still a bound placeholder, not a literal `NULL`;
    /// the driver must accept a NULL parameter on the right of `IS`.
    Is,
    /// `IS NOT ?`, bound like [`CompareOp::Is`].
    IsNot,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    In,
    NotIn,
    Like,
}

impl CompareOp {
    /// The SQL token for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Equals => "=",
            CompareOp::NotEquals => "<>",
            CompareOp::Is => "IS",
            CompareOp::IsNot => "IS NOT",
            CompareOp::Less => "<",
            CompareOp::LessOrEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT IN",
            CompareOp::Like => "LIKE",
        }
    }
}

/// How the children of a [`Condition::Group`] are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    fn glue(self) -> &'static str {
        match self {
            Logic::And => " AND ",
            Logic::Or => " OR ",
        }
    }
}

/// Boolean expression tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Condition {
    /// No condition. Renders nothing; builders drop the clause keyword.
    #[default]
    Empty,

    /// `(column OP ?)`, binds `value`.
    ValueCompare {
        column: String,
        op: CompareOp,
        value: Value,
    },

    /// `(left = right)`, binds nothing.
    ColumnCompare { left: String, right: String },

    /// `(column IN (?, ?, ...))` or `NOT IN`, binds every value in order.
    ValueList {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },

    /// Children joined by AND/OR, wrapped in one pair of parentheses.
    Group { children: Vec<Condition>, logic: Logic },
}

impl Condition {
    /// Compare a column against a bound value.
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Condition::ValueCompare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Compare two columns for equality.
    pub fn columns(left: impl Into<String>, right: impl Into<String>) -> Self {
        Condition::ColumnCompare {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Equals, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::NotEquals, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Less, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::LessOrEqual, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Greater, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::GreaterOrEqual, value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Like, pattern)
    }

    /// `(column IS ?)`
    pub fn is(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Is, value)
    }

    /// `(column IS NOT ?)`
    pub fn is_not(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::IsNot, value)
    }

    /// `(column IN (?, ...))`
    pub fn in_list<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::ValueList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `(column NOT IN (?, ...))`
    pub fn not_in<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::ValueList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    /// AND group.
    pub fn and(children: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Group {
            children: children.into_iter().collect(),
            logic: Logic::And,
        }
    }

    /// OR group.
    pub fn or(children: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Group {
            children: children.into_iter().collect(),
            logic: Logic::Or,
        }
    }

    /// True when this node renders nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Empty => true,
            Condition::Group { children, .. } => children.iter().all(Condition::is_empty),
            _ => false,
        }
    }

    /// Add `child` to this condition.
    ///
    /// Appends to an existing AND group, replaces `Empty`, and otherwise wraps
    /// both sides in a new AND group.
    pub fn push(&mut self, child: Condition) {
        match self {
            Condition::Group {
                children,
                logic: Logic::And,
            } => children.push(child),
            Condition::Empty => *self = child,
            _ => {
                let current = std::mem::take(self);
                *self = Condition::and([current, child]);
            }
        }
    }

    /// Emit SQL text with `?` placeholders.
    pub fn write_sql(&self, out: &mut String) {
        match self {
            Condition::Empty => {}
            Condition::ValueCompare { column, op, .. } => {
                out.push('(');
                out.push_str(column);
                out.push(' ');
                out.push_str(op.as_str());
                out.push_str(" ?)");
            }
            Condition::ColumnCompare { left, right } => {
                out.push('(');
                out.push_str(left);
                out.push_str(" = ");
                out.push_str(right);
                out.push(')');
            }
            Condition::ValueList {
                column,
                values,
                negated,
            } => {
                // An empty list can never match (IN) or always matches (NOT IN).
                if values.is_empty() {
                    out.push_str(if *negated { "(1 = 1)" } else { "(1 = 0)" });
                    return;
                }
                out.push('(');
                out.push_str(column);
                out.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for i in 0..values.len() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('?');
                }
                out.push_str("))");
            }
            Condition::Group { children, logic } => {
                if self.is_empty() {
                    return;
                }
                out.push('(');
                let mut first = true;
                for child in children.iter().filter(|c| !c.is_empty()) {
                    if !first {
                        out.push_str(logic.glue());
                    }
                    first = false;
                    child.write_sql(out);
                }
                out.push(')');
            }
        }
    }

    /// Append bound values in placeholder order.
    pub fn collect_values(&self, out: &mut Vec<Value>) {
        match self {
            Condition::Empty | Condition::ColumnCompare { .. } => {}
            Condition::ValueCompare { value, .. } => out.push(value.clone()),
            Condition::ValueList { values, .. } => out.extend(values.iter().cloned()),
            Condition::Group { children, .. } => {
                for child in children.iter().filter(|c| !c.is_empty()) {
                    child.collect_values(out);
                }
            }
        }
    }

    /// Render this condition on its own.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    /// Bound values of this condition, in placeholder order.
    pub fn bound_values(&self) -> Vec<Value> {
        let mut out = Vec::new();
        self.collect_values(&mut out);
        out
    }
}

/// `(left = right)` between two columns.
pub fn on(left: impl Into<String>, right: impl Into<String>) -> Condition {
    Condition::columns(left, right)
}

/// `(column OP ?)`
pub fn on_value(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Condition {
    Condition::compare(column, op, value)
}

/// AND group of `children`.
pub fn and(children: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::and(children)
}

/// OR group of `children`.
pub fn or(children: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::or(children)
}
