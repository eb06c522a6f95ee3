//! Output columns: plain column references, aggregates and CASE expressions.

use crate::error::{QbError, QbResult};
use crate::qb::condition::Condition;
use crate::value::Value;

/// Aggregate function applied to a column expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Count,
    Min,
    Max,
    Avg,
}

impl Aggregate {
    fn as_str(self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Count => "COUNT",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Avg => "AVG",
        }
    }
}

/// The expression part of a [`ColumnExpr`].
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// Column reference, emitted verbatim (`col`, `t1.col`).
    Column(String),
    /// `FUNC(arg)`; a missing argument renders as `*`.
    Aggregate {
        func: Aggregate,
        arg: Option<Box<Expression>>,
    },
    /// `CASE WHEN ... THEN ... [ELSE ...] END`.
    Case(Case),
}

impl Expression {
    pub(crate) fn write_sql(&self, out: &mut String) {
        match self {
            Expression::Column(name) => out.push_str(name),
            Expression::Aggregate { func, arg } => {
                out.push_str(func.as_str());
                out.push('(');
                match arg {
                    Some(inner) => inner.write_sql(out),
                    None => out.push('*'),
                }
                out.push(')');
            }
            Expression::Case(case) => case.write_sql(out),
        }
    }

    /// Only WHEN conditions carry bound values.
    pub(crate) fn collect_values(&self, out: &mut Vec<Value>) {
        match self {
            Expression::Column(_) => {}
            Expression::Aggregate { arg, .. } => {
                if let Some(inner) = arg {
                    inner.collect_values(out);
                }
            }
            Expression::Case(case) => case.collect_values(out),
        }
    }

    pub(crate) fn validate(&self) -> QbResult<()> {
        match self {
            Expression::Column(_) => Ok(()),
            Expression::Aggregate { arg, .. } => match arg {
                Some(inner) => inner.validate(),
                None => Ok(()),
            },
            Expression::Case(case) if case.branches.is_empty() => Err(QbError::EmptyCase),
            Expression::Case(_) => Ok(()),
        }
    }
}

/// A searched CASE expression.
///
/// WHEN conditions are bound like any other condition. THEN and ELSE results
/// are emitted verbatim, so they must be literals or column names:
///
/// ```ignore
/// // SUM(CASE WHEN (flags.name = ?) THEN 1 ELSE 0 END)
/// qb::sum(qb::case_when(Condition::eq("flags.name", "\\Seen"), "1").otherwise("0"))
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Case {
    branches: Vec<(Condition, String)>,
    otherwise: Option<String>,
}

impl Case {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `WHEN cond THEN result` branch. Branches render in call order.
    pub fn when(mut self, cond: Condition, result: impl Into<String>) -> Self {
        self.branches.push((cond, result.into()));
        self
    }

    /// Set the `ELSE` result.
    pub fn otherwise(mut self, result: impl Into<String>) -> Self {
        self.otherwise = Some(result.into());
        self
    }

    fn write_sql(&self, out: &mut String) {
        out.push_str("CASE");
        for (cond, result) in &self.branches {
            out.push_str(" WHEN ");
            cond.write_sql(out);
            out.push_str(" THEN ");
            out.push_str(result);
        }
        if let Some(result) = &self.otherwise {
            out.push_str(" ELSE ");
            out.push_str(result);
        }
        out.push_str(" END");
    }

    fn collect_values(&self, out: &mut Vec<Value>) {
        for (cond, _) in &self.branches {
            cond.collect_values(out);
        }
    }
}

impl From<Case> for ColumnExpr {
    fn from(case: Case) -> Self {
        Self {
            expr: Expression::Case(case),
            alias: None,
        }
    }
}

/// A SELECT list entry: an expression with an optional `AS` alias.
///
/// Plain columns and aggregates share this type so a column list can mix
/// them freely:
///
/// ```ignore
/// qb::select()
///     .column("col1")
///     .column(qb::count().alias("cnt"))
///     .from("table");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnExpr {
    expr: Expression,
    alias: Option<String>,
}

impl ColumnExpr {
    /// A plain column reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            expr: Expression::Column(name.into()),
            alias: None,
        }
    }

    /// Wrap `arg` in an aggregate function. Any alias on `arg` is dropped,
    /// only its expression ends up inside the parentheses.
    pub fn aggregate(func: Aggregate, arg: Option<ColumnExpr>) -> Self {
        Self {
            expr: Expression::Aggregate {
                func,
                arg: arg.map(|c| Box::new(c.expr)),
            },
            alias: None,
        }
    }

    /// Set the output alias (`expr AS alias`).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        self.expr.write_sql(out);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            out.push_str(alias);
        }
    }

    pub(crate) fn collect_values(&self, out: &mut Vec<Value>) {
        self.expr.collect_values(out);
    }

    pub(crate) fn validate(&self) -> QbResult<()> {
        self.expr.validate()
    }

    /// Bound values of this column, in placeholder order.
    pub fn bound_values(&self) -> Vec<Value> {
        let mut out = Vec::new();
        self.collect_values(&mut out);
        out
    }

    /// Render this column on its own.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }
}

impl From<&str> for ColumnExpr {
    fn from(name: &str) -> Self {
        ColumnExpr::new(name)
    }
}

impl From<String> for ColumnExpr {
    fn from(name: String) -> Self {
        ColumnExpr::new(name)
    }
}

/// A plain column reference.
pub fn column(name: impl Into<String>) -> ColumnExpr {
    ColumnExpr::new(name)
}

/// `SUM(arg)`
pub fn sum(arg: impl Into<ColumnExpr>) -> ColumnExpr {
    ColumnExpr::aggregate(Aggregate::Sum, Some(arg.into()))
}

/// `COUNT(*)`
pub fn count() -> ColumnExpr {
    ColumnExpr::aggregate(Aggregate::Count, None)
}

/// `COUNT(arg)`
pub fn count_of(arg: impl Into<ColumnExpr>) -> ColumnExpr {
    ColumnExpr::aggregate(Aggregate::Count, Some(arg.into()))
}

/// `MIN(arg)`
pub fn min(arg: impl Into<ColumnExpr>) -> ColumnExpr {
    ColumnExpr::aggregate(Aggregate::Min, Some(arg.into()))
}

/// `MAX(arg)`
pub fn max(arg: impl Into<ColumnExpr>) -> ColumnExpr {
    ColumnExpr::aggregate(Aggregate::Max, Some(arg.into()))
}

/// `AVG(arg)`
pub fn avg(arg: impl Into<ColumnExpr>) -> ColumnExpr {
    ColumnExpr::aggregate(Aggregate::Avg, Some(arg.into()))
}

/// `CASE WHEN cond THEN result ... END`, with one branch to start from.
pub fn case_when(cond: Condition, result: impl Into<String>) -> Case {
    Case::new().when(cond, result)
}
