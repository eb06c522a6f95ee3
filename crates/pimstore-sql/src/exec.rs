//! Statements bound to a connection.
//!
//! [`Bound`] ties a builder to a [`Driver`]: it re-targets the statement to
//! the driver's dialect, builds it, logs it and runs it. For INSERTs it also
//! reconciles how the new row id is obtained, which differs per backend.
//!
//! ```ignore
//! let insert = qb::insert()
//!     .into("pimitems")
//!     .value("remote_id", "42")
//!     .returning("id");
//! let mut bound = Bound::new(&client, insert);
//! bound.exec().await?;
//! let id = bound.insert_id();
//! ```

use crate::client::{Driver, ResultSet};
use crate::error::QbResult;
use crate::log::SqlLogConfig;
use crate::qb::{InsertQuery, Statement};

/// A statement bound to a driver, plus the result of its last execution.
pub struct Bound<'a, D: Driver, S: Statement> {
    driver: &'a D,
    statement: S,
    log: SqlLogConfig,
    result: Option<ResultSet>,
}

impl<'a, D: Driver, S: Statement> Bound<'a, D, S> {
    /// Bind `statement` to `driver`, switching it to the driver's dialect.
    pub fn new(driver: &'a D, mut statement: S) -> Self {
        statement.set_dialect(driver.dialect());
        Self {
            driver,
            statement,
            log: SqlLogConfig::default(),
            result: None,
        }
    }

    /// Replace the logging configuration.
    pub fn with_log_config(mut self, config: SqlLogConfig) -> Self {
        self.log = config;
        self
    }

    pub fn statement(&self) -> &S {
        &self.statement
    }

    /// Build and run the statement.
    ///
    /// Builder misuse is reported before the driver is touched. Driver
    /// errors are returned unchanged. Each call runs the statement again and
    /// replaces the stored result.
    pub async fn exec(&mut self) -> QbResult<&ResultSet> {
        let built = self.statement.build()?;
        let dialect = self.statement.dialect();
        self.log.statement(S::KIND, dialect, &built);

        self.result = None;
        match self.driver.execute(&built.sql, &built.values).await {
            Ok(result) => Ok(&*self.result.insert(result)),
            Err(err) => {
                self.log.failure(S::KIND, dialect, &built.sql, &err);
                Err(err)
            }
        }
    }

    /// Result of the last successful [`Bound::exec`].
    pub fn result(&self) -> Option<&ResultSet> {
        self.result.as_ref()
    }

    /// Rows affected by the last successful [`Bound::exec`].
    pub fn rows_affected(&self) -> Option<u64> {
        self.result.as_ref().map(|r| r.rows_affected)
    }

    pub fn into_result(self) -> Option<ResultSet> {
        self.result
    }
}

impl<D: Driver> Bound<'_, D, InsertQuery> {
    /// Id of the row created by the last successful [`Bound::exec`].
    ///
    /// On dialects with `RETURNING` the id is read from the returning column
    /// of the first result row. Everywhere else the driver's
    /// [`Driver::last_insert_id`] is used. `None` before execution.
    pub fn insert_id(&self) -> Option<i64> {
        let result = self.result.as_ref()?;
        if self.statement.dialect().supports_returning() {
            let column = self.statement.returning_column()?;
            result.value(0, column)?.as_i64()
        } else {
            self.driver.last_insert_id()
        }
    }
}
