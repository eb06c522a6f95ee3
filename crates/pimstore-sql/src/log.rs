//! `tracing` output for executed statements.
//!
//! Events are emitted under the `pimstore_sql.sql` target right before a
//! statement is handed to the driver, and at `WARN` when the driver fails.
//! Without the `tracing` feature every call here is a no-op.

use crate::dialect::Dialect;
use crate::error::QbError;
use crate::qb::BuiltQuery;

#[cfg(feature = "tracing")]
use tracing::Level;

/// How executed statements are logged.
#[derive(Debug, Clone)]
pub struct SqlLogConfig {
    /// Tracing event level to emit at.
    #[cfg(feature = "tracing")]
    pub level: Level,
    /// Truncate long SQL strings (in bytes, on a char boundary). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Include bound values in the event. Off by default since values may hold message data.
    pub log_values: bool,
}

impl Default for SqlLogConfig {
    fn default() -> Self {
        Self {
            #[cfg(feature = "tracing")]
            level: Level::DEBUG,
            max_sql_length: Some(200),
            log_values: false,
        }
    }
}

impl SqlLogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    #[cfg(feature = "tracing")]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Log bound values alongside the SQL.
    pub fn with_values(mut self) -> Self {
        self.log_values = true;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn format_values(&self, built: &BuiltQuery) -> Option<String> {
        self.log_values.then(|| {
            let parts: Vec<String> = built.values.iter().map(ToString::to_string).collect();
            format!("[{}]", parts.join(", "))
        })
    }

    /// Log a statement about to be executed.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(crate) fn statement(&self, kind: &'static str, dialect: Dialect, built: &BuiltQuery) {
        #[cfg(feature = "tracing")]
        {
            /// Dispatch a tracing event at a runtime-determined level.
            macro_rules! emit_at_level {
                ($level:expr, $($field:tt)*) => {
                    match $level {
                        Level::ERROR => tracing::error!($($field)*),
                        Level::WARN  => tracing::warn!($($field)*),
                        Level::INFO  => tracing::info!($($field)*),
                        Level::DEBUG => tracing::debug!($($field)*),
                        Level::TRACE => tracing::trace!($($field)*),
                    }
                };
            }

            let sql = self.truncate_sql(&built.sql);
            match self.format_values(built) {
                Some(values) => emit_at_level!(
                    self.level,
                    target: "pimstore_sql.sql",
                    statement = kind,
                    dialect = %dialect,
                    param_count = built.values.len(),
                    sql = %sql,
                    values = %values,
                ),
                None => emit_at_level!(
                    self.level,
                    target: "pimstore_sql.sql",
                    statement = kind,
                    dialect = %dialect,
                    param_count = built.values.len(),
                    sql = %sql,
                ),
            }
        }
    }

    /// Log a driver failure.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(crate) fn failure(&self, kind: &'static str, dialect: Dialect, sql: &str, err: &QbError) {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            target: "pimstore_sql.sql",
            statement = kind,
            dialect = %dialect,
            sql = %self.truncate_sql(sql),
            error = %err,
            "statement failed"
        );
    }
}

/// Cut `s` to at most `max_bytes`, backing off to a char boundary.
fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
