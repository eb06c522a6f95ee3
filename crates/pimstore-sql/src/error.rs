//! Error types for pimstore-sql

use thiserror::Error;

/// Result type alias for statement building and execution.
pub type QbResult<T> = Result<T, QbError>;

/// Errors produced while building or executing a statement.
///
/// The `Missing*` variants are builder misuse: the statement was handed to
/// `serialize()`/`build()` before it was fully configured. Everything else is
/// reported by the driver and passed through untouched.
#[derive(Debug, Error)]
pub enum QbError {
    /// No table was configured (`from`/`into`/`table` never called).
    #[error("{0}: no table specified")]
    MissingTable(&'static str),

    /// A SELECT without any output column.
    #[error("SELECT: no columns specified")]
    MissingColumns,

    /// A CASE column without any WHEN branch.
    #[error("SELECT: CASE expression has no WHEN branch")]
    EmptyCase,

    /// An INSERT or UPDATE without any `(column, value)` pair.
    #[error("{0}: no column values specified")]
    MissingValues(&'static str),

    /// Error reported by the execution driver.
    #[error("Driver error: {0}")]
    Driver(String),

    /// Value serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error reported by tokio-postgres.
    #[cfg(feature = "postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

impl QbError {
    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Check if this error is a builder misuse (incomplete statement).
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::MissingTable(_)
                | Self::MissingColumns
                | Self::EmptyCase
                | Self::MissingValues(_)
        )
    }
}

impl From<serde_json::Error> for QbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
