//! SQL dialects the storage server runs against.

use std::fmt;

/// The database product a statement is rendered for.
///
/// Dialects only differ in a couple of places here: whether INSERT can hand
/// back the new row id through `RETURNING`, and whether `FOR UPDATE` exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    #[default]
    Generic,
    MySql,
    PostgreSql,
    Sqlite,
    Unknown,
}

impl Dialect {
    /// Detect the dialect from a driver identifier such as `QPSQL` or `sqlite`.
    pub fn from_driver_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            Dialect::Generic
        } else if name.starts_with("qmysql") || name == "mysql" || name == "mariadb" {
            Dialect::MySql
        } else if name.starts_with("qpsql") || name == "postgres" || name == "postgresql" {
            Dialect::PostgreSql
        } else if name.starts_with("qsqlite") || name == "sqlite" {
            Dialect::Sqlite
        } else {
            Dialect::Unknown
        }
    }

    /// Whether INSERT ... RETURNING is used to obtain the new row id.
    ///
    /// All other dialects rely on the driver's last-insert-id instead.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::PostgreSql)
    }

    /// SQLite locks whole tables and has no `SELECT ... FOR UPDATE`.
    pub fn supports_for_update(self) -> bool {
        !matches!(self, Dialect::Sqlite)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Generic => "generic",
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Sqlite => "sqlite",
            Dialect::Unknown => "unknown",
        })
    }
}
