//! # pimstore-sql
//!
//! Dialect-aware SQL statement builder for the PIM storage server.
//!
//! ## Features
//!
//! - **Parameterized only**: values never enter the SQL text, every one is a positional `?`
//! - **Condition trees**: nested AND/OR groups render fully parenthesized
//! - **Dialect aware**: one builder targets MySQL, PostgreSQL and SQLite
//! - **Insert ids**: `RETURNING` on PostgreSQL, the driver's last insert id elsewhere
//! - **SQL logging**: executed statements are emitted via `tracing`
//!
//! ## Query Builder (qb)
//!
//! ```
//! use pimstore_sql::qb::{self, Condition, Statement, or};
//!
//! // SELECT
//! let q = qb::select()
//!     .column("id")
//!     .from("pimitems")
//!     .filter(or([Condition::eq("collection_id", 4), Condition::eq("collection_id", 5)]))
//!     .order_by_desc("id")
//!     .limit(10);
//! assert_eq!(
//!     q.serialize().unwrap(),
//!     "SELECT id FROM pimitems WHERE ((collection_id = ?) OR (collection_id = ?)) \
//!      ORDER BY id DESC LIMIT 10"
//! );
//!
//! // UPDATE
//! let q = qb::update()
//!     .table("pimitems")
//!     .value("dirty", false)
//!     .filter(Condition::eq("id", 12i64));
//! assert_eq!(q.serialize().unwrap(), "UPDATE pimitems SET dirty = ? WHERE (id = ?)");
//! ```
//!
//! ## Execution
//!
//! Statements run through a [`Driver`]. [`Bound`] switches a statement to the
//! driver's dialect, builds it and executes it:
//!
//! ```ignore
//! let mut insert = Bound::new(&client, qb::insert().into("flags").value("name", "\\Seen").returning("id"));
//! insert.exec().await?;
//! let id = insert.insert_id();
//! ```

pub mod client;
pub mod dialect;
pub mod error;
pub mod exec;
pub mod log;
pub mod qb;
pub mod value;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use client::{Driver, ResultSet};
pub use dialect::Dialect;
pub use error::{QbError, QbResult};
pub use exec::Bound;
pub use log::SqlLogConfig;
pub use value::Value;

// Re-export qb module for easy access
pub use qb::{
    BuiltQuery, Condition, DeleteQuery, InsertQuery, SelectQuery, Statement, UpdateQuery, delete,
    insert, select, update,
};
