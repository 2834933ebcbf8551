//! # trestle
//!
//! Fluent SQL statements executed over a blocking connection.
//!
//! This crate provides:
//! - JSON configuration of named MySQL and SQLite connections
//! - A [`Database`] handle routing master methods to the connection's dialect
//! - A [`ResultSet`] with rows, status and a [`DebugInfo`] bundle
//!
//! ```rust
//! use trestle::{Config, ConnectionConfig, Database, SqlValue};
//!
//! let config = Config::new()
//!     .with_connection("app", ConnectionConfig::sqlite(":memory:"))
//!     .default_connection("app")
//!     .throw_on_query_error(true);
//! let db = Database::connect(&config, None)?;
//!
//! db.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", ())?.exec()?;
//! db.create("users", [("name", "julian")])?.exec()?;
//!
//! let users = db.read("users")?.where_("name", "=", "julian")?.exec()?;
//! assert_eq!(users.count(), 1);
//! assert_eq!(
//!     users.first().and_then(|u| u.get("name")),
//!     Some(&SqlValue::Text(String::from("julian")))
//! );
//! # Ok::<(), trestle::Error>(())
//! ```
//!
//! Statements block the calling thread; do not use a [`Database`] from inside
//! an async runtime.

pub mod config;
pub mod database;
pub mod debug;
pub mod dsn;
pub mod error;
pub mod monitor;
pub mod process;
pub mod result;

pub use config::{Config, ConnectionConfig, Policy};
pub use database::{Database, Statement};
pub use debug::{CallSite, DebugInfo};
pub use error::{ConfigError, DatabaseError, Error, QueryError, Result};
pub use monitor::{NoopMonitor, QueryMonitor, TracingMonitor};
pub use process::Process;
pub use result::{Record, ResultSet};

pub use trestle_core::{
    col, range, raw, Bind, BindKey, BindList, Blueprint, BuiltQuery, ClauseRole, JoinKind, Name,
    NameList, Operand, QueryBuilderError, SqlValue, StatementKind, ToSqlValue,
};
