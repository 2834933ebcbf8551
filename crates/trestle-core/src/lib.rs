//! # trestle-core
//!
//! A fluent, dialect-aware SQL statement builder.
//!
//! This crate provides:
//! - An [`Engineer`] that accumulates clause fragments and bind values
//! - Per-dialect [`Blueprint`]s deciding quoting, joins and clause order
//! - Bind resolution with a strict named-or-positional rule
//!
//! Nothing here talks to a database. An [`Engineer`] is generic over an
//! [`Executor`]; the default [`Detached`] executor returns the rendered
//! [`BuiltQuery`], the `trestle` crate plugs in a live connection.
//!
//! ## Building statements
//!
//! ```rust
//! use trestle_core::{Blueprint, Engineer};
//!
//! let query = Engineer::new(Blueprint::MySql)
//!     .read_columns("users", ["username", "email"])?
//!     .order("username", "ASC")
//!     .limit(3)?
//!     .offset(5)?
//!     .build()?;
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT `username`, `email` FROM `users` ORDER BY `username` ASC LIMIT ?,?"
//! );
//! assert_eq!(query.binds.len(), 2);
//! # Ok::<(), trestle_core::QueryBuilderError>(())
//! ```
//!
//! ## Values are always parameterized
//!
//! ```rust
//! use trestle_core::{Blueprint, Engineer, SqlValue};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let query = Engineer::new(Blueprint::Sqlite)
//!     .read("users")?
//!     .where_("name", "=", user_input)?
//!     .build()?;
//!
//! assert_eq!(query.sql, "SELECT * FROM `users` WHERE `name` = ?");
//! assert_eq!(query.values(), vec![&SqlValue::Text(String::from(user_input))]);
//! # Ok::<(), trestle_core::QueryBuilderError>(())
//! ```

pub mod bind;
pub mod dialect;
pub mod engineer;
pub mod error;
pub mod fragment;
pub mod operator;
pub mod timing;
pub mod value;

pub use bind::{Bind, BindKey, BindList};
pub use dialect::{Blueprint, Dialect, JoinKind, StatementKind};
pub use engineer::{BuiltQuery, Detached, Engineer, ExecContext, Executor};
pub use error::{QueryBuilderError, Result};
pub use fragment::{ClauseRole, Name, NameList};
pub use operator::Operator;
pub use timing::{Stopwatch, Timings};
pub use value::{col, range, raw, Operand, SqlValue, ToSqlValue};
