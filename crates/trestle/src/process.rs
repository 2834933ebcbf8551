//! The connection manager.
//!
//! A [`Process`] owns one connection and a private current-thread runtime
//! that drives the async driver. Every call blocks until the driver answers,
//! so a `Process` must not be used from inside another async runtime.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use sqlx::any::AnyArguments;
use sqlx::AnyConnection;
use sqlx::query::Query;
use sqlx::{Any, Connection};
use tokio::runtime::{Builder, Runtime};
use trestle_core::bind::to_positional;
use trestle_core::{Blueprint, BuiltQuery, ExecContext, Executor, SqlValue, StatementKind};

use crate::config::{ConnectionConfig, Policy};
use crate::debug::DebugInfo;
use crate::dsn::DsnDescriptor;
use crate::error::{DatabaseError, Error, QueryError, Result};
use crate::monitor::QueryMonitor;
use crate::result::{Record, ResultSet};

/// Leading keywords of raw statements that return rows.
const ROW_KEYWORDS: &[&str] = &[
    "SELECT", "WITH", "PRAGMA", "SHOW", "EXPLAIN", "DESCRIBE", "DESC", "VALUES",
];

enum Outcome {
    Rows(Vec<Record>),
    Affected {
        rows: u64,
        last_insert_id: Option<i64>,
    },
}

/// One live connection, closed by [`Process::disconnect`] or on drop.
pub struct Process {
    name: String,
    blueprint: Blueprint,
    policy: Policy,
    monitor: Arc<dyn QueryMonitor>,
    // dropped before the runtime it was opened on
    connection: Mutex<Option<AnyConnection>>,
    runtime: Runtime,
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("name", &self.name)
            .field("blueprint", &self.blueprint)
            .field("policy", &self.policy)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl Process {
    /// Opens the connection described by `config`.
    ///
    /// A failed connect is returned only when the policy raises database
    /// errors; otherwise it is reported to the monitor and the process stays
    /// disconnected.
    pub fn connect(
        name: &str,
        config: &ConnectionConfig,
        policy: Policy,
        monitor: Arc<dyn QueryMonitor>,
    ) -> std::result::Result<Self, DatabaseError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let process = Self {
            name: String::from(name),
            blueprint: config.driver,
            policy,
            monitor,
            connection: Mutex::new(None),
            runtime,
        };
        process.open(config)?;
        Ok(process)
    }

    fn open(&self, config: &ConnectionConfig) -> std::result::Result<(), DatabaseError> {
        sqlx::any::install_default_drivers();
        let descriptor = DsnDescriptor::for_blueprint(config.driver);
        let url = descriptor.render(config);
        let seconds = config.timeout_secs();
        let database = String::from(config.display_name(&self.name));

        let attempt = self.runtime.block_on(tokio::time::timeout(
            Duration::from_secs(seconds),
            AnyConnection::connect(&url),
        ));
        let error = match attempt {
            Ok(Ok(connection)) => {
                *self.lock() = Some(connection);
                self.monitor
                    .on_connect(&self.name, self.blueprint, &descriptor.render_redacted(config));
                return Ok(());
            }
            Ok(Err(source)) => DatabaseError::ConnectionFailed { database, source },
            Err(_) => DatabaseError::ConnectTimeout { database, seconds },
        };

        self.monitor.on_connect_failed(&self.name, &error.to_string());
        if self.policy.throw_on_database_error {
            Err(error)
        } else {
            Ok(())
        }
    }

    /// Connection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dialect of the connection.
    #[must_use]
    pub const fn blueprint(&self) -> Blueprint {
        self.blueprint
    }

    /// Whether a connection is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Runs a built statement.
    pub fn run(&self, query: BuiltQuery, context: ExecContext) -> Result<ResultSet> {
        let mut debug = DebugInfo::new(&self.name, &query, &context);
        let (sql, values) = to_positional(&query.sql, &query.binds, &query.blueprint)?;
        let returns_rows = match query.kind {
            StatementKind::Query => returns_rows(&sql),
            kind => kind.returns_rows(),
        };

        let mut guard = self.lock();
        let Some(connection) = guard.as_mut() else {
            return Err(DatabaseError::NotConnected {
                connection: self.name.clone(),
            }
            .into());
        };
        let request = Instant::now();
        let outcome = self
            .runtime
            .block_on(send(connection, &sql, values, returns_rows));
        drop(guard);
        debug.execution = context.stopwatch.finish(request.elapsed());

        match outcome {
            Ok(Outcome::Rows(rows)) => {
                self.monitor.on_query_complete(&debug, rows.len() as u64);
                Ok(ResultSet::with_rows(rows, debug))
            }
            Ok(Outcome::Affected {
                rows,
                last_insert_id,
            }) => {
                self.monitor.on_query_complete(&debug, rows);
                Ok(ResultSet::with_affected(rows, last_insert_id, debug))
            }
            Err(error) => {
                let message = error.to_string();
                self.monitor.on_query_failed(&debug, &message);
                if self.policy.throw_on_query_error {
                    return Err(QueryError {
                        message,
                        sql: debug.query,
                    }
                    .into());
                }
                debug.error = Some(message);
                Ok(ResultSet::failed(debug))
            }
        }
    }

    /// Closes the connection. Calling it again does nothing.
    pub fn disconnect(&self) {
        let Some(connection) = self.lock().take() else {
            return;
        };
        if let Err(error) = self.runtime.block_on(connection.close()) {
            tracing::warn!(
                target: "trestle::connection",
                connection = %self.name,
                %error,
                "error while closing connection"
            );
        }
        self.monitor.on_disconnect(&self.name);
    }

    fn lock(&self) -> MutexGuard<'_, Option<AnyConnection>> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl Executor for &Process {
    type Output = ResultSet;
    type Error = Error;

    fn execute(self, query: BuiltQuery, context: ExecContext) -> Result<ResultSet> {
        self.run(query, context)
    }
}

async fn send(
    connection: &mut AnyConnection,
    sql: &str,
    values: Vec<SqlValue>,
    returns_rows: bool,
) -> std::result::Result<Outcome, sqlx::Error> {
    let mut query = sqlx::query(sql);
    for value in values {
        query = bind(query, value);
    }

    if returns_rows {
        let rows = query.fetch_all(&mut *connection).await?;
        let records = rows
            .iter()
            .map(Record::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Outcome::Rows(records))
    } else {
        let result = query.execute(&mut *connection).await?;
        Ok(Outcome::Affected {
            rows: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }
}

fn bind<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: SqlValue,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(n) => query.bind(n),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

/// Whether a raw statement produces a result set, judged by its first keyword.
fn returns_rows(sql: &str) -> bool {
    let keyword: String = strip_leading_noise(sql)
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_uppercase();
    ROW_KEYWORDS.contains(&keyword.as_str())
}

fn strip_leading_noise(mut sql: &str) -> &str {
    loop {
        let trimmed = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        if let Some(rest) = trimmed.strip_prefix("--") {
            sql = rest.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(rest) = trimmed.strip_prefix("/*") {
            sql = rest.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return trimmed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_row_returning_statements() {
        assert!(returns_rows("SELECT 1"));
        assert!(returns_rows("  select * from t"));
        assert!(returns_rows("-- list\n/* all */ (SELECT 1)"));
        assert!(returns_rows("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(returns_rows("PRAGMA table_info(users)"));
        assert!(!returns_rows("INSERT INTO t VALUES (1)"));
        assert!(!returns_rows("CREATE TABLE t (id INTEGER)"));
        assert!(!returns_rows("DELETE FROM t"));
    }
}
