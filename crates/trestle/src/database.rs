//! The entry point: one named connection and its statement builders.

use std::sync::Arc;

use trestle_core::{BindList, Blueprint, Engineer, NameList, ToSqlValue};

use crate::config::Config;
use crate::error::Result;
use crate::monitor::{QueryMonitor, TracingMonitor};
use crate::process::Process;

/// A builder bound to a live connection.
pub type Statement<'a> = Engineer<&'a Process>;

/// A connected database.
///
/// Master methods start a [`Statement`] for the connection's dialect.
#[derive(Debug)]
pub struct Database {
    process: Process,
}

impl Database {
    /// Connects to a named connection, or the default one, logging through
    /// [`TracingMonitor`].
    pub fn connect(config: &Config, name: Option<&str>) -> Result<Self> {
        Self::connect_with_monitor(config, name, Arc::new(TracingMonitor::new()))
    }

    /// Connects with a custom monitor.
    pub fn connect_with_monitor(
        config: &Config,
        name: Option<&str>,
        monitor: Arc<dyn QueryMonitor>,
    ) -> Result<Self> {
        config.validate()?;
        let (name, connection) = config.connection(name)?;
        let process = Process::connect(name, connection, config.policy(), monitor)?;
        Ok(Self { process })
    }

    /// An empty statement for this connection.
    pub fn statement(&self) -> Statement<'_> {
        Engineer::with_executor(self.process.blueprint(), &self.process)
    }

    /// Raw SQL with binds passed through verbatim.
    pub fn query(&self, sql: &str, binds: impl Into<BindList>) -> trestle_core::Result<Statement<'_>> {
        self.statement().query(sql, binds)
    }

    /// `SELECT *` from the given tables.
    pub fn read(&self, tables: impl Into<NameList>) -> trestle_core::Result<Statement<'_>> {
        self.statement().read(tables)
    }

    /// Alias of [`Database::read`].
    pub fn get(&self, tables: impl Into<NameList>) -> trestle_core::Result<Statement<'_>> {
        self.statement().get(tables)
    }

    /// `SELECT columns` from the given tables.
    pub fn read_columns(
        &self,
        tables: impl Into<NameList>,
        columns: impl Into<NameList>,
    ) -> trestle_core::Result<Statement<'_>> {
        self.statement().read_columns(tables, columns)
    }

    /// `INSERT INTO`.
    pub fn create<'v, V: ToSqlValue>(
        &self,
        table: &str,
        values: impl IntoIterator<Item = (&'v str, V)>,
    ) -> trestle_core::Result<Statement<'_>> {
        self.statement().create(table, values)
    }

    /// `UPDATE .. SET`.
    pub fn update<'v, V: ToSqlValue>(
        &self,
        table: &str,
        values: impl IntoIterator<Item = (&'v str, V)>,
    ) -> trestle_core::Result<Statement<'_>> {
        self.statement().update(table, values)
    }

    /// `DELETE FROM`.
    pub fn delete(&self, table: &str) -> trestle_core::Result<Statement<'_>> {
        self.statement().delete(table)
    }

    /// Closes the connection; later statements fail with `NotConnected`.
    pub fn disconnect(&self) {
        self.process.disconnect();
    }

    /// Whether the connection is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.process.is_connected()
    }

    /// Dialect of the connection.
    #[must_use]
    pub const fn blueprint(&self) -> Blueprint {
        self.process.blueprint()
    }

    /// Connection name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.process.name()
    }
}
