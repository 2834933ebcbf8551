//! Connection and statement events.
//!
//! A [`QueryMonitor`] is handed to each connection. The default
//! [`TracingMonitor`] emits `tracing` events under the `trestle::connection`
//! and `trestle::sql` targets; [`NoopMonitor`] discards everything.

use trestle_core::Blueprint;

use crate::debug::DebugInfo;

/// Receives connection and statement events.
pub trait QueryMonitor: Send + Sync {
    /// A connection was opened.
    fn on_connect(&self, _connection: &str, _blueprint: Blueprint, _url: &str) {}

    /// A connection could not be opened.
    fn on_connect_failed(&self, _connection: &str, _error: &str) {}

    /// A connection was closed.
    fn on_disconnect(&self, _connection: &str) {}

    /// A statement ran successfully.
    fn on_query_complete(&self, debug: &DebugInfo, count: u64);

    /// A statement failed.
    fn on_query_failed(&self, _debug: &DebugInfo, _error: &str) {}
}

/// A no-op monitor that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl QueryMonitor for NoopMonitor {
    fn on_query_complete(&self, _debug: &DebugInfo, _count: u64) {}
}

/// Emits `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct TracingMonitor {
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl TracingMonitor {
    /// Creates a monitor that logs full statements.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_sql_length: None,
        }
    }

    /// Set maximum SQL length to display.
    #[must_use]
    pub const fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                std::borrow::Cow::Owned(format!("{}...", &sql[..end]))
            }
            _ => std::borrow::Cow::Borrowed(sql),
        }
    }
}

impl QueryMonitor for TracingMonitor {
    fn on_connect(&self, connection: &str, blueprint: Blueprint, url: &str) {
        tracing::info!(
            target: "trestle::connection",
            connection,
            dialect = %blueprint,
            url,
            "connected"
        );
    }

    fn on_connect_failed(&self, connection: &str, error: &str) {
        tracing::warn!(
            target: "trestle::connection",
            connection,
            error,
            "connection failed"
        );
    }

    fn on_disconnect(&self, connection: &str) {
        tracing::info!(target: "trestle::connection", connection, "disconnected");
    }

    fn on_query_complete(&self, info: &DebugInfo, count: u64) {
        tracing::debug!(
            target: "trestle::sql",
            connection = %info.connection,
            kind = %info.kind,
            sql = %self.truncate_sql(&info.query),
            binds = info.binds.len(),
            count,
            elapsed = ?info.execution.request,
            "statement executed"
        );
    }

    fn on_query_failed(&self, info: &DebugInfo, error: &str) {
        tracing::warn!(
            target: "trestle::sql",
            connection = %info.connection,
            kind = %info.kind,
            sql = %self.truncate_sql(&info.query),
            error,
            "statement failed"
        );
    }
}
