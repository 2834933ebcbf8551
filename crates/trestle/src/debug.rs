//! The diagnostic bundle attached to every result.

use std::panic::Location;

use chrono::{DateTime, Utc};
use serde::Serialize;
use trestle_core::{Bind, BuiltQuery, ClauseRole, Dialect, ExecContext, StatementKind, Timings};

/// Where a statement was executed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallSite {
    /// Source file.
    pub file: &'static str,
    /// Line number.
    pub line: u32,
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// Everything known about one execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugInfo {
    /// Call site of `exec`/`exec_raw`.
    pub called: CallSite,
    /// Connection name.
    pub connection: String,
    /// Dialect name.
    pub dialect: &'static str,
    /// Statement kind.
    pub kind: StatementKind,
    /// Builder methods in call order.
    pub trace: Vec<&'static str>,
    /// Clause roles that were rendered.
    pub pattern: Vec<ClauseRole>,
    /// SQL as handed to the driver.
    pub query: String,
    /// Bind values; empty when they were inlined.
    pub binds: Vec<Bind>,
    /// Whether bind values were inlined into the SQL.
    pub inlined: bool,
    /// Driver error, when the statement failed.
    pub error: Option<String>,
    /// Build, request and total time.
    pub execution: Timings,
    /// When the statement was sent.
    pub executed_at: DateTime<Utc>,
}

impl DebugInfo {
    pub(crate) fn new(connection: &str, query: &BuiltQuery, context: &ExecContext) -> Self {
        Self {
            called: CallSite::from(context.called),
            connection: String::from(connection),
            dialect: query.blueprint.name(),
            kind: query.kind,
            trace: context.trace.clone(),
            pattern: query.pattern.clone(),
            query: query.sql.clone(),
            binds: query.binds.clone(),
            inlined: context.inlined,
            error: None,
            execution: Timings::default(),
            executed_at: Utc::now(),
        }
    }

    /// Whether the statement failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// The bundle as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
