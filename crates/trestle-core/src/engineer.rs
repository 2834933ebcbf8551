//! The statement accumulator.
//!
//! An [`Engineer`] collects fragments and pending binds per clause role while
//! the caller chains builder methods, then renders them in the dialect's role
//! order. The first call must be a master method (`query`, `read`/`get`,
//! `create`, `update` or `delete`); everything else modifies that statement.
//!
//! ```rust
//! use trestle_core::{Blueprint, Engineer, SqlValue};
//!
//! let query = Engineer::new(Blueprint::MySql)
//!     .read("users")?
//!     .where_("id", "=", 1)?
//!     .and_where("name", "=", "julian")?
//!     .build()?;
//!
//! assert_eq!(query.sql, "SELECT * FROM `users` WHERE `id` = ? AND `name` = ?");
//! assert_eq!(
//!     query.values(),
//!     vec![&SqlValue::Int(1), &SqlValue::Text(String::from("julian"))]
//! );
//! # Ok::<(), trestle_core::QueryBuilderError>(())
//! ```

use std::collections::BTreeMap;
use std::panic::Location;

use serde::Serialize;

use crate::bind::{inline, Bind, BindList, BindMerger, PendingBind};
use crate::dialect::{Blueprint, Dialect, JoinKind, StatementKind};
use crate::error::{QueryBuilderError, Result};
use crate::fragment::{ClauseRole, FragmentSet, ListStyle, Name, NameList, Segment};
use crate::operator::Operator;
use crate::timing::Stopwatch;
use crate::value::{Operand, SqlValue, ToSqlValue};

/// A rendered statement, ready to hand to a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltQuery {
    /// SQL text with `?` or `:name` placeholders.
    pub sql: String,
    /// Binds in placeholder order.
    pub binds: Vec<Bind>,
    /// Statement kind.
    pub kind: StatementKind,
    /// Dialect the statement was rendered for.
    pub blueprint: Blueprint,
    /// Roles that contributed to the SQL, in rendering order.
    pub pattern: Vec<ClauseRole>,
}

impl BuiltQuery {
    /// Bind values in placeholder order.
    #[must_use]
    pub fn values(&self) -> Vec<&SqlValue> {
        self.binds.iter().map(|b| &b.value).collect()
    }
}

/// Diagnostics handed to the executor along with the statement.
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Where `exec` or `exec_raw` was called.
    pub called: &'static Location<'static>,
    /// Builder methods in call order.
    pub trace: Vec<&'static str>,
    /// Started with the builder, marked after rendering.
    pub stopwatch: Stopwatch,
    /// Whether the bind values were inlined into the SQL.
    pub inlined: bool,
}

/// Runs a built statement.
pub trait Executor {
    /// What a successful execution yields.
    type Output;
    /// Execution error; builder errors must convert into it.
    type Error: From<QueryBuilderError>;

    /// Executes the statement.
    fn execute(
        self,
        query: BuiltQuery,
        context: ExecContext,
    ) -> std::result::Result<Self::Output, Self::Error>;
}

/// Executor without a connection: `exec` returns the rendered statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Executor for Detached {
    type Output = BuiltQuery;
    type Error = QueryBuilderError;

    fn execute(self, query: BuiltQuery, _context: ExecContext) -> Result<BuiltQuery> {
        Ok(query)
    }
}

/// Fluent statement builder.
#[derive(Debug)]
#[must_use = "builder methods return a new state; call exec() or build()"]
pub struct Engineer<X = Detached> {
    blueprint: Blueprint,
    executor: X,
    master: Option<&'static str>,
    kind: Option<StatementKind>,
    fragments: FragmentSet,
    binds: BTreeMap<ClauseRole, Vec<PendingBind>>,
    from: NameList,
    joined: Vec<String>,
    on_started: bool,
    limit: Option<i64>,
    offset: Option<i64>,
    trace: Vec<&'static str>,
    stopwatch: Stopwatch,
}

impl Engineer<Detached> {
    /// Creates a builder that renders without executing.
    pub fn new(blueprint: Blueprint) -> Self {
        Self::with_executor(blueprint, Detached)
    }
}

impl<X> Engineer<X> {
    /// Creates a builder that hands the statement to `executor`.
    pub fn with_executor(blueprint: Blueprint, executor: X) -> Self {
        Self {
            blueprint,
            executor,
            master: None,
            kind: None,
            fragments: FragmentSet::new(),
            binds: BTreeMap::new(),
            from: NameList::new(),
            joined: Vec::new(),
            on_started: false,
            limit: None,
            offset: None,
            trace: Vec::new(),
            stopwatch: Stopwatch::start(),
        }
    }

    /// The dialect in use.
    #[must_use]
    pub const fn blueprint(&self) -> Blueprint {
        self.blueprint
    }

    /// The statement kind, once a master method was called.
    #[must_use]
    pub const fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    /// Builder methods called so far.
    #[must_use]
    pub fn trace(&self) -> &[&'static str] {
        &self.trace
    }

    /// Raw SQL with binds passed through verbatim.
    pub fn query(mut self, sql: &str, binds: impl Into<BindList>) -> Result<Self> {
        self.begin("query", StatementKind::Query)?;
        let pending = binds.into().into_pending();
        BindMerger::new().extend(&pending)?;
        self.fragments
            .push(ClauseRole::Query, Segment::Raw(String::from(sql)));
        self.binds.insert(ClauseRole::Query, pending);
        Ok(self)
    }

    /// `SELECT *` from the given tables.
    ///
    /// When an entry is qualified (`users.name`) the list is taken as the
    /// column list and the tables are derived from the qualifiers.
    pub fn read(self, tables: impl Into<NameList>) -> Result<Self> {
        self.select("read", tables.into(), NameList::new())
    }

    /// Alias of [`Engineer::read`].
    pub fn get(self, tables: impl Into<NameList>) -> Result<Self> {
        self.select("get", tables.into(), NameList::new())
    }

    /// `SELECT columns` from the given tables.
    ///
    /// A qualified `tables` list already names the columns, so `columns` must
    /// be empty in that case.
    pub fn read_columns(
        self,
        tables: impl Into<NameList>,
        columns: impl Into<NameList>,
    ) -> Result<Self> {
        self.select("read", tables.into(), columns.into())
    }

    /// `INSERT INTO table (columns) VALUES (?, ..)`.
    pub fn create<'a, V: ToSqlValue>(
        mut self,
        table: &str,
        values: impl IntoIterator<Item = (&'a str, V)>,
    ) -> Result<Self> {
        self.begin("create", StatementKind::Create)?;
        let (columns, pending) = split_values(values);
        if columns.is_empty() {
            return Err(QueryBuilderError::EmptySet { method: "create" });
        }
        self.fragments
            .push(ClauseRole::Table, Segment::Keyword("INSERT INTO"));
        self.fragments
            .push(ClauseRole::Table, Segment::Names(NameList::from(table)));
        self.fragments
            .push(ClauseRole::Table, Segment::WrappedNames(columns));
        self.fragments.push(ClauseRole::Set, Segment::Keyword("VALUES"));
        self.fragments.push(
            ClauseRole::Set,
            Segment::Placeholders {
                count: pending.len(),
                style: ListStyle::Wrapped,
            },
        );
        self.binds.insert(ClauseRole::Set, pending);
        Ok(self)
    }

    /// `UPDATE table SET col = ?, ..`.
    pub fn update<'a, V: ToSqlValue>(
        mut self,
        table: &str,
        values: impl IntoIterator<Item = (&'a str, V)>,
    ) -> Result<Self> {
        self.begin("update", StatementKind::Update)?;
        let (columns, pending) = split_values(values);
        if columns.is_empty() {
            return Err(QueryBuilderError::EmptySet { method: "update" });
        }
        self.fragments.push(ClauseRole::Table, Segment::Keyword("UPDATE"));
        self.fragments
            .push(ClauseRole::Table, Segment::Names(NameList::from(table)));
        self.fragments.push(ClauseRole::Set, Segment::Keyword("SET"));
        self.fragments
            .push(ClauseRole::Set, Segment::Assignments(columns));
        self.binds.insert(ClauseRole::Set, pending);
        Ok(self)
    }

    /// `DELETE FROM table`.
    pub fn delete(mut self, table: &str) -> Result<Self> {
        self.begin("delete", StatementKind::Delete)?;
        self.fragments
            .push(ClauseRole::Table, Segment::Keyword("DELETE FROM"));
        self.fragments
            .push(ClauseRole::Table, Segment::Names(NameList::from(table)));
        Ok(self)
    }

    /// Adds a `WHERE` condition; a second call continues with `AND`.
    pub fn where_(mut self, field: &str, operator: &str, value: impl Into<Operand>) -> Result<Self> {
        self.trace.push("where_");
        let keyword = if self.fragments.is_empty(ClauseRole::Where) {
            "WHERE"
        } else {
            "AND"
        };
        self.condition(ClauseRole::Where, keyword, field, operator, value.into())?;
        Ok(self)
    }

    /// Continues the `WHERE` clause with `AND`.
    pub fn and_where(
        mut self,
        field: &str,
        operator: &str,
        value: impl Into<Operand>,
    ) -> Result<Self> {
        self.trace.push("and_where");
        self.require_where("and_where")?;
        self.condition(ClauseRole::Where, "AND", field, operator, value.into())?;
        Ok(self)
    }

    /// Continues the `WHERE` clause with `OR`.
    pub fn or_where(
        mut self,
        field: &str,
        operator: &str,
        value: impl Into<Operand>,
    ) -> Result<Self> {
        self.trace.push("or_where");
        self.require_where("or_where")?;
        self.condition(ClauseRole::Where, "OR", field, operator, value.into())?;
        Ok(self)
    }

    /// Joins `table` with the given join keyword.
    pub fn join(self, table: impl Into<Name>, kind: JoinKind) -> Result<Self> {
        self.join_as("join", table.into(), kind)
    }

    /// `INNER JOIN table`.
    pub fn inner_join(self, table: impl Into<Name>) -> Result<Self> {
        self.join_as("inner_join", table.into(), JoinKind::Inner)
    }

    /// `LEFT JOIN table`.
    pub fn left_join(self, table: impl Into<Name>) -> Result<Self> {
        self.join_as("left_join", table.into(), JoinKind::Left)
    }

    /// `RIGHT JOIN table`.
    pub fn right_join(self, table: impl Into<Name>) -> Result<Self> {
        self.join_as("right_join", table.into(), JoinKind::Right)
    }

    /// `FULL OUTER JOIN table`.
    pub fn full_outer_join(self, table: impl Into<Name>) -> Result<Self> {
        self.join_as("full_outer_join", table.into(), JoinKind::FullOuter)
    }

    /// Adds a join condition: `ON` after a join, `AND` afterwards.
    ///
    /// A text value names a column (`"users.id"`); other values are bound.
    /// Comparisons against literal text belong in [`Engineer::where_`].
    pub fn on(mut self, field: &str, operator: &str, value: impl Into<Operand>) -> Result<Self> {
        self.trace.push("on");
        if self.joined.is_empty() {
            return Err(QueryBuilderError::NoPriorClause {
                method: "on",
                requires: "join",
            });
        }
        let keyword = if self.on_started { "AND" } else { "ON" };
        self.condition(ClauseRole::Join, keyword, field, operator, join_operand(value))?;
        self.on_started = true;
        Ok(self)
    }

    /// Continues the join condition with `AND`.
    pub fn and_on(mut self, field: &str, operator: &str, value: impl Into<Operand>) -> Result<Self> {
        self.trace.push("and_on");
        self.require_on("and_on")?;
        self.condition(ClauseRole::Join, "AND", field, operator, join_operand(value))?;
        Ok(self)
    }

    /// Continues the join condition with `OR`.
    pub fn or_on(mut self, field: &str, operator: &str, value: impl Into<Operand>) -> Result<Self> {
        self.trace.push("or_on");
        self.require_on("or_on")?;
        self.condition(ClauseRole::Join, "OR", field, operator, join_operand(value))?;
        Ok(self)
    }

    /// `ORDER BY fields direction`. Anything but `DESC` sorts ascending.
    pub fn order(mut self, fields: impl Into<NameList>, direction: &str) -> Self {
        self.trace.push("order");
        let fields = fields.into();
        if fields.is_empty() {
            return self;
        }
        let direction = if direction.trim().eq_ignore_ascii_case("DESC") {
            "DESC"
        } else {
            "ASC"
        };
        self.continue_list(ClauseRole::Order, "ORDER BY");
        self.fragments.push(ClauseRole::Order, Segment::Names(fields));
        self.fragments
            .push(ClauseRole::Order, Segment::Keyword(direction));
        self
    }

    /// `GROUP BY fields`.
    pub fn group(mut self, fields: impl Into<NameList>) -> Self {
        self.trace.push("group");
        let fields = fields.into();
        if fields.is_empty() {
            return self;
        }
        self.continue_list(ClauseRole::Group, "GROUP BY");
        self.fragments.push(ClauseRole::Group, Segment::Names(fields));
        self
    }

    /// Caps the number of rows.
    pub fn limit(mut self, limit: i64) -> Result<Self> {
        self.trace.push("limit");
        if limit < 0 {
            return Err(QueryBuilderError::InvalidArgument {
                method: "limit",
                value: limit,
            });
        }
        self.limit = Some(limit);
        self.render_limit();
        Ok(self)
    }

    /// Skips rows; rendered together with the limit as `LIMIT ?,?`.
    pub fn offset(mut self, offset: i64) -> Result<Self> {
        self.trace.push("offset");
        if offset < 0 {
            return Err(QueryBuilderError::InvalidArgument {
                method: "offset",
                value: offset,
            });
        }
        self.offset = Some(offset);
        self.render_limit();
        Ok(self)
    }

    /// Renders the statement without consuming the builder.
    pub fn build(&self) -> Result<BuiltQuery> {
        let kind = self.kind.ok_or(QueryBuilderError::NoStatement)?;
        let pattern = self.blueprint.pattern(kind);
        if let Some(role) = self.fragments.roles().find(|r| !pattern.contains(r)) {
            return Err(QueryBuilderError::ClauseNotAllowed {
                role,
                kind: kind.as_str(),
            });
        }

        let quote = self.blueprint.identifier_quote();
        let mut parts = Vec::with_capacity(pattern.len());
        let mut rendered = Vec::with_capacity(pattern.len());
        let mut merger = BindMerger::new();
        for role in pattern {
            let Some(sql) = self.fragments.render(*role, quote) else {
                continue;
            };
            parts.push(sql);
            rendered.push(*role);
            if let Some(pending) = self.binds.get(role) {
                merger.extend(pending)?;
            }
        }

        Ok(BuiltQuery {
            sql: parts.join(" "),
            binds: merger.finish(),
            kind,
            blueprint: self.blueprint,
            pattern: rendered,
        })
    }

    fn begin(&mut self, method: &'static str, kind: StatementKind) -> Result<()> {
        self.trace.push(method);
        if let Some(current) = self.master {
            return Err(QueryBuilderError::AlreadyBuilding {
                current,
                attempted: method,
            });
        }
        self.master = Some(method);
        self.kind = Some(kind);
        Ok(())
    }

    fn select(mut self, method: &'static str, tables: NameList, columns: NameList) -> Result<Self> {
        self.begin(method, StatementKind::Read)?;
        let (tables, columns) = if tables.has_qualified() {
            if !columns.is_empty() {
                return Err(QueryBuilderError::ConflictingColumns { method });
            }
            let mut derived = NameList::new();
            for name in &tables {
                if let Some(table) = name.qualifier() {
                    if !derived.contains(table) {
                        derived.push(table);
                    }
                }
            }
            (derived, tables)
        } else {
            let mut unique = NameList::new();
            for name in &tables {
                if !unique.contains(&name.reference) {
                    unique.push(name.clone());
                }
            }
            let columns = if columns.is_empty() {
                NameList::from("*")
            } else {
                columns
            };
            (unique, columns)
        };

        self.fragments
            .push(ClauseRole::Columns, Segment::Keyword("SELECT"));
        self.fragments
            .push(ClauseRole::Columns, Segment::Names(columns));
        self.from = tables;
        self.render_from();
        Ok(self)
    }

    fn render_from(&mut self) {
        self.fragments.reset(ClauseRole::Table);
        self.fragments.push(ClauseRole::Table, Segment::Keyword("FROM"));
        self.fragments
            .push(ClauseRole::Table, Segment::Names(self.from.clone()));
    }

    fn render_limit(&mut self) {
        self.fragments.reset(ClauseRole::Limit);
        self.binds.remove(&ClauseRole::Limit);
        let values = match (self.offset, self.limit) {
            (Some(offset), limit) => vec![offset, limit.unwrap_or(i64::MAX)],
            (None, Some(limit)) => vec![limit],
            (None, None) => return,
        };
        self.fragments.push(ClauseRole::Limit, Segment::Keyword("LIMIT"));
        self.fragments.push(
            ClauseRole::Limit,
            Segment::Placeholders {
                count: values.len(),
                style: ListStyle::Compact,
            },
        );
        self.binds.insert(
            ClauseRole::Limit,
            values
                .into_iter()
                .map(|v| PendingBind::next(SqlValue::Int(v)))
                .collect(),
        );
    }

    fn continue_list(&mut self, role: ClauseRole, keyword: &'static str) {
        if self.fragments.is_empty(role) {
            self.fragments.push(role, Segment::Keyword(keyword));
        } else {
            self.fragments.push(role, Segment::Comma);
        }
    }

    fn join_as(mut self, method: &'static str, table: Name, kind: JoinKind) -> Result<Self> {
        self.trace.push(method);
        match self.kind {
            Some(StatementKind::Read) => {}
            Some(other) => {
                return Err(QueryBuilderError::ClauseNotAllowed {
                    role: ClauseRole::Join,
                    kind: other.as_str(),
                })
            }
            None => {
                return Err(QueryBuilderError::NoPriorClause {
                    method,
                    requires: "read",
                })
            }
        }
        if !self.blueprint.supports_join(kind) {
            return Err(QueryBuilderError::UnsupportedJoinType {
                dialect: self.blueprint.name(),
                join: String::from(kind.as_str()),
            });
        }

        // the last FROM table stays, a join needs something to join onto
        if self.from.contains(&table.reference) && self.from.len() > 1 {
            self.from.remove(&table.reference);
            self.render_from();
        }
        self.fragments
            .push(ClauseRole::Join, Segment::Keyword(kind.as_str()));
        self.joined.push(table.reference.clone());
        self.fragments
            .push(ClauseRole::Join, Segment::Names(NameList::from(table)));
        self.on_started = false;
        Ok(self)
    }

    fn require_where(&self, method: &'static str) -> Result<()> {
        if self.fragments.is_empty(ClauseRole::Where) {
            return Err(QueryBuilderError::NoPriorClause {
                method,
                requires: "where_",
            });
        }
        Ok(())
    }

    fn require_on(&self, method: &'static str) -> Result<()> {
        if self.joined.is_empty() {
            return Err(QueryBuilderError::NoPriorClause {
                method,
                requires: "join",
            });
        }
        if !self.on_started {
            return Err(QueryBuilderError::NoPriorClause {
                method,
                requires: "on",
            });
        }
        Ok(())
    }

    fn condition(
        &mut self,
        role: ClauseRole,
        keyword: &'static str,
        field: &str,
        operator: &str,
        value: Operand,
    ) -> Result<()> {
        let operator: Operator = operator.parse()?;
        let mut segments = vec![
            Segment::Keyword(keyword),
            Segment::Names(NameList::from(field)),
            Segment::Operator(operator),
        ];
        let mut pending = Vec::new();
        let shape = value.shape();

        match value {
            Operand::Range(values) => {
                if !operator.is_range() {
                    return Err(QueryBuilderError::InvalidValueShape {
                        operator: operator.as_str(),
                        shape,
                    });
                }
                let [low, high]: [SqlValue; 2] = values.try_into().map_err(|_| {
                    QueryBuilderError::InvalidValueShape {
                        operator: operator.as_str(),
                        shape: "a list without exactly two values",
                    }
                })?;
                segments.push(single_placeholder());
                segments.push(Segment::Keyword("AND"));
                segments.push(single_placeholder());
                pending.push(PendingBind::next(low));
                pending.push(PendingBind::next(high));
            }
            Operand::Bound(value) => {
                if operator.is_range() {
                    return Err(QueryBuilderError::InvalidValueShape {
                        operator: operator.as_str(),
                        shape,
                    });
                }
                let value = if operator == Operator::Like {
                    value.into_like_pattern()
                } else {
                    value
                };
                segments.push(single_placeholder());
                pending.push(PendingBind::next(value));
            }
            Operand::Column(column) => {
                if operator.is_range() {
                    return Err(QueryBuilderError::InvalidValueShape {
                        operator: operator.as_str(),
                        shape,
                    });
                }
                segments.push(Segment::Names(NameList::from(column)));
            }
            Operand::Raw(sql) => segments.push(Segment::Raw(sql)),
        }

        for segment in segments {
            self.fragments.push(role, segment);
        }
        self.binds.entry(role).or_default().extend(pending);
        Ok(())
    }
}

impl<X: Executor> Engineer<X> {
    /// Renders the statement and hands it to the executor.
    #[track_caller]
    pub fn exec(self) -> std::result::Result<X::Output, X::Error> {
        let called = Location::caller();
        let query = self.build()?;
        self.dispatch(query, called, false)
    }

    /// Like [`Engineer::exec`], with every bind inlined as an escaped literal.
    #[track_caller]
    pub fn exec_raw(self) -> std::result::Result<X::Output, X::Error> {
        let called = Location::caller();
        let mut query = self.build()?;
        query.sql = inline(&query.sql, &query.binds, &query.blueprint)?;
        query.binds.clear();
        self.dispatch(query, called, true)
    }

    fn dispatch(
        self,
        query: BuiltQuery,
        called: &'static Location<'static>,
        inlined: bool,
    ) -> std::result::Result<X::Output, X::Error> {
        let context = ExecContext {
            called,
            trace: self.trace,
            stopwatch: self.stopwatch.mark_built(),
            inlined,
        };
        self.executor.execute(query, context)
    }
}

const fn single_placeholder() -> Segment {
    Segment::Placeholders {
        count: 1,
        style: ListStyle::Spaced,
    }
}

fn split_values<'a, V: ToSqlValue>(
    values: impl IntoIterator<Item = (&'a str, V)>,
) -> (NameList, Vec<PendingBind>) {
    let mut columns = NameList::new();
    let mut pending = Vec::new();
    for (column, value) in values {
        columns.push(column);
        pending.push(PendingBind::next(value.to_sql_value()));
    }
    (columns, pending)
}

// Text on the right of a join condition names a column.
fn join_operand(value: impl Into<Operand>) -> Operand {
    match value.into() {
        Operand::Bound(SqlValue::Text(reference)) => Operand::Column(reference),
        operand => operand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::BindKey;

    fn sqlite() -> Engineer {
        Engineer::new(Blueprint::Sqlite)
    }

    #[test]
    fn build_is_repeatable() {
        let engineer = sqlite()
            .read("users")
            .unwrap()
            .where_("id", ">", 3)
            .unwrap()
            .limit(10)
            .unwrap();
        assert_eq!(engineer.build().unwrap(), engineer.build().unwrap());
    }

    #[test]
    fn trace_records_calls_in_order() {
        let engineer = sqlite()
            .read("users")
            .unwrap()
            .where_("id", "=", 1)
            .unwrap()
            .and_where("name", "=", "julian")
            .unwrap()
            .order("id", "DESC");
        assert_eq!(engineer.trace(), ["read", "where_", "and_where", "order"]);
    }

    #[test]
    fn failed_condition_leaves_no_fragment() {
        let engineer = sqlite().read("users").unwrap();
        assert!(engineer.fragments.is_empty(ClauseRole::Where));
        let err = sqlite()
            .read("users")
            .unwrap()
            .where_("id", "BETWEEN", 1)
            .unwrap_err();
        assert_eq!(
            err,
            QueryBuilderError::InvalidValueShape {
                operator: "BETWEEN",
                shape: "a single value"
            }
        );
    }

    #[test]
    fn range_needs_two_values() {
        let err = sqlite()
            .read("users")
            .unwrap()
            .where_("id", "BETWEEN", [1, 2, 3])
            .unwrap_err();
        assert!(matches!(err, QueryBuilderError::InvalidValueShape { .. }));
    }

    #[test]
    fn query_keeps_named_binds() {
        let query = sqlite()
            .query(
                "SELECT * FROM users WHERE id = :id",
                vec![(":id", 4)],
            )
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(query.binds, vec![Bind::named(":id", 4)]);
        assert_eq!(query.binds[0].key, BindKey::Name(String::from(":id")));
    }

    #[test]
    fn detached_exec_returns_the_statement() {
        let query = sqlite().delete("users").unwrap().exec().unwrap();
        assert_eq!(query.sql, "DELETE FROM `users`");
        assert_eq!(query.kind, StatementKind::Delete);
    }

    #[test]
    fn exec_raw_inlines_binds() {
        let query = sqlite()
            .read("users")
            .unwrap()
            .where_("name", "=", "O'Brien")
            .unwrap()
            .exec_raw()
            .unwrap();
        assert_eq!(query.sql, "SELECT * FROM `users` WHERE `name` = 'O''Brien'");
        assert!(query.binds.is_empty());
    }

    #[test]
    fn exec_raw_escapes_backslashes_for_mysql() {
        let query = Engineer::new(Blueprint::MySql)
            .read("users")
            .unwrap()
            .where_("name", "=", "\\' OR 1=1 -- ")
            .unwrap()
            .exec_raw()
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT * FROM `users` WHERE `name` = '\\\\'' OR 1=1 -- '"
        );
    }

    #[test]
    fn exec_raw_counts_placeholders_past_escaped_quotes() {
        let query = Engineer::new(Blueprint::MySql)
            .query("SELECT 'it\\'s ?', ?", vec![1_i64])
            .unwrap()
            .exec_raw()
            .unwrap();
        assert_eq!(query.sql, "SELECT 'it\\'s ?', 1");

        let err = sqlite().query("SELECT ?, ?", vec![1_i64]).unwrap().exec_raw().unwrap_err();
        assert_eq!(
            err,
            QueryBuilderError::BindCountMismatch {
                placeholders: 2,
                values: 1
            }
        );
    }

    #[test]
    fn exec_raw_inlines_non_finite_floats_as_null() {
        let query = sqlite()
            .read("points")
            .unwrap()
            .where_("x", ">", f64::NAN)
            .unwrap()
            .and_where("y", "<", f64::INFINITY)
            .unwrap()
            .exec_raw()
            .unwrap();
        assert_eq!(query.sql, "SELECT * FROM `points` WHERE `x` > NULL AND `y` < NULL");
    }
}
