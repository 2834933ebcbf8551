//! Errors raised while assembling a statement.

use thiserror::Error;

use crate::fragment::ClauseRole;

/// Structural misuse of the fluent builder.
///
/// These are programmer mistakes: they surface before anything is sent to a
/// connection and are never retried or suppressed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryBuilderError {
    /// A second master method was called on the same statement.
    #[error("the statement is already using the \"{current}\" method, \"{attempted}\" can not be called")]
    AlreadyBuilding {
        /// Master method already in use.
        current: &'static str,
        /// Master method that was rejected.
        attempted: &'static str,
    },

    /// The operator is not one of the supported comparison operators.
    #[error("invalid operator \"{0}\", expected one of =, >, <, >=, <=, !=, BETWEEN, NOT BETWEEN, LIKE")]
    InvalidOperator(String),

    /// The value does not fit the operator (list vs scalar).
    #[error("the \"{operator}\" operator can not accept {shape}")]
    InvalidValueShape {
        /// Operator in use.
        operator: &'static str,
        /// Shape of the rejected value.
        shape: &'static str,
    },

    /// A continuation method was called before the clause it extends.
    #[error("you can not call {method}() before calling {requires}()")]
    NoPriorClause {
        /// Method that was called.
        method: &'static str,
        /// Method that has to come first.
        requires: &'static str,
    },

    /// A numeric argument is out of range.
    #[error("{method}() requires a non-negative integer, got {value}")]
    InvalidArgument {
        /// Method that was called.
        method: &'static str,
        /// Rejected value.
        value: i64,
    },

    /// The dialect has no support for the requested join.
    #[error("the {dialect} dialect does not support {join}")]
    UnsupportedJoinType {
        /// Dialect name.
        dialect: &'static str,
        /// Requested join keyword.
        join: String,
    },

    /// An insert or update was requested with no column values.
    #[error("{method}() requires at least one column value")]
    EmptySet {
        /// Master method that was called.
        method: &'static str,
    },

    /// Named (`:name`) and positional (`?`) binds were combined.
    #[error("you can not mix named (:example) and positional (?) bindings together")]
    MixedBindStyle,

    /// A named placeholder has no matching bind.
    #[error("no value was bound for the {0} placeholder")]
    UnboundParameter(String),

    /// The SQL text and the bind values disagree on the number of
    /// placeholders.
    #[error("the statement has {placeholders} placeholder(s) but {values} value(s) were bound")]
    BindCountMismatch {
        /// Placeholders found outside quoted text and comments.
        placeholders: usize,
        /// Values supplied.
        values: usize,
    },

    /// Qualified columns were passed as the table list alongside an explicit
    /// column list.
    #[error("{method}() can not take qualified columns as tables and a column list together")]
    ConflictingColumns {
        /// Method that was called.
        method: &'static str,
    },

    /// A clause was added that the statement kind can not carry.
    #[error("a {role} clause is not allowed in a {kind} statement")]
    ClauseNotAllowed {
        /// Offending clause role.
        role: ClauseRole,
        /// Statement kind.
        kind: &'static str,
    },

    /// The statement was executed without a master method.
    #[error("can't build query, no master method (query, read, create, update, delete) was called")]
    NoStatement,
}

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, QueryBuilderError>;
