//! SQL dialect support.
//!
//! Each supported database engine is a [`Blueprint`]. A blueprint decides how
//! identifiers are quoted, which joins are available and in which order the
//! clause roles of a statement are rendered.

mod mysql;
mod sqlite;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fragment::{quote_identifier, ClauseRole};
use crate::value::SqlValue;

pub use mysql::MySqlDialect;
pub use sqlite::SqliteDialect;

/// The fundamental kind of a statement, fixed by its master method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Raw SQL passed through verbatim.
    Query,
    /// `SELECT`.
    Read,
    /// `INSERT`.
    Create,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
}

impl StatementKind {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether the statement returns rows.
    #[must_use]
    pub const fn returns_rows(self) -> bool {
        matches!(self, Self::Read)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A join keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// `JOIN`
    Join,
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `FULL OUTER JOIN`
    FullOuter,
}

impl JoinKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = crate::error::QueryBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        match normalized.as_str() {
            "JOIN" => Ok(Self::Join),
            "INNER" | "INNER JOIN" => Ok(Self::Inner),
            "LEFT" | "LEFT JOIN" => Ok(Self::Left),
            "RIGHT" | "RIGHT JOIN" => Ok(Self::Right),
            "FULL OUTER" | "FULL OUTER JOIN" => Ok(Self::FullOuter),
            _ => Err(crate::error::QueryBuilderError::UnsupportedJoinType {
                dialect: "any",
                join: String::from(s),
            }),
        }
    }
}

const QUERY: &[ClauseRole] = &[ClauseRole::Query];
const READ: &[ClauseRole] = &[
    ClauseRole::Columns,
    ClauseRole::Table,
    ClauseRole::Join,
    ClauseRole::Where,
    ClauseRole::Group,
    ClauseRole::Order,
    ClauseRole::Limit,
];
const CREATE: &[ClauseRole] = &[ClauseRole::Table, ClauseRole::Set];
const UPDATE: &[ClauseRole] = &[ClauseRole::Table, ClauseRole::Set, ClauseRole::Where];
const DELETE: &[ClauseRole] = &[ClauseRole::Table, ClauseRole::Where];

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '`'
    }

    /// Join keywords the dialect understands.
    fn supported_joins(&self) -> &'static [JoinKind];

    /// Whether `kind` is one of [`Dialect::supported_joins`].
    fn supports_join(&self, kind: JoinKind) -> bool {
        self.supported_joins().contains(&kind)
    }

    /// Rendering order of the clause roles for a statement kind.
    fn pattern(&self, kind: StatementKind) -> &'static [ClauseRole] {
        match kind {
            StatementKind::Query => QUERY,
            StatementKind::Read => READ,
            StatementKind::Create => CREATE,
            StatementKind::Update => UPDATE,
            StatementKind::Delete => DELETE,
        }
    }

    /// Quotes a single identifier.
    fn quote_identifier(&self, name: &str) -> String {
        quote_identifier(name, self.identifier_quote())
    }

    /// Whether a backslash escapes the next character inside a quoted
    /// string.
    fn backslash_escapes(&self) -> bool {
        false
    }

    /// Quotes text as a string literal.
    fn string_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    /// Renders a bind value as a literal for inlining into SQL text.
    fn inline_literal(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Text(text) => self.string_literal(text),
            other => other.to_sql_inline(),
        }
    }
}

/// The closed set of supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Blueprint {
    /// MySQL and MariaDB.
    #[serde(rename = "MySQL", alias = "mysql")]
    MySql,
    /// SQLite 3.
    #[serde(rename = "SQLite", alias = "sqlite")]
    Sqlite,
}

impl Blueprint {
    /// Every supported blueprint.
    pub const ALL: [Self; 2] = [Self::MySql, Self::Sqlite];

    fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::MySql => &MySqlDialect,
            Self::Sqlite => &SqliteDialect,
        }
    }
}

impl Dialect for Blueprint {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn identifier_quote(&self) -> char {
        self.dialect().identifier_quote()
    }

    fn supported_joins(&self) -> &'static [JoinKind] {
        self.dialect().supported_joins()
    }

    fn backslash_escapes(&self) -> bool {
        self.dialect().backslash_escapes()
    }

    fn string_literal(&self, text: &str) -> String {
        self.dialect().string_literal(text)
    }

    fn pattern(&self, kind: StatementKind) -> &'static [ClauseRole] {
        self.dialect().pattern(kind)
    }
}

impl fmt::Display for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Blueprint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(format!("unknown driver \"{s}\", expected MySQL or SQLite")),
        }
    }
}
