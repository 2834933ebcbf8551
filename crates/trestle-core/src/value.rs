//! SQL values and operands.
//!
//! Values passed to the builder are parameterized by default. The
//! [`Operand`] type makes the two escape hatches explicit: [`col`] inlines a
//! quoted identifier and [`raw`] inlines verbatim SQL.

use std::fmt;

use serde::Serialize;

/// A SQL value that can be bound as a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// The value as a standard SQL literal.
    ///
    /// Text only has its quotes doubled; inlining for a connection goes
    /// through [`Dialect::inline_literal`](crate::Dialect::inline_literal).
    /// NaN and the infinities have no literal and render as `NULL`.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(x) if !x.is_finite() => String::from("NULL"),
            Self::Float(x) => x.to_string(),
            Self::Text(text) => format!("'{}'", text.replace('\'', "''")),
            Self::Blob(bytes) => {
                let mut literal = String::with_capacity(bytes.len() * 2 + 3);
                literal.push_str("X'");
                for byte in bytes {
                    literal.push_str(&format!("{byte:02X}"));
                }
                literal.push('\'');
                literal
            }
        }
    }

    /// Short name of the value's kind, as reported in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    /// Returns `true` for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Wraps the value in `%` for a substring `LIKE` match.
    #[must_use]
    pub(crate) fn into_like_pattern(self) -> Self {
        match self {
            Self::Text(s) => Self::Text(format!("%{s}%")),
            Self::Null => Self::Null,
            other => Self::Text(format!("%{other}%")),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! lossless {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(
            impl ToSqlValue for $source {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::$variant(<$target>::from(self))
                }
            }
        )+
    };
}

lossless!(Int(i64): i64, i32, i16, i8, u32, u16, u8);
lossless!(Float(f64): f64, f32);

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

/// The right-hand side of a `WHERE` or `ON` condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A value sent to the driver as a parameter.
    Bound(SqlValue),
    /// A column reference, rendered as a quoted identifier.
    Column(String),
    /// SQL text rendered verbatim.
    Raw(String),
    /// A list of values, accepted by `BETWEEN` and `NOT BETWEEN` only.
    Range(Vec<SqlValue>),
}

impl Operand {
    pub(crate) const fn shape(&self) -> &'static str {
        match self {
            Self::Bound(_) => "a single value",
            Self::Column(_) => "a column",
            Self::Raw(_) => "raw SQL",
            Self::Range(_) => "a list of values",
        }
    }
}

impl<T: ToSqlValue> From<T> for Operand {
    fn from(value: T) -> Self {
        Self::Bound(value.to_sql_value())
    }
}

impl<T: ToSqlValue, const N: usize> From<[T; N]> for Operand {
    fn from(values: [T; N]) -> Self {
        Self::Range(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

/// Creates a column operand, rendered as a quoted identifier.
///
/// ```rust
/// use trestle_core::{col, Blueprint, Engineer};
///
/// let query = Engineer::new(Blueprint::Sqlite)
///     .read(["articles", "users"])?
///     .where_("articles.author", "=", col("users.id"))?
///     .build()?;
///
/// assert_eq!(
///     query.sql,
///     "SELECT * FROM `articles`, `users` WHERE `articles`.`author` = `users`.`id`"
/// );
/// # Ok::<(), trestle_core::QueryBuilderError>(())
/// ```
#[must_use]
pub fn col(name: &str) -> Operand {
    Operand::Column(String::from(name))
}

/// Creates a raw operand, rendered verbatim.
///
/// **Warning**: Only use this for SQL fragments that don't contain user input.
#[must_use]
pub fn raw(sql: &str) -> Operand {
    Operand::Raw(String::from(sql))
}

/// Creates a two-value range operand for `BETWEEN`.
#[must_use]
pub fn range<T: ToSqlValue, U: ToSqlValue>(low: T, high: U) -> Operand {
    Operand::Range(vec![low.to_sql_value(), high.to_sql_value()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_null() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
    }

    #[test]
    fn inline_text_doubles_quotes() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
    }

    #[test]
    fn inline_text_stays_one_literal() {
        let value = SqlValue::Text(String::from("'; DROP TABLE users; --"));
        assert_eq!(value.to_sql_inline(), "'''; DROP TABLE users; --'");
    }

    #[test]
    fn inline_non_finite_floats_as_null() {
        assert_eq!(SqlValue::Float(f64::NAN).to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Float(f64::INFINITY).to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Float(f64::NEG_INFINITY).to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Float(2.5).to_sql_inline(), "2.5");
    }

    #[test]
    fn inline_blob_as_hex() {
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x49]).to_sql_inline(),
            "X'4849'"
        );
    }

    #[test]
    fn like_pattern_wraps_in_percent() {
        assert_eq!(
            "jul".to_sql_value().into_like_pattern(),
            SqlValue::Text(String::from("%jul%"))
        );
        assert_eq!(
            7_i32.to_sql_value().into_like_pattern(),
            SqlValue::Text(String::from("%7%"))
        );
    }

    #[test]
    fn operand_conversions() {
        assert_eq!(Operand::from(1_i32), Operand::Bound(SqlValue::Int(1)));
        assert_eq!(
            Operand::from("julian"),
            Operand::Bound(SqlValue::Text(String::from("julian")))
        );
        assert_eq!(
            Operand::from([1, 9]),
            Operand::Range(vec![SqlValue::Int(1), SqlValue::Int(9)])
        );
        assert_eq!(col("users.id"), Operand::Column(String::from("users.id")));
        assert_eq!(raw("NOW()"), Operand::Raw(String::from("NOW()")));
    }

    #[test]
    fn serializes_untagged() {
        let values = vec![SqlValue::Int(1), SqlValue::Text(String::from("a")), SqlValue::Null];
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[1,"a",null]"#);
    }
}
