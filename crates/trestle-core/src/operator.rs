//! Comparison operators accepted by `WHERE` and `ON` conditions.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryBuilderError;

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    GtEq,
    /// `<=`
    LtEq,
    /// `!=`
    NotEq,
    /// `BETWEEN`
    Between,
    /// `NOT BETWEEN`
    NotBetween,
    /// `LIKE`
    Like,
}

impl Operator {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
            Self::NotEq => "!=",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::Like => "LIKE",
        }
    }

    /// Whether the operator takes a two-value range.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }
}

impl FromStr for Operator {
    type Err = QueryBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        match normalized.as_str() {
            "=" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            "<" => Ok(Self::Lt),
            ">=" => Ok(Self::GtEq),
            "<=" => Ok(Self::LtEq),
            "!=" => Ok(Self::NotEq),
            "BETWEEN" => Ok(Self::Between),
            "NOT BETWEEN" => Ok(Self::NotBetween),
            "LIKE" => Ok(Self::Like),
            _ => Err(QueryBuilderError::InvalidOperator(String::from(s))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("like".parse::<Operator>().unwrap(), Operator::Like);
        assert_eq!("not  between".parse::<Operator>().unwrap(), Operator::NotBetween);
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::GtEq);
    }

    #[test]
    fn rejects_unknown() {
        assert_eq!(
            "<>".parse::<Operator>(),
            Err(QueryBuilderError::InvalidOperator(String::from("<>")))
        );
        assert!("IN".parse::<Operator>().is_err());
    }
}
