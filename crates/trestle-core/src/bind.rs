//! Bind values, bind keys and placeholder resolution.
//!
//! A built statement carries either positional binds (1-based, matching `?`
//! placeholders in order) or named binds (`:name`), never both.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::dialect::Dialect;
use crate::error::{QueryBuilderError, Result};
use crate::value::{SqlValue, ToSqlValue};

/// Key of a bind value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum BindKey {
    /// 1-based position of a `?` placeholder.
    Position(usize),
    /// Name of a `:name` placeholder, including the leading colon.
    Name(String),
}

impl BindKey {
    /// Creates a named key, adding the leading `:` when missing.
    #[must_use]
    pub fn named(name: &str) -> Self {
        if name.starts_with(':') {
            Self::Name(String::from(name))
        } else {
            Self::Name(format!(":{name}"))
        }
    }

    /// Whether the key is named.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Name(_))
    }
}

impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(p) => write!(f, "{p}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

impl From<usize> for BindKey {
    fn from(position: usize) -> Self {
        Self::Position(position)
    }
}

impl From<&str> for BindKey {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for BindKey {
    fn from(name: String) -> Self {
        Self::named(&name)
    }
}

/// A resolved bind: key and value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bind {
    /// Position or name.
    pub key: BindKey,
    /// Value sent to the driver.
    pub value: SqlValue,
}

impl Bind {
    /// Creates a positional bind.
    #[must_use]
    pub fn at(position: usize, value: impl ToSqlValue) -> Self {
        Self {
            key: BindKey::Position(position),
            value: value.to_sql_value(),
        }
    }

    /// Creates a named bind.
    #[must_use]
    pub fn named(name: &str, value: impl ToSqlValue) -> Self {
        Self {
            key: BindKey::named(name),
            value: value.to_sql_value(),
        }
    }
}

/// A value waiting to be merged into the flat bind list.
///
/// `key: None` means "next position".
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBind {
    /// Explicit key, if any.
    pub key: Option<BindKey>,
    /// The value.
    pub value: SqlValue,
}

impl PendingBind {
    /// Creates a bind that takes the next free position.
    #[must_use]
    pub const fn next(value: SqlValue) -> Self {
        Self { key: None, value }
    }

    const fn is_named(&self) -> bool {
        matches!(self.key, Some(BindKey::Name(_)))
    }
}

/// Binds passed verbatim to a raw `query`.
///
/// ```rust
/// use trestle_core::{BindKey, BindList, SqlValue};
///
/// let positional = BindList::from(vec![1, 2]);
/// let named = BindList::from(vec![(":id", 1)]);
/// let explicit = BindList::from(vec![(BindKey::Position(1), SqlValue::Int(1))]);
/// assert_eq!(positional.len(), 2);
/// assert_eq!(named.len(), 1);
/// assert_eq!(explicit.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindList(Vec<PendingBind>);

impl BindList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a positional value.
    #[must_use]
    pub fn push(mut self, value: impl ToSqlValue) -> Self {
        self.0.push(PendingBind::next(value.to_sql_value()));
        self
    }

    /// Appends a keyed value.
    #[must_use]
    pub fn with(mut self, key: impl Into<BindKey>, value: impl ToSqlValue) -> Self {
        self.0.push(PendingBind {
            key: Some(key.into()),
            value: value.to_sql_value(),
        });
        self
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_pending(self) -> Vec<PendingBind> {
        self.0
    }
}

impl From<()> for BindList {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl<T: ToSqlValue> From<Vec<T>> for BindList {
    fn from(values: Vec<T>) -> Self {
        Self(
            values
                .into_iter()
                .map(|v| PendingBind::next(v.to_sql_value()))
                .collect(),
        )
    }
}

impl<T: ToSqlValue, const N: usize> From<[T; N]> for BindList {
    fn from(values: [T; N]) -> Self {
        Self(
            values
                .into_iter()
                .map(|v| PendingBind::next(v.to_sql_value()))
                .collect(),
        )
    }
}

impl<K: Into<BindKey>, V: ToSqlValue> From<Vec<(K, V)>> for BindList {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| PendingBind {
                    key: Some(k.into()),
                    value: v.to_sql_value(),
                })
                .collect(),
        )
    }
}

impl<K: Into<BindKey>, V: ToSqlValue, const N: usize> From<[(K, V); N]> for BindList {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from(Vec::from(pairs))
    }
}

/// Which key style a statement has committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindStyle {
    Positional,
    Named,
}

/// Merges per-role pending binds into one flat list.
///
/// Call [`BindMerger::extend`] once per role in rendering order.
#[derive(Debug, Default)]
pub(crate) struct BindMerger {
    style: Option<BindStyle>,
    next_position: usize,
    binds: Vec<Bind>,
}

impl BindMerger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend(&mut self, pending: &[PendingBind]) -> Result<()> {
        let named = pending.iter().filter(|b| b.is_named()).count();
        let role_style = match (named, pending.len() - named) {
            (0, 0) => return Ok(()),
            (_, 0) => BindStyle::Named,
            (0, _) => BindStyle::Positional,
            _ => return Err(QueryBuilderError::MixedBindStyle),
        };
        match self.style {
            Some(style) if style != role_style => return Err(QueryBuilderError::MixedBindStyle),
            _ => self.style = Some(role_style),
        }

        if role_style == BindStyle::Named {
            for bind in pending {
                if let Some(key) = &bind.key {
                    self.binds.push(Bind {
                        key: key.clone(),
                        value: bind.value.clone(),
                    });
                }
            }
            return Ok(());
        }

        let mut explicit: Vec<(usize, SqlValue)> = Vec::new();
        let mut sequential: Vec<SqlValue> = Vec::new();
        for bind in pending {
            match &bind.key {
                Some(BindKey::Position(p)) => explicit.push((*p, bind.value.clone())),
                _ => sequential.push(bind.value.clone()),
            }
        }
        explicit.sort_by_key(|(p, _)| *p);
        for (position, value) in explicit {
            self.next_position = self.next_position.max(position);
            self.binds.push(Bind {
                key: BindKey::Position(position),
                value,
            });
        }
        for value in sequential {
            self.next_position += 1;
            self.binds.push(Bind {
                key: BindKey::Position(self.next_position),
                value,
            });
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<Bind> {
        self.binds
    }
}

/// A placeholder found in SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Positional,
    /// `:name`, including the colon.
    Named(String),
}

/// Finds every placeholder outside quoted text and comments.
///
/// Under a dialect with [`Dialect::backslash_escapes`], a backslash inside a
/// quoted string escapes the character after it.
#[must_use]
pub fn scan_placeholders(sql: &str, dialect: &dyn Dialect) -> Vec<(Range<usize>, Placeholder)> {
    let bytes = sql.as_bytes();
    let backslash_escapes = dialect.backslash_escapes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                let escapable = backslash_escapes && quote != b'`';
                i += 1;
                while i < bytes.len() {
                    if escapable && bytes[i] == b'\\' {
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote {
                        // doubled quote is an escaped quote
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 1;
                        } else {
                            break;
                        }
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            b'?' => found.push((i..i + 1, Placeholder::Positional)),
            b':' => {
                let follows_colon = i > 0 && bytes[i - 1] == b':';
                let starts_ident = bytes
                    .get(i + 1)
                    .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_');
                if !follows_colon && starts_ident {
                    let start = i;
                    i += 1;
                    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                    {
                        i += 1;
                    }
                    found.push((start..i, Placeholder::Named(String::from(&sql[start..i]))));
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    found
}

/// Rewrites named placeholders to `?` and orders the values to match.
///
/// Positional binds pass through unchanged, ordered by position.
pub fn to_positional(
    sql: &str,
    binds: &[Bind],
    dialect: &dyn Dialect,
) -> Result<(String, Vec<SqlValue>)> {
    if !binds.iter().any(|b| b.key.is_named()) {
        let mut ordered: Vec<&Bind> = binds.iter().collect();
        ordered.sort_by_key(|b| match b.key {
            BindKey::Position(p) => p,
            BindKey::Name(_) => usize::MAX,
        });
        return Ok((
            String::from(sql),
            ordered.into_iter().map(|b| b.value.clone()).collect(),
        ));
    }
    if binds.iter().any(|b| !b.key.is_named()) {
        return Err(QueryBuilderError::MixedBindStyle);
    }

    let by_name: HashMap<&str, &SqlValue> = binds
        .iter()
        .filter_map(|b| match &b.key {
            BindKey::Name(n) => Some((n.as_str(), &b.value)),
            BindKey::Position(_) => None,
        })
        .collect();

    let mut rewritten = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut cursor = 0;
    for (range, placeholder) in scan_placeholders(sql, dialect) {
        match placeholder {
            Placeholder::Positional => return Err(QueryBuilderError::MixedBindStyle),
            Placeholder::Named(name) => {
                let value = by_name
                    .get(name.as_str())
                    .ok_or_else(|| QueryBuilderError::UnboundParameter(name.clone()))?;
                rewritten.push_str(&sql[cursor..range.start]);
                rewritten.push('?');
                values.push((*value).clone());
                cursor = range.end;
            }
        }
    }
    rewritten.push_str(&sql[cursor..]);
    Ok((rewritten, values))
}

/// Replaces every placeholder with the dialect's literal for its value.
///
/// Fails unless every placeholder gets exactly one value.
pub fn inline(sql: &str, binds: &[Bind], dialect: &dyn Dialect) -> Result<String> {
    let (positional_sql, values) = to_positional(sql, binds, dialect)?;
    let slots: Vec<Range<usize>> = scan_placeholders(&positional_sql, dialect)
        .into_iter()
        .filter(|(_, placeholder)| *placeholder == Placeholder::Positional)
        .map(|(range, _)| range)
        .collect();
    if slots.len() != values.len() {
        return Err(QueryBuilderError::BindCountMismatch {
            placeholders: slots.len(),
            values: values.len(),
        });
    }

    let mut out = String::with_capacity(positional_sql.len());
    let mut cursor = 0;
    for (range, value) in slots.into_iter().zip(&values) {
        out.push_str(&positional_sql[cursor..range.start]);
        out.push_str(&dialect.inline_literal(value));
        cursor = range.end;
    }
    out.push_str(&positional_sql[cursor..]);
    Ok(out)
}
