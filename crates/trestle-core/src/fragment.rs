//! The structural pieces a statement is assembled from.
//!
//! A statement is a [`FragmentSet`]: for each [`ClauseRole`] an ordered list
//! of [`Segment`]s. Segments render in insertion order and are separated by
//! a single space; lists inside a segment use `, `.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::operator::Operator;

/// A named slot in a statement's fixed rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseRole {
    /// `SELECT` and the column list.
    Columns,
    /// `FROM`, `INSERT INTO`, `UPDATE` or `DELETE FROM` with the tables.
    Table,
    /// Joins with their `ON` conditions.
    Join,
    /// `WHERE` conditions.
    Where,
    /// `ORDER BY`.
    Order,
    /// `GROUP BY`.
    Group,
    /// `LIMIT`.
    Limit,
    /// `SET` assignments or the `VALUES` list.
    Set,
    /// A raw statement.
    Query,
}

impl ClauseRole {
    /// Lowercase role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Columns => "columns",
            Self::Table => "table",
            Self::Join => "join",
            Self::Where => "where",
            Self::Order => "order",
            Self::Group => "group",
            Self::Limit => "limit",
            Self::Set => "set",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for ClauseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// A table or column reference with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Bare (`users`) or qualified (`users.id`) reference.
    pub reference: String,
    /// Optional `AS` alias.
    pub alias: Option<String>,
}

impl Name {
    /// Creates a reference without alias.
    #[must_use]
    pub fn new(reference: &str) -> Self {
        Self {
            reference: String::from(reference),
            alias: None,
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(String::from(alias));
        self
    }

    /// Whether the reference carries a `table.` qualifier.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.reference.contains('.')
    }

    /// The qualifier of a `table.column` reference.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.reference.split_once('.').map(|(table, _)| table)
    }

    /// Renders the reference with each part quoted.
    #[must_use]
    pub fn render(&self, quote: char) -> String {
        let mut out = quote_reference(&self.reference, quote);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            out.push_str(&quote_identifier(alias, quote));
        }
        out
    }
}

impl From<&str> for Name {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

impl From<String> for Name {
    fn from(reference: String) -> Self {
        Self {
            reference,
            alias: None,
        }
    }
}

impl From<(&str, &str)> for Name {
    fn from((reference, alias): (&str, &str)) -> Self {
        Self::new(reference).alias(alias)
    }
}

/// An ordered list of names, as accepted by `read`, `order` and `group`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList(Vec<Name>);

impl NameList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a list of `reference AS alias` pairs.
    #[must_use]
    pub fn aliased<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(pairs.into_iter().map(Name::from).collect())
    }

    /// Appends a name.
    pub fn push(&mut self, name: impl Into<Name>) {
        self.0.push(name.into());
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the names.
    pub fn iter(&self) -> std::slice::Iter<'_, Name> {
        self.0.iter()
    }

    /// Whether any entry is qualified.
    #[must_use]
    pub fn has_qualified(&self) -> bool {
        self.0.iter().any(Name::is_qualified)
    }

    /// Whether the list contains `reference`, ignoring aliases.
    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.0.iter().any(|n| n.reference == reference)
    }

    /// Removes every entry referencing `reference`.
    pub fn remove(&mut self, reference: &str) {
        self.0.retain(|n| n.reference != reference);
    }

    /// Renders `a, b, c` with quoted identifiers.
    #[must_use]
    pub fn render(&self, quote: char) -> String {
        self.0
            .iter()
            .map(|n| n.render(quote))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> IntoIterator for &'a NameList {
    type Item = &'a Name;
    type IntoIter = std::slice::Iter<'a, Name>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<&str> for NameList {
    fn from(name: &str) -> Self {
        Self(vec![Name::new(name)])
    }
}

impl From<String> for NameList {
    fn from(name: String) -> Self {
        Self(vec![Name::from(name)])
    }
}

impl From<Name> for NameList {
    fn from(name: Name) -> Self {
        Self(vec![name])
    }
}

impl From<&[&str]> for NameList {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| Name::new(n)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameList {
    fn from(names: [&str; N]) -> Self {
        Self(names.into_iter().map(Name::new).collect())
    }
}

impl<const N: usize> From<[Name; N]> for NameList {
    fn from(names: [Name; N]) -> Self {
        Self(names.into_iter().collect())
    }
}

impl From<Vec<&str>> for NameList {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(Name::new).collect())
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        Self(names.into_iter().map(Name::from).collect())
    }
}

impl From<Vec<Name>> for NameList {
    fn from(names: Vec<Name>) -> Self {
        Self(names)
    }
}

impl FromIterator<Name> for NameList {
    fn from_iter<I: IntoIterator<Item = Name>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Quotes a single identifier, leaving `*` bare.
#[must_use]
pub fn quote_identifier(name: &str, quote: char) -> String {
    if name == "*" {
        return String::from("*");
    }
    let escaped = name.replace(quote, &format!("{quote}{quote}"));
    format!("{quote}{escaped}{quote}")
}

/// Quotes a possibly qualified reference part by part.
#[must_use]
pub fn quote_reference(reference: &str, quote: char) -> String {
    reference
        .split('.')
        .map(|part| quote_identifier(part.trim(), quote))
        .collect::<Vec<_>>()
        .join(".")
}

/// How a run of placeholders is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `?, ?`
    Spaced,
    /// `(?, ?)`
    Wrapped,
    /// `?,?`
    Compact,
}

/// One rendered piece of a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A keyword such as `SELECT`, `WHERE` or `AND`.
    Keyword(&'static str),
    /// A comma separated list of quoted names.
    Names(NameList),
    /// A parenthesized list of quoted names.
    WrappedNames(NameList),
    /// A comparison operator.
    Operator(Operator),
    /// Placeholders for pending binds.
    Placeholders {
        /// Number of `?`.
        count: usize,
        /// Layout.
        style: ListStyle,
    },
    /// `col = ?` pairs.
    Assignments(NameList),
    /// Verbatim SQL.
    Raw(String),
    /// Continues the previous list (`, `).
    Comma,
}

impl Segment {
    /// Renders the segment.
    #[must_use]
    pub fn render(&self, quote: char) -> String {
        match self {
            Self::Keyword(k) => String::from(*k),
            Self::Names(names) => names.render(quote),
            Self::WrappedNames(names) => format!("({})", names.render(quote)),
            Self::Operator(op) => String::from(op.as_str()),
            Self::Placeholders { count, style } => {
                let marks = vec!["?"; *count];
                match style {
                    ListStyle::Spaced => marks.join(", "),
                    ListStyle::Wrapped => format!("({})", marks.join(", ")),
                    ListStyle::Compact => marks.join(","),
                }
            }
            Self::Assignments(names) => names
                .iter()
                .map(|n| format!("{} = ?", quote_reference(&n.reference, quote)))
                .collect::<Vec<_>>()
                .join(", "),
            Self::Raw(sql) => sql.clone(),
            Self::Comma => String::from(","),
        }
    }
}

/// Clause role -> ordered segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentSet {
    roles: BTreeMap<ClauseRole, Vec<Segment>>,
}

impl FragmentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment to a role.
    pub fn push(&mut self, role: ClauseRole, segment: Segment) {
        self.roles.entry(role).or_default().push(segment);
    }

    /// Drops every segment of a role.
    pub fn reset(&mut self, role: ClauseRole) {
        self.roles.remove(&role);
    }

    /// Whether a role holds no segment.
    #[must_use]
    pub fn is_empty(&self, role: ClauseRole) -> bool {
        self.roles.get(&role).map_or(true, Vec::is_empty)
    }

    /// Roles currently holding segments.
    pub fn roles(&self) -> impl Iterator<Item = ClauseRole> + '_ {
        self.roles
            .iter()
            .filter(|(_, segments)| !segments.is_empty())
            .map(|(role, _)| *role)
    }

    /// Renders a role, or `None` when it is empty.
    #[must_use]
    pub fn render(&self, role: ClauseRole, quote: char) -> Option<String> {
        let segments = self.roles.get(&role).filter(|s| !s.is_empty())?;
        let mut out = String::new();
        for segment in segments {
            let piece = segment.render(quote);
            if !out.is_empty() && *segment != Segment::Comma {
                out.push(' ');
            }
            out.push_str(&piece);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_bare_and_qualified_references() {
        assert_eq!(quote_reference("users", '`'), "`users`");
        assert_eq!(quote_reference("users.id", '`'), "`users`.`id`");
        assert_eq!(quote_reference("users.*", '`'), "`users`.*");
        assert_eq!(quote_reference("*", '`'), "*");
    }

    #[test]
    fn escapes_quote_characters() {
        assert_eq!(quote_identifier("we`ird", '`'), "`we``ird`");
    }

    #[test]
    fn renders_aliases() {
        let name = Name::new("articles.id").alias("id");
        assert_eq!(name.render('`'), "`articles`.`id` AS `id`");
    }

    #[test]
    fn renders_placeholder_styles() {
        let spaced = Segment::Placeholders {
            count: 3,
            style: ListStyle::Spaced,
        };
        let wrapped = Segment::Placeholders {
            count: 2,
            style: ListStyle::Wrapped,
        };
        let compact = Segment::Placeholders {
            count: 2,
            style: ListStyle::Compact,
        };
        assert_eq!(spaced.render('`'), "?, ?, ?");
        assert_eq!(wrapped.render('`'), "(?, ?)");
        assert_eq!(compact.render('`'), "?,?");
    }

    #[test]
    fn comma_attaches_to_previous_segment() {
        let mut set = FragmentSet::new();
        set.push(ClauseRole::Order, Segment::Keyword("ORDER BY"));
        set.push(ClauseRole::Order, Segment::Names(NameList::from("a")));
        set.push(ClauseRole::Order, Segment::Keyword("ASC"));
        set.push(ClauseRole::Order, Segment::Comma);
        set.push(ClauseRole::Order, Segment::Names(NameList::from("b")));
        set.push(ClauseRole::Order, Segment::Keyword("DESC"));
        assert_eq!(
            set.render(ClauseRole::Order, '`').unwrap(),
            "ORDER BY `a` ASC, `b` DESC"
        );
    }

    #[test]
    fn empty_role_renders_nothing() {
        let mut set = FragmentSet::new();
        assert!(set.render(ClauseRole::Where, '`').is_none());
        set.push(ClauseRole::Where, Segment::Keyword("WHERE"));
        set.reset(ClauseRole::Where);
        assert!(set.is_empty(ClauseRole::Where));
    }
}
