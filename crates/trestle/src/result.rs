//! Rows and status of an executed statement.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use sqlx::any::AnyRow;
use sqlx::{Column, Row, ValueRef};
use trestle_core::SqlValue;

use crate::debug::DebugInfo;

/// One row, columns in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, SqlValue)>,
}

impl Record {
    /// Creates a record from column/value pairs.
    #[must_use]
    pub fn new(fields: Vec<(String, SqlValue)>) -> Self {
        Self { fields }
    }

    /// Value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Column/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        let mut fields = Vec::with_capacity(row.len());
        for (index, column) in row.columns().iter().enumerate() {
            fields.push((String::from(column.name()), decode(row, index)?));
        }
        Ok(Self { fields })
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn decode(row: &AnyRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(SqlValue::Null);
    }
    if let Ok(v) = row.try_get::<i64, _>(index) {
        return Ok(SqlValue::Int(v));
    }
    if let Ok(v) = row.try_get::<i32, _>(index) {
        return Ok(SqlValue::Int(i64::from(v)));
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return Ok(SqlValue::Float(v));
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return Ok(SqlValue::Text(v));
    }
    if let Ok(v) = row.try_get::<bool, _>(index) {
        return Ok(SqlValue::Bool(v));
    }
    row.try_get::<Vec<u8>, _>(index).map(SqlValue::Blob)
}

/// Outcome of one statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    rows: Vec<Record>,
    affected: u64,
    last_insert_id: Option<i64>,
    status: bool,
    debug: DebugInfo,
}

impl ResultSet {
    pub(crate) fn with_rows(rows: Vec<Record>, debug: DebugInfo) -> Self {
        Self {
            affected: rows.len() as u64,
            rows,
            last_insert_id: None,
            status: true,
            debug,
        }
    }

    pub(crate) const fn with_affected(
        affected: u64,
        last_insert_id: Option<i64>,
        debug: DebugInfo,
    ) -> Self {
        Self {
            rows: Vec::new(),
            affected,
            last_insert_id,
            status: true,
            debug,
        }
    }

    pub(crate) const fn failed(debug: DebugInfo) -> Self {
        Self {
            rows: Vec::new(),
            affected: 0,
            last_insert_id: None,
            status: false,
            debug,
        }
    }

    /// Every returned row.
    #[must_use]
    pub fn all(&self) -> &[Record] {
        &self.rows
    }

    /// Alias of [`ResultSet::all`].
    #[must_use]
    pub fn results(&self) -> &[Record] {
        self.all()
    }

    /// The first returned row.
    #[must_use]
    pub fn first(&self) -> Option<&Record> {
        self.rows.first()
    }

    /// Alias of [`ResultSet::first`].
    #[must_use]
    pub fn result(&self) -> Option<&Record> {
        self.first()
    }

    /// Rows returned, or rows affected for statements without a result set.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.affected
    }

    /// Whether the statement succeeded.
    #[must_use]
    pub const fn status(&self) -> bool {
        self.status
    }

    /// The diagnostic bundle.
    #[must_use]
    pub const fn debug(&self) -> &DebugInfo {
        &self.debug
    }

    /// Row id generated by the last insert, when the driver reports one.
    #[must_use]
    pub const fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    /// Takes the rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}
