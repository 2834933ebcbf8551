#![allow(dead_code)]

use trestle_core::{Blueprint, BuiltQuery, Engineer, QueryBuilderError, SqlValue};

pub fn mysql() -> Engineer {
    Engineer::new(Blueprint::MySql)
}

pub fn sqlite() -> Engineer {
    Engineer::new(Blueprint::Sqlite)
}

pub fn build(engineer: Result<Engineer, QueryBuilderError>) -> BuiltQuery {
    engineer
        .and_then(|e| e.build())
        .unwrap_or_else(|e| panic!("Failed to build: {e}"))
}

pub fn build_err(engineer: Result<Engineer, QueryBuilderError>) -> QueryBuilderError {
    match engineer.and_then(|e| e.build()) {
        Ok(query) => panic!("Expected a builder error, got {}", query.sql),
        Err(e) => e,
    }
}

pub fn ints(values: &[i64]) -> Vec<SqlValue> {
    values.iter().map(|v| SqlValue::Int(*v)).collect()
}

pub fn text(value: &str) -> SqlValue {
    SqlValue::Text(String::from(value))
}

/// Values of a built query, owned for easy comparison.
pub fn values(query: &BuiltQuery) -> Vec<SqlValue> {
    query.binds.iter().map(|b| b.value.clone()).collect()
}
