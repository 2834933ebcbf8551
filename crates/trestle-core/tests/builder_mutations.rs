//! Tests for INSERT, UPDATE, DELETE and raw statements.

mod common;
use common::*;

use trestle_core::{
    BindKey, BindList, ClauseRole, QueryBuilderError, SqlValue, StatementKind, ToSqlValue,
};

#[test]
fn create_binds_in_column_order() {
    let query = build(sqlite().create(
        "users",
        [
            ("username", "julian".to_sql_value()),
            ("email", "julian@example.com".to_sql_value()),
            ("age", 33_i64.to_sql_value()),
        ],
    ));
    assert_eq!(
        query.sql,
        "INSERT INTO `users` (`username`, `email`, `age`) VALUES (?, ?, ?)"
    );
    assert_eq!(
        values(&query),
        vec![text("julian"), text("julian@example.com"), SqlValue::Int(33)]
    );
    assert_eq!(query.kind, StatementKind::Create);
}

#[test]
fn create_without_values() {
    let err = build_err(sqlite().create("users", Vec::<(&str, i64)>::new()));
    assert_eq!(err, QueryBuilderError::EmptySet { method: "create" });
}

#[test]
fn update_with_where() {
    let query = build(
        mysql()
            .update("users", [("username", "jj"), ("email", "jj@example.com")])
            .and_then(|e| e.where_("id", "=", 1)),
    );
    assert_eq!(
        query.sql,
        "UPDATE `users` SET `username` = ?, `email` = ? WHERE `id` = ?"
    );
    assert_eq!(
        values(&query),
        vec![text("jj"), text("jj@example.com"), SqlValue::Int(1)]
    );
}

#[test]
fn update_without_values() {
    let err = build_err(mysql().update("users", Vec::<(&str, i64)>::new()));
    assert_eq!(err, QueryBuilderError::EmptySet { method: "update" });
}

#[test]
fn delete_with_where() {
    let query = build(sqlite().delete("users").and_then(|e| e.where_("id", "=", 3)));
    assert_eq!(query.sql, "DELETE FROM `users` WHERE `id` = ?");
    assert_eq!(values(&query), ints(&[3]));
}

#[test]
fn limit_is_not_part_of_delete() {
    let err = build_err(sqlite().delete("users").and_then(|e| e.limit(1)));
    assert_eq!(
        err,
        QueryBuilderError::ClauseNotAllowed {
            role: ClauseRole::Limit,
            kind: "delete"
        }
    );
}

#[test]
fn where_is_not_part_of_create() {
    let err = build_err(
        sqlite()
            .create("users", [("a", 1)])
            .and_then(|e| e.where_("id", "=", 1)),
    );
    assert!(matches!(
        err,
        QueryBuilderError::ClauseNotAllowed {
            role: ClauseRole::Where,
            ..
        }
    ));
}

#[test]
fn raw_query_positional() {
    let query = build(sqlite().query("SELECT * FROM users WHERE id = ? OR id = ?", [1, 2]));
    assert_eq!(query.sql, "SELECT * FROM users WHERE id = ? OR id = ?");
    assert_eq!(values(&query), ints(&[1, 2]));
    assert_eq!(query.binds[0].key, BindKey::Position(1));
    assert_eq!(query.binds[1].key, BindKey::Position(2));
}

#[test]
fn raw_query_named() {
    let query = build(sqlite().query(
        "SELECT * FROM users WHERE name = :name",
        [("name", "julian")],
    ));
    assert_eq!(query.binds[0].key, BindKey::Name(String::from(":name")));
}

#[test]
fn raw_query_without_binds() {
    let query = build(sqlite().query("SELECT 1", BindList::new()));
    assert!(query.binds.is_empty());
    assert_eq!(query.kind, StatementKind::Query);
}

#[test]
fn raw_query_mixed_keys() {
    let binds = BindList::new()
        .with(1_usize, "a")
        .with(":b", "c");
    let err = build_err(sqlite().query("SELECT ?, :b", binds));
    assert_eq!(err, QueryBuilderError::MixedBindStyle);
}

#[test]
fn second_master_method() {
    let err = build_err(
        sqlite()
            .read("users")
            .and_then(|e| e.create("users", [("a", 1)])),
    );
    assert_eq!(
        err,
        QueryBuilderError::AlreadyBuilding {
            current: "read",
            attempted: "create"
        }
    );
}

#[test]
fn no_master_method() {
    let err = sqlite().order("id", "ASC").build().unwrap_err();
    assert_eq!(err, QueryBuilderError::NoStatement);
}
