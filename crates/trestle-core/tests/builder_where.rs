//! Tests for WHERE conditions.

mod common;
use common::*;

use trestle_core::{col, range, raw, QueryBuilderError, SqlValue};

#[test]
fn where_and_where_bind_in_order() {
    let query = build(
        sqlite()
            .read("users")
            .and_then(|e| e.where_("id", "=", 1))
            .and_then(|e| e.and_where("name", "=", "julian")),
    );
    assert_eq!(
        query.sql,
        "SELECT * FROM `users` WHERE `id` = ? AND `name` = ?"
    );
    assert_eq!(values(&query), vec![SqlValue::Int(1), text("julian")]);
}

#[test]
fn or_where() {
    let query = build(
        mysql()
            .read("users")
            .and_then(|e| e.where_("id", "<", 3))
            .and_then(|e| e.or_where("id", ">", 10)),
    );
    assert_eq!(query.sql, "SELECT * FROM `users` WHERE `id` < ? OR `id` > ?");
    assert_eq!(values(&query), ints(&[3, 10]));
}

#[test]
fn second_where_continues_with_and() {
    let query = build(
        mysql()
            .read("users")
            .and_then(|e| e.where_("a", "=", 1))
            .and_then(|e| e.where_("b", "=", 2)),
    );
    assert_eq!(query.sql, "SELECT * FROM `users` WHERE `a` = ? AND `b` = ?");
}

#[test]
fn between_renders_two_placeholders() {
    let query = build(
        sqlite()
            .read("users")
            .and_then(|e| e.where_("id", "BETWEEN", [1, 9])),
    );
    assert_eq!(query.sql, "SELECT * FROM `users` WHERE `id` BETWEEN ? AND ?");
    assert_eq!(values(&query), ints(&[1, 9]));
}

#[test]
fn not_between_with_range_helper() {
    let query = build(
        mysql()
            .read("events")
            .and_then(|e| e.where_("day", "not between", range("2020-01-01", "2020-12-31"))),
    );
    assert_eq!(
        query.sql,
        "SELECT * FROM `events` WHERE `day` NOT BETWEEN ? AND ?"
    );
    assert_eq!(
        values(&query),
        vec![text("2020-01-01"), text("2020-12-31")]
    );
}

#[test]
fn between_rejects_scalar() {
    let err = build_err(
        sqlite()
            .read("users")
            .and_then(|e| e.where_("id", "BETWEEN", "x")),
    );
    assert_eq!(
        err,
        QueryBuilderError::InvalidValueShape {
            operator: "BETWEEN",
            shape: "a single value"
        }
    );
}

#[test]
fn range_rejected_for_plain_operator() {
    let err = build_err(sqlite().read("users").and_then(|e| e.where_("id", "=", [1, 2])));
    assert_eq!(
        err,
        QueryBuilderError::InvalidValueShape {
            operator: "=",
            shape: "a list of values"
        }
    );
}

#[test]
fn like_wraps_value() {
    let query = build(
        sqlite()
            .read("users")
            .and_then(|e| e.where_("name", "LIKE", "jul")),
    );
    assert_eq!(query.sql, "SELECT * FROM `users` WHERE `name` LIKE ?");
    assert_eq!(values(&query), vec![text("%jul%")]);
}

#[test]
fn like_with_raw_is_not_wrapped() {
    let query = build(
        sqlite()
            .read("users")
            .and_then(|e| e.where_("name", "LIKE", raw("'jul%'"))),
    );
    assert_eq!(query.sql, "SELECT * FROM `users` WHERE `name` LIKE 'jul%'");
    assert!(query.binds.is_empty());
}

#[test]
fn column_operand_is_quoted() {
    let query = build(
        mysql()
            .read(["articles", "users"])
            .and_then(|e| e.where_("articles.author", "=", col("users.id"))),
    );
    assert_eq!(
        query.sql,
        "SELECT * FROM `articles`, `users` WHERE `articles`.`author` = `users`.`id`"
    );
    assert!(query.binds.is_empty());
}

#[test]
fn null_is_bound() {
    let query = build(
        sqlite()
            .read("users")
            .and_then(|e| e.where_("deleted", "!=", None::<i64>)),
    );
    assert_eq!(values(&query), vec![SqlValue::Null]);
}

#[test]
fn unknown_operator() {
    let err = build_err(sqlite().read("users").and_then(|e| e.where_("id", "<>", 1)));
    assert_eq!(err, QueryBuilderError::InvalidOperator(String::from("<>")));
}

#[test]
fn and_where_without_where() {
    let err = build_err(sqlite().read("users").and_then(|e| e.and_where("id", "=", 1)));
    assert_eq!(
        err,
        QueryBuilderError::NoPriorClause {
            method: "and_where",
            requires: "where_"
        }
    );
}

#[test]
fn or_where_without_where() {
    let err = build_err(sqlite().read("users").and_then(|e| e.or_where("id", "=", 1)));
    assert!(matches!(err, QueryBuilderError::NoPriorClause { method: "or_where", .. }));
}

#[test]
fn where_binds_precede_limit_binds() {
    let query = build(
        mysql()
            .read("users")
            .and_then(|e| e.limit(3))
            .and_then(|e| e.where_("id", ">", 100)),
    );
    assert_eq!(query.sql, "SELECT * FROM `users` WHERE `id` > ? LIMIT ?");
    assert_eq!(values(&query), ints(&[100, 3]));
}
