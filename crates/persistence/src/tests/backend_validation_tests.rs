// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for `MariaDB`/`MySQL`.
//!
//! These tests cover schema compatibility, not business rules:
//! migrations, foreign keys, unique and check constraints, and the
//! conditional update that table holds depend on. Business rules are
//! covered by the `SQLite` suite.
//!
//! All tests here are `#[ignore]` and run only via
//! `cargo xtask test-mariadb`, which provisions the database and sets:
//!
//! - `DATABASE_URL`
//! - `TABLEBOOK_TEST_BACKEND=mariadb`
//!
//! Tests fail fast if that infrastructure is missing. Each test uses
//! unique names so reruns against a shared database do not collide.

use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::{MysqlConnection, QueryableByName};
use std::env;

use crate::Persistence;
use crate::backend::mysql;

/// Result type for COUNT queries.
#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Result type for `LAST_INSERT_ID` queries.
#[derive(QueryableByName)]
struct LastInsertIdResult {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

/// # Panics
///
/// Panics if `DATABASE_URL` is not set.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// # Panics
///
/// Panics if `TABLEBOOK_TEST_BACKEND` is not `mariadb`.
fn verify_mariadb_test_environment() {
    let backend: String = env::var("TABLEBOOK_TEST_BACKEND").expect(
        "TABLEBOOK_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "TABLEBOOK_TEST_BACKEND must be 'mariadb'");
}

fn connect() -> MysqlConnection {
    verify_mariadb_test_environment();
    mysql::initialize_database(&get_mariadb_url()).expect("Failed to initialize MariaDB database")
}

fn last_insert_id(conn: &mut MysqlConnection) -> i64 {
    diesel::sql_query("SELECT LAST_INSERT_ID() AS id")
        .get_result::<LastInsertIdResult>(conn)
        .map(|r| r.id)
        .expect("Failed to read LAST_INSERT_ID")
}

fn insert_user(conn: &mut MysqlConnection, email: &str, role: &str) -> i64 {
    diesel::sql_query(format!(
        "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
         VALUES ('Backend Test', '{email}', 'hash', '{role}',
                 '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')"
    ))
    .execute(conn)
    .expect("Failed to insert user");
    last_insert_id(conn)
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let result: Result<MysqlConnection, diesel::ConnectionError> =
        MysqlConnection::establish(&get_mariadb_url());
    assert!(result.is_ok(), "Failed to connect to MariaDB: {:?}", result.err());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    let mut conn: MysqlConnection = connect();
    let result = mysql::verify_foreign_key_enforcement(&mut conn);
    assert!(result.is_ok(), "Foreign key check failed: {:?}", result.err());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_user_email_unique() {
    let mut conn: MysqlConnection = connect();
    insert_user(&mut conn, "unique_check@backend.test", "customer");

    let duplicate = diesel::sql_query(
        "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
         VALUES ('Dup', 'unique_check@backend.test', 'hash', 'customer',
                 '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
    )
    .execute(&mut conn);
    assert!(duplicate.is_err(), "Duplicate email should violate UNIQUE");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_role_check_constraint() {
    let mut conn: MysqlConnection = connect();
    let result = diesel::sql_query(
        "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
         VALUES ('Bad Role', 'bad_role@backend.test', 'hash', 'owner',
                 '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
    )
    .execute(&mut conn);
    assert!(result.is_err(), "Unknown role should violate CHECK");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_table_requires_restaurant() {
    let mut conn: MysqlConnection = connect();
    let result = diesel::sql_query(
        "INSERT INTO `tables` (restaurant_id, name, capacity, status)
         VALUES (999999, 'Orphan', 4, 'available')",
    )
    .execute(&mut conn);
    assert!(result.is_err(), "Orphan table should violate FOREIGN KEY");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_conditional_hold_matches_once() {
    let mut conn: MysqlConnection = connect();
    let supervisor_id: i64 = insert_user(&mut conn, "hold_sup@backend.test", "supervisor");
    diesel::sql_query(format!(
        "INSERT INTO restaurants (name, capacity, supervisor_id, status, created_at, updated_at)
         VALUES ('Hold Test', 10, {supervisor_id}, 'active',
                 '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')"
    ))
    .execute(&mut conn)
    .expect("Failed to insert restaurant");
    let restaurant_id: i64 = last_insert_id(&mut conn);
    diesel::sql_query(format!(
        "INSERT INTO `tables` (restaurant_id, name, capacity, status)
         VALUES ({restaurant_id}, 'H1', 4, 'available')"
    ))
    .execute(&mut conn)
    .expect("Failed to insert table");
    let table_id: i64 = last_insert_id(&mut conn);

    let hold = format!(
        "UPDATE `tables` SET status = 'reserved'
         WHERE table_id = {table_id} AND status = 'available'"
    );
    let first: usize = diesel::sql_query(&hold).execute(&mut conn).expect("first hold");
    let second: usize = diesel::sql_query(&hold).execute(&mut conn).expect("second hold");
    assert_eq!((first, second), (1, 0));

    let held: i64 = diesel::sql_query(format!(
        "SELECT COUNT(*) AS count FROM `tables`
         WHERE table_id = {table_id} AND status = 'reserved'"
    ))
    .get_result::<CountResult>(&mut conn)
    .map(|r| r.count)
    .expect("Failed to count held tables");
    assert_eq!(held, 1);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_adapter_round_trip() {
    verify_mariadb_test_environment();
    let mut persistence: Persistence =
        Persistence::new_with_mysql(&get_mariadb_url()).expect("Failed to open MariaDB adapter");

    let before: i64 = persistence.count_users().expect("count users");
    let user = persistence
        .create_user(&crate::NewUser {
            name: String::from("Adapter"),
            email: tablebook_domain::Email::parse(&format!(
                "adapter_{before}@backend.test"
            ))
            .expect("valid email"),
            password: String::from("adapter password"),
            role: tablebook_domain::Role::Customer,
            created_by: None,
            phone: None,
        })
        .expect("create user");

    assert_eq!(persistence.count_users().expect("count users"), before + 1);
    persistence.delete_user(user.user_id).expect("delete user");
}
