// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific connection setup.
//!
//! - `sqlite`: the default backend for development, tests, and single-node
//!   deployments
//! - `mysql`: `MySQL`/`MariaDB`, validated by opt-in tests
//!
//! Everything that can be written in Diesel DSL lives in `queries/` and
//! `mutations/`. This module only holds what cannot: connection
//! configuration, migration harnesses, and the few raw SQL helpers.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Operations that need backend-specific SQL.
///
/// Implemented for both connection types so that functions generated by
/// `backend_fn!` can call them on `conn` without knowing the backend.
pub trait PersistenceBackend: Connection {
    /// Retrieves the id assigned by the most recent insert on this
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// Cascades and `RESTRICT` rules in the schema depend on it.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Runs `body` in a transaction that takes the write lock up front.
    ///
    /// On `SQLite` this is `BEGIN IMMEDIATE`: a second writer waits for
    /// the first to commit and then reads its result, instead of failing
    /// with `database is locked` when it tries to upgrade a read lock.
    /// `MySQL` locks rows on update, so a plain transaction suffices.
    ///
    /// # Errors
    ///
    /// Returns the error of `body`, or a database error if the
    /// transaction cannot begin or commit.
    fn write_transaction<T, F>(&mut self, body: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn write_transaction<T, F>(&mut self, body: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>,
    {
        self.immediate_transaction(body)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn write_transaction<T, F>(&mut self, body: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut Self) -> Result<T, PersistenceError>,
    {
        self.transaction(body)
    }
}
